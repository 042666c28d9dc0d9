// IPv4 static routes: `router/static`, keyed by the integer `seq-num`.
//
// `seq_num` may be left out on create; the appliance assigns one and
// returns it as the response mkey.

use crate::schema::{Check, Field, MkeyKind, ResourceSchema};

use super::NAMED;

pub static ROUTER_STATIC: ResourceSchema = ResourceSchema {
    type_name: "fortios_router_static",
    display_name: "RouterStatic",
    path: "router/static",
    mkey: "seq_num",
    mkey_kind: MkeyKind::Int,
    description: "Configure IPv4 static routing tables.",
    fields: &[
        Field::int("seq_num").optional_computed().range(0, 4_294_967_295),
        Field::toggle("status").optional_computed(),
        Field::ip_mask("dst").optional_computed(),
        Field::ip_mask("src").optional_computed(),
        Field::string("gateway").optional_computed().check(Check::Ipv4),
        Field::int("distance").optional_computed().range(1, 255),
        Field::int("weight").optional_computed().range(0, 255),
        Field::int("priority").optional_computed().range(0, 65_535),
        Field::string("device").max_len(35),
        Field::string("comment").max_len(255),
        Field::toggle("blackhole").optional_computed(),
        Field::toggle("dynamic_gateway").optional_computed(),
        Field::subtable("sdwan_zone", "name", NAMED),
        Field::string("dstaddr").max_len(79),
        Field::int("internet_service").optional_computed(),
        Field::string("internet_service_custom").max_len(64),
        Field::toggle("link_monitor_exempt").optional_computed(),
        Field::int("vrf").optional_computed().range(0, 251),
        Field::toggle("bfd").optional_computed(),
        Field::int("tag").optional_computed().range(0, 4_294_967_295),
    ],
};
