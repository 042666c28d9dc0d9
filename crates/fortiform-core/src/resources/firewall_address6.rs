// IPv6 firewall addresses: `firewall/address6`.

use crate::schema::{Check, Field, MkeyKind, ResourceSchema};

use super::TAGGING;

const LIST: &[Field] = &[Field::string("ip").max_len(89)];
const MACADDR: &[Field] = &[Field::string("macaddr").max_len(127)];
const SUBNET_SEGMENT: &[Field] = &[
    Field::string("name").max_len(35),
    Field::string("type").one_of(&["any", "specific"]),
    Field::string("value").max_len(35),
];

pub static FIREWALL_ADDRESS6: ResourceSchema = ResourceSchema {
    type_name: "fortios_firewall_address6",
    display_name: "FirewallAddress6",
    path: "firewall/address6",
    mkey: "name",
    mkey_kind: MkeyKind::String,
    description: "Configure IPv6 firewall addresses.",
    fields: &[
        Field::string("name").required().max_len(79),
        Field::string("uuid").computed(),
        Field::string("type")
            .optional_computed()
            .one_of(&["ipprefix", "iprange", "fqdn", "geography", "dynamic", "template", "mac"]),
        Field::subtable("macaddr", "macaddr", MACADDR),
        Field::string("sdn").max_len(35),
        Field::string("ip6").optional_computed().check(Check::Ipv6Prefix),
        Field::string("start_ip").optional_computed().check(Check::Ipv6),
        Field::string("end_ip").optional_computed().check(Check::Ipv6),
        Field::string("fqdn").max_len(255),
        Field::string("country").max_len(2),
        Field::int("cache_ttl").optional_computed().range(0, 86_400),
        Field::int("color").optional_computed().range(0, 32),
        Field::string("obj_id"),
        Field::subtable("list", "ip", LIST),
        Field::subtable("tagging", "name", TAGGING),
        Field::string("comment").max_len(255),
        Field::string("template").max_len(63),
        Field::subtable("subnet_segment", "name", SUBNET_SEGMENT),
        Field::string("host_type").optional_computed().one_of(&["any", "specific"]),
        Field::string("host").optional_computed().check(Check::Ipv6),
        Field::string("tenant").max_len(35),
        Field::string("epg_name").max_len(255),
        Field::string("sdn_tag").max_len(15),
        Field::toggle("fabric_object").optional_computed(),
    ],
};
