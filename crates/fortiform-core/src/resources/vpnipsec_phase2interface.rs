// Route-based IPsec phase 2 selectors: `vpn.ipsec/phase2-interface`.

use crate::schema::{Check, Field, MkeyKind, ResourceSchema};

const ADDR_TYPES: &[&str] = &["subnet", "range", "ip", "name", "subnet6", "range6", "ip6", "name6"];

pub static VPNIPSEC_PHASE2INTERFACE: ResourceSchema = ResourceSchema {
    type_name: "fortios_vpnipsec_phase2interface",
    display_name: "VpnIpsecPhase2Interface",
    path: "vpn.ipsec/phase2-interface",
    mkey: "name",
    mkey_kind: MkeyKind::String,
    description: "Configure VPN autokey tunnel.",
    fields: &[
        Field::string("name").required().max_len(35),
        Field::string("phase1name").required().max_len(15),
        Field::toggle("dhcp_ipsec").optional_computed(),
        Field::string("proposal").optional_computed(),
        Field::toggle("pfs").optional_computed(),
        Field::string("dhgrp").optional_computed(),
        Field::toggle("replay").optional_computed(),
        Field::toggle("keepalive").optional_computed(),
        Field::toggle("auto_negotiate").optional_computed(),
        Field::string("add_route").optional_computed().one_of(&["phase1", "enable", "disable"]),
        Field::string("keylife_type").optional_computed().one_of(&["seconds", "kbs", "both"]),
        Field::int("keylifeseconds").optional_computed().range(120, 172_800),
        Field::int("keylifekbs").optional_computed().range(5120, 4_294_967_295),
        Field::toggle("single_source").optional_computed(),
        Field::string("route_overlap").optional_computed().one_of(&["use-old", "use-new", "allow"]),
        Field::string("encapsulation")
            .optional_computed()
            .one_of(&["tunnel-mode", "transport-mode"]),
        Field::toggle("l2tp").optional_computed(),
        Field::toggle("initiator_ts_narrow").optional_computed(),
        Field::toggle("diffserv").optional_computed(),
        Field::string("diffservcode").optional_computed(),
        Field::string("comments").max_len(255),
        Field::int("protocol").optional_computed().range(0, 255),
        Field::string("src_name").max_len(79),
        Field::string("src_name6").max_len(79),
        Field::string("src_addr_type").optional_computed().one_of(ADDR_TYPES),
        Field::string("src_start_ip").optional_computed().check(Check::Ipv4),
        Field::string("src_start_ip6").optional_computed().check(Check::Ipv6),
        Field::string("src_end_ip").optional_computed().check(Check::Ipv4),
        Field::string("src_end_ip6").optional_computed().check(Check::Ipv6),
        Field::ip_mask("src_subnet").optional_computed(),
        Field::string("src_subnet6").optional_computed().check(Check::Ipv6Prefix),
        Field::int("src_port").optional_computed().range(0, 65_535),
        Field::string("dst_name").max_len(79),
        Field::string("dst_name6").max_len(79),
        Field::string("dst_addr_type").optional_computed().one_of(ADDR_TYPES),
        Field::string("dst_start_ip").optional_computed().check(Check::Ipv4),
        Field::string("dst_start_ip6").optional_computed().check(Check::Ipv6),
        Field::string("dst_end_ip").optional_computed().check(Check::Ipv4),
        Field::string("dst_end_ip6").optional_computed().check(Check::Ipv6),
        Field::ip_mask("dst_subnet").optional_computed(),
        Field::string("dst_subnet6").optional_computed().check(Check::Ipv6Prefix),
        Field::int("dst_port").optional_computed().range(0, 65_535),
    ],
};
