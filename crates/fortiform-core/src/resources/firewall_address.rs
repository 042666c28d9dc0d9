// IPv4 firewall addresses: `firewall/address`.

use crate::schema::{Check, Field, MkeyKind, ResourceSchema};

use super::{NAMED, TAGGING};

const ADDR_TYPES: &[&str] = &[
    "ipmask",
    "iprange",
    "fqdn",
    "geography",
    "wildcard",
    "dynamic",
    "interface-subnet",
    "mac",
];

const LIST: &[Field] = &[Field::string("ip").max_len(35)];
const MACADDR: &[Field] = &[Field::string("macaddr").max_len(127)];

pub static FIREWALL_ADDRESS: ResourceSchema = ResourceSchema {
    type_name: "fortios_firewall_address",
    display_name: "FirewallAddress",
    path: "firewall/address",
    mkey: "name",
    mkey_kind: MkeyKind::String,
    description: "Configure IPv4 addresses.",
    fields: &[
        Field::string("name").required().max_len(79),
        Field::string("uuid").computed(),
        Field::string("type").optional_computed().one_of(ADDR_TYPES),
        Field::string("sub_type").optional_computed().one_of(&["sdn", "clearpass-spt", "fsso", "ems-tag", "swc-tag"]),
        Field::ip_mask("subnet").optional_computed(),
        Field::string("start_ip").optional_computed().check(Check::Ipv4),
        Field::string("end_ip").optional_computed().check(Check::Ipv4),
        Field::string("fqdn").max_len(255),
        Field::string("country").max_len(2),
        Field::ip_mask("wildcard").optional_computed(),
        Field::string("wildcard_fqdn").max_len(255),
        Field::int("cache_ttl").optional_computed().range(0, 86_400),
        Field::string("sdn").max_len(35),
        Field::subtable("fsso_group", "name", NAMED),
        Field::subtable("macaddr", "macaddr", MACADDR),
        Field::string("interface").max_len(35),
        Field::string("associated_interface").max_len(35),
        Field::string("sdn_addr_type").optional_computed().one_of(&["private", "public", "all"]),
        Field::toggle("node_ip_only").optional_computed(),
        Field::string("obj_id"),
        Field::string("comment").max_len(255),
        Field::int("color").optional_computed().range(0, 32),
        Field::string("filter").max_len(2047),
        Field::subtable("list", "ip", LIST),
        Field::subtable("tagging", "name", TAGGING),
        Field::toggle("allow_routing").optional_computed(),
        Field::toggle("fabric_object").optional_computed(),
    ],
};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::expand::{ExpandMode, expand};
    use crate::flatten::{FlattenOptions, flatten};
    use crate::state::ResourceData;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    #[test]
    fn round_trips_through_api_names() {
        let attrs = json!({
            "name": "branch-lan",
            "type": "ipmask",
            "subnet": "10.20.0.0/16",
            "associated_interface": "port2",
            "color": 4,
            "comment": "branch office",
            "tagging": [{ "name": "site", "category": "geo", "tags": [{ "name": "emea" }] }]
        });
        let data = ResourceData::new(attrs.as_object().cloned().unwrap());
        let payload = expand(&FIREWALL_ADDRESS, &data, ExpandMode::Create).unwrap();
        assert_eq!(payload["associated-interface"], json!("port2"));

        // what the appliance hands back
        let mut api = payload.clone();
        api.insert("subnet".into(), json!("10.20.0.0 255.255.0.0"));
        api.insert("uuid".into(), json!("1b2c..."));
        api.insert("color".into(), json!("4"));

        let state = flatten(&FIREWALL_ADDRESS, &api, Some(&data.attributes), FlattenOptions::default()).unwrap();
        let mut expected = attrs;
        expected["uuid"] = json!("1b2c...");
        assert_eq!(Value::Object(state), expected);
    }
}
