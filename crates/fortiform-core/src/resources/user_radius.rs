// RADIUS servers: `user/radius`.
//
// Every secret is sensitive: the appliance only ever returns an encrypted
// placeholder, so state keeps what the user wrote.

use crate::schema::{Check, Field, MkeyKind, ResourceSchema};

use super::NAMED;

const IFACE_SELECT: &[&str] = &["auto", "sdwan", "specify"];

const ACCOUNTING_SERVER: &[Field] = &[
    Field::int("fosid").api_name("id").range(0, 4_294_967_295),
    Field::toggle("status").optional_computed(),
    Field::string("server").max_len(63),
    Field::string("secret").sensitive(),
    Field::int("port").optional_computed().range(0, 65_535),
    Field::string("source_ip").max_len(63),
    Field::string("interface_select_method").optional_computed().one_of(IFACE_SELECT),
    Field::string("interface").max_len(15),
];

pub static USER_RADIUS: ResourceSchema = ResourceSchema {
    type_name: "fortios_user_radius",
    display_name: "UserRadius",
    path: "user/radius",
    mkey: "name",
    mkey_kind: MkeyKind::String,
    description: "Configure RADIUS server entries.",
    fields: &[
        Field::string("name").required().max_len(35),
        Field::string("server").max_len(63),
        Field::string("secret").sensitive(),
        Field::string("secondary_server").max_len(63),
        Field::string("secondary_secret").sensitive(),
        Field::string("tertiary_server").max_len(63),
        Field::string("tertiary_secret").sensitive(),
        Field::int("timeout").optional_computed().range(1, 300),
        Field::toggle("all_usergroup").optional_computed(),
        Field::toggle("use_management_vdom").optional_computed(),
        Field::string("nas_ip").optional_computed().check(Check::Ipv4),
        Field::int("acct_interim_interval").optional_computed().range(0, 86_400),
        Field::toggle("radius_coa").optional_computed(),
        Field::int("radius_port").optional_computed().range(0, 65_535),
        Field::toggle("h3c_compatibility").optional_computed(),
        Field::string("auth_type")
            .optional_computed()
            .one_of(&["auto", "ms_chap_v2", "ms_chap", "chap", "pap"]),
        Field::string("source_ip").max_len(63),
        Field::toggle("username_case_sensitive").optional_computed(),
        Field::subtable("class", "name", NAMED),
        Field::toggle("password_renewal").optional_computed(),
        Field::string("password_encoding").optional_computed().one_of(&["auto", "ISO-8859-1"]),
        Field::toggle("acct_all_servers").optional_computed(),
        Field::string("interface_select_method").optional_computed().one_of(IFACE_SELECT),
        Field::string("interface").max_len(15),
        Field::toggle("rsso").optional_computed(),
        Field::int("rsso_radius_server_port").optional_computed().range(0, 65_535),
        Field::string("rsso_secret").sensitive(),
        Field::toggle("rsso_validate_request_secret").optional_computed(),
        Field::string("sso_attribute").optional_computed(),
        Field::string("sso_attribute_key").max_len(35),
        Field::subtable("accounting_server", "fosid", ACCOUNTING_SERVER),
    ],
};
