// ── Resource registry ──
//
// Static schema tables for every supported CMDB resource, looked up by
// type name.

mod firewall_address;
mod firewall_address6;
mod router_static;
mod user_radius;
mod vpnipsec_phase2interface;

use crate::schema::{Field, ResourceSchema};

pub use firewall_address::FIREWALL_ADDRESS;
pub use firewall_address6::FIREWALL_ADDRESS6;
pub use router_static::ROUTER_STATIC;
pub use user_radius::USER_RADIUS;
pub use vpnipsec_phase2interface::VPNIPSEC_PHASE2INTERFACE;

/// Prefix shared by every resource type name.
pub const TYPE_PREFIX: &str = "fortios_";

static ALL: &[&ResourceSchema] = &[
    &FIREWALL_ADDRESS,
    &FIREWALL_ADDRESS6,
    &ROUTER_STATIC,
    &USER_RADIUS,
    &VPNIPSEC_PHASE2INTERFACE,
];

/// Every registered resource, sorted by type name.
pub fn all() -> &'static [&'static ResourceSchema] {
    ALL
}

/// Find a resource by type name.
///
/// Accepts the full name (`fortios_firewall_address`), the name without
/// the `fortios_` prefix, the display name (`FirewallAddress`), or the CMDB
/// path (`firewall/address`).
pub fn lookup(name: &str) -> Option<&'static ResourceSchema> {
    let name = name.trim().to_ascii_lowercase();
    let bare = name.strip_prefix(TYPE_PREFIX).unwrap_or(&name);
    ALL.iter().copied().find(|s| {
        s.type_name.strip_prefix(TYPE_PREFIX) == Some(bare)
            || s.path == name
            || s.display_name.eq_ignore_ascii_case(&name)
    })
}

// ── Shared subtables ─────────────────────────────────────────────────

const TAGS: &[Field] = &[Field::string("name").max_len(79)];

/// Object tagging, common to address-like tables.
pub(crate) const TAGGING: &[Field] = &[
    Field::string("name").max_len(63),
    Field::string("category").max_len(63),
    Field::subtable("tags", "name", TAGS),
];

/// `[{ "name": ... }]` member lists.
pub(crate) const NAMED: &[Field] = &[Field::string("name").max_len(79)];
