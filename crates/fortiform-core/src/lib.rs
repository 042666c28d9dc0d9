// fortiform-core: Schema-driven resource layer between fortiform-api and the CLI.

pub mod config;
pub mod convert;
pub mod diff;
pub mod error;
pub mod expand;
pub mod flatten;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod state;
pub mod subtable;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ProviderConfig;
pub use diff::{AttrChange, ChangeKind, diff};
pub use error::{CoreError, ValidationError, Verb};
pub use expand::{ExpandMode, expand};
pub use flatten::{FlattenOptions, flatten};
pub use provider::{Plan, PlanAction, Provider};
pub use schema::{
    Check, Field, FieldKind, MkeyKind, PathTarget, Presence, ResourceSchema, SENSITIVE_MASK,
};
pub use state::ResourceData;
pub use subtable::SortMode;
pub use validate::validate;

pub use fortiform_api::{Error as ApiError, SystemStatus, TlsMode};
