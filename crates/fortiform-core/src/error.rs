// ── Core error types ──
//
// Every CRUD failure surfaces as `Error <verb> <Resource> resource: <cause>`.
// Validation, expand and flatten failures name the attribute at fault.

use std::fmt;

use strum::Display;
use thiserror::Error;

/// The operation that failed, rendered in the error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Verb {
    Creating,
    Reading,
    Updating,
    Deleting,
    Importing,
    Resetting,
}

/// One failed schema check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Attribute path, e.g. `tagging.0.name`.
    pub attr: String,
    pub reason: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.attr, self.reason)
    }
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An API call failed during a resource operation.
    #[error("Error {verb} {resource} resource: {source}")]
    Resource {
        verb: Verb,
        resource: &'static str,
        #[source]
        source: fortiform_api::Error,
    },

    /// The appliance has no object with this mkey.
    #[error("{resource} '{mkey}' not found")]
    NotFound { resource: &'static str, mkey: String },

    #[error("Invalid {resource} configuration: {}", join(.errors))]
    Validation {
        resource: &'static str,
        errors: Vec<ValidationError>,
    },

    /// State → payload conversion failed.
    #[error("Error expanding {attr}: {reason}")]
    Expand { attr: String, reason: String },

    /// Payload → state conversion failed.
    #[error("Error reading {attr}: {reason}")]
    Flatten { attr: String, reason: String },

    #[error("{resource} has no id; create or import it first")]
    MissingId { resource: &'static str },

    #[error("{resource} needs '{attr}' to identify the object")]
    MissingMkey {
        resource: &'static str,
        attr: &'static str,
    },

    /// Provider setup (URL, TLS, token) failed.
    #[error("Provider configuration error: {0}")]
    Config(#[from] fortiform_api::Error),
}

impl CoreError {
    /// Wrap an API error for a resource operation.
    pub fn resource(verb: Verb, resource: &'static str, source: fortiform_api::Error) -> Self {
        Self::Resource {
            verb,
            resource,
            source,
        }
    }

    /// The underlying API error, if any.
    pub fn api_error(&self) -> Option<&fortiform_api::Error> {
        match self {
            Self::Resource { source, .. } | Self::Config(source) => Some(source),
            _ => None,
        }
    }
}
