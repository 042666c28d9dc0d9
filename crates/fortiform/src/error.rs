//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use fortiform_config::ConfigError;
use fortiform_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to FortiGate at {host}")]
    #[diagnostic(
        code(fortiform::connection_failed),
        help(
            "Check that the appliance is reachable and the REST API is enabled.\n\
             Host: {host}\n\
             Try: fortiform status --insecure"
        )
    )]
    ConnectionFailed {
        host: String,
        #[source]
        source: CoreError,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(fortiform::tls_error),
        help(
            "Factory-default FortiGate certificates are self-signed.\n\
             Use --insecure (-k) to accept them, or set ca_cert in your profile."
        )
    )]
    Tls { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(fortiform::auth_failed),
        help(
            "Verify the REST API admin token and its trusted hosts.\n\
             Run: fortiform config set-token --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No API token configured for profile '{profile}'")]
    #[diagnostic(
        code(fortiform::no_credentials),
        help(
            "Configure a token with: fortiform config init\n\
             Or set the FORTIOS_ACCESS_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(fortiform::not_found),
        help("Run: fortiform list {list_type} to see existing objects")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_type: String,
    },

    #[error("Unknown resource type '{name}'")]
    #[diagnostic(
        code(fortiform::unknown_resource),
        help("Supported types: {available}")
    )]
    UnknownResource { name: String, available: String },

    // ── Operations ───────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(fortiform::operation_failed))]
    Operation(CoreError),

    #[error(transparent)]
    #[diagnostic(
        code(fortiform::invalid_configuration),
        help("Run: fortiform resources schema <type> to see accepted attributes")
    )]
    InvalidResource(CoreError),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fortiform::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(fortiform::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: fortiform config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No FortiGate configured")]
    #[diagnostic(
        code(fortiform::no_config),
        help(
            "Create a profile with: fortiform config init\n\
             Or pass --host and --token.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(fortiform::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(fortiform::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(fortiform::timeout),
        help("Increase timeout with --timeout or check appliance responsiveness.")
    )]
    Timeout { message: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(fortiform::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Tls { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::InvalidResource(_)
            | Self::UnknownResource { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Fill in the appliance address on connection failures.
    pub fn with_host(self, host: &str) -> Self {
        match self {
            Self::ConnectionFailed { source, .. } => Self::ConnectionFailed {
                host: host.to_owned(),
                source,
            },
            other => other,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { resource, mkey } => CliError::NotFound {
                resource_type: resource.into(),
                identifier: mkey,
                list_type: resource.into(),
            },

            CoreError::Validation { .. }
            | CoreError::MissingMkey { .. }
            | CoreError::MissingId { .. }
            | CoreError::Expand { .. } => CliError::InvalidResource(err),

            err => match err.api_error() {
                Some(api) if api.is_auth() => CliError::AuthFailed {
                    profile: "current".into(),
                    message: api.to_string(),
                },
                Some(api @ fortiform_core::ApiError::Timeout { .. }) => CliError::Timeout {
                    message: api.to_string(),
                },
                Some(fortiform_core::ApiError::Tls(message)) => CliError::Tls {
                    message: message.clone(),
                },
                Some(api) if api.is_transient() => CliError::ConnectionFailed {
                    host: String::new(),
                    source: err,
                },
                _ => CliError::Operation(err),
            },
        }
    }
}
