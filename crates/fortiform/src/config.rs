//! CLI configuration: a thin wrapper around `fortiform_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--host, --token, --vdom, etc.).

use std::time::Duration;

use secrecy::SecretString;

use fortiform_core::{ProviderConfig, SortMode};

use crate::cli::{GlobalOpts, SortArg};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use fortiform_config::{
    Config, Profile, config_path, load_config, save_config, store_token,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::False => Self::False,
            SortArg::True => Self::True,
            SortArg::Natural => Self::Natural,
        }
    }
}

/// Build a `ProviderConfig` from the config file, profile, and CLI overrides.
///
/// CLI flag overrides take priority over profile values. Without a
/// matching profile, `--host` and `--token` alone are enough.
pub fn build_provider_config(global: &GlobalOpts) -> Result<ProviderConfig, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let mut provider = if let Some(profile) = cfg.profiles.get(&profile_name) {
        resolve_profile(profile, &profile_name, global, &cfg)?
    } else if global.profile.is_some() && global.host.is_none() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    } else {
        let host = global.host.clone().ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;
        let token = global.token.clone().ok_or(CliError::NoCredentials {
            profile: profile_name,
        })?;
        ProviderConfig {
            host,
            token: SecretString::from(token),
            tls: fortiform_config::tls_mode(
                global.insecure || cfg.defaults.insecure,
                global.ca_cert.as_deref(),
            ),
            timeout: Duration::from_secs(cfg.defaults.timeout),
            retries: cfg.defaults.retries,
            sort: cfg.defaults.sort_subtable,
            ..ProviderConfig::default()
        }
    };

    if let Some(ref vdom) = global.vdom {
        provider.vdom.clone_from(vdom);
    }
    if let Some(secs) = global.timeout {
        provider.timeout = Duration::from_secs(secs);
    }
    if let Some(sort) = global.sort_subtable {
        provider.sort = sort.into();
    }
    Ok(provider)
}

/// Translate a `Profile` + global flags into a `ProviderConfig`.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<ProviderConfig, CliError> {
    // Host and token flags win over the profile before it is resolved,
    // so a profile without a stored token still works with --token.
    let mut effective = profile.clone();
    if let Some(ref host) = global.host {
        effective.host.clone_from(host);
    }
    if let Some(ref token) = global.token {
        effective.token = Some(token.clone());
        effective.token_env = None;
    }
    if global.insecure {
        effective.insecure = Some(true);
    }
    if let Some(ref ca) = global.ca_cert {
        effective.ca_cert = Some(ca.clone());
    }

    let mut provider =
        fortiform_config::profile_to_provider_config(&effective, profile_name, &cfg.defaults)?;
    if let Some(ref token) = global.token {
        provider.token = SecretString::from(token.clone());
    }
    Ok(provider)
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
