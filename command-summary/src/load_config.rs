//! Resolves configuration from the environment for the CLI commands.
//!
//! The summary output directory always comes from the environment: every
//! command in the pipeline has to agree on it. Platform details for links can
//! be passed as flags, which take precedence over the environment.

use anyhow::{Context, Result};
use command_summary_core::config::SummaryConfig;
use command_summary_core::links::PlatformDetails;
use tracing::{error, info};

/// Platform base URL for link generation.
pub const PLATFORM_URL_ENV: &str = "JFROG_CLI_PLATFORM_URL";
/// Optional platform major version; when absent it is queried from the platform.
pub const PLATFORM_MAJOR_VERSION_ENV: &str = "JFROG_CLI_PLATFORM_MAJOR_VERSION";

/// How the platform details for one `generate` call are obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformSettings {
    /// Both URL and major version are known up front.
    Static(PlatformDetails),
    /// Only the URL is known; the version is queried over HTTP.
    Query { url: String },
}

/// Output directory for commands that quietly do nothing without it.
pub fn load_summary_config() -> Option<SummaryConfig> {
    let config = SummaryConfig::from_env()?;
    config.trace_loaded();
    Some(config)
}

/// Output directory for commands that cannot run without it.
pub fn require_summary_config() -> Result<SummaryConfig> {
    let config = SummaryConfig::require_from_env().inspect_err(|e| {
        error!(error = %e, "Summary output directory missing");
    })?;
    config.trace_loaded();
    Ok(config)
}

/// Merges flags with the environment into [`PlatformSettings`].
pub fn load_platform_settings(
    url_flag: Option<String>,
    major_version_flag: Option<u32>,
) -> Result<PlatformSettings> {
    let url = match url_flag.or_else(|| non_empty_env(PLATFORM_URL_ENV)) {
        Some(url) => url,
        None => {
            error!(var = PLATFORM_URL_ENV, "Platform URL not provided");
            anyhow::bail!(
                "platform URL is mandatory to generate summary links: pass --url or set {PLATFORM_URL_ENV}"
            );
        }
    };

    let major_version = match major_version_flag {
        Some(version) => Some(version),
        None => match non_empty_env(PLATFORM_MAJOR_VERSION_ENV) {
            Some(raw) => Some(raw.trim().parse::<u32>().with_context(|| {
                format!("{PLATFORM_MAJOR_VERSION_ENV} must be a valid integer, got {raw:?}")
            })?),
            None => None,
        },
    };

    let settings = match major_version {
        Some(version) => PlatformSettings::Static(PlatformDetails::new(url, version)),
        None => PlatformSettings::Query { url },
    };
    info!(?settings, "Platform settings resolved");
    Ok(settings)
}

fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}
