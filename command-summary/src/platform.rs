//! Platform clients used to resolve the base URL and major version for links.
//!
//! - [`StaticPlatform`] returns details that were fully configured up front.
//! - [`ArtifactoryVersionClient`] queries the version endpoint of the platform.

use async_trait::async_trait;
use command_summary_core::contract::PlatformClient;
use command_summary_core::error::BoxError;
use command_summary_core::links::PlatformDetails;
use serde::Deserialize;

use crate::load_config::PlatformSettings;

/// Details that are already known.
pub struct StaticPlatform {
    details: PlatformDetails,
}

impl StaticPlatform {
    pub fn new(details: PlatformDetails) -> Self {
        StaticPlatform { details }
    }
}

#[async_trait]
impl PlatformClient for StaticPlatform {
    async fn platform_details(&self) -> Result<PlatformDetails, BoxError> {
        Ok(self.details.clone())
    }
}

#[derive(Deserialize)]
struct VersionResponse {
    version: String,
}

/// Reads the major version from `GET <url>/artifactory/api/system/version`.
pub struct ArtifactoryVersionClient {
    url: String,
    http: reqwest::Client,
}

impl ArtifactoryVersionClient {
    pub fn new(url: impl Into<String>) -> Self {
        ArtifactoryVersionClient {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }

    fn version_endpoint(&self) -> String {
        format!(
            "{}/artifactory/api/system/version",
            self.url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl PlatformClient for ArtifactoryVersionClient {
    async fn platform_details(&self) -> Result<PlatformDetails, BoxError> {
        let endpoint = self.version_endpoint();
        tracing::info!(%endpoint, "Querying platform version");
        let response = self
            .http
            .get(&endpoint)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::error!(error = ?e, %endpoint, "Platform version request failed");
                e
            })?;
        let body: VersionResponse = response.json().await?;
        let major_version = parse_major_version(&body.version)?;
        tracing::info!(version = %body.version, major_version, "Platform version resolved");
        Ok(PlatformDetails::new(self.url.clone(), major_version))
    }
}

/// Extracts the major component of a version string such as `7.77.3`.
pub fn parse_major_version(version: &str) -> Result<u32, BoxError> {
    let major = version.trim().split('.').next().unwrap_or_default();
    major
        .parse::<u32>()
        .map_err(|e| format!("invalid platform version {version:?}: {e}").into())
}

/// Builds the client matching the resolved settings.
pub fn client_for(settings: PlatformSettings) -> Box<dyn PlatformClient> {
    match settings {
        PlatformSettings::Static(details) => Box::new(StaticPlatform::new(details)),
        PlatformSettings::Query { url } => Box::new(ArtifactoryVersionClient::new(url)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_version_is_the_first_component() {
        assert_eq!(parse_major_version("7.77.3").unwrap(), 7);
        assert_eq!(parse_major_version(" 6.23.42 ").unwrap(), 6);
        assert_eq!(parse_major_version("11").unwrap(), 11);
        assert!(parse_major_version("latest").is_err());
        assert!(parse_major_version("").is_err());
    }

    #[test]
    fn version_endpoint_ignores_trailing_slash() {
        let client = ArtifactoryVersionClient::new("https://acme.jfrog.io/");
        assert_eq!(
            client.version_endpoint(),
            "https://acme.jfrog.io/artifactory/api/system/version"
        );
    }

    #[tokio::test]
    async fn static_platform_returns_configured_details() {
        let details = PlatformDetails::new("https://acme.jfrog.io", 7);
        let client = client_for(PlatformSettings::Static(details.clone()));
        assert_eq!(client.platform_details().await.unwrap(), details);
    }
}
