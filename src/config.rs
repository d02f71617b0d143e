//! Configuration management for the support case workflow.
//!
//! This module handles the only configuration the workflow has: the ambient
//! AWS credential and region resolution. The standard AWS variables are read
//! and validated up front, then handed to a [`ConfigProvider`] that produces
//! the SDK configuration.

use std::env;

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_credential_types::Credentials;
use aws_sdk_support::config::Region;
use aws_sdk_support::error::DisplayErrorContext;

use crate::error::SupportError;

/// Region used when the environment does not name one.
///
/// The AWS Support API for the commercial partition is served from us-east-1.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Settings read from the standard AWS environment variables.
///
/// Every field is optional: anything left unset is resolved by the SDK's
/// default provider chains (profile files, SSO, instance metadata, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Named profile from `AWS_PROFILE`.
    pub profile: Option<String>,

    /// Region from `AWS_REGION`.
    pub region: Option<String>,

    /// Endpoint override from `AWS_ENDPOINT_URL_SUPPORT`.
    pub endpoint_url: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `SupportError::Config` if a value is present but malformed.
    ///
    /// # Example
    ///
    /// ```ignore
    /// dotenvy::dotenv().ok();
    /// let config = Config::from_env()?;
    /// ```
    pub fn from_env() -> Result<Self, SupportError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SupportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = Self::get_optional(&lookup, "AWS_PROFILE");
        let region = Self::get_optional(&lookup, "AWS_REGION")
            .map(Self::validate_region)
            .transpose()?;
        let endpoint_url = Self::get_optional(&lookup, "AWS_ENDPOINT_URL_SUPPORT")
            .map(Self::validate_endpoint_url)
            .transpose()?;

        Ok(Config {
            profile,
            region,
            endpoint_url,
        })
    }

    /// Gets an optional variable, treating blank values as unset.
    fn get_optional<F>(lookup: &F, name: &str) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Validates the region name format.
    fn validate_region(region: String) -> Result<String, SupportError> {
        if !region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(SupportError::invalid_config(
                "AWS_REGION can only contain lowercase letters, numbers, and hyphens",
            ));
        }
        Ok(region)
    }

    /// Validates and normalizes the endpoint override.
    fn validate_endpoint_url(url: String) -> Result<String, SupportError> {
        let parsed = url::Url::parse(&url).map_err(|e| {
            SupportError::invalid_config(format!("AWS_ENDPOINT_URL_SUPPORT is not a valid URL: {e}"))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SupportError::invalid_config(
                "AWS_ENDPOINT_URL_SUPPORT must start with http:// or https://",
            ));
        }

        Ok(url.trim_end_matches('/').to_string())
    }
}

/// Source of the SDK configuration used to build the Support client.
///
/// Production code uses [`AwsConfigProvider`]; tests and local endpoints use
/// [`StaticConfigProvider`].
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Resolves region, credentials and endpoint into an SDK configuration.
    ///
    /// # Errors
    ///
    /// Returns `SupportError::Config` if credentials cannot be resolved.
    async fn load(&self) -> Result<SdkConfig, SupportError>;
}

/// Resolves configuration through the SDK's default provider chains.
#[derive(Debug, Clone, Default)]
pub struct AwsConfigProvider {
    config: Config,
}

impl AwsConfigProvider {
    /// Creates a provider honouring the given environment settings.
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConfigProvider for AwsConfigProvider {
    async fn load(&self) -> Result<SdkConfig, SupportError> {
        let region_provider = match &self.config.region {
            Some(region) => {
                RegionProviderChain::first_try(Region::new(region.clone())).or_else(DEFAULT_REGION)
            }
            None => RegionProviderChain::default_provider().or_else(DEFAULT_REGION),
        };

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .retry_config(RetryConfig::disabled());

        if let Some(profile) = &self.config.profile {
            loader = loader.profile_name(profile.clone());
        }
        if let Some(endpoint_url) = &self.config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url.clone());
        }

        let sdk_config = loader.load().await;

        verify_credentials(&sdk_config).await?;

        tracing::debug!(
            region = ?sdk_config.region(),
            profile = ?self.config.profile,
            "AWS configuration loaded"
        );

        Ok(sdk_config)
    }
}

/// Uses fixed credentials, region and endpoint.
#[derive(Debug, Clone)]
pub struct StaticConfigProvider {
    access_key_id: String,
    secret_access_key: String,
    region: String,
    endpoint_url: Option<String>,
}

impl StaticConfigProvider {
    /// Creates a provider with the given key pair, in the default region.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
        }
    }

    /// Sets the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Sends all requests to the given endpoint instead of the AWS one.
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }
}

#[async_trait]
impl ConfigProvider for StaticConfigProvider {
    async fn load(&self) -> Result<SdkConfig, SupportError> {
        if self.access_key_id.trim().is_empty() || self.secret_access_key.trim().is_empty() {
            return Err(SupportError::invalid_config(
                "static credentials must have a non-empty key pair",
            ));
        }

        let credentials = Credentials::new(
            self.access_key_id.clone(),
            self.secret_access_key.clone(),
            None,
            None,
            "static",
        );

        let mut builder = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .credentials_provider(SharedCredentialsProvider::new(credentials))
            .retry_config(RetryConfig::disabled());

        if let Some(endpoint_url) = &self.endpoint_url {
            builder = builder.endpoint_url(endpoint_url.clone());
        }

        Ok(builder.build())
    }
}

/// Resolves credentials once so a missing profile fails at startup rather
/// than on the first API call.
async fn verify_credentials(sdk_config: &SdkConfig) -> Result<(), SupportError> {
    let provider = sdk_config.credentials_provider().ok_or_else(|| {
        SupportError::invalid_config(
            "no AWS credentials provider available, make sure that AWS_PROFILE is set",
        )
    })?;

    provider.provide_credentials().await.map_err(|e| {
        SupportError::invalid_config(format!(
            "cannot load default configuration, make sure that AWS_PROFILE is set: {}",
            DisplayErrorContext(&e)
        ))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_empty_environment() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let config = Config::from_lookup(lookup(&[
            ("AWS_PROFILE", "dev"),
            ("AWS_REGION", "us-east-1"),
            ("AWS_ENDPOINT_URL_SUPPORT", "http://localhost:4566/"),
        ]))
        .unwrap();

        assert_eq!(config.profile.as_deref(), Some("dev"));
        assert_eq!(config.region.as_deref(), Some("us-east-1"));
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = Config::from_lookup(lookup(&[("AWS_PROFILE", "   ")])).unwrap();
        assert_eq!(config.profile, None);
    }

    #[test]
    fn test_validate_region_rejects_uppercase() {
        let result = Config::validate_region("US-EAST-1".to_string());
        assert!(result.unwrap_err().is_config());
    }

    #[test]
    fn test_validate_endpoint_url_requires_http_scheme() {
        assert!(Config::validate_endpoint_url("ftp://example.com".to_string()).is_err());
        assert!(Config::validate_endpoint_url("not a url".to_string()).is_err());
        assert!(Config::validate_endpoint_url("https://support.example.com".to_string()).is_ok());
    }

    #[tokio::test]
    async fn test_static_provider_builds_config() {
        let sdk_config = StaticConfigProvider::new("AKIDEXAMPLE", "secret")
            .with_region("us-west-2")
            .with_endpoint_url("http://127.0.0.1:9000")
            .load()
            .await
            .unwrap();

        assert_eq!(sdk_config.region().map(|r| r.as_ref()), Some("us-west-2"));
        assert_eq!(sdk_config.endpoint_url(), Some("http://127.0.0.1:9000"));
        assert!(sdk_config.credentials_provider().is_some());
    }

    #[tokio::test]
    async fn test_static_provider_credentials_pass_verification() {
        let sdk_config = StaticConfigProvider::new("AKIDEXAMPLE", "secret")
            .load()
            .await
            .unwrap();
        assert!(verify_credentials(&sdk_config).await.is_ok());
    }

    #[test]
    fn test_static_provider_rejects_empty_key_pair() {
        let result = tokio_test::block_on(StaticConfigProvider::new("", "secret").load());
        assert!(result.unwrap_err().is_config());
    }
}
