//! Client for the AWS Support API.
//!
//! This module defines the `SupportApi` trait the workflow talks to and
//! `SupportClient`, its implementation on top of `aws-sdk-support`.
//!
//! SDK errors are converted into `SupportError::Api` here using the service
//! error code and message, so nothing above this layer sees SDK types.
//! Retries are disabled in the SDK configuration: every failure surfaces
//! on the first attempt.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_support::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_support::types;
use aws_sdk_support::Client;

use crate::config::ConfigProvider;
use crate::error::{codes, SupportError};
use crate::models::{CaseDetails, CaseQuery, Category, NewCase, ResolutionStatus, Service};

/// Remote operations consumed by the workflow.
///
/// Implemented by [`SupportClient`] against AWS, and by in-memory fakes in tests.
#[async_trait]
pub trait SupportApi: Send + Sync {
    /// Lists the services cases can be opened against, in API order.
    async fn describe_services(&self, language: &str) -> Result<Vec<Service>, SupportError>;

    /// Opens a case and returns its id.
    async fn create_case(&self, case: &NewCase) -> Result<String, SupportError>;

    /// Looks cases up.
    async fn describe_cases(&self, query: &CaseQuery) -> Result<Vec<CaseDetails>, SupportError>;

    /// Resolves a case.
    async fn resolve_case(&self, case_id: &str) -> Result<ResolutionStatus, SupportError>;
}

/// AWS Support API client.
///
/// # Example
///
/// ```ignore
/// let provider = AwsConfigProvider::new(Config::from_env()?);
/// let client = SupportClient::connect(&provider).await?;
///
/// let services = client.describe_services("en").await?;
/// ```
#[derive(Clone)]
pub struct SupportClient {
    /// The underlying SDK client (cloning is cheap).
    inner: Client,
}

impl SupportClient {
    /// Creates a client from a resolved SDK configuration.
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            inner: Client::new(sdk_config),
        }
    }

    /// Loads configuration from the provider and creates a client.
    ///
    /// # Errors
    ///
    /// Returns `SupportError::Config` if the provider cannot resolve credentials.
    pub async fn connect(provider: &dyn ConfigProvider) -> Result<Self, SupportError> {
        let sdk_config = provider.load().await?;
        Ok(Self::new(&sdk_config))
    }
}

#[async_trait]
impl SupportApi for SupportClient {
    async fn describe_services(&self, language: &str) -> Result<Vec<Service>, SupportError> {
        tracing::debug!(language = %language, "DescribeServices");

        let output = self
            .inner
            .describe_services()
            .language(language)
            .send()
            .await
            .map_err(|e| api_error("describe services", e))?;

        Ok(output.services().iter().map(service_from_sdk).collect())
    }

    async fn create_case(&self, case: &NewCase) -> Result<String, SupportError> {
        tracing::debug!(
            service_code = %case.service_code,
            category_code = %case.category_code,
            severity = case.severity.code(),
            "CreateCase"
        );

        let output = self
            .inner
            .create_case()
            .subject(&case.subject)
            .communication_body(&case.communication_body)
            .service_code(&case.service_code)
            .category_code(&case.category_code)
            .severity_code(case.severity.code())
            .issue_type(case.issue_type.code())
            .language(&case.language)
            .set_cc_email_addresses(Some(case.cc_email_addresses.clone()))
            .send()
            .await
            .map_err(|e| api_error("create case", e))?;

        output
            .case_id()
            .map(str::to_string)
            .ok_or_else(|| SupportError::api("create case", None, "response carried no case id"))
    }

    async fn describe_cases(&self, query: &CaseQuery) -> Result<Vec<CaseDetails>, SupportError> {
        tracing::debug!(case_ids = ?query.case_ids, "DescribeCases");

        let mut request = self
            .inner
            .describe_cases()
            .include_resolved_cases(query.include_resolved_cases)
            .include_communications(query.include_communications)
            .set_display_id(query.display_id.clone())
            .set_after_time(query.after_time.clone())
            .set_before_time(query.before_time.clone())
            .set_language(query.language.clone())
            .set_max_results(query.max_results);

        if !query.case_ids.is_empty() {
            request = request.set_case_id_list(Some(query.case_ids.clone()));
        }

        let output = request.send().await.map_err(|e| {
            let err = api_error("describe case", e);
            not_found_for(err, &query.target())
        })?;

        Ok(output.cases().iter().map(case_from_sdk).collect())
    }

    async fn resolve_case(&self, case_id: &str) -> Result<ResolutionStatus, SupportError> {
        tracing::debug!(case_id = %case_id, "ResolveCase");

        let output = self
            .inner
            .resolve_case()
            .case_id(case_id)
            .send()
            .await
            .map_err(|e| {
                let err = api_error("resolve case", e);
                not_found_for(err, case_id)
            })?;

        Ok(ResolutionStatus {
            initial_case_status: output.initial_case_status().map(str::to_string),
            final_case_status: output.final_case_status().map(str::to_string),
        })
    }
}

/// Converts an SDK error into `SupportError::Api`.
fn api_error<E, R>(operation: &str, err: SdkError<E, R>) -> SupportError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().map(str::to_string);
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());

    tracing::debug!(operation = operation, code = ?code, "Support API call failed");

    SupportError::api(operation, code, message)
}

/// Turns a `CaseIdNotFound` API error into `SupportError::CaseNotFound`.
fn not_found_for(err: SupportError, target: &str) -> SupportError {
    if err.api_code() == Some(codes::CASE_ID_NOT_FOUND) {
        SupportError::case_not_found(target)
    } else {
        err
    }
}

fn service_from_sdk(service: &types::Service) -> Service {
    Service {
        name: service.name().unwrap_or_default().to_string(),
        code: service.code().unwrap_or_default().to_string(),
        categories: service
            .categories()
            .iter()
            .map(|c| Category {
                name: c.name().unwrap_or_default().to_string(),
                code: c.code().unwrap_or_default().to_string(),
            })
            .collect(),
    }
}

fn case_from_sdk(case: &types::CaseDetails) -> CaseDetails {
    CaseDetails {
        case_id: case.case_id().unwrap_or_default().to_string(),
        display_id: case.display_id().map(str::to_string),
        subject: case.subject().map(str::to_string),
        status: case.status().map(str::to_string),
        service_code: case.service_code().map(str::to_string),
        category_code: case.category_code().map(str::to_string),
        severity_code: case.severity_code().map(str::to_string),
        submitted_by: case.submitted_by().map(str::to_string),
        time_created: case.time_created().map(str::to_string),
        cc_email_addresses: case.cc_email_addresses().to_vec(),
        language: case.language().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_from_sdk_maps_categories() {
        let sdk_service = types::Service::builder()
            .name("Support API")
            .code("support-api")
            .categories(
                types::Category::builder()
                    .name("General guidance")
                    .code("general-guidance")
                    .build(),
            )
            .build();

        let service = service_from_sdk(&sdk_service);
        assert_eq!(service.code, "support-api");
        assert_eq!(service.categories.len(), 1);
        assert_eq!(service.categories[0].code, "general-guidance");
    }

    #[test]
    fn test_service_from_sdk_missing_fields() {
        let service = service_from_sdk(&types::Service::builder().build());
        assert_eq!(service.name, "");
        assert!(service.categories.is_empty());
    }

    #[test]
    fn test_case_from_sdk() {
        let sdk_case = types::CaseDetails::builder()
            .case_id("case-12345678910-2013-c4c1d2bf33c5cf47")
            .status("opened")
            .cc_email_addresses("ops@example.com")
            .build();

        let case = case_from_sdk(&sdk_case);
        assert_eq!(case.case_id, "case-12345678910-2013-c4c1d2bf33c5cf47");
        assert_eq!(case.status.as_deref(), Some("opened"));
        assert_eq!(case.cc_email_addresses, ["ops@example.com"]);
        assert_eq!(case.subject, None);
    }

    #[test]
    fn test_not_found_for_maps_case_id_not_found() {
        let err = SupportError::api(
            "resolve case",
            Some(codes::CASE_ID_NOT_FOUND.to_string()),
            "no such case",
        );
        let mapped = not_found_for(err, "case-1");
        assert!(matches!(mapped, SupportError::CaseNotFound { ref id } if id == "case-1"));
    }

    #[test]
    fn test_not_found_for_keeps_other_errors() {
        let err = SupportError::api("resolve case", Some("InternalServerError".to_string()), "boom");
        assert!(matches!(
            not_found_for(err, "case-1"),
            SupportError::Api { .. }
        ));
    }
}
