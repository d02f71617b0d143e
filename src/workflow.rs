//! The support case workflow.
//!
//! `SupportCaseWorkflow` runs the whole program as a linear pipeline:
//! list services, pick one, open a case against it, look the case up and
//! resolve it. Each step's success is a precondition for the next, and the
//! first error ends the run.

use std::io::Write;

use serde::Serialize;

use crate::error::SupportError;
use crate::models::{
    find_service, sort_services, CaseDetails, CaseQuery, Category, CategorySelector, IssueType,
    NewCase, ResolutionStatus, Service, Severity,
};
use crate::support_client::SupportApi;

/// Service code cases are opened against by default.
pub const DEFAULT_SERVICE_CODE: &str = "support-api";

/// Category code used by default.
///
/// This is the code of the "General guidance" category, which the Support
/// API lists under most services, `support-api` included. Selecting by code
/// keeps the choice independent of the order `DescribeServices` returns
/// categories in; use `CategorySelector::Position` to pick by index instead.
pub const DEFAULT_CATEGORY_CODE: &str = "general-guidance";

/// Language used for service listing and case correspondence.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Subject of the test case.
///
/// Outside production the Support API only accepts cases with exactly this
/// subject, and handles them as test cases.
pub const TEST_CASE_SUBJECT: &str = "TEST CASE-Please ignore";

/// Body of the test case.
pub const TEST_CASE_BODY: &str = "This support case is created for AWS SDK development purposes.";

/// Width of the name column in the service listing.
const SERVICE_NAME_WIDTH: usize = 65;

/// Width of the name column in the category listing.
const CATEGORY_NAME_WIDTH: usize = 20;

/// The fixed inputs of a workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    /// Language for the service listing and the case.
    pub language: String,

    /// Code of the service to open the case against.
    pub service_code: String,

    /// Which of the service's categories to file the case under.
    pub category: CategorySelector,

    /// Case subject.
    pub subject: String,

    /// Case communication body.
    pub communication_body: String,

    /// Case severity.
    pub severity: Severity,

    /// Case issue type.
    pub issue_type: IssueType,

    /// Addresses copied on the case.
    pub cc_email_addresses: Vec<String>,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            service_code: DEFAULT_SERVICE_CODE.to_string(),
            category: CategorySelector::Code(DEFAULT_CATEGORY_CODE.to_string()),
            subject: TEST_CASE_SUBJECT.to_string(),
            communication_body: TEST_CASE_BODY.to_string(),
            severity: Severity::Low,
            issue_type: IssueType::Technical,
            cc_email_addresses: Vec::new(),
        }
    }
}

impl WorkflowSettings {
    /// Sets the service code.
    pub fn with_service_code(mut self, code: impl Into<String>) -> Self {
        self.service_code = code.into();
        self
    }

    /// Sets the category selector.
    pub fn with_category(mut self, category: CategorySelector) -> Self {
        self.category = category;
        self
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseOutcome {
    /// The service the case was opened against.
    pub service: Service,

    /// The category the case was filed under.
    pub category: Category,

    /// Provider-assigned case id.
    pub case_id: String,

    /// Case metadata from the confirmation lookup.
    pub details: CaseDetails,

    /// Result of resolving the case.
    pub resolution: ResolutionStatus,
}

/// Runs the open/inspect/resolve sequence against a [`SupportApi`].
pub struct SupportCaseWorkflow<A> {
    api: A,
    settings: WorkflowSettings,
}

impl<A: SupportApi> SupportCaseWorkflow<A> {
    /// Creates a workflow over the given API.
    pub fn new(api: A, settings: WorkflowSettings) -> Self {
        Self { api, settings }
    }

    /// Lists all services, sorted by name.
    pub async fn list_services(&self) -> Result<Vec<Service>, SupportError> {
        let mut services = self.api.describe_services(&self.settings.language).await?;
        sort_services(&mut services);
        Ok(services)
    }

    /// Builds the case request for the given service, returning the
    /// selected category alongside it.
    ///
    /// # Errors
    ///
    /// Returns `SupportError::CategoryNotFound` if the configured category is
    /// not part of the service.
    pub fn build_case(&self, service: &Service) -> Result<(Category, NewCase), SupportError> {
        let category = service.select_category(&self.settings.category)?.clone();

        let case = NewCase {
            subject: self.settings.subject.clone(),
            communication_body: self.settings.communication_body.clone(),
            service_code: service.code.clone(),
            category_code: category.code.clone(),
            severity: self.settings.severity,
            issue_type: self.settings.issue_type,
            cc_email_addresses: self.settings.cc_email_addresses.clone(),
            language: self.settings.language.clone(),
        };

        Ok((category, case))
    }

    /// Opens the case and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `SupportError::Validation` without calling the API if the
    /// request breaks an API limit.
    pub async fn create_case(&self, case: &NewCase) -> Result<String, SupportError> {
        case.validate()?;
        self.api.create_case(case).await
    }

    /// Looks a single case up by id.
    ///
    /// # Errors
    ///
    /// Returns `SupportError::CaseNotFound` if the API returns no case with that id.
    pub async fn describe_case(&self, case_id: &str) -> Result<CaseDetails, SupportError> {
        let cases = self.api.describe_cases(&CaseQuery::by_id(case_id)).await?;

        cases
            .into_iter()
            .find(|case| case.case_id == case_id)
            .ok_or_else(|| SupportError::case_not_found(case_id))
    }

    /// Resolves the case.
    ///
    /// # Errors
    ///
    /// Returns `SupportError::Api` if the call fails or the case does not
    /// end up resolved.
    pub async fn resolve_case(&self, case_id: &str) -> Result<ResolutionStatus, SupportError> {
        let status = self.api.resolve_case(case_id).await?;

        if !status.is_resolved() {
            return Err(SupportError::api(
                "resolve case",
                None,
                format!(
                    "case {} ended in status {:?}",
                    case_id,
                    status.final_case_status.as_deref().unwrap_or("unknown")
                ),
            ));
        }

        Ok(status)
    }

    /// Runs the whole sequence, writing the listing and response dumps to `out`.
    ///
    /// A case that was created but not resolved because a later step failed
    /// is left open; its id is logged.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<CaseOutcome, SupportError> {
        tracing::info!(language = %self.settings.language, "Describing services");
        let services = self.list_services().await?;
        out.write_all(render_services(&services).as_bytes())?;

        let service = find_service(&services, &self.settings.service_code)?;
        out.write_all(render_selection(service).as_bytes())?;

        let (category, case) = self.build_case(service)?;
        tracing::info!(
            service_code = %case.service_code,
            category_code = %case.category_code,
            "Creating support case"
        );
        let case_id = self.create_case(&case).await?;
        tracing::info!(case_id = %case_id, "Support case created");

        match self.inspect_and_resolve(&case_id, out).await {
            Ok((details, resolution)) => Ok(CaseOutcome {
                service: service.clone(),
                category,
                case_id,
                details,
                resolution,
            }),
            Err(e) => {
                tracing::warn!(case_id = %case_id, "Support case left open after failure");
                Err(e)
            }
        }
    }

    async fn inspect_and_resolve<W: Write>(
        &self,
        case_id: &str,
        out: &mut W,
    ) -> Result<(CaseDetails, ResolutionStatus), SupportError> {
        tracing::info!(case_id = %case_id, "Describing support case");
        let details = self.describe_case(case_id).await?;
        writeln!(out, "{}", serde_json::to_string_pretty(&details)?)?;

        tracing::info!(case_id = %case_id, "Resolving support case");
        let resolution = self.resolve_case(case_id).await?;
        writeln!(out, "{}", serde_json::to_string_pretty(&resolution)?)?;
        tracing::info!(case_id = %case_id, "Support case resolved");

        Ok((details, resolution))
    }
}

/// Renders the service listing, one `"name": code` line per service.
pub fn render_services(services: &[Service]) -> String {
    services
        .iter()
        .map(|s| {
            format!(
                "{:<width$}: {}\n",
                format!("{:?}", s.name),
                s.code,
                width = SERVICE_NAME_WIDTH
            )
        })
        .collect()
}

/// Renders the chosen service followed by its categories.
pub fn render_selection(service: &Service) -> String {
    let mut text = String::new();
    text.push('\n');
    text.push_str("The service for which the support case will be created (name: code):\n");
    text.push_str(&format!("{:?}: {}\n", service.name, service.code));
    text.push('\n');
    text.push_str("Categories of the service (name: code):\n");
    for category in &service.categories {
        text.push_str(&format!(
            "{:<width$}: {}\n",
            format!("{:?}", category.name),
            category.code,
            width = CATEGORY_NAME_WIDTH
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// In-memory Support API that records every call.
    #[derive(Default)]
    struct FakeSupport {
        services: Vec<Service>,
        fail_create: bool,
        fail_describe: bool,
        final_status: Option<String>,
        calls: Mutex<Vec<String>>,
        created: Mutex<Option<NewCase>>,
    }

    impl FakeSupport {
        fn with_services(services: Vec<Service>) -> Self {
            Self {
                services,
                final_status: Some("resolved".to_string()),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }
    }

    #[async_trait]
    impl SupportApi for FakeSupport {
        async fn describe_services(&self, _language: &str) -> Result<Vec<Service>, SupportError> {
            self.record("describe_services");
            Ok(self.services.clone())
        }

        async fn create_case(&self, case: &NewCase) -> Result<String, SupportError> {
            self.record("create_case");
            if self.fail_create {
                return Err(SupportError::api(
                    "create case",
                    Some("InternalServerError".to_string()),
                    "simulated failure",
                ));
            }
            *self.created.lock().unwrap() = Some(case.clone());
            Ok("case-12345678910-2013-c4c1d2bf33c5cf47".to_string())
        }

        async fn describe_cases(
            &self,
            query: &CaseQuery,
        ) -> Result<Vec<CaseDetails>, SupportError> {
            self.record("describe_cases");
            if self.fail_describe {
                return Err(SupportError::api("describe case", None, "simulated failure"));
            }
            Ok(query
                .case_ids
                .iter()
                .map(|id| CaseDetails {
                    case_id: id.clone(),
                    status: Some("opened".to_string()),
                    ..CaseDetails::default()
                })
                .collect())
        }

        async fn resolve_case(&self, _case_id: &str) -> Result<ResolutionStatus, SupportError> {
            self.record("resolve_case");
            Ok(ResolutionStatus {
                initial_case_status: Some("opened".to_string()),
                final_case_status: self.final_status.clone(),
            })
        }
    }

    fn support_api_service() -> Service {
        Service::new(
            "Support API",
            "support-api",
            vec![
                Category::new("A", "a"),
                Category::new("B", "b"),
                Category::new("C", "c"),
                Category::new("D", "d"),
            ],
        )
    }

    fn by_position() -> WorkflowSettings {
        WorkflowSettings::default().with_category(CategorySelector::Position(3))
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let fake = FakeSupport::with_services(vec![
            Service::new("Elastic Compute Cloud (EC2 - Linux)", "amazon-ec2-linux", vec![]),
            support_api_service(),
            Service::new("Account", "account", vec![]),
        ]);
        let workflow = SupportCaseWorkflow::new(fake, by_position());

        let mut out = Vec::new();
        let outcome = workflow.run(&mut out).await.unwrap();

        assert_eq!(outcome.case_id, "case-12345678910-2013-c4c1d2bf33c5cf47");
        assert_eq!(outcome.category.code, "d");
        assert_eq!(
            outcome.resolution.final_case_status.as_deref(),
            Some("resolved")
        );

        let created = workflow.api.created.lock().unwrap().clone().unwrap();
        assert_eq!(created.service_code, "support-api");
        assert_eq!(created.category_code, "d");
        assert_eq!(created.subject, TEST_CASE_SUBJECT);
        assert_eq!(created.language, "en");

        assert_eq!(
            workflow.api.calls(),
            ["describe_services", "create_case", "describe_cases", "resolve_case"]
        );

        let text = String::from_utf8(out).unwrap();
        let account = text.find("\"Account\"").unwrap();
        let ec2 = text.find("\"Elastic Compute Cloud").unwrap();
        assert!(account < ec2);
        assert!(text.contains("\"finalCaseStatus\": \"resolved\""));
    }

    #[tokio::test]
    async fn test_run_selects_category_by_code() {
        let fake = FakeSupport::with_services(vec![support_api_service()]);
        let settings = WorkflowSettings::default().with_category(CategorySelector::Code("b".into()));
        let workflow = SupportCaseWorkflow::new(fake, settings);

        let outcome = workflow.run(&mut Vec::new()).await.unwrap();
        assert_eq!(outcome.category.name, "B");
    }

    #[tokio::test]
    async fn test_run_empty_service_list() {
        let fake = FakeSupport::with_services(vec![]);
        let workflow = SupportCaseWorkflow::new(fake, by_position());

        let err = workflow.run(&mut Vec::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "service not found: support-api");
        assert_eq!(workflow.api.calls(), ["describe_services"]);
    }

    #[tokio::test]
    async fn test_run_non_matching_service_list() {
        let fake = FakeSupport::with_services(vec![Service::new("Account", "account", vec![])]);
        let workflow = SupportCaseWorkflow::new(fake, by_position());

        let err = workflow.run(&mut Vec::new()).await.unwrap_err();
        assert!(matches!(err, SupportError::ServiceNotFound { .. }));
    }

    #[tokio::test]
    async fn test_run_category_out_of_range() {
        let fake = FakeSupport::with_services(vec![Service::new(
            "Support API",
            "support-api",
            vec![Category::new("A", "a")],
        )]);
        let workflow = SupportCaseWorkflow::new(fake, by_position());

        let err = workflow.run(&mut Vec::new()).await.unwrap_err();
        assert!(matches!(err, SupportError::CategoryNotFound { .. }));
        assert_eq!(workflow.api.calls(), ["describe_services"]);
    }

    #[tokio::test]
    async fn test_create_failure_stops_run() {
        let fake = FakeSupport {
            fail_create: true,
            ..FakeSupport::with_services(vec![support_api_service()])
        };
        let workflow = SupportCaseWorkflow::new(fake, by_position());

        let err = workflow.run(&mut Vec::new()).await.unwrap_err();
        assert_eq!(err.api_code(), Some("InternalServerError"));
        assert_eq!(workflow.api.calls(), ["describe_services", "create_case"]);
    }

    #[tokio::test]
    async fn test_describe_failure_skips_resolve() {
        let fake = FakeSupport {
            fail_describe: true,
            ..FakeSupport::with_services(vec![support_api_service()])
        };
        let workflow = SupportCaseWorkflow::new(fake, by_position());

        assert!(workflow.run(&mut Vec::new()).await.is_err());
        assert_eq!(
            workflow.api.calls(),
            ["describe_services", "create_case", "describe_cases"]
        );
    }

    #[tokio::test]
    async fn test_resolve_must_end_resolved() {
        let fake = FakeSupport {
            final_status: Some("opened".to_string()),
            ..FakeSupport::with_services(vec![support_api_service()])
        };
        let workflow = SupportCaseWorkflow::new(fake, by_position());

        let err = workflow.resolve_case("case-1").await.unwrap_err();
        assert!(err.to_string().contains("opened"));
    }

    #[test]
    fn test_describe_case_not_returned() {
        struct NoCases;

        #[async_trait]
        impl SupportApi for NoCases {
            async fn describe_services(&self, _: &str) -> Result<Vec<Service>, SupportError> {
                Ok(vec![])
            }
            async fn create_case(&self, _: &NewCase) -> Result<String, SupportError> {
                Ok(String::new())
            }
            async fn describe_cases(&self, _: &CaseQuery) -> Result<Vec<CaseDetails>, SupportError> {
                Ok(vec![])
            }
            async fn resolve_case(&self, _: &str) -> Result<ResolutionStatus, SupportError> {
                Ok(ResolutionStatus::default())
            }
        }

        let workflow = SupportCaseWorkflow::new(NoCases, WorkflowSettings::default());
        let err = tokio_test::block_on(workflow.describe_case("case-1")).unwrap_err();
        assert!(matches!(err, SupportError::CaseNotFound { ref id } if id == "case-1"));
    }

    #[tokio::test]
    async fn test_create_case_rejects_invalid_settings() {
        let settings = WorkflowSettings {
            subject: String::new(),
            ..by_position()
        };
        let workflow = SupportCaseWorkflow::new(FakeSupport::default(), settings);

        let (category, case) = workflow.build_case(&support_api_service()).unwrap();
        assert_eq!(category.code, "d");

        let err = workflow.create_case(&case).await.unwrap_err();
        assert!(matches!(err, SupportError::Validation(_)));
        assert!(workflow.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_run_with_other_service_code() {
        let fake = FakeSupport::with_services(vec![
            support_api_service(),
            Service::new(
                "Account",
                "account",
                vec![Category::new("Billing", "billing")],
            ),
        ]);
        let settings = WorkflowSettings::default()
            .with_service_code("account")
            .with_category(CategorySelector::Code("billing".into()));
        let workflow = SupportCaseWorkflow::new(fake, settings);

        let outcome = workflow.run(&mut Vec::new()).await.unwrap();
        assert_eq!(outcome.service.code, "account");

        let created = workflow.api.created.lock().unwrap().clone().unwrap();
        assert_eq!(created.service_code, "account");
        assert_eq!(created.category_code, "billing");
    }

    #[test]
    fn test_default_settings_select_category_by_code() {
        let settings = WorkflowSettings::default();
        assert_eq!(settings.service_code, DEFAULT_SERVICE_CODE);
        assert_eq!(
            settings.category,
            CategorySelector::Code(DEFAULT_CATEGORY_CODE.to_string())
        );
    }

    #[test]
    fn test_render_services() {
        let services = vec![Service::new("Account", "account", vec![])];
        let expected = format!("{:<65}: account\n", "\"Account\"");
        assert_eq!(render_services(&services), expected);
    }

    #[test]
    fn test_render_selection() {
        let service = Service::new(
            "Support API",
            "support-api",
            vec![Category::new("General guidance", "general-guidance")],
        );
        let expected = "\n\
            The service for which the support case will be created (name: code):\n\
            \"Support API\": support-api\n\
            \n\
            Categories of the service (name: code):\n\
            \"General guidance\"  : general-guidance\n";
        assert_eq!(render_selection(&service), expected);
    }
}
