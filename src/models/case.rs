//! Case models for the AWS Support API.
//!
//! This module defines the create-case request, the case details returned
//! by a lookup, the resolution status, and the query used to look cases up.

use serde::Serialize;

use crate::error::SupportError;

/// Maximum length of a case communication body accepted by the API.
pub const MAX_COMMUNICATION_BODY_LEN: usize = 8000;

/// Maximum number of CC addresses on a case.
pub const MAX_CC_EMAIL_ADDRESSES: usize = 10;

/// Final status reported for a successfully resolved case.
pub const RESOLVED_STATUS: &str = "resolved";

/// Case severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// General guidance.
    #[default]
    Low,
    /// System impaired.
    Normal,
    /// Production system impaired.
    High,
    /// Production system down.
    Urgent,
    /// Business-critical system down.
    Critical,
}

impl Severity {
    /// Returns the severity code sent to the API.
    pub fn code(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Normal => "normal",
            Severity::High => "high",
            Severity::Urgent => "urgent",
            Severity::Critical => "critical",
        }
    }
}

/// Kind of issue a case is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    /// Technical support.
    #[default]
    Technical,
    /// Account and billing support.
    CustomerService,
}

impl IssueType {
    /// Returns the issue type value sent to the API.
    pub fn code(&self) -> &'static str {
        match self {
            IssueType::Technical => "technical",
            IssueType::CustomerService => "customer-service",
        }
    }
}

/// A case to be submitted with `CreateCase`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCase {
    /// Case title.
    pub subject: String,

    /// Initial communication describing the issue.
    pub communication_body: String,

    /// Code of the service the case is opened against.
    pub service_code: String,

    /// Code of a category belonging to that service.
    pub category_code: String,

    /// Severity level.
    pub severity: Severity,

    /// Issue type.
    pub issue_type: IssueType,

    /// Addresses copied on case correspondence.
    pub cc_email_addresses: Vec<String>,

    /// Language code for case correspondence (e.g. "en").
    pub language: String,
}

impl NewCase {
    /// Validates the request against the API's documented limits.
    ///
    /// # Errors
    ///
    /// Returns `SupportError::Validation` describing the first violated rule.
    pub fn validate(&self) -> Result<(), SupportError> {
        if self.subject.trim().is_empty() {
            return Err(SupportError::validation("subject is required"));
        }

        if self.service_code.trim().is_empty() {
            return Err(SupportError::validation("service code is required"));
        }

        if self.category_code.trim().is_empty() {
            return Err(SupportError::validation("category code is required"));
        }

        let body_len = self.communication_body.chars().count();
        if body_len == 0 || body_len > MAX_COMMUNICATION_BODY_LEN {
            return Err(SupportError::validation(format!(
                "communication body must be between 1 and {} characters, got {}",
                MAX_COMMUNICATION_BODY_LEN, body_len
            )));
        }

        if self.cc_email_addresses.len() > MAX_CC_EMAIL_ADDRESSES {
            return Err(SupportError::validation(format!(
                "at most {} CC email addresses are allowed, got {}",
                MAX_CC_EMAIL_ADDRESSES,
                self.cc_email_addresses.len()
            )));
        }

        if let Some(bad) = self.cc_email_addresses.iter().find(|a| !a.contains('@')) {
            return Err(SupportError::validation(format!(
                "invalid CC email address: {:?}",
                bad
            )));
        }

        Ok(())
    }
}

/// Case metadata returned by `DescribeCases`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDetails {
    /// Provider-assigned case id.
    pub case_id: String,

    /// Id shown in the support console.
    pub display_id: Option<String>,

    /// Case title.
    pub subject: Option<String>,

    /// Current status (e.g. "opened", "resolved").
    pub status: Option<String>,

    /// Service code.
    pub service_code: Option<String>,

    /// Category code.
    pub category_code: Option<String>,

    /// Severity code.
    pub severity_code: Option<String>,

    /// Account or user that submitted the case.
    pub submitted_by: Option<String>,

    /// Creation timestamp as reported by the API.
    pub time_created: Option<String>,

    /// Addresses copied on correspondence.
    pub cc_email_addresses: Vec<String>,

    /// Language code.
    pub language: Option<String>,
}

impl CaseDetails {
    /// Returns the subject if present, otherwise a placeholder.
    pub fn display_subject(&self) -> &str {
        self.subject.as_deref().unwrap_or("(no subject)")
    }
}

/// Outcome of a `ResolveCase` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionStatus {
    /// Status before the call.
    pub initial_case_status: Option<String>,

    /// Status after the call.
    pub final_case_status: Option<String>,
}

impl ResolutionStatus {
    /// Returns true if the case ended up resolved.
    pub fn is_resolved(&self) -> bool {
        self.final_case_status.as_deref() == Some(RESOLVED_STATUS)
    }
}

/// Parameters for `DescribeCases`.
///
/// Use the builder methods to narrow the lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseQuery {
    /// Case ids to look up.
    pub case_ids: Vec<String>,

    /// Console display id to look up.
    pub display_id: Option<String>,

    /// Only cases created after this ISO 8601 timestamp.
    pub after_time: Option<String>,

    /// Only cases created before this ISO 8601 timestamp.
    pub before_time: Option<String>,

    /// Whether resolved cases are returned.
    pub include_resolved_cases: bool,

    /// Whether recent communications are returned with each case.
    pub include_communications: bool,

    /// Language for the returned case data.
    pub language: Option<String>,

    /// Maximum number of cases to return.
    pub max_results: Option<i32>,
}

impl CaseQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for a single case id.
    pub fn by_id(case_id: impl Into<String>) -> Self {
        Self::new().with_case_id(case_id)
    }

    /// Adds a case id to look up.
    pub fn with_case_id(mut self, case_id: impl Into<String>) -> Self {
        self.case_ids.push(case_id.into());
        self
    }

    /// Looks up by console display id.
    pub fn with_display_id(mut self, display_id: impl Into<String>) -> Self {
        self.display_id = Some(display_id.into());
        self
    }

    /// Restricts to cases created after the given time.
    pub fn with_after_time(mut self, time: impl Into<String>) -> Self {
        self.after_time = Some(time.into());
        self
    }

    /// Restricts to cases created before the given time.
    pub fn with_before_time(mut self, time: impl Into<String>) -> Self {
        self.before_time = Some(time.into());
        self
    }

    /// Includes resolved cases.
    pub fn with_resolved_cases(mut self) -> Self {
        self.include_resolved_cases = true;
        self
    }

    /// Includes recent communications.
    pub fn with_communications(mut self) -> Self {
        self.include_communications = true;
        self
    }

    /// Sets the language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Describes what the query looks up: the case ids, or the display id
    /// when no case id is given.
    pub fn target(&self) -> String {
        if self.case_ids.is_empty() {
            self.display_id.clone().unwrap_or_default()
        } else {
            self.case_ids.join(",")
        }
    }

    /// Sets the maximum number of results (the API accepts 10 to 100).
    pub fn with_max_results(mut self, max_results: i32) -> Self {
        self.max_results = Some(max_results.clamp(10, 100));
        self
    }
}
