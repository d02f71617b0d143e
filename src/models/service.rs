//! Service and category models for the AWS Support API.
//!
//! Services are what a case is opened against; each carries the categories
//! that a case against it may be filed under.

use serde::Serialize;

use crate::error::SupportError;

/// A sub-classification within a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Display name (e.g. "General guidance").
    pub name: String,

    /// Stable code sent with a create-case request.
    pub code: String,
}

impl Category {
    /// Creates a category.
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// A product area the support desk can open cases against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    /// Display name (e.g. "Support API").
    pub name: String,

    /// Stable service code (e.g. "support-api").
    pub code: String,

    /// Categories available for cases against this service.
    pub categories: Vec<Category>,
}

impl Service {
    /// Creates a service with its categories.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        categories: Vec<Category>,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            categories,
        }
    }

    /// Selects one of this service's categories.
    ///
    /// # Errors
    ///
    /// Returns `SupportError::CategoryNotFound` if no category matches.
    pub fn select_category(&self, selector: &CategorySelector) -> Result<&Category, SupportError> {
        let found = match selector {
            CategorySelector::Code(code) => self.categories.iter().find(|c| &c.code == code),
            CategorySelector::Position(index) => self.categories.get(*index),
        };

        found.ok_or_else(|| SupportError::category_not_found(&self.code, selector.to_string()))
    }
}

/// How the category for a new case is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySelector {
    /// The category with this code.
    Code(String),

    /// The category at this 0-based position in the service's list.
    Position(usize),
}

impl std::fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategorySelector::Code(code) => write!(f, "code {:?}", code),
            CategorySelector::Position(index) => write!(f, "position {}", index),
        }
    }
}

/// Sorts services by display name, ascending and case-sensitive.
///
/// The sort is stable, so services sharing a name keep the API's order.
pub fn sort_services(services: &mut [Service]) {
    services.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Finds the service with the given code.
///
/// # Errors
///
/// Returns `SupportError::ServiceNotFound` if no service has that code.
pub fn find_service<'a>(services: &'a [Service], code: &str) -> Result<&'a Service, SupportError> {
    services
        .iter()
        .find(|service| service.code == code)
        .ok_or_else(|| SupportError::service_not_found(code))
}
