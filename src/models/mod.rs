//! Data models for the AWS Support API.
//!
//! This module contains the local projections of the API's services,
//! categories and cases. They are built from SDK responses and never
//! persisted.

mod case;
mod service;

pub use case::*;
pub use service::*;
