//! # support-case
//!
//! Opens a test case with the AWS Support API, looks it up and resolves it.
//!
//! ## Workflow
//!
//! 1. Resolve AWS credentials and region from the environment
//! 2. List the support services (sorted by name) and pick one by code
//! 3. Print the service and its categories
//! 4. Create a case against the service under one of its categories
//! 5. Describe the case by its id
//! 6. Resolve the case
//!
//! Every step depends on the previous one and the first failure ends the run.
//! There is no retry: SDK retries are disabled.
//!
//! ## Architecture
//!
//! - [`config`] - AWS environment settings and the injectable `ConfigProvider`
//! - [`error`] - The `SupportError` type
//! - [`models`] - Services, categories and cases
//! - [`support_client`] - The `SupportApi` trait and its AWS SDK implementation
//! - [`workflow`] - The open/inspect/resolve pipeline and console rendering
//!
//! ## Configuration
//!
//! Only the standard AWS variables are honoured, all optional:
//!
//! - `AWS_PROFILE`: Named profile to load credentials from
//! - `AWS_REGION`: Region (defaults to `us-east-1`)
//! - `AWS_ENDPOINT_URL_SUPPORT`: Endpoint override
//! - `RUST_LOG`: Log level (e.g., `support_case=debug`)
//!
//! ## Example
//!
//! ```ignore
//! use support_case::config::{AwsConfigProvider, Config};
//! use support_case::support_client::SupportClient;
//! use support_case::workflow::{SupportCaseWorkflow, WorkflowSettings};
//!
//! async fn example() -> Result<(), support_case::error::SupportError> {
//!     let provider = AwsConfigProvider::new(Config::from_env()?);
//!     let client = SupportClient::connect(&provider).await?;
//!
//!     let workflow = SupportCaseWorkflow::new(client, WorkflowSettings::default());
//!     let outcome = workflow.run(&mut std::io::stdout()).await?;
//!     println!("resolved {}", outcome.case_id);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod models;
pub mod support_client;
pub mod workflow;
