//! Application Layer
//!
//! Contains the fetch and login use cases.
//! This layer depends on domain and infrastructure layers.

pub mod fetch;
pub mod login;

pub use fetch::{CredentialSource, FetchPlan, FetchService, FetchSummary};
pub use login::{LoginOutcome, LoginService, Prompter, TerminalPrompter};
