//! Configuration value types shared by the config loader and the binary.

pub mod validation;

pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
