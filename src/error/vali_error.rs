//! The error returned by [`parse`](crate::parse).

use thiserror::Error;

use super::Issues;

/// Raised by the `parse` entry points when validation recorded any issue.
///
/// The error displays the first issue's message and keeps the complete list
/// for callers that want every detail.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", .issues.first().message)]
pub struct ValiError {
    /// Every issue recorded while validating, in order.
    pub issues: Issues,
}

impl ValiError {
    /// Wraps an issue list.
    pub fn new(issues: Issues) -> Self {
        Self { issues }
    }

    /// Returns the recorded issues.
    pub fn issues(&self) -> &Issues {
        &self.issues
    }

    /// Consumes the error, returning the recorded issues.
    pub fn into_issues(self) -> Issues {
        self.issues
    }
}

impl From<Issues> for ValiError {
    fn from(issues: Issues) -> Self {
        Self::new(issues)
    }
}
