//! Trait abstraction for the submission sink to enable mocking in tests
//!
//! The wizard produces one aggregate mapping; what happens to it is an
//! external concern behind this seam.

use crate::state::FormValues;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Proof of a delivered registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Where the registration ended up (a file path for the default sink)
    pub location: String,
    pub submitted_at: DateTime<Utc>,
}

/// Consumer of the final aggregate, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Deliver the completed registration
    async fn submit(&mut self, registration: &FormValues) -> Result<SubmissionReceipt>;
}
