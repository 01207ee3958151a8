//! Driving port for bulk student provisioning.

use async_trait::async_trait;

use crate::domain::{BatchEnrollmentReport, BatchEnrollmentRequest, Error};

/// Provision and enroll a batch of students into one class.
///
/// Fails as a whole only for authorization and store-wide problems; every
/// per-row problem is reported inside the returned report.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BatchEnrollmentCommand: Send + Sync {
    /// Process every row of `request` in order.
    async fn enroll_batch(
        &self,
        request: BatchEnrollmentRequest,
    ) -> Result<BatchEnrollmentReport, Error>;
}
