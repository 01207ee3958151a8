//! Port for class ownership lookups.

use async_trait::async_trait;

use crate::domain::{ClassId, Classroom, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by classroom repository adapters.
    pub enum ClassroomRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "classroom repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "classroom repository query failed: {message}",
    }
}

/// Read access to classes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClassroomRepository: Send + Sync {
    /// Fetch the class `class_id` only if `owner` is its teacher.
    ///
    /// Returns `Ok(None)` when the class does not exist, belongs to someone
    /// else, or `class_id` is not a well-formed store identifier.
    async fn find_owned(
        &self,
        class_id: &ClassId,
        owner: &UserId,
    ) -> Result<Option<Classroom>, ClassroomRepositoryError>;
}

/// Fixture implementation that knows no classes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureClassroomRepository;

#[async_trait]
impl ClassroomRepository for FixtureClassroomRepository {
    async fn find_owned(
        &self,
        _class_id: &ClassId,
        _owner: &UserId,
    ) -> Result<Option<Classroom>, ClassroomRepositoryError> {
        Ok(None)
    }
}
