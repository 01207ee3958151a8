//! Port for class enrollment persistence.

use async_trait::async_trait;

use crate::domain::{ClassId, Enrollment, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by enrollment repository adapters.
    pub enum EnrollmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "enrollment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "enrollment repository query failed: {message}",
        /// The (class, student) pair is already enrolled.
        Duplicate { message: String } =>
            "enrollment already exists: {message}",
    }
}

/// Storage for class enrollments.
///
/// At most one enrollment exists per (class, student) pair; a second insert
/// fails with [`EnrollmentRepositoryError::Duplicate`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Whether `student_id` is already enrolled in `class_id`.
    async fn exists(
        &self,
        class_id: &ClassId,
        student_id: &UserId,
    ) -> Result<bool, EnrollmentRepositoryError>;

    /// Insert a new enrollment.
    async fn insert(&self, enrollment: &Enrollment) -> Result<(), EnrollmentRepositoryError>;

    /// Active enrollments of `class_id` in enrollment order.
    async fn list_active(
        &self,
        class_id: &ClassId,
    ) -> Result<Vec<Enrollment>, EnrollmentRepositoryError>;
}

/// Fixture implementation with no enrollments.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEnrollmentRepository;

#[async_trait]
impl EnrollmentRepository for FixtureEnrollmentRepository {
    async fn exists(
        &self,
        _class_id: &ClassId,
        _student_id: &UserId,
    ) -> Result<bool, EnrollmentRepositoryError> {
        Ok(false)
    }

    async fn insert(&self, _enrollment: &Enrollment) -> Result<(), EnrollmentRepositoryError> {
        Ok(())
    }

    async fn list_active(
        &self,
        _class_id: &ClassId,
    ) -> Result<Vec<Enrollment>, EnrollmentRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_repository_has_no_enrollments() {
        let repo = FixtureEnrollmentRepository;
        let class_id = ClassId::new("C1").expect("class id");
        assert!(
            !repo
                .exists(&class_id, &UserId::random())
                .await
                .expect("exists")
        );
        assert!(repo.list_active(&class_id).await.expect("list").is_empty());
    }
}
