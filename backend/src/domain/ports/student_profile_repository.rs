//! Port for student profile persistence.
//!
//! Profiles are keyed by the identity id issued by the identity provider and
//! carry the generated handle. Handles are unique across the store; the
//! repository reports a collision as [`StudentProfileRepositoryError::Duplicate`]
//! so the provisioning workflow can treat it as "already exists".

use async_trait::async_trait;

use crate::domain::{NewStudentProfile, StudentProfile, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by student profile repository adapters.
    pub enum StudentProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "profile repository query failed: {message}",
        /// A profile with the same id or handle already exists.
        Duplicate { message: String } =>
            "profile already exists: {message}",
        /// The store's access policy refused the write.
        PolicyRejected { message: String } =>
            "profile write rejected by access policy: {message}",
    }
}

/// Storage for student profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentProfileRepository: Send + Sync {
    /// Every stored handle that starts with `prefix`, compared literally.
    async fn handles_with_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<String>, StudentProfileRepositoryError>;

    /// Student profiles created by `teacher_id` with exactly `display_name`,
    /// oldest first.
    async fn find_students_by_display_name(
        &self,
        teacher_id: &UserId,
        display_name: &str,
    ) -> Result<Vec<StudentProfile>, StudentProfileRepositoryError>;

    /// Profile stored for `user_id`, if any.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StudentProfile>, StudentProfileRepositoryError>;

    /// Insert a new student profile.
    async fn insert(&self, profile: &NewStudentProfile)
    -> Result<(), StudentProfileRepositoryError>;
}

/// Fixture implementation backed by nothing.
///
/// Lookups come back empty and inserts are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStudentProfileRepository;

#[async_trait]
impl StudentProfileRepository for FixtureStudentProfileRepository {
    async fn handles_with_prefix(
        &self,
        _prefix: &str,
    ) -> Result<Vec<String>, StudentProfileRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_students_by_display_name(
        &self,
        _teacher_id: &UserId,
        _display_name: &str,
    ) -> Result<Vec<StudentProfile>, StudentProfileRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_user_id(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<StudentProfile>, StudentProfileRepositoryError> {
        Ok(None)
    }

    async fn insert(
        &self,
        _profile: &NewStudentProfile,
    ) -> Result<(), StudentProfileRepositoryError> {
        Ok(())
    }
}
