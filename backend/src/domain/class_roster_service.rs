//! Class roster read model.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::class_access::authorize_class_owner;
use crate::domain::ports::{
    ClassRosterQuery, ClassroomRepository, EnrollmentRepository, EnrollmentRepositoryError,
    RosterEntry, StudentProfileRepository, StudentProfileRepositoryError,
};
use crate::domain::{ClassId, Error, UserId};

fn map_enrollment_error(error: EnrollmentRepositoryError) -> Error {
    Error::internal(format!("enrollment listing failed: {error}"))
}

fn map_profile_error(error: StudentProfileRepositoryError) -> Error {
    Error::internal(format!("student profile lookup failed: {error}"))
}

/// Roster service implementing [`ClassRosterQuery`].
pub struct ClassRosterService<C, P, E> {
    classrooms: Arc<C>,
    profiles: Arc<P>,
    enrollments: Arc<E>,
}

impl<C, P, E> ClassRosterService<C, P, E> {
    /// Create a roster service over the given repositories.
    pub fn new(classrooms: Arc<C>, profiles: Arc<P>, enrollments: Arc<E>) -> Self {
        Self {
            classrooms,
            profiles,
            enrollments,
        }
    }
}

#[async_trait]
impl<C, P, E> ClassRosterQuery for ClassRosterService<C, P, E>
where
    C: ClassroomRepository,
    P: StudentProfileRepository,
    E: EnrollmentRepository,
{
    async fn roster(
        &self,
        principal: &UserId,
        class_id: &ClassId,
    ) -> Result<Vec<RosterEntry>, Error> {
        authorize_class_owner(self.classrooms.as_ref(), class_id, principal).await?;

        let enrollments = self
            .enrollments
            .list_active(class_id)
            .await
            .map_err(map_enrollment_error)?;

        let mut entries = Vec::with_capacity(enrollments.len());
        for enrollment in enrollments {
            let Some(profile) = self
                .profiles
                .find_by_user_id(&enrollment.student_id)
                .await
                .map_err(map_profile_error)?
            else {
                warn!(
                    class_id = %class_id,
                    student_id = %enrollment.student_id,
                    "enrolled student has no profile; skipping"
                );
                continue;
            };
            entries.push(RosterEntry {
                user_id: profile.user_id,
                name: profile.display_name,
                username: profile.username,
                email: profile.email,
                initial_password: profile.initial_password,
                enrolled_at: enrollment.enrolled_at,
            });
        }
        Ok(entries)
    }
}
