//! Bulk student provisioning service.
//!
//! Implements [`BatchEnrollmentCommand`]: authorize once, then for each row
//! in order resolve or create a student account and enroll it. Rows never
//! run concurrently. A panic raised while handling one row is contained to
//! that row.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use mockable::Clock;
use tracing::{debug, error, info, warn};

use crate::domain::class_access::authorize_class_owner;
use crate::domain::ports::{
    BatchEnrollmentCommand, ClassroomRepository, EnrollmentRepository, EnrollmentRepositoryError,
    IdentityProvider, StudentProfileRepository, StudentProfileRepositoryError,
};
use crate::domain::{
    BatchEnrollmentReport, BatchEnrollmentRequest, ClassId, EXISTING_USER_PASSWORD, Enrollment,
    EnrollmentFailure, EnrollmentSuccess, Error, Handle, IdentityRecord, InitialPassword,
    NewIdentity, NewStudentProfile, PASSWORD_UNAVAILABLE, ProvisioningPolicy, StudentFailure,
    StudentOutcome, StudentRow, UserId, base_handle, metadata_initial_password, next_handle,
};

/// Message returned when the handle prefix scan fails.
pub const USERNAME_SCAN_FAILED_MESSAGE: &str = "Failed to check existing usernames";

/// How processing a single row ended without success.
#[derive(Debug)]
enum RowError {
    /// Recorded against the row; the batch continues.
    Student(StudentFailure),
    /// Fails the whole batch.
    Abort(Error),
}

impl From<StudentFailure> for RowError {
    fn from(value: StudentFailure) -> Self {
        Self::Student(value)
    }
}

/// Account a row resolved to, before enrollment.
struct StudentAccount {
    user_id: UserId,
    username: Handle,
    password: String,
}

/// Store and identity collaborators used by [`BatchEnrollmentService`].
pub struct BatchEnrollmentPorts<C, P, E, I> {
    pub classrooms: Arc<C>,
    pub profiles: Arc<P>,
    pub enrollments: Arc<E>,
    pub identities: Arc<I>,
}

impl<C, P, E, I> Clone for BatchEnrollmentPorts<C, P, E, I> {
    fn clone(&self) -> Self {
        Self {
            classrooms: Arc::clone(&self.classrooms),
            profiles: Arc::clone(&self.profiles),
            enrollments: Arc::clone(&self.enrollments),
            identities: Arc::clone(&self.identities),
        }
    }
}

/// Batch enrollment service implementing [`BatchEnrollmentCommand`].
#[derive(Clone)]
pub struct BatchEnrollmentService<C, P, E, I> {
    ports: BatchEnrollmentPorts<C, P, E, I>,
    clock: Arc<dyn Clock>,
    policy: ProvisioningPolicy,
}

impl<C, P, E, I> BatchEnrollmentService<C, P, E, I>
where
    C: ClassroomRepository,
    P: StudentProfileRepository,
    E: EnrollmentRepository,
    I: IdentityProvider,
{
    /// Create a service over the given ports.
    pub fn new(
        ports: BatchEnrollmentPorts<C, P, E, I>,
        clock: Arc<dyn Clock>,
        policy: ProvisioningPolicy,
    ) -> Self {
        Self {
            ports,
            clock,
            policy,
        }
    }

    async fn process_row(
        &self,
        principal: &UserId,
        class_id: &ClassId,
        row: &StudentRow,
    ) -> Result<EnrollmentSuccess, RowError> {
        let name = row.display_name().ok_or(StudentFailure::NameRequired)?;

        let account = match self.find_existing(principal, name).await? {
            Some(account) => account,
            None => self.create_account(principal, name, row).await?,
        };

        self.enroll(class_id, &account.user_id).await?;

        Ok(EnrollmentSuccess {
            name: name.to_owned(),
            username: account.username,
            password: account.password,
            user_id: account.user_id,
        })
    }

    async fn find_existing(
        &self,
        principal: &UserId,
        name: &str,
    ) -> Result<Option<StudentAccount>, StudentFailure> {
        let matches = self
            .ports
            .profiles
            .find_students_by_display_name(principal, name)
            .await
            .map_err(|err| {
                warn!(error = %err, "existing student lookup failed");
                StudentFailure::LookupFailed
            })?;

        Ok(matches.into_iter().next().map(|profile| {
            debug!(user_id = %profile.user_id, "reusing existing student account");
            StudentAccount {
                user_id: profile.user_id,
                username: profile.username,
                password: EXISTING_USER_PASSWORD.to_owned(),
            }
        }))
    }

    async fn allocate_handle(&self, name: &str) -> Result<Handle, RowError> {
        let base = base_handle(name).ok_or(StudentFailure::NameRequired)?;
        let taken = self
            .ports
            .profiles
            .handles_with_prefix(&base)
            .await
            .map_err(|err| {
                error!(error = %err, base = %base, "username prefix scan failed");
                RowError::Abort(Error::upstream_failure(USERNAME_SCAN_FAILED_MESSAGE))
            })?;
        Ok(next_handle(&base, &taken))
    }

    async fn create_account(
        &self,
        principal: &UserId,
        name: &str,
        row: &StudentRow,
    ) -> Result<StudentAccount, RowError> {
        let handle = self.allocate_handle(name).await?;
        let email = row.contact_override().map_or_else(
            || {
                self.policy
                    .contact_address(&handle, self.clock.utc().timestamp_millis())
            },
            str::to_owned,
        );
        let password = InitialPassword::generate(self.policy.password_length, &mut rand::thread_rng());
        let identity = NewIdentity {
            metadata: self
                .policy
                .identity_metadata(&handle, name, principal, &password),
            email,
            password,
        };

        let record = self
            .ports
            .identities
            .create_identity(&identity)
            .await
            .map_err(|err| StudentFailure::AccountCreation {
                reason: err.to_string(),
            })?;

        let profile = NewStudentProfile {
            user_id: record.id.clone(),
            username: handle.clone(),
            display_name: name.to_owned(),
            email: record.email.clone(),
            teacher_id: principal.clone(),
            initial_password: self.policy.stored_password(&identity.password),
        };
        self.insert_profile(&profile).await?;
        info!(user_id = %record.id, username = %handle, "student account created");

        let password = self.read_back_password(&record, &identity.password).await;
        Ok(StudentAccount {
            user_id: record.id,
            username: handle,
            password,
        })
    }

    async fn insert_profile(&self, profile: &NewStudentProfile) -> Result<(), StudentFailure> {
        let profiles = &self.ports.profiles;
        match profiles.insert(profile).await {
            Ok(()) | Err(StudentProfileRepositoryError::Duplicate { .. }) => Ok(()),
            Err(StudentProfileRepositoryError::PolicyRejected { message }) => {
                warn!(user_id = %profile.user_id, reason = %message, "profile insert rejected by policy; retrying once");
                match profiles.insert(profile).await {
                    Ok(()) | Err(StudentProfileRepositoryError::Duplicate { .. }) => Ok(()),
                    Err(err) => Err(StudentFailure::ProfileCreation {
                        reason: err.to_string(),
                    }),
                }
            }
            Err(err) => Err(StudentFailure::ProfileCreation {
                reason: err.to_string(),
            }),
        }
    }

    /// Password to report for a new account.
    ///
    /// Without plaintext storage the generated value is returned once.
    /// Otherwise the stored copy is read back from the profile, then from
    /// the identity metadata.
    async fn read_back_password(
        &self,
        record: &IdentityRecord,
        generated: &InitialPassword,
    ) -> String {
        if !self.policy.store_initial_password {
            return generated.expose().to_owned();
        }

        match self.ports.profiles.find_by_user_id(&record.id).await {
            Ok(Some(profile)) => {
                if let Some(stored) = profile.initial_password.filter(|value| !value.is_empty()) {
                    return stored;
                }
            }
            Ok(None) => {}
            Err(err) => debug!(error = %err, "profile read-back failed"),
        }

        match self.ports.identities.fetch_metadata(&record.id).await {
            Ok(Some(metadata)) => {
                if let Some(stored) = metadata_initial_password(&metadata) {
                    return stored.to_owned();
                }
            }
            Ok(None) => {}
            Err(err) => debug!(error = %err, "identity metadata read-back failed"),
        }

        PASSWORD_UNAVAILABLE.to_owned()
    }

    async fn enroll(&self, class_id: &ClassId, student_id: &UserId) -> Result<(), StudentFailure> {
        let enrollments = &self.ports.enrollments;
        let already = enrollments
            .exists(class_id, student_id)
            .await
            .map_err(|err| {
                warn!(error = %err, "enrollment existence check failed");
                StudentFailure::EnrollmentCheck
            })?;
        if already {
            return Err(StudentFailure::AlreadyEnrolled);
        }

        let enrollment = Enrollment::active(class_id.clone(), student_id.clone(), self.clock.utc());
        match enrollments.insert(&enrollment).await {
            Ok(()) => Ok(()),
            Err(EnrollmentRepositoryError::Duplicate { .. }) => Err(StudentFailure::AlreadyEnrolled),
            Err(err) => Err(StudentFailure::Enrollment {
                reason: err.to_string(),
            }),
        }
    }
}

#[async_trait]
impl<C, P, E, I> BatchEnrollmentCommand for BatchEnrollmentService<C, P, E, I>
where
    C: ClassroomRepository,
    P: StudentProfileRepository,
    E: EnrollmentRepository,
    I: IdentityProvider,
{
    async fn enroll_batch(
        &self,
        request: BatchEnrollmentRequest,
    ) -> Result<BatchEnrollmentReport, Error> {
        let principal = request.principal();
        let class_id = request.class_id();
        authorize_class_owner(self.ports.classrooms.as_ref(), class_id, principal).await?;

        info!(
            class_id = %class_id,
            students = request.students().len(),
            "batch enrollment started"
        );

        let mut report = BatchEnrollmentReport::default();
        for (index, row) in request.students().iter().enumerate() {
            let attempt = AssertUnwindSafe(self.process_row(principal, class_id, row))
                .catch_unwind()
                .await;
            let outcome = match attempt {
                Ok(Ok(success)) => StudentOutcome::Enrolled(success),
                Ok(Err(RowError::Student(failure))) => {
                    warn!(row = index, error = %failure, "student row failed");
                    StudentOutcome::Failed(EnrollmentFailure {
                        name: row.reported_name(),
                        error: failure,
                    })
                }
                Ok(Err(RowError::Abort(err))) => {
                    error!(row = index, error = %err, "batch enrollment aborted");
                    return Err(err);
                }
                Err(_) => {
                    error!(row = index, "student row panicked");
                    StudentOutcome::Failed(EnrollmentFailure {
                        name: row.reported_name(),
                        error: StudentFailure::Unknown,
                    })
                }
            };
            report.record(outcome);
        }

        info!(class_id = %class_id, summary = %report, "batch enrollment finished");
        Ok(report)
    }
}

#[cfg(test)]
#[path = "batch_enrollment_service_tests.rs"]
mod tests;
