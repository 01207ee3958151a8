//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod batch_enrollment_command;
mod class_roster_query;
mod classroom_repository;
mod enrollment_repository;
mod identity_provider;
mod login_service;
mod student_profile_repository;

#[cfg(test)]
pub use batch_enrollment_command::MockBatchEnrollmentCommand;
pub use batch_enrollment_command::BatchEnrollmentCommand;
#[cfg(test)]
pub use class_roster_query::MockClassRosterQuery;
pub use class_roster_query::{ClassRosterQuery, RosterEntry};
#[cfg(test)]
pub use classroom_repository::MockClassroomRepository;
pub use classroom_repository::{
    ClassroomRepository, ClassroomRepositoryError, FixtureClassroomRepository,
};
#[cfg(test)]
pub use enrollment_repository::MockEnrollmentRepository;
pub use enrollment_repository::{
    EnrollmentRepository, EnrollmentRepositoryError, FixtureEnrollmentRepository,
};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{FixtureIdentityProvider, IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{
    FIXTURE_TEACHER_EMAIL, FIXTURE_TEACHER_ID, FixtureLoginService, LoginService,
};
#[cfg(test)]
pub use student_profile_repository::MockStudentProfileRepository;
pub use student_profile_repository::{
    FixtureStudentProfileRepository, StudentProfileRepository, StudentProfileRepositoryError,
};
