//! Domain primitives, services, and ports.
//!
//! Purpose: Define strongly typed entities for student provisioning and the
//! services that drive it, independent of HTTP and persistence. Adapters
//! reach the domain only through the traits in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic failure payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - BatchEnrollmentService: provisions and enrolls a batch of students.
//! - ClassRosterService: lists the students enrolled in a class.

pub mod auth;
pub mod batch_enrollment;
pub mod batch_enrollment_service;
pub(crate) mod class_access;
pub mod class_roster_service;
pub mod classroom;
pub mod error;
pub mod handle;
pub mod ports;
pub mod student;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::batch_enrollment::{
    BatchEnrollmentReport, BatchEnrollmentRequest, BatchValidationError, EXISTING_USER_PASSWORD,
    EnrollmentFailure, EnrollmentSuccess, PASSWORD_UNAVAILABLE, StudentFailure, StudentOutcome,
    StudentRow,
};
pub use self::batch_enrollment_service::{
    BatchEnrollmentPorts, BatchEnrollmentService, USERNAME_SCAN_FAILED_MESSAGE,
};
pub use self::class_access::CLASS_FORBIDDEN_MESSAGE;
pub use self::class_roster_service::ClassRosterService;
pub use self::classroom::{ClassId, Classroom, ENROLLMENT_STATUS_ACTIVE, EmptyClassId, Enrollment};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::handle::{Handle, base_handle, next_handle};
pub use self::student::{
    DEFAULT_INITIAL_PASSWORD_LENGTH, DEFAULT_STUDENT_EMAIL_DOMAIN, INITIAL_PASSWORD_METADATA_KEY,
    IdentityRecord, InitialPassword, NewIdentity, NewStudentProfile, ProvisioningPolicy,
    STUDENT_ROLE, StudentProfile, metadata_initial_password,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserIdValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
