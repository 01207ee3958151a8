//! Batch enrollment requests, per-student outcomes, and the aggregated report.
//!
//! A batch names one class and a list of student rows. Request-shape
//! problems reject the whole batch before any row is touched; everything
//! that goes wrong with an individual row is recorded as a
//! [`StudentFailure`] and the batch carries on.

use std::fmt;

use super::{ClassId, Handle, UserId};

/// Password placeholder reported for accounts that already existed.
pub const EXISTING_USER_PASSWORD: &str = "(existing user)";

/// Password placeholder reported when no stored secret can be read back.
pub const PASSWORD_UNAVAILABLE: &str = "(password unavailable)";

/// Reasons a batch is rejected before any row is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BatchValidationError {
    /// The student list is missing, not a list, or empty.
    #[error("No students provided")]
    NoStudents,
    /// The class id is missing or blank.
    #[error("Class ID is required")]
    MissingClassId,
}

/// One submitted student row, as loosely typed as the client sent it.
///
/// Rows that were not JSON objects arrive with every field `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentRow {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl StudentRow {
    /// Row with only a display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: None,
        }
    }

    /// Display name trimmed of surrounding whitespace, if any remains.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Caller-supplied contact address, if present and non-blank.
    pub fn contact_override(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }

    /// Name echoed back in the row's outcome.
    pub fn reported_name(&self) -> String {
        self.display_name()
            .map(str::to_owned)
            .or_else(|| self.name.clone())
            .unwrap_or_default()
    }
}

/// Validated batch enrollment request.
///
/// ## Invariants
/// - `students` is non-empty.
/// - `class_id` is non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEnrollmentRequest {
    principal: UserId,
    class_id: ClassId,
    students: Vec<StudentRow>,
}

impl BatchEnrollmentRequest {
    /// Validate the request shape. The student list is checked first.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{BatchEnrollmentRequest, BatchValidationError, StudentRow, UserId};
    ///
    /// let teacher = UserId::random();
    /// let err = BatchEnrollmentRequest::try_new(teacher.clone(), Some(vec![]), None)
    ///     .unwrap_err();
    /// assert_eq!(err, BatchValidationError::NoStudents);
    ///
    /// let request = BatchEnrollmentRequest::try_new(
    ///     teacher,
    ///     Some(vec![StudentRow::named("Bob Smith")]),
    ///     Some("C1"),
    /// )
    /// .unwrap();
    /// assert_eq!(request.class_id().as_ref(), "C1");
    /// ```
    pub fn try_new(
        principal: UserId,
        students: Option<Vec<StudentRow>>,
        class_id: Option<&str>,
    ) -> Result<Self, BatchValidationError> {
        let students = students
            .filter(|rows| !rows.is_empty())
            .ok_or(BatchValidationError::NoStudents)?;
        let class_id = class_id
            .and_then(|raw| ClassId::new(raw).ok())
            .ok_or(BatchValidationError::MissingClassId)?;
        Ok(Self {
            principal,
            class_id,
            students,
        })
    }

    /// Teacher issuing the batch.
    pub fn principal(&self) -> &UserId {
        &self.principal
    }

    /// Target class.
    pub fn class_id(&self) -> &ClassId {
        &self.class_id
    }

    /// Submitted rows in input order.
    pub fn students(&self) -> &[StudentRow] {
        &self.students
    }
}

/// Why a single row could not be provisioned or enrolled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StudentFailure {
    #[error("Student name is required")]
    NameRequired,
    #[error("Failed to look up existing student")]
    LookupFailed,
    #[error("Failed to create user account: {reason}")]
    AccountCreation { reason: String },
    #[error("Failed to create student profile: {reason}")]
    ProfileCreation { reason: String },
    #[error("Failed to check existing enrollment")]
    EnrollmentCheck,
    #[error("Student is already enrolled in this class")]
    AlreadyEnrolled,
    #[error("Failed to enroll student: {reason}")]
    Enrollment { reason: String },
    #[error("Unknown error occurred")]
    Unknown,
}

/// A row whose student ended up enrolled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentSuccess {
    pub name: String,
    pub username: Handle,
    /// Initial password, or a placeholder for reused or unreadable accounts.
    pub password: String,
    pub user_id: UserId,
}

/// A row that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentFailure {
    pub name: String,
    pub error: StudentFailure,
}

/// Outcome of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentOutcome {
    Enrolled(EnrollmentSuccess),
    Failed(EnrollmentFailure),
}

/// Aggregated batch outcome, both lists in input order.
///
/// ## Invariants
/// - `total_added() + total_errors()` equals the number of submitted rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchEnrollmentReport {
    results: Vec<EnrollmentSuccess>,
    errors: Vec<EnrollmentFailure>,
}

impl BatchEnrollmentReport {
    /// Record the next row's outcome.
    pub fn record(&mut self, outcome: StudentOutcome) {
        match outcome {
            StudentOutcome::Enrolled(success) => self.results.push(success),
            StudentOutcome::Failed(failure) => self.errors.push(failure),
        }
    }

    pub fn results(&self) -> &[EnrollmentSuccess] {
        &self.results
    }

    pub fn errors(&self) -> &[EnrollmentFailure] {
        &self.errors
    }

    pub fn total_added(&self) -> usize {
        self.results.len()
    }

    pub fn total_errors(&self) -> usize {
        self.errors.len()
    }

    /// Split into the success and failure lists.
    pub fn into_parts(self) -> (Vec<EnrollmentSuccess>, Vec<EnrollmentFailure>) {
        (self.results, self.errors)
    }
}

impl fmt::Display for BatchEnrollmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} failed",
            self.total_added(),
            self.total_errors()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, Some("C1"), BatchValidationError::NoStudents)]
    #[case(Some(vec![]), Some("C1"), BatchValidationError::NoStudents)]
    #[case(Some(vec![]), None, BatchValidationError::NoStudents)]
    #[case(Some(vec![StudentRow::named("Ana")]), None, BatchValidationError::MissingClassId)]
    #[case(Some(vec![StudentRow::named("Ana")]), Some("  "), BatchValidationError::MissingClassId)]
    fn invalid_batches_are_rejected(
        #[case] students: Option<Vec<StudentRow>>,
        #[case] class_id: Option<&str>,
        #[case] expected: BatchValidationError,
    ) {
        let err = BatchEnrollmentRequest::try_new(UserId::random(), students, class_id)
            .expect_err("invalid batch");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn validation_messages_match_the_wire_contract() {
        assert_eq!(
            BatchValidationError::NoStudents.to_string(),
            "No students provided"
        );
        assert_eq!(
            BatchValidationError::MissingClassId.to_string(),
            "Class ID is required"
        );
    }

    #[rstest]
    #[case(StudentRow::named("  Ana Lee "), Some("Ana Lee"))]
    #[case(StudentRow::named("   "), None)]
    #[case(StudentRow::default(), None)]
    fn display_names_are_trimmed(#[case] row: StudentRow, #[case] expected: Option<&str>) {
        assert_eq!(row.display_name(), expected);
    }

    #[rstest]
    fn blank_names_are_reported_verbatim() {
        assert_eq!(StudentRow::named("  ").reported_name(), "  ");
        assert_eq!(StudentRow::default().reported_name(), "");
    }

    #[rstest]
    fn report_counts_match_recorded_outcomes() {
        let mut report = BatchEnrollmentReport::default();
        report.record(StudentOutcome::Failed(EnrollmentFailure {
            name: String::new(),
            error: StudentFailure::NameRequired,
        }));
        report.record(StudentOutcome::Enrolled(EnrollmentSuccess {
            name: "Ana".to_owned(),
            username: Handle::from_stored("Ana"),
            password: EXISTING_USER_PASSWORD.to_owned(),
            user_id: UserId::random(),
        }));

        assert_eq!(report.total_added(), 1);
        assert_eq!(report.total_errors(), 1);
        assert_eq!(report.to_string(), "1 added, 1 failed");
    }

    #[rstest]
    #[case(StudentFailure::AccountCreation { reason: "boom".into() }, "Failed to create user account: boom")]
    #[case(StudentFailure::ProfileCreation { reason: "rls".into() }, "Failed to create student profile: rls")]
    #[case(StudentFailure::Enrollment { reason: "fk".into() }, "Failed to enroll student: fk")]
    #[case(StudentFailure::Unknown, "Unknown error occurred")]
    fn failure_messages_carry_the_reason(#[case] failure: StudentFailure, #[case] expected: &str) {
        assert_eq!(failure.to_string(), expected);
    }
}
