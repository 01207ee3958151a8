//! Classes owned by teachers and the enrollments that link students to them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Opaque class identifier as supplied by clients.
///
/// The store decides what a well-formed identifier looks like; a value it
/// cannot parse simply matches no class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassId(String);

/// Raised when a class identifier is missing or blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("class id must not be empty")]
pub struct EmptyClassId;

impl ClassId {
    /// Trim and validate a raw class identifier.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmptyClassId> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmptyClassId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Identifier of a stored class.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id.to_string())
    }

    /// The identifier as a UUID, when it is one.
    pub fn to_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.0).ok()
    }
}

impl AsRef<str> for ClassId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ClassId> for String {
    fn from(value: ClassId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ClassId {
    type Error = EmptyClassId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A class as seen by the provisioning workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classroom {
    pub id: ClassId,
    pub teacher_id: UserId,
    pub name: String,
}

/// Enrollment status written for new rows.
pub const ENROLLMENT_STATUS_ACTIVE: &str = "active";

/// A student's membership of one class.
///
/// ## Invariants
/// - At most one enrollment exists per (`class_id`, `student_id`) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub class_id: ClassId,
    pub student_id: UserId,
    pub status: String,
    pub enrolled_at: DateTime<Utc>,
}

impl Enrollment {
    /// Build an active enrollment stamped with `enrolled_at`.
    pub fn active(class_id: ClassId, student_id: UserId, enrolled_at: DateTime<Utc>) -> Self {
        Self {
            class_id,
            student_id,
            status: ENROLLMENT_STATUS_ACTIVE.to_owned(),
            enrolled_at,
        }
    }
}
