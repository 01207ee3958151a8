//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them to
//! domain types at the boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    ClassId, Classroom, Enrollment, Handle, NewStudentProfile, STUDENT_ROLE, StudentProfile,
    UserId,
};

use super::schema::{class_enrollments, classes, user_profiles};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = classes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClassRow {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub name: String,
}

impl From<ClassRow> for Classroom {
    fn from(row: ClassRow) -> Self {
        Self {
            id: ClassId::from_uuid(row.id),
            teacher_id: UserId::from_uuid(row.teacher_id),
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub teacher_id: Option<Uuid>,
    pub initial_password: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ProfileRow> for StudentProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.user_id),
            username: Handle::from_stored(row.username),
            display_name: row.display_name,
            email: row.email,
            teacher_id: row.teacher_id.map(UserId::from_uuid),
            initial_password: row.initial_password,
            created_at: row.created_at,
        }
    }
}

/// Insert payload for a student profile; `created_at` uses the column
/// default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_profiles)]
pub(crate) struct NewProfileRow<'a> {
    pub user_id: Uuid,
    pub username: &'a str,
    pub display_name: &'a str,
    pub email: &'a str,
    pub role: &'a str,
    pub teacher_id: Option<Uuid>,
    pub initial_password: Option<&'a str>,
}

impl<'a> From<&'a NewStudentProfile> for NewProfileRow<'a> {
    fn from(profile: &'a NewStudentProfile) -> Self {
        Self {
            user_id: *profile.user_id.as_uuid(),
            username: profile.username.as_ref(),
            display_name: &profile.display_name,
            email: &profile.email,
            role: STUDENT_ROLE,
            teacher_id: Some(*profile.teacher_id.as_uuid()),
            initial_password: profile.initial_password.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = class_enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EnrollmentRow {
    pub class_id: Uuid,
    pub student_id: Uuid,
    pub status: String,
    pub enrolled_at: DateTime<Utc>,
}

impl From<EnrollmentRow> for Enrollment {
    fn from(row: EnrollmentRow) -> Self {
        Self {
            class_id: ClassId::from_uuid(row.class_id),
            student_id: UserId::from_uuid(row.student_id),
            status: row.status,
            enrolled_at: row.enrolled_at,
        }
    }
}

/// Insert payload for an enrollment; `id` uses the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = class_enrollments)]
pub(crate) struct NewEnrollmentRow<'a> {
    pub class_id: Uuid,
    pub student_id: Uuid,
    pub status: &'a str,
    pub enrolled_at: DateTime<Utc>,
}
