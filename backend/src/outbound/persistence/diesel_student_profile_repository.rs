//! PostgreSQL-backed `StudentProfileRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StudentProfileRepository, StudentProfileRepositoryError};
use crate::domain::{NewStudentProfile, STUDENT_ROLE, StudentProfile, UserId};

use super::diesel_error_mapping::StoreFailure;
use super::models::{NewProfileRow, ProfileRow};
use super::pool::DbPool;
use super::schema::user_profiles;

/// Diesel-backed implementation of the student profile port.
#[derive(Clone)]
pub struct DieselStudentProfileRepository {
    pool: DbPool,
}

impl DieselStudentProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_store_failure(failure: StoreFailure) -> StudentProfileRepositoryError {
    match failure {
        StoreFailure::Connection(message) => StudentProfileRepositoryError::connection(message),
        StoreFailure::Query(message) => StudentProfileRepositoryError::query(message),
        StoreFailure::Duplicate(message) => StudentProfileRepositoryError::duplicate(message),
        StoreFailure::PolicyRejected(message) => {
            StudentProfileRepositoryError::policy_rejected(message)
        }
    }
}

fn map_err(error: impl Into<StoreFailure>) -> StudentProfileRepositoryError {
    map_store_failure(error.into())
}

/// `LIKE` pattern matching every value that starts with `prefix` literally.
///
/// Uses PostgreSQL's default `\` escape character.
pub(crate) fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl StudentProfileRepository for DieselStudentProfileRepository {
    async fn handles_with_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<String>, StudentProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_err)?;
        user_profiles::table
            .filter(user_profiles::username.like(prefix_pattern(prefix)))
            .select(user_profiles::username)
            .load::<String>(&mut conn)
            .await
            .map_err(map_err)
    }

    async fn find_students_by_display_name(
        &self,
        teacher_id: &UserId,
        display_name: &str,
    ) -> Result<Vec<StudentProfile>, StudentProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_err)?;
        let rows: Vec<ProfileRow> = user_profiles::table
            .filter(user_profiles::teacher_id.eq(*teacher_id.as_uuid()))
            .filter(user_profiles::display_name.eq(display_name))
            .filter(user_profiles::role.eq(STUDENT_ROLE))
            .order_by(user_profiles::created_at.asc())
            .select(ProfileRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_err)?;
        Ok(rows.into_iter().map(StudentProfile::from).collect())
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StudentProfile>, StudentProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_err)?;
        let row = user_profiles::table
            .find(*user_id.as_uuid())
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_err)?;
        Ok(row.map(StudentProfile::from))
    }

    async fn insert(
        &self,
        profile: &NewStudentProfile,
    ) -> Result<(), StudentProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_err)?;
        diesel::insert_into(user_profiles::table)
            .values(NewProfileRow::from(profile))
            .execute(&mut conn)
            .await
            .map(drop)
            .map_err(map_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("BobS", "BobS%")]
    #[case("A_B", "A\\_B%")]
    #[case("100%", "100\\%%")]
    #[case("back\\slash", "back\\\\slash%")]
    fn prefix_patterns_escape_wildcards(#[case] prefix: &str, #[case] expected: &str) {
        assert_eq!(prefix_pattern(prefix), expected);
    }

    #[rstest]
    #[case(StoreFailure::Duplicate("dup".into()), StudentProfileRepositoryError::duplicate("dup"))]
    #[case(
        StoreFailure::PolicyRejected("rls".into()),
        StudentProfileRepositoryError::policy_rejected("rls")
    )]
    #[case(StoreFailure::Connection("down".into()), StudentProfileRepositoryError::connection("down"))]
    fn store_failures_keep_their_category(
        #[case] failure: StoreFailure,
        #[case] expected: StudentProfileRepositoryError,
    ) {
        assert_eq!(map_store_failure(failure), expected);
    }
}
