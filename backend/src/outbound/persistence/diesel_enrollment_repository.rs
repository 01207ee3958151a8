//! PostgreSQL-backed `EnrollmentRepository`.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{EnrollmentRepository, EnrollmentRepositoryError};
use crate::domain::{ClassId, ENROLLMENT_STATUS_ACTIVE, Enrollment, UserId};

use super::diesel_error_mapping::StoreFailure;
use super::models::{EnrollmentRow, NewEnrollmentRow};
use super::pool::DbPool;
use super::schema::class_enrollments;

/// Diesel-backed implementation of the enrollment port.
#[derive(Clone)]
pub struct DieselEnrollmentRepository {
    pool: DbPool,
}

impl DieselEnrollmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_err(error: impl Into<StoreFailure>) -> EnrollmentRepositoryError {
    match error.into() {
        StoreFailure::Connection(message) => EnrollmentRepositoryError::connection(message),
        StoreFailure::Duplicate(message) => EnrollmentRepositoryError::duplicate(message),
        StoreFailure::Query(message) | StoreFailure::PolicyRejected(message) => {
            EnrollmentRepositoryError::query(message)
        }
    }
}

/// Classes are stored under UUID keys; anything else cannot be enrolled in.
///
/// Batch callers never reach this error: the classroom lookup resolves
/// non-UUID ids to "not found" and the batch is rejected with 403 first.
fn class_uuid(class_id: &ClassId) -> Result<Uuid, EnrollmentRepositoryError> {
    class_id
        .to_uuid()
        .ok_or_else(|| EnrollmentRepositoryError::query(format!("malformed class id: {class_id}")))
}

#[async_trait]
impl EnrollmentRepository for DieselEnrollmentRepository {
    async fn exists(
        &self,
        class_id: &ClassId,
        student_id: &UserId,
    ) -> Result<bool, EnrollmentRepositoryError> {
        let class = class_uuid(class_id)?;
        let mut conn = self.pool.get().await.map_err(map_err)?;
        diesel::select(exists(
            class_enrollments::table
                .filter(class_enrollments::class_id.eq(class))
                .filter(class_enrollments::student_id.eq(*student_id.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_err)
    }

    async fn insert(&self, enrollment: &Enrollment) -> Result<(), EnrollmentRepositoryError> {
        let row = NewEnrollmentRow {
            class_id: class_uuid(&enrollment.class_id)?,
            student_id: *enrollment.student_id.as_uuid(),
            status: &enrollment.status,
            enrolled_at: enrollment.enrolled_at,
        };
        let mut conn = self.pool.get().await.map_err(map_err)?;
        diesel::insert_into(class_enrollments::table)
            .values(row)
            .execute(&mut conn)
            .await
            .map(drop)
            .map_err(map_err)
    }

    async fn list_active(
        &self,
        class_id: &ClassId,
    ) -> Result<Vec<Enrollment>, EnrollmentRepositoryError> {
        let class = class_uuid(class_id)?;
        let mut conn = self.pool.get().await.map_err(map_err)?;
        let rows: Vec<EnrollmentRow> = class_enrollments::table
            .filter(class_enrollments::class_id.eq(class))
            .filter(class_enrollments::status.eq(ENROLLMENT_STATUS_ACTIVE))
            .order_by((
                class_enrollments::enrolled_at.asc(),
                class_enrollments::id.asc(),
            ))
            .select(EnrollmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_err)?;
        Ok(rows.into_iter().map(Enrollment::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn non_uuid_class_ids_are_query_errors() {
        let class_id = ClassId::new("C1").expect("class id");
        assert_eq!(
            class_uuid(&class_id),
            Err(EnrollmentRepositoryError::query("malformed class id: C1"))
        );
    }

    #[rstest]
    fn unique_violations_are_duplicates() {
        assert_eq!(
            map_err(StoreFailure::Duplicate("pair".into())),
            EnrollmentRepositoryError::duplicate("pair")
        );
    }
}
