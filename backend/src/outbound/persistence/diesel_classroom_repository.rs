//! PostgreSQL-backed `ClassroomRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ClassroomRepository, ClassroomRepositoryError};
use crate::domain::{ClassId, Classroom, UserId};

use super::diesel_error_mapping::StoreFailure;
use super::models::ClassRow;
use super::pool::DbPool;
use super::schema::classes;

/// Diesel-backed implementation of the classroom port.
#[derive(Clone)]
pub struct DieselClassroomRepository {
    pool: DbPool,
}

impl DieselClassroomRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_store_failure(failure: StoreFailure) -> ClassroomRepositoryError {
    match failure {
        StoreFailure::Connection(message) => ClassroomRepositoryError::connection(message),
        StoreFailure::Query(message)
        | StoreFailure::Duplicate(message)
        | StoreFailure::PolicyRejected(message) => ClassroomRepositoryError::query(message),
    }
}

#[async_trait]
impl ClassroomRepository for DieselClassroomRepository {
    async fn find_owned(
        &self,
        class_id: &ClassId,
        owner: &UserId,
    ) -> Result<Option<Classroom>, ClassroomRepositoryError> {
        // A non-UUID id names no stored class.
        let Some(id) = class_id.to_uuid() else {
            return Ok(None);
        };
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_store_failure(err.into()))?;

        let row = classes::table
            .filter(classes::id.eq(id))
            .filter(classes::teacher_id.eq(*owner.as_uuid()))
            .select(ClassRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_store_failure(err.into()))?;

        Ok(row.map(Classroom::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StoreFailure::Connection("down".into()), ClassroomRepositoryError::connection("down"))]
    #[case(StoreFailure::Query("bad".into()), ClassroomRepositoryError::query("bad"))]
    #[case(StoreFailure::PolicyRejected("rls".into()), ClassroomRepositoryError::query("rls"))]
    fn store_failures_map_to_port_errors(
        #[case] failure: StoreFailure,
        #[case] expected: ClassroomRepositoryError,
    ) {
        assert_eq!(map_store_failure(failure), expected);
    }
}
