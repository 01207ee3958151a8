//! Shared classification of pool and Diesel failures.
//!
//! Repositories map a [`StoreFailure`] onto their own port error, keeping
//! only the variants their port exposes.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Marker PostgreSQL puts in row-level security violations.
const ROW_LEVEL_SECURITY_MARKER: &str = "row-level security";

/// Store-agnostic failure category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    Connection(String),
    Query(String),
    Duplicate(String),
    PolicyRejected(String),
}

impl From<PoolError> for StoreFailure {
    fn from(error: PoolError) -> Self {
        Self::Connection(error.into_message())
    }
}

impl From<DieselError> for StoreFailure {
    fn from(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
            }
            _ => debug!(
                error_type = %std::any::type_name_of_val(&error),
                "diesel operation failed"
            ),
        }

        match error {
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            DieselError::QueryBuilderError(_) => Self::Query("database query error".to_owned()),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::Duplicate(info.message().to_owned())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
                Self::Connection("database connection error".to_owned())
            }
            DieselError::DatabaseError(_, info)
                if info.message().contains(ROW_LEVEL_SECURITY_MARKER) =>
            {
                Self::PolicyRejected(info.message().to_owned())
            }
            DieselError::DatabaseError(_, info) => Self::Query(info.message().to_owned()),
            _ => Self::Query("database error".to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct StubInfo(&'static str);

    impl diesel::result::DatabaseErrorInformation for StubInfo {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, message: &'static str) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(StubInfo(message)))
    }

    #[rstest]
    #[case(
        database_error(DatabaseErrorKind::UniqueViolation, "duplicate key value"),
        StoreFailure::Duplicate("duplicate key value".to_owned())
    )]
    #[case(
        database_error(
            DatabaseErrorKind::Unknown,
            "new row violates row-level security policy for table \"user_profiles\""
        ),
        StoreFailure::PolicyRejected(
            "new row violates row-level security policy for table \"user_profiles\"".to_owned()
        )
    )]
    #[case(
        database_error(DatabaseErrorKind::ClosedConnection, "server closed"),
        StoreFailure::Connection("database connection error".to_owned())
    )]
    #[case(
        database_error(DatabaseErrorKind::ForeignKeyViolation, "fk violated"),
        StoreFailure::Query("fk violated".to_owned())
    )]
    #[case(DieselError::NotFound, StoreFailure::Query("record not found".to_owned()))]
    fn diesel_errors_are_classified(#[case] error: DieselError, #[case] expected: StoreFailure) {
        assert_eq!(StoreFailure::from(error), expected);
    }

    #[rstest]
    fn pool_errors_are_connection_failures() {
        assert_eq!(
            StoreFailure::from(PoolError::checkout("timed out")),
            StoreFailure::Connection("timed out".to_owned())
        );
    }
}
