//! Ownership check shared by every class-scoped use case.

use tracing::{error, warn};

use crate::domain::ports::{ClassroomRepository, ClassroomRepositoryError};
use crate::domain::{ClassId, Classroom, Error, UserId};

/// Message returned when a class is missing or owned by someone else.
pub const CLASS_FORBIDDEN_MESSAGE: &str = "Class not found or unauthorized";

/// Fetch `class_id` if `principal` owns it.
///
/// A missing class and a class owned by another teacher are
/// indistinguishable to the caller. Store failures become internal errors.
pub(crate) async fn authorize_class_owner<C>(
    classrooms: &C,
    class_id: &ClassId,
    principal: &UserId,
) -> Result<Classroom, Error>
where
    C: ClassroomRepository + ?Sized,
{
    let found = classrooms
        .find_owned(class_id, principal)
        .await
        .map_err(|err| {
            error!(class_id = %class_id, error = %err, "class ownership lookup failed");
            match err {
                ClassroomRepositoryError::Connection { message }
                | ClassroomRepositoryError::Query { message } => {
                    Error::internal(format!("classroom lookup failed: {message}"))
                }
            }
        })?;

    found.ok_or_else(|| {
        warn!(class_id = %class_id, principal = %principal, "class not owned by principal");
        Error::forbidden(CLASS_FORBIDDEN_MESSAGE)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockClassroomRepository;
    use rstest::rstest;

    fn class_id() -> ClassId {
        ClassId::new("C1").expect("class id")
    }

    #[tokio::test]
    async fn owned_class_is_returned() {
        let teacher = UserId::random();
        let classroom = Classroom {
            id: class_id(),
            teacher_id: teacher.clone(),
            name: "Year 7 Spanish".to_owned(),
        };
        let expected = classroom.clone();
        let mut repo = MockClassroomRepository::new();
        repo.expect_find_owned()
            .times(1)
            .return_once(move |_, _| Ok(Some(classroom)));

        let found = authorize_class_owner(&repo, &class_id(), &teacher)
            .await
            .expect("owned class");
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn missing_class_is_forbidden() {
        let mut repo = MockClassroomRepository::new();
        repo.expect_find_owned().return_once(|_, _| Ok(None));

        let err = authorize_class_owner(&repo, &class_id(), &UserId::random())
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), CLASS_FORBIDDEN_MESSAGE);
    }

    #[rstest]
    #[case(ClassroomRepositoryError::connection("refused"))]
    #[case(ClassroomRepositoryError::query("syntax"))]
    #[tokio::test]
    async fn store_failures_are_internal(#[case] failure: ClassroomRepositoryError) {
        let mut repo = MockClassroomRepository::new();
        repo.expect_find_owned()
            .return_once(move |_, _| Err(failure));

        let err = authorize_class_owner(&repo, &class_id(), &UserId::random())
            .await
            .expect_err("store failure");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
