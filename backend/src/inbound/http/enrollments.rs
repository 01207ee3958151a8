//! Bulk student provisioning handler.
//!
//! ```text
//! POST /api/v1/students/batch {"students":[{"name":"Bob Smith"}],"classId":"C1"}
//! ```
//!
//! The body is parsed loosely so that shape problems surface as the batch
//! validation messages rather than a generic deserialisation failure.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{
    BatchEnrollmentReport, BatchEnrollmentRequest, EnrollmentFailure, EnrollmentSuccess, Error,
    StudentRow,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{ErrorResponse, INVALID_BODY_MESSAGE};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// One submitted student.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StudentRowRequest {
    #[schema(example = "Bob Smith")]
    pub name: String,
    /// Contact address to use instead of a generated one.
    pub email: Option<String>,
}

/// Request body for `POST /api/v1/students/batch`.
///
/// Both fields stay untyped until validation so a non-list `students` is
/// reported as "No students provided".
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchEnrollmentBody {
    #[schema(value_type = Vec<StudentRowRequest>)]
    pub students: Option<Value>,
    #[schema(value_type = String, example = "C1")]
    pub class_id: Option<Value>,
}

impl BatchEnrollmentBody {
    fn student_rows(&self) -> Option<Vec<StudentRow>> {
        let Some(Value::Array(items)) = &self.students else {
            return None;
        };
        Some(items.iter().map(student_row).collect())
    }

    fn class_id(&self) -> Option<String> {
        match self.class_id.as_ref()? {
            Value::String(raw) => Some(raw.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }
}

fn student_row(item: &Value) -> StudentRow {
    let text = |key: &str| item.get(key).and_then(Value::as_str).map(str::to_owned);
    StudentRow {
        name: text("name"),
        email: text("email"),
    }
}

/// A student who ended up enrolled.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledStudentResponse {
    pub name: String,
    #[schema(example = "BobS")]
    pub username: String,
    /// Initial password, `(existing user)`, or `(password unavailable)`.
    pub password: String,
    pub user_id: String,
}

impl From<EnrollmentSuccess> for EnrolledStudentResponse {
    fn from(value: EnrollmentSuccess) -> Self {
        Self {
            name: value.name,
            username: value.username.into(),
            password: value.password,
            user_id: value.user_id.into(),
        }
    }
}

/// A row that could not be processed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FailedStudentResponse {
    pub name: String,
    #[schema(example = "Student is already enrolled in this class")]
    pub error: String,
}

impl From<EnrollmentFailure> for FailedStudentResponse {
    fn from(value: EnrollmentFailure) -> Self {
        Self {
            name: value.name,
            error: value.error.to_string(),
        }
    }
}

/// Response body for a processed batch.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchEnrollmentResponse {
    pub success: bool,
    pub results: Vec<EnrolledStudentResponse>,
    pub errors: Vec<FailedStudentResponse>,
    pub total_added: usize,
    pub total_errors: usize,
}

impl From<BatchEnrollmentReport> for BatchEnrollmentResponse {
    fn from(report: BatchEnrollmentReport) -> Self {
        let total_added = report.total_added();
        let total_errors = report.total_errors();
        let (results, errors) = report.into_parts();
        Self {
            success: true,
            results: results.into_iter().map(Into::into).collect(),
            errors: errors.into_iter().map(Into::into).collect(),
            total_added,
            total_errors,
        }
    }
}

/// Create, or reuse, student accounts and enroll them in a class.
#[utoipa::path(
    post,
    path = "/api/v1/students/batch",
    request_body = BatchEnrollmentBody,
    responses(
        (status = 200, description = "Batch processed; per-row failures are listed in `errors`", body = BatchEnrollmentResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorised", body = ErrorResponse),
        (status = 403, description = "Class not found or unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["students"],
    operation_id = "enrollStudentBatch"
)]
#[post("/students/batch")]
pub async fn enroll_students(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Bytes,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let body: BatchEnrollmentBody = serde_json::from_slice(&payload).map_err(|err| {
        debug!(error = %err, "rejecting malformed batch body");
        Error::invalid_request(INVALID_BODY_MESSAGE)
    })?;
    let class_id = body.class_id();
    let request =
        BatchEnrollmentRequest::try_new(principal, body.student_rows(), class_id.as_deref())
            .map_err(|err| Error::invalid_request(err.to_string()))?;

    let report = state.batch_enrollment.enroll_batch(request).await?;
    Ok(HttpResponse::Ok().json(BatchEnrollmentResponse::from(report)))
}
