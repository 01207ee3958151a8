//! Class roster handler.
//!
//! ```text
//! GET /api/v1/classes/{classId}/students
//! ```

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::RosterEntry;
use crate::domain::{ClassId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// One enrolled student.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterStudentResponse {
    pub user_id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    /// `null` when the deployment does not store initial passwords.
    pub initial_password: Option<String>,
    /// RFC 3339 enrollment timestamp.
    pub enrolled_at: String,
}

impl From<RosterEntry> for RosterStudentResponse {
    fn from(value: RosterEntry) -> Self {
        Self {
            user_id: value.user_id.into(),
            name: value.name,
            username: value.username.into(),
            email: value.email,
            initial_password: value.initial_password,
            enrolled_at: value.enrolled_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClassRosterResponse {
    pub success: bool,
    pub students: Vec<RosterStudentResponse>,
}

/// List the students enrolled in a class the caller owns.
#[utoipa::path(
    get,
    path = "/api/v1/classes/{classId}/students",
    params(("classId" = String, Path, description = "Class identifier")),
    responses(
        (status = 200, description = "Enrolled students in enrollment order", body = ClassRosterResponse),
        (status = 401, description = "Unauthorised", body = ErrorResponse),
        (status = 403, description = "Class not found or unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["classes"],
    operation_id = "listClassStudents"
)]
#[get("/classes/{class_id}/students")]
pub async fn class_students(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let class_id = ClassId::new(path.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let roster = state.class_roster.roster(&principal, &class_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "private, no-store"))
        .json(ClassRosterResponse {
            success: true,
            students: roster.into_iter().map(Into::into).collect(),
        }))
}
