//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP handler and the session cookie security
//! scheme. The document backs Swagger UI in debug builds and is printed by
//! `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ErrorCode;
use crate::inbound::http::classes::{ClassRosterResponse, RosterStudentResponse};
use crate::inbound::http::enrollments::{
    BatchEnrollmentBody, BatchEnrollmentResponse, EnrolledStudentResponse, FailedStudentResponse,
    StudentRowRequest,
};
use crate::inbound::http::error::ErrorResponse;
use crate::inbound::http::users::LoginRequest;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "LanguageGems backend API",
        description = "Teacher sessions, bulk student provisioning, and class rosters."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::enrollments::enroll_students,
        crate::inbound::http::classes::class_students,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorResponse,
        ErrorCode,
        LoginRequest,
        BatchEnrollmentBody,
        StudentRowRequest,
        BatchEnrollmentResponse,
        EnrolledStudentResponse,
        FailedStudentResponse,
        ClassRosterResponse,
        RosterStudentResponse,
    )),
    tags(
        (name = "session", description = "Teacher login and logout"),
        (name = "students", description = "Bulk student provisioning"),
        (name = "classes", description = "Class rosters"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
