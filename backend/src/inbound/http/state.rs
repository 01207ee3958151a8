//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{BatchEnrollmentCommand, ClassRosterQuery, LoginService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub batch_enrollment: Arc<dyn BatchEnrollmentCommand>,
    pub class_roster: Arc<dyn ClassRosterQuery>,
}

impl HttpState {
    /// Bundle the driving ports used by the handlers.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{
    ///     FixtureClassroomRepository, FixtureEnrollmentRepository, FixtureIdentityProvider,
    ///     FixtureLoginService, FixtureStudentProfileRepository,
    /// };
    /// use backend::domain::{
    ///     BatchEnrollmentPorts, BatchEnrollmentService, ClassRosterService, ProvisioningPolicy,
    /// };
    /// use backend::inbound::http::state::HttpState;
    ///
    /// let classrooms = Arc::new(FixtureClassroomRepository);
    /// let profiles = Arc::new(FixtureStudentProfileRepository);
    /// let enrollments = Arc::new(FixtureEnrollmentRepository);
    /// let batch = BatchEnrollmentService::new(
    ///     BatchEnrollmentPorts {
    ///         classrooms: classrooms.clone(),
    ///         profiles: profiles.clone(),
    ///         enrollments: enrollments.clone(),
    ///         identities: Arc::new(FixtureIdentityProvider),
    ///     },
    ///     Arc::new(mockable::DefaultClock),
    ///     ProvisioningPolicy::default(),
    /// );
    /// let state = HttpState::new(
    ///     Arc::new(FixtureLoginService),
    ///     Arc::new(batch),
    ///     Arc::new(ClassRosterService::new(classrooms, profiles, enrollments)),
    /// );
    /// # let _ = state;
    /// ```
    pub fn new(
        login: Arc<dyn LoginService>,
        batch_enrollment: Arc<dyn BatchEnrollmentCommand>,
        class_roster: Arc<dyn ClassRosterQuery>,
    ) -> Self {
        Self {
            login,
            batch_enrollment,
            class_roster,
        }
    }
}
