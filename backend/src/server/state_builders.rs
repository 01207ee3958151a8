//! Builders wiring driving ports onto real or fixture adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::warn;

use backend::domain::ports::{
    BatchEnrollmentCommand, ClassRosterQuery, ClassroomRepository, EnrollmentRepository,
    FixtureClassroomRepository, FixtureEnrollmentRepository, FixtureIdentityProvider,
    FixtureLoginService, FixtureStudentProfileRepository, IdentityProvider, LoginService,
    StudentProfileRepository,
};
use backend::domain::{
    BatchEnrollmentPorts, BatchEnrollmentService, ClassRosterService, ProvisioningPolicy,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::identity::GoTrueIdentityProvider;
use backend::outbound::persistence::{
    DbPool, DieselClassroomRepository, DieselEnrollmentRepository,
    DieselStudentProfileRepository,
};

use super::ServerConfig;

type DrivingPorts = (Arc<dyn BatchEnrollmentCommand>, Arc<dyn ClassRosterQuery>);

/// Repositories shared by the provisioning and roster services.
struct Stores<C, P, E> {
    classrooms: Arc<C>,
    profiles: Arc<P>,
    enrollments: Arc<E>,
}

impl Stores<DieselClassroomRepository, DieselStudentProfileRepository, DieselEnrollmentRepository> {
    fn diesel(pool: &DbPool) -> Self {
        Self {
            classrooms: Arc::new(DieselClassroomRepository::new(pool.clone())),
            profiles: Arc::new(DieselStudentProfileRepository::new(pool.clone())),
            enrollments: Arc::new(DieselEnrollmentRepository::new(pool.clone())),
        }
    }
}

impl Stores<FixtureClassroomRepository, FixtureStudentProfileRepository, FixtureEnrollmentRepository> {
    fn fixtures() -> Self {
        Self {
            classrooms: Arc::new(FixtureClassroomRepository),
            profiles: Arc::new(FixtureStudentProfileRepository),
            enrollments: Arc::new(FixtureEnrollmentRepository),
        }
    }
}

fn driving_ports<C, P, E, I>(
    stores: Stores<C, P, E>,
    identities: Arc<I>,
    policy: ProvisioningPolicy,
) -> DrivingPorts
where
    C: ClassroomRepository + 'static,
    P: StudentProfileRepository + 'static,
    E: EnrollmentRepository + 'static,
    I: IdentityProvider + 'static,
{
    let roster = ClassRosterService::new(
        Arc::clone(&stores.classrooms),
        Arc::clone(&stores.profiles),
        Arc::clone(&stores.enrollments),
    );
    let enrollment = BatchEnrollmentService::new(
        BatchEnrollmentPorts {
            classrooms: stores.classrooms,
            profiles: stores.profiles,
            enrollments: stores.enrollments,
            identities,
        },
        Arc::new(DefaultClock),
        policy,
    );
    (Arc::new(enrollment), Arc::new(roster))
}

fn with_identity<C, P, E>(
    stores: Stores<C, P, E>,
    identity: Option<Arc<GoTrueIdentityProvider>>,
    policy: ProvisioningPolicy,
) -> DrivingPorts
where
    C: ClassroomRepository + 'static,
    P: StudentProfileRepository + 'static,
    E: EnrollmentRepository + 'static,
{
    match identity {
        Some(provider) => driving_ports(stores, provider, policy),
        None => driving_ports(stores, Arc::new(FixtureIdentityProvider), policy),
    }
}

/// Build the shared HTTP state from the server configuration.
///
/// Missing collaborators fall back to fixtures with a warning so the server
/// still starts in development.
///
/// # Errors
/// Returns [`std::io::Error`] when the identity provider client cannot be
/// constructed.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let identity = config
        .identity
        .as_ref()
        .map(|settings| {
            GoTrueIdentityProvider::new(
                settings.base_url.clone(),
                settings.service_key.clone(),
                settings.timeout,
            )
            .map(Arc::new)
            .map_err(|err| std::io::Error::other(format!("identity client setup failed: {err}")))
        })
        .transpose()?;
    if identity.is_none() {
        warn!("no identity provider configured; using fixture identities and logins");
    }

    let login: Arc<dyn LoginService> = match &identity {
        Some(provider) => Arc::clone(provider) as Arc<dyn LoginService>,
        None => Arc::new(FixtureLoginService),
    };

    let policy = config.policy.clone();
    let (batch_enrollment, class_roster) = match &config.db_pool {
        Some(pool) => with_identity(Stores::diesel(pool), identity, policy),
        None => {
            warn!("no database configured; using fixture repositories");
            with_identity(Stores::fixtures(), identity, policy)
        }
    };

    Ok(web::Data::new(HttpState::new(
        login,
        batch_enrollment,
        class_roster,
    )))
}
