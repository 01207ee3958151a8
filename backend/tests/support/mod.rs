//! In-memory adapters and app wiring shared by the HTTP integration tests.

use std::sync::{Arc, Mutex, MutexGuard};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use async_trait::async_trait;
use mockable::DefaultClock;
use serde_json::{Value, json};

use backend::domain::ports::{
    ClassroomRepository, ClassroomRepositoryError, EnrollmentRepository,
    EnrollmentRepositoryError, IdentityProvider, IdentityProviderError, LoginService,
    StudentProfileRepository, StudentProfileRepositoryError,
};
use backend::domain::{
    BatchEnrollmentPorts, BatchEnrollmentService, ClassId, ClassRosterService, Classroom,
    Enrollment, Error, IdentityRecord, LoginCredentials, NewIdentity, NewStudentProfile,
    ProvisioningPolicy, StudentProfile, UserId,
};
use backend::inbound::http::classes::class_students;
use backend::inbound::http::enrollments::enroll_students;
use backend::inbound::http::error::json_error_handler;
use backend::inbound::http::state::HttpState;
use backend::inbound::http::users::{login, logout};

pub const TEACHER_EMAIL: &str = "ms.frizzle@school.test";
pub const TEACHER_PASSWORD: &str = "magic-school-bus";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().expect("store mutex poisoned")
}

/// Everything the in-memory adapters persist.
#[derive(Default)]
pub struct World {
    pub classes: Mutex<Vec<Classroom>>,
    pub profiles: Mutex<Vec<StudentProfile>>,
    pub enrollments: Mutex<Vec<Enrollment>>,
    pub identities: Mutex<Vec<IdentityRecord>>,
    pub teachers: Mutex<Vec<(String, UserId)>>,
}

impl World {
    pub fn add_teacher(&self, email: &str) -> UserId {
        let id = UserId::random();
        lock(&self.teachers).push((email.to_owned(), id.clone()));
        id
    }

    pub fn add_class(&self, teacher_id: &UserId, name: &str) -> ClassId {
        let id = ClassId::from_uuid(uuid::Uuid::new_v4());
        lock(&self.classes).push(Classroom {
            id: id.clone(),
            teacher_id: teacher_id.clone(),
            name: name.to_owned(),
        });
        id
    }

    pub fn usernames(&self) -> Vec<String> {
        lock(&self.profiles)
            .iter()
            .map(|profile| profile.username.to_string())
            .collect()
    }

    pub fn enrollment_count(&self) -> usize {
        lock(&self.enrollments).len()
    }
}

/// Adapter over a shared [`World`] implementing every driven port.
#[derive(Clone)]
pub struct InMemory(pub Arc<World>);

#[async_trait]
impl ClassroomRepository for InMemory {
    async fn find_owned(
        &self,
        class_id: &ClassId,
        owner: &UserId,
    ) -> Result<Option<Classroom>, ClassroomRepositoryError> {
        Ok(lock(&self.0.classes)
            .iter()
            .find(|class| &class.id == class_id && &class.teacher_id == owner)
            .cloned())
    }
}

#[async_trait]
impl StudentProfileRepository for InMemory {
    async fn handles_with_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<String>, StudentProfileRepositoryError> {
        Ok(lock(&self.0.profiles)
            .iter()
            .map(|profile| profile.username.to_string())
            .filter(|handle| handle.starts_with(prefix))
            .collect())
    }

    async fn find_students_by_display_name(
        &self,
        teacher_id: &UserId,
        display_name: &str,
    ) -> Result<Vec<StudentProfile>, StudentProfileRepositoryError> {
        Ok(lock(&self.0.profiles)
            .iter()
            .filter(|profile| {
                profile.teacher_id.as_ref() == Some(teacher_id)
                    && profile.display_name == display_name
            })
            .cloned()
            .collect())
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StudentProfile>, StudentProfileRepositoryError> {
        Ok(lock(&self.0.profiles)
            .iter()
            .find(|profile| &profile.user_id == user_id)
            .cloned())
    }

    async fn insert(
        &self,
        profile: &NewStudentProfile,
    ) -> Result<(), StudentProfileRepositoryError> {
        let mut profiles = lock(&self.0.profiles);
        if profiles.iter().any(|existing| {
            existing.user_id == profile.user_id || existing.username == profile.username
        }) {
            return Err(StudentProfileRepositoryError::duplicate(
                "duplicate key value violates unique constraint",
            ));
        }
        profiles.push(StudentProfile {
            user_id: profile.user_id.clone(),
            username: profile.username.clone(),
            display_name: profile.display_name.clone(),
            email: profile.email.clone(),
            teacher_id: Some(profile.teacher_id.clone()),
            initial_password: profile.initial_password.clone(),
            created_at: chrono::Utc::now(),
        });
        Ok(())
    }
}

#[async_trait]
impl EnrollmentRepository for InMemory {
    async fn exists(
        &self,
        class_id: &ClassId,
        student_id: &UserId,
    ) -> Result<bool, EnrollmentRepositoryError> {
        Ok(lock(&self.0.enrollments)
            .iter()
            .any(|row| &row.class_id == class_id && &row.student_id == student_id))
    }

    async fn insert(&self, enrollment: &Enrollment) -> Result<(), EnrollmentRepositoryError> {
        let mut rows = lock(&self.0.enrollments);
        if rows.iter().any(|row| {
            row.class_id == enrollment.class_id && row.student_id == enrollment.student_id
        }) {
            return Err(EnrollmentRepositoryError::duplicate("enrollment exists"));
        }
        rows.push(enrollment.clone());
        Ok(())
    }

    async fn list_active(
        &self,
        class_id: &ClassId,
    ) -> Result<Vec<Enrollment>, EnrollmentRepositoryError> {
        Ok(lock(&self.0.enrollments)
            .iter()
            .filter(|row| &row.class_id == class_id && row.status == "active")
            .cloned()
            .collect())
    }
}

#[async_trait]
impl IdentityProvider for InMemory {
    async fn create_identity(
        &self,
        identity: &NewIdentity,
    ) -> Result<IdentityRecord, IdentityProviderError> {
        let mut records = lock(&self.0.identities);
        if records.iter().any(|record| record.email == identity.email) {
            return Err(IdentityProviderError::rejected(
                422_u16,
                "A user with this email address has already been registered",
            ));
        }
        let record = IdentityRecord {
            id: UserId::random(),
            email: identity.email.clone(),
            metadata: identity.metadata.clone(),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn fetch_metadata(&self, id: &UserId) -> Result<Option<Value>, IdentityProviderError> {
        Ok(lock(&self.0.identities)
            .iter()
            .find(|record| &record.id == id)
            .map(|record| record.metadata.clone()))
    }
}

#[async_trait]
impl LoginService for InMemory {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.password() != TEACHER_PASSWORD {
            return Err(Error::unauthorized("invalid credentials"));
        }
        lock(&self.0.teachers)
            .iter()
            .find(|(email, _)| email == credentials.email())
            .map(|(_, id)| id.clone())
            .ok_or_else(|| Error::unauthorized("invalid credentials"))
    }
}

/// HTTP state whose ports all read and write `world`.
pub fn http_state(world: &Arc<World>, policy: ProvisioningPolicy) -> HttpState {
    let store = Arc::new(InMemory(Arc::clone(world)));
    let batch = BatchEnrollmentService::new(
        BatchEnrollmentPorts {
            classrooms: Arc::clone(&store),
            profiles: Arc::clone(&store),
            enrollments: Arc::clone(&store),
            identities: Arc::clone(&store),
        },
        Arc::new(DefaultClock),
        policy,
    );
    let roster = ClassRosterService::new(Arc::clone(&store), Arc::clone(&store), Arc::clone(&store));
    HttpState::new(store, Arc::new(batch), Arc::new(roster))
}

/// Initialise the API scope the way the server mounts it.
pub async fn init_app(
    state: HttpState,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .service(
                web::scope("/api/v1")
                    .wrap(
                        SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                            .cookie_name("session".to_owned())
                            .cookie_secure(false)
                            .build(),
                    )
                    .service(login)
                    .service(logout)
                    .service(enroll_students)
                    .service(class_students),
            ),
    )
    .await
}

/// Log in as `email` and return the session cookie.
pub async fn sign_in<S>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"email": email, "password": TEACHER_PASSWORD}))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
