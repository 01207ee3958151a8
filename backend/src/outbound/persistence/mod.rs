//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between internal row structs (`models.rs`) and
//! domain types, and classify database failures into each port's error
//! type. Connections come from a `bb8` pool of `diesel-async` connections.
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselClassroomRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/gems")).await?;
//! let classrooms = DieselClassroomRepository::new(pool.clone());
//! ```

mod diesel_classroom_repository;
mod diesel_enrollment_repository;
mod diesel_error_mapping;
mod diesel_student_profile_repository;
mod models;
mod pool;
mod schema;

pub use diesel_classroom_repository::DieselClassroomRepository;
pub use diesel_enrollment_repository::DieselEnrollmentRepository;
pub use diesel_student_profile_repository::DieselStudentProfileRepository;
pub use pool::{DEFAULT_CHECKOUT_TIMEOUT, DEFAULT_POOL_SIZE, DbPool, PoolConfig, PoolError};
