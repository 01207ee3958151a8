//! Diesel table definitions.
//!
//! These must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Classes, each owned by one teacher.
    classes (id) {
        id -> Uuid,
        teacher_id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Student and teacher profiles keyed by identity-provider user id.
    ///
    /// `username` is unique across all profiles.
    user_profiles (user_id) {
        user_id -> Uuid,
        username -> Varchar,
        display_name -> Varchar,
        email -> Varchar,
        role -> Varchar,
        teacher_id -> Nullable<Uuid>,
        /// Plaintext initial secret, null when storage is disabled.
        initial_password -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Class membership; unique per (`class_id`, `student_id`).
    class_enrollments (id) {
        id -> Uuid,
        class_id -> Uuid,
        student_id -> Uuid,
        status -> Varchar,
        enrolled_at -> Timestamptz,
    }
}

diesel::joinable!(class_enrollments -> classes (class_id));
diesel::joinable!(class_enrollments -> user_profiles (student_id));

diesel::allow_tables_to_appear_in_same_query!(classes, user_profiles, class_enrollments);
