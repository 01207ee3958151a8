//! Student accounts provisioned by teachers.
//!
//! A student account is an identity-provider user plus a profile row that
//! records the generated handle, the owning teacher, and (optionally) the
//! initial password so the teacher can read it out again later.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde_json::{Value, json};
use zeroize::Zeroizing;

use super::{Handle, UserId};

/// Account-kind marker stored on student profiles.
pub const STUDENT_ROLE: &str = "student";

/// Default domain for synthesised student contact addresses.
pub const DEFAULT_STUDENT_EMAIL_DOMAIN: &str = "students.languagegems.com";

/// Default length of generated initial passwords.
pub const DEFAULT_INITIAL_PASSWORD_LENGTH: usize = 8;

const PASSWORD_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Metadata key holding the initial password on identity records.
pub const INITIAL_PASSWORD_METADATA_KEY: &str = "initial_password";

/// Stored student profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentProfile {
    pub user_id: UserId,
    pub username: Handle,
    pub display_name: String,
    pub email: String,
    pub teacher_id: Option<UserId>,
    /// Plaintext initial password, present only when the deployment keeps it.
    pub initial_password: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile row written for a freshly created identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudentProfile {
    pub user_id: UserId,
    pub username: Handle,
    pub display_name: String,
    pub email: String,
    pub teacher_id: UserId,
    pub initial_password: Option<String>,
}

/// Identity-provider user to create for a new student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub email: String,
    pub password: InitialPassword,
    pub metadata: Value,
}

/// Identity-provider user as returned after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityRecord {
    pub id: UserId,
    pub email: String,
    pub metadata: Value,
}

impl IdentityRecord {
    /// Initial password copied into the identity metadata, if any.
    pub fn initial_password(&self) -> Option<&str> {
        metadata_initial_password(&self.metadata)
    }
}

/// Non-empty initial password stored under the identity metadata key.
pub fn metadata_initial_password(metadata: &Value) -> Option<&str> {
    metadata
        .get(INITIAL_PASSWORD_METADATA_KEY)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// Randomly generated first password for a student account.
///
/// The value is wiped from memory when dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct InitialPassword(Zeroizing<String>);

impl InitialPassword {
    /// Draw a password of `length` lowercase letters and digits.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::InitialPassword;
    ///
    /// let password = InitialPassword::generate(8, &mut rand::thread_rng());
    /// assert_eq!(password.expose().len(), 8);
    /// ```
    pub fn generate<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Self {
        let value: String = (0..length)
            .map(|_| {
                let index = rng.gen_range(0..PASSWORD_ALPHABET.len());
                char::from(PASSWORD_ALPHABET.get(index).copied().unwrap_or(b'a'))
            })
            .collect();
        Self(Zeroizing::new(value))
    }

    /// Borrow the plaintext value.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for InitialPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("InitialPassword(***)")
    }
}

/// Deployment choices that shape new student accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningPolicy {
    /// Keep the initial password in plaintext on the profile and identity
    /// metadata so teachers can read it out later.
    pub store_initial_password: bool,
    /// Domain used for synthesised contact addresses.
    pub email_domain: String,
    /// Length of generated initial passwords.
    pub password_length: usize,
}

impl Default for ProvisioningPolicy {
    fn default() -> Self {
        Self {
            store_initial_password: true,
            email_domain: DEFAULT_STUDENT_EMAIL_DOMAIN.to_owned(),
            password_length: DEFAULT_INITIAL_PASSWORD_LENGTH,
        }
    }
}

impl ProvisioningPolicy {
    /// Contact address for a handle, unique per millisecond.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Handle, ProvisioningPolicy};
    ///
    /// let policy = ProvisioningPolicy::default();
    /// let email = policy.contact_address(&Handle::from_stored("BobS"), 1_700_000_000_000);
    /// assert_eq!(email, "bobs.1700000000000@students.languagegems.com");
    /// ```
    pub fn contact_address(&self, handle: &Handle, unix_millis: i64) -> String {
        format!(
            "{}.{unix_millis}@{}",
            handle.as_ref().to_lowercase(),
            self.email_domain
        )
    }

    /// Identity metadata recorded alongside a new student.
    pub fn identity_metadata(
        &self,
        handle: &Handle,
        display_name: &str,
        teacher_id: &UserId,
        password: &InitialPassword,
    ) -> Value {
        let mut metadata = json!({
            "username": handle.as_ref(),
            "display_name": display_name,
            "role": STUDENT_ROLE,
            "teacher_id": teacher_id.as_ref(),
        });
        if self.store_initial_password
            && let Some(object) = metadata.as_object_mut()
        {
            object.insert(
                INITIAL_PASSWORD_METADATA_KEY.to_owned(),
                Value::String(password.expose().to_owned()),
            );
        }
        metadata
    }

    /// Plaintext password to persist on the profile, if the policy allows it.
    pub fn stored_password(&self, password: &InitialPassword) -> Option<String> {
        self.store_initial_password
            .then(|| password.expose().to_owned())
    }
}
