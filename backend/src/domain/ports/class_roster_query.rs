//! Driving port for listing a class's students.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ClassId, Error, Handle, UserId};

/// One enrolled student as shown to the owning teacher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub user_id: UserId,
    pub name: String,
    pub username: Handle,
    pub email: String,
    /// Stored initial password, `None` when the deployment does not keep it.
    pub initial_password: Option<String>,
    pub enrolled_at: DateTime<Utc>,
}

/// Read the roster of a class owned by the requesting teacher.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClassRosterQuery: Send + Sync {
    /// Students enrolled in `class_id`, in enrollment order.
    async fn roster(&self, principal: &UserId, class_id: &ClassId)
    -> Result<Vec<RosterEntry>, Error>;
}
