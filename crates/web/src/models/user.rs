//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use recipe_box_core::{UserId, Username};

/// A registered user (domain type).
///
/// The password hash never leaves the repository layer.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name.
    pub username: Username,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}
