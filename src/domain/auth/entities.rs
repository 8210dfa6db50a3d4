use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity representing an account in the system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  /// Unique identifier for the user, immutable once assigned
  pub id: Uuid,
  /// User's email address (unique, stored case-sensitively)
  pub email: String,
  /// Hashed password using Argon2
  pub password_hash: String,
  /// Whether the account has been activated
  pub is_active: bool,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
}

impl User {
  /// Creates a new, not-yet-activated user
  pub fn new(email: String, password_hash: String) -> Self {
    Self {
      id: Uuid::new_v4(),
      email,
      password_hash,
      is_active: false,
      created_at: Utc::now(),
    }
  }

  /// Creates a user from database fields (for reconstruction)
  pub fn from_db(
    id: Uuid,
    email: String,
    password_hash: String,
    is_active: bool,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      email,
      password_hash,
      is_active,
      created_at,
    }
  }

  /// Marks the account as activated
  pub fn activate(&mut self) {
    self.is_active = true;
  }
}

/// Short-lived numeric code proving control of the registered email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationCode {
  /// The user this code belongs to
  pub user_id: Uuid,
  /// The code value (4 ASCII decimal digits)
  pub code: String,
  /// Timestamp when the code was issued
  pub created_at: DateTime<Utc>,
  /// Timestamp after which the code is no longer valid
  pub expires_at: DateTime<Utc>,
}

impl ActivationCode {
  /// Creates a new activation code expiring `ttl` after now
  pub fn new(user_id: Uuid, code: String, ttl: Duration) -> Self {
    let now = Utc::now();
    Self {
      user_id,
      code,
      created_at: now,
      expires_at: now + ttl,
    }
  }

  /// Creates an activation code from database fields (for reconstruction)
  pub fn from_db(
    user_id: Uuid,
    code: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
  ) -> Self {
    Self {
      user_id,
      code,
      created_at,
      expires_at,
    }
  }

  /// Checks whether the code has passed its expiry timestamp
  pub fn is_expired(&self) -> bool {
    Utc::now() > self.expires_at
  }
}
