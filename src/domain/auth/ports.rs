use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{ActivationCode, User};
use super::errors::AuthError;
use super::value_objects::{Email, Password, PasswordHash};

/// Repository trait for user persistence operations.
///
/// Absence is expressed as `Ok(None)` or `Ok(false)`, never as an
/// error; the service layer decides which typed failure a miss maps to.
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Creates a new user. The email-uniqueness check must be atomic
  /// with the insert; a conflicting concurrent insert surfaces as
  /// `RepositoryError::DuplicateKey`.
  async fn create(&self, user: User) -> Result<User, AuthError>;

  /// Finds a user by their unique identifier
  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

  /// Finds a user by their email address
  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError>;

  /// Updates an existing user
  async fn update(&self, user: User) -> Result<User, AuthError>;

  /// Checks whether a user with this email exists
  async fn exists_by_email(&self, email: &Email) -> Result<bool, AuthError>;

  /// Marks a user account as active. Returns false when no such user
  /// exists.
  async fn activate(&self, id: Uuid) -> Result<bool, AuthError>;
}

/// Repository trait for activation code persistence.
///
/// At most one live code exists per user; `create` replaces any prior
/// code atomically. Code TTL and the collision retry bound are
/// configuration of the implementation, not of the caller.
#[async_trait]
pub trait ActivationCodeRepository: Send + Sync {
  /// Deletes any prior code for the user, then generates and persists
  /// a fresh 4-digit code unique among currently-live codes.
  async fn create(&self, user_id: Uuid) -> Result<ActivationCode, AuthError>;

  /// Finds the live code for a user
  async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<ActivationCode>, AuthError>;

  /// Finds a live code by its value
  async fn find_by_code(&self, code: &str) -> Result<Option<ActivationCode>, AuthError>;

  /// Deletes the code for a user. Deleting an already-deleted code is
  /// a no-op returning false.
  async fn delete(&self, user_id: Uuid) -> Result<bool, AuthError>;

  /// Removes all codes whose expiry has passed, returning how many
  /// were deleted. Safe to run concurrently with normal traffic.
  async fn cleanup_expired(&self) -> Result<u64, AuthError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError>;

  /// Verifies a plain text password against a hashed password
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError>;
}

/// Out-of-band delivery of activation codes.
///
/// Delivery is best-effort: implementations return false on failure
/// and callers log rather than propagate.
#[async_trait]
pub trait Mailer: Send + Sync {
  /// Sends the activation code to the given address
  async fn send_activation_email(&self, to_email: &str, code: &str) -> bool;
}
