use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use std::sync::Arc;
use uuid::Uuid;

use super::entities::User;
use super::errors::{AuthError, RepositoryError};
use super::ports::{ActivationCodeRepository, Mailer, PasswordHasher, UserRepository};
use super::value_objects::{Email, Password, PasswordHash};

/// Scheme tag expected in front of transport-level credentials
const BASIC_SCHEME: &str = "Basic ";

/// Outcome of a code issue/resend request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResendOutcome {
  /// A fresh code was created and handed to the mailer
  CodeSent,
  /// The account is already active; no code was created, no email sent
  AlreadyActive,
}

/// Account service implementing the registration, activation and
/// credential-verification state machine.
///
/// The service holds no state of its own; all mutable state lives in
/// the two repositories. An account moves
/// `Unregistered -> PendingActivation -> Active` and never back.
pub struct AccountService {
  user_repo: Arc<dyn UserRepository>,
  code_repo: Arc<dyn ActivationCodeRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  mailer: Arc<dyn Mailer>,
}

impl AccountService {
  /// Creates a new instance of AccountService
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    code_repo: Arc<dyn ActivationCodeRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    mailer: Arc<dyn Mailer>,
  ) -> Self {
    Self {
      user_repo,
      code_repo,
      password_hasher,
      mailer,
    }
  }

  /// Registers a new user and sends the activation code.
  ///
  /// Returns `Ok(None)` when the email is already taken. This is a
  /// deliberate anti-enumeration measure: the caller-facing outcome
  /// must be indistinguishable from a fresh registration, so the
  /// duplicate is never surfaced as an error. A concurrent duplicate
  /// insert racing past the existence check is masked the same way.
  ///
  /// Mail delivery is best-effort and never rolls back user creation.
  pub async fn register(
    &self,
    email: Email,
    password: Password,
  ) -> Result<Option<User>, AuthError> {
    if self.user_repo.exists_by_email(&email).await? {
      return Ok(None);
    }

    let password_hash = self.password_hasher.hash(&password).await?;

    let user = User::new(email.into_inner(), password_hash.into_inner());

    let created_user = match self.user_repo.create(user).await {
      Ok(user) => user,
      Err(AuthError::DuplicateEmail)
      | Err(AuthError::Repository(RepositoryError::DuplicateKey(_))) => {
        return Ok(None);
      }
      Err(e) => return Err(e),
    };

    let activation_code = self.code_repo.create(created_user.id).await?;

    if !self
      .mailer
      .send_activation_email(&created_user.email, &activation_code.code)
      .await
    {
      tracing::warn!(
        email = %created_user.email,
        "failed to deliver activation email, user was still created"
      );
    }

    Ok(Some(created_user))
  }

  /// Activates the account owning the given code.
  ///
  /// The code is single-use: it is deleted both on success and when it
  /// is found expired, so repeating the call with the same code yields
  /// `InvalidCode` rather than a phantom activation.
  pub async fn activate(&self, activation_code: &str) -> Result<(), AuthError> {
    let code = self
      .code_repo
      .find_by_code(activation_code)
      .await?
      .ok_or(AuthError::InvalidCode)?;

    if code.is_expired() {
      self.code_repo.delete(code.user_id).await?;
      return Err(AuthError::CodeExpired);
    }

    if !self.user_repo.activate(code.user_id).await? {
      // A live code pointing at a missing user is inconsistent state
      return Err(AuthError::UserNotFound);
    }

    self.code_repo.delete(code.user_id).await?;

    Ok(())
  }

  /// Issues a fresh activation code for a known user id.
  ///
  /// Already-active accounts get `AlreadyActive` back instead of an
  /// error, and no code is created and no email sent; callers must not
  /// be able to spam codes at activated accounts.
  pub async fn issue_code(&self, user_id: Uuid) -> Result<ResendOutcome, AuthError> {
    let user = self
      .user_repo
      .find_by_id(user_id)
      .await?
      .ok_or(AuthError::UserNotFound)?;

    self.issue_code_for(&user).await
  }

  /// Resends an activation code, resolving the user by email first
  pub async fn resend_code(&self, email: &Email) -> Result<ResendOutcome, AuthError> {
    let user = self
      .user_repo
      .find_by_email(email)
      .await?
      .ok_or(AuthError::UserNotFound)?;

    self.issue_code_for(&user).await
  }

  async fn issue_code_for(&self, user: &User) -> Result<ResendOutcome, AuthError> {
    if user.is_active {
      return Ok(ResendOutcome::AlreadyActive);
    }

    // The repository replaces any prior code for this user atomically
    let activation_code = self.code_repo.create(user.id).await?;

    if !self
      .mailer
      .send_activation_email(&user.email, &activation_code.code)
      .await
    {
      tracing::warn!(email = %user.email, "failed to deliver activation email");
    }

    Ok(ResendOutcome::CodeSent)
  }

  /// Verifies credentials and returns the user record.
  ///
  /// An unknown email fails with `UserNotFound`; an inactive account
  /// and a wrong password both fail with `InvalidCredentials` so that
  /// login attempts cannot probe activation state. The HTTP boundary
  /// additionally masks `UserNotFound` to the same 401 response.
  pub async fn authenticate(&self, email: &Email, password: &Password) -> Result<User, AuthError> {
    let user = self
      .user_repo
      .find_by_email(email)
      .await?
      .ok_or(AuthError::UserNotFound)?;

    if !user.is_active {
      return Err(AuthError::InvalidCredentials);
    }

    let password_hash = PasswordHash::from_hash(&user.password_hash)?;

    if self.password_hasher.verify(password, &password_hash).await? {
      Ok(user)
    } else {
      Err(AuthError::InvalidCredentials)
    }
  }

  /// Verifies transport-level credentials: the `Basic ` scheme tag
  /// followed by base64 of `email:password`.
  ///
  /// Any malformed encoding (wrong scheme prefix, bad base64, non-UTF-8
  /// payload, missing separator) fails with `InvalidCredentials`.
  pub async fn authenticate_basic(&self, authorization_header: &str) -> Result<User, AuthError> {
    let encoded = authorization_header
      .strip_prefix(BASIC_SCHEME)
      .ok_or(AuthError::InvalidCredentials)?;

    let decoded = BASE64_STANDARD
      .decode(encoded.trim())
      .map_err(|_| AuthError::InvalidCredentials)?;

    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::InvalidCredentials)?;

    let (email, password) = decoded
      .split_once(':')
      .ok_or(AuthError::InvalidCredentials)?;

    let email = Email::new(email).map_err(|_| AuthError::InvalidCredentials)?;
    let password = Password::new(password).map_err(|_| AuthError::InvalidCredentials)?;

    self.authenticate(&email, &password).await
  }

  /// Removes all expired activation codes, returning the count deleted
  pub async fn cleanup_expired_codes(&self) -> Result<u64, AuthError> {
    let removed = self.code_repo.cleanup_expired().await?;
    if removed > 0 {
      tracing::debug!(removed, "swept expired activation codes");
    }
    Ok(removed)
  }
}
