use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::{AccountService, ResendOutcome};
use crate::domain::auth::value_objects::Email;

/// Use case for re-issuing an activation code to a registered user
pub struct ResendCodeUseCase {
  account_service: Arc<AccountService>,
}

impl ResendCodeUseCase {
  /// Creates a new instance of ResendCodeUseCase
  pub fn new(account_service: Arc<AccountService>) -> Self {
    Self { account_service }
  }

  /// Executes the resend use case
  ///
  /// # Errors
  /// Returns `AuthError::UserNotFound` when no account exists for the
  /// email. An already-active account is a distinct successful outcome,
  /// not an error.
  pub async fn execute(&self, email: String) -> Result<ResendOutcome, AuthError> {
    let email = Email::new(email)?;
    self.account_service.resend_code(&email).await
  }
}
