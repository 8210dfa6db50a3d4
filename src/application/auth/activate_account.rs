use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AccountService;

/// Use case for activating an account with an emailed code
pub struct ActivateAccountUseCase {
  account_service: Arc<AccountService>,
}

impl ActivateAccountUseCase {
  /// Creates a new instance of ActivateAccountUseCase
  pub fn new(account_service: Arc<AccountService>) -> Self {
    Self { account_service }
  }

  /// Executes the account activation use case
  ///
  /// # Errors
  /// Returns `AuthError::InvalidCode` for an unknown code,
  /// `AuthError::CodeExpired` for a stale one, and
  /// `AuthError::UserNotFound` when the code's owner no longer exists.
  pub async fn execute(&self, code: String) -> Result<(), AuthError> {
    self.account_service.activate(code.trim()).await
  }
}
