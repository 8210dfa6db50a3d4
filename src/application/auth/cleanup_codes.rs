use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AccountService;

/// Use case for sweeping expired activation codes.
///
/// Driven by the periodic background task in main; kept as a use case
/// so the sweep can also be triggered from tests or an admin surface.
pub struct CleanupCodesUseCase {
  account_service: Arc<AccountService>,
}

impl CleanupCodesUseCase {
  /// Creates a new instance of CleanupCodesUseCase
  pub fn new(account_service: Arc<AccountService>) -> Self {
    Self { account_service }
  }

  /// Executes the cleanup use case, returning the number of codes removed
  pub async fn execute(&self) -> Result<u64, AuthError> {
    self.account_service.cleanup_expired_codes().await
  }
}
