use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AccountService;

/// Response containing current user information
#[derive(Debug, Clone)]
pub struct GetCurrentUserResponse {
  /// Unique identifier of the user
  pub user_id: Uuid,
  /// User's email address
  pub email: String,
  /// Whether the account has been activated
  pub is_active: bool,
  /// Timestamp when the user account was created
  pub created_at: DateTime<Utc>,
}

/// Use case for getting the current authenticated user
pub struct GetCurrentUserUseCase {
  account_service: Arc<AccountService>,
}

impl GetCurrentUserUseCase {
  /// Creates a new instance of GetCurrentUserUseCase
  pub fn new(account_service: Arc<AccountService>) -> Self {
    Self { account_service }
  }

  /// Executes the get current user use case
  ///
  /// # Arguments
  /// * `authorization` - The raw Authorization header value ("Basic ...")
  ///
  /// # Errors
  /// Returns `AuthError` if the header is malformed or the credentials
  /// do not match an active account.
  pub async fn execute(&self, authorization: &str) -> Result<GetCurrentUserResponse, AuthError> {
    let user = self.account_service.authenticate_basic(authorization).await?;

    Ok(GetCurrentUserResponse {
      user_id: user.id,
      email: user.email,
      is_active: user.is_active,
      created_at: user.created_at,
    })
  }
}
