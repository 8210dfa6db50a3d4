use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AccountService;
use crate::domain::auth::value_objects::{Email, Password};

/// Command for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
  /// User's email address
  pub email: String,
  /// User's password (plain text, will be hashed)
  pub password: String,
}

/// Response after a registration request was accepted
#[derive(Debug, Clone)]
pub struct RegisterUserResponse {
  /// Identifier of the newly created user. `None` when the email was
  /// already taken; the caller must not reveal which case occurred.
  pub user_id: Option<Uuid>,
}

/// Use case for registering a new user
pub struct RegisterUserUseCase {
  account_service: Arc<AccountService>,
}

impl RegisterUserUseCase {
  /// Creates a new instance of RegisterUserUseCase
  pub fn new(account_service: Arc<AccountService>) -> Self {
    Self { account_service }
  }

  /// Executes the user registration use case
  ///
  /// # Errors
  /// Returns `AuthError` if the email or password fails validation, or
  /// if registration fails for infrastructure reasons. A duplicate
  /// email is NOT an error; it yields a response without a user id.
  pub async fn execute(
    &self,
    command: RegisterUserCommand,
  ) -> Result<RegisterUserResponse, AuthError> {
    let email = Email::new(command.email)?;
    let password = Password::new(command.password)?;

    let user = self.account_service.register(email, password).await?;

    Ok(RegisterUserResponse {
      user_id: user.map(|u| u.id),
    })
  }
}
