use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request for user registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
  /// User's email address
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  /// User's password
  #[validate(length(
    min = 1,
    max = 128,
    message = "Password must be between 1 and 128 characters"
  ))]
  pub password: String,
}

/// Request for account activation
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActivationRequest {
  /// Activation code received by email
  #[validate(length(min = 1, message = "Activation code is required"))]
  pub code: String,
}

/// Request for re-sending an activation code
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResendCodeRequest {
  /// User's email address
  #[validate(email(message = "Invalid email format"))]
  pub email: String,
}

/// Response after a registration request was accepted.
///
/// The message is identical whether or not the email was already
/// registered; only a fresh registration carries a user id.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
  /// Outcome message
  pub message: String,

  /// Identifier of the newly created user
  #[serde(skip_serializing_if = "Option::is_none")]
  pub user_id: Option<Uuid>,
}

/// Response containing current user information
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
  /// Unique identifier of the user
  pub user_id: Uuid,

  /// User's email address
  pub email: String,

  /// Whether the account has been activated
  pub is_active: bool,

  /// Timestamp when the user account was created
  pub created_at: DateTime<Utc>,
}

/// Standard success response for operations without data
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
  /// Success message
  pub message: String,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional additional details
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<String>,
}
