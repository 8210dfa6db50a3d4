pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod routes;

// Re-export commonly used types
pub use dtos::{
  ActivationRequest, CurrentUserResponse, ErrorResponse, RegisterRequest, RegisterResponse,
  ResendCodeRequest, SuccessResponse,
};
pub use errors::{ApiError, AuthErrorKind};
pub use handlers::auth::{
  activate_handler, get_current_user_handler, register_handler, resend_code_handler,
};
pub use routes::configure_auth_routes;
