use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{
    ActivationRequest, CurrentUserResponse, RegisterRequest, RegisterResponse, ResendCodeRequest,
    SuccessResponse,
  },
  errors::{ApiError, AuthErrorKind},
};
use crate::application::auth::{
  ActivateAccountUseCase, GetCurrentUserResponse as UseCaseCurrentUserResponse,
  GetCurrentUserUseCase, RegisterUserCommand, RegisterUserResponse as UseCaseRegisterResponse,
  RegisterUserUseCase, ResendCodeUseCase,
};
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::ResendOutcome;

/// Extract the raw Authorization header value
fn extract_authorization(req: &HttpRequest) -> Result<&str, ApiError> {
  req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .ok_or(ApiError::Auth(AuthErrorKind::InvalidCredentials))
}

/// Handler for user registration
///
/// POST /api/v1/auth/register
/// Body: RegisterRequest (JSON)
/// Response: RegisterResponse (JSON) with status 201
///
/// Returns the same message whether or not the email was already
/// registered, so the endpoint cannot be used to enumerate accounts.
pub async fn register_handler(
  request: web::Json<RegisterRequest>,
  use_case: web::Data<Arc<RegisterUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = RegisterUserCommand {
    email: request.email.clone(),
    password: request.password.clone(),
  };

  let response: UseCaseRegisterResponse = use_case.execute(command).await?;

  let api_response = RegisterResponse {
    message: "Registration successful. Check your email for activation code.".to_string(),
    user_id: response.user_id,
  };

  Ok(HttpResponse::Created().json(api_response))
}

/// Handler for account activation
///
/// POST /api/v1/auth/activate
/// Body: ActivationRequest (JSON)
/// Response: SuccessResponse (JSON) with status 200
pub async fn activate_handler(
  request: web::Json<ActivationRequest>,
  use_case: web::Data<Arc<ActivateAccountUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  use_case.execute(request.code.clone()).await?;

  let response = SuccessResponse {
    message: "Account activated successfully.".to_string(),
  };

  Ok(HttpResponse::Ok().json(response))
}

/// Handler for re-sending an activation code
///
/// POST /api/v1/auth/resend-code
/// Body: ResendCodeRequest (JSON)
/// Response: SuccessResponse (JSON) with status 200
pub async fn resend_code_handler(
  request: web::Json<ResendCodeRequest>,
  use_case: web::Data<Arc<ResendCodeUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let outcome = use_case.execute(request.email.clone()).await?;

  let message = match outcome {
    ResendOutcome::CodeSent => "Activation code sent to your email.",
    ResendOutcome::AlreadyActive => "Account already activated.",
  };

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: message.to_string(),
  }))
}

/// Handler for getting current user information
///
/// GET /api/v1/auth/me
/// Headers: Authorization: Basic <base64(email:password)>
/// Response: CurrentUserResponse (JSON) with status 200
pub async fn get_current_user_handler(
  use_case: web::Data<Arc<GetCurrentUserUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let authorization = extract_authorization(&http_req)?;

  // An unknown email must be indistinguishable from a wrong password
  // on this path, so the account list cannot be enumerated
  let response: UseCaseCurrentUserResponse = match use_case.execute(authorization).await {
    Ok(response) => response,
    Err(AuthError::UserNotFound) => {
      return Err(ApiError::Auth(AuthErrorKind::InvalidCredentials));
    }
    Err(e) => return Err(e.into()),
  };

  let api_response = CurrentUserResponse {
    user_id: response.user_id,
    email: response.email,
    is_active: response.is_active,
    created_at: response.created_at,
  };

  Ok(HttpResponse::Ok().json(api_response))
}
