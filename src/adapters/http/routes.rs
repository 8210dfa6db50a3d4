use actix_web::web;
use std::sync::Arc;

use crate::application::auth::{
  ActivateAccountUseCase, GetCurrentUserUseCase, RegisterUserUseCase, ResendCodeUseCase,
};

use super::handlers::auth::{
  activate_handler, get_current_user_handler, register_handler, resend_code_handler,
};

/// Configure authentication routes
///
/// Mounts all authentication-related endpoints under the provided scope.
/// All routes are prefixed with the scope path (e.g., /api/v1/auth).
///
/// # Routes
///
/// - POST /register - Register a new user account
/// - POST /activate - Activate an account with an emailed code
/// - POST /resend-code - Re-issue an activation code
/// - GET /me - Get current user information (Basic auth)
pub fn configure_auth_routes(
  cfg: &mut web::ServiceConfig,
  register_use_case: Arc<RegisterUserUseCase>,
  activate_use_case: Arc<ActivateAccountUseCase>,
  resend_use_case: Arc<ResendCodeUseCase>,
  get_user_use_case: Arc<GetCurrentUserUseCase>,
) {
  // Store use cases in app data so handlers can access them
  cfg
    .app_data(web::Data::new(register_use_case))
    .app_data(web::Data::new(activate_use_case))
    .app_data(web::Data::new(resend_use_case))
    .app_data(web::Data::new(get_user_use_case))
    // Configure routes
    .route("/register", web::post().to(register_handler))
    .route("/activate", web::post().to(activate_handler))
    .route("/resend-code", web::post().to(resend_code_handler))
    .route("/me", web::get().to(get_current_user_handler));
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::http::StatusCode;
  use actix_web::{App, test};
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
  use chrono::Duration;
  use serde_json::{Value, json};

  use crate::domain::auth::ports::ActivationCodeRepository;
  use crate::domain::auth::services::AccountService;
  use crate::infrastructure::email::LogMailer;
  use crate::infrastructure::persistence::memory::{
    InMemoryActivationCodeRepository, InMemoryUserRepository,
  };
  use crate::infrastructure::security::Argon2PasswordHasher;

  fn build_service() -> (AccountService, Arc<InMemoryActivationCodeRepository>) {
    let user_repo = Arc::new(InMemoryUserRepository::new());
    let code_repo = Arc::new(InMemoryActivationCodeRepository::new(Duration::seconds(60)));
    let hasher = Arc::new(Argon2PasswordHasher::default());
    let mailer = Arc::new(LogMailer::new());

    let service = AccountService::new(user_repo, code_repo.clone(), hasher, mailer);
    (service, code_repo)
  }

  async fn test_app(
    service: Arc<AccountService>,
  ) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
    Error = actix_web::Error,
  > {
    let register = Arc::new(RegisterUserUseCase::new(service.clone()));
    let activate = Arc::new(ActivateAccountUseCase::new(service.clone()));
    let resend = Arc::new(ResendCodeUseCase::new(service.clone()));
    let me = Arc::new(GetCurrentUserUseCase::new(service));

    test::init_service(App::new().service(web::scope("/api/v1/auth").configure(|cfg| {
      configure_auth_routes(cfg, register, activate, resend, me);
    })))
    .await
  }

  #[actix_web::test]
  async fn test_full_registration_flow() {
    let (service, code_repo) = build_service();
    let app = test_app(Arc::new(service)).await;

    // Register
    let req = test::TestRequest::post()
      .uri("/api/v1/auth/register")
      .set_json(json!({"email": "flow@example.com", "password": "pw123456"}))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    let user_id = body["user_id"].as_str().unwrap().parse().unwrap();

    // Before activation, credentials are rejected
    let header = format!(
      "Basic {}",
      BASE64_STANDARD.encode("flow@example.com:pw123456")
    );
    let req = test::TestRequest::get()
      .uri("/api/v1/auth/me")
      .insert_header(("Authorization", header.clone()))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Activate with the issued code
    let code = code_repo.find_by_user_id(user_id).await.unwrap().unwrap();
    let req = test::TestRequest::post()
      .uri("/api/v1/auth/activate")
      .set_json(json!({"code": code.code}))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Now Basic auth works
    let req = test::TestRequest::get()
      .uri("/api/v1/auth/me")
      .insert_header(("Authorization", header))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "flow@example.com");
    assert_eq!(body["is_active"], true);
  }

  #[actix_web::test]
  async fn test_duplicate_registration_masked() {
    let (service, _) = build_service();
    let app = test_app(Arc::new(service)).await;

    let payload = json!({"email": "taken@example.com", "password": "pw123456"});

    let req = test::TestRequest::post()
      .uri("/api/v1/auth/register")
      .set_json(payload.clone())
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let first: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
      .uri("/api/v1/auth/register")
      .set_json(payload)
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let second: Value = test::read_body_json(resp).await;

    // Same message both times; only the first carries a user id
    assert_eq!(first["message"], second["message"]);
    assert!(first["user_id"].is_string());
    assert!(second.get("user_id").is_none());
  }

  #[actix_web::test]
  async fn test_activate_with_unknown_code() {
    let (service, _) = build_service();
    let app = test_app(Arc::new(service)).await;

    let req = test::TestRequest::post()
      .uri("/api/v1/auth/activate")
      .set_json(json!({"code": "9999"}))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_code");
  }

  #[actix_web::test]
  async fn test_resend_for_unknown_email() {
    let (service, _) = build_service();
    let app = test_app(Arc::new(service)).await;

    let req = test::TestRequest::post()
      .uri("/api/v1/auth/resend-code")
      .set_json(json!({"email": "ghost@example.com"}))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[actix_web::test]
  async fn test_me_with_unknown_email_masked_as_invalid_credentials() {
    let (service, _) = build_service();
    let app = test_app(Arc::new(service)).await;

    // No account for this email exists; the response must be the same
    // 401 a wrong password would get, never a 404
    let header = format!(
      "Basic {}",
      BASE64_STANDARD.encode("nobody@example.com:whatever")
    );
    let req = test::TestRequest::get()
      .uri("/api/v1/auth/me")
      .insert_header(("Authorization", header))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_credentials");
  }

  #[actix_web::test]
  async fn test_me_without_authorization_header() {
    let (service, _) = build_service();
    let app = test_app(Arc::new(service)).await;

    let req = test::TestRequest::get().uri("/api/v1/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[actix_web::test]
  async fn test_register_rejects_invalid_email() {
    let (service, _) = build_service();
    let app = test_app(Arc::new(service)).await;

    let req = test::TestRequest::post()
      .uri("/api/v1/auth/register")
      .set_json(json!({"email": "not-an-email", "password": "pw123456"}))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }
}
