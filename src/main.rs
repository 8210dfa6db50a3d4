use actix_web::{App, HttpServer, middleware::Logger, web};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keyturn::{
  adapters::http::configure_auth_routes,
  application::auth::{
    ActivateAccountUseCase, CleanupCodesUseCase, GetCurrentUserUseCase, RegisterUserUseCase,
    ResendCodeUseCase,
  },
  domain::auth::ports::Mailer,
  domain::auth::services::AccountService,
  infrastructure::{
    config::{Config, EmailMode},
    email::{ApiMailer, LogMailer},
    persistence::postgres::{PostgresActivationCodeRepository, PostgresUserRepository},
    security::Argon2PasswordHasher,
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "keyturn=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting Keyturn application");

  // Load configuration
  let config = Config::load().expect("Failed to load configuration");
  tracing::info!("Configuration loaded successfully");

  // Set up database connection pool with timeout
  tracing::info!("Connecting to database: {}", config.database.url);

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        format!(
          "Could not connect to database. Is PostgreSQL running at {}?",
          config.database.url
        ),
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  // Run database migrations
  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .expect("Failed to run database migrations");
  tracing::info!("Database migrations completed");

  // Initialize repositories
  let code_ttl = chrono::Duration::seconds(config.security.activation_code_ttl_seconds as i64);
  let user_repo = Arc::new(PostgresUserRepository::new(db_pool.clone()));
  let code_repo = Arc::new(PostgresActivationCodeRepository::with_attempts(
    db_pool.clone(),
    code_ttl,
    config.security.code_generation_attempts,
  ));

  // Initialize security services
  let password_hasher = Arc::new(
    Argon2PasswordHasher::new(
      config.security.argon2_memory_kib,
      config.security.argon2_time_cost,
      config.security.argon2_parallelism,
    )
    .expect("Failed to create password hasher"),
  );

  // Initialize the activation mailer
  let mailer: Arc<dyn Mailer> = match config.email.mode {
    EmailMode::Api => match (&config.email.api_url, &config.email.api_key) {
      (Some(api_url), Some(api_key)) => {
        tracing::info!("Using email API at {}", api_url);
        Arc::new(ApiMailer::new(
          api_url.clone(),
          api_key.clone(),
          config.email.sender.clone(),
        ))
      }
      _ => {
        tracing::warn!("Email API credentials not configured, falling back to log mailer");
        Arc::new(LogMailer::new())
      }
    },
    EmailMode::Log => {
      tracing::info!("Using log mailer, activation codes are written to the log");
      Arc::new(LogMailer::new())
    }
  };

  // Initialize domain service
  let account_service = Arc::new(AccountService::new(
    user_repo,
    code_repo,
    password_hasher,
    mailer,
  ));

  // Initialize use cases
  let register_use_case = Arc::new(RegisterUserUseCase::new(account_service.clone()));
  let activate_use_case = Arc::new(ActivateAccountUseCase::new(account_service.clone()));
  let resend_use_case = Arc::new(ResendCodeUseCase::new(account_service.clone()));
  let get_user_use_case = Arc::new(GetCurrentUserUseCase::new(account_service.clone()));
  let cleanup_use_case = Arc::new(CleanupCodesUseCase::new(account_service));

  // Periodic sweep of expired activation codes
  let sweep_interval = Duration::from_secs(config.security.code_sweep_interval_seconds);
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(sweep_interval);
    // Skip the tick fired immediately at startup
    ticker.tick().await;
    loop {
      ticker.tick().await;
      if let Err(e) = cleanup_use_case.execute().await {
        tracing::error!("Expired code sweep failed: {}", e);
      }
    }
  });

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  // Create and start the HTTP server
  HttpServer::new(move || {
    App::new()
      // Add logging middleware
      .wrap(Logger::default())
      // Configure API routes
      .service(web::scope("/api/v1/auth").configure(|cfg| {
        configure_auth_routes(
          cfg,
          register_use_case.clone(),
          activate_use_case.clone(),
          resend_use_case.clone(),
          get_user_use_case.clone(),
        )
      }))
      // Health check endpoint
      .route("/health", web::get().to(health_check))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}

/// Health check endpoint
async fn health_check() -> &'static str {
  "OK"
}
