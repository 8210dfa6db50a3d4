use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::{
  entities::ActivationCode,
  errors::{AuthError, RepositoryError},
  ports::ActivationCodeRepository,
};
use crate::infrastructure::security::NumericCodeGenerator;

const DEFAULT_GENERATION_ATTEMPTS: u32 = 10;

/// PostgreSQL implementation of the ActivationCodeRepository trait.
///
/// Code-value uniqueness is enforced by the unique index on
/// activation_codes.code; a collision shows up as a conflicting
/// insert and is retried with a fresh code up to the attempt bound.
pub struct PostgresActivationCodeRepository {
  pool: PgPool,
  ttl: Duration,
  max_attempts: u32,
  generator: NumericCodeGenerator,
}

impl PostgresActivationCodeRepository {
  /// Creates a repository issuing codes with the given TTL
  pub fn new(pool: PgPool, ttl: Duration) -> Self {
    Self::with_attempts(pool, ttl, DEFAULT_GENERATION_ATTEMPTS)
  }

  /// Creates a repository with an explicit collision retry bound
  pub fn with_attempts(pool: PgPool, ttl: Duration, max_attempts: u32) -> Self {
    Self {
      pool,
      ttl,
      max_attempts,
      generator: NumericCodeGenerator::new(),
    }
  }
}

/// Database row structure for activation_codes table
#[derive(Debug, sqlx::FromRow)]
struct CodeRow {
  user_id: Uuid,
  code: String,
  created_at: DateTime<Utc>,
  expires_at: DateTime<Utc>,
}

impl From<CodeRow> for ActivationCode {
  fn from(row: CodeRow) -> Self {
    ActivationCode::from_db(row.user_id, row.code, row.created_at, row.expires_at)
  }
}

#[async_trait]
impl ActivationCodeRepository for PostgresActivationCodeRepository {
  async fn create(&self, user_id: Uuid) -> Result<ActivationCode, AuthError> {
    let mut tx = self
      .pool
      .begin()
      .await
      .map_err(|e| AuthError::Repository(RepositoryError::TransactionFailed(e.to_string())))?;

    // A new code always replaces the prior one for this user
    sqlx::query("DELETE FROM activation_codes WHERE user_id = $1")
      .bind(user_id)
      .execute(&mut *tx)
      .await
      .map_err(RepositoryError::from)?;

    for _ in 0..self.max_attempts {
      let code = ActivationCode::new(user_id, self.generator.generate(), self.ttl);

      let result = sqlx::query(
        r#"
                INSERT INTO activation_codes (user_id, code, created_at, expires_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (code) DO NOTHING
                "#,
      )
      .bind(code.user_id)
      .bind(&code.code)
      .bind(code.created_at)
      .bind(code.expires_at)
      .execute(&mut *tx)
      .await
      .map_err(RepositoryError::from)?;

      if result.rows_affected() == 1 {
        tx.commit()
          .await
          .map_err(|e| AuthError::Repository(RepositoryError::TransactionFailed(e.to_string())))?;
        return Ok(code);
      }
    }

    // Dropping the transaction rolls the delete back
    Err(AuthError::Repository(RepositoryError::CodeAllocationFailed(
      self.max_attempts,
    )))
  }

  async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<ActivationCode>, AuthError> {
    let row = sqlx::query_as::<_, CodeRow>(
      r#"
            SELECT user_id, code, created_at, expires_at
            FROM activation_codes
            WHERE user_id = $1
            "#,
    )
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn find_by_code(&self, code: &str) -> Result<Option<ActivationCode>, AuthError> {
    let row = sqlx::query_as::<_, CodeRow>(
      r#"
            SELECT user_id, code, created_at, expires_at
            FROM activation_codes
            WHERE code = $1
            "#,
    )
    .bind(code)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn delete(&self, user_id: Uuid) -> Result<bool, AuthError> {
    let result = sqlx::query("DELETE FROM activation_codes WHERE user_id = $1")
      .bind(user_id)
      .execute(&self.pool)
      .await?;

    Ok(result.rows_affected() > 0)
  }

  async fn cleanup_expired(&self) -> Result<u64, AuthError> {
    let result = sqlx::query("DELETE FROM activation_codes WHERE expires_at < NOW()")
      .execute(&self.pool)
      .await?;

    Ok(result.rows_affected())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::entities::User;
  use crate::domain::auth::ports::UserRepository;
  use crate::infrastructure::persistence::postgres::PostgresUserRepository;
  use sqlx::postgres::PgPoolOptions;
  use testcontainers::ImageExt;
  use testcontainers_modules::postgres::Postgres;
  use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};

  async fn setup_test_db() -> (PgPool, ContainerAsync<Postgres>) {
    let container = Postgres::default()
      .with_tag("16-alpine")
      .start()
      .await
      .expect("Failed to start postgres container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
      .get_host_port_ipv4(5432)
      .await
      .expect("Failed to get port");
    let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPoolOptions::new()
      .max_connections(5)
      .connect(&database_url)
      .await
      .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
      .run(&pool)
      .await
      .expect("Failed to run migrations");

    (pool, container)
  }

  async fn seed_user(pool: &PgPool, email: &str) -> User {
    let repo = PostgresUserRepository::new(pool.clone());
    repo
      .create(User::new(email.to_string(), "hash".to_string()))
      .await
      .unwrap()
  }

  #[tokio::test]
  async fn test_create_and_lookup() {
    let (pool, _container) = setup_test_db().await;
    let user = seed_user(&pool, "codes@example.com").await;
    let repo = PostgresActivationCodeRepository::new(pool, Duration::seconds(60));

    let code = repo.create(user.id).await.unwrap();
    assert_eq!(code.code.len(), 4);

    let by_user = repo.find_by_user_id(user.id).await.unwrap().unwrap();
    assert_eq!(by_user.code, code.code);

    let by_code = repo.find_by_code(&code.code).await.unwrap().unwrap();
    assert_eq!(by_code.user_id, user.id);
  }

  #[tokio::test]
  async fn test_create_replaces_prior_code() {
    let (pool, _container) = setup_test_db().await;
    let user = seed_user(&pool, "replace@example.com").await;
    let repo = PostgresActivationCodeRepository::new(pool, Duration::seconds(60));

    let first = repo.create(user.id).await.unwrap();
    let second = repo.create(user.id).await.unwrap();

    let current = repo.find_by_user_id(user.id).await.unwrap().unwrap();
    assert_eq!(current.code, second.code);

    if first.code != second.code {
      assert!(repo.find_by_code(&first.code).await.unwrap().is_none());
    }
  }

  #[tokio::test]
  async fn test_delete_is_idempotent() {
    let (pool, _container) = setup_test_db().await;
    let user = seed_user(&pool, "delete@example.com").await;
    let repo = PostgresActivationCodeRepository::new(pool, Duration::seconds(60));

    repo.create(user.id).await.unwrap();

    assert!(repo.delete(user.id).await.unwrap());
    assert!(!repo.delete(user.id).await.unwrap());
  }

  #[tokio::test]
  async fn test_cleanup_removes_only_expired_codes() {
    let (pool, _container) = setup_test_db().await;
    let expired_user = seed_user(&pool, "stale@example.com").await;
    let live_user = seed_user(&pool, "fresh@example.com").await;

    let expired_repo =
      PostgresActivationCodeRepository::new(pool.clone(), Duration::seconds(-1));
    let live_repo = PostgresActivationCodeRepository::new(pool, Duration::seconds(60));

    expired_repo.create(expired_user.id).await.unwrap();
    live_repo.create(live_user.id).await.unwrap();

    assert_eq!(live_repo.cleanup_expired().await.unwrap(), 1);
    assert!(live_repo.find_by_user_id(expired_user.id).await.unwrap().is_none());
    assert!(live_repo.find_by_user_id(live_user.id).await.unwrap().is_some());
  }

  #[tokio::test]
  async fn test_exhausted_attempts_reported() {
    let (pool, _container) = setup_test_db().await;
    let user = seed_user(&pool, "bound@example.com").await;
    let repo = PostgresActivationCodeRepository::with_attempts(pool, Duration::seconds(60), 0);

    let result = repo.create(user.id).await;
    assert!(matches!(
      result,
      Err(AuthError::Repository(RepositoryError::CodeAllocationFailed(0)))
    ));
  }
}
