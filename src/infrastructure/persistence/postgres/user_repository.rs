use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::{
  entities::User,
  errors::{AuthError, RepositoryError},
  ports::UserRepository,
  value_objects::Email,
};

/// PostgreSQL implementation of the UserRepository trait
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  /// Creates a new instance of PostgresUserRepository
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: Uuid,
  email: String,
  password_hash: String,
  is_active: bool,
  created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User::from_db(
      row.id,
      row.email,
      row.password_hash,
      row.is_active,
      row.created_at,
    )
  }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            INSERT INTO users (id, email, password_hash, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, is_active, created_at
            "#,
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.is_active)
    .bind(user.created_at)
    .fetch_one(&self.pool)
    .await;

    match result {
      Ok(row) => Ok(row.into()),
      Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
        // The unique index on email makes the existence check atomic
        // with the insert; the service masks this on the register path
        Err(AuthError::DuplicateEmail)
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, email, password_hash, is_active, created_at
            FROM users
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, email, password_hash, is_active, created_at
            FROM users
            WHERE email = $1
            "#,
    )
    .bind(email.as_str())
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn update(&self, user: User) -> Result<User, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            UPDATE users
            SET email = $2, password_hash = $3, is_active = $4
            WHERE id = $1
            RETURNING id, email, password_hash, is_active, created_at
            "#,
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.is_active)
    .fetch_one(&self.pool)
    .await;

    match result {
      Ok(row) => Ok(row.into()),
      Err(sqlx::Error::RowNotFound) => Err(AuthError::Repository(RepositoryError::NotFound)),
      Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
        Err(AuthError::DuplicateEmail)
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn exists_by_email(&self, email: &Email) -> Result<bool, AuthError> {
    let exists = sqlx::query_scalar::<_, bool>(
      r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
            "#,
    )
    .bind(email.as_str())
    .fetch_one(&self.pool)
    .await?;

    Ok(exists)
  }

  async fn activate(&self, id: Uuid) -> Result<bool, AuthError> {
    let result = sqlx::query(
      r#"
            UPDATE users
            SET is_active = TRUE
            WHERE id = $1
            "#,
    )
    .bind(id)
    .execute(&self.pool)
    .await?;

    Ok(result.rows_affected() > 0)
  }
}
