use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::auth::{
  entities::ActivationCode,
  errors::{AuthError, RepositoryError},
  ports::ActivationCodeRepository,
};
use crate::infrastructure::security::NumericCodeGenerator;

const DEFAULT_GENERATION_ATTEMPTS: u32 = 10;

#[derive(Default)]
struct Inner {
  // user id -> code
  codes: HashMap<Uuid, ActivationCode>,
  // code value -> user id
  code_index: HashMap<String, Uuid>,
}

/// In-memory implementation of the ActivationCodeRepository trait.
///
/// Both maps are mutated under one write lock, so replacing a user's
/// code and the code-value uniqueness check are atomic.
pub struct InMemoryActivationCodeRepository {
  ttl: Duration,
  max_attempts: u32,
  generator: NumericCodeGenerator,
  inner: RwLock<Inner>,
}

impl InMemoryActivationCodeRepository {
  /// Creates an empty repository issuing codes with the given TTL
  pub fn new(ttl: Duration) -> Self {
    Self::with_attempts(ttl, DEFAULT_GENERATION_ATTEMPTS)
  }

  /// Creates a repository with an explicit collision retry bound
  pub fn with_attempts(ttl: Duration, max_attempts: u32) -> Self {
    Self {
      ttl,
      max_attempts,
      generator: NumericCodeGenerator::new(),
      inner: RwLock::new(Inner::default()),
    }
  }

  fn remove_for_user(inner: &mut Inner, user_id: Uuid) -> bool {
    match inner.codes.remove(&user_id) {
      Some(code) => {
        inner.code_index.remove(&code.code);
        true
      }
      None => false,
    }
  }
}

#[async_trait]
impl ActivationCodeRepository for InMemoryActivationCodeRepository {
  async fn create(&self, user_id: Uuid) -> Result<ActivationCode, AuthError> {
    let mut inner = self.inner.write().await;

    // A new code always replaces the prior one for this user
    Self::remove_for_user(&mut inner, user_id);

    for _ in 0..self.max_attempts {
      let value = self.generator.generate();
      if inner.code_index.contains_key(&value) {
        continue;
      }

      let code = ActivationCode::new(user_id, value, self.ttl);
      inner.code_index.insert(code.code.clone(), user_id);
      inner.codes.insert(user_id, code.clone());
      return Ok(code);
    }

    Err(AuthError::Repository(RepositoryError::CodeAllocationFailed(
      self.max_attempts,
    )))
  }

  async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<ActivationCode>, AuthError> {
    let inner = self.inner.read().await;
    Ok(inner.codes.get(&user_id).cloned())
  }

  async fn find_by_code(&self, code: &str) -> Result<Option<ActivationCode>, AuthError> {
    let inner = self.inner.read().await;
    let found = inner
      .code_index
      .get(code)
      .and_then(|user_id| inner.codes.get(user_id))
      .cloned();
    Ok(found)
  }

  async fn delete(&self, user_id: Uuid) -> Result<bool, AuthError> {
    let mut inner = self.inner.write().await;
    Ok(Self::remove_for_user(&mut inner, user_id))
  }

  async fn cleanup_expired(&self) -> Result<u64, AuthError> {
    let mut inner = self.inner.write().await;

    let expired_users: Vec<Uuid> = inner
      .codes
      .values()
      .filter(|code| code.is_expired())
      .map(|code| code.user_id)
      .collect();

    for user_id in &expired_users {
      Self::remove_for_user(&mut inner, *user_id);
    }

    Ok(expired_users.len() as u64)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_create_issues_four_digit_code() {
    let repo = InMemoryActivationCodeRepository::new(Duration::seconds(60));
    let user_id = Uuid::new_v4();

    let code = repo.create(user_id).await.unwrap();
    assert_eq!(code.user_id, user_id);
    assert_eq!(code.code.len(), 4);
    assert!(code.code.chars().all(|c| c.is_ascii_digit()));
  }

  #[tokio::test]
  async fn test_create_replaces_prior_code() {
    let repo = InMemoryActivationCodeRepository::new(Duration::seconds(60));
    let user_id = Uuid::new_v4();

    let first = repo.create(user_id).await.unwrap();
    let second = repo.create(user_id).await.unwrap();

    // Only the latest code is live for the user
    let current = repo.find_by_user_id(user_id).await.unwrap().unwrap();
    assert_eq!(current.code, second.code);

    if first.code != second.code {
      assert!(repo.find_by_code(&first.code).await.unwrap().is_none());
    }
  }

  #[tokio::test]
  async fn test_find_by_code() {
    let repo = InMemoryActivationCodeRepository::new(Duration::seconds(60));
    let user_id = Uuid::new_v4();

    let code = repo.create(user_id).await.unwrap();

    let found = repo.find_by_code(&code.code).await.unwrap().unwrap();
    assert_eq!(found.user_id, user_id);

    assert!(repo.find_by_code("this-is-not-a-code").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_delete_is_idempotent() {
    let repo = InMemoryActivationCodeRepository::new(Duration::seconds(60));
    let user_id = Uuid::new_v4();

    repo.create(user_id).await.unwrap();

    assert!(repo.delete(user_id).await.unwrap());
    // Deleting an already-deleted code is a no-op, not an error
    assert!(!repo.delete(user_id).await.unwrap());
  }

  #[tokio::test]
  async fn test_cleanup_removes_only_expired_codes() {
    let expired_repo = InMemoryActivationCodeRepository::new(Duration::seconds(-1));
    let user_a = Uuid::new_v4();
    let user_b = Uuid::new_v4();

    expired_repo.create(user_a).await.unwrap();
    expired_repo.create(user_b).await.unwrap();

    assert_eq!(expired_repo.cleanup_expired().await.unwrap(), 2);
    assert_eq!(expired_repo.cleanup_expired().await.unwrap(), 0);

    let live_repo = InMemoryActivationCodeRepository::new(Duration::seconds(60));
    live_repo.create(user_a).await.unwrap();
    assert_eq!(live_repo.cleanup_expired().await.unwrap(), 0);
    assert!(live_repo.find_by_user_id(user_a).await.unwrap().is_some());
  }

  #[tokio::test]
  async fn test_collision_retry_bound_is_reported() {
    // One attempt and a saturated keyspace would exhaust immediately;
    // simulate by filling the index through repeated creates for many
    // users with a single attempt allowed. Collisions are probabilistic,
    // so instead verify the error shape directly with zero attempts.
    let repo = InMemoryActivationCodeRepository::with_attempts(Duration::seconds(60), 0);

    let result = repo.create(Uuid::new_v4()).await;
    assert!(matches!(
      result,
      Err(AuthError::Repository(RepositoryError::CodeAllocationFailed(0)))
    ));
  }
}
