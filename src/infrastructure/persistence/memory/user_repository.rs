use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::auth::{
  entities::User,
  errors::{AuthError, RepositoryError},
  ports::UserRepository,
  value_objects::Email,
};

#[derive(Default)]
struct Inner {
  users: HashMap<Uuid, User>,
  // email -> user id
  email_index: HashMap<String, Uuid>,
}

/// In-memory implementation of the UserRepository trait.
///
/// Keyed maps behind a single write lock, so the email-uniqueness
/// check is atomic with the insert. Used for tests and demos; the
/// durable variant is `PostgresUserRepository`.
pub struct InMemoryUserRepository {
  inner: RwLock<Inner>,
}

impl InMemoryUserRepository {
  /// Creates an empty repository
  pub fn new() -> Self {
    Self {
      inner: RwLock::new(Inner::default()),
    }
  }
}

impl Default for InMemoryUserRepository {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let mut inner = self.inner.write().await;

    if inner.email_index.contains_key(&user.email) {
      return Err(AuthError::DuplicateEmail);
    }
    if inner.users.contains_key(&user.id) {
      return Err(AuthError::Repository(RepositoryError::DuplicateKey(
        user.id.to_string(),
      )));
    }

    inner.email_index.insert(user.email.clone(), user.id);
    inner.users.insert(user.id, user.clone());
    Ok(user)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    let inner = self.inner.read().await;
    Ok(inner.users.get(&id).cloned())
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let inner = self.inner.read().await;
    let user = inner
      .email_index
      .get(email.as_str())
      .and_then(|id| inner.users.get(id))
      .cloned();
    Ok(user)
  }

  async fn update(&self, user: User) -> Result<User, AuthError> {
    let mut inner = self.inner.write().await;

    let old_email = match inner.users.get(&user.id) {
      Some(existing) => existing.email.clone(),
      None => return Err(AuthError::Repository(RepositoryError::NotFound)),
    };

    if old_email != user.email {
      inner.email_index.remove(&old_email);
      inner.email_index.insert(user.email.clone(), user.id);
    }

    inner.users.insert(user.id, user.clone());
    Ok(user)
  }

  async fn exists_by_email(&self, email: &Email) -> Result<bool, AuthError> {
    let inner = self.inner.read().await;
    Ok(inner.email_index.contains_key(email.as_str()))
  }

  async fn activate(&self, id: Uuid) -> Result<bool, AuthError> {
    let mut inner = self.inner.write().await;

    match inner.users.get_mut(&id) {
      Some(user) => {
        user.activate();
        Ok(true)
      }
      None => Ok(false),
    }
  }
}
