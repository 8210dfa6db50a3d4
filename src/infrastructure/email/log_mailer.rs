use async_trait::async_trait;

use crate::domain::auth::ports::Mailer;

/// Mailer that writes activation emails to the log instead of
/// sending them. Default for local development and tests.
pub struct LogMailer;

impl LogMailer {
  pub fn new() -> Self {
    Self
  }
}

impl Default for LogMailer {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Mailer for LogMailer {
  async fn send_activation_email(&self, recipient: &str, code: &str) -> bool {
    tracing::info!(recipient, code, "activation email (log mode)");
    true
  }
}
