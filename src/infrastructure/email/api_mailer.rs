use async_trait::async_trait;
use serde::Serialize;

use crate::domain::auth::ports::Mailer;

#[derive(Debug, Serialize)]
struct EmailAddress {
  email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody {
  sender: EmailAddress,
  to: Vec<EmailAddress>,
  subject: String,
  text_content: String,
}

/// Mailer backed by a transactional email HTTP API (Brevo-style
/// `POST /smtp/email` endpoint authenticated with an `api-key` header).
///
/// Delivery is best effort: failures are logged and reported as
/// `false`, never surfaced as errors.
pub struct ApiMailer {
  client: reqwest::Client,
  api_url: String,
  api_key: String,
  sender: String,
}

impl ApiMailer {
  pub fn new(api_url: String, api_key: String, sender: String) -> Self {
    Self {
      client: reqwest::Client::new(),
      api_url,
      api_key,
      sender,
    }
  }
}

#[async_trait]
impl Mailer for ApiMailer {
  async fn send_activation_email(&self, recipient: &str, code: &str) -> bool {
    let body = SendEmailBody {
      sender: EmailAddress {
        email: self.sender.clone(),
      },
      to: vec![EmailAddress {
        email: recipient.to_string(),
      }],
      subject: "Activate your account".to_string(),
      text_content: format!(
        "Welcome! Your activation code is {code}. Enter it to activate your account."
      ),
    };

    let response = self
      .client
      .post(&self.api_url)
      .header("api-key", &self.api_key)
      .header("Accept", "application/json")
      .json(&body)
      .send()
      .await;

    match response {
      Ok(resp) if resp.status().is_success() => true,
      Ok(resp) => {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(recipient, %status, body, "email API rejected activation email");
        false
      }
      Err(e) => {
        tracing::warn!(recipient, error = %e, "email API request failed");
        false
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_payload_shape() {
    let body = SendEmailBody {
      sender: EmailAddress {
        email: "noreply@example.com".to_string(),
      },
      to: vec![EmailAddress {
        email: "user@example.com".to_string(),
      }],
      subject: "Activate your account".to_string(),
      text_content: "Your activation code is 0421.".to_string(),
    };

    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["sender"]["email"], "noreply@example.com");
    assert_eq!(json["to"][0]["email"], "user@example.com");
    assert!(json["textContent"].as_str().unwrap().contains("0421"));
  }

  #[tokio::test]
  async fn test_unreachable_endpoint_reports_failure() {
    let mailer = ApiMailer::new(
      "http://127.0.0.1:1/smtp/email".to_string(),
      "key".to_string(),
      "noreply@example.com".to_string(),
    );

    assert!(!mailer.send_activation_email("user@example.com", "0421").await);
  }
}
