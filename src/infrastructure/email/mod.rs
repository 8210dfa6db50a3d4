pub mod api_mailer;
pub mod log_mailer;

pub use api_mailer::ApiMailer;
pub use log_mailer::LogMailer;
