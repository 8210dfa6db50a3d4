pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{ActivationCode, User};
pub use errors::{AuthError, HashError, RepositoryError};
pub use services::{AccountService, ResendOutcome};
pub use value_objects::{Email, Password, PasswordHash};
