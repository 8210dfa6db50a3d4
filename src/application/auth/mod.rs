//! Authentication use cases
//!
//! This module contains all authentication-related use cases that orchestrate
//! domain services to implement application-specific workflows.

mod activate_account;
mod cleanup_codes;
mod get_current_user;
mod register_user;
mod resend_code;

pub use activate_account::ActivateAccountUseCase;
pub use cleanup_codes::CleanupCodesUseCase;
pub use get_current_user::{GetCurrentUserResponse, GetCurrentUserUseCase};
pub use register_user::{RegisterUserCommand, RegisterUserResponse, RegisterUserUseCase};
pub use resend_code::ResendCodeUseCase;
