pub mod activation_code_repository;
pub mod user_repository;

pub use activation_code_repository::InMemoryActivationCodeRepository;
pub use user_repository::InMemoryUserRepository;
