pub mod activation_code_repository;
pub mod user_repository;

pub use activation_code_repository::PostgresActivationCodeRepository;
pub use user_repository::PostgresUserRepository;
