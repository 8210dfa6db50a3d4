mod argon2_hasher;
mod code_generator;

pub use argon2_hasher::Argon2PasswordHasher;
pub use code_generator::NumericCodeGenerator;
