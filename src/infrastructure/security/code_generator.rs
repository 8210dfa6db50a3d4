use rand::Rng;

/// Generator for short numeric activation codes.
///
/// Codes are exactly 4 ASCII decimal digits, drawn from the operating
/// system's cryptographically secure random number generator.
/// Uniqueness among live codes is the store's concern: stores call
/// `generate` in a bounded retry loop on collision.
pub struct NumericCodeGenerator;

impl NumericCodeGenerator {
  /// Code length in digits
  pub const CODE_LENGTH: usize = 4;

  /// Creates a new instance of NumericCodeGenerator
  pub fn new() -> Self {
    Self
  }

  /// Generates a fresh 4-digit code
  pub fn generate(&self) -> String {
    let mut rng = rand::rngs::OsRng;

    (0..Self::CODE_LENGTH)
      .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
      .collect()
  }
}

impl Default for NumericCodeGenerator {
  fn default() -> Self {
    Self::new()
  }
}
