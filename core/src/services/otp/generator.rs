//! Numeric OTP code generation
//!
//! Digits are drawn from the operating system CSPRNG. Each random byte below
//! 250 maps to `byte % 10`; bytes 250..=255 are discarded so every digit is
//! equally likely.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::errors::OtpError;

/// Largest multiple of 10 that fits in a byte
const REJECTION_THRESHOLD: u8 = 250;

/// Generate a `length`-digit code from the OS CSPRNG
pub fn generate_code(length: usize) -> Result<String, OtpError> {
    generate_code_with(&mut OsRng, length)
}

/// Generate a `length`-digit code from the given cryptographic RNG.
///
/// Fails with `RandomnessUnavailable` if the RNG reports an error; there is
/// no fallback source.
pub fn generate_code_with<R>(rng: &mut R, length: usize) -> Result<String, OtpError>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut code = String::with_capacity(length);
    let mut buf = [0u8; 16];

    while code.len() < length {
        rng.try_fill_bytes(&mut buf).map_err(|e| {
            tracing::error!(
                error = %e,
                event = "otp_randomness_unavailable",
                "Secure random source failed"
            );
            OtpError::RandomnessUnavailable
        })?;

        for byte in buf.iter().copied().filter(|b| *b < REJECTION_THRESHOLD) {
            code.push(char::from(b'0' + byte % 10));
            if code.len() == length {
                break;
            }
        }
    }

    Ok(code)
}
