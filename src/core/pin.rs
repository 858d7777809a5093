//! PIN values and PIN hashing.
//!
//! Two stored formats exist side by side: the legacy 32-bit rolling hash
//! (a signed decimal string) and Argon2id PHC strings (`$argon2id$...`).
//! New hashes use the configured scheme; verification recognises both.

use crate::{
    config::app::PinHashScheme,
    errors::{Error, Result},
};
use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use std::{fmt, str::FromStr};

/// Number of digits in a PIN.
pub const PIN_LENGTH: usize = 4;

const ARGON2_PREFIX: &str = "$argon2";

/// A validated four-digit PIN. The digits never appear in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Pin(String);

impl Pin {
    /// Validates `digits` as a PIN.
    pub fn new(digits: &str) -> Result<Self> {
        if digits.len() == PIN_LENGTH && digits.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(digits.to_string()))
        } else {
            Err(Error::validation("PIN must be 4 digits"))
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Pin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

/// Turns a PIN into its stored form and checks a PIN against a stored form.
pub trait PinHasher: Send + Sync {
    /// Produces the value persisted in the settings row.
    fn hash(&self, pin: &Pin) -> Result<String>;

    /// Whether `pin` matches `stored`. Malformed stored values never match.
    fn verify(&self, pin: &Pin, stored: &str) -> bool;
}

/// The 32-bit rolling hash used by existing installations.
///
/// `h = h * 31 + code_unit` with two's-complement wrap-around, rendered as a
/// signed decimal string.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyPinHasher;

impl LegacyPinHasher {
    fn digest(input: &str) -> i32 {
        input.encode_utf16().fold(0_i32, |h, unit| {
            h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
        })
    }
}

impl PinHasher for LegacyPinHasher {
    fn hash(&self, pin: &Pin) -> Result<String> {
        Ok(Self::digest(pin.as_str()).to_string())
    }

    fn verify(&self, pin: &Pin, stored: &str) -> bool {
        Self::digest(pin.as_str()).to_string() == stored
    }
}

/// Salted Argon2id with default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PinHasher;

impl PinHasher for Argon2PinHasher {
    fn hash(&self, pin: &Pin) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(pin.as_str().as_bytes(), &salt)
            .map_err(|e| Error::PinHash {
                message: e.to_string(),
            })?;
        Ok(hash.to_string())
    }

    fn verify(&self, pin: &Pin, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        Argon2::default()
            .verify_password(pin.as_str().as_bytes(), &parsed)
            .is_ok()
    }
}

/// Hashing policy: writes with the configured scheme, verifies by stored format.
#[derive(Debug, Clone, Copy, Default)]
pub struct PinHashing {
    scheme: PinHashScheme,
}

impl PinHashing {
    /// Hashing policy writing new hashes with `scheme`.
    #[must_use]
    pub const fn new(scheme: PinHashScheme) -> Self {
        Self { scheme }
    }

    /// Scheme used for new hashes.
    #[must_use]
    pub const fn scheme(&self) -> PinHashScheme {
        self.scheme
    }

    /// Hashes `pin` with the configured scheme.
    pub fn hash(&self, pin: &Pin) -> Result<String> {
        match self.scheme {
            PinHashScheme::Legacy => LegacyPinHasher.hash(pin),
            PinHashScheme::Argon2 => Argon2PinHasher.hash(pin),
        }
    }

    /// Checks `pin` against `stored`, whichever format it is in.
    #[must_use]
    pub fn verify(&self, pin: &Pin, stored: &str) -> bool {
        if stored.starts_with(ARGON2_PREFIX) {
            Argon2PinHasher.verify(pin, stored)
        } else {
            LegacyPinHasher.verify(pin, stored)
        }
    }

    /// [`PinHashing::hash`], moved to the blocking pool for Argon2.
    pub async fn hash_async(&self, pin: &Pin) -> Result<String> {
        match self.scheme {
            PinHashScheme::Legacy => LegacyPinHasher.hash(pin),
            PinHashScheme::Argon2 => {
                let pin = pin.clone();
                tokio::task::spawn_blocking(move || Argon2PinHasher.hash(&pin))
                    .await
                    .map_err(|e| Error::PinHash {
                        message: e.to_string(),
                    })?
            }
        }
    }

    /// [`PinHashing::verify`], moved to the blocking pool for Argon2 hashes.
    pub async fn verify_async(&self, pin: &Pin, stored: &str) -> bool {
        if !stored.starts_with(ARGON2_PREFIX) {
            return LegacyPinHasher.verify(pin, stored);
        }
        let (pin, stored) = (pin.clone(), stored.to_string());
        tokio::task::spawn_blocking(move || Argon2PinHasher.verify(&pin, &stored))
            .await
            .unwrap_or(false)
    }
}
