//! Deterministic random source.
//!
//! Every draw is a pure function of its salts and unit values, so the same
//! assignment comes out in every process and in every conforming
//! implementation. No generator state exists, which is what lets independent
//! runs proceed on separate threads without coordination.
//!
//! # Construction
//!
//! ```text
//! full_salt   = "{experiment_salt}.{salt}"      (or an explicit full salt)
//! unit_string = unit values joined with "."     (Value::unit_string)
//! digest      = SHA-256("{full_salt}.{unit_string}")
//! bucket      = first 8 digest bytes, big-endian, >> 4   (60 bits)
//! draw        = bucket / 2^60                   in [0, 1)
//! ```
//!
//! The bucket is the digest's first 15 hex digits. Changing any step
//! reassigns every unit of every running experiment.

use planout_value::Value;
use sha2::{Digest, Sha256};

/// Width of the bucket taken from the digest.
pub const BUCKET_BITS: u32 = 60;

/// `2^BUCKET_BITS`, the exclusive upper bound of a bucket.
const BUCKET_SCALE: f64 = (1_u64 << BUCKET_BITS) as f64;

/// Separator between salts and unit values in the hashed string.
const SEPARATOR: &[u8] = b".";

/// Hash-based source of uniform draws for one salt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomSource {
    full_salt: String,
}

impl RandomSource {
    /// Source scoped to one parameter of one experiment.
    pub fn new(experiment_salt: &str, salt: &str) -> Self {
        RandomSource {
            full_salt: format!("{experiment_salt}.{salt}"),
        }
    }

    /// Source with a caller-chosen salt, ignoring the experiment salt.
    ///
    /// Lets two experiments share assignments deliberately.
    pub fn with_full_salt(full_salt: impl Into<String>) -> Self {
        RandomSource {
            full_salt: full_salt.into(),
        }
    }

    pub fn full_salt(&self) -> &str {
        &self.full_salt
    }

    /// 60-bit bucket for the unit values, optionally extended by one more value.
    pub fn bucket(&self, units: &[Value], appended: Option<&Value>) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(self.full_salt.as_bytes());
        hasher.update(SEPARATOR);
        for (i, unit) in units.iter().chain(appended).enumerate() {
            if i > 0 {
                hasher.update(SEPARATOR);
            }
            hasher.update(unit.unit_string().as_bytes());
        }
        let digest = hasher.finalize();
        let mut prefix = [0_u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(prefix) >> (64 - BUCKET_BITS)
    }

    /// Uniform draw in `[0, 1)`.
    pub fn draw(&self, units: &[Value], appended: Option<&Value>) -> f64 {
        self.bucket(units, appended) as f64 / BUCKET_SCALE
    }

    /// Uniform draw in `[min, max)`.
    pub fn uniform(&self, min: f64, max: f64, units: &[Value], appended: Option<&Value>) -> f64 {
        min + (max - min) * self.draw(units, appended)
    }
}

/// Spread a unit value into its components. An array unit is a compound unit.
pub fn unit_values(unit: Value) -> Vec<Value> {
    match unit {
        Value::Seq(items) => items,
        other => vec![other],
    }
}

#[cfg(test)]
mod tests;
