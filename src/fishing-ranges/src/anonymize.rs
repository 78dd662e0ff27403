use std::fmt::{Debug, Display};

use sha1::{Digest, Sha1};

use crate::{AnonymousId, Range};

pub const DEFAULT_HEX_DIGITS: usize = 12;
pub const MAX_HEX_DIGITS: usize = 12;

/// Replaces vessel identities with a salted SHA-1 derived integer.
///
/// The output is the first `hex_digits` hex digits of `SHA-1(salt ++ vessel)`.
/// The same vessel and salt always map to the same id and different salts give
/// unrelated ids, so releases made with separate salts cannot be joined.
///
/// This is not a cryptographic guarantee. MMSIs are nine digit numbers, anyone
/// holding the salt can hash the whole space and reverse the mapping, the salt
/// must therefore be kept out of every published artifact.
#[derive(Clone)]
pub struct Anonymizer {
    salt: String,
    hex_digits: usize,
}

impl Debug for Anonymizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Anonymizer")
            .field("salt", &"<redacted>")
            .field("hex_digits", &self.hex_digits)
            .finish()
    }
}

impl Anonymizer {
    pub fn new(salt: impl Into<String>) -> Anonymizer {
        Anonymizer {
            salt: salt.into(),
            hex_digits: DEFAULT_HEX_DIGITS,
        }
    }

    /// Ids must fit [`crate::ANONYMOUS_ID_WIDTH`] decimal digits, `hex_digits` is
    /// clamped to `1..=12`.
    pub fn with_hex_digits(mut self, hex_digits: usize) -> Anonymizer {
        self.hex_digits = hex_digits.clamp(1, MAX_HEX_DIGITS);
        self
    }

    pub fn hex_digits(&self) -> usize {
        self.hex_digits
    }

    pub fn anonymize(&self, vessel: &impl Display) -> AnonymousId {
        let mut hasher = Sha1::new();
        hasher.update(self.salt.as_bytes());
        hasher.update(vessel.to_string().as_bytes());
        let digest = hasher.finalize();

        let value = (0..self.hex_digits).fold(0u64, |acc, i| {
            let byte = digest[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            (acc << 4) | u64::from(nibble)
        });

        AnonymousId::new(value)
    }

    pub fn anonymize_range<V: Display>(&self, range: Range<V>) -> Range<AnonymousId> {
        let id = self.anonymize(&range.vessel);
        range.with_vessel(id)
    }
}

/// Anonymizes a vessel id with the default number of hex digits.
pub fn anonymize_mmsi(vessel: &impl Display, salt: &str) -> AnonymousId {
    Anonymizer::new(salt).anonymize(vessel)
}

pub fn anonymize_ranges<V, I>(
    ranges: I,
    anonymizer: &Anonymizer,
) -> impl Iterator<Item = Range<AnonymousId>>
where
    V: Display,
    I: IntoIterator<Item = Range<V>>,
{
    ranges
        .into_iter()
        .map(move |range| anonymizer.anonymize_range(range))
}
