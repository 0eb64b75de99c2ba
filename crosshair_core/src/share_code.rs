/*!
Share-code parsing and base-57 decoding.

A share code is `CSGO` followed by five groups of five symbols, optionally
separated by hyphens. The 25 symbols are base-57 digits, least significant
first. The resulting integer is laid out big-endian in a fixed-size buffer
which the layout decoder then reads field by field.
*/

use crate::error::{CrosshairError, Result};
use crate::protocol::{ALPHABET, DECODED_BUFFER_LEN, SHARE_CODE_PREFIX};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static SHARE_CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^CSGO(-?[A-Za-z0-9]{5}){5}$").expect("share code pattern is a valid regex")
});

/// A syntactically valid share code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShareCode {
    code: String,
}

impl ShareCode {
    /// Validate the shape and alphabet of a share code
    pub fn parse(input: &str) -> Result<Self> {
        if !SHARE_CODE_PATTERN.is_match(input) {
            return Err(CrosshairError::format(input));
        }

        if let Some(bad) = digits_of(input).find(|&c| digit_value(c).is_none()) {
            return Err(CrosshairError::InvalidCharacter(bad));
        }

        Ok(Self {
            code: input.to_string(),
        })
    }

    /// The code exactly as it was given
    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// The code in its canonical hyphenated form
    pub fn canonical(&self) -> String {
        let digits: Vec<char> = digits_of(&self.code).collect();
        let groups: Vec<String> = digits.chunks(5).map(|g| g.iter().collect()).collect();
        format!("{}-{}", SHARE_CODE_PREFIX, groups.join("-"))
    }

    /// Decode into the canonical big-endian buffer
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes_padded(DECODED_BUFFER_LEN)
    }

    /// Decode, zero-padding the most significant end up to `len` bytes.
    ///
    /// An integer that needs more than `len` bytes keeps its natural length.
    pub fn to_bytes_padded(&self, len: usize) -> Vec<u8> {
        // Little-endian accumulator, most significant digit last in the code
        let mut value: Vec<u8> = Vec::with_capacity(len);
        for c in digits_of(&self.code).rev() {
            // Alphabet membership was checked in parse()
            let digit = digit_value(c).unwrap_or(0);
            mul_add(&mut value, ALPHABET.len() as u32, digit);
        }

        if value.len() < len {
            value.resize(len, 0);
        } else if value.len() > len {
            tracing::debug!(
                "Share code {} needs {} bytes, more than the {} requested",
                self.code,
                value.len(),
                len
            );
        }

        value.reverse();
        value
    }
}

impl FromStr for ShareCode {
    type Err = CrosshairError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ShareCode {
    type Error = CrosshairError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ShareCode> for String {
    fn from(code: ShareCode) -> Self {
        code.code
    }
}

impl fmt::Display for ShareCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Validate a share code and decode it into the canonical buffer
pub fn decode_share_code(input: &str) -> Result<Vec<u8>> {
    Ok(ShareCode::parse(input)?.to_bytes())
}

/// Validate a share code and decode it into a buffer of at least `len` bytes
pub fn decode_share_code_padded(input: &str, len: usize) -> Result<Vec<u8>> {
    Ok(ShareCode::parse(input)?.to_bytes_padded(len))
}

/// Check the leading checksum byte of a decoded buffer.
///
/// Byte 0 carries the wrapping sum of every following byte. A mismatch is
/// informational only; decoding does not depend on it.
pub fn checksum_matches(bytes: &[u8]) -> bool {
    match bytes.split_first() {
        Some((&checksum, rest)) => {
            rest.iter().fold(0u8, |acc, &b| acc.wrapping_add(b)) == checksum
        }
        None => false,
    }
}

/// Position of a symbol in the share-code alphabet
pub fn digit_value(c: char) -> Option<u32> {
    ALPHABET.chars().position(|a| a == c).map(|p| p as u32)
}

/// The 25 digit symbols of a code, prefix and hyphens removed
fn digits_of(code: &str) -> impl DoubleEndedIterator<Item = char> + '_ {
    code.strip_prefix(SHARE_CODE_PREFIX)
        .unwrap_or(code)
        .chars()
        .filter(|&c| c != '-')
}

/// value = value * radix + digit, on a little-endian byte accumulator
fn mul_add(value: &mut Vec<u8>, radix: u32, digit: u32) {
    let mut carry = digit;
    for byte in value.iter_mut() {
        let v = u32::from(*byte) * radix + carry;
        *byte = (v & 0xFF) as u8;
        carry = v >> 8;
    }
    while carry > 0 {
        value.push((carry & 0xFF) as u8);
        carry >>= 8;
    }
}
