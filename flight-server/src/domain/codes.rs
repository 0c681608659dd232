//! Airport and country code types.

use std::fmt;

/// Error returned when parsing an invalid IATA or country code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} code: {reason}")]
pub struct InvalidCode {
    kind: &'static str,
    reason: &'static str,
}

/// Validate that `s` is exactly three uppercase ASCII letters.
fn three_letters(s: &str, kind: &'static str) -> Result<[u8; 3], InvalidCode> {
    let bytes = s.as_bytes();

    if bytes.len() != 3 {
        return Err(InvalidCode {
            kind,
            reason: "must be exactly 3 characters",
        });
    }

    if !bytes.iter().all(u8::is_ascii_uppercase) {
        return Err(InvalidCode {
            kind,
            reason: "must be uppercase ASCII letters A-Z",
        });
    }

    Ok([bytes[0], bytes[1], bytes[2]])
}

fn letters_as_str(bytes: &[u8; 3]) -> &str {
    // Only ASCII uppercase letters are ever stored.
    std::str::from_utf8(bytes).unwrap_or_default()
}

/// A valid 3-letter IATA airport code.
///
/// IATA codes are always 3 uppercase ASCII letters. This type guarantees
/// that any `Iata` value is valid by construction.
///
/// # Examples
///
/// ```
/// use flight_server::domain::Iata;
///
/// let hkg = Iata::parse("HKG").unwrap();
/// assert_eq!(hkg.as_str(), "HKG");
///
/// // Lowercase is rejected by `parse`, but accepted by `parse_normalized`
/// assert!(Iata::parse("hkg").is_err());
/// assert_eq!(Iata::parse_normalized(" hkg ").unwrap(), hkg);
///
/// // Wrong length is rejected
/// assert!(Iata::parse("HK").is_err());
/// assert!(Iata::parse("HKGG").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iata([u8; 3]);

impl Iata {
    /// Parse an IATA code. The input must be exactly 3 uppercase ASCII letters.
    pub fn parse(s: &str) -> Result<Self, InvalidCode> {
        three_letters(s, "IATA").map(Iata)
    }

    /// Parse user input, trimming whitespace and uppercasing first.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        letters_as_str(&self.0)
    }
}

impl fmt::Debug for Iata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Iata({})", self.as_str())
    }
}

impl fmt::Display for Iata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Iata {
    type Error = InvalidCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Iata> for String {
    fn from(code: Iata) -> Self {
        code.as_str().to_string()
    }
}

/// A 3-letter country or nationality code (ISO 3166-1 alpha-3 style).
///
/// Nationality codes share the format: most equal the issuing country's
/// code, a few (e.g. `GBD`, `XRC`) are distinct nationalities of one country.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode([u8; 3]);

impl CountryCode {
    /// Parse a country code. The input must be exactly 3 uppercase ASCII letters.
    pub fn parse(s: &str) -> Result<Self, InvalidCode> {
        three_letters(s, "country").map(CountryCode)
    }

    /// Parse user input, trimming whitespace and uppercasing first.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        letters_as_str(&self.0)
    }
}

impl fmt::Debug for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CountryCode({})", self.as_str())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for CountryCode {
    type Error = InvalidCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.as_str().to_string()
    }
}
