//! Location identity, IATA-style codes and the location form rules.

use std::fmt;

use super::error::{FieldError, ValidationErrors};

/// Error returned when parsing an invalid location code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid location code: {reason}")]
pub struct InvalidLocationCode {
    reason: &'static str,
}

impl InvalidLocationCode {
    /// Human-readable reason, suitable for a form field message.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// A valid 3-letter location code (e.g. an IATA airport code).
///
/// Codes are always 3 uppercase ASCII letters. This type guarantees
/// that any `LocationCode` value is valid by construction.
///
/// # Examples
///
/// ```
/// use logistics_console::domain::LocationCode;
///
/// let ist = LocationCode::parse("IST").unwrap();
/// assert_eq!(ist.as_str(), "IST");
///
/// // Lowercase is rejected by the strict parser...
/// assert!(LocationCode::parse("ist").is_err());
/// // ...but accepted by the normalizing one.
/// assert_eq!(LocationCode::parse_normalized(" ist ").unwrap().as_str(), "IST");
///
/// // Wrong length is rejected
/// assert!(LocationCode::parse("IS").is_err());
/// assert!(LocationCode::parse("ISTA").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationCode([u8; 3]);

impl LocationCode {
    /// Parse a location code from a string.
    ///
    /// The input must be exactly 3 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidLocationCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 3 {
            return Err(InvalidLocationCode {
                reason: "Must be exactly 3 characters",
            });
        }

        for &b in bytes {
            if !b.is_ascii_uppercase() {
                return Err(InvalidLocationCode {
                    reason: "Must conform to IATA format (3 letters)",
                });
            }
        }

        Ok(LocationCode([bytes[0], bytes[1], bytes[2]]))
    }

    /// Parse a code after trimming and uppercasing it.
    ///
    /// Only ASCII letters are uppercased, so `"ış"` stays invalid.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidLocationCode> {
        let trimmed = s.trim();
        if trimmed.chars().count() != 3 {
            return Err(InvalidLocationCode {
                reason: "Must be exactly 3 characters",
            });
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(InvalidLocationCode {
                reason: "Must conform to IATA format (3 letters)",
            });
        }
        Self::parse(&trimmed.to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // SAFETY: We only store valid ASCII uppercase letters
        std::str::from_utf8(&self.0).unwrap()
    }
}

impl fmt::Debug for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocationCode({})", self.as_str())
    }
}

impl fmt::Display for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier assigned to a location by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationId(pub i64);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A logistics hub: airport, bus terminal, city centre pick-up point...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: LocationId,
    pub code: Option<LocationCode>,
    pub name: String,
    pub city: String,
    pub country: String,
}

impl Location {
    /// The code as a string, or `""` when the location has none.
    pub fn code_str(&self) -> &str {
        self.code.as_ref().map(|c| c.as_str()).unwrap_or("")
    }
}

/// A validated create/update payload for a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationDraft {
    pub code: Option<LocationCode>,
    pub name: String,
    pub city: String,
    pub country: String,
}

impl LocationDraft {
    /// Apply the location form rules to raw input.
    ///
    /// The code is optional (blank means none). Name, city and country are
    /// required. All field errors are collected, not just the first.
    pub fn validate(
        code: &str,
        name: &str,
        city: &str,
        country: &str,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = Vec::new();

        let code = if code.trim().is_empty() {
            None
        } else {
            match LocationCode::parse_normalized(code) {
                Ok(c) => Some(c),
                Err(e) => {
                    errors.push(FieldError::new("code", e.reason()));
                    None
                }
            }
        };

        let required = [
            ("name", name, "Location name is required"),
            ("city", city, "City is required"),
            ("country", country, "Country is required"),
        ];
        for (field, value, message) in required {
            if value.trim().is_empty() {
                errors.push(FieldError::new(field, message));
            }
        }

        if !errors.is_empty() {
            return Err(ValidationErrors::new(errors));
        }

        Ok(Self {
            code,
            name: name.trim().to_string(),
            city: city.trim().to_string(),
            country: country.trim().to_string(),
        })
    }
}
