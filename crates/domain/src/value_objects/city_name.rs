//! City name value object
//!
//! A trimmed, non-empty city name used as the cache key.
//!
//! # Examples
//!
//! ```
//! use domain::CityName;
//!
//! let city = CityName::new("  Paris ").unwrap();
//! assert_eq!(city.as_str(), "Paris");
//!
//! assert!(CityName::new("   ").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A validated city name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CityName(String);

impl CityName {
    /// Create a city name, trimming surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCity` if the name is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidCity(raw));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the city name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CityName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CityName> for String {
    fn from(value: CityName) -> Self {
        value.0
    }
}

impl AsRef<str> for CityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace() {
        let city = CityName::new("\tNew York  ").unwrap();
        assert_eq!(city.as_str(), "New York");
        assert_eq!(city.to_string(), "New York");
    }

    #[test]
    fn rejects_blank() {
        assert_eq!(
            CityName::new("").unwrap_err(),
            DomainError::InvalidCity(String::new())
        );
        assert!(CityName::new("  \n").is_err());
    }

    #[test]
    fn deserialize_validates() {
        let city: CityName = serde_json::from_str("\" Lyon \"").unwrap();
        assert_eq!(city.as_str(), "Lyon");
        assert!(serde_json::from_str::<CityName>("\"\"").is_err());
    }
}
