//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum EmailError {
    /// Empty or whitespace-only input.
    #[error("email is empty")]
    Empty,
    /// Input longer than the RFC 5321 limit.
    #[error("email exceeds {max} characters")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// No @ symbol anywhere in the input.
    #[error("email has no @ symbol")]
    MissingAtSymbol,
    /// Nothing before the @.
    #[error("email has an empty local part")]
    EmptyLocalPart,
    /// The part after the @ is empty, has another @, or lacks a dot.
    #[error("email domain is not valid")]
    InvalidDomain,
}

/// A normalized email address.
///
/// Storefront widgets send emails with stray whitespace and mixed case, and
/// Shopify customer search is effectively case-insensitive. Parsing trims and
/// lowercases so that the same customer always resolves to the same key.
///
/// ## Constraints
///
/// - Length: 1-254 characters after trimming (RFC 5321 limit)
/// - Must contain exactly one @ symbol
/// - Local part (before @) must not be empty
/// - Domain part (after @) must contain a dot
///
/// ## Examples
///
/// ```
/// use rasca_gana_core::Email;
///
/// // Valid emails, normalized on the way in
/// let email = Email::parse(" User@Example.COM ").unwrap();
/// assert_eq!(email.as_str(), "user@example.com");
///
/// // Invalid emails
/// assert!(Email::parse("").is_err());             // empty
/// assert!(Email::parse("no-at-symbol").is_err()); // missing @
/// assert!(Email::parse("@domain.com").is_err());  // empty local part
/// assert!(Email::parse("user@nodot").is_err());   // domain without a dot
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string, trimming and lowercasing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty after trimming
    /// - Is longer than 254 characters
    /// - Does not contain an @ symbol
    /// - Has an empty local part
    /// - Has a domain without a dot or with a second @
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let normalized = s.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(EmailError::Empty);
        }

        if normalized.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let (local, domain) = normalized
            .split_once('@')
            .ok_or(EmailError::MissingAtSymbol)?;

        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }

        if domain.is_empty() || domain.contains('@') || !domain.contains('.') {
            return Err(EmailError::InvalidDomain);
        }

        Ok(Self(normalized))
    }

    /// The normalized address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email`, returning the normalized string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        assert!(Email::parse("cliente@tienda.com").is_ok());
        assert!(Email::parse("maria.lopez@tienda.com").is_ok());
        assert!(Email::parse("cliente+promo@tienda.com").is_ok());
        assert!(Email::parse("cliente@pedidos.tienda.com").is_ok());
        assert!(Email::parse("cliente@tienda.com.mx").is_ok());
    }

    #[test]
    fn test_parse_normalizes() {
        let email = Email::parse("  Cliente@Tienda.COM ").unwrap();
        assert_eq!(email.as_str(), "cliente@tienda.com");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Email::parse(""), Err(EmailError::Empty)));
        assert!(matches!(Email::parse("   "), Err(EmailError::Empty)));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@tienda.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_missing_at() {
        assert!(matches!(
            Email::parse("no-at-symbol"),
            Err(EmailError::MissingAtSymbol)
        ));
    }

    #[test]
    fn test_parse_empty_local_part() {
        assert!(matches!(
            Email::parse("@tienda.com"),
            Err(EmailError::EmptyLocalPart)
        ));
    }

    #[test]
    fn test_parse_invalid_domain() {
        assert!(matches!(
            Email::parse("cliente@"),
            Err(EmailError::InvalidDomain)
        ));
        assert!(matches!(
            Email::parse("cliente@nodot"),
            Err(EmailError::InvalidDomain)
        ));
        assert!(matches!(
            Email::parse("cliente@otra@tienda.com"),
            Err(EmailError::InvalidDomain)
        ));
    }

    #[test]
    fn test_display() {
        let email = Email::parse("cliente@tienda.com").unwrap();
        assert_eq!(format!("{email}"), "cliente@tienda.com");
    }

    #[test]
    fn test_serde_roundtrip() {
        let email = Email::parse("cliente@tienda.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"cliente@tienda.com\"");

        let parsed: Email = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, email);
    }

    #[test]
    fn test_from_str() {
        let email: Email = "cliente@tienda.com".parse().unwrap();
        assert_eq!(email.as_str(), "cliente@tienda.com");
    }
}
