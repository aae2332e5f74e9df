//! Postal code input, validation and normalization.
//!
//! Caller input is resolved once at the edge into a [`PostalQuery`]. Everything
//! past that point works on the digit string or on a validated [`PostalCode`].
//!
//! Validation is deliberately permissive about separators: every non-digit is
//! dropped before counting, so `"92500-000"`, `"925.00.000"` and `"92500 000"`
//! are all accepted. Integer input goes through its decimal form first, which
//! means leading zeros supplied as a number are already gone (`1310100` has
//! seven digits and is rejected).

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Error;

/// Number of digits in a Brazilian postal code (CEP).
pub const CODE_LEN: usize = 8;

/// Raw postal code as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostalQuery {
    /// Free-form text, possibly with separators.
    Text(String),
    /// Numeric input.
    Integer(i64),
}

impl PostalQuery {
    /// Resolve an untyped JSON value.
    ///
    /// Strings and numbers are accepted; `null`, booleans, arrays and objects
    /// yield `None`. Integral floats such as `92500000.0` or `9.25e7` count as
    /// integers; only fractional numbers keep their decimal text.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Some(Self::Integer(i));
                }
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                        Some(Self::Integer(f as i64))
                    }
                    _ => Some(Self::Text(n.to_string())),
                }
            }
            _ => None,
        }
    }

    /// String form of the input.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Integer(i) => Cow::Owned(i.to_string()),
        }
    }

    /// The input with every non-digit character removed.
    pub fn digits(&self) -> String {
        strip_non_digits(&self.as_text())
    }
}

impl fmt::Display for PostalQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for PostalQuery {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for PostalQuery {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for PostalQuery {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<u32> for PostalQuery {
    fn from(i: u32) -> Self {
        Self::Integer(i64::from(i))
    }
}

/// Remove every character that is not an ASCII digit.
pub fn strip_non_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Check whether the input has exactly eight digits once separators are removed.
pub fn is_valid_format(query: &PostalQuery) -> bool {
    query.digits().len() == CODE_LEN
}

/// [`is_valid_format`] for untyped input.
///
/// Anything that is neither a string nor a number is invalid.
pub fn is_valid_json(value: &Value) -> bool {
    PostalQuery::from_json(value).is_some_and(|q| is_valid_format(&q))
}

/// Strip non-digits and left-pad with zeros to eight characters.
///
/// Only meaningful for input that already passed [`is_valid_format`]: longer
/// digit strings are returned as-is, without truncation.
pub fn normalize(raw: &str) -> String {
    format!("{:0>width$}", strip_non_digits(raw), width = CODE_LEN)
}

/// A validated, normalized postal code: exactly eight ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Validate and normalize caller input.
    pub fn parse(query: &PostalQuery) -> Result<Self, Error> {
        if !is_valid_format(query) {
            return Err(Error::InvalidFormat(query.to_string()));
        }
        Ok(Self(normalize(&query.as_text())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PostalCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(&PostalQuery::from(s))
    }
}

impl TryFrom<String> for PostalCode {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.len() == CODE_LEN && s.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(s))
        } else {
            Err(Error::InvalidFormat(s))
        }
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_plain_and_separated() {
        for input in ["92500000", "92500-000", "925.00.000", "92500 000", " 01310-100 "] {
            assert!(is_valid_format(&PostalQuery::from(input)), "{input} should be valid");
        }
    }

    #[test]
    fn test_invalid_digit_counts() {
        for input in ["12345", "8434850001", "abc12345", "", "--------"] {
            assert!(!is_valid_format(&PostalQuery::from(input)), "{input} should be invalid");
        }
    }

    #[test]
    fn test_numeric_input() {
        assert!(is_valid_format(&PostalQuery::Integer(92_500_000)));
        // Leading zeros are lost in the decimal form.
        assert!(!is_valid_format(&PostalQuery::Integer(1_310_100)));
    }

    #[test]
    fn test_json_boundary() {
        assert!(is_valid_json(&json!("92500-000")));
        assert!(is_valid_json(&json!(92500000)));
        assert!(!is_valid_json(&Value::Null));
        assert!(!is_valid_json(&json!("")));
        assert!(!is_valid_json(&json!(true)));
        assert!(!is_valid_json(&json!(["92500000"])));
        assert!(!is_valid_json(&json!({"cep": "92500000"})));
    }

    #[test]
    fn test_from_json_integral_float() {
        assert_eq!(PostalQuery::from_json(&json!(92500000.0)), Some(PostalQuery::Integer(92500000)));
        assert!(is_valid_json(&json!(92500000.0)));

        let exponent: Value = serde_json::from_str("9.25e7").unwrap();
        assert_eq!(PostalQuery::from_json(&exponent), Some(PostalQuery::Integer(92500000)));
        assert!(is_valid_json(&exponent));

        let short: Value = serde_json::from_str("1310100.0").unwrap();
        assert!(!is_valid_json(&short));
    }

    #[test]
    fn test_from_json_non_integral_number() {
        let query = PostalQuery::from_json(&json!(9250000.5)).unwrap();
        assert_eq!(query, PostalQuery::Text("9250000.5".to_string()));
        assert!(is_valid_format(&query));
    }

    #[test]
    fn test_normalize_pads_and_strips() {
        assert_eq!(normalize("92500-000"), "92500000");
        assert_eq!(normalize("1310-100"), "01310100");
        assert_eq!(normalize(""), "00000000");
        assert_eq!(normalize("8434850001"), "8434850001");
    }

    #[test]
    fn test_postal_code_parse() {
        let code = PostalCode::parse(&PostalQuery::from("01310-100")).unwrap();
        assert_eq!(code.as_str(), "01310100");
        assert_eq!(code.to_string().len(), CODE_LEN);

        let err = PostalCode::parse(&PostalQuery::from("12345")).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_postal_code_serde() {
        let code: PostalCode = "92500000".parse().unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"92500000\"");

        let back: PostalCode = serde_json::from_str("\"92500000\"").unwrap();
        assert_eq!(back, code);

        assert!(serde_json::from_str::<PostalCode>("\"92500-000\"").is_err());
    }

    #[test]
    fn test_query_deserialize_untagged() {
        let text: PostalQuery = serde_json::from_str("\"92500-000\"").unwrap();
        assert_eq!(text, PostalQuery::Text("92500-000".into()));
        let num: PostalQuery = serde_json::from_str("92500000").unwrap();
        assert_eq!(num, PostalQuery::Integer(92_500_000));
    }
}
