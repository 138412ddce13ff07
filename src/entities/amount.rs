use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A price as the upstream sends it: a decimal string such as `"1200.00"` or
/// a display string such as `"₹1,200"`. Plain JSON numbers are accepted too
/// and kept in their textual form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Amount(String);

impl Amount {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value with currency symbols and separators stripped.
    pub fn value(&self) -> Option<f64> {
        parse_amount(&self.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Amount {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Amount(text),
            Raw::Number(number) => Amount(number.to_string()),
        })
    }
}

/// Parses a currency-like string.
///
/// Every character outside `[0-9.]` is dropped first; the rest is read like
/// `parseFloat`, i.e. the longest leading decimal literal wins (`"1.2.3"`
/// reads as `1.2`). Returns `None` when no digits remain.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;
    for (idx, c) in cleaned.char_indices() {
        match c {
            '.' if seen_dot => break,
            '.' => seen_dot = true,
            _ => seen_digit = true,
        }
        end = idx + 1;
    }

    if !seen_digit {
        return None;
    }

    cleaned[..end].trim_end_matches('.').parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_currency_and_separators() {
        assert_eq!(parse_amount("₹1,200"), Some(1200.0));
        assert_eq!(parse_amount("$ 980.50"), Some(980.5));
        assert_eq!(parse_amount("650"), Some(650.0));
    }

    #[test]
    fn test_parse_float_prefix_semantics() {
        assert_eq!(parse_amount("1.2.3"), Some(1.2));
        assert_eq!(parse_amount(".5"), Some(0.5));
        assert_eq!(parse_amount("12."), Some(12.0));
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("free"), None);
        assert_eq!(parse_amount("₹."), None);
    }

    #[test]
    fn test_deserializes_strings_and_numbers() {
        let text: Amount = serde_json::from_str("\"₹1,200\"").unwrap();
        let number: Amount = serde_json::from_str("1500.5").unwrap();
        assert_eq!(text.value(), Some(1200.0));
        assert_eq!(number.as_str(), "1500.5");
        assert_eq!(number.value(), Some(1500.5));
    }
}
