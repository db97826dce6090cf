use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 24;

/// Exchange ticker symbol, uppercased and validated against the character set
/// the NSE uses (`M&M`, `BAJAJ-AUTO`, `MCDOWELL-N` are all legal tickers).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }
        if trimmed.len() > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len: trimmed.len(),
                max: MAX_SYMBOL_LEN,
            });
        }

        for (index, ch) in trimmed.char_indices() {
            if index == 0 {
                if !ch.is_ascii_alphabetic() {
                    return Err(ValidationError::SymbolInvalidStart { ch });
                }
                continue;
            }
            if !ch.is_ascii_alphanumeric() && !matches!(ch, '-' | '&' | '.') {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for Symbol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
