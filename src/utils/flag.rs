//! Lenient boolean parsing for the `actual` flag.
//!
//! Accepts `true/false`, `1/0`, `yes/no` and the registry's own wording
//! `Актуально/Неактуально`, case-insensitively.

use serde::{Deserialize, Deserializer, de};
use std::fmt;

pub const ACTUAL: &str = "Актуально";
pub const NOT_ACTUAL: &str = "Неактуально";

/// Parses a textual flag. Returns `None` for anything unrecognized.
pub fn parse_flag(raw: &str) -> Option<bool> {
    let value = raw.trim().to_lowercase();
    match value.as_str() {
        "true" | "1" | "yes" | "актуально" => Some(true),
        "false" | "0" | "no" | "неактуально" => Some(false),
        _ => None,
    }
}

pub fn flag_label(actual: bool) -> &'static str {
    if actual { ACTUAL } else { NOT_ACTUAL }
}

struct FlagVisitor;

impl<'de> de::Visitor<'de> for FlagVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a boolean or one of true/false/1/0/yes/no/Актуально/Неактуально")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
        match v {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(E::invalid_value(de::Unexpected::Unsigned(v), &self)),
        }
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
        match v {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(E::invalid_value(de::Unexpected::Signed(v), &self)),
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
        parse_flag(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

/// Lenient `bool` field: `#[serde(deserialize_with = "flag::deserialize")]`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(FlagVisitor)
}

/// Lenient `Option<bool>` field. Use with `#[serde(default)]`.
///
/// An empty string is treated as absent, which is what query strings send
/// for `?actual=`.
pub mod optional {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<Raw> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(Raw::Bool(b)) => Ok(Some(b)),
            Some(Raw::Int(0)) => Ok(Some(false)),
            Some(Raw::Int(1)) => Ok(Some(true)),
            Some(Raw::Int(n)) => Err(de::Error::invalid_value(
                de::Unexpected::Signed(n),
                &FlagVisitor,
            )),
            Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(Raw::Text(s)) => parse_flag(&s)
                .map(Some)
                .ok_or_else(|| de::Error::invalid_value(de::Unexpected::Str(&s), &FlagVisitor)),
        }
    }
}
