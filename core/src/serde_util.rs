//! Lenient serde helpers for Flickr wire formats.
//!
//! Flickr is inconsistent about scalar types: the same field can arrive as a
//! JSON number from one endpoint and as a quoted string from another.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Loose {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Loose::Int(i) => Ok(i as f64),
            Loose::Float(f) => Ok(f),
            Loose::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid number: {s:?}"))),
        }
    }

    fn into_u64<E: serde::de::Error>(self) -> Result<u64, E> {
        match self {
            Loose::Int(i) => u64::try_from(i).map_err(|_| E::custom(format!("negative count: {i}"))),
            Loose::Float(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as u64),
            Loose::Float(f) => Err(E::custom(format!("invalid count: {f}"))),
            Loose::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid count: {s:?}"))),
        }
    }

    fn into_string(self) -> String {
        match self {
            Loose::Int(i) => i.to_string(),
            Loose::Float(f) => f.to_string(),
            Loose::Str(s) => s,
        }
    }
}

/// A float sent as a number or a string.
pub fn f64_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Loose::deserialize(deserializer)?.into_f64()
}

pub fn opt_f64_lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Loose>::deserialize(deserializer)?
        .map(Loose::into_f64)
        .transpose()
}

/// A non-negative integer sent as a number or a string.
pub fn u64_lenient<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Loose::deserialize(deserializer)?.into_u64()
}

pub fn opt_u64_lenient<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Loose>::deserialize(deserializer)?
        .map(Loose::into_u64)
        .transpose()
}

/// An identifier sent as a number or a string, kept as a string.
pub fn string_lenient<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Loose::deserialize(deserializer)
        .map(Loose::into_string)
        .map_err(|_| D::Error::custom("expected a string or a number"))
}
