//! Space-type color lookup table.
//!
//! # Invariants
//! - Colors are `#RRGGBB` hex strings, stored uppercase.
//! - Lookup is an exact string match on the space type.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex color regex"));

const STANDARD_COLORS: &[(&str, &str)] = &[
    ("WORK", "#1F77B4"),
    ("MEET", "#FF7F0E"),
    ("AMENITY", "#2CA02C"),
    ("SUPPORT", "#D62728"),
    ("CIRCULATION", "#9467BD"),
    ("WELLNESS", "#8C564B"),
    ("STORAGE", "#E377C2"),
    ("OPERATIONS", "#7F7F7F"),
    ("RETAIL", "#BCBD22"),
    ("EVENT", "#17BECF"),
];

/// Validated `#RRGGBB` display color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Parses a `#RRGGBB` hex string.
    ///
    /// # Errors
    /// - [`ColorError::InvalidHex`] for anything else, including short forms.
    pub fn parse(value: &str) -> Result<Self, ColorError> {
        let trimmed = value.trim();
        if !HEX_COLOR_RE.is_match(trimmed) {
            return Err(ColorError::InvalidHex(value.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.0
    }
}

/// Color parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    InvalidHex(String),
}

impl Display for ColorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHex(value) => {
                write!(f, "invalid color `{value}`; expected #RRGGBB")
            }
        }
    }
}

impl Error for ColorError {}

/// Fixed space-type → color table used by the chart renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorTable {
    entries: BTreeMap<String, Color>,
}

impl ColorTable {
    /// Built-in table covering the warehouse's standard program types.
    pub fn standard() -> Self {
        let entries = STANDARD_COLORS
            .iter()
            .map(|(space_type, hex)| ((*space_type).to_string(), Color(hex.to_string())))
            .collect();
        Self { entries }
    }

    /// Builds a table from `(space_type, hex)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ColorError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .map(|(space_type, hex)| {
                Color::parse(hex.as_ref()).map(|color| (space_type.into(), color))
            })
            .collect::<Result<BTreeMap<_, _>, ColorError>>()?;
        Ok(Self { entries })
    }

    pub fn get(&self, space_type: &str) -> Option<&Color> {
        self.entries.get(space_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
