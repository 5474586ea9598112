//! # DX Types
//!
//! Small validated primitives shared by the symptom analysis crates.
//!
//! - [`NonEmptyText`] guards free-text inputs (symptom descriptions, diagnosis names) at the edges.
//! - [`Confidence`] keeps every confidence score inside `0..=100`.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Errors that can occur when creating a [`Confidence`] from an exact value.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfidenceError {
    #[error("confidence must be between 0 and 100, got {0}")]
    OutOfRange(i64),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A confidence score in percent, always within `0..=100`.
///
/// Exact construction goes through [`Confidence::new`]. Values coming from a language model are
/// untrusted and go through [`Confidence::saturating`] or [`Confidence::from_f64`], which clamp
/// rather than fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Confidence(u8);

impl Confidence {
    pub fn new(value: i64) -> Result<Self, ConfidenceError> {
        if (0..=100).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ConfidenceError::OutOfRange(value))
        }
    }

    /// Clamps `value` into `0..=100`.
    pub fn saturating(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    /// Rounds and clamps a floating point score. `NaN` becomes 0.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self(0);
        }
        Self(value.round().clamp(0.0, 100.0) as u8)
    }

    /// Integer-rounded mean of the given scores, or 0 when there are none.
    pub fn rounded_mean<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = Confidence>,
    {
        let (sum, count) = scores
            .into_iter()
            .fold((0u32, 0u32), |(sum, count), c| (sum + u32::from(c.0), count + 1));
        if count == 0 {
            return Self(0);
        }
        Self::from_f64(f64::from(sum) / f64::from(count))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl serde::Serialize for Confidence {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Confidence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v = i64::deserialize(deserializer)?;
        Confidence::new(v).map_err(serde::de::Error::custom)
    }
}
