use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A mood tag. Moods are an open set: anything the backend tags a song with is a mood.
///
/// The tag is normalized on construction (trimmed, lowercased), so `"Happy "` and
/// `"happy"` are the same mood.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mood(String);

impl Mood {
    pub fn new<T: AsRef<str>>(tag: T) -> Mood {
        Mood(tag.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display label with the first letter capitalized, e.g. "Happy".
    pub fn label(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Mood {
    fn from(value: &str) -> Self {
        Mood::new(value)
    }
}

impl Serialize for Mood {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Mood {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Mood::new(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(Mood::new("  Happy "), Mood::new("happy"));
        assert_eq!(Mood::new("RELAXED").as_str(), "relaxed");
    }

    #[test]
    fn label_capitalizes_first_letter() {
        assert_eq!(Mood::new("sad").label(), "Sad");
        assert_eq!(Mood::new("").label(), "");
    }

    #[test]
    fn deserializes_normalized() {
        let mood: Mood = serde_json::from_str("\"Angry\"").unwrap();
        assert_eq!(mood, Mood::new("angry"));
    }
}
