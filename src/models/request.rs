use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Requested length of the assistant's reply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthHint {
    Short,
    #[default]
    Medium,
    Long,
}

impl LengthHint {
    /// Value sent in the `length` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            LengthHint::Short => "short",
            LengthHint::Medium => "medium",
            LengthHint::Long => "long",
        }
    }

    /// Cycle to the next hint, for toggling from the prompt.
    pub fn next(self) -> Self {
        match self {
            LengthHint::Short => LengthHint::Medium,
            LengthHint::Medium => LengthHint::Long,
            LengthHint::Long => LengthHint::Short,
        }
    }
}

impl fmt::Display for LengthHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LengthHint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(LengthHint::Short),
            "medium" => Ok(LengthHint::Medium),
            "long" => Ok(LengthHint::Long),
            other => Err(format!("unknown length hint '{}'", other)),
        }
    }
}

/// Body of the streaming chat request.
#[derive(Debug, Clone, Serialize)]
pub struct StreamRequest {
    pub message: String,
}

impl StreamRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_hint_default_is_medium() {
        assert_eq!(LengthHint::default(), LengthHint::Medium);
    }

    #[test]
    fn test_length_hint_parse() {
        assert_eq!("SHORT".parse::<LengthHint>(), Ok(LengthHint::Short));
        assert_eq!(" long ".parse::<LengthHint>(), Ok(LengthHint::Long));
        assert!("huge".parse::<LengthHint>().is_err());
    }

    #[test]
    fn test_length_hint_cycles() {
        assert_eq!(LengthHint::Short.next(), LengthHint::Medium);
        assert_eq!(LengthHint::Long.next(), LengthHint::Short);
    }

    #[test]
    fn test_stream_request_serialization() {
        let json = serde_json::to_string(&StreamRequest::new("Hello")).unwrap();
        assert_eq!(json, r#"{"message":"Hello"}"#);
    }
}
