use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a textual setting or signal cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unsupported locale: {0}")]
    Locale(String),
    #[error("unknown effective connection type: {0}")]
    ConnectionType(String),
    #[error("unknown frame rate trigger: {0}")]
    FrameRateTrigger(String),
}

/// Network effective-type hint as reported by the hosting runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectiveConnectionType {
    #[serde(rename = "slow-2g")]
    Slow2g,
    #[serde(rename = "2g")]
    TwoG,
    #[serde(rename = "3g")]
    ThreeG,
    #[serde(rename = "4g")]
    FourG,
}

impl EffectiveConnectionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slow2g => "slow-2g",
            Self::TwoG => "2g",
            Self::ThreeG => "3g",
            Self::FourG => "4g",
        }
    }
}

impl fmt::Display for EffectiveConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectiveConnectionType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slow-2g" => Ok(Self::Slow2g),
            "2g" => Ok(Self::TwoG),
            "3g" => Ok(Self::ThreeG),
            "4g" => Ok(Self::FourG),
            other => Err(ParseError::ConnectionType(other.to_owned())),
        }
    }
}

/// Which counter the low-frame-rate trigger compares against the threshold.
///
/// `PostReset` keeps the legacy front-end comparison, which runs after the
/// window counter was zeroed and therefore fires at the end of every window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameRateTrigger {
    #[default]
    Published,
    PostReset,
}

impl fmt::Display for FrameRateTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Published => f.write_str("published"),
            Self::PostReset => f.write_str("post_reset"),
        }
    }
}

impl FromStr for FrameRateTrigger {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "published" => Ok(Self::Published),
            "post_reset" => Ok(Self::PostReset),
            other => Err(ParseError::FrameRateTrigger(other.to_owned())),
        }
    }
}
