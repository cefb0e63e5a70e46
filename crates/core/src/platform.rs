//! Platforms the service can scan and send takedown notices to.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

/// A supported content platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Platform {
    YouTube,
    Instagram,
    TikTok,
    Facebook,
    Reddit,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::YouTube,
        Platform::Instagram,
        Platform::TikTok,
        Platform::Facebook,
        Platform::Reddit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::Facebook => "Facebook",
            Platform::Reddit => "Reddit",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown platform '{wanted}'. Must be one of: {}",
                    Platform::ALL.map(Platform::as_str).join(", ")
                ))
            })
    }
}

/// Parse an ordered platform list, preserving order and dropping duplicates.
///
/// At least one platform is required.
pub fn parse_platforms<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Platform>, CoreError> {
    let mut platforms = Vec::with_capacity(raw.len());
    for item in raw {
        let platform: Platform = item.as_ref().parse()?;
        if !platforms.contains(&platform) {
            platforms.push(platform);
        }
    }
    if platforms.is_empty() {
        return Err(CoreError::Validation(
            "At least one platform is required".to_string(),
        ));
    }
    Ok(platforms)
}

/// Canonical names for storage in a `TEXT[]` column.
pub fn platform_names(platforms: &[Platform]) -> Vec<String> {
    platforms.iter().map(|p| p.as_str().to_string()).collect()
}
