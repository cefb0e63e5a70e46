//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for `GET /takedown-requests` (`?platform=`).
///
/// `All` (any case) or an absent value means no platform filter.
#[derive(Debug, Default, Deserialize)]
pub struct PlatformFilterParams {
    pub platform: Option<String>,
}

impl PlatformFilterParams {
    /// The platform to filter on, if any.
    pub fn platform(&self) -> Option<&str> {
        self.platform
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case("all"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(platform: Option<&str>) -> PlatformFilterParams {
        PlatformFilterParams {
            platform: platform.map(str::to_string),
        }
    }

    #[test]
    fn all_and_blank_mean_no_filter() {
        assert_eq!(params(None).platform(), None);
        assert_eq!(params(Some("All")).platform(), None);
        assert_eq!(params(Some("  ")).platform(), None);
        assert_eq!(params(Some("YouTube")).platform(), Some("YouTube"));
    }
}
