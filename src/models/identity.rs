use axum::http::HeaderMap;
use std::fmt;

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Rate-limiting key for a caller, taken from its forwarded address.
///
/// Not authenticated and trivially spoofable. Good enough for a soft
/// free-tier limit, never for access control.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    pub const UNKNOWN: &'static str = "unknown";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    /// First entry of `X-Forwarded-For`, or `unknown` when absent or blank.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(FORWARDED_FOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .map(Self::new)
            .unwrap_or_else(Self::unknown)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
