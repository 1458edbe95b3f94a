/// Allow-list check on the `Origin` header.
///
/// Deters cross-site form posts from spending someone else's quota. It is
/// not authentication: callers without an `Origin` header pass, and an
/// empty allow-list lets everything through.
#[derive(Debug, Clone, Default)]
pub struct OriginGuard {
    allowed: Vec<String>,
}

impl OriginGuard {
    pub fn new(allowed: Vec<String>) -> Self {
        if allowed.is_empty() {
            tracing::warn!("No SITE_URL configured; origin checks are disabled");
        }
        Self { allowed }
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed
    }

    pub fn is_allowed_origin(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(_) if self.allowed.is_empty() => true,
            Some(origin) => self.allowed.iter().any(|allowed| allowed == origin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> OriginGuard {
        OriginGuard::new(vec![
            "https://thumbs.example.com".to_string(),
            "http://localhost:3000".to_string(),
        ])
    }

    #[test]
    fn test_missing_origin_is_allowed() {
        assert!(guard().is_allowed_origin(None));
    }

    #[test]
    fn test_empty_allow_list_fails_open() {
        let guard = OriginGuard::default();
        assert!(guard.is_allowed_origin(Some("https://anything.test")));
        assert!(guard.is_allowed_origin(None));
    }

    #[test]
    fn test_listed_origins_are_allowed() {
        assert!(guard().is_allowed_origin(Some("https://thumbs.example.com")));
        assert!(guard().is_allowed_origin(Some("http://localhost:3000")));
    }

    #[test]
    fn test_unlisted_origin_is_rejected() {
        assert!(!guard().is_allowed_origin(Some("https://evil.example.net")));
        assert!(!guard().is_allowed_origin(Some("https://thumbs.example.com.evil.net")));
        assert!(!guard().is_allowed_origin(Some("")));
    }
}
