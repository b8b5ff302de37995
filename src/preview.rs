//! Preview mode state, carried by a per-request cookie
//!
//! Handlers read a `PreviewState` from the request and hand back the
//! `Set-Cookie` value that changes it; nothing is stored server-side.

use axum::http::{header, HeaderMap};
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};

/// Whether the request is in preview mode, and at which content ref
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewState {
    pub enabled: bool,
    reference: Option<String>,
}

impl PreviewState {
    /// Preview mode reading content at `reference`
    pub fn with_reference(reference: impl Into<String>) -> Self {
        Self {
            enabled: true,
            reference: Some(reference.into()),
        }
    }

    /// Content ref to query with, `None` outside preview mode
    pub fn reference(&self) -> Option<&str> {
        if self.enabled {
            self.reference.as_deref()
        } else {
            None
        }
    }

    /// Read the preview cookie from request headers
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Self {
        let value = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == cookie_name)
            .map(|(_, value)| value);

        match value {
            Some(raw) if !raw.is_empty() => {
                let reference = percent_decode_str(raw).decode_utf8_lossy().into_owned();
                Self::with_reference(reference)
            }
            _ => Self::default(),
        }
    }

    /// `Set-Cookie` value entering this preview state
    pub fn set_cookie(&self, cookie_name: &str) -> String {
        match self.reference() {
            Some(reference) => format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax",
                cookie_name,
                utf8_percent_encode(reference, NON_ALPHANUMERIC)
            ),
            None => clear_cookie(cookie_name),
        }
    }
}

/// `Set-Cookie` value leaving preview mode
pub fn clear_cookie(cookie_name: &str) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        cookie_name
    )
}

/// Where the exit endpoint redirects: the given `currentUrl`, else the root
pub fn exit_redirect_target(current_url: Option<&str>) -> &str {
    current_url.filter(|url| !url.is_empty()).unwrap_or("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_no_cookie_means_no_preview() {
        let state = PreviewState::from_headers(&HeaderMap::new(), "ignite_preview");
        assert!(!state.enabled);
        assert_eq!(state.reference(), None);
    }

    #[test]
    fn test_cookie_round_trip() {
        let state = PreviewState::with_reference("https://repo.prismic.io/previews/abc?x=1");
        let set = state.set_cookie("ignite_preview");
        let pair = set.split(';').next().unwrap();

        let read = PreviewState::from_headers(&headers(&format!("theme=dark; {}", pair)), "ignite_preview");
        assert_eq!(read, state);
    }

    #[test]
    fn test_empty_cookie_is_ignored() {
        let state = PreviewState::from_headers(&headers("ignite_preview="), "ignite_preview");
        assert!(!state.enabled);
    }

    #[test]
    fn test_clear_cookie_expires() {
        let cleared = clear_cookie("ignite_preview");
        assert!(cleared.starts_with("ignite_preview=;"));
        assert!(cleared.contains("Max-Age=0"));
        assert_eq!(PreviewState::default().set_cookie("ignite_preview"), cleared);
    }

    #[test]
    fn test_exit_redirect_target() {
        assert_eq!(exit_redirect_target(Some("/post/abc")), "/post/abc");
        assert_eq!(exit_redirect_target(Some("")), "/");
        assert_eq!(exit_redirect_target(None), "/");
    }
}
