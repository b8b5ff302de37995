//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters kept as-is inside a query value that carries a path
const PATH_IN_QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Site-relative path of a post page
///
/// # Examples
/// ```ignore
/// post_path("hello-world") // -> "/post/hello-world"
/// ```
pub fn post_path(uid: &str) -> String {
    format!("/post/{}", uid)
}

/// Link to the preview exit endpoint that returns to `current_url`
pub fn exit_preview_path(current_url: &str) -> String {
    format!(
        "/api/exit-preview?currentUrl={}",
        utf8_percent_encode(current_url, PATH_IN_QUERY)
    )
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/post/a") // -> "https://example.com/post/a"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    format!(
        "{}/{}",
        config.url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
