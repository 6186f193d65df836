use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER,
    USER_AGENT,
};

/// Build browser-like headers for BBC edition pages
///
/// # Arguments
///
/// * `user_agent` - User agent string (typically a modern browser UA)
/// * `referer` - Referer URL (the edition homepage)
/// * `accept_language` - Accept-Language value, see [`accept_language`]
///
/// # Errors
///
/// Returns an error when one of the values is not a valid header value.
///
/// # Examples
///
/// ```
/// use tafiti::crawler::headers::{accept_language, build_browser_headers};
///
/// let headers = build_browser_headers(
///     "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
///     "https://www.bbc.com/hausa",
///     &accept_language("ha"),
/// )
/// .unwrap();
/// assert_eq!(headers["accept-language"], "ha,en;q=0.8");
/// ```
pub fn build_browser_headers(
    user_agent: &str,
    referer: &str,
    accept_language: &str,
) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = HeaderMap::new();

    headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
    headers.insert(REFERER, HeaderValue::from_str(referer)?);
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(accept_language)?);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );

    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("document"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("navigate"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("upgrade-insecure-requests"),
        HeaderValue::from_static("1"),
    );

    Ok(headers)
}

/// Accept-Language preferring the edition language, English second
///
/// # Examples
///
/// ```
/// use tafiti::crawler::headers::accept_language;
///
/// assert_eq!(accept_language("sw"), "sw,en;q=0.8");
/// assert_eq!(accept_language("en"), "en");
/// ```
pub fn accept_language(language_tag: &str) -> String {
    if language_tag.eq_ignore_ascii_case("en") {
        return "en".to_string();
    }
    format!("{language_tag},en;q=0.8")
}
