use thiserror::Error;
use url::Url;

/// Errors that can occur during URL validation.
///
/// Validation is purely syntactic: no DNS lookup, no reachability check.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    /// The URL string is empty or whitespace-only.
    #[error("URL is empty")]
    Empty,
    /// The URL string could not be parsed as an absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme a browser cannot open.
    #[error("Unsupported scheme: {0} (only http/https can be opened)")]
    UnsupportedScheme(String),
}

/// Validates that a string is a well-formed absolute URL.
///
/// Leading and trailing whitespace is ignored. Any scheme is accepted, so
/// `mailto:` or custom app schemes pass; relative references such as
/// `example.com/path` or `/docs` do not.
///
/// # Errors
///
/// - [`UrlValidationError::Empty`] for an empty or whitespace-only string
/// - [`UrlValidationError::InvalidUrl`] if parsing fails
///
/// # Examples
///
/// ```
/// use appshelf::util::validate_url;
///
/// let url = validate_url("https://miimaker.online/").unwrap();
/// assert_eq!(url.host_str(), Some("miimaker.online"));
///
/// assert!(validate_url("not-a-url").is_err());
/// assert!(validate_url("   ").is_err());
/// ```
pub fn validate_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let trimmed = url_str.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }
    Ok(Url::parse(trimmed)?)
}

/// Validates a stored app URL before handing it to the system browser.
///
/// Stricter than [`validate_url`]: only `http` and `https` are allowed, so a
/// crafted `file://` or `javascript:` entry in an imported catalog cannot be
/// launched.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = validate_url(url_str)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}
