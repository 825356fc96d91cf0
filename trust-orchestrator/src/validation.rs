use url::Url;

use crate::error::ValidationError;

/// Checks that a source URL is present and is an absolute http(s) URL.
///
/// Returns the URL as given; ids are stored verbatim, not normalized.
pub fn require_url(raw: Option<&str>) -> Result<String, ValidationError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| ValidationError::missing("url"))?;
    let parsed = Url::parse(raw).map_err(|e| ValidationError::malformed("url", format!("invalid URL format: {}", e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        other => Err(ValidationError::malformed("url", format!("unsupported scheme: {}", other))),
    }
}

pub fn require_prompt(raw: Option<&str>) -> Result<String, ValidationError> {
    raw.filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| ValidationError::missing("prompt"))
}
