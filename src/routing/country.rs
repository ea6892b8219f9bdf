//! Viewer country extraction.
//!
//! # Responsibilities
//! - Read the CDN's viewer-country header (name matched case-insensitively)
//! - Classify the value as a known code or unknown
//!
//! # Design Decisions
//! - Absent, empty and malformed values are all "unknown", never an error
//! - The value is not trimmed or case-folded; the CDN sends it canonical

use crate::edge::request::IncomingRequest;
use crate::routing::table::CountryCode;

/// Header carrying the CDN-resolved viewer country.
pub const VIEWER_COUNTRY_HEADER: &str = "cloudfront-viewer-country";

/// Value reported when no usable country was supplied.
pub const UNKNOWN_COUNTRY: &str = "unknown";

/// The viewer's country as far as this request can tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerCountry {
    Known(CountryCode),
    Unknown,
}

impl ViewerCountry {
    pub fn from_header(value: Option<&str>) -> Self {
        match value.and_then(CountryCode::parse) {
            Some(code) => ViewerCountry::Known(code),
            None => ViewerCountry::Unknown,
        }
    }

    pub fn code(&self) -> Option<&CountryCode> {
        match self {
            ViewerCountry::Known(code) => Some(code),
            ViewerCountry::Unknown => None,
        }
    }

    /// The code, or `unknown`.
    pub fn as_str(&self) -> &str {
        match self {
            ViewerCountry::Known(code) => code.as_str(),
            ViewerCountry::Unknown => UNKNOWN_COUNTRY,
        }
    }
}

/// Extract the viewer country from a request.
pub fn extract_viewer_country(request: &IncomingRequest) -> ViewerCountry {
    ViewerCountry::from_header(request.header(VIEWER_COUNTRY_HEADER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_first_entry() {
        let req: IncomingRequest = serde_json::from_value(json!({
            "headers": {
                "cloudfront-viewer-country": [
                    {"key": "CloudFront-Viewer-Country", "value": "SG"},
                    {"key": "CloudFront-Viewer-Country", "value": "IE"}
                ]
            }
        }))
        .unwrap();
        assert_eq!(extract_viewer_country(&req).as_str(), "SG");
    }

    #[test]
    fn test_header_name_case_insensitive() {
        let req = IncomingRequest::new("GET", "/").with_header("CloudFront-Viewer-Country", "IE");
        let country = extract_viewer_country(&req);
        assert_eq!(country.code().map(CountryCode::as_str), Some("IE"));
    }

    #[test]
    fn test_absent_empty_and_malformed_are_unknown() {
        let absent = IncomingRequest::new("GET", "/");
        assert_eq!(extract_viewer_country(&absent), ViewerCountry::Unknown);

        for value in ["", "U", "USA", "1E", " IE"] {
            let req = IncomingRequest::new("GET", "/").with_header(VIEWER_COUNTRY_HEADER, value);
            assert_eq!(extract_viewer_country(&req), ViewerCountry::Unknown, "value {:?}", value);
        }

        let empty_list: IncomingRequest = serde_json::from_value(json!({
            "headers": {"cloudfront-viewer-country": []}
        }))
        .unwrap();
        assert_eq!(extract_viewer_country(&empty_list), ViewerCountry::Unknown);
        assert_eq!(ViewerCountry::Unknown.as_str(), "unknown");
    }

    #[test]
    fn test_entry_without_value_is_unknown() {
        let req: IncomingRequest = serde_json::from_value(json!({
            "headers": {
                "cloudfront-viewer-country": [{"key": "CloudFront-Viewer-Country"}]
            }
        }))
        .unwrap();
        assert_eq!(extract_viewer_country(&req), ViewerCountry::Unknown);
    }

    #[test]
    fn test_lowercase_code_is_kept_verbatim() {
        let req = IncomingRequest::new("GET", "/").with_header(VIEWER_COUNTRY_HEADER, "ie");
        assert_eq!(extract_viewer_country(&req).as_str(), "ie");
    }
}
