//! Typed endpoints, one module per resource family.
//!
//! Each function is a thin envelope over the generic `ResourceClient`
//! operations: it picks the method and path, runs the payload's required
//! field checks and names the response type. Collections follow the
//! backend's `/resource`, `/resource/by-<parent>/{id}`, `/resource/{id}` and
//! `/resource/{id}/<action>` conventions.

mod clients;
mod dashboard;
mod expenses;
mod invoices;
mod jobs;
mod notes;
mod research;
mod timeclock;

use reqwest::Url;

use crate::error::{ApiError, Result};

/// Append URL-encoded query pairs to a relative path.
pub(crate) fn with_query(path: &str, pairs: &[(&str, String)]) -> Result<String> {
    if pairs.is_empty() {
        return Ok(path.to_string());
    }
    let url = Url::parse_with_params(
        "http://query.invalid/",
        pairs.iter().map(|(k, v)| (*k, v.as_str())),
    )
    .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
    Ok(format!("{path}?{}", url.query().unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pairs_leaves_path_alone() {
        assert_eq!(with_query("/jobs", &[]).unwrap(), "/jobs");
    }

    #[test]
    fn pairs_are_encoded() {
        let path = with_query("/invoices", &[("status", "Partially Paid".to_string())]).unwrap();
        assert_eq!(path, "/invoices?status=Partially+Paid");
    }

    #[test]
    fn multiple_pairs_are_joined() {
        let path = with_query(
            "/timeclock/history",
            &[("worker_id", "1".to_string()), ("from_date", "2024-01-01".to_string())],
        )
        .unwrap();
        assert_eq!(path, "/timeclock/history?worker_id=1&from_date=2024-01-01");
    }
}
