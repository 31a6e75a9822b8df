//! JSON serialization for run reports.

use crate::error::Result;
use crate::result::RunReport;

/// Serialize a RunReport to a compact JSON string.
///
/// # Errors
///
/// [`Error::Json`](crate::Error::Json) if serialization fails.
pub fn to_json(report: &RunReport) -> Result<String> {
    Ok(serde_json::to_string(report)?)
}

/// Serialize a RunReport to a pretty-printed JSON string.
///
/// # Errors
///
/// [`Error::Json`](crate::Error::Json) if serialization fails.
pub fn to_json_pretty(report: &RunReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Parse a report previously written by [`to_json`] or [`to_json_pretty`].
///
/// # Errors
///
/// [`Error::Json`](crate::Error::Json) if `json` is not a valid report.
pub fn from_json(json: &str) -> Result<RunReport> {
    Ok(serde_json::from_str(json)?)
}
