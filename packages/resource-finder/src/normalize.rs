//! Field normalization applied once at ingestion.
//!
//! Source rows carry `geography` and `primary_type` either as one
//! comma-separated string or as a list. Both shapes collapse into the same
//! ordered, de-duplicated list of trimmed values so the filter code never
//! has to look at the raw shape again.

/// Split a comma-separated cell into trimmed, non-empty, unique values.
///
/// # Example
/// ```
/// use resource_finder::normalize::split_delimited;
///
/// assert_eq!(split_delimited(" Wake, Durham ,,Wake"), vec!["Wake", "Durham"]);
/// ```
pub fn split_delimited(raw: &str) -> Vec<String> {
    normalize_values(raw.split(','))
}

/// Normalize a list of values, splitting any entry that itself contains
/// commas.
pub fn normalize_list<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for value in values {
        for part in split_delimited(value.as_ref()) {
            if !out.contains(&part) {
                out.push(part);
            }
        }
    }
    out
}

fn normalize_values<'a>(parts: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in parts.map(str::trim).filter(|p| !p.is_empty()) {
        if !out.iter().any(|existing| existing == part) {
            out.push(part.to_string());
        }
    }
    out
}

/// Trim a free-form cell; blank cells become `None`.
pub fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Prefix `https://` onto a link that has no `http://` or `https://` scheme.
pub fn with_https_prefix(link: &str) -> String {
    let lower = link.get(..8).unwrap_or(link).to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        link.to_string()
    } else {
        format!("https://{link}")
    }
}

/// Coerce a coordinate cell into a finite number.
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// True when `value` looks like a 5-digit US zip code.
pub fn is_zip_code(value: &str) -> bool {
    value.len() == 5 && value.bytes().all(|b| b.is_ascii_digit())
}
