//! Category catalog offered as toggle filters.
//!
//! Values must match the `primary_type` strings in the dataset verbatim,
//! including the existing "Digitial" spelling.

use crate::types::CategoryOption;

/// `(value, label)` pairs in display order.
const CATEGORIES: [(&str, &str); 8] = [
    (
        "Digitial Skills (Classes and Training)",
        "Digitial Skills (Classes and Training)",
    ),
    ("Device Access", "Device Access"),
    ("Digital Skills", "Digital Skills"),
    (
        "Public Device & Internet Access",
        "Public Device & Internet Access",
    ),
    ("Virtual Support", "Virtual Support"),
    (
        "Digital Skills & Technical Support",
        "Digital Skills & Technical Support",
    ),
    ("Digital Inclusion Funding", "Digital Inclusion Funding"),
    ("Digital Navigation", "Digital Navigation"),
];

/// All category options in display order.
pub fn category_options() -> Vec<CategoryOption> {
    CATEGORIES
        .iter()
        .map(|(value, label)| CategoryOption {
            value: (*value).to_string(),
            label: (*label).to_string(),
        })
        .collect()
}

/// Display label for a category value; unknown values label themselves.
pub fn category_label(value: &str) -> &str {
    CATEGORIES
        .iter()
        .find(|(v, _)| *v == value)
        .map_or(value, |(_, label)| *label)
}

/// Position of a category in display order, if it is in the catalog.
pub fn category_position(value: &str) -> Option<usize> {
    CATEGORIES.iter().position(|(v, _)| *v == value)
}
