//! Matching source labels (e.g. "LK Hameln-Pyrmont") against caller region names.
//!
//! Matching is a case-sensitive substring test. The two policies differ only in how they
//! treat labels that contain more than one caller name.

/// First caller region (in caller order) contained in `label`.
pub fn first_match<'a>(label: &str, regions: &'a [String]) -> Option<&'a str> {
    regions
        .iter()
        .find(|region| !region.is_empty() && label.contains(region.as_str()))
        .map(String::as_str)
}

/// The single caller region contained in `label`; `None` if zero or several match.
pub fn unique_match<'a>(label: &str, regions: &'a [String]) -> Option<&'a str> {
    let mut found = regions
        .iter()
        .filter(|region| !region.is_empty() && label.contains(region.as_str()));
    let first = found.next()?;
    match found.next() {
        Some(_) => None,
        None => Some(first.as_str()),
    }
}
