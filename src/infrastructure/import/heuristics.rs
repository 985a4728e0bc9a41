// ============================================================
// IMPORT HEURISTICS
// ============================================================
// Header detection and best-effort column mapping

use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::domain::import::{ColumnMapping, ImportField};

static HEADER_VOCABULARY: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "name", "firstname", "first", "lastname", "last", "email", "phone", "mobile", "contact",
    ]
    .into_iter()
    .collect()
});

static FIRST_NAME_HEADERS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["firstname", "first", "fname", "givenname"].into_iter().collect());

static LAST_NAME_HEADERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["lastname", "last", "lname", "surname", "familyname"]
        .into_iter()
        .collect()
});

static EMAIL_HEADERS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["email", "emailaddress", "mail"].into_iter().collect());

static PHONE_HEADERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["phone", "phonenumber", "mobile", "cell", "telephone", "tel"]
        .into_iter()
        .collect()
});

static FULL_NAME_HEADERS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["name", "fullname", "clientname", "contact"].into_iter().collect());

/// Lowercase a header and strip everything that is not an ASCII letter, so
/// "First Name", "first_name" and "FIRST-NAME:" all compare equal.
fn normalize(header: &str) -> String {
    header
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}

/// Whether a row reads like a header row rather than data.
pub fn looks_like_header_row(row: &[String]) -> bool {
    row.iter()
        .any(|cell| HEADER_VOCABULARY.contains(normalize(cell).as_str()))
}

/// Best-effort mapping of headers onto the four client fields.
///
/// First match wins per field, scanning left to right. A generic full-name
/// header maps to the first-name slot (the normalizer splits the value
/// later). Fields still unmapped afterwards are assigned positionally, in
/// field order, to the lowest still-unclaimed column. This never fails;
/// ambiguity just leaves fields unmapped.
pub fn guess_column_mapping(headers: &[String]) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();

    for (index, header) in headers.iter().enumerate() {
        let key = normalize(header);
        let key = key.as_str();

        if FIRST_NAME_HEADERS.contains(key) {
            if mapping.first_name.is_none() {
                mapping.first_name = Some(index);
            }
        } else if LAST_NAME_HEADERS.contains(key) {
            if mapping.last_name.is_none() {
                mapping.last_name = Some(index);
            }
        } else if EMAIL_HEADERS.contains(key) {
            if mapping.email.is_none() {
                mapping.email = Some(index);
            }
        } else if PHONE_HEADERS.contains(key) {
            if mapping.phone_number.is_none() {
                mapping.phone_number = Some(index);
            }
        } else if FULL_NAME_HEADERS.contains(key) && mapping.first_name.is_none() {
            mapping.first_name = Some(index);
        }
    }

    // Positional fallback for anything the headers did not identify.
    for field in ImportField::ALL {
        if mapping.get(field).is_none() {
            if let Some(index) = (0..headers.len()).find(|i| !mapping.claims(*i)) {
                mapping.set(field, index);
            }
        }
    }

    mapping
}
