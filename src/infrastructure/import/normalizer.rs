// ============================================================
// IMPORT NORMALIZER
// ============================================================
// Resolve grid rows into candidate client records

use crate::domain::import::{CandidateRecord, ColumnMapping, RawGrid};

/// Build the candidate list for a grid under the given mapping.
///
/// The first row is skipped when it was classified as a header. Unmapped
/// fields and out-of-range indices resolve to empty strings. A first-name
/// value containing a space is split at the first space when the resolved
/// last name is empty. Rows whose trimmed first name ends up empty are
/// excluded; surviving rows keep their input order. Pure with respect to
/// its inputs, so preview and submission see identical lists.
pub fn build_candidates(
    grid: &RawGrid,
    has_header: bool,
    mapping: &ColumnMapping,
) -> Vec<CandidateRecord> {
    let data_rows = if has_header && !grid.is_empty() {
        &grid[1..]
    } else {
        &grid[..]
    };

    data_rows
        .iter()
        .filter_map(|row| {
            let mut first_name = resolve(row, mapping.first_name);
            let mut last_name = resolve(row, mapping.last_name);

            // A single full-name column: "Jane Mary Doe" becomes
            // first "Jane", last "Mary Doe".
            if last_name.is_empty() {
                if let Some(space) = first_name.find(' ') {
                    last_name = first_name[space + 1..].to_string();
                    first_name.truncate(space);
                }
            }

            if first_name.trim().is_empty() {
                return None;
            }

            Some(CandidateRecord {
                first_name,
                last_name,
                email: resolve(row, mapping.email),
                phone_number: resolve(row, mapping.phone_number),
            })
        })
        .collect()
}

fn resolve(row: &[String], index: Option<usize>) -> String {
    index
        .and_then(|i| row.get(i))
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> RawGrid {
        rows.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn mapping(
        first: Option<usize>,
        last: Option<usize>,
        email: Option<usize>,
        phone: Option<usize>,
    ) -> ColumnMapping {
        ColumnMapping {
            first_name: first,
            last_name: last,
            email,
            phone_number: phone,
        }
    }

    #[test]
    fn test_header_row_is_skipped() {
        let grid = grid(&[&["First", "Last"], &["John", "Doe"]]);
        let candidates = build_candidates(&grid, true, &mapping(Some(0), Some(1), None, None));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].first_name, "John");
        assert_eq!(candidates[0].last_name, "Doe");
    }

    #[test]
    fn test_all_rows_are_data_without_header() {
        let grid = grid(&[&["John", "Doe"], &["Jane", "Smith"]]);
        let candidates = build_candidates(&grid, false, &mapping(Some(0), Some(1), None, None));
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_full_name_splits_at_first_space() {
        let grid = grid(&[&["Jane Mary Doe"]]);
        let candidates = build_candidates(&grid, false, &mapping(Some(0), None, None, None));
        assert_eq!(candidates[0].first_name, "Jane");
        assert_eq!(candidates[0].last_name, "Mary Doe");
    }

    #[test]
    fn test_split_also_applies_when_the_last_name_cell_is_blank() {
        let grid = grid(&[&["Jane Doe", ""]]);
        let candidates = build_candidates(&grid, false, &mapping(Some(0), Some(1), None, None));
        assert_eq!(candidates[0].first_name, "Jane");
        assert_eq!(candidates[0].last_name, "Doe");
    }

    #[test]
    fn test_no_split_when_last_name_is_present() {
        let grid = grid(&[&["Jane Mary", "Doe"]]);
        let candidates = build_candidates(&grid, false, &mapping(Some(0), Some(1), None, None));
        assert_eq!(candidates[0].first_name, "Jane Mary");
        assert_eq!(candidates[0].last_name, "Doe");
    }

    #[test]
    fn test_rows_without_a_first_name_are_excluded() {
        let grid = grid(&[
            &["", "Doe", "left@x.com"],
            &["John", "Doe", "john@x.com"],
        ]);
        let candidates =
            build_candidates(&grid, false, &mapping(Some(0), Some(1), Some(2), None));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].email, "john@x.com");
    }

    #[test]
    fn test_unmapped_and_out_of_range_fields_resolve_empty() {
        let grid = grid(&[&["John"]]);
        let candidates =
            build_candidates(&grid, false, &mapping(Some(0), Some(5), None, Some(9)));
        assert_eq!(candidates[0].last_name, "");
        assert_eq!(candidates[0].email, "");
        assert_eq!(candidates[0].phone_number, "");
    }

    #[test]
    fn test_input_order_is_preserved() {
        let grid = grid(&[&["C"], &["A"], &["B"]]);
        let candidates = build_candidates(&grid, false, &mapping(Some(0), None, None, None));
        let names: Vec<&str> = candidates.iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[test]
    fn test_repeated_calls_yield_the_same_list() {
        let grid = grid(&[&["Full Name Here"], &["Second Person"]]);
        let m = mapping(Some(0), None, None, None);
        assert_eq!(
            build_candidates(&grid, false, &m),
            build_candidates(&grid, false, &m)
        );
    }
}
