// ============================================================
// IMPORT TOKENIZER
// ============================================================
// Turn pasted or uploaded spreadsheet text into a grid of cells

use crate::domain::import::RawGrid;

/// Tokenize raw spreadsheet text into rows of trimmed cells.
///
/// Comma and tab both act as cell separators so that CSV exports and data
/// pasted straight out of a spreadsheet go through the same path. Quoting
/// follows the usual CSV rules: a quoted cell may contain separators and
/// newlines, and a doubled quote is a literal quote. Rows whose cells are
/// all blank are dropped.
pub fn tokenize(text: &str) -> RawGrid {
    let mut rows: RawGrid = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(ch);
            }
        } else {
            match ch {
                '"' => in_quotes = true,
                ',' | '\t' => {
                    push_cell(&mut row, &mut cell);
                }
                '\n' => end_row(&mut rows, &mut row, &mut cell),
                '\r' if chars.peek() == Some(&'\n') => {
                    chars.next();
                    end_row(&mut rows, &mut row, &mut cell);
                }
                _ => cell.push(ch),
            }
        }
    }

    // Flush whatever is pending after the last line.
    end_row(&mut rows, &mut row, &mut cell);

    rows
}

fn push_cell(row: &mut Vec<String>, cell: &mut String) {
    row.push(cell.trim().to_string());
    cell.clear();
}

fn end_row(rows: &mut RawGrid, row: &mut Vec<String>, cell: &mut String) {
    push_cell(row, cell);
    if row.iter().any(|c| !c.is_empty()) {
        rows.push(std::mem::take(row));
    } else {
        row.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_comma_rows() {
        let grid = tokenize("John,Doe,john@x.com\nJane,Smith,jane@x.com");
        assert_eq!(
            grid,
            vec![
                vec!["John", "Doe", "john@x.com"],
                vec!["Jane", "Smith", "jane@x.com"],
            ]
        );
    }

    #[test]
    fn test_comma_and_tab_are_equivalent_separators() {
        let grid = tokenize("a,b\tc");
        assert_eq!(grid, vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_quoted_delimiter_stays_in_one_cell() {
        let grid = tokenize("\"Smith, Jr.\",Bob");
        assert_eq!(grid, vec![vec!["Smith, Jr.", "Bob"]]);
    }

    #[test]
    fn test_quoted_newline_stays_in_one_cell() {
        let grid = tokenize("\"line one\nline two\",x");
        assert_eq!(grid, vec![vec!["line one\nline two", "x"]]);
    }

    #[test]
    fn test_doubled_quote_is_a_literal_quote() {
        let grid = tokenize("\"say \"\"hi\"\"\",x");
        assert_eq!(grid, vec![vec!["say \"hi\"", "x"]]);
    }

    #[test]
    fn test_blank_rows_are_suppressed() {
        let grid = tokenize("a,b\n\n , \nc,d\n\n");
        assert_eq!(grid, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_trailing_newline_adds_no_row() {
        let grid = tokenize("a,b\n");
        assert_eq!(grid, vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let grid = tokenize("a,b\r\nc,d\r\n");
        assert_eq!(grid, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_lone_carriage_return_is_not_a_terminator() {
        // A bare \r inside a cell is ordinary data; trimming removes it at
        // the cell edge.
        let grid = tokenize("a\rb,c");
        assert_eq!(grid, vec![vec!["a\rb", "c"]]);
    }

    #[test]
    fn test_cells_are_trimmed() {
        let grid = tokenize("  John , Doe \n");
        assert_eq!(grid, vec![vec!["John", "Doe"]]);
    }

    #[test]
    fn test_empty_input_yields_empty_grid() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("\n\n").is_empty());
    }
}
