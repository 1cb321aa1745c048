//! Linearize rows into reading-order text.

use super::rows::Row;

/// Join one row's blocks left to right with single spaces.
pub fn assemble_row(row: &Row) -> String {
    row.sorted_blocks()
        .into_iter()
        .map(|b| b.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join rows top to bottom with newlines, dropping rows that came out empty.
///
/// An empty result means there was nothing to order and the caller should
/// use the page's raw text instead.
pub fn assemble(rows: &[Row]) -> String {
    rows.iter()
        .map(assemble_row)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Block;
    use pretty_assertions::assert_eq;

    fn block(x0: f64, text: &str) -> Block {
        Block {
            x0,
            y0: 0.0,
            x1: x0 + 1.0,
            y1: 10.0,
            text: text.to_string(),
            height: 10.0,
        }
    }

    #[test]
    fn test_row_is_ordered_by_x0() {
        let row = Row {
            blocks: vec![block(5.0, "five"), block(1.0, "one"), block(3.0, "three")],
        };
        assert_eq!(assemble_row(&row), "one three five");
    }

    #[test]
    fn test_rows_joined_with_newlines() {
        let rows = vec![
            Row {
                blocks: vec![block(60.0, "Alice"), block(0.0, "Name:")],
            },
            Row {
                blocks: vec![block(0.0, "Age:"), block(60.0, "30")],
            },
        ];
        assert_eq!(assemble(&rows), "Name: Alice\nAge: 30");
    }

    #[test]
    fn test_blank_blocks_and_rows_are_dropped() {
        let rows = vec![
            Row {
                blocks: vec![block(0.0, "  "), block(2.0, " kept ")],
            },
            Row {
                blocks: vec![block(0.0, "")],
            },
            Row {
                blocks: vec![block(0.0, "last")],
            },
        ];
        assert_eq!(assemble(&rows), "kept\nlast");
    }

    #[test]
    fn test_no_rows_gives_empty_text() {
        assert_eq!(assemble(&[]), "");
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let rows = vec![Row {
            blocks: vec![block(9.0, "c"), block(1.0, "a"), block(4.0, "b")],
        }];
        let first = assemble(&rows);
        let second = assemble(&rows);
        assert_eq!(first, second);
        assert_eq!(rows[0].blocks[0].text, "c");
    }
}
