/// Label lookups within a single sheet row.
///
/// Report sheets are laid out for printing, so labels and their values drift between
/// columns from one report revision to the next. Lookups therefore search a row for a
/// label substring instead of reading fixed coordinates.
use calamine::Data;

/// A matched cell: its column within the row and its textual contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMatch {
    pub column: usize,
    pub contents: String,
}

/// Find the first text cell containing `label` (case-sensitive substring match)
pub fn match_label_in_row(row: &[Data], label: &str) -> Option<CellMatch> {
    row.iter().enumerate().find_map(|(column, cell)| match cell {
        Data::String(s) if s.contains(label) => Some(CellMatch {
            column,
            contents: s.clone(),
        }),
        _ => None,
    })
}

/// Find the first non-blank cell to the right of the cell containing `label`
///
/// Returns `None` when the label is missing, sits in the last column, or is followed
/// only by blank cells.
pub fn first_non_blank_after_label(row: &[Data], label: &str) -> Option<CellMatch> {
    let label_match = match_label_in_row(row, label)?;

    row.iter()
        .enumerate()
        .skip(label_match.column + 1)
        .find(|(_, cell)| !is_blank(cell))
        .map(|(column, cell)| CellMatch {
            column,
            contents: cell_text(cell),
        })
}

/// Blank means an empty cell or whitespace-only text
pub fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Textual representation of a cell, as it would read on the printed report
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
