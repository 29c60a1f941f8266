//! Dual-valued cells and rows.

use std::borrow::Cow;

use crate::proto;

use super::errors::CellError;

/// A cell with an optional numeric part and an optional text part.
///
/// On the wire an absent numeric part is `NaN` and an absent text part is an
/// empty string, so a cell never stores either sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    numeric: Option<f64>,
    text: Option<String>,
}

impl Cell {
    /// A text-only cell.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::dual(None, Some(value.into()))
    }

    /// A numeric-only cell.
    #[must_use]
    pub fn numeric(value: f64) -> Self {
        Self::dual(Some(value), None)
    }

    /// A cell carrying both parts. `NaN` and empty text count as absent.
    #[must_use]
    pub fn dual(numeric: Option<f64>, text: Option<String>) -> Self {
        Self {
            numeric: numeric.filter(|value| !value.is_nan()),
            text: text.filter(|value| !value.is_empty()),
        }
    }

    /// The numeric part, when present.
    #[must_use]
    pub fn numeric_part(&self) -> Option<f64> {
        self.numeric
    }

    /// The text part, when present.
    #[must_use]
    pub fn text_part(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Text form, falling back to the rendered number.
    #[must_use]
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match (&self.text, self.numeric) {
            (Some(text), _) => Some(Cow::Borrowed(text.as_str())),
            (None, Some(number)) => Some(Cow::Owned(number.to_string())),
            (None, None) => None,
        }
    }

    /// Numeric form, falling back to parsing the text.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        self.numeric.or_else(|| {
            self.text
                .as_deref()
                .and_then(|text| text.trim().parse::<f64>().ok())
                .filter(|value| !value.is_nan())
        })
    }

    pub(crate) fn from_wire(dual: proto::Dual) -> Self {
        Self::dual(Some(dual.num_data), Some(dual.str_data))
    }

    pub(crate) fn into_wire(self) -> proto::Dual {
        proto::Dual {
            num_data: self.numeric.unwrap_or(f64::NAN),
            str_data: self.text.unwrap_or_default(),
        }
    }
}

/// An ordered sequence of cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    /// Creates a row from cells.
    #[must_use]
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// All cells in column order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` for a row without cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Extracts column `column` as text.
    ///
    /// # Errors
    ///
    /// Returns [`CellError`] when the column is missing or carries neither
    /// representation.
    pub fn text(&self, column: usize) -> Result<String, CellError> {
        self.cell(column)?
            .as_text()
            .map(Cow::into_owned)
            .ok_or(CellError::Empty {
                column,
                expected: "text",
            })
    }

    /// Extracts column `column` as a number.
    ///
    /// # Errors
    ///
    /// Returns [`CellError`] when the column is missing, empty, or holds text
    /// that does not parse as a number.
    pub fn number(&self, column: usize) -> Result<f64, CellError> {
        let cell = self.cell(column)?;
        cell.as_number().ok_or_else(|| match cell.text_part() {
            Some(text) => CellError::NotNumeric {
                column,
                text: text.to_owned(),
            },
            None => CellError::Empty {
                column,
                expected: "number",
            },
        })
    }

    fn cell(&self, column: usize) -> Result<&Cell, CellError> {
        self.cells.get(column).ok_or(CellError::MissingColumn {
            column,
            width: self.cells.len(),
        })
    }

    pub(crate) fn from_wire(row: proto::Row) -> Self {
        Self::new(row.duals.into_iter().map(Cell::from_wire).collect())
    }

    pub(crate) fn into_wire(self) -> proto::Row {
        proto::Row {
            duals: self.cells.into_iter().map(Cell::into_wire).collect(),
        }
    }
}

impl From<Vec<Cell>> for Row {
    fn from(cells: Vec<Cell>) -> Self {
        Self::new(cells)
    }
}

impl FromIterator<Cell> for Row {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
