use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// CELL & ITEM TYPES
// ============================================================================

/// A single grid square. An empty color string means "unpainted".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub color: String,
}

impl Cell {
    pub fn empty() -> Self {
        Self { color: String::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_empty()
    }
}

/// A requested mutation of one cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelModifyItem {
    pub row_index: i32,
    pub column_index: i32,
    pub color: String,
}

impl PixelModifyItem {
    pub fn new(row_index: i32, column_index: i32, color: impl Into<String>) -> Self {
        Self {
            row_index,
            column_index,
            color: color.into(),
        }
    }
}

/// A recorded, reversible mutation of one cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorChangeItem {
    pub row_index: i32,
    pub column_index: i32,
    pub color: String,
    pub previous_color: String,
}

impl ColorChangeItem {
    pub fn new(
        row_index: i32,
        column_index: i32,
        color: impl Into<String>,
        previous_color: impl Into<String>,
    ) -> Self {
        Self {
            row_index,
            column_index,
            color: color.into(),
            previous_color: previous_color.into(),
        }
    }

    /// The same cell with `color` and `previous_color` exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            row_index: self.row_index,
            column_index: self.column_index,
            color: self.previous_color.clone(),
            previous_color: self.color.clone(),
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.row_index, self.column_index)
    }
}

/// One of the four grid edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

impl Direction {
    pub fn all() -> &'static [Direction] {
        &[Direction::Top, Direction::Bottom, Direction::Left, Direction::Right]
    }

    /// `true` for Top/Bottom, which add or remove rows.
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Top | Direction::Bottom)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Top => "top",
            Direction::Bottom => "bottom",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Bounds of the currently allocated rows and columns (inclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridIndices {
    pub top_row_index: i32,
    pub bottom_row_index: i32,
    pub left_column_index: i32,
    pub right_column_index: i32,
}

impl GridIndices {
    pub fn contains(&self, row: i32, col: i32) -> bool {
        row >= self.top_row_index
            && row <= self.bottom_row_index
            && col >= self.left_column_index
            && col <= self.right_column_index
    }

    /// The index of the outermost row/column on the given edge.
    pub fn boundary(&self, direction: Direction) -> i32 {
        match direction {
            Direction::Top => self.top_row_index,
            Direction::Bottom => self.bottom_row_index,
            Direction::Left => self.left_column_index,
            Direction::Right => self.right_column_index,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub row_count: usize,
    pub column_count: usize,
}

// ============================================================================
// ERRORS
// ============================================================================

/// Reasons an initial grid is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Fewer than 2 rows or 2 columns.
    TooSmall { rows: usize, columns: usize },
    /// A row's length differs from the first row's.
    RaggedRows { row: usize, expected: usize, found: usize },
    /// An item's row index differs from the rest of its row.
    MisplacedCell { row: i32, found_row: i32, column: i32 },
    /// A row does not share the first row's column index set.
    ColumnMismatch { row: i32 },
    /// The same (row, column) pair appears twice.
    DuplicateCell { row: i32, column: i32 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::TooSmall { rows, columns } => {
                write!(f, "grid must be at least 2x2, got {}x{}", rows, columns)
            }
            GridError::RaggedRows { row, expected, found } => write!(
                f,
                "row {} has {} cells, expected {}",
                row, found, expected
            ),
            GridError::MisplacedCell { row, found_row, column } => write!(
                f,
                "cell ({}, {}) listed in row {}",
                found_row, column, row
            ),
            GridError::ColumnMismatch { row } => {
                write!(f, "row {} does not share the grid's column indices", row)
            }
            GridError::DuplicateCell { row, column } => {
                write!(f, "cell ({}, {}) appears more than once", row, column)
            }
        }
    }
}

impl std::error::Error for GridError {}

// ============================================================================
// GRID STORE – sorted row/column keys over a flat packed-key cell map
// ============================================================================

/// Pack a signed (row, column) pair into one map key.
#[inline]
fn pack(row: i32, col: i32) -> u64 {
    ((row as u32 as u64) << 32) | (col as u32 as u64)
}

/// Rectangular, signed-index grid of cells.
///
/// Every row shares the same column key set. Only `insert_*` / `remove_*`
/// change the shape, and they always touch a whole row or column, so the
/// invariant holds by construction. Bounds come from the first/last keys
/// of the sorted sets rather than scanning the cells.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    rows: BTreeSet<i32>,
    columns: BTreeSet<i32>,
    cells: HashMap<u64, Cell>,
}

impl Grid {
    // ---- construction -------------------------------------------------------

    /// Empty-celled grid indexed `0..rows` × `0..columns`. Counts past
    /// `i32::MAX` saturate rather than wrap; callers bound them first.
    pub fn new(rows: usize, columns: usize) -> Self {
        let rows = i32::try_from(rows).unwrap_or(i32::MAX);
        let columns = i32::try_from(columns).unwrap_or(i32::MAX);
        let mut grid = Self::default();
        for c in 0..columns {
            grid.columns.insert(c);
        }
        for r in 0..rows {
            grid.insert_row(r);
        }
        grid
    }

    /// Empty-celled grid over explicit row and column keys.
    pub fn with_keys(
        rows: impl IntoIterator<Item = i32>,
        columns: impl IntoIterator<Item = i32>,
    ) -> Self {
        let mut grid = Self {
            columns: columns.into_iter().collect(),
            ..Self::default()
        };
        for r in rows {
            grid.insert_row(r);
        }
        grid
    }

    /// Build a grid from row-major item lists, rejecting anything that is not
    /// a rectangle of at least 2×2 with consistent indices.
    pub fn from_rows(rows: &[Vec<PixelModifyItem>]) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, |r| r.len());
        if rows.len() < 2 || width < 2 {
            return Err(GridError::TooSmall {
                rows: rows.len(),
                columns: width,
            });
        }

        let mut column_set: Option<BTreeSet<i32>> = None;
        let mut grid = Self::default();

        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GridError::RaggedRows {
                    row: i,
                    expected: width,
                    found: row.len(),
                });
            }
            let row_index = row[0].row_index;
            if grid.rows.contains(&row_index) {
                return Err(GridError::DuplicateCell {
                    row: row_index,
                    column: row[0].column_index,
                });
            }

            let mut these = BTreeSet::new();
            for item in row {
                if item.row_index != row_index {
                    return Err(GridError::MisplacedCell {
                        row: row_index,
                        found_row: item.row_index,
                        column: item.column_index,
                    });
                }
                if !these.insert(item.column_index) {
                    return Err(GridError::DuplicateCell {
                        row: row_index,
                        column: item.column_index,
                    });
                }
            }

            match &column_set {
                Some(expected) if *expected != these => {
                    return Err(GridError::ColumnMismatch { row: row_index });
                }
                Some(_) => {}
                None => column_set = Some(these),
            }

            grid.rows.insert(row_index);
            for item in row {
                grid.cells.insert(
                    pack(row_index, item.column_index),
                    Cell {
                        color: item.color.clone(),
                    },
                );
            }
        }

        grid.columns = column_set.unwrap_or_default();
        Ok(grid)
    }

    // ---- access -------------------------------------------------------------

    pub fn get(&self, row: i32, col: i32) -> Option<&Cell> {
        self.cells.get(&pack(row, col))
    }

    pub fn color(&self, row: i32, col: i32) -> Option<&str> {
        self.get(row, col).map(|c| c.color.as_str())
    }

    pub fn contains(&self, row: i32, col: i32) -> bool {
        self.cells.contains_key(&pack(row, col))
    }

    /// Recolor an existing cell in place. Returns `false` (and does nothing)
    /// when the cell is not backed by storage.
    pub fn set(&mut self, row: i32, col: i32, color: &str) -> bool {
        match self.cells.get_mut(&pack(row, col)) {
            Some(cell) => {
                if cell.color != color {
                    cell.color.clear();
                    cell.color.push_str(color);
                }
                true
            }
            None => false,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            self.columns.len()
        }
    }

    pub fn dimensions(&self) -> GridDimensions {
        GridDimensions {
            row_count: self.row_count(),
            column_count: self.column_count(),
        }
    }

    /// Current bounds, or `None` for an empty grid.
    pub fn indices(&self) -> Option<GridIndices> {
        let top = *self.rows.first()?;
        let bottom = *self.rows.last()?;
        let left = *self.columns.first()?;
        let right = *self.columns.last()?;
        Some(GridIndices {
            top_row_index: top,
            bottom_row_index: bottom,
            left_column_index: left,
            right_column_index: right,
        })
    }

    pub fn row_keys(&self) -> impl Iterator<Item = i32> + '_ {
        self.rows.iter().copied()
    }

    pub fn column_keys(&self) -> impl Iterator<Item = i32> + '_ {
        self.columns.iter().copied()
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, &Cell)> + '_ {
        self.rows.iter().flat_map(move |&r| {
            self.columns
                .iter()
                .filter_map(move |&c| self.get(r, c).map(|cell| (r, c, cell)))
        })
    }

    pub fn painted_count(&self) -> usize {
        self.cells.values().filter(|c| !c.is_empty()).count()
    }

    /// Row-major snapshot of every cell.
    pub fn data_array(&self) -> Vec<Vec<PixelModifyItem>> {
        self.rows
            .iter()
            .map(|&r| {
                self.columns
                    .iter()
                    .map(|&c| {
                        let color = self.color(r, c).unwrap_or_default();
                        PixelModifyItem::new(r, c, color)
                    })
                    .collect()
            })
            .collect()
    }

    /// Check that every (row, column) key pair is backed and nothing else is.
    pub fn is_rectangular(&self) -> bool {
        if self.cells.len() != self.rows.len() * self.columns.len() {
            return false;
        }
        self.rows
            .iter()
            .all(|&r| self.columns.iter().all(|&c| self.contains(r, c)))
    }

    // ---- shape mutation -----------------------------------------------------

    /// Add an empty row spanning every column. `false` if the row exists.
    pub fn insert_row(&mut self, row: i32) -> bool {
        if !self.rows.insert(row) {
            return false;
        }
        for &c in &self.columns {
            self.cells.insert(pack(row, c), Cell::empty());
        }
        true
    }

    /// Add an empty column spanning every row. `false` if the column exists.
    pub fn insert_column(&mut self, col: i32) -> bool {
        if !self.columns.insert(col) {
            return false;
        }
        for &r in &self.rows {
            self.cells.insert(pack(r, col), Cell::empty());
        }
        true
    }

    /// Remove a row, returning its cells in column order.
    pub fn remove_row(&mut self, row: i32) -> Option<Vec<(i32, Cell)>> {
        if !self.rows.remove(&row) {
            return None;
        }
        let removed = self
            .columns
            .iter()
            .filter_map(|&c| self.cells.remove(&pack(row, c)).map(|cell| (c, cell)))
            .collect();
        Some(removed)
    }

    /// Remove a column, returning its cells in row order.
    pub fn remove_column(&mut self, col: i32) -> Option<Vec<(i32, Cell)>> {
        if !self.columns.remove(&col) {
            return None;
        }
        let removed = self
            .rows
            .iter()
            .filter_map(|&r| self.cells.remove(&pack(r, col)).map(|cell| (r, cell)))
            .collect();
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_from(colors: &[&[&str]], top: i32, left: i32) -> Vec<Vec<PixelModifyItem>> {
        colors
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(|(c, color)| PixelModifyItem::new(top + r as i32, left + c as i32, *color))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn new_grid_is_zero_based_and_empty() {
        let grid = Grid::new(6, 8);
        assert_eq!(grid.row_count(), 6);
        assert_eq!(grid.column_count(), 8);
        assert_eq!(
            grid.indices(),
            Some(GridIndices {
                top_row_index: 0,
                bottom_row_index: 5,
                left_column_index: 0,
                right_column_index: 7,
            })
        );
        assert_eq!(grid.painted_count(), 0);
        assert!(grid.is_rectangular());
    }

    #[test]
    fn empty_grid_reports_zero_and_no_indices() {
        let grid = Grid::default();
        assert_eq!(grid.row_count(), 0);
        assert_eq!(grid.column_count(), 0);
        assert!(grid.indices().is_none());
    }

    #[test]
    fn set_on_missing_cell_is_ignored() {
        let mut grid = Grid::new(2, 2);
        assert!(!grid.set(5, 5, "#fff"));
        assert!(grid.get(5, 5).is_none());
        assert!(grid.set(1, 1, "#fff"));
        assert_eq!(grid.color(1, 1), Some("#fff"));
    }

    #[test]
    fn negative_indices_are_first_class() {
        let mut grid = Grid::new(2, 2);
        grid.insert_row(-1);
        grid.insert_column(-3);
        let idx = grid.indices().unwrap();
        assert_eq!(idx.top_row_index, -1);
        assert_eq!(idx.left_column_index, -3);
        assert!(grid.set(-1, -3, "red"));
        assert!(grid.is_rectangular());
    }

    #[test]
    fn remove_row_returns_cells_and_keeps_shape() {
        let mut grid = Grid::new(3, 3);
        grid.set(0, 1, "blue");
        let removed = grid.remove_row(0).unwrap();
        assert_eq!(removed.len(), 3);
        assert_eq!(removed[1], (1, Cell { color: "blue".into() }));
        assert_eq!(grid.row_count(), 2);
        assert!(grid.is_rectangular());
        assert!(grid.remove_row(0).is_none());
    }

    #[test]
    fn from_rows_accepts_offset_rectangle() {
        let rows = rows_from(&[&["a", ""], &["", "b"]], -4, 10);
        let grid = Grid::from_rows(&rows).unwrap();
        assert_eq!(grid.color(-4, 10), Some("a"));
        assert_eq!(grid.color(-3, 11), Some("b"));
        assert_eq!(grid.data_array(), rows);
    }

    #[test]
    fn from_rows_rejects_bad_shapes() {
        let tiny = rows_from(&[&["", ""]], 0, 0);
        assert!(matches!(Grid::from_rows(&tiny), Err(GridError::TooSmall { .. })));

        let mut ragged = rows_from(&[&["", ""], &["", ""]], 0, 0);
        ragged[1].pop();
        assert!(matches!(Grid::from_rows(&ragged), Err(GridError::RaggedRows { .. })));

        let shifted = vec![
            rows_from(&[&["", ""]], 0, 0).remove(0),
            rows_from(&[&["", ""]], 1, 1).remove(0),
        ];
        assert_eq!(
            Grid::from_rows(&shifted),
            Err(GridError::ColumnMismatch { row: 1 })
        );

        let mut dup = rows_from(&[&["", ""], &["", ""]], 0, 0);
        dup[1][0].row_index = 0;
        dup[1][1].row_index = 0;
        assert!(matches!(Grid::from_rows(&dup), Err(GridError::DuplicateCell { .. })));
    }

    #[test]
    fn cells_iterate_row_major() {
        let mut grid = Grid::new(2, 2);
        grid.set(1, 0, "x");
        let order: Vec<(i32, i32)> = grid.cells().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }
}
