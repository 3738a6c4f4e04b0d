// ============================================================================
// GRID RESIZER: grow / shrink the grid one row or column at a time
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::canvas::CanvasState;
use crate::grid::{ColorChangeItem, Direction};
use crate::{log_info, log_warn};

/// The grid never shrinks below this many rows or columns.
pub const MIN_GRID_EXTENT: usize = 2;

/// Upper bound on cells an automatic extension may produce.
pub const MAX_GRID_CELLS: usize = 16 * 1024 * 1024;

/// A signed count of rows/columns added (positive) or removed (negative) on
/// one edge, with that edge's index before the change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeAmountData {
    pub direction: Direction,
    pub amount: i32,
    pub start_index: i32,
}

impl ChangeAmountData {
    /// Negate the amount and move `start_index` to where the boundary sits
    /// after this change.
    pub fn inverse(&self) -> Self {
        let start_index = match self.direction {
            Direction::Top | Direction::Left => self.start_index - self.amount,
            Direction::Bottom | Direction::Right => self.start_index + self.amount,
        };
        Self {
            direction: self.direction,
            amount: -self.amount,
            start_index,
        }
    }
}

/// Fold `data` into the last entry when it continues on the same edge.
/// Entries that cancel out are dropped.
pub fn merge_amount(list: &mut Vec<ChangeAmountData>, data: ChangeAmountData) {
    if let Some(last) = list.last_mut()
        && last.direction == data.direction
    {
        last.amount += data.amount;
        if last.amount == 0 {
            list.pop();
        }
        return;
    }
    if data.amount != 0 {
        list.push(data);
    }
}

/// Add one empty row/column on `direction` and shift the view half a cell
/// toward it so existing squares keep their screen position.
/// `None` only for an empty grid.
pub fn extend(canvas: &mut CanvasState, direction: Direction) -> Option<ChangeAmountData> {
    let indices = canvas.indices()?;
    let start_index = indices.boundary(direction);
    let inserted = match direction {
        Direction::Top => canvas.grid.insert_row(start_index - 1),
        Direction::Bottom => canvas.grid.insert_row(start_index + 1),
        Direction::Left => canvas.grid.insert_column(start_index - 1),
        Direction::Right => canvas.grid.insert_column(start_index + 1),
    };
    if !inserted {
        return None;
    }
    canvas.viewport = canvas.viewport.shift_for_resize(direction, 1);
    Some(ChangeAmountData {
        direction,
        amount: 1,
        start_index,
    })
}

/// Remove the outermost row/column on `direction`.
///
/// Refused (`None`) when that axis is already at [`MIN_GRID_EXTENT`].
/// Returns the change plus every painted cell that was swept away, recorded
/// as `previous_color` → `""`.
pub fn shorten(
    canvas: &mut CanvasState,
    direction: Direction,
) -> Option<(ChangeAmountData, Vec<ColorChangeItem>)> {
    let indices = canvas.indices()?;
    let dims = canvas.dimensions();
    let extent = if direction.is_vertical() {
        dims.row_count
    } else {
        dims.column_count
    };
    if extent <= MIN_GRID_EXTENT {
        return None;
    }

    let start_index = indices.boundary(direction);
    let swept: Vec<ColorChangeItem> = if direction.is_vertical() {
        canvas
            .grid
            .remove_row(start_index)?
            .into_iter()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(col, cell)| ColorChangeItem::new(start_index, col, "", cell.color))
            .collect()
    } else {
        canvas
            .grid
            .remove_column(start_index)?
            .into_iter()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(row, cell)| ColorChangeItem::new(row, start_index, "", cell.color))
            .collect()
    };

    canvas.viewport = canvas.viewport.shift_for_resize(direction, -1);
    Some((
        ChangeAmountData {
            direction,
            amount: -1,
            start_index,
        },
        swept,
    ))
}

/// Replay a recorded size change: `|amount|` extends or shortens.
/// Returns the cells swept by any shortening.
pub fn replay(canvas: &mut CanvasState, data: &ChangeAmountData) -> Vec<ColorChangeItem> {
    let mut swept = Vec::new();
    let Some(indices) = canvas.indices() else {
        return swept;
    };
    let boundary = indices.boundary(data.direction);
    if boundary != data.start_index {
        log_warn!(
            "Replaying {} change from index {} but the {} edge is at {}",
            data.direction.label(),
            data.start_index,
            data.direction.label(),
            boundary
        );
    }

    for _ in 0..data.amount.unsigned_abs() {
        if data.amount > 0 {
            if extend(canvas, data.direction).is_none() {
                break;
            }
        } else {
            match shorten(canvas, data.direction) {
                Some((_, cells)) => swept.extend(cells),
                None => {
                    log_warn!(
                        "Replay stopped: {} edge already at minimum size",
                        data.direction.label()
                    );
                    break;
                }
            }
        }
    }
    swept
}

/// Grow the grid until (`row`, `col`) is backed by storage.
///
/// Returns the merged per-edge changes (empty if nothing was needed), or
/// `None` without touching the grid when the result would exceed
/// [`MAX_GRID_CELLS`].
pub fn extend_to_include(
    canvas: &mut CanvasState,
    row: i32,
    col: i32,
) -> Option<Vec<ChangeAmountData>> {
    let mut changes = Vec::new();
    let Some(indices) = canvas.indices() else {
        return Some(changes);
    };

    let needs = [
        (Direction::Top, indices.top_row_index as i64 - row as i64),
        (Direction::Bottom, row as i64 - indices.bottom_row_index as i64),
        (Direction::Left, indices.left_column_index as i64 - col as i64),
        (Direction::Right, col as i64 - indices.right_column_index as i64),
    ];

    let dims = canvas.dimensions();
    let rows = dims.row_count as i64 + needs[0].1.max(0) + needs[1].1.max(0);
    let cols = dims.column_count as i64 + needs[2].1.max(0) + needs[3].1.max(0);
    if rows.saturating_mul(cols) > MAX_GRID_CELLS as i64 {
        log_warn!(
            "Refusing to extend grid to {}x{} for cell ({}, {})",
            rows,
            cols,
            row,
            col
        );
        return None;
    }

    for (direction, count) in needs {
        for _ in 0..count.max(0) {
            if let Some(data) = extend(canvas, direction) {
                merge_amount(&mut changes, data);
            }
        }
    }
    if !changes.is_empty() {
        log_info!("Auto-extended grid to {}x{}", rows, cols);
    }
    Some(changes)
}
