use serde::{Deserialize, Serialize};

use crate::canvas::CanvasState;
use crate::grid::ColorChangeItem;
use crate::ops::resize::{self, ChangeAmountData};

// ============================================================================
// ACTION - one user-visible, reversible edit
// ============================================================================

/// An immutable record of one edit. Applying an action and then its
/// [`create_inverse_action`](Action::create_inverse_action) restores the grid,
/// its indices and the viewport offset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Cells recolored in place.
    ColorChange { changes: Vec<ColorChangeItem> },
    /// Rows/columns added or removed; `changes` holds the painted cells that
    /// were swept away (or restored).
    SizeChange {
        changes: Vec<ColorChangeItem>,
        amounts: Vec<ChangeAmountData>,
    },
    /// A resize and a recolor committed together, e.g. coloring a cell
    /// outside the grid.
    ColorSizeChange {
        changes: Vec<ColorChangeItem>,
        amounts: Vec<ChangeAmountData>,
    },
}

/// What applying an action actually did, for repaint notifications.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppliedAction {
    /// Cells whose color was written (cells absent after the resize are skipped).
    pub changes: Vec<ColorChangeItem>,
    pub resized: bool,
}

impl Action {
    pub fn changes(&self) -> &[ColorChangeItem] {
        match self {
            Action::ColorChange { changes }
            | Action::SizeChange { changes, .. }
            | Action::ColorSizeChange { changes, .. } => changes,
        }
    }

    pub fn amounts(&self) -> &[ChangeAmountData] {
        match self {
            Action::ColorChange { .. } => &[],
            Action::SizeChange { amounts, .. } | Action::ColorSizeChange { amounts, .. } => amounts,
        }
    }

    /// Colors swapped, size deltas negated and re-indexed, both in reverse order.
    pub fn create_inverse_action(&self) -> Action {
        let changes: Vec<ColorChangeItem> = self.changes().iter().rev().map(|c| c.swapped()).collect();
        let amounts: Vec<ChangeAmountData> = self.amounts().iter().rev().map(|a| a.inverse()).collect();
        match self {
            Action::ColorChange { .. } => Action::ColorChange { changes },
            Action::SizeChange { .. } => Action::SizeChange { changes, amounts },
            Action::ColorSizeChange { .. } => Action::ColorSizeChange { changes, amounts },
        }
    }

    /// Replay size deltas first, then write the recorded colors.
    pub fn apply(&self, canvas: &mut CanvasState) -> AppliedAction {
        let amounts = self.amounts();
        for amount in amounts {
            resize::replay(canvas, amount);
        }
        let changes = self
            .changes()
            .iter()
            .filter(|c| canvas.grid.set(c.row_index, c.column_index, &c.color))
            .cloned()
            .collect();
        AppliedAction {
            changes,
            resized: !amounts.is_empty(),
        }
    }

    pub fn description(&self) -> String {
        let cells = self.changes().len();
        let plural = if cells == 1 { "" } else { "s" };
        let resize = self
            .amounts()
            .iter()
            .map(|a| format!("{} {:+}", a.direction.label(), a.amount))
            .collect::<Vec<_>>()
            .join(", ");
        match self {
            Action::ColorChange { .. } => format!("Color {} cell{}", cells, plural),
            Action::SizeChange { .. } => format!("Resize {}", resize),
            Action::ColorSizeChange { .. } => {
                format!("Color {} cell{}, resize {}", cells, plural, resize)
            }
        }
    }
}

// ============================================================================
// HISTORY MANAGER - undo / redo stacks
// ============================================================================

/// Undo/redo history. Depth is unbounded; a new action clears the redo stack.
#[derive(Default)]
pub struct HistoryManager {
    undo_stack: Vec<Action>,
    redo_stack: Vec<Action>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        self.redo_stack.clear();
        self.undo_stack.push(action);
    }

    /// Apply the inverse of the most recent action. `None` when there is
    /// nothing to undo.
    pub fn undo(&mut self, canvas: &mut CanvasState) -> Option<AppliedAction> {
        let action = self.undo_stack.pop()?;
        let applied = action.create_inverse_action().apply(canvas);
        self.redo_stack.push(action);
        Some(applied)
    }

    /// Re-apply the most recently undone action.
    pub fn redo(&mut self, canvas: &mut CanvasState) -> Option<AppliedAction> {
        let action = self.redo_stack.pop()?;
        let applied = action.apply(canvas);
        self.undo_stack.push(action);
        Some(applied)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(|a| a.description())
    }

    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|a| a.description())
    }

    /// All undo descriptions (most recent first)
    pub fn undo_history(&self) -> Vec<String> {
        self.undo_stack.iter().rev().map(|a| a.description()).collect()
    }

    /// Undo `count` times (0 = stay at the current state).
    pub fn undo_to(&mut self, count: usize, canvas: &mut CanvasState) -> Vec<AppliedAction> {
        let mut applied = Vec::new();
        for _ in 0..count {
            match self.undo(canvas) {
                Some(a) => applied.push(a),
                None => break,
            }
        }
        applied
    }

    pub fn last_action(&self) -> Option<&Action> {
        self.undo_stack.last()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}
