use std::collections::HashMap;

use crate::grid::ColorChangeItem;

/// Collects one gesture's cell edits in two views.
///
/// * **raw**: every attempted change in order. Only a change identical to
///   the one just before it is dropped.
/// * **effective**: one entry per cell in first-touch order, keeping the
///   color the cell had before the gesture and the latest color applied.
///
/// Undo uses the effective view so each cell is restored exactly once.
#[derive(Clone, Debug, Default)]
pub struct ChangeRecorder {
    raw: Vec<ColorChangeItem>,
    effective: Vec<ColorChangeItem>,
    /// (row, col) → position in `effective`.
    positions: HashMap<(i32, i32), usize>,
}

impl ChangeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, item: ColorChangeItem) {
        match self.positions.get(&item.position()) {
            Some(&i) => self.effective[i].color.clone_from(&item.color),
            None => {
                self.positions.insert(item.position(), self.effective.len());
                self.effective.push(item.clone());
            }
        }
        if self.raw.last() != Some(&item) {
            self.raw.push(item);
        }
    }

    pub fn record_all(&mut self, items: impl IntoIterator<Item = ColorChangeItem>) {
        for item in items {
            self.record(item);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.effective.is_empty()
    }

    pub fn raw(&self) -> &[ColorChangeItem] {
        &self.raw
    }

    pub fn effective(&self) -> &[ColorChangeItem] {
        &self.effective
    }

    pub fn touched(&self, row: i32, col: i32) -> bool {
        self.positions.contains_key(&(row, col))
    }

    /// Drain both views, leaving the recorder ready for the next gesture.
    /// Returns `(raw, effective)`.
    pub fn take(&mut self) -> (Vec<ColorChangeItem>, Vec<ColorChangeItem>) {
        self.positions.clear();
        (std::mem::take(&mut self.raw), std::mem::take(&mut self.effective))
    }
}
