use std::sync::mpsc::{self, Receiver, Sender};

use crate::editor::BrushTool;
use crate::grid::{ColorChangeItem, GridDimensions, GridIndices};
use crate::viewport::PanZoom;

/// Outbound notifications, each carrying just what a host needs to repaint.
#[derive(Clone, Debug, PartialEq)]
pub enum EditorEvent {
    /// Cell colors were written.
    DataChanged { changes: Vec<ColorChangeItem> },
    /// Rows or columns were added or removed.
    GridChanged {
        dimensions: GridDimensions,
        indices: Option<GridIndices>,
    },
    /// The cell under the pointer changed (`None`: pointer off the grid).
    HoverPixelChanged { index: Option<(i32, i32)> },
    /// A drawing gesture finished.
    StrokeEnd {
        tool: BrushTool,
        stroked: Vec<ColorChangeItem>,
        effective: Vec<ColorChangeItem>,
    },
    ViewportChanged { pan_zoom: PanZoom },
    HistoryChanged { can_undo: bool, can_redo: bool },
}

/// Fan-out of [`EditorEvent`]s to any number of receivers. Subscribers whose
/// receiver was dropped are pruned on the next emit.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Sender<EditorEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<EditorEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit(&mut self, event: EditorEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_gets_a_copy() {
        let mut bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        bus.emit(EditorEvent::HoverPixelChanged { index: Some((1, 2)) });
        assert_eq!(a.try_recv().unwrap(), EditorEvent::HoverPixelChanged { index: Some((1, 2)) });
        assert_eq!(b.try_recv().unwrap(), EditorEvent::HoverPixelChanged { index: Some((1, 2)) });
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let mut bus = EventBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());
        bus.emit(EditorEvent::HistoryChanged { can_undo: false, can_redo: false });
        assert_eq!(bus.subscriber_count(), 1);
        assert!(keep.try_recv().is_ok());
    }
}
