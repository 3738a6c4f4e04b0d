//! Pixel-grid editor core: an unbounded, resizable grid of colored cells with
//! pan/zoom coordinate mapping, freehand and flood-fill painting, and
//! undo/redo over every edit including grid resizes.
//!
//! Rendering and input wiring belong to the host. The host feeds world or
//! canvas-centered coordinates into an [`Editor`] and repaints from the
//! [`EditorEvent`]s it receives via [`Editor::subscribe`].

pub mod logger;

pub mod canvas;
pub mod components;
pub mod config;
pub mod editor;
pub mod events;
pub mod grid;
pub mod io;
pub mod ops;
pub mod viewport;

pub use canvas::CanvasState;
pub use components::{Action, ChangeRecorder, HistoryManager};
pub use config::EditorConfig;
pub use editor::{BrushTool, Editor};
pub use events::{EditorEvent, EventBus};
pub use grid::{Cell, ColorChangeItem, Direction, Grid, GridDimensions, GridError, GridIndices, PixelModifyItem};
pub use ops::ChangeAmountData;
pub use viewport::{PanZoom, PanZoomRequest, Viewport};
