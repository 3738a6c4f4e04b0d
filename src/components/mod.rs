// ============================================================================
// COMPONENTS: per-gesture change recording and the undo/redo engine
// ============================================================================

pub mod history;
pub mod recorder;

pub use history::{Action, HistoryManager};
pub use recorder::ChangeRecorder;
