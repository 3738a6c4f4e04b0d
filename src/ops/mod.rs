// ============================================================================
// OPS MODULE - grid mutations that go beyond a single cell
// ============================================================================
//
//   resize.rs - extend / shorten by one row or column, replay of size changes
//   fill.rs   - breadth-first flood fill
//   line.rs   - Bresenham cell interpolation between pointer samples
// ============================================================================

pub mod fill;
pub mod line;
pub mod resize;

pub use fill::flood_fill;
pub use line::{bresenham, clip_to_bounds};
pub use resize::{ChangeAmountData, MIN_GRID_EXTENT};
