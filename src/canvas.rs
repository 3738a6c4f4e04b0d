use egui::{Pos2, Rect, pos2, vec2};

use crate::grid::{Grid, GridDimensions, GridIndices};
use crate::viewport::{PanZoomRequest, Viewport};

/// Grid contents plus the viewport looking at them.
///
/// Resizing touches both (rows are added and the offset compensates), so
/// the resizer and the history engine operate on this pair.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasState {
    pub grid: Grid,
    pub viewport: Viewport,
}

impl CanvasState {
    pub fn new(grid: Grid, viewport: Viewport) -> Self {
        Self { grid, viewport }
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.grid.dimensions()
    }

    pub fn indices(&self) -> Option<GridIndices> {
        self.grid.indices()
    }

    pub fn set_pan_zoom(&mut self, request: PanZoomRequest) {
        let dims = self.dimensions();
        self.viewport = self.viewport.with_pan_zoom(request, dims);
    }

    /// World position of the grid's top-left corner. The grid is centered
    /// on the world origin.
    pub fn grid_origin(&self) -> Pos2 {
        let dims = self.dimensions();
        let len = self.viewport.square_length;
        pos2(
            -(dims.column_count as f32) * len / 2.0,
            -(dims.row_count as f32) * len / 2.0,
        )
    }

    /// Grid index under a world point, even past the current bounds.
    /// `None` only for an empty grid.
    pub fn world_to_index_unbounded(&self, world: Pos2) -> Option<(i32, i32)> {
        let indices = self.indices()?;
        let origin = self.grid_origin();
        let len = self.viewport.square_length;
        let col = ((world.x - origin.x) / len).floor() as i32;
        let row = ((world.y - origin.y) / len).floor() as i32;
        Some((
            indices.top_row_index.saturating_add(row),
            indices.left_column_index.saturating_add(col),
        ))
    }

    /// Grid index under a world point, `None` outside the grid.
    pub fn index_at(&self, world: Pos2) -> Option<(i32, i32)> {
        let (row, col) = self.world_to_index_unbounded(world)?;
        self.grid.contains(row, col).then_some((row, col))
    }

    /// World-space rectangle covered by a cell (existing or not).
    pub fn cell_world_rect(&self, row: i32, col: i32) -> Option<Rect> {
        let indices = self.indices()?;
        let origin = self.grid_origin();
        let len = self.viewport.square_length;
        let min = pos2(
            origin.x + (col - indices.left_column_index) as f32 * len,
            origin.y + (row - indices.top_row_index) as f32 * len,
        );
        Some(Rect::from_min_size(min, vec2(len, len)))
    }

    /// Screen point → grid index, through the current pan/zoom.
    pub fn screen_to_index(&self, screen: Pos2) -> Option<(i32, i32)> {
        self.index_at(self.viewport.screen_to_world(screen))
    }
}
