use std::sync::mpsc::Receiver;

use egui::{Pos2, Vec2, vec2};
use uuid::Uuid;

use crate::canvas::CanvasState;
use crate::components::history::{Action, AppliedAction, HistoryManager};
use crate::components::recorder::ChangeRecorder;
use crate::config::EditorConfig;
use crate::events::{EditorEvent, EventBus};
use crate::grid::{ColorChangeItem, Direction, Grid, GridDimensions, GridIndices, PixelModifyItem};
use crate::ops::resize::{self, ChangeAmountData};
use crate::ops::{bresenham, clip_to_bounds, flood_fill};
use crate::viewport::{PanZoom, PanZoomRequest, Viewport};
use crate::{log_info, log_warn};

/// Upper bound on rows/columns a single resize drag may add or remove.
const MAX_RESIZE_STEPS: usize = 4096;

// ============================================================================
// BRUSH TOOLS
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BrushTool {
    /// Pointer gestures do not edit (the host may pan instead).
    None,
    #[default]
    Dot,
    Eraser,
    PaintBucket,
}

impl BrushTool {
    pub fn config_name(&self) -> &'static str {
        match self {
            BrushTool::None => "none",
            BrushTool::Dot => "dot",
            BrushTool::Eraser => "eraser",
            BrushTool::PaintBucket => "paint_bucket",
        }
    }

    pub fn from_config_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(BrushTool::None),
            "dot" => Some(BrushTool::Dot),
            "eraser" => Some(BrushTool::Eraser),
            "paint_bucket" => Some(BrushTool::PaintBucket),
            _ => None,
        }
    }
}

/// What the pointer is currently doing.
#[derive(Clone, Debug, Default)]
enum Gesture {
    #[default]
    Idle,
    /// Freehand stroke; `last` is the previous sample's (unbounded) index.
    Stroke { last: Option<(i32, i32)> },
    /// Paint bucket: filled on pointer-down, committed on pointer-up.
    Fill,
    /// Dragging a grid edge.
    Resize {
        direction: Direction,
        amounts: Vec<ChangeAmountData>,
        swept: Vec<ColorChangeItem>,
    },
}

// ============================================================================
// EDITOR SESSION
// ============================================================================

/// One editing session: owns the grid, viewport, history and gesture state.
///
/// All entry points run to completion and degrade to no-ops on invalid input.
/// Gesture coordinates are world points (grid-centered); resize drags take a
/// canvas-centered screen point because the world frame moves as the grid grows.
pub struct Editor {
    pub id: Uuid,
    canvas: CanvasState,
    history: HistoryManager,
    recorder: ChangeRecorder,
    events: EventBus,
    config: EditorConfig,
    brush_tool: BrushTool,
    brush_color: String,
    grid_fixed: bool,
    pan_zoomable: bool,
    hovered: Option<(i32, i32)>,
    gesture: Gesture,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let config = config.validated();
        let grid = Grid::new(config.row_count, config.column_count);
        Self::with_grid(config, grid)
    }

    /// Start from initial rows. A malformed grid is logged and replaced by
    /// the configured default grid.
    pub fn with_rows(config: EditorConfig, rows: &[Vec<PixelModifyItem>]) -> Self {
        let config = config.validated();
        let grid = match Grid::from_rows(rows) {
            Ok(grid) => grid,
            Err(e) => {
                log_warn!("Invalid initial grid ({}), using default grid", e);
                Grid::new(config.row_count, config.column_count)
            }
        };
        Self::with_grid(config, grid)
    }

    pub fn with_grid(config: EditorConfig, grid: Grid) -> Self {
        let config = config.validated();
        let viewport = Viewport {
            canvas_size: vec2(config.canvas_width, config.canvas_height),
            device_pixel_ratio: config.device_pixel_ratio,
            square_length: config.square_length,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            pan_zoom: PanZoom {
                scale: config.initial_scale,
                offset: Vec2::ZERO,
            },
        };
        let id = Uuid::new_v4();
        let dims = grid.dimensions();
        log_info!(
            "Editor {} created with {}x{} grid",
            id,
            dims.row_count,
            dims.column_count
        );
        Self {
            id,
            canvas: CanvasState::new(grid, viewport),
            history: HistoryManager::new(),
            recorder: ChangeRecorder::new(),
            events: EventBus::new(),
            brush_tool: config.brush_tool,
            brush_color: config.brush_color.clone(),
            grid_fixed: config.grid_fixed,
            pan_zoomable: config.pan_zoomable,
            config,
            hovered: None,
            gesture: Gesture::Idle,
        }
    }

    // ---- accessors ----------------------------------------------------------

    pub fn subscribe(&mut self) -> Receiver<EditorEvent> {
        self.events.subscribe()
    }

    pub fn grid(&self) -> &Grid {
        &self.canvas.grid
    }

    pub fn data_array(&self) -> Vec<Vec<PixelModifyItem>> {
        self.canvas.grid.data_array()
    }

    pub fn grid_indices(&self) -> Option<GridIndices> {
        self.canvas.indices()
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.canvas.dimensions()
    }

    pub fn canvas(&self) -> &CanvasState {
        &self.canvas
    }

    pub fn viewport(&self) -> &Viewport {
        &self.canvas.viewport
    }

    pub fn pan_zoom(&self) -> PanZoom {
        self.canvas.viewport.pan_zoom
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn brush_tool(&self) -> BrushTool {
        self.brush_tool
    }

    pub fn brush_color(&self) -> &str {
        &self.brush_color
    }

    pub fn hovered(&self) -> Option<(i32, i32)> {
        self.hovered
    }

    pub fn is_grid_fixed(&self) -> bool {
        self.grid_fixed
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.gesture, Gesture::Stroke { .. } | Gesture::Fill)
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.gesture, Gesture::Resize { .. })
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ---- settings -----------------------------------------------------------

    pub fn set_brush_tool(&mut self, tool: BrushTool) {
        self.finish_gesture();
        self.brush_tool = tool;
    }

    pub fn set_brush_color(&mut self, color: impl Into<String>) {
        self.brush_color = color.into();
    }

    pub fn set_grid_fixed(&mut self, fixed: bool) {
        self.grid_fixed = fixed;
    }

    pub fn set_pan_zoomable(&mut self, enabled: bool) {
        self.pan_zoomable = enabled;
    }

    /// Host canvas resized (logical pixels). Re-clamps the current offset.
    pub fn set_canvas_size(&mut self, width: f32, height: f32) {
        self.canvas.viewport.canvas_size = vec2(width, height);
        let offset = self.canvas.viewport.pan_zoom.offset;
        self.update_viewport(|vp, dims| vp.with_pan_zoom(PanZoomRequest::offset(offset), dims));
    }

    pub fn set_device_pixel_ratio(&mut self, dpr: f32) {
        if dpr.is_finite() && dpr > 0.0 {
            self.canvas.viewport.device_pixel_ratio = dpr;
        }
    }

    /// Replace the grid wholesale. History and any gesture are discarded.
    pub fn set_grid(&mut self, grid: Grid) {
        self.gesture = Gesture::Idle;
        self.recorder.take();
        self.history.clear();
        self.canvas.grid = grid;
        self.emit_grid_changed();
        self.emit_history_changed();
    }

    // ---- viewport -----------------------------------------------------------

    pub fn screen_to_world(&self, screen: Pos2) -> Pos2 {
        self.canvas.viewport.screen_to_world(screen)
    }

    pub fn world_to_screen(&self, world: Pos2) -> Pos2 {
        self.canvas.viewport.world_to_screen(world)
    }

    /// Programmatic pan/zoom; the scale is used as given, the offset clamped.
    pub fn set_pan_zoom(&mut self, request: PanZoomRequest) {
        self.update_viewport(|vp, dims| vp.with_pan_zoom(request, dims));
    }

    pub fn zoom_about(&mut self, anchor: Pos2, scale: f32) {
        if self.pan_zoomable {
            self.update_viewport(|vp, dims| vp.zoom_about(anchor, scale, dims));
        }
    }

    pub fn zoom_by_wheel(&mut self, anchor: Pos2, delta_y: f32) {
        if self.pan_zoomable {
            let sensitivity = self.config.wheel_sensitivity;
            self.update_viewport(|vp, dims| vp.zoom_by_wheel(anchor, delta_y, sensitivity, dims));
        }
    }

    pub fn pinch_zoom(&mut self, previous: [Pos2; 2], current: [Pos2; 2]) {
        if self.pan_zoomable {
            self.update_viewport(|vp, dims| vp.pinch_zoom(previous, current, dims));
        }
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        if self.pan_zoomable {
            self.update_viewport(|vp, dims| vp.pan_by(delta, dims));
        }
    }

    pub fn reset_view(&mut self) {
        let scale = self.config.initial_scale;
        self.update_viewport(|vp, dims| {
            vp.with_pan_zoom(
                PanZoomRequest {
                    scale: Some(scale),
                    offset: Some(Vec2::ZERO),
                },
                dims,
            )
        });
    }

    fn update_viewport(&mut self, f: impl FnOnce(Viewport, GridDimensions) -> Viewport) {
        let dims = self.canvas.dimensions();
        let updated = f(self.canvas.viewport, dims);
        if updated != self.canvas.viewport {
            self.canvas.viewport = updated;
            self.events.emit(EditorEvent::ViewportChanged {
                pan_zoom: updated.pan_zoom,
            });
        }
    }

    // ---- drawing gestures ---------------------------------------------------

    /// Track the cell under the pointer, notifying when it changes.
    pub fn pointer_hover(&mut self, world: Pos2) {
        let index = self.canvas.index_at(world);
        self.set_hovered(index);
    }

    fn set_hovered(&mut self, index: Option<(i32, i32)>) {
        if index != self.hovered {
            self.hovered = index;
            self.events.emit(EditorEvent::HoverPixelChanged { index });
        }
    }

    pub fn pointer_down(&mut self, world: Pos2) {
        self.finish_gesture();
        self.pointer_hover(world);

        match self.brush_tool {
            BrushTool::None => {}
            BrushTool::Dot | BrushTool::Eraser => {
                let index = self.canvas.world_to_index_unbounded(world);
                self.gesture = Gesture::Stroke { last: index };
                if let Some((row, col)) = index {
                    let changed: Vec<ColorChangeItem> = self.paint_cell(row, col).into_iter().collect();
                    self.emit_data_changed(changed);
                }
            }
            BrushTool::PaintBucket => {
                self.gesture = Gesture::Fill;
                if let Some((row, col)) = self.canvas.index_at(world) {
                    let color = self.brush_color.clone();
                    let changes = flood_fill(&mut self.canvas.grid, row, col, &color);
                    self.recorder.record_all(changes.iter().cloned());
                    self.emit_data_changed(changes);
                }
            }
        }
    }

    /// Continue a stroke, painting every cell on the segment from the previous
    /// sample so fast moves leave no gaps.
    pub fn pointer_move(&mut self, world: Pos2) {
        self.pointer_hover(world);

        let Gesture::Stroke { last } = self.gesture else {
            return;
        };
        let Some(current) = self.canvas.world_to_index_unbounded(world) else {
            return;
        };
        if last == Some(current) {
            return;
        }

        let Some(indices) = self.canvas.indices() else {
            return;
        };
        let from = last.unwrap_or(current);
        let path: Vec<(i32, i32)> = match clip_to_bounds(from, current, &indices) {
            Some((a, b)) => bresenham(a, b).into_iter().filter(|&p| Some(p) != last).collect(),
            None => Vec::new(),
        };
        let mut changed = Vec::new();
        for (row, col) in path {
            if let Some(change) = self.paint_cell(row, col) {
                changed.push(change);
            }
        }
        self.gesture = Gesture::Stroke {
            last: Some(current),
        };
        self.emit_data_changed(changed);
    }

    /// End the gesture and commit its effective changes as one action.
    pub fn pointer_up(&mut self) {
        self.finish_gesture();
    }

    /// The pointer left the surface mid-gesture. Touched cells are still
    /// committed so the edit stays undoable.
    pub fn pointer_cancel(&mut self) {
        self.finish_gesture();
        self.set_hovered(None);
    }

    /// Color one in-bounds cell with the active tool and record it.
    fn paint_cell(&mut self, row: i32, col: i32) -> Option<ColorChangeItem> {
        let color = match self.brush_tool {
            BrushTool::Eraser => "",
            _ => self.brush_color.as_str(),
        };
        let previous = self.canvas.grid.color(row, col)?;
        if previous == color {
            return None;
        }
        let change = ColorChangeItem::new(row, col, color, previous);
        self.canvas.grid.set(row, col, color);
        self.recorder.record(change.clone());
        Some(change)
    }

    fn finish_gesture(&mut self) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Stroke { .. } | Gesture::Fill => self.commit_stroke(),
            Gesture::Resize { amounts, swept, .. } => self.commit_resize(amounts, swept),
        }
    }

    fn commit_stroke(&mut self) {
        if self.recorder.is_empty() {
            return;
        }
        let (stroked, effective) = self.recorder.take();
        self.record(Action::ColorChange {
            changes: effective.clone(),
        });
        self.events.emit(EditorEvent::StrokeEnd {
            tool: self.brush_tool,
            stroked,
            effective,
        });
    }

    // ---- resize gestures ----------------------------------------------------

    /// Start dragging the `direction` edge. Refused when the grid is fixed.
    pub fn begin_resize(&mut self, direction: Direction) -> bool {
        self.finish_gesture();
        if self.grid_fixed {
            return false;
        }
        self.gesture = Gesture::Resize {
            direction,
            amounts: Vec::new(),
            swept: Vec::new(),
        };
        true
    }

    /// Move the dragged edge toward a canvas-centered screen point. The edge
    /// snaps to the row/column boundary nearest the pointer.
    pub fn drag_resize(&mut self, screen: Pos2) {
        let Gesture::Resize { direction, .. } = self.gesture else {
            return;
        };
        let mut steps = 0;
        while steps < MAX_RESIZE_STEPS {
            let distance = self.outward_distance(direction, screen);
            let step = if distance >= 0.5 {
                resize::extend(&mut self.canvas, direction).map(|d| (d, Vec::new()))
            } else if distance < -0.5 {
                resize::shorten(&mut self.canvas, direction)
            } else {
                None
            };
            let Some((data, cells)) = step else { break };
            if let Gesture::Resize { amounts, swept, .. } = &mut self.gesture {
                resize::merge_amount(amounts, data);
                swept.extend(cells);
            }
            steps += 1;
        }
        if steps > 0 {
            self.emit_grid_changed();
        }
    }

    pub fn end_resize(&mut self) {
        if self.is_resizing() {
            self.finish_gesture();
        }
    }

    /// How far (in cells) the screen point lies outside the `direction` edge.
    fn outward_distance(&self, direction: Direction, screen: Pos2) -> f32 {
        let world = self.canvas.viewport.screen_to_world(screen);
        let origin = self.canvas.grid_origin();
        let dims = self.canvas.dimensions();
        let len = self.canvas.viewport.square_length;
        let far = origin + vec2(dims.column_count as f32 * len, dims.row_count as f32 * len);
        let d = match direction {
            Direction::Top => origin.y - world.y,
            Direction::Bottom => world.y - far.y,
            Direction::Left => origin.x - world.x,
            Direction::Right => world.x - far.x,
        };
        d / len
    }

    /// A drag that returns to its starting edge nets no size change, but any
    /// cells it swept on the way are now blank and still need an undo record.
    fn commit_resize(&mut self, amounts: Vec<ChangeAmountData>, swept: Vec<ColorChangeItem>) {
        if !amounts.is_empty() {
            self.record(Action::SizeChange {
                changes: swept,
                amounts,
            });
            return;
        }
        let mut cleared = ChangeRecorder::new();
        cleared.record_all(
            swept
                .into_iter()
                .filter(|c| self.canvas.grid.contains(c.row_index, c.column_index)),
        );
        let (_, changes) = cleared.take();
        if !changes.is_empty() {
            self.record(Action::ColorChange { changes });
        }
    }

    // ---- programmatic edits -------------------------------------------------

    /// Add one row/column as its own undoable action.
    pub fn extend(&mut self, direction: Direction) -> bool {
        self.finish_gesture();
        if self.grid_fixed {
            return false;
        }
        let Some(data) = resize::extend(&mut self.canvas, direction) else {
            return false;
        };
        self.emit_grid_changed();
        self.record(Action::SizeChange {
            changes: Vec::new(),
            amounts: vec![data],
        });
        true
    }

    /// Remove one row/column as its own undoable action. Refused at 2×2.
    pub fn shorten(&mut self, direction: Direction) -> bool {
        self.finish_gesture();
        if self.grid_fixed {
            return false;
        }
        let Some((data, swept)) = resize::shorten(&mut self.canvas, direction) else {
            return false;
        };
        self.emit_grid_changed();
        self.record(Action::SizeChange {
            changes: swept,
            amounts: vec![data],
        });
        true
    }

    /// Color cells, growing the grid first when an index lies outside it
    /// (unless the grid is fixed, in which case those items are skipped).
    /// The growth and the colors form one action. Returns `false` when
    /// nothing changed.
    pub fn color_pixels(&mut self, items: &[PixelModifyItem]) -> bool {
        if items.is_empty() {
            return false;
        }
        self.finish_gesture();

        let mut amounts = Vec::new();
        if !self.grid_fixed {
            for item in items {
                if let Some(changes) = resize::extend_to_include(&mut self.canvas, item.row_index, item.column_index) {
                    for data in changes {
                        resize::merge_amount(&mut amounts, data);
                    }
                }
            }
        }

        let mut batch = ChangeRecorder::new();
        for item in items {
            let Some(previous) = self.canvas.grid.color(item.row_index, item.column_index) else {
                continue;
            };
            if previous == item.color {
                continue;
            }
            batch.record(ColorChangeItem::new(item.row_index, item.column_index, item.color.as_str(), previous));
            self.canvas.grid.set(item.row_index, item.column_index, &item.color);
        }
        let (_, changes) = batch.take();

        if amounts.is_empty() && changes.is_empty() {
            return false;
        }
        if !amounts.is_empty() {
            self.emit_grid_changed();
        }
        self.emit_data_changed(changes.clone());
        let action = if amounts.is_empty() {
            Action::ColorChange { changes }
        } else {
            Action::ColorSizeChange { changes, amounts }
        };
        self.record(action);
        true
    }

    /// Erase cells. Indices outside the grid are ignored.
    pub fn erase_pixels(&mut self, indices: &[(i32, i32)]) -> bool {
        let items: Vec<PixelModifyItem> = indices
            .iter()
            .filter(|&&(row, col)| self.canvas.grid.contains(row, col))
            .map(|&(row, col)| PixelModifyItem::new(row, col, ""))
            .collect();
        if items.is_empty() {
            return false;
        }
        self.color_pixels(&items)
    }

    /// Erase every painted cell as one action.
    pub fn clear(&mut self) -> bool {
        let painted: Vec<(i32, i32)> = self
            .canvas
            .grid
            .cells()
            .filter(|(_, _, cell)| !cell.is_empty())
            .map(|(row, col, _)| (row, col))
            .collect();
        self.erase_pixels(&painted)
    }

    // ---- history ------------------------------------------------------------

    fn record(&mut self, action: Action) {
        log_info!("Recorded: {}", action.description());
        self.history.push(action);
        self.emit_history_changed();
    }

    pub fn undo(&mut self) -> bool {
        self.finish_gesture();
        if let Some(description) = self.history.undo_description() {
            log_info!("Undo: {}", description);
        }
        let Some(applied) = self.history.undo(&mut self.canvas) else {
            return false;
        };
        self.after_history_step(applied);
        true
    }

    pub fn redo(&mut self) -> bool {
        self.finish_gesture();
        if let Some(description) = self.history.redo_description() {
            log_info!("Redo: {}", description);
        }
        let Some(applied) = self.history.redo(&mut self.canvas) else {
            return false;
        };
        self.after_history_step(applied);
        true
    }

    fn after_history_step(&mut self, applied: AppliedAction) {
        if applied.resized {
            self.emit_grid_changed();
        }
        self.emit_data_changed(applied.changes);
        self.emit_history_changed();
    }

    // ---- notifications ------------------------------------------------------

    fn emit_data_changed(&mut self, changes: Vec<ColorChangeItem>) {
        if !changes.is_empty() {
            self.events.emit(EditorEvent::DataChanged { changes });
        }
    }

    /// Grid shape changed; resizing also moves the offset.
    fn emit_grid_changed(&mut self) {
        self.events.emit(EditorEvent::GridChanged {
            dimensions: self.canvas.dimensions(),
            indices: self.canvas.indices(),
        });
        self.events.emit(EditorEvent::ViewportChanged {
            pan_zoom: self.canvas.viewport.pan_zoom,
        });
    }

    fn emit_history_changed(&mut self) {
        self.events.emit(EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }
}
