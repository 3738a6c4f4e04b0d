use egui::{Pos2, Vec2, pos2, vec2};

use crate::grid::{Direction, GridDimensions};

pub const DEFAULT_MIN_SCALE: f32 = 0.3;
pub const DEFAULT_MAX_SCALE: f32 = 1.5;

// ============================================================================
// COORDINATE SPACES
// ============================================================================
//
//   world (grid-centered) --scale, offset--> screen (canvas-centered, logical px)
//   screen --+ half canvas, × dpr--> device pixels (upper-left origin)

/// Zoom factor and screen-space translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanZoom {
    pub scale: f32,
    pub offset: Vec2,
}

impl Default for PanZoom {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

/// Partial update for [`Viewport::with_pan_zoom`]. Missing fields keep their value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanZoomRequest {
    pub scale: Option<f32>,
    pub offset: Option<Vec2>,
}

impl PanZoomRequest {
    pub fn scale(scale: f32) -> Self {
        Self {
            scale: Some(scale),
            offset: None,
        }
    }

    pub fn offset(offset: Vec2) -> Self {
        Self {
            scale: None,
            offset: Some(offset),
        }
    }
}

pub fn world_to_screen(world: Pos2, pan_zoom: PanZoom) -> Pos2 {
    pos2(
        world.x * pan_zoom.scale + pan_zoom.offset.x,
        world.y * pan_zoom.scale + pan_zoom.offset.y,
    )
}

pub fn screen_to_world(screen: Pos2, pan_zoom: PanZoom) -> Pos2 {
    pos2(
        (screen.x - pan_zoom.offset.x) / pan_zoom.scale,
        (screen.y - pan_zoom.offset.y) / pan_zoom.scale,
    )
}

/// Canvas-centered cartesian point → upper-left-origin device pixel.
pub fn cartesian_to_device_pixel(point: Pos2, canvas_size: Vec2, dpr: f32) -> Pos2 {
    pos2(
        (point.x + canvas_size.x / 2.0) * dpr,
        (point.y + canvas_size.y / 2.0) * dpr,
    )
}

/// Inverse of [`cartesian_to_device_pixel`].
pub fn device_pixel_to_cartesian(pixel: Pos2, canvas_size: Vec2, dpr: f32) -> Pos2 {
    pos2(
        pixel.x / dpr - canvas_size.x / 2.0,
        pixel.y / dpr - canvas_size.y / 2.0,
    )
}

/// Allowed offset range on one axis.
///
/// When the grid is wider than the canvas the offset may travel until a grid
/// edge meets the opposite canvas edge; otherwise the whole grid has to stay
/// inside the canvas. The two cases are the same formula with min/max swapped.
///
/// In the grid-larger branch the max offset is `half_span - half_canvas`
/// (half the scaled grid span minus half the canvas) and the min is its
/// negation; in the grid-smaller branch that same expression becomes the min.
fn axis_bounds(count: usize, square_length: f32, scale: f32, canvas_extent: f32) -> (f32, f32) {
    let grid_span = count as f32 * square_length * scale;
    let half_span = grid_span / 2.0;
    let half_canvas = canvas_extent / 2.0;
    if grid_span > canvas_extent {
        (half_canvas - half_span, half_span - half_canvas)
    } else {
        (half_span - half_canvas, half_canvas - half_span)
    }
}

fn clamp_axis(value: f32, (min, max): (f32, f32)) -> f32 {
    if value.is_nan() {
        return 0.0_f32.max(min).min(max);
    }
    value.max(min).min(max)
}

// ============================================================================
// VIEWPORT
// ============================================================================

/// Pan/zoom state plus the host-provided facts the clamp math needs.
///
/// All transforming methods return an updated copy; the editor keeps the
/// current value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Logical (CSS-pixel) canvas size.
    pub canvas_size: Vec2,
    pub device_pixel_ratio: f32,
    /// World-space edge length of one grid square.
    pub square_length: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub pan_zoom: PanZoom,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            canvas_size: vec2(800.0, 600.0),
            device_pixel_ratio: 1.0,
            square_length: 20.0,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            pan_zoom: PanZoom::default(),
        }
    }
}

impl Viewport {
    pub fn clamp_scale(&self, scale: f32) -> f32 {
        if scale.is_nan() {
            return self.pan_zoom.scale;
        }
        scale.max(self.min_scale).min(self.max_scale)
    }

    /// `(min, max)` offsets allowed at `scale` for a grid of `dims`.
    pub fn offset_bounds(&self, scale: f32, dims: GridDimensions) -> (Vec2, Vec2) {
        let (min_x, max_x) = axis_bounds(dims.column_count, self.square_length, scale, self.canvas_size.x);
        let (min_y, max_y) = axis_bounds(dims.row_count, self.square_length, scale, self.canvas_size.y);
        (vec2(min_x, min_y), vec2(max_x, max_y))
    }

    pub fn clamp_offset(&self, offset: Vec2, scale: f32, dims: GridDimensions) -> Vec2 {
        let s = self.square_length;
        vec2(
            clamp_axis(offset.x, axis_bounds(dims.column_count, s, scale, self.canvas_size.x)),
            clamp_axis(offset.y, axis_bounds(dims.row_count, s, scale, self.canvas_size.y)),
        )
    }

    /// Apply a pan/zoom update. A given scale replaces the current one as-is
    /// (callers clamp it); a given offset is clamped against the resulting scale.
    pub fn with_pan_zoom(self, request: PanZoomRequest, dims: GridDimensions) -> Self {
        let mut pan_zoom = self.pan_zoom;
        if let Some(scale) = request.scale {
            pan_zoom.scale = scale;
        }
        if let Some(offset) = request.offset {
            pan_zoom.offset = self.clamp_offset(offset, pan_zoom.scale, dims);
        }
        Self { pan_zoom, ..self }
    }

    /// Zoom to `new_scale` while keeping the screen point `anchor` fixed.
    pub fn zoom_about(self, anchor: Pos2, new_scale: f32, dims: GridDimensions) -> Self {
        let new_scale = self.clamp_scale(new_scale);
        let current = self.pan_zoom;
        let world = screen_to_world(anchor, current);
        let hypothetical = world_to_screen(
            world,
            PanZoom {
                scale: new_scale,
                offset: current.offset,
            },
        );
        let offset = current.offset + (anchor - hypothetical);
        self.with_pan_zoom(
            PanZoomRequest {
                scale: Some(new_scale),
                offset: Some(offset),
            },
            dims,
        )
    }

    /// Mouse-wheel zoom around the pointer. Positive `delta_y` zooms out.
    pub fn zoom_by_wheel(self, anchor: Pos2, delta_y: f32, sensitivity: f32, dims: GridDimensions) -> Self {
        let factor = (-delta_y * sensitivity).exp();
        self.zoom_about(anchor, self.pan_zoom.scale * factor, dims)
    }

    /// Two-finger pinch: zoom by the change in finger distance around the
    /// midpoint of the touches, then follow the midpoint's movement.
    pub fn pinch_zoom(self, previous: [Pos2; 2], current: [Pos2; 2], dims: GridDimensions) -> Self {
        let previous_distance = previous[0].distance(previous[1]);
        let current_distance = current[0].distance(current[1]);
        if previous_distance <= f32::EPSILON {
            return self;
        }
        let previous_center = midpoint(previous[0], previous[1]);
        let current_center = midpoint(current[0], current[1]);

        let zoomed = self.zoom_about(
            current_center,
            self.pan_zoom.scale * current_distance / previous_distance,
            dims,
        );
        zoomed.pan_by(current_center - previous_center, dims)
    }

    pub fn pan_by(self, delta: Vec2, dims: GridDimensions) -> Self {
        self.with_pan_zoom(PanZoomRequest::offset(self.pan_zoom.offset + delta), dims)
    }

    /// Compensate the offset after `count` rows/columns were added (negative:
    /// removed) on `direction`, so existing content keeps its screen position.
    /// Not clamped: an extend followed by a shorten must cancel exactly.
    pub fn shift_for_resize(self, direction: Direction, count: i32) -> Self {
        let half = self.square_length * self.pan_zoom.scale / 2.0 * count as f32;
        let mut pan_zoom = self.pan_zoom;
        match direction {
            Direction::Top => pan_zoom.offset.y -= half,
            Direction::Bottom => pan_zoom.offset.y += half,
            Direction::Left => pan_zoom.offset.x -= half,
            Direction::Right => pan_zoom.offset.x += half,
        }
        Self { pan_zoom, ..self }
    }

    pub fn world_to_screen(&self, world: Pos2) -> Pos2 {
        world_to_screen(world, self.pan_zoom)
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Pos2 {
        screen_to_world(screen, self.pan_zoom)
    }

    pub fn to_device_pixel(&self, screen: Pos2) -> Pos2 {
        cartesian_to_device_pixel(screen, self.canvas_size, self.device_pixel_ratio)
    }

    pub fn from_device_pixel(&self, pixel: Pos2) -> Pos2 {
        device_pixel_to_cartesian(pixel, self.canvas_size, self.device_pixel_ratio)
    }
}

fn midpoint(a: Pos2, b: Pos2) -> Pos2 {
    pos2((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}
