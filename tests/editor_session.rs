//! End-to-end checks of an editing session through the public `Editor` API.

use egui::{Pos2, Vec2, pos2, vec2};
use pixelgrid::{
    Action, BrushTool, ChangeAmountData, Direction, Editor, EditorConfig, EditorEvent, Grid,
    PixelModifyItem,
};

fn at(editor: &Editor, row: i32, col: i32) -> Pos2 {
    editor.canvas().cell_world_rect(row, col).unwrap().center()
}

fn approx_eq(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-3
}

/// Small deterministic generator so the sequences below are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    fn below(&mut self, n: u32) -> u32 {
        self.next() % n
    }
}

#[test]
fn extend_top_then_shorten_top() {
    let mut editor = Editor::default();
    let before_offset = editor.pan_zoom().offset;
    let top = editor.grid_indices().unwrap().top_row_index;

    assert!(editor.extend(Direction::Top));
    assert_eq!(editor.dimensions().row_count, 7);
    assert_eq!(editor.grid_indices().unwrap().top_row_index, top - 1);
    assert_eq!(editor.pan_zoom().offset.y, before_offset.y - 20.0 / 2.0);

    assert!(editor.shorten(Direction::Top));
    assert_eq!(editor.dimensions().row_count, 6);
    assert_eq!(editor.grid_indices().unwrap().top_row_index, top);
    assert_eq!(editor.pan_zoom().offset, before_offset);
}

#[test]
fn color_pixels_outside_grid_extends_upward() {
    let mut editor = Editor::default();
    let events = editor.subscribe();
    assert!(editor.color_pixels(&[PixelModifyItem::new(-1, 0, "#ff0000")]));

    let action = editor.history().last_action().unwrap();
    assert!(matches!(action, Action::ColorSizeChange { .. }));
    assert_eq!(
        action.amounts(),
        &[ChangeAmountData { direction: Direction::Top, amount: 1, start_index: 0 }]
    );
    assert_eq!(editor.grid().color(-1, 0), Some("#ff0000"));

    let got: Vec<EditorEvent> = events.try_iter().collect();
    assert!(got.iter().any(|e| matches!(
        e,
        EditorEvent::GridChanged { dimensions, .. } if dimensions.row_count == 7
    )));
    assert!(got.iter().any(|e| matches!(e, EditorEvent::DataChanged { changes } if changes.len() == 1)));
}

#[test]
fn stroke_reports_raw_and_effective_changes() {
    let mut editor = Editor::default();
    let events = editor.subscribe();

    editor.set_brush_color("red");
    editor.pointer_down(at(&editor, 2, 3));
    editor.set_brush_color("blue");
    editor.pointer_move(at(&editor, 2, 4));
    editor.pointer_move(at(&editor, 2, 3));
    editor.set_brush_color("red");
    editor.pointer_move(at(&editor, 2, 4));
    editor.pointer_move(at(&editor, 2, 3));
    editor.pointer_up();

    let stroke_end = events
        .try_iter()
        .find_map(|e| match e {
            EditorEvent::StrokeEnd { tool, stroked, effective } => Some((tool, stroked, effective)),
            _ => None,
        })
        .unwrap();
    let (tool, stroked, effective) = stroke_end;
    assert_eq!(tool, BrushTool::Dot);

    let raw_23: Vec<&str> = stroked
        .iter()
        .filter(|c| c.position() == (2, 3))
        .map(|c| c.color.as_str())
        .collect();
    assert_eq!(raw_23, vec!["red", "blue", "red"]);

    let eff_23: Vec<_> = effective.iter().filter(|c| c.position() == (2, 3)).collect();
    assert_eq!(eff_23.len(), 1);
    assert_eq!(eff_23[0].previous_color, "");
    assert_eq!(eff_23[0].color, "red");

    assert!(editor.undo());
    assert_eq!(editor.grid().painted_count(), 0);
}

#[test]
fn undo_everything_restores_the_start() {
    let mut editor = Editor::default();
    let start_grid = editor.grid().clone();
    let start_offset = editor.pan_zoom().offset;
    let mut rng = Lcg(7);
    let colors = ["#000", "#fff", "#f00", "#0f0"];

    for _ in 0..60 {
        match rng.below(5) {
            0 => {
                let direction = Direction::all()[rng.below(4) as usize];
                editor.extend(direction);
            }
            1 => {
                let direction = Direction::all()[rng.below(4) as usize];
                editor.shorten(direction);
            }
            2 => {
                let idx = editor.grid_indices().unwrap();
                let row = idx.top_row_index - 1 + rng.below(4 + (idx.bottom_row_index - idx.top_row_index) as u32) as i32;
                let col = idx.left_column_index - 1 + rng.below(4 + (idx.right_column_index - idx.left_column_index) as u32) as i32;
                editor.color_pixels(&[PixelModifyItem::new(row, col, colors[rng.below(4) as usize])]);
            }
            3 => {
                editor.set_brush_tool(BrushTool::PaintBucket);
                editor.set_brush_color(colors[rng.below(4) as usize]);
                let idx = editor.grid_indices().unwrap();
                let p = at(&editor, idx.top_row_index, idx.left_column_index);
                editor.pointer_down(p);
                editor.pointer_up();
            }
            _ => {
                editor.set_brush_tool(BrushTool::Dot);
                editor.set_brush_color(colors[rng.below(4) as usize]);
                let idx = editor.grid_indices().unwrap();
                editor.pointer_down(at(&editor, idx.top_row_index, idx.left_column_index));
                editor.pointer_move(at(&editor, idx.bottom_row_index, idx.right_column_index));
                editor.pointer_up();
            }
        }
        assert!(editor.grid().is_rectangular());
        assert!(editor.dimensions().row_count >= 2);
        assert!(editor.dimensions().column_count >= 2);
    }

    let end_grid = editor.grid().clone();
    let end_offset = editor.pan_zoom().offset;

    while editor.undo() {}
    assert_eq!(editor.grid(), &start_grid);
    assert!(approx_eq(editor.pan_zoom().offset, start_offset));

    while editor.redo() {}
    assert_eq!(editor.grid(), &end_grid);
    assert!(approx_eq(editor.pan_zoom().offset, end_offset));
}

#[test]
fn undo_redo_single_action_is_identity() {
    let mut editor = Editor::default();
    editor.color_pixels(&[
        PixelModifyItem::new(0, 0, "a"),
        PixelModifyItem::new(6, 9, "b"),
    ]);
    let after = editor.grid().clone();
    assert!(editor.undo());
    assert!(editor.redo());
    assert_eq!(editor.grid(), &after);
    assert!(!editor.redo());
}

#[test]
fn new_edit_discards_redo() {
    let mut editor = Editor::default();
    editor.color_pixels(&[PixelModifyItem::new(0, 0, "a")]);
    editor.undo();
    assert!(editor.can_redo());
    editor.color_pixels(&[PixelModifyItem::new(1, 1, "b")]);
    assert!(!editor.can_redo());
}

#[test]
fn shorten_never_goes_below_two() {
    let mut editor = Editor::default();
    for _ in 0..10 {
        editor.shorten(Direction::Bottom);
        editor.shorten(Direction::Left);
    }
    assert_eq!(editor.dimensions().row_count, 2);
    assert_eq!(editor.dimensions().column_count, 2);
    assert_eq!(editor.history().undo_count(), 4 + 6);
}

#[test]
fn initial_rows_with_negative_indices() {
    let rows: Vec<Vec<PixelModifyItem>> = (-2..1)
        .map(|r| (3..6).map(|c| PixelModifyItem::new(r, c, "")).collect())
        .collect();
    let mut editor = Editor::with_rows(EditorConfig::default(), &rows);
    let idx = editor.grid_indices().unwrap();
    assert_eq!((idx.top_row_index, idx.left_column_index), (-2, 3));

    editor.set_brush_tool(BrushTool::PaintBucket);
    editor.pointer_down(at(&editor, -1, 4));
    editor.pointer_up();
    assert_eq!(editor.grid().painted_count(), 9);
}

#[test]
fn set_grid_resets_history() {
    let mut editor = Editor::default();
    editor.color_pixels(&[PixelModifyItem::new(0, 0, "a")]);
    editor.set_grid(Grid::new(3, 3));
    assert!(!editor.can_undo());
    assert_eq!(editor.dimensions().row_count, 3);
}

#[test]
fn zoom_and_pan_stay_clamped() {
    let mut editor = Editor::default();
    editor.zoom_by_wheel(pos2(30.0, 30.0), -2_000.0);
    assert_eq!(editor.pan_zoom().scale, 1.5);
    editor.pan_by(vec2(1e6, -1e6));
    let (min, max) = editor
        .viewport()
        .offset_bounds(editor.pan_zoom().scale, editor.dimensions());
    let o = editor.pan_zoom().offset;
    assert!(o.x >= min.x && o.x <= max.x);
    assert!(o.y >= min.y && o.y <= max.y);
}

#[test]
fn snapshot_reopens_in_a_new_editor() {
    let mut editor = Editor::default();
    editor.color_pixels(&[
        PixelModifyItem::new(-2, -1, "#123"),
        PixelModifyItem::new(3, 3, "#456"),
    ]);
    let bytes = pixelgrid::io::encode_snapshot(editor.grid()).unwrap();
    let reopened = Editor::with_grid(EditorConfig::default(), pixelgrid::io::decode_snapshot(&bytes).unwrap());
    assert_eq!(reopened.data_array(), editor.data_array());
    assert_eq!(reopened.grid_indices(), editor.grid_indices());
    assert!(!reopened.can_undo());
}
