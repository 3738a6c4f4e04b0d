//! Runs in its own process: the session log can only be initialised once.

use pixelgrid::logger::{self, Level};
use pixelgrid::{Direction, Editor, PixelModifyItem};

#[test]
fn editing_session_is_logged() {
    let path = std::env::temp_dir()
        .join(format!("pixelgrid-log-{}", uuid::Uuid::new_v4()))
        .join("session.log");
    logger::init_at(&path).unwrap();
    assert_eq!(logger::log_path(), Some(path.as_path()));

    let mut editor = Editor::default();
    editor.color_pixels(&[PixelModifyItem::new(-1, 0, "red")]);
    editor.undo();

    logger::set_min_level(Level::Warn);
    editor.extend(Direction::Left);
    pixelgrid::log_warn!("after filter");

    let text = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_dir_all(path.parent().unwrap());

    assert!(text.starts_with("=== pixelgrid "));
    assert!(text.contains(&format!("Editor {} created with 6x8 grid", editor.id)));
    assert!(text.contains("[INFO] Recorded: Color 1 cell, resize top +1"));
    assert!(text.contains("[INFO] Undo: Color 1 cell, resize top +1"));
    assert!(!text.contains("Resize left +1"));
    assert!(text.contains("[WARN] after filter"));
}
