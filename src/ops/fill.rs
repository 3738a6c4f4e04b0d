// ============================================================================
// FLOOD FILL: breadth-first region recolor
// ============================================================================

use std::collections::VecDeque;

use crate::grid::{ColorChangeItem, Grid};

/// Recolor the 4-connected region of cells sharing the start cell's color.
///
/// Cells are checked when dequeued: outside the current grid indices or not
/// matching the original color means skip. Each cell is recolored at most
/// once, since a recolored cell no longer matches. Returns the changes in
/// fill order; empty when the start cell is missing or already `target`.
pub fn flood_fill(grid: &mut Grid, start_row: i32, start_col: i32, target: &str) -> Vec<ColorChangeItem> {
    let mut changes = Vec::new();
    let Some(indices) = grid.indices() else {
        return changes;
    };
    let Some(original) = grid.color(start_row, start_col).map(str::to_owned) else {
        return changes;
    };
    if original == target {
        return changes;
    }

    let mut queue: VecDeque<(i32, i32)> = VecDeque::with_capacity(64);
    queue.push_back((start_row, start_col));

    while let Some((row, col)) = queue.pop_front() {
        if !indices.contains(row, col) {
            continue;
        }
        if grid.color(row, col) != Some(original.as_str()) {
            continue;
        }
        grid.set(row, col, target);
        changes.push(ColorChangeItem::new(row, col, target, original.as_str()));

        queue.push_back((row - 1, col));
        queue.push_back((row + 1, col));
        queue.push_back((row, col - 1));
        queue.push_back((row, col + 1));
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Reference region: all cells 4-connected to `start` with its color.
    fn region(grid: &Grid, start: (i32, i32)) -> HashSet<(i32, i32)> {
        let color = grid.color(start.0, start.1).unwrap().to_string();
        let mut seen = HashSet::new();
        let mut stack = vec![start];
        while let Some((r, c)) = stack.pop() {
            if grid.color(r, c) != Some(color.as_str()) || !seen.insert((r, c)) {
                continue;
            }
            stack.extend([(r - 1, c), (r + 1, c), (r, c - 1), (r, c + 1)]);
        }
        seen
    }

    fn painted(rows: &[&str]) -> Grid {
        let mut grid = Grid::new(rows.len(), rows[0].len());
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                if ch != '.' {
                    grid.set(r as i32, c as i32, &ch.to_string());
                }
            }
        }
        grid
    }

    #[test]
    fn fills_exactly_the_connected_region() {
        let mut grid = painted(&[
            "..#...",
            "..#.#.",
            "###.#.",
            "....#.",
            "#####.",
        ]);
        let expected = region(&grid, (0, 0));
        let before = grid.clone();
        let changes = flood_fill(&mut grid, 0, 0, "red");

        let touched: HashSet<(i32, i32)> = changes.iter().map(|c| c.position()).collect();
        assert_eq!(touched, expected);
        assert_eq!(changes.len(), expected.len());
        for (r, c, cell) in grid.cells() {
            if expected.contains(&(r, c)) {
                assert_eq!(cell.color, "red");
            } else {
                assert_eq!(Some(cell.color.as_str()), before.color(r, c));
            }
        }
    }

    #[test]
    fn does_not_leak_diagonally() {
        let mut grid = painted(&[
            ".#",
            "#.",
        ]);
        let changes = flood_fill(&mut grid, 0, 0, "x");
        assert_eq!(changes, vec![ColorChangeItem::new(0, 0, "x", "")]);
        assert_eq!(grid.color(1, 1), Some(""));
    }

    #[test]
    fn same_color_is_a_noop() {
        let mut grid = painted(&["ab", "cd"]);
        let before = grid.clone();
        assert!(flood_fill(&mut grid, 0, 0, "a").is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn missing_start_is_a_noop() {
        let mut grid = Grid::new(2, 2);
        assert!(flood_fill(&mut grid, 9, 9, "a").is_empty());
    }

    #[test]
    fn respects_negative_bounds() {
        let mut grid = Grid::new(2, 2);
        grid.insert_row(-1);
        grid.insert_column(-1);
        let changes = flood_fill(&mut grid, -1, -1, "z");
        assert_eq!(changes.len(), 9);
        assert_eq!(grid.painted_count(), 9);
    }
}
