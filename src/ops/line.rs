use crate::grid::GridIndices;

/// Grid cells on the segment between two (row, column) indices, inclusive of
/// both ends, in order from `from` to `to`. Used to fill the gaps between
/// pointer samples during a fast stroke.
pub fn bresenham(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
    let (mut r, mut c) = (from.0 as i64, from.1 as i64);
    let (r1, c1) = (to.0 as i64, to.1 as i64);
    let dr = (r1 - r).abs();
    let dc = (c1 - c).abs();
    let sr = if r < r1 { 1 } else { -1 };
    let sc = if c < c1 { 1 } else { -1 };
    let mut err = dc - dr;

    let mut points = Vec::new();
    loop {
        points.push((r as i32, c as i32));
        if r == r1 && c == c1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dr {
            err -= dr;
            c += sc;
        }
        if e2 < dc {
            err += dc;
            r += sr;
        }
    }
    points
}

/// Clip the segment `from`→`to` to the rectangle spanned by `bounds`
/// (Liang-Barsky on cell centers). Returns the clipped endpoints rounded to
/// cells, or `None` when the segment misses the grid entirely. Keeps stroke
/// interpolation proportional to the grid size, not to how far the pointer
/// jumped.
pub fn clip_to_bounds(
    from: (i32, i32),
    to: (i32, i32),
    bounds: &GridIndices,
) -> Option<((i32, i32), (i32, i32))> {
    let (r0, c0) = (from.0 as f64, from.1 as f64);
    let dr = to.0 as f64 - r0;
    let dc = to.1 as f64 - c0;
    let edges = [
        (-dc, c0 - bounds.left_column_index as f64),
        (dc, bounds.right_column_index as f64 - c0),
        (-dr, r0 - bounds.top_row_index as f64),
        (dr, bounds.bottom_row_index as f64 - r0),
    ];

    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }

    let at = |t: f64| {
        let row = (r0 + dr * t).round() as i32;
        let col = (c0 + dc * t).round() as i32;
        (
            row.clamp(bounds.top_row_index, bounds.bottom_row_index),
            col.clamp(bounds.left_column_index, bounds.right_column_index),
        )
    };
    Some((at(t0), at(t1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> GridIndices {
        GridIndices {
            top_row_index: 0,
            bottom_row_index: 5,
            left_column_index: 0,
            right_column_index: 7,
        }
    }

    #[test]
    fn inside_segment_is_unchanged() {
        assert_eq!(clip_to_bounds((1, 1), (4, 6), &bounds()), Some(((1, 1), (4, 6))));
    }

    #[test]
    fn far_endpoint_is_pulled_to_the_edge() {
        assert_eq!(clip_to_bounds((0, 0), (0, i32::MAX), &bounds()), Some(((0, 0), (0, 7))));
        assert_eq!(clip_to_bounds((3, i32::MIN), (3, 2), &bounds()), Some(((3, 0), (3, 2))));
    }

    #[test]
    fn segment_missing_the_grid_is_dropped() {
        assert_eq!(clip_to_bounds((-5, 0), (-5, 100), &bounds()), None);
        assert_eq!(clip_to_bounds((-10, 20), (20, 100), &bounds()), None);
    }

    #[test]
    fn single_point() {
        assert_eq!(bresenham((3, -2), (3, -2)), vec![(3, -2)]);
    }

    #[test]
    fn horizontal_and_reverse() {
        assert_eq!(bresenham((0, 0), (0, 3)), vec![(0, 0), (0, 1), (0, 2), (0, 3)]);
        assert_eq!(bresenham((0, 3), (0, 0)), vec![(0, 3), (0, 2), (0, 1), (0, 0)]);
    }

    #[test]
    fn diagonal_steps_both_axes() {
        assert_eq!(bresenham((0, 0), (-2, -2)), vec![(0, 0), (-1, -1), (-2, -2)]);
    }

    #[test]
    fn steep_line_is_contiguous() {
        let points = bresenham((0, 0), (7, 2));
        assert_eq!(points.first(), Some(&(0, 0)));
        assert_eq!(points.last(), Some(&(7, 2)));
        assert_eq!(points.len(), 8);
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!((a.0 - b.0).abs() <= 1 && (a.1 - b.1).abs() <= 1);
        }
    }
}
