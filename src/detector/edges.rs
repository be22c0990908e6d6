//! Frame-edge connectivity of a cluster.
//!
//! A hand entering from the bottom or the sides of the frame leaves depth
//! along the bottom margin row or the side margin columns. The left half of
//! the frame drives the left flag, the right half the right flag.

use super::params::HandParams;
use crate::image::{DepthWindow, ImageView};
use crate::types::EdgeContact;

/// Sweep the margin row, then the margin column, for each frame side.
pub fn detect_edge_contact(window: &DepthWindow<'_>, params: &HandParams) -> EdgeContact {
    let xyz = window.xyz;
    let (w, h) = (xyz.width() as i32, xyz.height() as i32);
    let tl = window.top_left;
    let (full_w, full_h) = (window.full_width, window.full_height);
    let valid = |x: i32, y: i32| xyz.get(x, y).is_some_and(|v| v.z != 0.0);

    let bottom_row = full_h - params.bottom_edge_thresh - tl.y;
    let row_in_window = (0..h).contains(&bottom_row);
    // side sweeps run from the lowest window row up to the connect limit
    let sweep_top = (full_h as f64 * params.hand_edge_connect_max_y - tl.y as f64).max(0.0);
    let sweep_bottom = (full_h - 1 - tl.y).min(h - 1);
    let column_hit = |col: i32| {
        (0..w).contains(&col)
            && (0..=sweep_bottom)
                .rev()
                .take_while(|&row| row as f64 >= sweep_top)
                .any(|row| valid(col, row))
    };

    let half = full_w / 2 - tl.x;
    let mut left = row_in_window && (0..half.min(w)).any(|col| valid(col, bottom_row));
    if !left {
        left = column_hit(params.side_edge_thresh - tl.x);
    }

    let mut right = row_in_window && (half.max(0)..(full_w - tl.x).min(w)).any(|col| valid(col, bottom_row));
    if !right {
        right = column_hit(full_w - params.side_edge_thresh - tl.x);
    }

    EdgeContact { left, right }
}
