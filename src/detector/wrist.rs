//! Wrist localisation by walking the contour from the frame contacts.
//!
//! 1. Pick the contour points where the arm meets the frame (or the lowest
//!    contour point for a floating cluster).
//! 2. Choose the walk direction so that both walks head up the arm.
//! 3. Walk from each contact until the averaged xyz comes within
//!    `wrist_center_dist_thresh` of the palm center.

use super::params::HandParams;
use crate::contour::Contour;
use crate::image::DepthWindow;
use crate::types::{EdgeContact, PointXyz, Rejection, WristPair};
use log::trace;

/// Left/right contact indices on the contour.
///
/// With frame contact, candidates are the contour points below
/// `hand_edge_connect_max_y` inside the contact margins. Side-margin points
/// prefer the lowest entry; elsewhere the leftmost and rightmost points win.
/// Without frame contact the lowest contour point is both contacts.
pub fn select_contacts(
    contour: &Contour,
    edges: EdgeContact,
    window: &DepthWindow<'_>,
    params: &HandParams,
) -> Option<(usize, usize)> {
    let l_margin = params.contact_side_edge_thresh;
    let r_margin = window.full_width - params.contact_side_edge_thresh;
    let min_row = window.full_height as f64 * params.hand_edge_connect_max_y;
    let pts = contour.points();

    let mut contacts: Option<(usize, usize)> = None;
    for (i, pt) in pts.iter().enumerate() {
        if !edges.any() {
            if contacts.map_or(true, |(l, _)| pt.y > pts[l].y) {
                contacts = Some((i, i));
            }
            continue;
        }

        if (pt.y as f64) <= min_row
            || !window.on_border(*pt, params.contact_bot_edge_thresh, params.contact_side_edge_thresh)
        {
            continue;
        }
        let Some((mut l, mut r)) = contacts else {
            contacts = Some((i, i));
            continue;
        };
        let (ccl, ccr) = (pts[l], pts[r]);
        if pt.x <= l_margin {
            if ccl.x > l_margin || ccl.y > pt.y {
                l = i;
            }
            if ccr.x <= l_margin && ccr.y < pt.y {
                r = i;
            }
        } else if pt.x >= r_margin {
            if ccr.x < r_margin || ccr.y > pt.y {
                r = i;
            }
            if ccl.x >= r_margin && ccl.y < pt.y {
                l = i;
            }
        } else {
            if ccl.x > pt.x {
                l = i;
            }
            if ccr.x < pt.x {
                r = i;
            }
        }
        contacts = Some((l, r));
    }
    contacts
}

/// Step applied to the left walk: `-1` when the right contact is reached
/// from the left one by going forward less than half the contour.
pub fn infer_direction(left: usize, right: usize, n: usize) -> i32 {
    let half = n / 2;
    if (right > left && right - left < half) || (right <= left && left - right >= half) {
        -1
    } else {
        1
    }
}

/// Walk at most one full loop from `start`, returning the first index whose
/// averaged xyz lies within `thresh` of `center`.
pub fn walk_to_palm(
    contour: &Contour,
    start: usize,
    step: i64,
    center: &PointXyz,
    thresh: f64,
    window: &DepthWindow<'_>,
    average_size: i32,
) -> Option<usize> {
    let mut i = start;
    for _ in 0..contour.len() {
        let xyz = window.average(contour.get(i), average_size);
        if ((xyz - center).norm() as f64) <= thresh {
            return Some(i);
        }
        i = contour.step(i, step);
    }
    None
}

/// Find the wrist endpoints; fails with [`Rejection::WristNotFound`].
pub fn locate_wrist(
    contour: &Contour,
    palm_xyz: &PointXyz,
    edges: EdgeContact,
    window: &DepthWindow<'_>,
    params: &HandParams,
) -> Result<WristPair, Rejection> {
    let (contact_l, contact_r) =
        select_contacts(contour, edges, window, params).ok_or(Rejection::WristNotFound)?;
    let direction = infer_direction(contact_l, contact_r, contour.len());
    trace!("locate_wrist: contacts {contact_l}/{contact_r}, direction {direction}");

    let walk = |start: usize, step: i64| {
        walk_to_palm(
            contour,
            start,
            step,
            palm_xyz,
            params.wrist_center_dist_thresh,
            window,
            params.xyz_average_size,
        )
    };
    let left_index = walk(contact_l, direction as i64).ok_or(Rejection::WristNotFound)?;
    let right_index = walk(contact_r, -(direction as i64)).ok_or(Rejection::WristNotFound)?;

    let left_ij = contour.get(left_index);
    let right_ij = contour.get(right_index);
    Ok(WristPair {
        left_ij,
        right_ij,
        left_xyz: window.average(left_ij, params.xyz_average_size),
        right_xyz: window.average(right_ij, params.xyz_average_size),
        left_index,
        right_index,
        direction,
    })
}

/// Width gate; fails with [`Rejection::WristWidth`].
pub fn check_wrist_width(wrist: &WristPair, params: &HandParams) -> Result<(), Rejection> {
    let width = wrist.width();
    if width < params.wrist_width_min || width > params.wrist_width_max {
        return Err(Rejection::WristWidth);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::XyzImage;
    use crate::types::PointIj;

    #[test]
    fn direction_follows_shorter_forward_arc() {
        assert_eq!(infer_direction(10, 20, 100), -1);
        assert_eq!(infer_direction(10, 80, 100), 1);
        assert_eq!(infer_direction(80, 10, 100), -1);
        assert_eq!(infer_direction(30, 10, 100), 1);
    }

    #[test]
    fn floating_cluster_uses_lowest_point() {
        let img = XyzImage::new(4, 4);
        let win = DepthWindow::new(&img, PointIj::new(0, 0), 320, 240);
        let contour = Contour::new(vec![
            PointIj::new(50, 10),
            PointIj::new(60, 40),
            PointIj::new(40, 40),
        ]);
        let contacts = select_contacts(&contour, EdgeContact::default(), &win, &HandParams::default());
        assert_eq!(contacts, Some((1, 1)));
    }

    #[test]
    fn bottom_contacts_take_leftmost_and_rightmost() {
        let img = XyzImage::new(4, 4);
        let win = DepthWindow::new(&img, PointIj::new(0, 0), 320, 240);
        let contour = Contour::new(vec![
            PointIj::new(150, 100),
            PointIj::new(170, 236),
            PointIj::new(160, 236),
            PointIj::new(140, 236),
            PointIj::new(130, 150),
        ]);
        let edges = EdgeContact { left: true, right: false };
        let contacts = select_contacts(&contour, edges, &win, &HandParams::default());
        assert_eq!(contacts, Some((3, 1)));
    }

    #[test]
    fn width_gate() {
        let mut wrist = WristPair {
            left_ij: PointIj::new(0, 0),
            right_ij: PointIj::new(0, 0),
            left_xyz: PointXyz::new(0.0, 0.0, 0.5),
            right_xyz: PointXyz::new(0.05, 0.0, 0.5),
            left_index: 0,
            right_index: 1,
            direction: 1,
        };
        assert!(check_wrist_width(&wrist, &HandParams::default()).is_ok());
        wrist.right_xyz.x = 0.2;
        assert_eq!(check_wrist_width(&wrist, &HandParams::default()), Err(Rejection::WristWidth));
    }
}
