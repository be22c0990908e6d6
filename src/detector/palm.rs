//! Palm center as the largest inscribed circle near the top of the cluster.

use super::params::HandParams;
use crate::contour::Contour;
use crate::image::DepthWindow;
use crate::types::{PalmCircle, PointIj, Rect};
use log::trace;

/// Locate the palm circle.
///
/// Candidates are sampled every `palm_search_stride` pixels over `bounds`;
/// a sample qualifies when it has depth and lies within
/// `center_max_dist_from_top` of the averaged `top` point. The qualifying
/// sample deepest inside the contour wins. Without one, the contour centroid
/// snapped onto the cluster is used with a zero radius.
pub fn locate_palm(
    contour: &Contour,
    top: PointIj,
    bounds: &Rect,
    window: &DepthWindow<'_>,
    params: &HandParams,
) -> Option<PalmCircle> {
    let centroid = contour.centroid()?;
    let centroid = window.snap(centroid, None);
    let top_xyz = window.average(top, params.xyz_average_size);
    let stride = params.palm_search_stride.max(1) as usize;

    let mut best: Option<(f64, PointIj)> = None;
    for y in (bounds.y..bounds.y + bounds.height).step_by(stride) {
        for x in (bounds.x..bounds.x + bounds.width).step_by(stride) {
            let p = PointIj::new(x, y);
            let Some(xyz) = window.xyz.at(window.to_local(p)) else {
                continue;
            };
            if xyz.z == 0.0 || (xyz - top_xyz).norm() as f64 > params.center_max_dist_from_top {
                continue;
            }
            let d = contour.signed_distance([x as f64, y as f64]);
            if d > 0.0 && best.map_or(true, |(bd, _)| d > bd) {
                best = Some((d, p));
            }
        }
    }

    let (radius, center_ij) = match best {
        Some((d, p)) => (d, p),
        None => {
            trace!("locate_palm: no inscribed candidate, using centroid {centroid:?}");
            (0.0, centroid)
        }
    };
    Some(PalmCircle {
        center_ij,
        center_xyz: window.average(center_ij, params.xyz_average_size),
        radius,
    })
}
