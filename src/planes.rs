//! Fingertip contact with detected planes.
//!
//! Plane detection lives outside this crate; anything implementing
//! [`PlaneContact`] can be queried. [`PlaneEquation`] covers the common case
//! of an infinite plane with an optional image-space extent.

use crate::types::{HandResult, PointIj, PointXyz, Rect};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub trait PlaneContact {
    /// True when `xyz` lies within `threshold` of the plane. In `strict` mode
    /// the pixel `ij` must also fall inside the plane's observed extent.
    fn touching(&self, xyz: &PointXyz, ij: PointIj, threshold: f64, strict: bool) -> bool;
}

impl<T: PlaneContact + ?Sized> PlaneContact for Arc<T> {
    fn touching(&self, xyz: &PointXyz, ij: PointIj, threshold: f64, strict: bool) -> bool {
        (**self).touching(xyz, ij, threshold, strict)
    }
}

impl<T: PlaneContact + ?Sized> PlaneContact for &T {
    fn touching(&self, xyz: &PointXyz, ij: PointIj, threshold: f64, strict: bool) -> bool {
        (**self).touching(xyz, ij, threshold, strict)
    }
}

/// Plane `normal · p + offset = 0`, optionally bounded to an image region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneEquation {
    pub normal: Vector3<f64>,
    pub offset: f64,
    /// Pixels where the plane was observed; `None` means unbounded.
    pub region: Option<Rect>,
}

impl PlaneEquation {
    pub fn new(normal: Vector3<f64>, offset: f64) -> Self {
        Self {
            normal,
            offset,
            region: None,
        }
    }

    pub fn with_region(mut self, region: Rect) -> Self {
        self.region = Some(region);
        self
    }

    /// Unsigned point-to-plane distance; infinite for a zero normal.
    pub fn distance(&self, p: &PointXyz) -> f64 {
        let norm = self.normal.norm();
        if norm == 0.0 {
            return f64::INFINITY;
        }
        (self.normal.dot(&p.cast::<f64>()) + self.offset).abs() / norm
    }
}

impl PlaneContact for PlaneEquation {
    fn touching(&self, xyz: &PointXyz, ij: PointIj, threshold: f64, strict: bool) -> bool {
        if strict && !self.region.map_or(true, |r| r.contains(&ij)) {
            return false;
        }
        self.distance(xyz) <= threshold
    }
}

impl HandResult {
    /// Indices of fingers touching `plane`. With `extrapolate`, fingertips
    /// outside the plane's observed extent still count.
    pub fn touching_plane<P: PlaneContact + ?Sized>(
        &self,
        plane: &P,
        threshold: f64,
        extrapolate: bool,
    ) -> Vec<usize> {
        self.fingers
            .iter()
            .enumerate()
            .filter(|(_, f)| plane.touching(&f.tip_xyz, f.tip_ij, threshold, !extrapolate))
            .map(|(i, _)| i)
            .collect()
    }

    /// For each finger touching at least one plane, the finger index and the
    /// indices of the planes it touches.
    pub fn touching_planes<P: PlaneContact>(
        &self,
        planes: &[P],
        threshold: f64,
        extrapolate: bool,
    ) -> Vec<(usize, Vec<usize>)> {
        self.fingers
            .iter()
            .enumerate()
            .filter_map(|(i, f)| {
                let hits: Vec<usize> = planes
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.touching(&f.tip_xyz, f.tip_ij, threshold, !extrapolate))
                    .map(|(j, _)| j)
                    .collect();
                (!hits.is_empty()).then_some((i, hits))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Finger;

    fn finger_at(x: i32, z: f32) -> Finger {
        Finger {
            tip_ij: PointIj::new(x, 50),
            tip_xyz: PointXyz::new(0.0, 0.0, z),
            defect_ij: PointIj::new(x, 80),
            defect_xyz: PointXyz::new(0.0, 0.03, z),
            tip_index: 0,
            defect_index: None,
        }
    }

    fn table() -> PlaneEquation {
        // z = 0.5
        PlaneEquation::new(Vector3::new(0.0, 0.0, 1.0), -0.5).with_region(Rect {
            x: 0,
            y: 0,
            width: 100,
            height: 100,
        })
    }

    #[test]
    fn fingers_within_threshold_touch() {
        let hand = HandResult {
            fingers: vec![finger_at(10, 0.505), finger_at(20, 0.45), finger_at(150, 0.5)],
            ..HandResult::default()
        };
        assert_eq!(hand.touching_plane(&table(), 0.01, false), vec![0]);
        assert_eq!(hand.touching_plane(&table(), 0.01, true), vec![0, 2]);
    }

    #[test]
    fn touching_planes_groups_by_finger() {
        let hand = HandResult {
            fingers: vec![finger_at(10, 0.5), finger_at(20, 0.3)],
            ..HandResult::default()
        };
        let wall = PlaneEquation::new(Vector3::new(0.0, 0.0, 1.0), -0.3);
        let planes = [table(), wall];
        assert_eq!(hand.touching_planes(&planes, 0.01, false), vec![(0, vec![0]), (1, vec![1])]);
    }
}
