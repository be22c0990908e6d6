//! Placement of a cluster's depth window inside the full frame.
//!
//! Contours, palm centers and fingertips are reported in full-frame pixels,
//! while depth lookups happen in window pixels. `DepthWindow` keeps the two
//! in sync and implements the frame-border tests.
use super::xyz::XyzImage;
use crate::types::{PointIj, PointXyz};

#[derive(Clone, Copy, Debug)]
pub struct DepthWindow<'a> {
    pub xyz: &'a XyzImage,
    /// Full-frame pixel of the window's `(0, 0)`.
    pub top_left: PointIj,
    pub full_width: i32,
    pub full_height: i32,
}

impl<'a> DepthWindow<'a> {
    pub fn new(xyz: &'a XyzImage, top_left: PointIj, full_width: i32, full_height: i32) -> Self {
        Self {
            xyz,
            top_left,
            full_width,
            full_height,
        }
    }

    #[inline]
    pub fn to_local(&self, p: PointIj) -> PointIj {
        PointIj::new(p.x - self.top_left.x, p.y - self.top_left.y)
    }

    #[inline]
    pub fn to_full(&self, p: PointIj) -> PointIj {
        PointIj::new(p.x + self.top_left.x, p.y + self.top_left.y)
    }

    /// True when the full-frame point falls inside the window.
    #[inline]
    pub fn in_window(&self, p: PointIj) -> bool {
        self.xyz.contains(self.to_local(p))
    }

    /// Averaged xyz around a full-frame point.
    #[inline]
    pub fn average(&self, p: PointIj, size: i32) -> PointXyz {
        self.xyz.average_around_point(self.to_local(p), size)
    }

    /// Snap a full-frame point onto the nearest pixel with depth.
    #[inline]
    pub fn snap(&self, p: PointIj, max_radius: Option<i32>) -> PointIj {
        self.to_full(self.xyz.nearest_valid_point(self.to_local(p), max_radius))
    }

    /// True when a full-frame point lies in the side or bottom margin band.
    #[inline]
    pub fn on_border(&self, p: PointIj, bottom: i32, side: i32) -> bool {
        on_frame_border(p, self.full_width, self.full_height, bottom, side)
    }
}

/// Margin test against the full frame: left/right bands of width `side` and a
/// bottom band of height `bottom`.
#[inline]
pub fn on_frame_border(p: PointIj, full_width: i32, full_height: i32, bottom: i32, side: i32) -> bool {
    p.x <= side || p.x >= full_width - side || p.y >= full_height - bottom
}
