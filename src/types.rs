use crate::contour::Contour;
use nalgebra::{Point2, Vector3};
use serde::{Deserialize, Serialize};

/// Pixel coordinate (column, row) in the full depth frame.
pub type PointIj = Point2<i32>;
/// Metric 3D sample; a zero `z` marks an invalid sample.
pub type PointXyz = Vector3<f32>;

/// Axis-aligned pixel rectangle (inclusive of `x`/`y`, `width`/`height` in pixels).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Smallest rectangle covering every point, `None` for an empty slice.
    pub fn from_points(points: &[PointIj]) -> Option<Self> {
        let first = points.first()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Some(Self {
            x: x0,
            y: y0,
            width: x1 - x0 + 1,
            height: y1 - y0 + 1,
        })
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    #[inline]
    pub fn contains(&self, p: &PointIj) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// Convexity defect as produced by the external contour primitive.
///
/// `start`/`end` are the hull points bounding the dip and `far` is the contour
/// point farthest from the hull edge; all three index into the contour.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvexityDefect {
    pub start: usize,
    pub end: usize,
    pub far: usize,
    pub depth: f32,
}

/// Contour, convex hull and defects of one cluster, plus its bounding box.
#[derive(Clone, Debug)]
pub struct ContourGeometry {
    pub contour: Contour,
    /// Hull vertices as contour indices, in contour order.
    pub hull: Vec<usize>,
    pub defects: Vec<ConvexityDefect>,
    pub bounds: Rect,
}

impl ContourGeometry {
    /// Bundle precomputed geometry; the bounding box is derived from the contour.
    pub fn new(contour: Vec<PointIj>, hull: Vec<usize>, defects: Vec<ConvexityDefect>) -> Self {
        let bounds = Rect::from_points(&contour).unwrap_or_default();
        Self {
            contour: Contour::new(contour),
            hull,
            defects,
            bounds,
        }
    }

    /// Replace the derived bounding box with one supplied by the caller.
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Hull vertices as points, skipping indices outside the contour.
    pub fn hull_points(&self) -> Vec<PointIj> {
        self.hull
            .iter()
            .filter_map(|&i| self.contour.points().get(i).copied())
            .collect()
    }
}

/// Candidate cluster: ordered pixel coordinates with parallel metric samples.
#[derive(Clone, Debug, Default)]
pub struct Cluster {
    points_ij: Vec<PointIj>,
    points_xyz: Vec<PointXyz>,
}

impl Cluster {
    /// Returns `None` unless both lists have the same length.
    pub fn new(points_ij: Vec<PointIj>, points_xyz: Vec<PointXyz>) -> Option<Self> {
        if points_ij.len() != points_xyz.len() {
            return None;
        }
        Some(Self {
            points_ij,
            points_xyz,
        })
    }

    pub fn len(&self) -> usize {
        self.points_ij.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_ij.is_empty()
    }

    pub fn points_ij(&self) -> &[PointIj] {
        &self.points_ij
    }

    pub fn points_xyz(&self) -> &[PointXyz] {
        &self.points_xyz
    }

    /// Topmost point (smallest row, then smallest column).
    pub fn top_point(&self) -> Option<PointIj> {
        self.points_ij.iter().copied().min_by_key(|p| (p.y, p.x))
    }
}

/// Which sides of the frame the cluster is connected to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EdgeContact {
    pub left: bool,
    pub right: bool,
}

impl EdgeContact {
    #[inline]
    pub fn any(&self) -> bool {
        self.left || self.right
    }
}

/// Largest inscribed circle near the top of the cluster.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PalmCircle {
    pub center_ij: PointIj,
    pub center_xyz: PointXyz,
    /// Radius in contour pixels.
    pub radius: f64,
}

/// Wrist endpoints found by walking the contour from the frame contacts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WristPair {
    pub left_ij: PointIj,
    pub right_ij: PointIj,
    pub left_xyz: PointXyz,
    pub right_xyz: PointXyz,
    pub left_index: usize,
    pub right_index: usize,
    /// Step applied to the left walk (`+1` or `-1`); the right walk uses the opposite.
    pub direction: i32,
}

impl WristPair {
    pub fn width(&self) -> f64 {
        (self.left_xyz - self.right_xyz).norm() as f64
    }

    pub fn midpoint(&self) -> PointXyz {
        self.left_xyz + (self.right_xyz - self.left_xyz) / 2.0
    }
}

/// Accepted fingertip with the defect that delimits it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Finger {
    pub tip_ij: PointIj,
    pub tip_xyz: PointXyz,
    pub defect_ij: PointIj,
    pub defect_xyz: PointXyz,
    pub tip_index: usize,
    /// `None` when the palm center stands in for a missing defect.
    pub defect_index: Option<usize>,
}

impl Finger {
    pub fn length(&self) -> f64 {
        (self.tip_xyz - self.defect_xyz).norm() as f64
    }
}

/// Why a cluster was not accepted as a hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Rejection {
    EmptyCluster,
    SurfaceArea,
    NotEdgeConnected,
    DegenerateContour,
    WristNotFound,
    WristWidth,
    NoFingers,
    TooManyFingers,
    LowConfidence,
    Classifier,
}

/// Outcome of evaluating one cluster.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HandResult {
    pub is_hand: bool,
    pub palm: Option<PalmCircle>,
    pub wrist: Option<WristPair>,
    pub fingers: Vec<Finger>,
    /// Defects that passed the distance tests, in angular order.
    pub good_defects: Vec<ConvexityDefect>,
    pub edges: EdgeContact,
    /// Cluster surface area in square metres.
    pub surface_area: f64,
    pub confidence: Option<f64>,
    pub rejection: Option<Rejection>,
    pub contour: Vec<PointIj>,
    pub hull: Vec<PointIj>,
    pub bounds: Rect,
}

impl HandResult {
    pub fn is_valid_hand(&self) -> bool {
        self.is_hand
    }

    pub fn num_fingers(&self) -> usize {
        self.fingers.len()
    }

    pub fn palm_center(&self) -> Option<PointXyz> {
        self.palm.map(|p| p.center_xyz)
    }

    pub fn palm_center_ij(&self) -> Option<PointIj> {
        self.palm.map(|p| p.center_ij)
    }

    pub fn circle_radius(&self) -> f64 {
        self.palm.map_or(0.0, |p| p.radius)
    }

    pub fn fingers_xyz(&self) -> Vec<PointXyz> {
        self.fingers.iter().map(|f| f.tip_xyz).collect()
    }

    pub fn fingers_ij(&self) -> Vec<PointIj> {
        self.fingers.iter().map(|f| f.tip_ij).collect()
    }

    pub fn defects_xyz(&self) -> Vec<PointXyz> {
        self.fingers.iter().map(|f| f.defect_xyz).collect()
    }

    pub fn defects_ij(&self) -> Vec<PointIj> {
        self.fingers.iter().map(|f| f.defect_ij).collect()
    }

    /// Wrist endpoints (left, right) in metric space.
    pub fn wrist_xyz(&self) -> Option<[PointXyz; 2]> {
        self.wrist.map(|w| [w.left_xyz, w.right_xyz])
    }

    pub fn wrist_ij(&self) -> Option<[PointIj; 2]> {
        self.wrist.map(|w| [w.left_ij, w.right_ij])
    }

    pub fn touching_edge(&self) -> bool {
        self.edges.any()
    }

    pub fn touching_left_edge(&self) -> bool {
        self.edges.left
    }

    pub fn touching_right_edge(&self) -> bool {
        self.edges.right
    }
}
