//! Owned XYZ depth window in row-major layout (stride == width).
//!
//! Each pixel stores the metric position of the sample seen at that pixel.
//! A sample with `z == 0` is invalid (no depth). The window is cropped
//! around one cluster, so every valid sample belongs to that cluster.
use crate::image::traits::ImageView;
use crate::types::{Cluster, PointIj, PointXyz};

#[derive(Clone, Debug)]
pub struct XyzImage {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Backing storage in row-major order
    pub data: Vec<PointXyz>,
}

impl XyzImage {
    /// Construct an all-invalid window of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![PointXyz::zeros(); w * h],
        }
    }

    /// Wrap existing samples; `None` unless `data.len() == w * h`.
    pub fn from_samples(w: usize, h: usize, data: Vec<PointXyz>) -> Option<Self> {
        (data.len() == w * h).then_some(Self { w, h, data })
    }

    /// Depth window of size `w × h` whose origin sits at full-frame pixel
    /// `top_left`, holding only the samples of `cluster`. Samples falling
    /// outside the window are dropped.
    pub fn from_cluster(cluster: &Cluster, top_left: PointIj, w: usize, h: usize) -> Self {
        let mut img = Self::new(w, h);
        for (ij, xyz) in cluster.points_ij().iter().zip(cluster.points_xyz()) {
            let local = PointIj::new(ij.x - top_left.x, ij.y - top_left.y);
            if img.contains(local) {
                img.set(local.x as usize, local.y as usize, *xyz);
            }
        }
        img
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: PointXyz) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    #[inline]
    pub fn contains(&self, p: PointIj) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.w && (p.y as usize) < self.h
    }

    /// Sample at `p`, `None` outside the window.
    #[inline]
    pub fn at(&self, p: PointIj) -> Option<PointXyz> {
        self.get(p.x, p.y)
    }

    /// True when `p` is inside the window and carries depth.
    #[inline]
    pub fn is_valid(&self, p: PointIj) -> bool {
        self.at(p).is_some_and(|v| v.z != 0.0)
    }

    /// Iterate valid samples with their window coordinates.
    pub fn valid_samples(&self) -> impl Iterator<Item = (PointIj, PointXyz)> + '_ {
        self.rows().flat_map(|(y, row)| {
            row.iter().enumerate().filter_map(move |(x, v)| {
                (v.z != 0.0).then(|| (PointIj::new(x as i32, y as i32), *v))
            })
        })
    }

    /// Mean of the valid samples in the `size × size` box centred on `p`.
    /// Returns the zero vector when the box holds no depth.
    pub fn average_around_point(&self, p: PointIj, size: i32) -> PointXyz {
        let half = (size / 2).max(0);
        let x0 = (p.x - half).max(0);
        let y0 = (p.y - half).max(0);
        let x1 = (p.x + half).min(self.w as i32 - 1);
        let y1 = (p.y + half).min(self.h as i32 - 1);
        let mut sum = PointXyz::zeros();
        let mut count = 0u32;
        for y in y0..=y1 {
            let row = self.row(y as usize);
            for x in x0..=x1 {
                let v = row[x as usize];
                if v.z != 0.0 {
                    sum += v;
                    count += 1;
                }
            }
        }
        if count == 0 {
            PointXyz::zeros()
        } else {
            sum / count as f32
        }
    }

    /// Nearest pixel with valid depth, searching square rings of growing
    /// radius up to `max_radius` (the window extent when `None`). Within the
    /// first ring holding depth the smallest Euclidean offset wins, first in
    /// row-major order on ties. Returns `p` unchanged when nothing is found.
    pub fn nearest_valid_point(&self, p: PointIj, max_radius: Option<i32>) -> PointIj {
        if self.is_valid(p) {
            return p;
        }
        let extent = self.w.max(self.h) as i32;
        let limit = max_radius.map_or(extent, |r| r.min(extent));
        for r in 1..=limit {
            let mut best: Option<(i32, PointIj)> = None;
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx.abs() != r && dy.abs() != r {
                        continue;
                    }
                    let q = PointIj::new(p.x + dx, p.y + dy);
                    if !self.is_valid(q) {
                        continue;
                    }
                    let d2 = dx * dx + dy * dy;
                    if best.map_or(true, |(bd, _)| d2 < bd) {
                        best = Some((d2, q));
                    }
                }
            }
            if let Some((_, q)) = best {
                return q;
            }
        }
        p
    }

    /// Metric surface area: the sum over valid samples whose right and lower
    /// neighbours are valid of the parallelogram they span.
    pub fn surface_area(&self) -> f64 {
        let mut total = 0.0f64;
        for ((_, row), (_, below)) in self.rows().zip(self.rows().skip(1)) {
            for (x, pair) in row.windows(2).enumerate() {
                let (p, r, d) = (pair[0], pair[1], below[x]);
                if p.z == 0.0 || r.z == 0.0 || d.z == 0.0 {
                    continue;
                }
                total += (r - p).cross(&(d - p)).norm() as f64;
            }
        }
        total
    }
}

impl ImageView for XyzImage {
    type Pixel = PointXyz;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[PointXyz] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}
