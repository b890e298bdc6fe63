use glam::Vec3;
use rayon::prelude::*;

use crate::model::{BatchState, GeomModel};

/// Conservative sphere proxy for one geometry in one world.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    /// Base radius plus margin.
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32, margin: f32) -> Self {
        Self { center, radius: radius + margin }
    }

    /// Squared-distance overlap test; touching spheres overlap.
    #[inline]
    pub fn overlaps(&self, other: &BoundingSphere) -> bool {
        let dist_sq = (self.center - other.center).length_squared();
        let r = self.radius + other.radius;
        dist_sq <= r * r
    }

    /// Closed interval covered on `axis` (0 = x, 1 = y, 2 = z), padded by a
    /// few ULPs so rounding in `c - r` / `c + r` never separates intervals
    /// whose spheres pass `overlaps`. Uses `|radius|`, so the interval is
    /// never inverted.
    #[inline]
    pub fn interval(&self, axis: usize) -> (f32, f32) {
        let c = self.center[axis];
        let r = self.radius.abs();
        let slack = (c.abs() + r) * (4.0 * f32::EPSILON);
        (c - r - slack, c + r + slack)
    }
}

/// Derive bounding spheres for every (world, geometry) entry into `out`
/// (world-major, `nworld * ngeom` long).
pub fn build_spheres(model: &GeomModel, state: &BatchState, out: &mut Vec<BoundingSphere>, parallel: bool) {
    let ngeom = model.len();
    out.resize(state.positions().len(), BoundingSphere::default());
    if ngeom == 0 {
        return;
    }
    let geoms = model.geoms();
    let fill = |(i, (s, p)): (usize, (&mut BoundingSphere, &Vec3))| {
        let g = &geoms[i % ngeom];
        *s = BoundingSphere::new(*p, g.radius, g.margin);
    };
    if parallel {
        out.par_iter_mut().zip(state.positions().par_iter()).enumerate().for_each(fill);
    } else {
        out.iter_mut().zip(state.positions().iter()).enumerate().for_each(fill);
    }
}
