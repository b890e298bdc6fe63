use glam::Vec3;

use crate::api::{PairGenerator, PassInputs};
use crate::bounds::BoundingSphere;
use crate::collector::PairBuffer;
use crate::filter::{canonical_pair, eligible};
use crate::types::SweepAxis;

/// Sweep-and-prune generator.
///
/// Per world: project every sphere onto the sweep axis, sort by the lower
/// end of the interval, then sweep keeping an active window of intervals that
/// still reach the current position. Only window members are tested with the
/// full 3-D predicate, so the result equals the exhaustive scan.
#[derive(Copy, Clone, Debug, Default)]
pub struct SweepAndPrune {
    pub axis: SweepAxis,
}

/// Per-lane buffers reused between worlds.
#[derive(Debug, Default)]
pub struct SweepScratch {
    lo: Vec<f32>,
    hi: Vec<f32>,
    order: Vec<u32>,
    active: Vec<u32>,
}

impl SweepAndPrune {
    pub fn new(axis: SweepAxis) -> Self {
        Self { axis }
    }

    fn axis_index(&self, spheres: &[BoundingSphere]) -> usize {
        match self.axis {
            SweepAxis::X => 0,
            SweepAxis::Y => 1,
            SweepAxis::Z => 2,
            SweepAxis::Auto => widest_axis(spheres),
        }
    }
}

/// Axis along which sphere centers are most spread out.
fn widest_axis(spheres: &[BoundingSphere]) -> usize {
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    for s in spheres {
        min = min.min(s.center);
        max = max.max(s.center);
    }
    let extent = max - min;
    if extent.x >= extent.y && extent.x >= extent.z {
        0
    } else if extent.y >= extent.z {
        1
    } else {
        2
    }
}

impl PairGenerator for SweepAndPrune {
    type Scratch = SweepScratch;

    fn name(&self) -> &'static str {
        "sweep_and_prune"
    }

    fn generate_world(
        &self,
        inputs: &PassInputs<'_>,
        world: usize,
        scratch: &mut SweepScratch,
        out: &PairBuffer,
    ) -> usize {
        let spheres = inputs.world(world);
        let geoms = inputs.model.geoms();
        let n = spheres.len();
        if n < 2 {
            return 0;
        }
        let axis = self.axis_index(spheres);

        let SweepScratch { lo, hi, order, active } = scratch;
        lo.clear();
        hi.clear();
        for s in spheres {
            let (l, h) = s.interval(axis);
            lo.push(l);
            hi.push(h);
        }
        order.clear();
        order.extend(0..n as u32);
        order.sort_unstable_by(|&a, &b| lo[a as usize].total_cmp(&lo[b as usize]).then(a.cmp(&b)));

        let mut tests = 0;
        active.clear();
        for &cur in order.iter() {
            let c = cur as usize;
            let cur_lo = lo[c];
            // Later intervals start at or after cur_lo, so retired ones stay retired.
            active.retain(|&k| hi[k as usize] >= cur_lo);
            for &k in active.iter() {
                let k_ = k as usize;
                if !eligible(&geoms[k_], &geoms[c]) {
                    continue;
                }
                tests += 1;
                if spheres[k_].overlaps(&spheres[c]) {
                    out.push(canonical_pair(geoms, inputs.precedence, k, cur, world as u32));
                }
            }
            active.push(cur);
        }
        log::trace!("sap world {world}: axis {axis}, {tests} overlap tests");
        tests
    }
}
