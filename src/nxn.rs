use crate::api::{PairGenerator, PassInputs};
use crate::collector::PairBuffer;
use crate::filter::{canonical_pair, eligible};
use crate::model::GeomModel;

/// Exhaustive generator: tests every eligible pair of a world.
///
/// This is the reference the sweep generator is validated against. Within a
/// world, pairs come out in ascending `(min index, max index)` order. The
/// eligible pair list is quadratic in the geometry count and only exists
/// while this generator is in use.
#[derive(Clone, Debug, Default)]
pub struct Nxn {
    // (i, j) with i < j passing the eligibility filter.
    pairs: Vec<(u32, u32)>,
}

impl Nxn {
    /// Precompute the position-independent eligible pairs of `model`.
    pub fn new(model: &GeomModel) -> Self {
        let geoms = model.geoms();
        let mut pairs = Vec::new();
        for i in 0..geoms.len() {
            for j in (i + 1)..geoms.len() {
                if eligible(&geoms[i], &geoms[j]) {
                    pairs.push((i as u32, j as u32));
                }
            }
        }
        log::debug!("nxn: {} eligible pairs of {} geoms", pairs.len(), geoms.len());
        Self { pairs }
    }

    pub fn eligible_pairs(&self) -> &[(u32, u32)] {
        &self.pairs
    }
}

impl PairGenerator for Nxn {
    type Scratch = ();

    fn name(&self) -> &'static str {
        "nxn"
    }

    fn generate_world(&self, inputs: &PassInputs<'_>, world: usize, _scratch: &mut (), out: &PairBuffer) -> usize {
        let spheres = inputs.world(world);
        let geoms = inputs.model.geoms();
        for &(i, j) in &self.pairs {
            if spheres[i as usize].overlaps(&spheres[j as usize]) {
                out.push(canonical_pair(geoms, inputs.precedence, i, j, world as u32));
            }
        }
        self.pairs.len()
    }
}
