use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::bounds::BoundingSphere;
use crate::collector::PairBuffer;
use crate::model::GeomModel;
use crate::types::TypePrecedence;

/// Read-only inputs of one evaluation pass, shared by every lane.
#[derive(Copy, Clone)]
pub struct PassInputs<'a> {
    pub model: &'a GeomModel,
    /// World-major spheres, `nworld * ngeom` long.
    pub spheres: &'a [BoundingSphere],
    pub nworld: usize,
    pub precedence: &'a TypePrecedence,
}

impl<'a> PassInputs<'a> {
    /// Spheres of a single world.
    pub fn world(&self, world: usize) -> &'a [BoundingSphere] {
        let n = self.model.len();
        &self.spheres[world * n..(world + 1) * n]
    }
}

/// Contract shared by every candidate-pair generator.
///
/// Implementations must produce, for each world, exactly the set of pairs
/// that are eligible and whose bounding spheres overlap. Emission order may
/// differ between implementations; the index order inside each pair is
/// always the canonical one.
pub trait PairGenerator: Send + Sync {
    /// Per-lane scratch storage, reused across worlds on the same thread.
    type Scratch: Default + Send;

    fn name(&self) -> &'static str;

    /// Emit the pairs of one world into `out`. Returns the number of sphere
    /// overlap tests evaluated.
    fn generate_world(
        &self,
        inputs: &PassInputs<'_>,
        world: usize,
        scratch: &mut Self::Scratch,
        out: &PairBuffer,
    ) -> usize;

    /// Run every world, one lane per world. Returns the total number of
    /// overlap tests.
    fn generate(&self, inputs: &PassInputs<'_>, out: &PairBuffer, parallel: bool) -> usize {
        if parallel {
            let tests = AtomicUsize::new(0);
            (0..inputs.nworld).into_par_iter().for_each_init(<Self::Scratch as Default>::default, |scratch, w| {
                let n = self.generate_world(inputs, w, scratch, out);
                tests.fetch_add(n, Ordering::Relaxed);
            });
            tests.into_inner()
        } else {
            let mut scratch = <Self::Scratch as Default>::default();
            (0..inputs.nworld).map(|w| self.generate_world(inputs, w, &mut scratch, out)).sum()
        }
    }
}
