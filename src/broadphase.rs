use std::time::Instant;

use crate::api::{PairGenerator, PassInputs};
use crate::bounds::{BoundingSphere, build_spheres};
use crate::collector::PairBuffer;
use crate::error::{BroadphaseError, Result};
use crate::model::{BatchState, GeomModel};
use crate::nxn::Nxn;
use crate::sap::SweepAndPrune;
use crate::types::*;

#[derive(Clone, Debug)]
enum Generator {
    Nxn(Nxn),
    Sweep(SweepAndPrune),
}

/// Batched broadphase: bounding volumes, pair generation and the shared output
/// buffer for `nworld` worlds sharing one geometry model.
pub struct Broadphase {
    cfg: BroadphaseConfig,
    pub pass_counter: u32,

    model: GeomModel,
    generator: Generator,

    // Pass-local storage
    spheres: Vec<BoundingSphere>,
    bounds_ready: bool,
    buffer: PairBuffer,
    candidate_tests: usize,

    last_timing: Option<PassTiming>,
}

impl Broadphase {
    /// Validate the configuration and allocate the output buffer.
    pub fn new(cfg: BroadphaseConfig, model: GeomModel) -> Result<Self> {
        if cfg.nworld == 0 {
            return Err(BroadphaseError::NoWorlds);
        }
        if cfg.max_pairs == 0 {
            return Err(BroadphaseError::ZeroCapacity);
        }
        let generator = match cfg.algorithm {
            Algorithm::Nxn => Generator::Nxn(Nxn::new(&model)),
            Algorithm::SweepAndPrune => Generator::Sweep(SweepAndPrune::new(cfg.sweep_axis)),
            Algorithm::Auto if model.len() <= cfg.nxn_threshold => Generator::Nxn(Nxn::new(&model)),
            Algorithm::Auto => Generator::Sweep(SweepAndPrune::new(cfg.sweep_axis)),
        };
        let name = match &generator {
            Generator::Nxn(g) => g.name(),
            Generator::Sweep(g) => g.name(),
        };
        log::debug!(
            "broadphase: {} worlds x {} geoms, capacity {}, generator {}",
            cfg.nworld,
            model.len(),
            cfg.max_pairs,
            name
        );
        Ok(Self {
            buffer: PairBuffer::with_capacity(cfg.max_pairs),
            spheres: Vec::with_capacity(cfg.nworld * model.len()),
            cfg,
            pass_counter: 0,
            model,
            generator,
            bounds_ready: false,
            candidate_tests: 0,
            last_timing: None,
        })
    }

    pub fn config(&self) -> &BroadphaseConfig {
        &self.cfg
    }

    pub fn model(&self) -> &GeomModel {
        &self.model
    }

    /// Name of the generator selected at construction.
    pub fn generator_name(&self) -> &'static str {
        match &self.generator {
            Generator::Nxn(g) => g.name(),
            Generator::Sweep(g) => g.name(),
        }
    }

    // --- Pass lifecycle ----------------------------------------------------

    /// Begin a new pass. Clears the output buffer and the previous bounds.
    pub fn begin_pass(&mut self) {
        self.buffer.reset();
        self.bounds_ready = false;
        self.candidate_tests = 0;
        self.last_timing = None;
        self.pass_counter = self.pass_counter.wrapping_add(1);
    }

    /// Derive this pass's bounding spheres from `state`.
    pub fn build_bounds(&mut self, state: &BatchState) -> Result<()> {
        if state.nworld() != self.cfg.nworld || state.ngeom() != self.model.len() {
            return Err(BroadphaseError::StateMismatch {
                expected_worlds: self.cfg.nworld,
                expected_geoms: self.model.len(),
                actual_worlds: state.nworld(),
                actual_geoms: state.ngeom(),
            });
        }
        let t0 = self.cfg.enable_timing.then(Instant::now);
        build_spheres(&self.model, state, &mut self.spheres, self.cfg.parallel);
        self.bounds_ready = true;
        if let Some(t0) = t0 {
            self.last_timing = Some(PassTiming {
                bounds_ms: t0.elapsed().as_secs_f64() * 1000.0,
                ..Default::default()
            });
        }
        Ok(())
    }

    /// Run the selected generator over every world into the output buffer.
    pub fn generate_pairs(&mut self) {
        if !self.bounds_ready {
            log::warn!("pass {}: generate_pairs called before build_bounds, skipping", self.pass_counter);
            return;
        }
        let t0 = self.cfg.enable_timing.then(Instant::now);
        let inputs = PassInputs {
            model: &self.model,
            spheres: &self.spheres,
            nworld: self.cfg.nworld,
            precedence: &self.cfg.precedence,
        };
        let parallel = self.cfg.parallel;
        self.candidate_tests = match &self.generator {
            Generator::Nxn(g) => g.generate(&inputs, &self.buffer, parallel),
            Generator::Sweep(g) => g.generate(&inputs, &self.buffer, parallel),
        };
        if self.buffer.overflowed() {
            log::warn!(
                "pass {}: pair buffer full at {} pairs, dropping the rest",
                self.pass_counter,
                self.buffer.capacity()
            );
        }
        log::trace!(
            "pass {}: {} pairs from {} overlap tests",
            self.pass_counter,
            self.buffer.len(),
            self.candidate_tests
        );
        if let Some(t0) = t0 {
            let timing = self.last_timing.get_or_insert_with(PassTiming::default);
            timing.generate_ms = t0.elapsed().as_secs_f64() * 1000.0;
            timing.total_ms = timing.bounds_ms + timing.generate_ms;
            timing.pairs_emitted = self.buffer.len();
        }
    }

    /// Full pass: reset, bounds, generation. Returns the valid pair count.
    pub fn run(&mut self, state: &BatchState) -> Result<usize> {
        self.begin_pass();
        self.build_bounds(state)?;
        self.generate_pairs();
        Ok(self.pair_count())
    }

    // --- Results -----------------------------------------------------------

    /// Valid pairs of the last pass, clamped to capacity.
    pub fn pair_count(&self) -> usize {
        self.buffer.len()
    }

    pub fn buffer(&self) -> &PairBuffer {
        &self.buffer
    }

    /// Snapshot of `[0, pair_count)` in emission order.
    pub fn pairs(&self) -> Vec<CollisionPair> {
        self.buffer.to_vec()
    }

    /// Pairs of one world, in that world's emission order.
    pub fn pairs_in_world(&self, world: usize) -> Vec<CollisionPair> {
        self.buffer.iter().filter(|p| p.world as usize == world).collect()
    }

    /// Bounding spheres of the last pass for one world.
    /// Empty before bounds are built or for a world outside the batch.
    pub fn spheres(&self, world: usize) -> &[BoundingSphere] {
        let n = self.model.len();
        if !self.bounds_ready || world >= self.cfg.nworld {
            return &[];
        }
        &self.spheres[world * n..(world + 1) * n]
    }

    /// Return debug stats for the last pass.
    pub fn debug_stats(&self) -> PassStats {
        PassStats {
            worlds: self.cfg.nworld,
            geoms: self.model.len(),
            eligible_pairs: match &self.generator {
                Generator::Nxn(g) => Some(g.eligible_pairs().len()),
                Generator::Sweep(_) => None,
            },
            candidate_tests: self.candidate_tests,
            pairs: self.buffer.len(),
            capacity: self.buffer.capacity(),
        }
    }

    /// Return timing breakdown for the last pass, when enabled.
    pub fn timing(&self) -> Option<PassTiming> {
        self.last_timing
    }
}
