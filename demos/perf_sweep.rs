use glam::Vec3;
use sweepline::*;

fn lcg(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}

fn unit(seed: &mut u32) -> f32 {
    lcg(seed) as f32 / u32::MAX as f32
}

fn build_scene(ngeom: usize, nworld: usize, extent: f32, seed0: u32) -> (GeomModel, BatchState) {
    let mut seed = seed0;
    let geoms = (0..ngeom)
        .map(|i| {
            let kind = if i % 2 == 0 { GeomType::Box } else { GeomType::Sphere };
            GeomDesc::new(kind, i as u32, 0.5).with_margin(0.01)
        })
        .collect();
    let positions = (0..ngeom * nworld)
        .map(|_| {
            Vec3::new(
                unit(&mut seed) * extent - extent * 0.5,
                unit(&mut seed) * extent - extent * 0.5,
                unit(&mut seed) * extent * 0.1,
            )
        })
        .collect();
    let model = GeomModel::new(geoms).expect("valid model");
    let state = BatchState::from_positions(nworld, ngeom, positions).expect("valid state");
    (model, state)
}

fn main() {
    env_logger::init();

    let ngeom_vals = [64usize, 256, 1024];
    let nworld_vals = [1usize, 16, 128];
    let algorithms = [Algorithm::Nxn, Algorithm::SweepAndPrune];
    println!("ngeom,nworld,algorithm,bounds_ms,generate_ms,candidate_tests,pairs");
    for &ngeom in &ngeom_vals {
        for &nworld in &nworld_vals {
            let (model, state) = build_scene(ngeom, nworld, (ngeom as f32).sqrt() * 2.0, 1);
            for &algorithm in &algorithms {
                let mut bp = Broadphase::new(
                    BroadphaseConfig {
                        nworld,
                        max_pairs: 1 << 22,
                        algorithm,
                        enable_timing: true,
                        ..Default::default()
                    },
                    model.clone(),
                )
                .expect("valid config");
                let count = bp.run(&state).expect("matching state");
                let t = bp.timing().unwrap_or_default();
                let stats = bp.debug_stats();
                println!(
                    "{},{},{},{:.3},{:.3},{},{}",
                    ngeom,
                    nworld,
                    bp.generator_name(),
                    t.bounds_ms,
                    t.generate_ms,
                    stats.candidate_tests,
                    count
                );
            }
        }
    }
}
