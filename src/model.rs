use glam::Vec3;

use crate::error::{BroadphaseError, Result};
use crate::types::{GeomDesc, GeomType};

/// Static geometry attributes shared by every world.
#[derive(Clone, Debug)]
pub struct GeomModel {
    geoms: Vec<GeomDesc>,
}

impl GeomModel {
    pub fn new(geoms: Vec<GeomDesc>) -> Result<Self> {
        if u32::try_from(geoms.len()).is_err() {
            return Err(BroadphaseError::TooManyGeoms(geoms.len()));
        }
        log::debug!("geom model: {} geoms", geoms.len());
        Ok(Self { geoms })
    }

    /// Build from parallel per-geometry arrays as laid out by the physics
    /// model. All arrays must have the same length as `radius`.
    pub fn from_arrays(
        radius: &[f32],
        margin: &[f32],
        body: &[u32],
        type_tag: &[i32],
        contype: &[u32],
        conaffinity: &[u32],
    ) -> Result<Self> {
        let n = radius.len();
        for (name, len) in [
            ("margin", margin.len()),
            ("body", body.len()),
            ("type_tag", type_tag.len()),
            ("contype", contype.len()),
            ("conaffinity", conaffinity.len()),
        ] {
            if len != n {
                return Err(BroadphaseError::LengthMismatch { name, expected: n, actual: len });
            }
        }
        let geoms = (0..n)
            .map(|i| {
                Ok(GeomDesc {
                    kind: GeomType::from_tag(type_tag[i])?,
                    radius: radius[i],
                    margin: margin[i],
                    body: body[i],
                    contype: contype[i],
                    conaffinity: conaffinity[i],
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(geoms)
    }

    pub fn len(&self) -> usize {
        self.geoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geoms.is_empty()
    }

    pub fn geoms(&self) -> &[GeomDesc] {
        &self.geoms
    }

    pub fn geom(&self, i: usize) -> &GeomDesc {
        &self.geoms[i]
    }
}

/// World-major geometry positions for a batch of worlds.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchState {
    nworld: usize,
    ngeom: usize,
    positions: Vec<Vec3>,
}

impl BatchState {
    /// All positions at the origin.
    pub fn new(nworld: usize, ngeom: usize) -> Result<Self> {
        Self::from_positions(nworld, ngeom, vec![Vec3::ZERO; nworld * ngeom])
    }

    /// Wrap `positions`, laid out as `positions[world * ngeom + geom]`.
    pub fn from_positions(nworld: usize, ngeom: usize, positions: Vec<Vec3>) -> Result<Self> {
        if nworld == 0 {
            return Err(BroadphaseError::NoWorlds);
        }
        if positions.len() != nworld * ngeom {
            return Err(BroadphaseError::LengthMismatch {
                name: "positions",
                expected: nworld * ngeom,
                actual: positions.len(),
            });
        }
        Ok(Self { nworld, ngeom, positions })
    }

    /// Copy one world's transforms into `nworld` identical worlds.
    pub fn replicate(world: &[Vec3], nworld: usize) -> Result<Self> {
        let positions = (0..nworld).flat_map(|_| world.iter().copied()).collect();
        Self::from_positions(nworld, world.len(), positions)
    }

    pub fn nworld(&self) -> usize {
        self.nworld
    }

    pub fn ngeom(&self) -> usize {
        self.ngeom
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn world(&self, world: usize) -> &[Vec3] {
        &self.positions[world * self.ngeom..(world + 1) * self.ngeom]
    }

    pub fn world_mut(&mut self, world: usize) -> &mut [Vec3] {
        &mut self.positions[world * self.ngeom..(world + 1) * self.ngeom]
    }

    pub fn set_position(&mut self, world: usize, geom: usize, pos: Vec3) {
        self.positions[world * self.ngeom + geom] = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_arrays_length_mismatch() {
        let err = GeomModel::from_arrays(&[1.0, 1.0], &[0.0, 0.0], &[1], &[2, 2], &[1, 1], &[1, 1]).unwrap_err();
        assert_eq!(err, BroadphaseError::LengthMismatch { name: "body", expected: 2, actual: 1 });
    }

    #[test]
    fn test_from_arrays_unknown_type() {
        let err = GeomModel::from_arrays(&[1.0], &[0.0], &[1], &[42], &[1], &[1]).unwrap_err();
        assert_eq!(err, BroadphaseError::UnknownGeomType(42));
    }

    #[test]
    fn test_from_arrays_builds_geoms() {
        let model =
            GeomModel::from_arrays(&[0.5, 0.7], &[0.1, 0.0], &[1, 2], &[6, 2], &[1, 0], &[1, 1]).unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model.geom(0).kind, GeomType::Box);
        assert_eq!(model.geom(1).kind, GeomType::Sphere);
        assert_eq!(model.geom(1).contype, 0);
        assert_eq!(model.geom(0).margin, 0.1);
    }

    #[test]
    fn test_batch_state_validation() {
        assert_eq!(BatchState::new(0, 3), Err(BroadphaseError::NoWorlds));
        let err = BatchState::from_positions(2, 2, vec![Vec3::ZERO; 3]).unwrap_err();
        assert_eq!(err, BroadphaseError::LengthMismatch { name: "positions", expected: 4, actual: 3 });
    }

    #[test]
    fn test_batch_state_world_views() {
        let world = [Vec3::X, Vec3::Y, Vec3::Z];
        let mut state = BatchState::replicate(&world, 3).unwrap();
        assert_eq!(state.nworld(), 3);
        assert_eq!(state.ngeom(), 3);
        assert_eq!(state.world(2), &world);
        state.set_position(1, 2, Vec3::ONE);
        assert_eq!(state.world(1)[2], Vec3::ONE);
        assert_eq!(state.world(0)[2], Vec3::Z);
        state.world_mut(0)[0] = Vec3::NEG_ONE;
        assert_eq!(state.positions()[0], Vec3::NEG_ONE);
    }
}
