use crate::error::{BroadphaseError, Result};

/// Number of entries in the geometry-type taxonomy.
pub const NUM_GEOM_TYPES: usize = 9;

/// Collision bitmask with every group bit set.
pub const ALL_GROUPS: u32 = u32::MAX;

/// Geometry-type taxonomy shared with the physics model. Tags are stable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum GeomType {
    Plane = 0,
    Hfield = 1,
    Sphere = 2,
    Capsule = 3,
    Ellipsoid = 4,
    Cylinder = 5,
    Box = 6,
    Mesh = 7,
    Sdf = 8,
}

impl GeomType {
    pub const ALL: [GeomType; NUM_GEOM_TYPES] = [
        GeomType::Plane,
        GeomType::Hfield,
        GeomType::Sphere,
        GeomType::Capsule,
        GeomType::Ellipsoid,
        GeomType::Cylinder,
        GeomType::Box,
        GeomType::Mesh,
        GeomType::Sdf,
    ];

    /// Decode an integer tag as stored by the upstream model.
    pub fn from_tag(tag: i32) -> Result<Self> {
        usize::try_from(tag)
            .ok()
            .and_then(|t| Self::ALL.get(t).copied())
            .ok_or(BroadphaseError::UnknownGeomType(tag))
    }

    pub fn tag(self) -> usize {
        self as usize
    }
}

/// Rank table deciding which geometry of a pair is emitted first.
///
/// The geometry whose type has the lower rank leads; equal ranks fall back to
/// ascending geometry index. The default ranks every type by its tag, so the
/// canonical pair always satisfies `type_a <= type_b`:
///
/// | rank | type      |
/// |------|-----------|
/// | 0    | Plane     |
/// | 1    | Hfield    |
/// | 2    | Sphere    |
/// | 3    | Capsule   |
/// | 4    | Ellipsoid |
/// | 5    | Cylinder  |
/// | 6    | Box       |
/// | 7    | Mesh      |
/// | 8    | Sdf       |
///
/// Narrow-phase dispatch tables are keyed on this ordering, so changing it is a
/// breaking change for consumers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypePrecedence {
    rank: [u8; NUM_GEOM_TYPES],
}

impl Default for TypePrecedence {
    fn default() -> Self {
        let mut rank = [0u8; NUM_GEOM_TYPES];
        for (i, r) in rank.iter_mut().enumerate() {
            *r = i as u8;
        }
        Self { rank }
    }
}

impl TypePrecedence {
    /// Build from a full ordering of the taxonomy, highest precedence first.
    pub fn from_order(order: &[GeomType]) -> Result<Self> {
        if order.len() != NUM_GEOM_TYPES {
            return Err(BroadphaseError::InvalidPrecedence);
        }
        let mut seen = [false; NUM_GEOM_TYPES];
        let mut rank = [0u8; NUM_GEOM_TYPES];
        for (r, ty) in order.iter().enumerate() {
            if std::mem::replace(&mut seen[ty.tag()], true) {
                return Err(BroadphaseError::InvalidPrecedence);
            }
            rank[ty.tag()] = r as u8;
        }
        Ok(Self { rank })
    }

    pub fn rank(&self, ty: GeomType) -> u8 {
        self.rank[ty.tag()]
    }

    /// True when `a` must be emitted before `b`.
    pub fn leads(&self, a: GeomType, b: GeomType) -> bool {
        self.rank(a) <= self.rank(b)
    }
}

/// Static per-geometry attributes, identical in every world.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeomDesc {
    pub kind: GeomType,
    /// Radius of the conservative bounding sphere around the shape.
    pub radius: f32,
    /// Extra inflation added to `radius`.
    pub margin: f32,
    pub body: u32,
    /// Groups this geometry belongs to.
    pub contype: u32,
    /// Groups this geometry is willing to collide against.
    pub conaffinity: u32,
}

impl GeomDesc {
    /// Geometry of any type with all collision groups enabled and no margin.
    pub fn new(kind: GeomType, body: u32, radius: f32) -> Self {
        Self {
            kind,
            radius,
            margin: 0.0,
            body,
            contype: ALL_GROUPS,
            conaffinity: ALL_GROUPS,
        }
    }

    /// Convenience: sphere of the given radius.
    pub fn sphere(body: u32, radius: f32) -> Self {
        Self::new(GeomType::Sphere, body, radius)
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_affinity(mut self, contype: u32, conaffinity: u32) -> Self {
        self.contype = contype;
        self.conaffinity = conaffinity;
        self
    }
}

/// Candidate pair handed to the narrow phase. `a` and `b` are geometry
/// indices in canonical order; `world` is the owning world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollisionPair {
    pub a: u32,
    pub b: u32,
    pub world: u32,
}

impl CollisionPair {
    pub fn new(a: u32, b: u32, world: u32) -> Self {
        Self { a, b, world }
    }

    /// Index pair with the smaller index first, ignoring canonical order.
    pub fn unordered(&self) -> (u32, u32) {
        if self.a < self.b { (self.a, self.b) } else { (self.b, self.a) }
    }
}

/// Pair generation strategy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Exhaustive all-pairs scan.
    Nxn,
    /// Sort along an axis and scan an active window.
    SweepAndPrune,
    /// `Nxn` up to `nxn_threshold` geometries, `SweepAndPrune` above.
    #[default]
    Auto,
}

/// Axis used by sweep-and-prune to order bounding intervals.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SweepAxis {
    #[default]
    X,
    Y,
    Z,
    /// Per world, the axis with the widest spread of centers.
    Auto,
}

/// Broadphase configuration, fixed at setup time.
#[derive(Clone, Debug)]
pub struct BroadphaseConfig {
    /// Number of worlds evaluated together (>= 1).
    pub nworld: usize,
    /// Output buffer capacity in pairs (>= 1); extra pairs are dropped.
    pub max_pairs: usize,
    pub algorithm: Algorithm,
    pub sweep_axis: SweepAxis,
    /// Largest geometry count for which `Algorithm::Auto` picks `Nxn`.
    pub nxn_threshold: usize,
    pub precedence: TypePrecedence,
    /// Run world lanes and bounds on the rayon pool.
    pub parallel: bool,
    /// Enable pass timing instrumentation (adds small overhead when true).
    pub enable_timing: bool,
}

impl Default for BroadphaseConfig {
    fn default() -> Self {
        Self {
            nworld: 1,
            max_pairs: 4096,
            algorithm: Algorithm::Auto,
            sweep_axis: SweepAxis::X,
            nxn_threshold: 32,
            precedence: TypePrecedence::default(),
            parallel: true,
            enable_timing: false,
        }
    }
}

/// Debug statistics for the last completed pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    pub worlds: usize,
    pub geoms: usize,
    /// Pairs passing the eligibility filter, per world. Only the exhaustive
    /// generator enumerates them; `None` under sweep-and-prune.
    pub eligible_pairs: Option<usize>,
    /// Sphere overlap tests evaluated across all worlds.
    pub candidate_tests: usize,
    /// Valid pairs in the output buffer (clamped to capacity).
    pub pairs: usize,
    pub capacity: usize,
}

/// Timing breakdown for the last completed pass.
#[derive(Copy, Clone, Debug, Default)]
pub struct PassTiming {
    pub total_ms: f64,
    pub bounds_ms: f64,
    pub generate_ms: f64,
    pub pairs_emitted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geom_type_tags_round_trip() {
        for ty in GeomType::ALL {
            assert_eq!(GeomType::from_tag(ty.tag() as i32), Ok(ty));
        }
        assert_eq!(GeomType::from_tag(9), Err(BroadphaseError::UnknownGeomType(9)));
        assert_eq!(GeomType::from_tag(-1), Err(BroadphaseError::UnknownGeomType(-1)));
    }

    #[test]
    fn test_default_precedence_follows_tags() {
        let p = TypePrecedence::default();
        assert!(p.leads(GeomType::Plane, GeomType::Box));
        assert!(p.leads(GeomType::Sphere, GeomType::Box));
        assert!(!p.leads(GeomType::Box, GeomType::Sphere));
        assert!(p.leads(GeomType::Box, GeomType::Box));
    }

    #[test]
    fn test_custom_precedence() {
        let mut order = GeomType::ALL;
        order.reverse();
        let p = TypePrecedence::from_order(&order).unwrap();
        assert_eq!(p.rank(GeomType::Sdf), 0);
        assert!(p.leads(GeomType::Box, GeomType::Sphere));
    }

    #[test]
    fn test_precedence_rejects_duplicates_and_short_orders() {
        let mut order = GeomType::ALL;
        order[0] = GeomType::Box;
        assert_eq!(TypePrecedence::from_order(&order), Err(BroadphaseError::InvalidPrecedence));
        assert_eq!(
            TypePrecedence::from_order(&GeomType::ALL[..4]),
            Err(BroadphaseError::InvalidPrecedence)
        );
    }

    #[test]
    fn test_geom_desc_defaults() {
        let g = GeomDesc::sphere(3, 0.5).with_margin(0.1);
        assert_eq!(g.kind, GeomType::Sphere);
        assert_eq!(g.contype, ALL_GROUPS);
        assert_eq!(g.conaffinity, ALL_GROUPS);
        assert_eq!(g.margin, 0.1);
    }
}
