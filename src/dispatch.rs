use crate::model::GeomModel;
use crate::types::{CollisionPair, GeomType, NUM_GEOM_TYPES, TypePrecedence};

/// Fixed `(type_a, type_b)` table for narrow-phase routine selection.
///
/// Entries are registered under the canonical ordering of the precedence the
/// broadphase was configured with, so a pair straight out of the collector is
/// looked up with a single index and never needs its operands swapped.
#[derive(Clone, Debug)]
pub struct CollisionTable<T> {
    precedence: TypePrecedence,
    table: [[Option<T>; NUM_GEOM_TYPES]; NUM_GEOM_TYPES],
}

impl<T: Copy> CollisionTable<T> {
    pub fn new(precedence: TypePrecedence) -> Self {
        Self { precedence, table: [[None; NUM_GEOM_TYPES]; NUM_GEOM_TYPES] }
    }

    /// Register `entry` for the unordered type pair `{a, b}`.
    pub fn register(&mut self, a: GeomType, b: GeomType, entry: T) {
        let (a, b) = if self.precedence.leads(a, b) { (a, b) } else { (b, a) };
        self.table[a.tag()][b.tag()] = Some(entry);
    }

    /// Direct lookup; `(a, b)` must already be in canonical order.
    #[inline]
    pub fn get(&self, a: GeomType, b: GeomType) -> Option<T> {
        self.table[a.tag()][b.tag()]
    }

    /// Entry for an emitted pair.
    #[inline]
    pub fn lookup(&self, model: &GeomModel, pair: &CollisionPair) -> Option<T> {
        self.get(model.geom(pair.a as usize).kind, model.geom(pair.b as usize).kind)
    }
}

impl<T: Copy> Default for CollisionTable<T> {
    fn default() -> Self {
        Self::new(TypePrecedence::default())
    }
}
