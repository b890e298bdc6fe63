use crate::types::{CollisionPair, GeomDesc, TypePrecedence};

/// Pair eligibility, independent of position.
///
/// Geometries on the same body never collide. Otherwise at least one
/// direction of `contype & conaffinity` must share a bit. A geometry with
/// `contype == 0` initiates nothing, but a partner whose `contype` meets its
/// `conaffinity` still pairs with it.
#[inline]
pub fn eligible(a: &GeomDesc, b: &GeomDesc) -> bool {
    if a.body == b.body {
        return false;
    }
    (a.contype & b.conaffinity) != 0 || (b.contype & a.conaffinity) != 0
}

/// Order geometries `i` and `j` by type precedence, ties by index.
#[inline]
pub fn canonical_pair(geoms: &[GeomDesc], precedence: &TypePrecedence, i: u32, j: u32, world: u32) -> CollisionPair {
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    let lo_kind = geoms[lo as usize].kind;
    let hi_kind = geoms[hi as usize].kind;
    if precedence.rank(hi_kind) < precedence.rank(lo_kind) {
        CollisionPair::new(hi, lo, world)
    } else {
        CollisionPair::new(lo, hi, world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GeomType;

    #[test]
    fn test_same_body_rejected() {
        let a = GeomDesc::sphere(4, 1.0);
        let b = GeomDesc::sphere(4, 1.0);
        assert!(!eligible(&a, &b));
    }

    #[test]
    fn test_affinity_one_direction_is_enough() {
        let a = GeomDesc::sphere(1, 1.0).with_affinity(0b01, 0b00);
        let b = GeomDesc::sphere(2, 1.0).with_affinity(0b10, 0b01);
        // a.contype & b.conaffinity = 0b01
        assert!(eligible(&a, &b));
        assert!(eligible(&b, &a));
    }

    #[test]
    fn test_affinity_disjoint_groups() {
        let a = GeomDesc::sphere(1, 1.0).with_affinity(0b01, 0b01);
        let b = GeomDesc::sphere(2, 1.0).with_affinity(0b10, 0b10);
        assert!(!eligible(&a, &b));
    }

    #[test]
    fn test_zero_contype_never_collides_with_zero_contype() {
        let a = GeomDesc::sphere(1, 1.0).with_affinity(0, u32::MAX);
        let b = GeomDesc::sphere(2, 1.0).with_affinity(0, u32::MAX);
        assert!(!eligible(&a, &b));
    }

    #[test]
    fn test_canonical_order_by_type_then_index() {
        let geoms = [
            GeomDesc::new(GeomType::Box, 1, 1.0),
            GeomDesc::new(GeomType::Sphere, 2, 1.0),
            GeomDesc::new(GeomType::Sphere, 3, 1.0),
        ];
        let p = TypePrecedence::default();
        assert_eq!(canonical_pair(&geoms, &p, 0, 1, 0), CollisionPair::new(1, 0, 0));
        assert_eq!(canonical_pair(&geoms, &p, 1, 0, 0), CollisionPair::new(1, 0, 0));
        assert_eq!(canonical_pair(&geoms, &p, 2, 1, 7), CollisionPair::new(1, 2, 7));
    }
}
