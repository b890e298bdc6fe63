use thiserror::Error;

/// Construction-time failures. Evaluation passes themselves never fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadphaseError {
    #[error("number of worlds must be at least 1")]
    NoWorlds,

    #[error("output capacity must be at least 1")]
    ZeroCapacity,

    #[error("`{name}` has length {actual}, expected {expected}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unknown geometry type tag {0}")]
    UnknownGeomType(i32),

    #[error("precedence order must list every geometry type exactly once")]
    InvalidPrecedence,

    #[error("{0} geometries do not fit a 32-bit index")]
    TooManyGeoms(usize),

    #[error(
        "state has {actual_worlds} worlds x {actual_geoms} geoms, expected {expected_worlds} x {expected_geoms}"
    )]
    StateMismatch {
        expected_worlds: usize,
        expected_geoms: usize,
        actual_worlds: usize,
        actual_geoms: usize,
    },
}

pub type Result<T> = std::result::Result<T, BroadphaseError>;
