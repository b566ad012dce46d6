use thiserror::Error;

use crate::unit::UnitId;

/// Errors raised by network setup and the per-tick entry points.
///
/// Dynamics never fail: an empty input is "no signal", not an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    #[error("unit {0} is not an input unit")]
    NotAnInput(UnitId),

    #[error("input value {value} for unit {id} is outside [0, 1]")]
    InputOutOfRange { id: UnitId, value: f32 },

    /// A weight map names a unit that is no longer in the network.
    #[error("unit {owner} references missing unit {missing}")]
    DanglingReference { owner: UnitId, missing: UnitId },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("config parse error: {0}")]
    ConfigParse(String),
}

pub type Result<T> = core::result::Result<T, NetworkError>;
