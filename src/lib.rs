//! # fsnet
//!
//! Networks of functional systems: small stateful units that activate on a
//! recognized problem condition, predict a goal condition, and fail when the
//! goal does not follow within their expected time.
//!
//! The network grows by trial and error. When no existing unit explains the
//! current context it spawns a tentative unit; tentative units that precede a
//! reached goal are kept as permanent experience, the rest expire.
//!
//! ## Quick Start
//!
//! ```
//! use fsnet::prelude::*;
//!
//! let mut net = Network::new(NetworkConfig::default().with_seed(42)).unwrap();
//! let roles = net.init_ctrl_net(2, 2, 1);
//! let (a, b, goal) = (roles.inputs[0], roles.inputs[1], roles.goals[0]);
//!
//! // The goal unit engages in state (1, 0) and expects state (0, 1).
//! net.add_action_pattern(goal, &[(a, 1.0), (b, 0.0)]).unwrap();
//! net.add_prediction_pattern(goal, &[(a, 0.0), (b, 1.0)]).unwrap();
//!
//! for t in 0..5 {
//!     net.step(t as f32, [(a, 1.0), (b, 0.0)]).unwrap();
//! }
//! assert!(!net.working_memory().is_empty());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Serialize configs, units and snapshots; JSON config
//!   loading via `serde_json`
//!
//! ## Modules
//!
//! - [`unit`]: The functional-system state machine
//! - [`network`]: Unit arena, links and the per-tick update cycle
//! - [`aggregate`]: Weighted sum, radial basis and exact-match aggregation
//! - [`observer`]: Read-only snapshots and graph export

#[path = "core/aggregate.rs"]
pub mod aggregate;

#[path = "core/error.rs"]
pub mod error;

#[path = "core/learning.rs"]
mod learning;

#[path = "core/network.rs"]
pub mod network;

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/unit.rs"]
pub mod unit;

pub mod observer;

/// Prelude module for convenient imports.
///
/// ```
/// use fsnet::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{NetworkError, Result};
    pub use crate::network::{
        ActivationMap, Diagnostics, HistoryFrame, Network, NetworkConfig, Role, Roles,
    };
    pub use crate::observer::{EdgeKind, GraphSnapshot, NetworkAdapter, NetworkSnapshot};
    pub use crate::prng::{Prng, RandomSource};
    pub use crate::unit::{Time, Unit, UnitId, UnitParams, UnitState};
}
