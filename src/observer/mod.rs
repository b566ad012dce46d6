#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::network::{Diagnostics, Network, Role};
use crate::prng::RandomSource;
use crate::unit::{Time, Unit, UnitId, UnitState, WeightMap};

/// A read-only snapshot of what the network is doing.
///
/// Observers cannot mutate the network. Snapshots are taken on demand and
/// allocate; the tick loop is unaffected.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NetworkSnapshot {
    pub time: Time,
    pub diagnostics: Diagnostics,

    pub activated: Vec<UnitId>,
    pub failed: Vec<UnitId>,
    pub matched: Vec<UnitId>,
    pub used: Vec<UnitId>,
    pub learning: Vec<UnitId>,
    pub working_memory: Vec<UnitId>,
}

/// Where a node sits in the network. `Tentative` marks working memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeKind {
    Input,
    Goal,
    Hidden,
    Output,
    Tentative,
}

impl From<Role> for NodeKind {
    fn from(role: Role) -> Self {
        match role {
            Role::Input => NodeKind::Input,
            Role::Goal => NodeKind::Goal,
            Role::Hidden => NodeKind::Hidden,
            Role::Output => NodeKind::Output,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeView {
    pub id: UnitId,
    pub kind: NodeKind,
    pub state: UnitState,
    pub activity: f32,
    pub mismatch: f32,
    pub parent_id: Option<UnitId>,
}

/// The four synapse families between units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EdgeKind {
    /// Action: source is part of the target's problem condition.
    Problem,
    /// Prediction: source is part of the target's goal condition.
    Goal,
    Lateral,
    Control,
}

/// Directed edge `source -> target`; the target owns the weight.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeView {
    pub kind: EdgeKind,
    pub source: UnitId,
    pub target: UnitId,
    pub weight: f32,
    pub centroid: Option<f32>,
}

/// The network as a directed multigraph, ready for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

impl GraphSnapshot {
    pub fn edges_of(&self, kind: EdgeKind) -> impl Iterator<Item = &EdgeView> + '_ {
        self.edges.iter().filter(move |e| e.kind == kind)
    }
}

#[cfg(feature = "serde")]
impl NetworkSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(feature = "serde")]
impl GraphSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub struct NetworkAdapter<'a, R: RandomSource> {
    net: &'a Network<R>,
}

impl<'a, R: RandomSource> NetworkAdapter<'a, R> {
    pub fn new(net: &'a Network<R>) -> Self {
        Self { net }
    }

    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            time: self.net.time(),
            diagnostics: self.net.diagnostics(),
            activated: self.net.activated_fs().to_vec(),
            failed: self.net.failed_fs().to_vec(),
            matched: self.net.matched_fs().to_vec(),
            used: self.net.used_fs().to_vec(),
            learning: self.net.learning_fs().to_vec(),
            working_memory: self.net.working_memory().iter().copied().collect(),
        }
    }

    pub fn graph(&self) -> GraphSnapshot {
        let mut graph = GraphSnapshot::default();
        for (&id, unit) in self.net.units() {
            let kind = self
                .net
                .role(id)
                .map(NodeKind::from)
                .unwrap_or(NodeKind::Tentative);
            graph.nodes.push(NodeView {
                id,
                kind,
                state: unit.state(),
                activity: unit.activity,
                mismatch: unit.mismatch,
                parent_id: unit.parent_id,
            });
            push_edges(&mut graph.edges, unit, EdgeKind::Problem);
            push_edges(&mut graph.edges, unit, EdgeKind::Goal);
            push_edges(&mut graph.edges, unit, EdgeKind::Lateral);
            push_edges(&mut graph.edges, unit, EdgeKind::Control);
        }
        graph
    }
}

fn push_edges(edges: &mut Vec<EdgeView>, unit: &Unit, kind: EdgeKind) {
    let (weights, centroids): (&WeightMap, Option<&WeightMap>) = match kind {
        EdgeKind::Problem => (&unit.problem_weights, Some(&unit.problem_values)),
        EdgeKind::Goal => (&unit.goal_weights, Some(&unit.goal_values)),
        EdgeKind::Lateral => (&unit.lateral_weights, None),
        EdgeKind::Control => (&unit.control_weights, None),
    };
    edges.extend(weights.iter().map(|(&source, &weight)| EdgeView {
        kind,
        source,
        target: unit.id,
        weight,
        centroid: centroids.and_then(|c| c.get(&source).copied()),
    }));
}
