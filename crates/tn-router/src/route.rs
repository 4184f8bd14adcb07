//! Route result types.

use tn_core::{EdgeId, NodeId, TransportMode};

/// One edge traversal of a route.
#[derive(Clone, Debug, PartialEq)]
pub struct ModalStep {
    pub edge: EdgeId,
    /// Vertex reached by this step.
    pub to: NodeId,
    /// Mode the traveller was in on this edge.
    pub mode: TransportMode,
    /// Minutes spent on the edge.
    pub time: f64,
    /// Money charged for the edge (fare on boarding, taxi meter).
    pub cost: f64,
}

/// A fastest route found within budget.
#[derive(Clone, Debug, PartialEq)]
pub struct ModalRoute {
    /// Vertices in visiting order, origin first.
    pub nodes: Vec<NodeId>,
    /// `steps[i]` goes from `nodes[i]` to `nodes[i + 1]`.
    pub steps: Vec<ModalStep>,
    /// Minutes.
    pub total_time: f64,
    pub total_cost: f64,
}

/// Consecutive steps ridden in the same mode.
#[derive(Clone, Debug, PartialEq)]
pub struct Leg {
    pub mode: TransportMode,
    pub from: NodeId,
    pub to: NodeId,
    pub edges: Vec<EdgeId>,
    pub time: f64,
    pub cost: f64,
}

impl ModalRoute {
    /// Zero-length route at `node`.
    pub fn trivial(node: NodeId) -> Self {
        Self { nodes: vec![node], steps: Vec::new(), total_time: 0.0, total_cost: 0.0 }
    }

    pub fn is_trivial(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn origin(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn destination(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Modes used, in order, without repeats of consecutive modes.
    pub fn modes(&self) -> Vec<TransportMode> {
        self.legs().into_iter().map(|l| l.mode).collect()
    }

    /// Group steps into legs of a single mode.
    pub fn legs(&self) -> Vec<Leg> {
        let mut legs: Vec<Leg> = Vec::new();
        let mut from = self.origin();
        for step in &self.steps {
            match legs.last_mut() {
                Some(leg) if leg.mode == step.mode => {
                    leg.to = step.to;
                    leg.edges.push(step.edge);
                    leg.time += step.time;
                    leg.cost += step.cost;
                }
                _ => legs.push(Leg {
                    mode: step.mode,
                    from,
                    to: step.to,
                    edges: vec![step.edge],
                    time: step.time,
                    cost: step.cost,
                }),
            }
            from = step.to;
        }
        legs
    }
}
