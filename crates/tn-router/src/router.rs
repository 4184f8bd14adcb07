//! Routing trait and the budget-constrained multi-modal search.
//!
//! # Transition rules
//!
//! | Edge type | Current mode  | Result                                        |
//! |-----------|---------------|-----------------------------------------------|
//! | `walk`    | any           | walk, free                                    |
//! | `metro`   | not metro     | metro, flat metro fare                        |
//! | `metro`   | metro         | metro, free                                   |
//! | `bus`     | not bus       | bus, flat bus fare                            |
//! | `bus`     | bus           | bus, free                                     |
//! | `taxi`    | taxi          | taxi, metered `rate × km`                     |
//! | `taxi`    | not taxi      | taxi, `max(min fare, rate × km)` **or** walk  |
//!
//! Edge time is the edge's distance at the mode's average speed
//! ([`TransitConfig::travel_minutes`]), not the recorded `time` attribute.
//! A move whose cumulative spend would exceed the budget is never queued.
//!
//! # Search
//!
//! States are popped in order of elapsed time.  The first popped state at the
//! destination is the answer.  A popped state is discarded if an earlier pop
//! at the same `(vertex, mode)` spent no more money: that earlier state was
//! at least as fast and at least as cheap.  Every state carries its own trail
//! of steps, shared with its ancestors through `Rc`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

use tracing::debug;

use tn_core::{NodeId, TransitConfig, TransportMode};
use tn_graph::{CityGraph, Edge};

use crate::route::{ModalRoute, ModalStep};
use crate::{RouterError, RouterResult};

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implementations must be `Send + Sync` so one router can serve queries
/// from several threads over a shared graph.
pub trait Router: Send + Sync {
    /// Fastest route from `from` to `to` spending at most `budget`.
    ///
    /// `Ok(None)` if no route fits the budget.  `from == to` yields a
    /// zero-time, zero-cost route.
    fn route(
        &self,
        graph: &CityGraph,
        from: NodeId,
        to: NodeId,
        budget: f64,
    ) -> RouterResult<Option<ModalRoute>>;

    /// [`route`](Self::route) addressed by node keys.
    fn route_by_key(
        &self,
        graph: &CityGraph,
        from: &str,
        to: &str,
        budget: f64,
    ) -> RouterResult<Option<ModalRoute>> {
        let lookup = |key: &str| graph.node_by_key(key).ok_or_else(|| RouterError::UnknownNodeKey(key.to_owned()));
        self.route(graph, lookup(from)?, lookup(to)?, budget)
    }
}

// ── BudgetRouter ──────────────────────────────────────────────────────────────

/// Time-ordered label search over `(vertex, mode)` with money dominance.
#[derive(Clone, Debug, Default)]
pub struct BudgetRouter {
    config: TransitConfig,
}

impl BudgetRouter {
    /// Validate `config` and build a router on it.
    pub fn new(config: TransitConfig) -> RouterResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TransitConfig {
        &self.config
    }

    /// Every move available from `mode` across `edge`: `(new mode, minutes,
    /// money)`.
    fn moves(&self, edge: &Edge, mode: TransportMode) -> Moves {
        let cfg = &self.config;
        let d = edge.attrs.distance;
        let ride = |m: TransportMode, cost: f64| (m, cfg.travel_minutes(m, d), cost);
        let walk = ride(TransportMode::Walk, 0.0);

        match edge.mode {
            TransportMode::Walk => Moves::one(walk),
            TransportMode::Metro | TransportMode::Bus => {
                let fare = if mode == edge.mode { 0.0 } else { cfg.flat_fare(edge.mode).unwrap_or(0.0) };
                Moves::one(ride(edge.mode, fare))
            }
            TransportMode::Taxi if mode == TransportMode::Taxi => {
                Moves::one(ride(TransportMode::Taxi, cfg.taxi_fare(d, false)))
            }
            TransportMode::Taxi => Moves::two(ride(TransportMode::Taxi, cfg.taxi_fare(d, true)), walk),
        }
    }
}

impl Router for BudgetRouter {
    fn route(
        &self,
        graph: &CityGraph,
        from: NodeId,
        to: NodeId,
        budget: f64,
    ) -> RouterResult<Option<ModalRoute>> {
        if !(budget.is_finite() && budget >= 0.0) {
            return Err(RouterError::InvalidBudget(budget));
        }
        for node in [from, to] {
            if !graph.contains_node(node) {
                return Err(RouterError::NodeNotFound(node));
            }
        }
        if from == to {
            return Ok(Some(ModalRoute::trivial(from)));
        }
        Ok(self.search(graph, from, to, budget))
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

type Move = (TransportMode, f64, f64);

/// At most two moves per edge; avoids allocating in the inner loop.
struct Moves {
    first:  Move,
    second: Option<Move>,
}

impl Moves {
    fn one(m: Move) -> Self {
        Self { first: m, second: None }
    }

    fn two(a: Move, b: Move) -> Self {
        Self { first: a, second: Some(b) }
    }

    fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        std::iter::once(self.first).chain(self.second)
    }
}

/// Persistent list of steps, newest first.
struct Trail {
    step: ModalStep,
    prev: Option<Rc<Trail>>,
}

struct Label {
    time:  f64,
    money: f64,
    node:  NodeId,
    mode:  TransportMode,
    /// Push order; final tie-breaker.
    seq:   u64,
    trail: Option<Rc<Trail>>,
}

// BinaryHeap is a max-heap: invert so the smallest (time, money, seq) pops first.
impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.money.total_cmp(&self.money))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Label {}

impl BudgetRouter {
    fn search(&self, graph: &CityGraph, from: NodeId, to: NodeId, budget: f64) -> Option<ModalRoute> {
        // settled[v][mode] = least money of any popped state at (v, mode).
        let mut settled = vec![[f64::INFINITY; 4]; graph.node_count()];
        let mut heap = BinaryHeap::new();
        let mut seq = 0u64;
        let mut popped = 0usize;

        heap.push(Label { time: 0.0, money: 0.0, node: from, mode: TransportMode::Walk, seq, trail: None });

        while let Some(label) = heap.pop() {
            popped += 1;
            if label.node == to {
                debug!(%from, %to, budget, popped, time = label.time, money = label.money, "route found");
                return Some(finish(from, label));
            }

            let best = &mut settled[label.node.index()][label.mode.index()];
            if *best <= label.money {
                continue;
            }
            *best = label.money;

            for inc in graph.neighbors(label.node) {
                let edge = graph.edge(inc.edge);
                for (mode, minutes, cost) in self.moves(edge, label.mode).iter() {
                    let money = label.money + cost;
                    if money > budget || settled[inc.to.index()][mode.index()] <= money {
                        continue;
                    }
                    seq += 1;
                    let step = ModalStep { edge: inc.edge, to: inc.to, mode, time: minutes, cost };
                    heap.push(Label {
                        time: label.time + minutes,
                        money,
                        node: inc.to,
                        mode,
                        seq,
                        trail: Some(Rc::new(Trail { step, prev: label.trail.clone() })),
                    });
                }
            }
        }

        debug!(%from, %to, budget, popped, "no route within budget");
        None
    }
}

/// Unwind the winning label's trail into a route.
fn finish(from: NodeId, label: Label) -> ModalRoute {
    let mut steps = Vec::new();
    let mut cur = label.trail;
    while let Some(t) = cur {
        steps.push(t.step.clone());
        cur = t.prev.clone();
    }
    steps.reverse();

    let mut nodes = Vec::with_capacity(steps.len() + 1);
    nodes.push(from);
    nodes.extend(steps.iter().map(|s| s.to));

    ModalRoute { nodes, steps, total_time: label.time, total_cost: label.money }
}
