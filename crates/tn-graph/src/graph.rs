//! City graph representation and builder.
//!
//! # Data layout
//!
//! Edges live once in an arena (`Vec<Edge>`, indexed by `EdgeId`).  Every
//! vertex owns a growable list of [`Incidence`] records, and each undirected
//! edge is materialized in **both** endpoint lists.  Iterating a vertex's
//! neighbours is therefore O(degree) with no hashing:
//!
//! ```text
//! adjacency[v] = [ (edge e0, to u0), (edge e1, to u1), ... ]
//! ```
//!
//! Nothing is freed individually; the arena and adjacency are dropped with
//! the graph.
//!
//! # Regions
//!
//! Regions are derived from the nodes' region tags when the builder is frozen
//! ([`CityGraphBuilder::build`]).  To change membership, thaw the graph with
//! [`CityGraph::into_builder`], edit, and build again.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps a planar [`Point`] to the nearest `NodeId`.
//! Used to snap arbitrary coordinates (addresses, clicks) to graph vertices.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use tn_core::{EdgeId, NodeId, Point, RegionId, RegionTag, TransportMode};

use crate::cost::EdgeCost;
use crate::{GraphError, GraphResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        Point::new(self.point[0], self.point[1]).distance_2(Point::new(point[0], point[1]))
    }
}

// ── Nodes ─────────────────────────────────────────────────────────────────────

/// A vertex of the city graph (a street crossing or stop).
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Unique external identifier, e.g. `"node_3_7"`.
    pub key: String,
    pub location: Point,
    /// Modes a traveller can use from this node.  Informational; the router
    /// decides availability from edge transport types.
    pub transport_options: Vec<TransportMode>,
    /// Region membership, if any.
    pub region: Option<RegionTag>,
}

impl Node {
    pub fn new(key: impl Into<String>, location: Point) -> Self {
        Self {
            key: key.into(),
            location,
            transport_options: Vec::new(),
            region: None,
        }
    }

    pub fn in_region(mut self, tag: impl Into<RegionTag>) -> Self {
        self.region = Some(tag.into());
        self
    }

    pub fn with_options(mut self, options: impl IntoIterator<Item = TransportMode>) -> Self {
        self.transport_options = options.into_iter().collect();
        self
    }
}

// ── Edges ─────────────────────────────────────────────────────────────────────

/// Counts of properties along a street, by land use.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandUse {
    pub residential: u32,
    pub commercial:  u32,
    pub touristic:   u32,
    pub industrial:  u32,
}

impl LandUse {
    pub fn total(&self) -> u32 {
        self.residential + self.commercial + self.touristic + self.industrial
    }
}

impl std::ops::AddAssign for LandUse {
    fn add_assign(&mut self, rhs: Self) {
        self.residential += rhs.residential;
        self.commercial  += rhs.commercial;
        self.touristic   += rhs.touristic;
        self.industrial  += rhs.industrial;
    }
}

/// The weight bundle carried by every edge.
///
/// Different algorithms read different attributes (excavation cost for
/// network design, distance for routing), so none of them is "the" weight;
/// see [`crate::cost`].
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeAttrs {
    /// Physical length in metres.
    pub distance: f64,
    /// Monetary price of traversal as recorded in the source data.
    pub price: f64,
    /// Recorded traversal time (source-data units).
    pub time: f64,
    /// Cost of excavating a metro tunnel along this edge, if surveyed.
    pub excavation: Option<f64>,
    /// Speed limit, if known.
    pub max_speed: Option<f64>,
    pub land_use: LandUse,
}

impl EdgeAttrs {
    pub fn new(distance: f64, price: f64, time: f64) -> Self {
        Self {
            distance,
            price,
            time,
            excavation: None,
            max_speed: None,
            land_use: LandUse::default(),
        }
    }

    pub fn with_excavation(mut self, cost: f64) -> Self {
        self.excavation = Some(cost);
        self
    }

    pub fn with_max_speed(mut self, speed: f64) -> Self {
        self.max_speed = Some(speed);
        self
    }

    pub fn with_land_use(mut self, land_use: LandUse) -> Self {
        self.land_use = land_use;
        self
    }

    /// First attribute that is negative or non-finite, as `(name, value)`.
    fn first_invalid(&self) -> Option<(&'static str, f64)> {
        let mut checks = vec![
            ("distance", self.distance),
            ("price", self.price),
            ("time", self.time),
        ];
        if let Some(v) = self.excavation {
            checks.push(("excavation", v));
        }
        if let Some(v) = self.max_speed {
            checks.push(("max_speed", v));
        }
        checks.into_iter().find(|&(_, v)| !(v.is_finite() && v >= 0.0))
    }
}

/// An undirected edge.  `a`/`b` keep the order given at insertion but carry
/// no direction.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub a: NodeId,
    pub b: NodeId,
    pub mode: TransportMode,
    pub attrs: EdgeAttrs,
}

impl Edge {
    /// The endpoint opposite `v`.  `v` must be one of the endpoints.
    #[inline]
    pub fn other(&self, v: NodeId) -> NodeId {
        debug_assert!(v == self.a || v == self.b);
        if v == self.a { self.b } else { self.a }
    }

    /// `true` if the edge joins `x` and `y` in either orientation.
    #[inline]
    pub fn connects(&self, x: NodeId, y: NodeId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    /// Endpoints as `(lower, higher)`, the direction-agnostic identity.
    #[inline]
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        unordered(self.a, self.b)
    }
}

/// One entry of a vertex's adjacency list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Incidence {
    pub edge: EdgeId,
    /// The neighbour reached through `edge`.
    pub to: NodeId,
}

#[inline]
fn unordered(x: NodeId, y: NodeId) -> (NodeId, NodeId) {
    if x <= y { (x, y) } else { (y, x) }
}

// ── Regions ───────────────────────────────────────────────────────────────────

/// A group of nodes sharing a region tag.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub id: RegionId,
    pub tag: RegionTag,
    /// Members in node-insertion order.
    pub members: Vec<NodeId>,
}

impl Region {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }
}

fn derive_regions(nodes: &[Node]) -> (Vec<Region>, Vec<Option<RegionId>>) {
    let mut regions: Vec<Region> = Vec::new();
    let mut by_tag: FxHashMap<&RegionTag, RegionId> = FxHashMap::default();
    let mut region_of = vec![None; nodes.len()];

    for (i, node) in nodes.iter().enumerate() {
        let Some(tag) = node.region.as_ref() else { continue };
        let id = *by_tag.entry(tag).or_insert_with(|| {
            let id = RegionId(regions.len() as u32);
            regions.push(Region { id, tag: tag.clone(), members: Vec::new() });
            id
        });
        regions[id.index()].members.push(NodeId(i as u32));
        region_of[i] = Some(id);
    }
    (regions, region_of)
}

// ── CityGraph ─────────────────────────────────────────────────────────────────

/// Read-only multi-modal city graph.
///
/// Do not construct directly; use [`CityGraphBuilder`].
pub struct CityGraph {
    nodes:       Vec<Node>,
    edges:       Vec<Edge>,
    adjacency:   Vec<Vec<Incidence>>,
    key_index:   FxHashMap<String, NodeId>,
    regions:     Vec<Region>,
    region_of:   Vec<Option<RegionId>>,
    spatial_idx: RTree<NodeEntry>,
}

impl CityGraph {
    /// Construct an empty graph with no nodes or edges.
    pub fn empty() -> Self {
        CityGraphBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.nodes.len()
    }

    // ── Node / edge access ────────────────────────────────────────────────

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Iterator over every `NodeId` in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId(i as u32))
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up a node by its external key.
    pub fn node_by_key(&self, key: &str) -> Option<NodeId> {
        self.key_index.get(key).copied()
    }

    /// Like [`node_by_key`](Self::node_by_key) but with a typed error.
    pub fn require_key(&self, key: &str) -> GraphResult<NodeId> {
        self.node_by_key(key)
            .ok_or_else(|| GraphError::UnknownNodeKey(key.to_owned()))
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// All edges incident to `node`, each seen from `node`'s side.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> &[Incidence] {
        &self.adjacency[node.index()]
    }

    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency[node.index()].len()
    }

    /// Every edge joining `x` and `y`, regardless of orientation or mode.
    pub fn edges_between(&self, x: NodeId, y: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacency[x.index()]
            .iter()
            .filter(move |inc| inc.to == y)
            .map(|inc| &self.edges[inc.edge.index()])
    }

    /// The edge of transport type `mode` joining `x` and `y`, if any.
    pub fn find_edge(&self, x: NodeId, y: NodeId, mode: TransportMode) -> Option<&Edge> {
        self.edges_between(x, y).find(|e| e.mode == mode)
    }

    // ── Regions ───────────────────────────────────────────────────────────

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id.index()]
    }

    pub fn region_of(&self, node: NodeId) -> Option<RegionId> {
        self.region_of[node.index()]
    }

    // ── Input validation ──────────────────────────────────────────────────

    /// Check that every edge carries the attributes `cost` reads.
    ///
    /// Must pass before the cost function drives any algorithm; a missing
    /// attribute is malformed input, not a per-unit failure.
    pub fn validate_cost<C: EdgeCost + ?Sized>(&self, cost: &C) -> GraphResult<()> {
        for edge in &self.edges {
            cost.check(edge)
                .map_err(|attribute| GraphError::MissingAttribute { edge: edge.id, attribute })?;
        }
        Ok(())
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` nearest to `pos`.
    ///
    /// Returns `None` only if the graph has no nodes.
    pub fn snap_to_node(&self, pos: Point) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&pos.as_array())
            .map(|e| e.id)
    }

    /// Return up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: Point, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&pos.as_array())
            .take(k)
            .map(|e| e.id)
            .collect()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Thaw the graph back into a builder (ids are preserved).  Regions are
    /// recomputed on the next [`CityGraphBuilder::build`].
    pub fn into_builder(self) -> CityGraphBuilder {
        let edge_keys = self
            .edges
            .iter()
            .map(|e| {
                let (lo, hi) = e.endpoints();
                (lo, hi, e.mode)
            })
            .collect();
        CityGraphBuilder {
            nodes:     self.nodes,
            edges:     self.edges,
            adjacency: self.adjacency,
            key_index: self.key_index,
            edge_keys,
        }
    }
}

impl Default for CityGraph {
    fn default() -> Self {
        Self::empty()
    }
}

// ── CityGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`CityGraph`] incrementally, then call [`build`](Self::build).
///
/// Every insertion is validated immediately: duplicate keys, dangling
/// endpoints, self-loops, invalid attributes and duplicate edges fail fast.
///
/// # Example
///
/// ```
/// use tn_core::{Point, TransportMode};
/// use tn_graph::{CityGraphBuilder, EdgeAttrs, Node};
///
/// let mut b = CityGraphBuilder::new();
/// let a = b.add_node(Node::new("a", Point::new(0.0, 0.0)).in_region("north")).unwrap();
/// let c = b.add_node(Node::new("c", Point::new(200.0, 0.0)).in_region("north")).unwrap();
/// b.add_edge(a, c, TransportMode::Walk, EdgeAttrs::new(200.0, 0.0, 2.4)).unwrap();
/// // Same street, same mode, other orientation: rejected.
/// assert!(b.add_edge(c, a, TransportMode::Walk, EdgeAttrs::new(200.0, 0.0, 2.4)).is_err());
/// let g = b.build();
/// assert_eq!(g.edge_count(), 1);
/// assert_eq!(g.degree(a), 1);
/// assert_eq!(g.degree(c), 1);
/// assert_eq!(g.regions().len(), 1);
/// ```
#[derive(Default)]
pub struct CityGraphBuilder {
    nodes:     Vec<Node>,
    edges:     Vec<Edge>,
    adjacency: Vec<Vec<Incidence>>,
    key_index: FxHashMap<String, NodeId>,
    edge_keys: FxHashSet<(NodeId, NodeId, TransportMode)>,
}

impl CityGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            edges:     Vec::with_capacity(edges),
            adjacency: Vec::with_capacity(nodes),
            key_index: FxHashMap::with_capacity_and_hasher(nodes, Default::default()),
            edge_keys: FxHashSet::with_capacity_and_hasher(edges, Default::default()),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, node: Node) -> GraphResult<NodeId> {
        if self.key_index.contains_key(&node.key) {
            return Err(GraphError::DuplicateNode(node.key));
        }
        let id = NodeId(self.nodes.len() as u32);
        self.key_index.insert(node.key.clone(), id);
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        Ok(id)
    }

    /// Add an undirected edge of transport type `mode`.
    ///
    /// The edge is recorded in both endpoints' adjacency lists.  Fails if an
    /// edge of the same mode already joins the two endpoints (in either
    /// orientation); duplicates are rejected, never merged.
    pub fn add_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        mode: TransportMode,
        attrs: EdgeAttrs,
    ) -> GraphResult<EdgeId> {
        self.check_node(a)?;
        self.check_node(b)?;
        if a == b {
            return Err(GraphError::SelfLoop(self.nodes[a.index()].key.clone()));
        }
        if let Some((attribute, value)) = attrs.first_invalid() {
            return Err(GraphError::InvalidAttribute {
                a: self.nodes[a.index()].key.clone(),
                b: self.nodes[b.index()].key.clone(),
                attribute,
                value,
            });
        }
        let (lo, hi) = unordered(a, b);
        if !self.edge_keys.insert((lo, hi, mode)) {
            return Err(GraphError::DuplicateEdge {
                a: self.nodes[a.index()].key.clone(),
                b: self.nodes[b.index()].key.clone(),
                mode,
            });
        }

        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge { id, a, b, mode, attrs });
        self.adjacency[a.index()].push(Incidence { edge: id, to: b });
        self.adjacency[b.index()].push(Incidence { edge: id, to: a });
        Ok(id)
    }

    /// Convenience: [`add_edge`](Self::add_edge) addressed by node keys.
    pub fn add_edge_by_key(
        &mut self,
        a: &str,
        b: &str,
        mode: TransportMode,
        attrs: EdgeAttrs,
    ) -> GraphResult<EdgeId> {
        let a = self.require_key(a)?;
        let b = self.require_key(b)?;
        self.add_edge(a, b, mode, attrs)
    }

    /// Change (or clear) a node's region tag.
    pub fn set_region(&mut self, node: NodeId, tag: Option<RegionTag>) -> GraphResult<()> {
        self.check_node(node)?;
        self.nodes[node.index()].region = tag;
        Ok(())
    }

    /// `true` if an edge of `mode` already joins `a` and `b`.
    pub fn has_edge(&self, a: NodeId, b: NodeId, mode: TransportMode) -> bool {
        let (lo, hi) = unordered(a, b);
        self.edge_keys.contains(&(lo, hi, mode))
    }

    /// The edge of `mode` joining `a` and `b` added so far, in either
    /// orientation.
    pub fn find_edge(&self, a: NodeId, b: NodeId, mode: TransportMode) -> Option<&Edge> {
        self.adjacency
            .get(a.index())?
            .iter()
            .filter(|inc| inc.to == b)
            .map(|inc| &self.edges[inc.edge.index()])
            .find(|e| e.mode == mode)
    }

    pub fn node_by_key(&self, key: &str) -> Option<NodeId> {
        self.key_index.get(key).copied()
    }

    /// Look up the position of a node added earlier.
    pub fn node_location(&self, id: NodeId) -> Point {
        self.nodes[id.index()].location
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    fn check_node(&self, node: NodeId) -> GraphResult<()> {
        if node.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::NodeNotFound(node))
        }
    }

    fn require_key(&self, key: &str) -> GraphResult<NodeId> {
        self.node_by_key(key)
            .ok_or_else(|| GraphError::UnknownNodeKey(key.to_owned()))
    }

    /// Consume the builder and produce a [`CityGraph`].
    ///
    /// Derives regions by grouping nodes on their tag and bulk-loads the
    /// R-tree: O(N log N).
    pub fn build(self) -> CityGraph {
        let (regions, region_of) = derive_regions(&self.nodes);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| NodeEntry {
                point: node.location.as_array(),
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        CityGraph {
            nodes: self.nodes,
            edges: self.edges,
            adjacency: self.adjacency,
            key_index: self.key_index,
            regions,
            region_of,
            spatial_idx,
        }
    }
}
