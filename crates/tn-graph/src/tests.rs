//! Unit tests for tn-graph.
//!
//! All tests use hand-crafted graphs or small synthetic grids.

#[cfg(test)]
mod helpers {
    use tn_core::{NodeId, Point, TransportMode};
    use crate::{CityGraph, CityGraphBuilder, EdgeAttrs, Node};

    /// Small multi-modal street graph.
    ///
    /// ```text
    ///   a ──walk+taxi── b ──walk── c
    ///   │                          │
    ///   └────────metro─────────────┘
    /// ```
    ///
    /// a, b in region "north"; c in region "south".
    pub fn street_graph() -> (CityGraph, [NodeId; 3]) {
        let mut b = CityGraphBuilder::new();
        let a = b.add_node(Node::new("a", Point::new(0.0, 0.0)).in_region("north")).unwrap();
        let m = b.add_node(Node::new("b", Point::new(200.0, 0.0)).in_region("north")).unwrap();
        let c = b.add_node(Node::new("c", Point::new(400.0, 0.0)).in_region("south")).unwrap();

        b.add_edge(a, m, TransportMode::Walk, EdgeAttrs::new(200.0, 0.0, 133.0)).unwrap();
        b.add_edge(a, m, TransportMode::Taxi, EdgeAttrs::new(200.0, 0.8, 13.0)).unwrap();
        b.add_edge(m, c, TransportMode::Walk, EdgeAttrs::new(200.0, 0.0, 133.0)).unwrap();
        b.add_edge(a, c, TransportMode::Metro, EdgeAttrs::new(400.0, 4.4, 5.0).with_excavation(900.0))
            .unwrap();
        (b.build(), [a, m, c])
    }
}

// ── Builder & graph structure ────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use tn_core::{NodeId, Point, TransportMode};
    use crate::{CityGraphBuilder, EdgeAttrs, GraphError, Node};

    #[test]
    fn empty_build() {
        let g = CityGraphBuilder::new().build();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
        assert!(g.regions().is_empty());
    }

    #[test]
    fn edges_materialized_both_directions() {
        let (g, [a, b, c]) = super::helpers::street_graph();
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.degree(a), 3); // walk, taxi, metro
        assert_eq!(g.degree(b), 3); // walk, taxi, walk
        assert_eq!(g.degree(c), 2); // walk, metro

        for v in [a, b, c] {
            for inc in g.neighbors(v) {
                let e = g.edge(inc.edge);
                assert!(e.connects(v, inc.to));
                assert_eq!(e.other(v), inc.to);
                // The mirror incidence exists on the other side.
                assert!(g.neighbors(inc.to).iter().any(|back| back.edge == inc.edge && back.to == v));
            }
        }
    }

    #[test]
    fn duplicate_edge_rejected_in_either_orientation() {
        let mut b = CityGraphBuilder::new();
        let x = b.add_node(Node::new("x", Point::new(0.0, 0.0))).unwrap();
        let y = b.add_node(Node::new("y", Point::new(1.0, 0.0))).unwrap();
        b.add_edge(x, y, TransportMode::Taxi, EdgeAttrs::new(1.0, 1.0, 1.0)).unwrap();

        let same = b.add_edge(x, y, TransportMode::Taxi, EdgeAttrs::new(5.0, 5.0, 5.0));
        assert!(matches!(same, Err(GraphError::DuplicateEdge { .. })));
        let reversed = b.add_edge(y, x, TransportMode::Taxi, EdgeAttrs::new(1.0, 1.0, 1.0));
        assert!(matches!(reversed, Err(GraphError::DuplicateEdge { .. })));

        // A different mode on the same street is a different edge.
        assert!(b.add_edge(y, x, TransportMode::Walk, EdgeAttrs::new(1.0, 0.0, 1.0)).is_ok());
        assert_eq!(b.edge_count(), 2);
    }

    #[test]
    fn duplicate_node_and_self_loop_rejected() {
        let mut b = CityGraphBuilder::new();
        let x = b.add_node(Node::new("x", Point::new(0.0, 0.0))).unwrap();
        assert!(matches!(
            b.add_node(Node::new("x", Point::new(9.0, 9.0))),
            Err(GraphError::DuplicateNode(_))
        ));
        assert!(matches!(
            b.add_edge(x, x, TransportMode::Walk, EdgeAttrs::new(1.0, 0.0, 1.0)),
            Err(GraphError::SelfLoop(_))
        ));
    }

    #[test]
    fn dangling_endpoint_rejected() {
        let mut b = CityGraphBuilder::new();
        let x = b.add_node(Node::new("x", Point::new(0.0, 0.0))).unwrap();
        let err = b.add_edge(x, NodeId(7), TransportMode::Walk, EdgeAttrs::new(1.0, 0.0, 1.0));
        assert!(matches!(err, Err(GraphError::NodeNotFound(NodeId(7)))));
        let err = b.add_edge_by_key("x", "nowhere", TransportMode::Walk, EdgeAttrs::new(1.0, 0.0, 1.0));
        assert!(matches!(err, Err(GraphError::UnknownNodeKey(_))));
    }

    #[test]
    fn negative_or_nan_attribute_rejected() {
        let mut b = CityGraphBuilder::new();
        let x = b.add_node(Node::new("x", Point::new(0.0, 0.0))).unwrap();
        let y = b.add_node(Node::new("y", Point::new(1.0, 0.0))).unwrap();
        let err = b.add_edge(x, y, TransportMode::Walk, EdgeAttrs::new(-1.0, 0.0, 1.0));
        assert!(matches!(err, Err(GraphError::InvalidAttribute { attribute: "distance", .. })));
        let err = b.add_edge(x, y, TransportMode::Walk, EdgeAttrs::new(1.0, 0.0, 1.0).with_excavation(f64::NAN));
        assert!(matches!(err, Err(GraphError::InvalidAttribute { attribute: "excavation", .. })));
        assert_eq!(b.edge_count(), 0);
    }

    #[test]
    fn lookups() {
        let (g, [a, b, c]) = super::helpers::street_graph();
        assert_eq!(g.node_by_key("b"), Some(b));
        assert!(g.require_key("zzz").is_err());
        assert_eq!(g.edges_between(a, b).count(), 2);
        assert_eq!(g.edges_between(b, a).count(), 2);
        assert_eq!(g.edges_between(b, c).count(), 1);
        assert!(g.find_edge(c, a, TransportMode::Metro).is_some());
        assert!(g.find_edge(b, c, TransportMode::Taxi).is_none());
    }
}

// ── Regions ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod regions {
    use tn_core::{Point, RegionTag};
    use crate::{CityGraphBuilder, Node};

    #[test]
    fn grouped_by_tag_in_first_appearance_order() {
        let (g, [a, b, c]) = super::helpers::street_graph();
        let regions = g.regions();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].tag, RegionTag::from("north"));
        assert_eq!(regions[0].members, vec![a, b]);
        assert_eq!(regions[1].tag, RegionTag::from("south"));
        assert_eq!(regions[1].members, vec![c]);
        assert_eq!(g.region_of(c), Some(regions[1].id));
    }

    #[test]
    fn untagged_nodes_belong_to_no_region() {
        let mut b = CityGraphBuilder::new();
        let x = b.add_node(Node::new("x", Point::new(0.0, 0.0)).in_region(1)).unwrap();
        let y = b.add_node(Node::new("y", Point::new(1.0, 0.0))).unwrap();
        let g = b.build();
        assert_eq!(g.regions().len(), 1);
        assert_eq!(g.regions()[0].members, vec![x]);
        assert_eq!(g.region_of(y), None);
    }

    #[test]
    fn recomputed_after_retagging() {
        let (g, [a, b, c]) = super::helpers::street_graph();
        let mut builder = g.into_builder();
        builder.set_region(b, Some(RegionTag::from("south"))).unwrap();
        let g = builder.build();
        assert_eq!(g.regions()[0].members, vec![a]);
        assert_eq!(g.regions()[1].members, vec![b, c]);
    }

    #[test]
    fn thawed_builder_keeps_duplicate_protection() {
        use tn_core::TransportMode;
        use crate::{EdgeAttrs, GraphError};

        let (g, [a, b, _]) = super::helpers::street_graph();
        let mut builder = g.into_builder();
        let err = builder.add_edge(b, a, TransportMode::Walk, EdgeAttrs::new(1.0, 0.0, 1.0));
        assert!(matches!(err, Err(GraphError::DuplicateEdge { .. })));
        assert!(builder.add_edge(a, b, TransportMode::Bus, EdgeAttrs::new(200.0, 0.0, 1.0)).is_ok());
    }
}

// ── Cost strategies ──────────────────────────────────────────────────────────

#[cfg(test)]
mod cost {
    use tn_core::TransportMode;
    use crate::{CostAttribute, Edge, EdgeCost, GraphError, LandUse, LandUseWeighted, LandUseWeights, ModeFiltered};

    #[test]
    fn attribute_costs() {
        let (g, [a, _, c]) = super::helpers::street_graph();
        let metro = g.find_edge(a, c, TransportMode::Metro).unwrap();
        assert_eq!(CostAttribute::Distance.cost(metro), 400.0);
        assert_eq!(CostAttribute::Price.cost(metro), 4.4);
        assert_eq!(CostAttribute::Time.cost(metro), 5.0);
        assert_eq!(CostAttribute::Excavation.cost(metro), 900.0);
    }

    #[test]
    fn missing_excavation_is_infinite_and_fails_validation() {
        let (g, [a, b, _]) = super::helpers::street_graph();
        let walk = g.find_edge(a, b, TransportMode::Walk).unwrap();
        assert!(CostAttribute::Excavation.cost(walk).is_infinite());
        assert!(matches!(
            g.validate_cost(&CostAttribute::Excavation),
            Err(GraphError::MissingAttribute { attribute: "excavation", .. })
        ));
        assert!(g.validate_cost(&CostAttribute::Distance).is_ok());
    }

    #[test]
    fn mode_filter_hides_other_modes() {
        let (g, [a, b, c]) = super::helpers::street_graph();
        let metro_only = ModeFiltered::new([TransportMode::Metro], CostAttribute::Excavation);
        assert!(metro_only.cost(g.find_edge(a, b, TransportMode::Walk).unwrap()).is_infinite());
        assert_eq!(metro_only.cost(g.find_edge(a, c, TransportMode::Metro).unwrap()), 900.0);
        // Walk edges lack excavation but are filtered out, so validation passes.
        assert!(g.validate_cost(&metro_only).is_ok());
    }

    #[test]
    fn closures_are_cost_functions() {
        let (g, _) = super::helpers::street_graph();
        let hops = |_: &Edge| 1.0;
        assert_eq!(g.edges().iter().map(|e| hops.cost(e)).sum::<f64>(), 4.0);
    }

    #[test]
    fn land_use_penalty_added_to_base() {
        let (g, [a, b, _]) = super::helpers::street_graph();
        let mut edge = g.find_edge(a, b, TransportMode::Walk).unwrap().clone();
        edge.attrs.land_use = LandUse { residential: 2, commercial: 0, touristic: 1, industrial: 3 };
        let scenic = LandUseWeighted {
            base: CostAttribute::Distance,
            weights: LandUseWeights { industrial: 10.0, ..Default::default() },
        };
        assert_eq!(scenic.cost(&edge), 230.0);
        assert_eq!(edge.attrs.land_use.total(), 6);
    }
}

// ── Spatial snap ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use tn_core::Point;
    use crate::CityGraphBuilder;

    #[test]
    fn snap_nearest() {
        let (g, [a, b, _]) = super::helpers::street_graph();
        assert_eq!(g.snap_to_node(Point::new(0.0, 0.0)), Some(a));
        assert_eq!(g.snap_to_node(Point::new(90.0, 10.0)), Some(a));
        assert_eq!(g.snap_to_node(Point::new(110.0, -10.0)), Some(b));
    }

    #[test]
    fn k_nearest_order() {
        let (g, [a, b, c]) = super::helpers::street_graph();
        assert_eq!(g.k_nearest_nodes(Point::new(390.0, 0.0), 3), vec![c, b, a]);
    }

    #[test]
    fn empty_graph_returns_none() {
        let g = CityGraphBuilder::new().build();
        assert!(g.snap_to_node(Point::new(0.0, 0.0)).is_none());
    }
}

// ── JSON loader ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::{Cursor, Write};

    use tn_core::{RegionTag, TransportMode};
    use crate::{load_graph_json, load_graph_reader, CostAttribute, GraphError};

    const CITY: &str = r#"{
        "nodes": [
            {"id": "n0", "location": [0, 0], "transport_options": ["taxi", "non_motorized"], "region": "51000"},
            {"id": "n1", "location": [0, 1], "transport_options": ["taxi"], "region": "51000"},
            {"id": "n2", "location": [1, 1], "region": 2}
        ],
        "edges": [
            {"from": "n0", "to": "n1", "transport_type": "walk", "distance": 200, "price_cost": 0, "time_cost": 133.3},
            {"from": "n1", "to": "n0", "transport_type": "walk", "distance": 200, "price_cost": 0, "time_cost": 133.3},
            {"from": "n0", "to": "n1", "transport_type": "taxi", "distance": 200, "price_cost": 0.8,
             "time_cost": 13.3, "max_speed": 15, "num_residencial": 4, "num_commercial": 2},
            {"from": "n1", "to": "n2", "transport_type": "onibus", "distance": 300, "price_cost": 3.5,
             "time_cost": 20, "excavation_cost": 310}
        ]
    }"#;

    #[test]
    fn loads_and_skips_mirrored_records() {
        let (g, report) = load_graph_reader(Cursor::new(CITY)).unwrap();
        assert_eq!(report.nodes, 3);
        assert_eq!(report.edges, 3);
        assert_eq!(report.skipped_duplicates, 1);
        assert_eq!(g.edge_count(), 3);

        let n0 = g.node_by_key("n0").unwrap();
        let n1 = g.node_by_key("n1").unwrap();
        let n2 = g.node_by_key("n2").unwrap();
        assert_eq!(g.node(n0).transport_options, vec![TransportMode::Taxi, TransportMode::Walk]);

        let taxi = g.find_edge(n0, n1, TransportMode::Taxi).unwrap();
        assert_eq!(taxi.attrs.land_use.residential, 4);
        assert_eq!(taxi.attrs.max_speed, Some(15.0));
        let bus = g.find_edge(n1, n2, TransportMode::Bus).unwrap();
        assert_eq!(bus.attrs.excavation, Some(310.0));

        assert_eq!(g.regions().len(), 2);
        assert_eq!(g.regions()[1].tag, RegionTag::Number(2));
    }

    fn two_records(first: (&str, &str, f64), second: (&str, &str, f64)) -> String {
        let edge = |(from, to, d): (&str, &str, f64)| {
            format!(r#"{{"from": "{from}", "to": "{to}", "transport_type": "walk", "distance": {d}, "price_cost": 0, "time_cost": 1}}"#)
        };
        format!(
            r#"{{"nodes": [{{"id": "a", "location": [0,0]}}, {{"id": "b", "location": [1,0]}}],
                "edges": [{}, {}]}}"#,
            edge(first),
            edge(second)
        )
    }

    #[test]
    fn repeated_record_in_same_direction_rejected() {
        let json = two_records(("a", "b", 100.0), ("a", "b", 999.0));
        let err = load_graph_reader(Cursor::new(json));
        assert!(matches!(err, Err(GraphError::DuplicateEdge { mode: TransportMode::Walk, .. })));

        let json = two_records(("a", "b", 100.0), ("a", "b", 100.0));
        assert!(matches!(load_graph_reader(Cursor::new(json)), Err(GraphError::DuplicateEdge { .. })));
    }

    #[test]
    fn reversed_record_with_other_attributes_rejected() {
        let json = two_records(("a", "b", 100.0), ("b", "a", 999.0));
        assert!(matches!(load_graph_reader(Cursor::new(json)), Err(GraphError::DuplicateEdge { .. })));

        let json = two_records(("a", "b", 100.0), ("b", "a", 100.0));
        let (g, report) = load_graph_reader(Cursor::new(json)).unwrap();
        assert_eq!((g.edge_count(), report.skipped_duplicates), (1, 1));
        assert_eq!(g.edges()[0].attrs.distance, 100.0);
    }

    #[test]
    fn missing_required_attribute_rejected() {
        let bad = r#"{"nodes": [{"id": "a", "location": [0,0]}, {"id": "b", "location": [1,0]}],
                      "edges": [{"from": "a", "to": "b", "transport_type": "walk", "distance": 1, "time_cost": 1}]}"#;
        assert!(matches!(load_graph_reader(Cursor::new(bad)), Err(GraphError::Json(_))));
    }

    #[test]
    fn unknown_transport_type_rejected() {
        let bad = r#"{"nodes": [{"id": "a", "location": [0,0]}, {"id": "b", "location": [1,0]}],
                      "edges": [{"from": "a", "to": "b", "transport_type": "ferry",
                                 "distance": 1, "price_cost": 0, "time_cost": 1}]}"#;
        assert!(matches!(load_graph_reader(Cursor::new(bad)), Err(GraphError::Core(_))));
    }

    #[test]
    fn excavation_validation_after_load() {
        let (g, _) = load_graph_reader(Cursor::new(CITY)).unwrap();
        assert!(g.validate_cost(&CostAttribute::Excavation).is_err());
        assert!(g.validate_cost(&CostAttribute::Price).is_ok());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CITY.as_bytes()).unwrap();
        let (g, _) = load_graph_json(file.path()).unwrap();
        assert_eq!(g.node_count(), 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_graph_json(&dir.path().join("absent.json"));
        assert!(matches!(err, Err(GraphError::Io(_))));
    }
}

// ── Synthetic grid city ──────────────────────────────────────────────────────

#[cfg(test)]
mod synth {
    use tn_core::TransportMode;
    use crate::{generate_grid_city, CostAttribute, GraphError, GridCityConfig};

    #[test]
    fn full_grid_has_expected_shape() {
        let cfg = GridCityConfig { rows: 8, cols: 4, drop_probability: 0.0, ..Default::default() };
        let g = generate_grid_city(&cfg).unwrap();
        assert_eq!(g.node_count(), 32);
        // 8 rows × 3 row streets + 7 × 4 column streets = 52 streets, 2 modes each.
        assert_eq!(g.edge_count(), 104);
        assert_eq!(g.regions().len(), 4);
        assert!(g.validate_cost(&CostAttribute::Excavation).is_ok());
        for e in g.edges() {
            assert!(matches!(e.mode, TransportMode::Walk | TransportMode::Taxi));
            assert_eq!(e.attrs.land_use.total(), cfg.properties_per_street);
        }
    }

    #[test]
    fn deterministic_per_seed() {
        let cfg = GridCityConfig { rows: 8, cols: 6, ..Default::default() };
        let g1 = generate_grid_city(&cfg).unwrap();
        let g2 = generate_grid_city(&cfg).unwrap();
        assert_eq!(g1.node_count(), g2.node_count());
        assert_eq!(g1.edges(), g2.edges());
    }

    #[test]
    fn row_streets_bridge_dropped_crossings() {
        let cfg = GridCityConfig { rows: 6, cols: 8, drop_probability: 0.4, seed: 7, ..Default::default() };
        let g = generate_grid_city(&cfg).unwrap();
        for e in g.edges() {
            let d = e.attrs.distance / cfg.street_length;
            assert!((d - d.round()).abs() < 1e-9 && d >= 1.0);
        }
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = GridCityConfig { drop_probability: 1.5, ..Default::default() };
        assert!(matches!(generate_grid_city(&cfg), Err(GraphError::Core(_))));
        let cfg = GridCityConfig { rows: 0, ..Default::default() };
        assert!(generate_grid_city(&cfg).is_err());
    }
}
