//! Unit tests for tn-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId, RegionId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(NodeId(0) < NodeId(1));
        assert!(EdgeId(100) > EdgeId(99));
    }

    #[test]
    fn usize_conversions() {
        assert_eq!(usize::from(RegionId(4)), 4);
        assert_eq!(NodeId::try_from(9usize), Ok(NodeId(9)));
        assert!(EdgeId::try_from(usize::MAX).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::Point;

    #[test]
    fn zero_distance() {
        let p = Point::new(120.0, -40.0);
        assert_eq!(p.distance(p), 0.0);
    }

    #[test]
    fn pythagorean_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(300.0, 400.0);
        assert!((a.distance(b) - 500.0).abs() < 1e-9);
        assert!((a.distance_2(b) - 250_000.0).abs() < 1e-9);
    }

    #[test]
    fn deserializes_pair_and_named() {
        let pair: Point = serde_json::from_str("[3.0, 4.0]").unwrap();
        let named: Point = serde_json::from_str(r#"{"x": 3.0, "y": 4.0}"#).unwrap();
        assert_eq!(pair, named);
    }
}

#[cfg(test)]
mod region {
    use crate::RegionTag;

    #[test]
    fn untagged_json() {
        let n: RegionTag = serde_json::from_str("3").unwrap();
        let s: RegionTag = serde_json::from_str(r#""51000""#).unwrap();
        assert_eq!(n, RegionTag::Number(3));
        assert_eq!(s, RegionTag::from("51000"));
        // A numeric tag and a string tag with the same digits are distinct.
        assert_ne!(RegionTag::Number(51000), RegionTag::from("51000"));
    }

    #[test]
    fn display() {
        assert_eq!(RegionTag::Number(4).to_string(), "4");
        assert_eq!(RegionTag::from("centro").to_string(), "centro");
    }
}

#[cfg(test)]
mod transport {
    use crate::{CoreError, TransportMode};

    #[test]
    fn default_is_walk() {
        assert_eq!(TransportMode::default(), TransportMode::Walk);
    }

    #[test]
    fn parse_aliases() {
        assert_eq!("onibus".parse::<TransportMode>().unwrap(), TransportMode::Bus);
        assert_eq!("non_motorized".parse::<TransportMode>().unwrap(), TransportMode::Walk);
        assert_eq!(" Taxi ".parse::<TransportMode>().unwrap(), TransportMode::Taxi);
        assert!(matches!(
            "zeppelin".parse::<TransportMode>(),
            Err(CoreError::UnknownTransport(_))
        ));
    }

    #[test]
    fn flat_fare_modes() {
        assert!(TransportMode::Metro.has_flat_fare());
        assert!(TransportMode::Bus.has_flat_fare());
        assert!(!TransportMode::Taxi.has_flat_fare());
        assert!(!TransportMode::Walk.has_flat_fare());
    }

    #[test]
    fn dense_indices() {
        let idx: Vec<usize> = TransportMode::ALL.iter().map(|m| m.index()).collect();
        assert_eq!(idx, vec![0, 1, 2, 3]);
    }
}

#[cfg(test)]
mod config {
    use crate::{CoreError, TransitConfig, TransportMode};

    #[test]
    fn defaults_match_published_fares() {
        let cfg = TransitConfig::default();
        assert_eq!(cfg.flat_fare(TransportMode::Metro), Some(4.40));
        assert_eq!(cfg.flat_fare(TransportMode::Bus), Some(3.50));
        assert_eq!(cfg.flat_fare(TransportMode::Walk), None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn travel_minutes_from_speed() {
        let cfg = TransitConfig::default();
        // 5 km on foot at 5 km/h = 60 min.
        assert!((cfg.travel_minutes(TransportMode::Walk, 5_000.0) - 60.0).abs() < 1e-9);
        // 7 km by metro at 70 km/h = 6 min.
        assert!((cfg.travel_minutes(TransportMode::Metro, 7_000.0) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn taxi_minimum_applies_on_boarding_only() {
        let cfg = TransitConfig::default();
        // 200 m metered = 0.50, floored to 10.00 when boarding.
        assert_eq!(cfg.taxi_fare(200.0, true), 10.0);
        assert!((cfg.taxi_fare(200.0, false) - 0.5).abs() < 1e-9);
        // 10 km metered = 25.00, above the floor.
        assert!((cfg.taxi_fare(10_000.0, true) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = TransitConfig::from_json_str(r#"{"speeds": {"walk": 4.0}}"#).unwrap();
        assert_eq!(cfg.speeds.walk, 4.0);
        assert_eq!(cfg.speeds.metro, 70.0);
    }

    #[test]
    fn rejects_zero_speed_and_negative_fare() {
        let err = TransitConfig::from_json_str(r#"{"speeds": {"bus": 0.0}}"#).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
        let err = TransitConfig::from_json_str(r#"{"fares": {"metro": -1.0}}"#).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            TransitConfig::from_json_str("{ not json"),
            Err(CoreError::Json(_))
        ));
    }
}
