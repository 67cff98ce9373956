//! Unit tests for agv-core primitives.

#[cfg(test)]
mod ids {
    use crate::NodeIdx;

    #[test]
    fn index_roundtrip() {
        let idx = NodeIdx(42);
        assert_eq!(idx.index(), 42);
        assert_eq!(NodeIdx::try_from(42usize).unwrap(), idx);
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(NodeIdx::default(), NodeIdx::INVALID);
        assert_eq!(NodeIdx::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(NodeIdx(7).to_string(), "NodeIdx(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{Point, Pose};

    #[test]
    fn zero_distance() {
        let p = Point::new(3.5, -2.0);
        assert_eq!(p.distance_to(p), 0.0);
    }

    #[test]
    fn pythagorean_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-12);
        assert!((a.distance_2(b) - 25.0).abs() < 1e-12);
        // symmetric
        assert_eq!(a.distance_to(b), b.distance_to(a));
    }

    #[test]
    fn pose_point() {
        let pose = Pose::new(1.0, 2.0, 0.5);
        assert_eq!(pose.point(), Point::new(1.0, 2.0));
    }
}

#[cfg(test)]
mod port {
    use crate::{CoreError, Port};

    #[test]
    fn parse_all_characters() {
        assert_eq!(Port::parse("n").unwrap(), Port::North);
        assert_eq!(Port::parse("w").unwrap(), Port::West);
        assert_eq!(Port::parse("s").unwrap(), Port::South);
        assert_eq!(Port::parse("e").unwrap(), Port::East);
        assert_eq!("e".parse::<Port>().unwrap(), Port::East);
    }

    #[test]
    fn rejects_unknown_character() {
        for bad in ["x", "N", "", "east", "ne"] {
            assert!(
                matches!(Port::parse(bad), Err(CoreError::Config(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn slots_are_distinct() {
        // East and West must never share a slot.
        let mut slots: Vec<usize> = Port::ALL.iter().map(|p| p.slot()).collect();
        slots.sort_unstable();
        assert_eq!(slots, vec![0, 1, 2, 3]);
        assert_ne!(Port::East.slot(), Port::West.slot());
    }

    #[test]
    fn resolution_order() {
        assert_eq!(Port::ALL, [Port::North, Port::West, Port::South, Port::East]);
    }

    #[test]
    fn display_roundtrip() {
        for p in Port::ALL {
            assert_eq!(Port::parse(&p.to_string()).unwrap(), p);
        }
    }
}

#[cfg(test)]
mod config {
    use std::time::Duration;

    use crate::DriveConfig;

    #[test]
    fn defaults_are_valid() {
        let cfg = DriveConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.telemetry_ttl(), Duration::from_millis(100));
        assert_eq!(cfg.command_attempts(), 3);
    }

    #[test]
    fn zero_poll_interval_rejected() {
        let cfg = DriveConfig { poll_interval_ms: 0, ..DriveConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn poll_longer_than_timeout_rejected() {
        let cfg = DriveConfig {
            poll_interval_ms:   500,
            arrival_timeout_ms: 100,
            ..DriveConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn retries_saturate() {
        let cfg = DriveConfig { command_retries: u32::MAX, ..DriveConfig::default() };
        assert_eq!(cfg.command_attempts(), u32::MAX);
    }
}
