//! Unit tests for agv-control.

use std::f64::consts::{FRAC_PI_2, PI};
use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use agv_core::{CoreError, DriveConfig, Point};
use agv_drive::{Action, DriveOutcome, SimulatedTransport, TurnDirection};
use agv_spatial::{MapDescription, Network, ObstacleRegion, SpatialError};

use crate::{Agv, AgvBuilder, ControlError, TurnPlan};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn fast_config() -> DriveConfig {
    DriveConfig {
        poll_interval_ms:   1,
        arrival_timeout_ms: 2_000,
        command_retries:    2,
        retry_backoff_ms:   1,
        telemetry_ttl_ms:   0,
    }
}

/// ```text
/// A ─e─▶ B ─e─▶ C        Z (isolated)
///               │s
///               ▼
///               D
/// ```
/// Every edge has its reverse declared.
fn warehouse_map() -> MapDescription {
    MapDescription::default()
        .node("A", 0.0, 0.0)
        .node("B", 1.0, 0.0)
        .node("C", 2.0, 0.0)
        .node("D", 2.0, 1.0)
        .node("Z", 9.0, 9.0)
        .edge("A", "e", "B")
        .edge("B", "w", "A")
        .edge("B", "e", "C")
        .edge("C", "w", "B")
        .edge("C", "s", "D")
        .edge("D", "n", "C")
}

type SimAgv = Agv<Arc<SimulatedTransport>>;

fn agv_at(node: &str, sim: impl FnOnce(SimulatedTransport) -> SimulatedTransport) -> (Arc<SimulatedTransport>, SimAgv) {
    agv_with(node, fast_config(), sim)
}

fn agv_with(
    node: &str,
    config: DriveConfig,
    sim: impl FnOnce(SimulatedTransport) -> SimulatedTransport,
) -> (Arc<SimulatedTransport>, SimAgv) {
    let net = Network::from_map(&warehouse_map(), &[]).unwrap();
    let transport = Arc::new(sim(SimulatedTransport::at_node(&net, node).unwrap()));
    let agv = AgvBuilder::new(Arc::clone(&transport))
        .config(config)
        .network(net)
        .build()
        .unwrap();
    (transport, agv)
}

fn same(x: SimulatedTransport) -> SimulatedTransport {
    x
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    fn sim() -> Arc<SimulatedTransport> {
        Arc::new(SimulatedTransport::new("A", Default::default()))
    }

    #[test]
    fn builds_network_from_map_and_obstacles() {
        let agv = AgvBuilder::new(sim())
            .map(warehouse_map())
            .obstacles(vec![ObstacleRegion::new(8.0, 8.0, 10.0, 10.0)])
            .build()
            .unwrap();
        assert_eq!(agv.network().node_count(), 4);
        assert!(!agv.network().contains_id("Z"));
    }

    #[test]
    fn loads_map_and_obstacles_from_files() {
        let map = r#"{
            "nodes": [
                { "id": "A", "position": { "x": 0.0, "y": 0.0 } },
                { "id": "B", "position": { "x": 5.0, "y": 0.0 } }
            ],
            "edges": [ { "source": { "node": "A", "port": "e" }, "target": { "node": "B" } } ]
        }"#;
        let mut map_file = tempfile::NamedTempFile::new().unwrap();
        map_file.write_all(map.as_bytes()).unwrap();
        let mut obstacle_file = tempfile::NamedTempFile::new().unwrap();
        obstacle_file.write_all(b"[ [[4.0, -1.0], [6.0, 1.0]] ]").unwrap();

        let agv = AgvBuilder::new(sim())
            .map_json(map_file.path())
            .obstacles_json(obstacle_file.path())
            .build()
            .unwrap();
        assert_eq!(agv.network().node_count(), 1);
        assert_eq!(agv.network().edge_count(), 0);
    }

    #[test]
    fn missing_map_file_is_io_error() {
        let err = AgvBuilder::new(sim())
            .map_json("/nonexistent/warehouse.json")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ControlError::Spatial(SpatialError::Io(_))));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = AgvBuilder::new(sim())
            .config(DriveConfig { arrival_timeout_ms: 0, ..fast_config() })
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ControlError::Core(CoreError::Config(_))));
    }

    #[test]
    fn obstacles_with_prebuilt_network_are_rejected() {
        let net = Network::from_map(&warehouse_map(), &[]).unwrap();
        let err = AgvBuilder::new(sim())
            .network(net)
            .obstacles(vec![ObstacleRegion::new(0.0, 0.0, 1.0, 1.0)])
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ControlError::Config(_)));
    }

    #[test]
    fn bad_port_in_map_fails_build() {
        let map = warehouse_map().edge("A", "x", "B");
        let err = AgvBuilder::new(sim()).map(map).build().err().unwrap();
        assert!(matches!(err, ControlError::Spatial(SpatialError::Config(_))));
    }

    #[test]
    fn no_map_gives_empty_network() {
        let agv = AgvBuilder::new(sim()).build().unwrap();
        assert!(agv.network().is_empty());
        assert!(matches!(agv.find_closest_node(), Err(ControlError::EmptyNetwork)));
    }
}

// ── Position queries ──────────────────────────────────────────────────────────

#[cfg(test)]
mod position {
    use super::*;

    #[test]
    fn closest_node_follows_vehicle() {
        let (_, agv) = agv_at("C", same);
        assert_eq!(agv.location().unwrap(), Point::new(2.0, 0.0));
        assert_eq!(agv.find_closest_node().unwrap().id, "C");
    }

    #[test]
    fn go_to_coordinate_sends_single_goto() {
        let (sim, agv) = agv_at("A", same);
        let target = agv.go_to_coordinate(1.9, 0.8).unwrap();
        assert_eq!(target.id, "D");
        assert_eq!(sim.actions(), vec![Action::goto("D")]);
    }

    #[test]
    fn non_finite_coordinate_is_rejected() {
        let (sim, agv) = agv_at("A", same);
        let err = agv.go_to_coordinate(f64::NAN, 0.0).unwrap_err();
        assert!(matches!(err, ControlError::NonFiniteLocation { .. }));
        assert!(matches!(
            agv.go_to_coordinate(0.0, f64::INFINITY),
            Err(ControlError::NonFiniteLocation { .. })
        ));
        assert!(sim.actions().is_empty());
    }

    #[test]
    fn init_position_requires_known_node() {
        let (sim, agv) = agv_at("A", same);
        let err = agv.init_position(Default::default(), "hall", "nowhere").unwrap_err();
        assert!(matches!(err, ControlError::Spatial(SpatialError::NodeNotFound(_))));
        assert!(sim.actions().is_empty());

        agv.init_position(agv_core::Pose::new(1.0, 0.0, 0.0), "hall", "B").unwrap();
        assert_eq!(agv.find_closest_node().unwrap().id, "B");
    }
}

// ── Navigation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod navigation {
    use super::*;

    #[test]
    fn drives_collapsed_route() {
        let (sim, agv) = agv_at("A", |s| s.polls_per_hop(2));

        let outcome = agv.navigate_to_node("D").unwrap();

        assert_eq!(outcome, DriveOutcome::Completed { hops: 2 });
        assert_eq!(sim.gotos(), ["C", "D"]);
        assert_eq!(sim.overlapping_gotos(), 0);
        assert_eq!(agv.location().unwrap(), Point::new(2.0, 1.0));
    }

    #[test]
    fn route_starts_at_last_reached_node() {
        let (_, agv) = agv_at("D", same);
        let route = agv.route_to("A").unwrap();
        let ids: Vec<&str> = route.ids(agv.network()).collect();
        assert_eq!(ids, ["C", "A"]);
        assert_eq!(route.hops, 3);
    }

    #[test]
    fn navigating_to_current_node_confirms_in_place() {
        let (sim, agv) = agv_at("B", same);
        assert_eq!(agv.navigate_to_node("B").unwrap(), DriveOutcome::Completed { hops: 1 });
        assert_eq!(sim.gotos(), ["B"]);
    }

    #[test]
    fn unreachable_target_is_not_an_error() {
        let (sim, agv) = agv_at("A", same);
        assert_eq!(agv.navigate_to_node("Z").unwrap(), DriveOutcome::Completed { hops: 0 });
        assert!(sim.actions().is_empty());
        assert_eq!(agv.sequencer().pending_len(), 0);
    }

    #[test]
    fn unknown_target_is_lookup_error() {
        let (_, agv) = agv_at("A", same);
        let err = agv.navigate_to_node("nowhere").unwrap_err();
        assert!(matches!(err, ControlError::Spatial(SpatialError::NodeNotFound(id)) if id == "nowhere"));
    }

    #[test]
    fn unknown_source_is_lookup_error() {
        let (_, agv) = agv_at("A", same);
        agv.vehicle().init_position(Default::default(), "hall", "ghost").unwrap();
        let err = agv.navigate_to_node("B").unwrap_err();
        assert!(matches!(err, ControlError::Spatial(SpatialError::NodeNotFound(id)) if id == "ghost"));
    }

    #[test]
    fn stall_is_transient() {
        let config = DriveConfig { arrival_timeout_ms: 30, ..fast_config() };
        let (_, agv) = agv_with("A", config, |s| s.never_reaches("D"));
        let err = agv.navigate_to_node("D").unwrap_err();
        assert!(err.is_transient());
        assert_eq!(agv.sequencer().pending(), ["D"]);
    }

    #[test]
    fn new_navigation_replaces_stalled_route() {
        let config = DriveConfig { arrival_timeout_ms: 30, ..fast_config() };
        let (sim, agv) = agv_with("A", config, |s| s.never_reaches("D"));
        assert!(agv.navigate_to_node("D").unwrap_err().is_transient());
        assert_eq!(agv.sequencer().pending(), ["D"]);

        let outcome = agv.navigate_to_node("B").unwrap();

        assert_eq!(outcome, DriveOutcome::Completed { hops: 1 });
        assert_eq!(sim.gotos(), ["C", "D", "B"]);
        assert_eq!(sim.last_node(), "B");
        assert!(agv.sequencer().pending().is_empty());
    }

    #[test]
    fn stalled_drive_resumes_with_start() {
        let config = DriveConfig { arrival_timeout_ms: 30, ..fast_config() };
        let (sim, agv) = agv_with("A", config, |s| s.never_reaches("D"));
        agv.navigate_to_node("D").unwrap_err();
        assert!(agv.sequencer().start().unwrap_err().is_transient());
        assert_eq!(sim.gotos(), ["C", "D", "D"]);
    }

    #[test]
    fn unreachable_target_drops_leftover_stops() {
        let config = DriveConfig { arrival_timeout_ms: 30, ..fast_config() };
        let (_, agv) = agv_with("A", config, |s| s.never_reaches("D"));
        agv.navigate_to_node("D").unwrap_err();
        assert_eq!(agv.navigate_to_node("Z").unwrap(), DriveOutcome::Completed { hops: 0 });
        assert!(agv.sequencer().pending().is_empty());
    }

    #[test]
    fn abort_from_another_thread() {
        let (sim, agv) = agv_at("A", |s| s.never_reaches("D"));
        let agv = Arc::new(agv);

        let driver = {
            let agv = Arc::clone(&agv);
            thread::spawn(move || agv.navigate_to_node("D"))
        };
        let deadline = Instant::now() + Duration::from_secs(2);
        while sim.gotos().len() < 2 {
            assert!(Instant::now() < deadline, "second goto never sent");
            thread::sleep(Duration::from_millis(1));
        }
        agv.abort().unwrap();

        assert_eq!(driver.join().unwrap().unwrap(), DriveOutcome::Aborted { hops: 1 });
        assert_eq!(sim.count("Stop"), 1);
        assert!(agv.sequencer().pending().is_empty());
    }
}

// ── Heading ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod heading {
    use super::*;

    fn right(count: u32) -> TurnPlan {
        TurnPlan { direction: TurnDirection::Right, count }
    }

    const LEFT: TurnPlan = TurnPlan { direction: TurnDirection::Left, count: 1 };

    #[test]
    fn plan_rounds_to_nearest_quarter() {
        assert_eq!(TurnPlan::for_delta(0.0), TurnPlan::NONE);
        assert_eq!(TurnPlan::for_delta(0.1), TurnPlan::NONE);
        assert_eq!(TurnPlan::for_delta(1.5), right(1));
        assert_eq!(TurnPlan::for_delta(FRAC_PI_2 + 0.2), right(1));
        assert_eq!(TurnPlan::for_delta(PI), right(2));
        assert_eq!(TurnPlan::for_delta(-PI), right(2));
    }

    #[test]
    fn three_rights_become_one_left() {
        assert_eq!(TurnPlan::for_delta(-FRAC_PI_2), LEFT);
        assert_eq!(TurnPlan::for_delta(3.0 * FRAC_PI_2), LEFT);
    }

    #[test]
    fn full_turns_cancel() {
        assert!(TurnPlan::for_delta(2.0 * PI).is_empty());
        assert_eq!(TurnPlan::for_delta(2.0 * PI + FRAC_PI_2), right(1));
        assert!(TurnPlan::for_delta(f64::NAN).is_empty());
    }

    #[test]
    fn turn_to_reaches_heading() {
        let (sim, agv) = agv_at("A", same);

        assert_eq!(agv.turn_to(FRAC_PI_2).unwrap(), right(1));
        assert!((sim.pose().theta - FRAC_PI_2).abs() < 1e-9);

        assert_eq!(agv.turn_to(-FRAC_PI_2).unwrap(), right(2));
        assert!((sim.pose().theta + FRAC_PI_2).abs() < 1e-9);

        assert_eq!(agv.turn_to(-PI).unwrap(), LEFT);
        assert!((sim.pose().theta.abs() - PI).abs() < 1e-9);

        assert_eq!(sim.count("TurnRight"), 3);
        assert_eq!(sim.count("TurnLeft"), 1);
    }

    #[test]
    fn reported_heading_is_clockwise() {
        let (sim, agv) = agv_at("A", same);
        agv.init_position(agv_core::Pose::new(0.0, 0.0, FRAC_PI_2), "hall", "A").unwrap();

        // Facing a quarter turn clockwise; a left turn brings it back to +x.
        assert_eq!(agv.turn_to(0.0).unwrap(), LEFT);
        assert!(sim.pose().theta.abs() < 1e-9);
        assert_eq!(sim.count("TurnLeft"), 1);
        assert_eq!(sim.count("TurnRight"), 0);
    }

    #[test]
    fn aligned_heading_sends_nothing() {
        let (sim, agv) = agv_at("A", same);
        assert!(agv.turn_to(0.05).unwrap().is_empty());
        assert!(sim.actions().is_empty());
    }
}
