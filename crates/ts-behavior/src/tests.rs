//! Unit tests for ts-behavior.

#[cfg(test)]
mod helpers {
    use ts_building::{Building, DijkstraPlanner};
    use ts_core::{ModelState, Step};

    use crate::{ActiveModel, BehaviorNode, TickContext};

    /// ```text
    ///            3 Dock-2 (5,5)
    ///            |
    ///   0 ------ 1 ------ 2 Dock-1
    ///  (0,0)   (5,0)    (10,0)
    /// ```
    pub const DEPOT_YAML: &str = r#"
name: depot
levels:
  L1:
    elevation: 0.0
    vertices:
      - [0.0, 0.0, 0.0, "start"]
      - [5.0, 0.0, 0.0, ""]
      - [10.0, 0.0, 0.0, "Dock-1"]
      - [5.0, 5.0, 0.0, "Dock-2"]
    lanes:
      - [0, 1, {bidirectional: [4, true], graph_idx: [2, 0]}]
      - [1, 2, {bidirectional: [4, true], graph_idx: [2, 0]}]
      - [1, 3, {bidirectional: [4, true], graph_idx: [2, 0]}]
"#;

    pub fn depot() -> Building {
        Building::from_yaml_str(DEPOT_YAML, 0).expect("depot map parses")
    }

    /// Tick `node` `n` times with no other agents and no scenario.
    pub fn run(node: &mut dyn BehaviorNode, state: &mut ModelState, building: &Building, n: u64, dt: f64) {
        run_with(node, state, building, &[], n, dt);
    }

    pub fn run_with(
        node:     &mut dyn BehaviorNode,
        state:    &mut ModelState,
        building: &Building,
        active:   &[ActiveModel],
        n:        u64,
        dt:       f64,
    ) {
        for i in 0..n {
            let ctx = TickContext::new(Step(i), building, &DijkstraPlanner, active);
            node.tick(dt, state, &ctx);
        }
    }
}

// ── Navigate ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod navigate {
    use ts_building::{Building, BuildingError, PlanResult, Planner};
    use ts_core::{ModelId, ModelState, NodeId, Step};
    use ts_scenario::Scenario;

    use super::helpers::{depot, run, run_with};
    use crate::{
        ActiveModel, BehaviorError, BehaviorNode, NavigateBehavior, NavigatePhase, TickContext,
        parse_node,
    };

    #[test]
    fn dock_reached_after_five_seconds() {
        let b = depot();
        let mut nav = NavigateBehavior::new("Dock-1");
        let mut state = ModelState::default();
        run(&mut nav, &mut state, &b, 5, 1.0);
        assert_eq!(state.x, 10.0);
        assert_eq!(state.y, 0.0);
        assert!(nav.is_complete());
        assert_eq!(nav.phase(), NavigatePhase::Arrived);
        assert_eq!(state.velocity, None);
    }

    #[test]
    fn dock_not_reached_after_four_seconds() {
        let b = depot();
        let mut nav = NavigateBehavior::new("Dock-1");
        let mut state = ModelState::default();
        run(&mut nav, &mut state, &b, 4, 1.0);
        assert_eq!(state.x, 8.0);
        assert!(!nav.is_complete());
        assert_eq!(nav.phase(), NavigatePhase::EnRoute);
        assert_eq!(nav.prev_error(), Some(2.0));
    }

    #[test]
    fn first_tick_resolves_plans_and_moves() {
        let b = depot();
        let mut nav = NavigateBehavior::new("Dock-1");
        let mut state = ModelState::default();
        run(&mut nav, &mut state, &b, 1, 1.0);
        assert!(nav.destination_found());
        assert_eq!(nav.path(), &[NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(state.x, 2.0);
        assert_eq!(state.velocity, Some([2.0, 0.0]));
        assert_eq!(state.yaw, 0.0);
    }

    #[test]
    fn mid_lane_start_heads_forward() {
        // (2,0) snaps to node 0 at (0,0), which lies behind the agent.
        let b = depot();
        let mut nav = NavigateBehavior::new("Dock-1");
        let mut state = ModelState::at(2.0, 0.0);
        run(&mut nav, &mut state, &b, 1, 1.0);
        assert_eq!(nav.path(), &[NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!((state.x, state.y), (4.0, 0.0));
        assert_eq!(state.yaw, 0.0);
        assert_eq!(nav.prev_error(), Some(6.0));
    }

    #[test]
    fn straight_line_approach_is_monotone() {
        let b = depot();
        let cases = [
            ("Dock-1", ModelState::default()),
            ("Dock-1", ModelState::at(2.0, 0.0)),
            ("Dock-1", ModelState::at(6.5, 0.0)),
            ("start", ModelState::at(8.0, 0.0)),
            ("Dock-2", ModelState::at(5.0, 0.7)),
        ];
        for (destination, start) in cases {
            let mut nav = NavigateBehavior::new(destination).with_max_speed(1.5);
            let mut state = start;
            let dest = b.resolve_destination(destination).unwrap();
            let mut error = state.distance_to(&dest);
            for i in 0..100 {
                run(&mut nav, &mut state, &b, 1, 0.5);
                let now = state.distance_to(&dest);
                assert!(now < error, "{destination} from {start}: tick {i} error {error} -> {now}");
                error = now;
                if nav.is_complete() {
                    break;
                }
            }
            assert!(nav.is_complete(), "{destination} from {start}: never arrived");
            assert!(error < nav.tolerance);
        }
    }

    #[test]
    fn budget_carries_past_waypoints() {
        // Dock-2 is 10 m away via the corner at (5,0).
        let b = depot();
        let mut nav = NavigateBehavior::new("Dock-2").with_max_speed(3.0);
        let mut state = ModelState::default();
        run(&mut nav, &mut state, &b, 2, 1.0);
        assert_eq!((state.x, state.y), (5.0, 1.0));
        // Heading follows this tick's net displacement from (3,0).
        assert!((state.yaw - 1f64.atan2(2.0)).abs() < 1e-12);
    }

    #[test]
    fn unknown_destination_never_moves() {
        let b = depot();
        let mut nav = NavigateBehavior::new("Nowhere");
        let start = ModelState::new(1.0, 2.0, 0.0, 0.3);
        let mut state = start;
        run(&mut nav, &mut state, &b, 100, 0.1);
        assert_eq!(state, start);
        assert!(!nav.destination_found());
        assert_eq!(nav.phase(), NavigatePhase::Unresolved);
        assert!(!nav.is_complete());
        assert!(nav.path().is_empty());
        assert_eq!(nav.prev_error(), None);
    }

    struct NoRoutePlanner;

    impl Planner for NoRoutePlanner {
        fn plan(&self, _: &ModelState, _: &ModelState, _: &Building) -> PlanResult<Vec<NodeId>> {
            Err(BuildingError::NoRoute { from: NodeId(0), to: NodeId(2) })
        }
    }

    #[test]
    fn failed_plan_stays_put_and_retries() {
        let b = depot();
        let mut nav = NavigateBehavior::new("Dock-1");
        let mut state = ModelState::default();
        for i in 0..10 {
            let ctx = TickContext::new(Step(i), &b, &NoRoutePlanner, &[]);
            nav.tick(1.0, &mut state, &ctx);
        }
        assert!(nav.destination_found());
        assert_eq!(nav.phase(), NavigatePhase::Planning);
        assert_eq!(state, ModelState::default());

        // The next tick with a working planner picks up from Planning.
        run(&mut nav, &mut state, &b, 1, 1.0);
        assert_eq!(nav.phase(), NavigatePhase::EnRoute);
        assert_eq!(state.x, 2.0);
    }

    #[test]
    fn ticks_after_arrival_are_noops() {
        let b = depot();
        let mut nav = NavigateBehavior::new("Dock-1");
        let mut state = ModelState::default();
        run(&mut nav, &mut state, &b, 5, 1.0);
        let arrived = state;
        run(&mut nav, &mut state, &b, 3, 1.0);
        assert_eq!(state, arrived);
        assert!(nav.is_complete());
        assert_eq!(nav.phase(), NavigatePhase::Arrived);
    }

    #[test]
    fn zero_dt_reports_stall() {
        let b = depot();
        let mut nav = NavigateBehavior::new("Dock-1");
        let mut state = ModelState::default();
        run(&mut nav, &mut state, &b, 1, 0.0);
        assert!(!nav.is_stalled());
        run(&mut nav, &mut state, &b, 1, 0.0);
        assert!(nav.is_stalled());
        assert_eq!(state.velocity, None);
        run(&mut nav, &mut state, &b, 1, 1.0);
        assert!(!nav.is_stalled());
    }

    #[test]
    fn destination_from_active_model() {
        let b = depot();
        let others = [ActiveModel {
            id:    ModelId(4),
            name:  "forklift_2".into(),
            state: ModelState { velocity: Some([1.0, 0.0]), ..ModelState::at(5.0, 5.0) },
        }];
        let mut nav = NavigateBehavior::new("forklift_2");
        let mut state = ModelState::default();
        run_with(&mut nav, &mut state, &b, &others, 1, 1.0);
        let dest = nav.destination_state().copied().unwrap();
        assert_eq!((dest.x, dest.y), (5.0, 5.0));
        assert_eq!(dest.velocity, None);
    }

    #[test]
    fn destination_from_scenario_vertex() {
        let b = depot();
        let scenario = Scenario::from_yaml_str("vertices: [[20.0, 0.0, staging]]").unwrap();
        let mut nav = NavigateBehavior::new("staging");
        let mut state = ModelState::default();
        let ctx = TickContext::new(Step(0), &b, &ts_building::DijkstraPlanner, &[])
            .with_scenario(Some(&scenario));
        nav.tick(1.0, &mut state, &ctx);
        assert_eq!(nav.destination_state().map(|d| d.x), Some(20.0));

        // Without the scenario the name is unknown.
        let mut nav = NavigateBehavior::new("staging");
        run(&mut nav, &mut state, &b, 1, 1.0);
        assert!(!nav.destination_found());
    }

    #[test]
    fn script_fields_and_defaults() {
        let node = parse_node("{ type: navigate, destination: Dock-1 }").unwrap();
        assert_eq!(node.type_tag(), "navigate");

        let nav = NavigateBehavior::from_yaml(
            &serde_yaml::from_str("{ type: navigate, destination: Dock-2, max_speed: 1.5, tolerance: 0.05 }")
                .unwrap(),
        )
        .unwrap();
        assert_eq!(nav.destination_name, "Dock-2");
        assert_eq!(nav.max_speed, 1.5);
        assert_eq!(nav.tolerance, 0.05);
    }

    #[test]
    fn missing_destination_rejected() {
        match parse_node("{ type: navigate, max_speed: 1.0 }") {
            Err(BehaviorError::MissingField { node, field }) => {
                assert_eq!(node, "navigate");
                assert_eq!(field, "destination");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn non_positive_speed_rejected() {
        let err = parse_node("{ type: navigate, destination: Dock-1, max_speed: 0 }").unwrap_err();
        assert!(matches!(err, BehaviorError::InvalidField { field: "max_speed", .. }));
        let err = parse_node("{ type: navigate, destination: Dock-1, tolerance: fast }").unwrap_err();
        assert!(matches!(err, BehaviorError::InvalidField { field: "tolerance", .. }));
    }
}

// ── Cloning and printing ──────────────────────────────────────────────────────

#[cfg(test)]
mod cloning {
    use ts_core::ModelState;

    use super::helpers::{depot, run};
    use crate::{BehaviorNode, describe, parse_node};

    const PATROL: &str = r#"
type: sequence
children:
  - { type: navigate, destination: Dock-1 }
  - { type: wait, seconds: 5 }
  - { type: repeat, count: 2, child: { type: navigate, destination: Dock-2, max_speed: 1.5 } }
"#;

    #[test]
    fn ticking_clone_leaves_template_untouched() {
        let b = depot();
        let template = parse_node(PATROL).unwrap();
        let before = describe(template.as_ref());

        let mut agent = template.clone_node();
        let mut state = ModelState::default();
        run(agent.as_mut(), &mut state, &b, 8, 1.0);

        assert_ne!(describe(agent.as_ref()), before);
        assert_eq!(describe(template.as_ref()), before);
        assert!(!template.is_complete());
    }

    #[test]
    fn fresh_clones_print_identically() {
        let template = parse_node(PATROL).unwrap();
        let a = template.clone_node();
        let b = template.clone();
        assert_eq!(describe(a.as_ref()), describe(b.as_ref()));
    }

    #[test]
    fn clone_resets_progress() {
        let b = depot();
        let mut nav = parse_node("{ type: navigate, destination: Dock-1 }").unwrap();
        let mut state = ModelState::default();
        run(nav.as_mut(), &mut state, &b, 5, 1.0);
        assert!(nav.is_complete());
        assert!(!nav.clone_node().is_complete());
    }

    #[test]
    fn print_indents_children() {
        let template = parse_node(PATROL).unwrap();
        let text = describe(template.as_ref());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "sequence (0/3)");
        assert!(lines[1].starts_with("  navigate destination=\"Dock-1\""));
        assert!(lines[2].starts_with("  wait seconds=5"));
        assert_eq!(lines[3], "  repeat (0/2)");
        assert!(lines[4].starts_with("    navigate destination=\"Dock-2\" max_speed=1.5"));
    }
}

// ── Wait ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod wait {
    use ts_core::ModelState;

    use super::helpers::{depot, run};
    use crate::{BehaviorError, BehaviorNode, WaitBehavior, parse_node};

    #[test]
    fn completes_after_duration() {
        let b = depot();
        let mut wait = WaitBehavior::new(2.0);
        let mut state = ModelState { velocity: Some([1.0, 1.0]), ..ModelState::at(3.0, 4.0) };
        run(&mut wait, &mut state, &b, 3, 0.5);
        assert!(!wait.is_complete());
        assert_eq!(state.velocity, None);
        assert_eq!((state.x, state.y), (3.0, 4.0));
        run(&mut wait, &mut state, &b, 1, 0.5);
        assert!(wait.is_complete());
        assert_eq!(wait.elapsed(), 2.0);
    }

    #[test]
    fn zero_seconds_is_already_complete() {
        assert!(WaitBehavior::new(0.0).is_complete());
    }

    #[test]
    fn script_validation() {
        assert!(matches!(
            parse_node("{ type: wait }"),
            Err(BehaviorError::MissingField { field: "seconds", .. })
        ));
        assert!(matches!(
            parse_node("{ type: wait, seconds: -1 }"),
            Err(BehaviorError::InvalidField { field: "seconds", .. })
        ));
    }
}

// ── Composites ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod composite {
    use ts_core::ModelState;

    use super::helpers::{depot, run};
    use crate::{BehaviorError, BehaviorNode, Parallel, Repeat, Sequence, WaitBehavior, parse_node};

    fn waits(seconds: &[f64]) -> Vec<Box<dyn BehaviorNode>> {
        seconds
            .iter()
            .map(|&s| Box::new(WaitBehavior::new(s)) as Box<dyn BehaviorNode>)
            .collect()
    }

    #[test]
    fn sequence_runs_children_in_order() {
        let b = depot();
        let mut seq = parse_node(
            "{ type: sequence, children: [{ type: navigate, destination: Dock-1 }, { type: wait, seconds: 2 }] }",
        )
        .unwrap();
        let mut state = ModelState::default();
        run(seq.as_mut(), &mut state, &b, 5, 1.0);
        assert_eq!(state.x, 10.0);
        assert!(!seq.is_complete());
        run(seq.as_mut(), &mut state, &b, 1, 1.0);
        assert!(!seq.is_complete());
        run(seq.as_mut(), &mut state, &b, 1, 1.0);
        assert!(seq.is_complete());
    }

    #[test]
    fn empty_sequence_is_complete() {
        assert!(Sequence::new(Vec::new()).is_complete());
        assert!(parse_node("{ type: sequence, children: [] }").unwrap().is_complete());
    }

    #[test]
    fn sequence_skips_finished_children() {
        let b = depot();
        let mut seq = Sequence::new(waits(&[0.0, 1.0]));
        let mut state = ModelState::default();
        run(&mut seq, &mut state, &b, 1, 1.0);
        assert!(seq.is_complete());
        assert_eq!(seq.current(), 2);
    }

    #[test]
    fn parallel_waits_for_all_children() {
        let b = depot();
        let mut par = Parallel::new(waits(&[1.0, 3.0]));
        let mut state = ModelState::default();
        run(&mut par, &mut state, &b, 1, 1.0);
        assert!(par.children()[0].is_complete());
        assert!(!par.is_complete());
        run(&mut par, &mut state, &b, 2, 1.0);
        assert!(par.is_complete());
    }

    #[test]
    fn repeat_runs_fresh_clones() {
        let b = depot();
        let mut rep = Repeat::new(Box::new(WaitBehavior::new(1.0)), 3);
        let mut state = ModelState::default();
        run(&mut rep, &mut state, &b, 2, 1.0);
        assert_eq!(rep.completed(), 2);
        assert!(!rep.is_complete());
        run(&mut rep, &mut state, &b, 1, 1.0);
        assert!(rep.is_complete());
    }

    #[test]
    fn repeat_count_validated() {
        assert!(matches!(
            parse_node("{ type: repeat, count: 0, child: { type: wait, seconds: 1 } }"),
            Err(BehaviorError::InvalidField { field: "count", .. })
        ));
        assert!(matches!(
            parse_node("{ type: repeat, count: 2 }"),
            Err(BehaviorError::MissingField { field: "child", .. })
        ));
    }

    #[test]
    fn children_must_be_a_list() {
        assert!(matches!(
            parse_node("{ type: parallel, children: { type: wait, seconds: 1 } }"),
            Err(BehaviorError::InvalidField { field: "children", .. })
        ));
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use std::fmt;

    use serde_yaml::Value;
    use ts_core::ModelState;

    use crate::{BehaviorError, BehaviorNode, BehaviorResult, NodeRegistry, TickContext, parse_node};

    #[test]
    fn default_tags() {
        let tags: Vec<_> = NodeRegistry::default().tags().map(str::to_owned).collect();
        assert_eq!(tags, ["navigate", "parallel", "repeat", "sequence", "wait"]);
    }

    #[test]
    fn unknown_tag_aborts_whole_tree() {
        let err = parse_node(
            "{ type: sequence, children: [{ type: wait, seconds: 1 }, { type: fly, to: moon }] }",
        )
        .unwrap_err();
        match err {
            BehaviorError::UnknownNodeType(tag) => assert_eq!(tag, "fly"),
            other => panic!("expected UnknownNodeType, got {other:?}"),
        }
    }

    #[test]
    fn missing_type_tag() {
        assert!(matches!(parse_node("{ seconds: 1 }"), Err(BehaviorError::MissingType)));
        assert!(matches!(parse_node("- wait"), Err(BehaviorError::MissingType)));
    }

    /// Spins in place forever.
    #[derive(Debug)]
    struct Spin {
        rate: f64,
    }

    impl BehaviorNode for Spin {
        fn type_tag(&self) -> &'static str {
            "spin"
        }

        fn tick(&mut self, dt: f64, state: &mut ModelState, _ctx: &TickContext<'_>) {
            state.yaw += self.rate * dt;
        }

        fn is_complete(&self) -> bool {
            false
        }

        fn clone_node(&self) -> Box<dyn BehaviorNode> {
            Box::new(Spin { rate: self.rate })
        }

        fn print(&self, out: &mut dyn fmt::Write, _depth: usize) -> fmt::Result {
            writeln!(out, "spin rate={}", self.rate)
        }
    }

    fn build_spin(desc: &Value, _: &NodeRegistry) -> BehaviorResult<Box<dyn BehaviorNode>> {
        let rate = desc.get("rate").and_then(Value::as_f64).unwrap_or(1.0);
        Ok(Box::new(Spin { rate }))
    }

    #[test]
    fn custom_node_nests_in_builtin_composites() {
        let mut registry = NodeRegistry::default();
        registry.register("spin", build_spin);
        assert!(registry.contains("spin"));

        let desc: Value =
            serde_yaml::from_str("{ type: parallel, children: [{ type: spin, rate: 0.5 }] }").unwrap();
        let node = registry.build(&desc).unwrap();
        assert_eq!(node.type_tag(), "parallel");

        // The built-in registry still rejects it.
        assert!(matches!(
            NodeRegistry::default().build(&desc),
            Err(BehaviorError::UnknownNodeType(_))
        ));
    }
}

// ── Library ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod library {
    use ts_core::ModelState;

    use super::helpers::{depot, run};
    use crate::{BehaviorError, BehaviorLibrary, describe};

    const SCRIPT: &str = r#"
behaviors:
  deliver:
    type: sequence
    children:
      - { type: navigate, destination: Dock-1 }
      - { type: wait, seconds: 2 }
  hop:
    - { type: navigate, destination: Dock-2 }
    - { type: navigate, destination: start }
"#;

    #[test]
    fn names_sorted() {
        let lib = BehaviorLibrary::from_yaml_str(SCRIPT).unwrap();
        assert_eq!(lib.names().collect::<Vec<_>>(), ["deliver", "hop"]);
        assert_eq!(lib.len(), 2);
    }

    #[test]
    fn list_is_implicit_sequence() {
        let lib = BehaviorLibrary::from_yaml_str(SCRIPT).unwrap();
        assert_eq!(lib.get("hop").unwrap().type_tag(), "sequence");
    }

    #[test]
    fn instances_are_independent() {
        let b = depot();
        let lib = BehaviorLibrary::from_yaml_str(SCRIPT).unwrap();
        let mut first = lib.instantiate("deliver").unwrap();
        let second = lib.instantiate("deliver").unwrap();
        let mut state = ModelState::default();
        run(first.as_mut(), &mut state, &b, 7, 1.0);
        assert!(first.is_complete());
        assert!(!second.is_complete());
        assert_eq!(describe(second.as_ref()), describe(lib.get("deliver").unwrap()));
    }

    #[test]
    fn unknown_behavior() {
        let lib = BehaviorLibrary::from_yaml_str(SCRIPT).unwrap();
        match lib.instantiate("dance") {
            Err(BehaviorError::UnknownBehavior(name)) => assert_eq!(name, "dance"),
            other => panic!("expected UnknownBehavior, got {other:?}"),
        }
    }

    #[test]
    fn errors_name_the_behavior() {
        let err = BehaviorLibrary::from_yaml_str("behaviors:\n  broken: { type: navigate }\n").unwrap_err();
        assert!(matches!(&err, BehaviorError::InBehavior { name, .. } if name == "broken"));
        assert_eq!(err.node_type(), Some("navigate"));
    }

    #[test]
    fn missing_behaviors_key() {
        assert!(matches!(
            BehaviorLibrary::from_yaml_str("patrol: { type: wait, seconds: 1 }"),
            Err(BehaviorError::Script(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("behaviors.yaml");
        std::fs::write(&path, SCRIPT).unwrap();
        let lib = BehaviorLibrary::load(&path).unwrap();
        assert!(lib.get("deliver").is_some());

        assert!(matches!(
            BehaviorLibrary::load(&dir.path().join("missing.yaml")),
            Err(BehaviorError::Io(_))
        ));
    }
}
