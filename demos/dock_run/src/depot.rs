//! Embedded inputs: a one-floor warehouse, a scenario and a behavior script.

/// Ground floor loop with three docks and a spur out to the loading ramp.
///
/// ```text
///   Dock-2 (0,10) ─── (10,10) Dock-3
///      │                  │
///   start (0,0) ─── (10,0) Dock-1 ── ramp (14,0)
/// ```
pub const BUILDING_YAML: &str = r#"
name: warehouse
levels:
  L1:
    elevation: 0.0
    vertices:
      - [0.0, 0.0, 0.0, "start"]
      - [10.0, 0.0, 0.0, "Dock-1"]
      - [0.0, 10.0, 0.0, "Dock-2"]
      - [10.0, 10.0, 0.0, "Dock-3"]
      - [14.0, 0.0, 0.0, "ramp"]
    lanes:
      - [0, 1, {bidirectional: [4, true], graph_idx: [2, 0]}]
      - [0, 2, {bidirectional: [4, true], graph_idx: [2, 0]}]
      - [1, 3, {bidirectional: [4, true], graph_idx: [2, 0]}]
      - [2, 3, {bidirectional: [4, true], graph_idx: [2, 0]}]
      - [1, 4, {bidirectional: [4, true], graph_idx: [2, 0]}]
    models:
      - {name: charger_1, model_name: Charger, x: 1.0, y: 1.0, z: 0.0, yaw: 0.0}
"#;

/// A staging point in the middle of the loop and the dock-yard region.
pub const SCENARIO_YAML: &str = r#"
name: morning_shift
vertices:
  - [5.0, 5.0, "staging"]
  - [-1.0, -1.0, ""]
  - [11.0, -1.0, ""]
  - [11.0, 11.0, ""]
  - [-1.0, 11.0, ""]
roi:
  L1: [1, 2, 3, 4]
"#;

pub const BEHAVIORS_YAML: &str = r#"
behaviors:
  deliver:
    type: sequence
    children:
      - { type: navigate, destination: Dock-1 }
      - { type: wait, seconds: 2 }
      - { type: navigate, destination: Dock-3, max_speed: 1.5 }
      - { type: navigate, destination: charger_1 }
  patrol:
    type: repeat
    count: 2
    child:
      type: sequence
      children:
        - { type: navigate, destination: Dock-3 }
        - { type: navigate, destination: ramp }
  shuttle:
    - { type: navigate, destination: Dock-2 }
    - { type: parallel, children: [{ type: wait, seconds: 1 }, { type: navigate, destination: staging }] }
    - { type: navigate, destination: start }
"#;
