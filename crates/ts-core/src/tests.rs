//! Unit tests for ts-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, ModelId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = ModelId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(ModelId::from_index(42), id);
        assert_eq!(id.next(), ModelId(43));
    }

    #[test]
    fn ordering() {
        assert!(ModelId(0) < ModelId(1));
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn graph_ids_index_arrays() {
        let nodes = ["a", "b", "c"];
        assert_eq!(nodes[NodeId::from_index(2).index()], "c");
        assert_eq!(EdgeId::from_index(0), EdgeId(0));
    }

    #[test]
    fn display() {
        assert_eq!(ModelId(7).to_string(), "ModelId(7)");
    }
}

#[cfg(test)]
mod state {
    use std::f64::consts::FRAC_PI_2;

    use crate::ModelState;

    #[test]
    fn distances() {
        let a = ModelState::at(0.0, 0.0);
        let b = ModelState::new(3.0, 4.0, 12.0, 0.0);
        assert_eq!(a.planar_distance_to(&b), 5.0);
        assert_eq!(a.distance_to(&b), 13.0);
    }

    #[test]
    fn heading_points_at_target() {
        let a = ModelState::at(1.0, 1.0);
        let b = ModelState::at(1.0, 5.0);
        assert!((a.heading_to(&b) - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn heading_to_self_keeps_yaw() {
        let a = ModelState::new(2.0, 2.0, 0.0, 0.75);
        assert_eq!(a.heading_to(&a), 0.75);
    }

    #[test]
    fn value_equality() {
        assert_eq!(ModelState::at(1.0, 2.0), ModelState::new(1.0, 2.0, 0.0, 0.0));
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Step};

    #[test]
    fn step_arithmetic() {
        assert_eq!(Step(3) + 4, Step(7));
        assert_eq!(Step::ZERO + 1, Step(1));
    }

    #[test]
    fn clock_advances() {
        let mut clock = SimClock::new(0.5);
        clock.advance();
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_step, Step(3));
        assert_eq!(clock.elapsed_secs(), 1.5);
        assert_eq!(clock.to_string(), "S3 (1.50 s)");
    }

    #[test]
    fn secs_at_scales_by_dt() {
        let clock = SimClock::new(0.25);
        assert_eq!(clock.secs_at(Step(4)), 1.0);
        assert_eq!(clock.secs_at(Step(3) + 1), 1.0);
    }

    #[test]
    fn default_config_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.end_step(), Step(config.total_steps));
    }

    #[test]
    fn rejects_non_positive_dt() {
        let config = SimConfig { dt_secs: 0.0, ..SimConfig::default() };
        assert!(config.validate().is_err());
        let config = SimConfig { dt_secs: f64::NAN, ..SimConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_threads() {
        let config = SimConfig { num_threads: Some(0), ..SimConfig::default() };
        assert!(config.validate().is_err());
    }
}
