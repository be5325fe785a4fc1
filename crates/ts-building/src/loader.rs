//! YAML building-map loader.
//!
//! # Format
//!
//! The loader reads the building files written by the traffic editor:
//!
//! ```yaml
//! name: depot
//! levels:
//!   L1:
//!     elevation: 0.0
//!     vertices:
//!       - [0.0, 0.0, 0.0, "start"]
//!       - [10.0, 0.0, 0.0, "Dock-1"]
//!     lanes:
//!       - [0, 1, {bidirectional: [4, true], graph_idx: [2, 0]}]
//!     models:
//!       - {name: charger_1, model_name: Charger, x: 4.0, y: 2.0, z: 0.0, yaw: 1.57}
//! ```
//!
//! Vertices are `[x, y, z, name]` or the older `[x, y, name]`.  Lane
//! parameters use the editor's `[type, value]` pair encoding; a bare value is
//! accepted too.  A lane without `bidirectional` is one-way; without
//! `graph_idx` it belongs to graph 0.

use std::path::Path;

use serde_yaml::Value;

use crate::building::{Building, Lane, Level, StaticModel, Vertex};
use crate::{BuildingError, BuildingResult};

impl Building {
    /// Load a building map file and build the planning graph `nav_graph_idx`.
    pub fn load(path: &Path, nav_graph_idx: u32) -> BuildingResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let building = Self::from_yaml_str(&text, nav_graph_idx)?;
        tracing::info!(
            path = %path.display(),
            levels = building.levels.len(),
            "loaded building {:?}",
            building.name
        );
        Ok(building)
    }

    /// Like [`Building::load`] but from an in-memory document.
    pub fn from_yaml_str(text: &str, nav_graph_idx: u32) -> BuildingResult<Self> {
        let doc: Value = serde_yaml::from_str(text)?;
        let name = doc.get("name").and_then(Value::as_str).unwrap_or_default();

        let mut levels = Vec::new();
        if let Some(map) = doc.get("levels") {
            let map = map
                .as_mapping()
                .ok_or_else(|| BuildingError::Parse("`levels` must be a mapping".into()))?;
            for (key, data) in map {
                let level_name = key
                    .as_str()
                    .ok_or_else(|| BuildingError::Parse("level names must be strings".into()))?;
                levels.push(parse_level(level_name, data)?);
            }
        }

        Ok(Building::new(name, levels, nav_graph_idx))
    }
}

// ── Element parsers ───────────────────────────────────────────────────────────

fn parse_level(name: &str, data: &Value) -> BuildingResult<Level> {
    let elevation = data.get("elevation").map(|v| number(v, name, "elevation")).transpose()?;

    let vertices = seq(data, "vertices")
        .iter()
        .enumerate()
        .map(|(i, v)| parse_vertex(v).ok_or_else(|| {
            BuildingError::Parse(format!("level {name:?}: malformed vertex #{i}"))
        }))
        .collect::<BuildingResult<Vec<_>>>()?;

    let lanes = seq(data, "lanes")
        .iter()
        .enumerate()
        .map(|(i, v)| parse_lane(v, vertices.len()).map_err(|why| {
            BuildingError::Parse(format!("level {name:?}: lane #{i}: {why}"))
        }))
        .collect::<BuildingResult<Vec<_>>>()?;

    let models = seq(data, "models")
        .iter()
        .map(|m| parse_model(m, name))
        .collect::<BuildingResult<Vec<_>>>()?;

    Ok(Level {
        name: name.to_owned(),
        elevation: elevation.unwrap_or(0.0),
        vertices,
        lanes,
        models,
    })
}

fn parse_vertex(v: &Value) -> Option<Vertex> {
    let items = v.as_sequence()?;
    let x = items.first()?.as_f64()?;
    let y = items.get(1)?.as_f64()?;
    let (z, name) = match items.get(2) {
        Some(z) if z.is_number() => (z.as_f64()?, items.get(3)),
        other => (0.0, other),
    };
    let name = match name {
        None => String::new(),
        Some(n) => n.as_str()?.to_owned(),
    };
    Some(Vertex { x, y, z, name })
}

fn parse_lane(v: &Value, vertex_count: usize) -> Result<Lane, String> {
    let items = v.as_sequence().ok_or("expected a sequence")?;
    let index = |i: usize| -> Result<usize, String> {
        let idx = items
            .get(i)
            .and_then(Value::as_u64)
            .ok_or_else(|| format!("element {i} must be a vertex index"))? as usize;
        if idx >= vertex_count {
            return Err(format!("vertex index {idx} out of range (level has {vertex_count})"));
        }
        Ok(idx)
    };
    let start = index(0)?;
    let end = index(1)?;

    let params = items.get(2);
    let param = |key: &str| params.and_then(|p| p.get(key)).map(param_value);

    let bidirectional = match param("bidirectional") {
        None => false,
        Some(v) => v.as_bool().ok_or("`bidirectional` must be a bool")?,
    };
    let graph_idx = match param("graph_idx") {
        None => 0,
        Some(v) => v.as_u64().ok_or("`graph_idx` must be a non-negative integer")? as u32,
    };

    Ok(Lane { start, end, bidirectional, graph_idx })
}

fn parse_model(m: &Value, level: &str) -> BuildingResult<StaticModel> {
    let text = |key: &str| m.get(key).and_then(Value::as_str).unwrap_or_default().to_owned();
    let coord = |key: &str| m.get(key).map(|v| number(v, level, key)).transpose().map(Option::unwrap_or_default);
    Ok(StaticModel {
        name:       text("name"),
        model_name: text("model_name"),
        x:          coord("x")?,
        y:          coord("y")?,
        z:          coord("z")?,
        yaw:        coord("yaw")?,
    })
}

// ── Value helpers ─────────────────────────────────────────────────────────────

/// Unwrap the editor's `[type, value]` parameter encoding.
fn param_value(v: &Value) -> &Value {
    match v.as_sequence() {
        Some(pair) if pair.len() == 2 && pair[0].is_number() => &pair[1],
        _ => v,
    }
}

fn seq<'a>(data: &'a Value, key: &str) -> &'a [Value] {
    data.get(key)
        .and_then(Value::as_sequence)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn number(v: &Value, level: &str, key: &str) -> BuildingResult<f64> {
    v.as_f64()
        .ok_or_else(|| BuildingError::Parse(format!("level {level:?}: `{key}` must be a number")))
}
