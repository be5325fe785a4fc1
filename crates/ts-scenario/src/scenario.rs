//! The `Scenario` record and its YAML persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use ts_building::Vertex;

use crate::{Polygon, ScenarioError, ScenarioResult};

// ── On-disk document ──────────────────────────────────────────────────────────

#[derive(Default, Deserialize, Serialize)]
struct ScenarioDoc {
    #[serde(default)]
    name:     String,
    #[serde(default)]
    vertices: Vec<(f64, f64, String)>,
    #[serde(default)]
    roi:      BTreeMap<String, Vec<usize>>,
}

// ── Scenario ──────────────────────────────────────────────────────────────────

/// Named vertices plus a region of interest on each level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scenario {
    pub name:     String,
    pub filename: PathBuf,
    pub vertices: Vec<Vertex>,
    /// Region of interest keyed by level name.
    pub roi:      BTreeMap<String, Polygon>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, filename: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            ..Self::default()
        }
    }

    /// Read a scenario from `path`, remembering it as the backing file.
    pub fn open(path: &Path) -> ScenarioResult<Self> {
        let mut scenario = Self::new("", path);
        scenario.load()?;
        Ok(scenario)
    }

    /// Replace the contents with what is stored in `self.filename`.
    ///
    /// On error `self` is left unchanged.
    pub fn load(&mut self) -> ScenarioResult<()> {
        if self.filename.as_os_str().is_empty() {
            return Err(ScenarioError::NoFilename);
        }
        let text = std::fs::read_to_string(&self.filename).map_err(|source| ScenarioError::Io {
            path: self.filename.clone(),
            source,
        })?;
        let loaded = Self::from_yaml_str(&text)?;
        self.name = loaded.name;
        self.vertices = loaded.vertices;
        self.roi = loaded.roi;
        tracing::debug!(
            path = %self.filename.display(),
            vertices = self.vertices.len(),
            regions = self.roi.len(),
            "loaded scenario {:?}",
            self.name
        );
        Ok(())
    }

    /// Write the scenario to `self.filename`.
    pub fn save(&self) -> ScenarioResult<()> {
        if self.filename.as_os_str().is_empty() {
            return Err(ScenarioError::NoFilename);
        }
        let text = self.to_yaml_string()?;
        std::fs::write(&self.filename, text).map_err(|source| ScenarioError::Io {
            path: self.filename.clone(),
            source,
        })
    }

    /// Parse a scenario document.  The returned value has no filename.
    pub fn from_yaml_str(text: &str) -> ScenarioResult<Self> {
        let doc: ScenarioDoc = serde_yaml::from_str(text)?;
        let vertices: Vec<Vertex> = doc
            .vertices
            .into_iter()
            .map(|(x, y, name)| Vertex::new(x, y, name))
            .collect();

        let mut roi = BTreeMap::new();
        for (level, indices) in doc.roi {
            if let Some(&index) = indices.iter().find(|&&i| i >= vertices.len()) {
                return Err(ScenarioError::VertexOutOfRange {
                    level,
                    index,
                    count: vertices.len(),
                });
            }
            roi.insert(level, Polygon::new(indices));
        }

        Ok(Self {
            name: doc.name,
            filename: PathBuf::new(),
            vertices,
            roi,
        })
    }

    pub fn to_yaml_string(&self) -> ScenarioResult<String> {
        let doc = ScenarioDoc {
            name:     self.name.clone(),
            vertices: self.vertices.iter().map(|v| (v.x, v.y, v.name.clone())).collect(),
            roi:      self.roi.iter().map(|(k, p)| (k.clone(), p.vertices.clone())).collect(),
        };
        Ok(serde_yaml::to_string(&doc)?)
    }

    /// First vertex carrying `name`.
    pub fn find_vertex(&self, name: &str) -> Option<&Vertex> {
        if name.is_empty() {
            return None;
        }
        self.vertices.iter().find(|v| v.name == name)
    }

    /// `true` if `(x, y)` lies inside the region of interest of `level`.
    /// Levels without a region contain nothing.
    pub fn roi_contains(&self, level: &str, x: f64, y: f64) -> bool {
        self.roi
            .get(level)
            .is_some_and(|p| p.contains(&self.vertices, x, y))
    }
}
