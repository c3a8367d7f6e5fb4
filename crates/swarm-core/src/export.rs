//! Trajectory export for offline inspection.
//!
//! The document holds every agent's trajectory ring, concatenated in agent
//! order, plus the canvas size. Nothing in the engine reads it back.

use std::path::Path;

use serde::{Deserialize, Serialize};
use swarm_agents::Agent;
use swarm_types::Canvas;
use tracing::info;

/// Errors that can occur when writing an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Failed to write the document.
    #[error("failed to write export: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to serialize the document.
    #[error("failed to serialize export: {source}")]
    Json {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Agent trajectory samples plus canvas dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryExport {
    /// Every trajectory sample as an `(x, y)` pair.
    pub points: Vec<(f32, f32)>,
    /// Canvas width.
    pub width: f32,
    /// Canvas height.
    pub height: f32,
}

impl TrajectoryExport {
    /// Capture the current trajectories of `agents`.
    pub fn capture(agents: &[Agent], canvas: Canvas) -> Self {
        let points = agents
            .iter()
            .flat_map(|agent| agent.trajectory().iter().map(|p| (p.x, p.y)))
            .collect();
        Self {
            points,
            width: canvas.width,
            height: canvas.height,
        }
    }

    /// The document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] if the file cannot be written, or
    /// [`ExportError::Json`] if serialization fails.
    pub fn write_to(&self, path: &Path) -> Result<(), ExportError> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        info!(path = %path.display(), points = self.points.len(), "Exported trajectories");
        Ok(())
    }
}
