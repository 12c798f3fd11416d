//! Per-scene outcomes of an ingestion batch.

use serde::Serialize;

/// What happened to one scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SceneOutcome {
    /// The scene contributed `chunks` output records read from `source`.
    Ingested { chunks: usize, source: String },
    /// The scene contributed nothing.
    Dropped { reasons: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneReport {
    pub scene_id: String,
    #[serde(flatten)]
    pub outcome: SceneOutcome,
}

impl SceneReport {
    pub fn is_dropped(&self) -> bool {
        matches!(self.outcome, SceneOutcome::Dropped { .. })
    }
}

/// Outcomes of every scene in a batch, in batch order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestionReport {
    scenes: Vec<SceneReport>,
}

impl IngestionReport {
    pub fn new(scenes: Vec<SceneReport>) -> Self {
        Self { scenes }
    }

    pub fn scenes(&self) -> &[SceneReport] {
        &self.scenes
    }

    pub fn scene(&self, scene_id: &str) -> Option<&SceneReport> {
        self.scenes.iter().find(|s| s.scene_id == scene_id)
    }

    /// Scenes that contributed no records.
    pub fn dropped(&self) -> Vec<&SceneReport> {
        self.scenes.iter().filter(|s| s.is_dropped()).collect()
    }

    pub fn ingested_count(&self) -> usize {
        self.scenes.len() - self.dropped_count()
    }

    pub fn dropped_count(&self) -> usize {
        self.scenes.iter().filter(|s| s.is_dropped()).count()
    }

    /// Output records across all scenes.
    pub fn total_chunks(&self) -> usize {
        self.scenes
            .iter()
            .map(|s| match &s.outcome {
                SceneOutcome::Ingested { chunks, .. } => *chunks,
                SceneOutcome::Dropped { .. } => 0,
            })
            .sum()
    }

    /// Check that every scene contributed.
    pub fn is_complete(&self) -> bool {
        self.dropped_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> IngestionReport {
        IngestionReport::new(vec![
            SceneReport {
                scene_id: "LC80140322017245LGN00".to_string(),
                outcome: SceneOutcome::Ingested {
                    chunks: 12,
                    source: "s3://landsat-pds/L8".to_string(),
                },
            },
            SceneReport {
                scene_id: "LC80140332017245LGN00".to_string(),
                outcome: SceneOutcome::Dropped {
                    reasons: vec!["primary: not found".to_string(), "secondary: HTTP 404".to_string()],
                },
            },
        ])
    }

    #[test]
    fn test_counts() {
        let report = report();
        assert_eq!(report.ingested_count(), 1);
        assert_eq!(report.dropped_count(), 1);
        assert_eq!(report.total_chunks(), 12);
        assert!(!report.is_complete());
        assert_eq!(report.dropped()[0].scene_id, "LC80140332017245LGN00");
        assert!(IngestionReport::default().is_complete());
    }

    #[test]
    fn test_serializes_flat() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["scenes"][0]["status"], "ingested");
        assert_eq!(json["scenes"][0]["chunks"], 12);
        assert_eq!(json["scenes"][1]["reasons"][1], "secondary: HTTP 404");
    }
}
