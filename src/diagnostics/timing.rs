use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Wall-clock duration of one named stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for one grid operation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn with_total(total_ms: f64) -> Self {
        Self {
            total_ms,
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    /// Run `f`, recording its duration under `label`.
    pub fn time_stage<R>(&mut self, label: &str, f: impl FnOnce() -> R) -> R {
        let start = Instant::now();
        let out = f();
        self.push(label, start.elapsed().as_secs_f64() * 1000.0);
        out
    }

    /// Elapsed time of the first stage called `label`.
    pub fn stage_ms(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_keep_their_order() {
        let mut t = TimingBreakdown::with_total(3.0);
        t.push("a", 1.0);
        let v = t.time_stage("b", || 42);
        assert_eq!(v, 42);
        assert_eq!(t.stages.len(), 2);
        assert_eq!(t.stages[1].label, "b");
        assert_eq!(t.stage_ms("a"), Some(1.0));
        assert!(t.stage_ms("missing").is_none());
    }

    #[test]
    fn serializes_camel_case() {
        let mut t = TimingBreakdown::with_total(2.5);
        t.push("row_pass", 1.25);
        let json = serde_json::to_value(&t).expect("json");
        assert_eq!(json["totalMs"], 2.5);
        assert_eq!(json["stages"][0]["elapsedMs"], 1.25);
    }
}
