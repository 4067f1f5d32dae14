//! Per-stage wall clock timings for a decode call

use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Serialize)]
pub struct StageTiming {
    pub name: String,
    #[serde(rename = "ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StageTimings {
    stages: Vec<StageTiming>,
}

impl StageTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stage(&mut self, name: impl Into<String>, duration: Duration) {
        self.stages.push(StageTiming {
            name: name.into(),
            duration,
        });
    }

    /// Run `f` and record how long it took
    pub fn time<T>(&mut self, name: &str, f: impl FnOnce() -> T) -> T {
        let timer = Timer::start(name);
        let result = f();
        let (name, duration) = timer.stop();
        self.add_stage(name, duration);
        result
    }

    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }

    pub fn get_stage(&self, name: &str) -> Option<Duration> {
        self.stages
            .iter()
            .filter(|s| s.name == name)
            .map(|s| s.duration)
            .reduce(|a, b| a + b)
    }

    pub fn stages(&self) -> &[StageTiming] {
        &self.stages
    }

    /// Multi-line table with each stage's share of the total
    pub fn summary(&self) -> String {
        let total = self.total_duration();
        let mut lines = vec![format!("{:-<52}", "")];
        for stage in &self.stages {
            let percentage = if total.as_secs_f64() > 0.0 {
                (stage.duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "{:<22} {:>12.3}ms ({:>5.1}%)",
                stage.name,
                stage.duration.as_secs_f64() * 1000.0,
                percentage
            ));
        }
        lines.push(format!("{:-<52}", ""));
        lines.push(format!("{:<22} {:>12.3}ms", "total", total.as_secs_f64() * 1000.0));
        lines.join("\n")
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    pub fn stop(self) -> (String, Duration) {
        (self.name, self.start.elapsed())
    }
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_accumulate() {
        let mut timings = StageTimings::new();
        timings.add_stage("sample", Duration::from_millis(3));
        timings.add_stage("segment", Duration::from_millis(2));
        timings.add_stage("sample", Duration::from_millis(1));

        assert_eq!(timings.total_duration(), Duration::from_millis(6));
        assert_eq!(timings.get_stage("sample"), Some(Duration::from_millis(4)));
        assert_eq!(timings.get_stage("decode"), None);
        assert_eq!(timings.stages().len(), 3);
        assert!(timings.summary().contains("segment"));
    }

    #[test]
    fn test_time_returns_closure_value() {
        let mut timings = StageTimings::new();
        let value = timings.time("work", || 21 * 2);
        assert_eq!(value, 42);
        assert_eq!(timings.stages()[0].name, "work");
    }

    #[test]
    fn test_serializes_milliseconds() {
        let mut timings = StageTimings::new();
        timings.add_stage("load", Duration::from_micros(1500));
        let json = serde_json::to_string(&timings).unwrap();
        assert_eq!(json, r#"{"stages":[{"name":"load","ms":1.5}]}"#);
    }
}
