use serde::{Deserialize, Serialize};

use super::{RawIncrement, TerminalResult};

/// Coarse phase reported alongside progress by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressPhase {
    #[default]
    Initializing,
    LoadingData,
    PreparingStrategies,
    RunningBacktest,
    StoringResults,
    Completed,
    Failed,
}

impl ProgressPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::LoadingData => "loading_data",
            Self::PreparingStrategies => "preparing_strategies",
            Self::RunningBacktest => "running_backtest",
            Self::StoringResults => "storing_results",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ProgressPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Events emitted by the computation engine for one task.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EngineEvent {
    #[serde(rename_all = "camelCase")]
    Progress {
        task_id: String,
        percent: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        phase: Option<ProgressPhase>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Increment {
        task_id: String,
        #[serde(default)]
        increment: RawIncrement,
    },
    #[serde(rename_all = "camelCase")]
    Completed {
        task_id: String,
        #[serde(default)]
        result: TerminalResult,
    },
    #[serde(rename_all = "camelCase")]
    Error { task_id: String, error: String },
    #[serde(rename_all = "camelCase")]
    Cancelled { task_id: String },
}

impl EngineEvent {
    pub fn task_id(&self) -> &str {
        match self {
            Self::Progress { task_id, .. }
            | Self::Increment { task_id, .. }
            | Self::Completed { task_id, .. }
            | Self::Error { task_id, .. }
            | Self::Cancelled { task_id } => task_id,
        }
    }

    /// Completed, error and cancelled end the task.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. } | Self::Error { .. } | Self::Cancelled { .. }
        )
    }

    /// Parse one JSON-encoded event.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progress_event() {
        let raw = r#"{"type":"progress","taskId":"t1","percent":42.5,"phase":"running_backtest"}"#;
        let event = EngineEvent::parse(raw).unwrap();

        assert_eq!(event.task_id(), "t1");
        assert!(!event.is_terminal());
        match event {
            EngineEvent::Progress { percent, phase, .. } => {
                assert_eq!(percent, 42.5);
                assert_eq!(phase, Some(ProgressPhase::RunningBacktest));
            }
            other => panic!("Expected Progress, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_increment_with_missing_fields() {
        let raw = r#"{"type":"increment","taskId":"t1","increment":{"processedBars":5}}"#;
        let event = EngineEvent::parse(raw).unwrap();

        if let EngineEvent::Increment { increment, .. } = event {
            assert!(increment.new_candles.is_empty());
            assert_eq!(increment.processed_bars, 5);
        } else {
            panic!("Expected Increment");
        }
    }

    #[test]
    fn test_increment_with_negative_processed_bars_keeps_data() {
        let raw = r#"{"type":"increment","taskId":"t1","increment":{
            "newCandles":[{"timestamp":60,"open":1,"high":2,"low":0.5,"close":1.5,"volume":3}],
            "processedBars":-1,"totalBars":10
        }}"#;
        let event = EngineEvent::parse(raw).unwrap();

        if let EngineEvent::Increment { increment, .. } = event {
            assert_eq!(increment.new_candles.len(), 1);
            assert_eq!(increment.processed_bars, 0);
            assert_eq!(increment.total_bars, 10);
        } else {
            panic!("Expected Increment");
        }
    }

    #[test]
    fn test_parse_terminal_events() {
        let completed =
            EngineEvent::parse(r#"{"type":"completed","taskId":"t1","result":{}}"#).unwrap();
        let error = EngineEvent::parse(r#"{"type":"error","taskId":"t1","error":"boom"}"#).unwrap();
        let cancelled = EngineEvent::parse(r#"{"type":"cancelled","taskId":"t1"}"#).unwrap();

        assert!(completed.is_terminal());
        assert!(error.is_terminal());
        assert!(cancelled.is_terminal());
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        assert!(EngineEvent::parse(r#"{"type":"heartbeat","taskId":"t1"}"#).is_err());
    }
}
