// Tracing log adapter - Structured pipeline events through the tracing crate

use async_trait::async_trait;

use crate::ports::*;

/// Forwards pipeline events to the global tracing subscriber
pub struct TracingLogAdapter {
    min_level: LogLevel,
}

impl TracingLogAdapter {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Trace,
        }
    }

    /// Drop events below `level` before they reach tracing
    pub fn with_min_level(level: LogLevel) -> Self {
        Self { min_level: level }
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn render_fields(event: &PipelineEvent) -> String {
        event
            .fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for TracingLogAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogPort for TracingLogAdapter {
    async fn log_event(&self, event: &PipelineEvent) {
        if !self.should_log(event.level) {
            return;
        }

        let request_id = event.request_id.as_str();
        let stage = event.stage.as_str();
        let fields = Self::render_fields(event);

        match event.level {
            LogLevel::Error => {
                tracing::error!(request_id, stage, fields = %fields, "{}", event.message)
            }
            LogLevel::Warn => {
                tracing::warn!(request_id, stage, fields = %fields, "{}", event.message)
            }
            LogLevel::Info => {
                tracing::info!(request_id, stage, fields = %fields, "{}", event.message)
            }
            LogLevel::Debug => {
                tracing::debug!(request_id, stage, fields = %fields, "{}", event.message)
            }
            LogLevel::Trace => {
                tracing::trace!(request_id, stage, fields = %fields, "{}", event.message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_level_filters() {
        let adapter = TracingLogAdapter::with_min_level(LogLevel::Warn);
        assert!(!adapter.should_log(LogLevel::Info));
        assert!(adapter.should_log(LogLevel::Warn));
        assert!(adapter.should_log(LogLevel::Error));
    }

    #[test]
    fn test_fields_render_in_order() {
        let event = PipelineEvent::info("req-1", Stage::Probe, "probed")
            .field("sources", 2)
            .field("canvas", "1280x720");
        assert_eq!(
            TracingLogAdapter::render_fields(&event),
            "sources=2 canvas=1280x720"
        );
    }
}
