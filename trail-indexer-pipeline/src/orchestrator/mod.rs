//! Orchestrator module for the trail indexer pipeline.
//!
//! Drives one invocation through the stages
//! `Idle → Fetching → Decompressing → Extracting → Dispatching → Completed | Failed`
//! and produces exactly one outcome for it.

use std::fmt;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::decoder::Decompressor;
use crate::dispatcher::{Dispatcher, InFlightDeliveries};
use crate::errors::PipelineError;
use crate::extractor::RecordExtractor;
use crate::fetcher::ArchiveFetcher;
use crate::trigger::resolve_location;
use trail_indexer_shared::TriggerEvent;

/// Message reported when an invocation completes.
pub const SUCCESS_MESSAGE: &str = "cloudtrail event pushed";

/// Stages of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Fetching,
    Decompressing,
    Extracting,
    Dispatching,
    Completed,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Decompressing => "decompressing",
            Self::Extracting => "extracting",
            Self::Dispatching => "dispatching",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The single result reported for an invocation.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Every record was dispatched. Carries the success message.
    Completed(String),
    /// A stage failed before dispatch.
    Failed(PipelineError),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Convert into the success/failure channel pair.
    pub fn into_result(self) -> Result<String, PipelineError> {
        match self {
            Self::Completed(message) => Ok(message),
            Self::Failed(error) => Err(error),
        }
    }
}

/// Everything one invocation produced.
pub struct Invocation {
    pub invocation_id: Uuid,
    pub outcome: Outcome,
    /// Stages entered, in order, starting with `Idle`.
    pub stages: Vec<PipelineStage>,
    /// Deliveries dispatched by this invocation. Empty unless it completed.
    pub deliveries: InFlightDeliveries,
}

/// Stage bookkeeping for one invocation.
struct StageTracker {
    stages: Vec<PipelineStage>,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            stages: vec![PipelineStage::Idle],
        }
    }

    fn current(&self) -> PipelineStage {
        self.stages
            .last()
            .copied()
            .unwrap_or(PipelineStage::Idle)
    }

    fn advance(&mut self, to: PipelineStage) {
        debug!(from = %self.current(), to = %to, "Stage transition");
        self.stages.push(to);
    }
}

/// Orchestrator that runs the pipeline stages for one event at a time.
///
/// Holds no per-invocation state, so one instance can serve concurrent
/// invocations.
pub struct Orchestrator {
    fetcher: ArchiveFetcher,
    decompressor: Decompressor,
    extractor: RecordExtractor,
    dispatcher: Dispatcher,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(
        fetcher: ArchiveFetcher,
        decompressor: Decompressor,
        extractor: RecordExtractor,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            fetcher,
            decompressor,
            extractor,
            dispatcher,
        }
    }

    /// Run one invocation.
    ///
    /// Fetch, decompress and extract run in sequence; the first failure ends
    /// the invocation. On success every record is dispatched and the
    /// invocation completes without waiting for any delivery.
    pub async fn invoke(&self, event: &TriggerEvent) -> Invocation {
        let invocation_id = Uuid::new_v4();
        let span = info_span!("invocation", %invocation_id);

        async move {
            let mut tracker = StageTracker::new();

            match self.run(event, &mut tracker).await {
                Ok(deliveries) => {
                    tracker.advance(PipelineStage::Completed);
                    info!(dispatched = deliveries.len(), "{}", SUCCESS_MESSAGE);
                    Invocation {
                        invocation_id,
                        outcome: Outcome::Completed(SUCCESS_MESSAGE.to_string()),
                        stages: tracker.stages,
                        deliveries,
                    }
                }
                Err(e) => {
                    let failed_in = tracker.current();
                    tracker.advance(PipelineStage::Failed);
                    error!(stage = %failed_in, error = %e, "Invocation failed");
                    Invocation {
                        invocation_id,
                        outcome: Outcome::Failed(e),
                        stages: tracker.stages,
                        deliveries: InFlightDeliveries::empty(),
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        event: &TriggerEvent,
        tracker: &mut StageTracker,
    ) -> Result<InFlightDeliveries, PipelineError> {
        let location = resolve_location(event)?;

        tracker.advance(PipelineStage::Fetching);
        let archive = self.fetcher.fetch(&location).await?;

        tracker.advance(PipelineStage::Decompressing);
        let text = self.decompressor.decompress(&archive)?;
        drop(archive);

        tracker.advance(PipelineStage::Extracting);
        let records = self.extractor.extract(&text)?;
        drop(text);

        tracker.advance(PipelineStage::Dispatching);
        Ok(self.dispatcher.dispatch(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_tracker() {
        let mut tracker = StageTracker::new();
        assert_eq!(tracker.current(), PipelineStage::Idle);

        tracker.advance(PipelineStage::Fetching);
        tracker.advance(PipelineStage::Failed);

        assert_eq!(
            tracker.stages,
            vec![PipelineStage::Idle, PipelineStage::Fetching, PipelineStage::Failed]
        );
    }

    #[test]
    fn test_outcome_into_result() {
        let ok = Outcome::Completed(SUCCESS_MESSAGE.to_string());
        assert!(ok.is_completed());
        assert_eq!(ok.into_result().unwrap(), "cloudtrail event pushed");

        let failed = Outcome::Failed(PipelineError::decode("bad"));
        assert!(!failed.is_completed());
        assert!(matches!(failed.into_result(), Err(PipelineError::DecodeError(_))));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(PipelineStage::Decompressing.to_string(), "decompressing");
        assert_eq!(PipelineStage::Completed.to_string(), "completed");
    }
}
