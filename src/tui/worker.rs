//! Background assessment worker.
//!
//! Scoring itself is instant; the worker models the latency a real clinical
//! backend call would have. It runs off the UI thread, reports progress over
//! a channel, and carries an explicit cancellation flag so a result computed
//! for a superseded session is discarded instead of applied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::application::AssessmentService;
use crate::domain::{Assessment, FormData};
use crate::ports::RiskModel;

/// Default simulated submission latency.
const DEFAULT_DELAY_MS: u64 = 2000;

/// Cancellation is checked at this granularity during the delay.
const CANCEL_POLL: Duration = Duration::from_millis(50);

/// Progress updates from the assessment worker.
#[derive(Debug, Clone)]
pub enum AssessmentProgress {
    /// Simulated submission in flight
    Submitting,
    /// Running the scorer
    Scoring,
    /// Assessment complete
    Complete(Assessment),
}

/// Handle to a running assessment worker.
pub struct AssessmentWorkerHandle {
    /// Receiver for progress updates
    pub progress_rx: Receiver<AssessmentProgress>,
    cancelled: Arc<AtomicBool>,
    /// Thread handle (for joining)
    _handle: JoinHandle<()>,
}

impl AssessmentWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<AssessmentProgress> {
        self.progress_rx.try_recv().ok()
    }

    /// Cancel the pending assessment.
    ///
    /// The worker stops at its next checkpoint and publishes nothing further;
    /// a stale aggregate can never produce a visible result.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

/// Worker that scores a snapshot in the background.
pub struct AssessmentWorker;

impl AssessmentWorker {
    /// Spawn a background assessment for the given snapshot.
    ///
    /// The delay comes from `HEARTGUARD_ANALYSIS_DELAY_MS` (default 2000).
    pub fn spawn<M>(service: Arc<AssessmentService<M>>, form: FormData) -> AssessmentWorkerHandle
    where
        M: RiskModel + 'static,
    {
        let delay = std::env::var("HEARTGUARD_ANALYSIS_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_DELAY_MS);
        Self::spawn_with_delay(service, form, Duration::from_millis(delay))
    }

    /// Spawn with an explicit delay (used directly by tests).
    pub fn spawn_with_delay<M>(
        service: Arc<AssessmentService<M>>,
        form: FormData,
        delay: Duration,
    ) -> AssessmentWorkerHandle
    where
        M: RiskModel + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let handle = thread::spawn(move || {
            Self::run(service, form, delay, tx, &flag);
        });

        AssessmentWorkerHandle {
            progress_rx: rx,
            cancelled,
            _handle: handle,
        }
    }

    fn run<M>(
        service: Arc<AssessmentService<M>>,
        form: FormData,
        delay: Duration,
        tx: Sender<AssessmentProgress>,
        cancelled: &AtomicBool,
    ) where
        M: RiskModel + 'static,
    {
        let _ = tx.send(AssessmentProgress::Submitting);

        // Sleep in short slices so cancellation takes effect promptly.
        let mut remaining = delay;
        while !remaining.is_zero() {
            if cancelled.load(Ordering::Relaxed) {
                tracing::debug!("Assessment cancelled during submission delay");
                return;
            }
            let slice = remaining.min(CANCEL_POLL);
            thread::sleep(slice);
            remaining = remaining.saturating_sub(slice);
        }

        if cancelled.load(Ordering::Relaxed) {
            return;
        }
        let _ = tx.send(AssessmentProgress::Scoring);

        let assessment = service.assess(&form);

        // A session reset while scoring ran means this result is stale.
        if cancelled.load(Ordering::Relaxed) {
            tracing::debug!("Discarding assessment for superseded session");
            return;
        }
        let _ = tx.send(AssessmentProgress::Complete(assessment));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::heuristic::HeuristicModel;
    use crate::domain::Answer;
    use std::sync::mpsc::RecvTimeoutError;

    fn test_service() -> Arc<AssessmentService<HeuristicModel>> {
        Arc::new(AssessmentService::new(Arc::new(HeuristicModel::default())))
    }

    #[test]
    fn test_worker_completes() {
        let mut form = FormData::default();
        form.age = "70".to_string();
        form.has_heart_disease = Answer::Yes;

        let handle = AssessmentWorker::spawn_with_delay(
            test_service(),
            form,
            Duration::from_millis(10),
        );

        let deadline = Duration::from_secs(5);
        loop {
            match handle.progress_rx.recv_timeout(deadline) {
                Ok(AssessmentProgress::Complete(assessment)) => {
                    assert!(assessment.result.risk_percentage > 0.0);
                    break;
                }
                Ok(_) => {}
                Err(e) => panic!("worker did not complete: {e}"),
            }
        }
    }

    #[test]
    fn test_cancelled_worker_publishes_no_result() {
        let handle = AssessmentWorker::spawn_with_delay(
            test_service(),
            FormData::default(),
            Duration::from_millis(500),
        );
        handle.cancel();

        // Drain until the channel closes; a Complete must never arrive.
        loop {
            match handle.progress_rx.recv_timeout(Duration::from_secs(5)) {
                Ok(AssessmentProgress::Complete(_)) => {
                    panic!("cancelled worker published a result")
                }
                Ok(_) => {}
                Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => panic!("worker thread hung"),
            }
        }
    }
}
