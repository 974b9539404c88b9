//! Threaded deployment of a [`SortTracker`].
//!
//! Frames come in through a bounded queue, a single worker thread owns the
//! tracker and runs it frame by frame, and every result leaves through a
//! second bounded queue as an owned copy. Only the worker ever touches track
//! state.
use std::thread;

use crossbeam::channel::{Receiver, Sender, bounded};

use crate::{
    error::{Error, Result},
    predictor::Predictor,
    sort_tracker::{Detection, SortTracker, TrackOutput},
};

/// Tracks reported for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameResult {
    /// 1-based index of the frame, in submission order.
    pub frame_index: u64,
    pub tracks: Vec<TrackOutput>,
}

pub struct TrackingPipeline<P> {
    frame_tx: Option<Sender<Vec<Detection>>>,
    result_rx: Receiver<FrameResult>,
    worker_handle: Option<thread::JoinHandle<SortTracker<P>>>,
}

impl<P> TrackingPipeline<P>
where
    P: Predictor + Send + 'static,
{
    /// Moves `tracker` onto a worker thread. `capacity` bounds both queues;
    /// [`TrackingPipeline::send`] blocks while the input queue is full.
    pub fn spawn(tracker: SortTracker<P>, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::config("pipeline capacity must be at least 1"));
        }
        let (frame_tx, frame_rx) = bounded::<Vec<Detection>>(capacity);
        let (result_tx, result_rx) = bounded::<FrameResult>(capacity);

        let worker_handle = thread::Builder::new()
            .name("seq-sort-tracker".into())
            .spawn(move || Self::worker_thread(tracker, frame_rx, result_tx))
            .map_err(|e| Error::config(format!("failed to start tracker thread: {e}")))?;

        Ok(Self {
            frame_tx: Some(frame_tx),
            result_rx,
            worker_handle: Some(worker_handle),
        })
    }

    fn worker_thread(
        mut tracker: SortTracker<P>,
        frame_rx: Receiver<Vec<Detection>>,
        result_tx: Sender<FrameResult>,
    ) -> SortTracker<P> {
        log::info!("tracking pipeline worker started");

        while let Ok(detections) = frame_rx.recv() {
            let tracks = tracker.update(&detections);
            let result = FrameResult {
                frame_index: tracker.frame_count(),
                tracks,
            };
            if result_tx.send(result).is_err() {
                log::warn!("result receiver dropped, stopping tracking pipeline");
                break;
            }
        }

        log::info!(
            "tracking pipeline worker stopped after {} frames",
            tracker.frame_count()
        );
        tracker
    }
}

impl<P> TrackingPipeline<P> {
    /// Queues the detections of the next frame.
    pub fn send(&self, detections: Vec<Detection>) -> Result<()> {
        self.frame_tx
            .as_ref()
            .ok_or(Error::PipelineClosed)?
            .send(detections)
            .map_err(|_| Error::PipelineClosed)
    }

    /// Blocks until the next frame result is ready. `None` once the worker
    /// has stopped and every result has been received.
    pub fn recv(&self) -> Option<FrameResult> {
        self.result_rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<FrameResult> {
        self.result_rx.try_recv().ok()
    }

    /// Closes the input queue, waits for the worker to process what is
    /// queued, and returns the remaining results together with the tracker.
    pub fn finish(mut self) -> Result<(Vec<FrameResult>, SortTracker<P>)> {
        drop(self.frame_tx.take());

        let remaining = self.result_rx.iter().collect();
        let tracker = self
            .worker_handle
            .take()
            .ok_or(Error::PipelineClosed)?
            .join()
            .map_err(|_| Error::PipelineClosed)?;

        Ok((remaining, tracker))
    }
}

impl<P> Drop for TrackingPipeline<P> {
    fn drop(&mut self) {
        drop(self.frame_tx.take());
        // drain so a worker blocked on a full result queue can exit
        while self.result_rx.recv().is_ok() {}
        if let Some(handle) = self.worker_handle.take() {
            let _ = handle.join();
        }
    }
}
