//! Background worker backends.

use super::message::{compute_geometry, WorkerRequest, WorkerResponse};
use super::pending::PendingTable;
use crossbeam::channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Where a worker delivers finished responses.
#[derive(Clone)]
pub struct ResponseSink {
    pending: Arc<PendingTable>,
}

impl ResponseSink {
    pub(crate) fn new(pending: Arc<PendingTable>) -> Self {
        Self { pending }
    }

    /// Complete the request with the response's id. Responses nobody is
    /// waiting for any more are dropped.
    pub fn deliver(&self, response: WorkerResponse) {
        let id = response.id;
        if !self.pending.complete(response) {
            log::debug!("Dropping response {} with no pending request", id);
        }
    }
}

/// An execution context that computes requests away from the caller.
pub trait WorkerBackend: Send {
    /// Queue a request without blocking. Gives the request back if the
    /// worker can no longer accept work.
    fn submit(&self, request: WorkerRequest) -> Result<(), WorkerRequest>;

    /// Stop accepting work and wait for the worker to finish.
    fn shutdown(&mut self);
}

/// Starts a backend wired to a sink. Called at most once per scheduler.
pub type WorkerFactory =
    Box<dyn FnOnce(ResponseSink) -> io::Result<Box<dyn WorkerBackend>> + Send>;

/// Requests that did not fit in the channel, in submission order.
type Overflow = Arc<Mutex<VecDeque<WorkerRequest>>>;

/// A dedicated OS thread fed through a bounded channel.
///
/// When the channel is full, requests spill into an overflow queue that the
/// worker drains after the channel, so `submit` never waits on the worker.
pub struct ThreadWorker {
    sender: Option<Sender<WorkerRequest>>,
    overflow: Overflow,
    thread: Option<JoinHandle<()>>,
}

impl ThreadWorker {
    pub fn spawn(name: &str, queue_capacity: usize, sink: ResponseSink) -> io::Result<Self> {
        // A zero-capacity channel only accepts a send while the worker is
        // parked in recv, which would strand spilled requests
        let (sender, receiver) = bounded::<WorkerRequest>(queue_capacity.max(1));
        let overflow = Overflow::default();
        let worker_overflow = overflow.clone();

        let thread = thread::Builder::new().name(name.to_string()).spawn(move || {
            log::debug!("Geometry worker started");
            while let Some(request) = next_request(&receiver, &worker_overflow) {
                let id = request.id;
                let t0 = Instant::now();
                let response = compute_geometry(request);
                log::debug!("Computed geometry for request {} in {:?}", id, t0.elapsed());
                sink.deliver(response);
            }
            log::debug!("Geometry worker stopped");
        })?;

        Ok(Self {
            sender: Some(sender),
            overflow,
            thread: Some(thread),
        })
    }

    fn is_alive(&self) -> bool {
        self.thread.as_ref().is_some_and(|thread| !thread.is_finished())
    }
}

/// Next request for the worker: channel first, then overflow. Parks on the
/// channel only when both are empty. `None` once the channel is closed and
/// drained.
fn next_request(
    receiver: &Receiver<WorkerRequest>,
    overflow: &Mutex<VecDeque<WorkerRequest>>,
) -> Option<WorkerRequest> {
    {
        let mut overflow = overflow.lock();
        match receiver.try_recv() {
            Ok(request) => return Some(request),
            Err(TryRecvError::Empty) => {
                if let Some(request) = overflow.pop_front() {
                    return Some(request);
                }
            }
            Err(TryRecvError::Disconnected) => return overflow.pop_front(),
        }
    }

    // Both queues were empty under the lock, so the next submit goes
    // through the channel and wakes this recv
    receiver.recv().ok()
}

impl WorkerBackend for ThreadWorker {
    fn submit(&self, request: WorkerRequest) -> Result<(), WorkerRequest> {
        let Some(sender) = &self.sender else {
            return Err(request);
        };
        if !self.is_alive() {
            return Err(request);
        }

        let mut overflow = self.overflow.lock();
        if !overflow.is_empty() {
            // Keep submission order while spilled requests are waiting
            overflow.push_back(request);
            return Ok(());
        }

        match sender.try_send(request) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(request)) => {
                log::debug!("Geometry queue full, holding request {} in overflow", request.id);
                overflow.push_back(request);
                Ok(())
            }
            Err(TrySendError::Disconnected(request)) => Err(request),
        }
    }

    fn shutdown(&mut self) {
        // Spilled requests are abandoned; closing the channel ends the
        // worker loop once the channel drains
        self.overflow.lock().clear();
        self.sender.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Geometry worker panicked");
            }
        }
    }
}

impl Drop for ThreadWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
