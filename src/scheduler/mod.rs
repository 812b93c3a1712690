//! Background geometry computation.
//!
//! A [`GeometryScheduler`] owns one lazily started worker. Each
//! [`compute`](GeometryScheduler::compute) call gets a fresh id and a
//! [`ComputeHandle`] that resolves when the response with that id arrives,
//! whatever order responses come back in. If the worker cannot be started
//! the scheduler either computes inline on the calling thread or refuses,
//! depending on its [`FallbackPolicy`]; the choice is made once and holds
//! for the scheduler's lifetime.

mod message;
mod pending;
mod worker;

pub use message::{compute_geometry, GeometryRequest, WorkerRequest, WorkerResponse};
pub use worker::{ResponseSink, ThreadWorker, WorkerBackend, WorkerFactory};

use crate::error::{GeometryError, Result};
use futures::channel::oneshot;
use parking_lot::Mutex;
use pending::PendingTable;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

/// What to do when the background worker is unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Compute on the calling thread. Results are identical to the worker's.
    #[default]
    Inline,
    /// Fail every call with [`GeometryError::WorkerUnavailable`].
    Fail,
}

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Name of the worker thread.
    pub worker_name: String,
    pub fallback: FallbackPolicy,
    /// Depth of the worker's request channel. Requests beyond it wait in an
    /// overflow queue; `compute` never blocks.
    pub queue_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            worker_name: "block-geometry-worker".to_string(),
            fallback: FallbackPolicy::Inline,
            queue_capacity: 64,
        }
    }
}

impl SchedulerConfig {
    pub fn with_worker_name(mut self, name: impl Into<String>) -> Self {
        self.worker_name = name.into();
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }
}

/// Observable worker state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerStatus {
    /// No request yet; the worker starts on first use.
    Idle,
    Running,
    /// Startup failed or the worker died; holds the reason.
    Unavailable(String),
    ShutDown,
}

enum WorkerState {
    Idle(WorkerFactory),
    Running(Box<dyn WorkerBackend>),
    Unavailable(String),
    ShutDown,
}

enum Dispatch {
    Sent,
    Unavailable(WorkerRequest, String),
    Closed,
}

/// Future for one request's response.
///
/// Resolves to [`GeometryError::SchedulerShutdown`] if the scheduler shuts
/// down first.
pub struct ComputeHandle {
    id: u64,
    receiver: oneshot::Receiver<WorkerResponse>,
}

impl ComputeHandle {
    /// Correlation id of the request.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Block the current thread until the response arrives.
    pub fn wait(self) -> Result<WorkerResponse> {
        futures::executor::block_on(self)
    }
}

impl Future for ComputeHandle {
    type Output = Result<WorkerResponse>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.map_err(|_| GeometryError::SchedulerShutdown))
    }
}

/// Runs geometry requests on a background worker.
pub struct GeometryScheduler {
    config: SchedulerConfig,
    state: Mutex<WorkerState>,
    pending: Arc<PendingTable>,
    next_id: AtomicU64,
}

impl GeometryScheduler {
    /// A scheduler backed by a [`ThreadWorker`].
    pub fn new(config: SchedulerConfig) -> Self {
        let name = config.worker_name.clone();
        let capacity = config.queue_capacity;
        Self::with_backend(config, move |sink| {
            let worker = ThreadWorker::spawn(&name, capacity, sink)?;
            Ok(Box::new(worker) as Box<dyn WorkerBackend>)
        })
    }

    /// A scheduler whose worker is started by `factory` on first use.
    pub fn with_backend<F>(config: SchedulerConfig, factory: F) -> Self
    where
        F: FnOnce(ResponseSink) -> io::Result<Box<dyn WorkerBackend>> + Send + 'static,
    {
        Self {
            config,
            state: Mutex::new(WorkerState::Idle(Box::new(factory))),
            pending: Arc::new(PendingTable::default()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn status(&self) -> SchedulerStatus {
        match &*self.state.lock() {
            WorkerState::Idle(_) => SchedulerStatus::Idle,
            WorkerState::Running(_) => SchedulerStatus::Running,
            WorkerState::Unavailable(reason) => SchedulerStatus::Unavailable(reason.clone()),
            WorkerState::ShutDown => SchedulerStatus::ShutDown,
        }
    }

    /// Number of requests waiting for a response.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Submit a request. The returned handle resolves to this request's
    /// response.
    pub fn compute(&self, request: GeometryRequest) -> Result<ComputeHandle> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let receiver = self.pending.register(id);
        let handle = ComputeHandle { id, receiver };

        match self.dispatch(WorkerRequest { id, request }) {
            Dispatch::Sent => Ok(handle),
            Dispatch::Closed => {
                self.pending.remove(id);
                Err(GeometryError::SchedulerShutdown)
            }
            Dispatch::Unavailable(request, reason) => match self.config.fallback {
                FallbackPolicy::Inline => {
                    self.pending.complete(compute_geometry(request));
                    Ok(handle)
                }
                FallbackPolicy::Fail => {
                    self.pending.remove(id);
                    Err(GeometryError::WorkerUnavailable(reason))
                }
            },
        }
    }

    fn dispatch(&self, request: WorkerRequest) -> Dispatch {
        let mut state = self.state.lock();

        // First use starts the worker; a failed start is never retried
        *state = match std::mem::replace(&mut *state, WorkerState::ShutDown) {
            WorkerState::Idle(factory) => match factory(ResponseSink::new(self.pending.clone())) {
                Ok(worker) => {
                    log::debug!("Started geometry worker {}", self.config.worker_name);
                    WorkerState::Running(worker)
                }
                Err(e) => {
                    log::warn!("Geometry worker failed to start: {}", e);
                    WorkerState::Unavailable(e.to_string())
                }
            },
            other => other,
        };

        match &*state {
            WorkerState::Running(worker) => match worker.submit(request) {
                Ok(()) => Dispatch::Sent,
                Err(request) => {
                    let reason = "geometry worker stopped accepting requests".to_string();
                    log::warn!("{}", reason);
                    *state = WorkerState::Unavailable(reason.clone());
                    Dispatch::Unavailable(request, reason)
                }
            },
            WorkerState::Unavailable(reason) => Dispatch::Unavailable(request, reason.clone()),
            WorkerState::Idle(_) | WorkerState::ShutDown => Dispatch::Closed,
        }
    }

    /// Stop the worker and abandon outstanding requests. Later calls to
    /// [`compute`](Self::compute) fail with [`GeometryError::SchedulerShutdown`].
    pub fn shutdown(&self) {
        let previous = std::mem::replace(&mut *self.state.lock(), WorkerState::ShutDown);
        if let WorkerState::Running(mut worker) = previous {
            worker.shutdown();
        }
        let abandoned = self.pending.clear();
        if abandoned > 0 {
            log::debug!("Scheduler shut down with {} pending requests", abandoned);
        }
    }
}

impl Default for GeometryScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl Drop for GeometryScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesher::{Diagnostic, Material};
    use crate::model::BlockModel;
    use futures::executor::block_on;
    use std::sync::atomic::AtomicUsize;

    fn cube_request(texture: &str) -> GeometryRequest {
        let json = format!(
            r##"{{ "textures": {{ "all": "{}" }},
                  "elements": [{{ "from": [0,0,0], "to": [16,16,16],
                                  "faces": {{ "up": {{ "texture": "#all" }},
                                              "down": {{ "texture": "#all" }} }} }}] }}"##,
            texture
        );
        GeometryRequest::new(BlockModel::from_json(&json).unwrap())
    }

    fn first_material(response: &WorkerResponse) -> &Material {
        &response.elements[0].material_groups[0].material
    }

    /// Holds requests until the test releases them.
    struct HeldWorker {
        held: Arc<Mutex<Vec<WorkerRequest>>>,
    }

    impl WorkerBackend for HeldWorker {
        fn submit(&self, request: WorkerRequest) -> std::result::Result<(), WorkerRequest> {
            self.held.lock().push(request);
            Ok(())
        }

        fn shutdown(&mut self) {}
    }

    fn held_scheduler(
        config: SchedulerConfig,
    ) -> (
        GeometryScheduler,
        Arc<Mutex<Vec<WorkerRequest>>>,
        Arc<Mutex<Option<ResponseSink>>>,
    ) {
        let held = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::new(Mutex::new(None));
        let (worker_held, worker_sink) = (held.clone(), sink.clone());
        let scheduler = GeometryScheduler::with_backend(config, move |s| {
            *worker_sink.lock() = Some(s);
            Ok(Box::new(HeldWorker { held: worker_held }) as Box<dyn WorkerBackend>)
        });
        (scheduler, held, sink)
    }

    #[test]
    fn test_thread_worker_computes() {
        let _ = env_logger::builder().is_test(true).try_init();
        let scheduler = GeometryScheduler::default();
        assert_eq!(scheduler.status(), SchedulerStatus::Idle);

        let request = cube_request("minecraft:block/dirt");
        let handle = scheduler.compute(request.clone()).unwrap();
        let id = handle.id();
        let response = block_on(handle).unwrap();

        assert_eq!(scheduler.status(), SchedulerStatus::Running);
        assert_eq!(response.id, id);
        assert_eq!(*first_material(&response), Material::texture("minecraft:block/dirt"));

        // Same numbers as the inline path
        let inline = compute_geometry(WorkerRequest { id, request });
        assert_eq!(response, inline);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_out_of_order_responses_reach_their_own_handles() {
        let (scheduler, held, sink) = held_scheduler(SchedulerConfig::default());

        let dirt = scheduler.compute(cube_request("block/dirt")).unwrap();
        let stone = scheduler.compute(cube_request("block/stone")).unwrap();
        assert_ne!(dirt.id(), stone.id());
        assert_eq!(scheduler.pending_count(), 2);

        // Deliver the second request's response first
        let sink = sink.lock().clone().unwrap();
        let mut requests = std::mem::take(&mut *held.lock());
        requests.reverse();
        for request in requests {
            sink.deliver(compute_geometry(request));
        }

        let stone = block_on(stone).unwrap();
        let dirt = block_on(dirt).unwrap();
        assert_eq!(*first_material(&stone), Material::texture("block/stone"));
        assert_eq!(*first_material(&dirt), Material::texture("block/dirt"));
    }

    #[test]
    fn test_startup_failure_falls_back_inline_without_retry() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let scheduler = GeometryScheduler::with_backend(SchedulerConfig::default(), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(io::Error::new(io::ErrorKind::Other, "threads unavailable"))
        });

        for texture in ["block/dirt", "block/stone"] {
            let response = scheduler.compute(cube_request(texture)).unwrap().wait().unwrap();
            assert_eq!(*first_material(&response), Material::texture(texture));
        }

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(matches!(scheduler.status(), SchedulerStatus::Unavailable(_)));
    }

    #[test]
    fn test_fail_policy_is_consistent() {
        let config = SchedulerConfig::default().with_fallback(FallbackPolicy::Fail);
        let scheduler = GeometryScheduler::with_backend(config, |_| {
            Err(io::Error::new(io::ErrorKind::Other, "threads unavailable"))
        });

        for _ in 0..2 {
            assert!(matches!(
                scheduler.compute(cube_request("block/dirt")),
                Err(GeometryError::WorkerUnavailable(_))
            ));
        }
        assert_eq!(scheduler.pending_count(), 0);
    }

    /// Refuses every request, like a worker whose thread has died.
    struct DeadWorker;

    impl WorkerBackend for DeadWorker {
        fn submit(&self, request: WorkerRequest) -> std::result::Result<(), WorkerRequest> {
            Err(request)
        }

        fn shutdown(&mut self) {}
    }

    #[test]
    fn test_dead_worker_falls_back() {
        let scheduler = GeometryScheduler::with_backend(SchedulerConfig::default(), |_| {
            Ok(Box::new(DeadWorker) as Box<dyn WorkerBackend>)
        });

        let response = scheduler.compute(cube_request("block/dirt")).unwrap().wait().unwrap();
        assert_eq!(*first_material(&response), Material::texture("block/dirt"));
        assert!(matches!(scheduler.status(), SchedulerStatus::Unavailable(_)));
    }

    #[test]
    fn test_shutdown_abandons_pending() {
        let (scheduler, _held, _sink) = held_scheduler(SchedulerConfig::default());

        let handle = scheduler.compute(cube_request("block/dirt")).unwrap();
        scheduler.shutdown();

        assert!(matches!(block_on(handle), Err(GeometryError::SchedulerShutdown)));
        assert!(matches!(
            scheduler.compute(cube_request("block/dirt")),
            Err(GeometryError::SchedulerShutdown)
        ));
        assert_eq!(scheduler.status(), SchedulerStatus::ShutDown);
    }

    #[test]
    fn test_requests_beyond_queue_capacity_all_complete() {
        let _ = env_logger::builder().is_test(true).try_init();
        let scheduler = GeometryScheduler::new(
            SchedulerConfig::default()
                .with_worker_name("test-overflow")
                .with_queue_capacity(1),
        );

        let textures: Vec<String> = (0..8).map(|i| format!("block/texture_{}", i)).collect();
        let handles: Vec<_> = textures
            .iter()
            .map(|texture| scheduler.compute(cube_request(texture)).unwrap())
            .collect();

        for (texture, handle) in textures.iter().zip(handles) {
            let id = handle.id();
            let response = handle.wait().unwrap();
            assert_eq!(response.id, id);
            assert_eq!(*first_material(&response), Material::texture(texture.as_str()));
        }
        assert_eq!(scheduler.status(), SchedulerStatus::Running);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_empty_model_through_scheduler() {
        let scheduler = GeometryScheduler::new(
            SchedulerConfig::default()
                .with_worker_name("test-empty-model")
                .with_queue_capacity(1),
        );
        let response = scheduler
            .compute(GeometryRequest::new(BlockModel::new()))
            .unwrap()
            .wait()
            .unwrap();
        assert_eq!(response.elements.len(), 1);
        assert_eq!(response.elements[0].diagnostic, Some(Diagnostic::NoElements));
    }
}
