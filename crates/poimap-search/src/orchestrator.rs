//! Search orchestrator task.
//!
//! One tokio task owns the [`SearchSession`]; callers talk to it through a
//! cloneable [`SearchHandle`] over a bounded command channel. Each accepted
//! page request runs on its own spawned worker that only performs the
//! network call. The worker's result is joined back on the owning task
//! before it touches the store or any observer, so there is exactly one
//! writer.

use std::sync::Arc;

use poimap_core::ResultPage;
use poimap_geo::{GeoApi, GeoError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle};
use uuid::Uuid;

use crate::error::SearchError;
use crate::observer::{ObserverId, SearchObserver};
use crate::session::{Dispatch, LoadState, PageRequest, PageTarget, SearchSession};
use crate::store::Snapshot;

const COMMAND_BUFFER: usize = 32;

/// Point-in-time view of the session, for callers that poll instead of
/// observing.
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub state: LoadState,
    pub snapshot: Snapshot,
    pub current_page: u32,
    pub current_keyword: String,
    pub exhausted: bool,
    pub session_id: Option<Uuid>,
}

enum Command {
    Request {
        target: PageTarget,
        reply: oneshot::Sender<Result<Dispatch, SearchError>>,
    },
    Register {
        observer: Box<dyn SearchObserver>,
        reply: oneshot::Sender<ObserverId>,
    },
    Unregister {
        id: ObserverId,
        reply: oneshot::Sender<bool>,
    },
    Status {
        reply: oneshot::Sender<SessionStatus>,
    },
}

struct InFlight {
    request: PageRequest,
    task: JoinHandle<Result<ResultPage, GeoError>>,
}

/// Owns the search session and drives it from a single task.
pub struct SearchOrchestrator<G> {
    geo: Arc<G>,
    session: SearchSession,
    commands: mpsc::Receiver<Command>,
    in_flight: Option<InFlight>,
}

impl<G> SearchOrchestrator<G>
where
    G: GeoApi + 'static,
{
    /// Spawns the orchestrator task and returns a handle to it.
    ///
    /// The task stops once every [`SearchHandle`] clone is dropped; a request
    /// still in flight at that point is aborted and observers receive a
    /// `Cancelled` error followed by `loading = false`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(geo: Arc<G>, page_size: u32) -> (SearchHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let orchestrator = Self {
            geo,
            session: SearchSession::new(page_size),
            commands: rx,
            in_flight: None,
        };
        let task = tokio::spawn(orchestrator.run());
        (SearchHandle { commands: tx }, task)
    }

    async fn run(mut self) {
        tracing::debug!(page_size = self.session.page_size(), "search orchestrator started");
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                (request, joined) = join_in_flight(&mut self.in_flight) => {
                    self.finish(&request, joined);
                }
            }
        }

        if let Some(in_flight) = self.in_flight.take() {
            tracing::debug!(
                keyword = %in_flight.request.keyword,
                page = in_flight.request.page,
                "aborting in-flight request on shutdown"
            );
            in_flight.task.abort();
            self.session.complete(
                &in_flight.request,
                Err(SearchError::Cancelled("orchestrator shut down".to_owned())),
            );
        }
        tracing::debug!("search orchestrator stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Request { target, reply } => {
                let result = self.session.begin(target);
                if let Ok(Dispatch::Started(request)) = &result {
                    self.launch(request.clone());
                }
                if reply.send(result).is_err() {
                    tracing::debug!("page request caller went away before the reply");
                }
            }
            Command::Register { observer, reply } => {
                let id = self.session.register(observer);
                let _ = reply.send(id);
            }
            Command::Unregister { id, reply } => {
                let removed = self.session.unregister(id);
                let _ = reply.send(removed);
            }
            Command::Status { reply } => {
                let store = self.session.store();
                let _ = reply.send(SessionStatus {
                    state: self.session.state(),
                    snapshot: store.snapshot(),
                    current_page: store.current_page(),
                    current_keyword: store.current_keyword().to_owned(),
                    exhausted: store.is_exhausted(),
                    session_id: self.session.session_id(),
                });
            }
        }
    }

    fn launch(&mut self, request: PageRequest) {
        let geo = Arc::clone(&self.geo);
        let call = request.clone();
        let task = tokio::spawn(async move {
            geo.search(&call.keyword, call.page, call.page_size).await
        });
        self.in_flight = Some(InFlight { request, task });
    }

    fn finish(
        &mut self,
        request: &PageRequest,
        joined: Result<Result<ResultPage, GeoError>, JoinError>,
    ) {
        let outcome = match joined {
            Ok(Ok(page)) => Ok(page),
            Ok(Err(err)) => Err(SearchError::Geo(err)),
            Err(join_err) => Err(SearchError::Cancelled(join_err.to_string())),
        };
        self.session.complete(request, outcome);
    }
}

/// Waits for the in-flight worker, or forever when there is none.
///
/// Cancel safe: if the select drops this future, the join handle stays in
/// `slot` and is polled again on the next iteration.
async fn join_in_flight(
    slot: &mut Option<InFlight>,
) -> (PageRequest, Result<Result<ResultPage, GeoError>, JoinError>) {
    let Some(in_flight) = slot.as_mut() else {
        return std::future::pending().await;
    };
    let joined = (&mut in_flight.task).await;
    let request = in_flight.request.clone();
    *slot = None;
    (request, joined)
}

/// Cloneable handle to a running [`SearchOrchestrator`].
#[derive(Debug, Clone)]
pub struct SearchHandle {
    commands: mpsc::Sender<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Request { target, .. } => f.debug_tuple("Request").field(target).finish(),
            Command::Register { .. } => f.write_str("Register"),
            Command::Unregister { id, .. } => f.debug_tuple("Unregister").field(id).finish(),
            Command::Status { .. } => f.write_str("Status"),
        }
    }
}

impl SearchHandle {
    /// Starts a new keyword search (page 1). The reply arrives once the
    /// request is accepted, not when results are in; observe the session
    /// for completion.
    ///
    /// # Errors
    ///
    /// [`SearchError::Busy`] while another request is in flight,
    /// [`SearchError::InvalidRequest`] for a blank keyword,
    /// [`SearchError::Closed`] if the orchestrator has stopped.
    pub async fn start_search(&self, keyword: &str) -> Result<Dispatch, SearchError> {
        self.request(PageTarget::Start(keyword.to_owned())).await
    }

    /// Requests the page after the last merged one. Returns
    /// `Dispatch::Skipped` without any network call when nothing is loaded
    /// or the results are exhausted.
    ///
    /// # Errors
    ///
    /// Same as [`SearchHandle::start_search`].
    pub async fn request_next_page(&self) -> Result<Dispatch, SearchError> {
        self.request(PageTarget::Next).await
    }

    /// Requests an explicit page of `keyword`. Page 1 resets the results.
    ///
    /// # Errors
    ///
    /// Same as [`SearchHandle::start_search`].
    pub async fn request_page(&self, keyword: &str, page: u32) -> Result<Dispatch, SearchError> {
        self.request(PageTarget::Page {
            keyword: keyword.to_owned(),
            page,
        })
        .await
    }

    /// # Errors
    ///
    /// [`SearchError::Closed`] if the orchestrator has stopped.
    pub async fn register<O>(&self, observer: O) -> Result<ObserverId, SearchError>
    where
        O: SearchObserver + 'static,
    {
        self.call(|reply| Command::Register {
            observer: Box::new(observer),
            reply,
        })
        .await
    }

    /// Returns `false` if `id` was not registered.
    ///
    /// # Errors
    ///
    /// [`SearchError::Closed`] if the orchestrator has stopped.
    pub async fn unregister(&self, id: ObserverId) -> Result<bool, SearchError> {
        self.call(|reply| Command::Unregister { id, reply }).await
    }

    /// # Errors
    ///
    /// [`SearchError::Closed`] if the orchestrator has stopped.
    pub async fn status(&self) -> Result<SessionStatus, SearchError> {
        self.call(|reply| Command::Status { reply }).await
    }

    async fn request(&self, target: PageTarget) -> Result<Dispatch, SearchError> {
        self.call(|reply| Command::Request { target, reply }).await?
    }

    async fn call<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SearchError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(command(tx))
            .await
            .map_err(|_| SearchError::Closed)?;
        rx.await.map_err(|_| SearchError::Closed)
    }
}
