//! Background thread that runs screen loads off the UI thread.
//!
//! Every request gets an id. Only the newest request of each kind is
//! current; results for superseded requests are dropped in [`Loader::poll`].

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use crate::api::{self, ApiResult, ExpenseApi, SettingsData};
use crate::month::YearMonth;
use crate::types::{Category, DashboardData};

pub type RequestId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadRequest {
    Dashboard(YearMonth),
    Settings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadKind {
    Dashboard,
    Settings,
}

impl LoadRequest {
    pub fn kind(&self) -> LoadKind {
        match self {
            LoadRequest::Dashboard(_) => LoadKind::Dashboard,
            LoadRequest::Settings => LoadKind::Settings,
        }
    }
}

#[derive(Debug)]
pub enum LoadOutcome {
    Dashboard {
        month: YearMonth,
        result: ApiResult<(DashboardData, Vec<Category>)>,
    },
    Settings(ApiResult<SettingsData>),
}

impl LoadOutcome {
    fn kind(&self) -> LoadKind {
        match self {
            LoadOutcome::Dashboard { .. } => LoadKind::Dashboard,
            LoadOutcome::Settings(_) => LoadKind::Settings,
        }
    }
}

struct Job {
    id: RequestId,
    request: LoadRequest,
}

enum ThreadMessage {
    Load(Job),
    Shutdown,
}

struct Finished {
    id: RequestId,
    outcome: LoadOutcome,
}

pub struct Loader {
    request_tx: Sender<ThreadMessage>,
    result_rx: Receiver<Finished>,
    next_id: RequestId,
    latest_dashboard: Option<RequestId>,
    latest_settings: Option<RequestId>,
}

impl Loader {
    pub fn spawn(api: Arc<dyn ExpenseApi>) -> std::io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<ThreadMessage>();
        let (result_tx, result_rx) = mpsc::channel::<Finished>();

        thread::Builder::new()
            .name("spendr-loader".to_string())
            .spawn(move || {
                tracing::debug!("loader thread started");
                Self::thread_loop(api.as_ref(), request_rx, result_tx);
                tracing::debug!("loader thread exiting");
            })?;

        Ok(Self {
            request_tx,
            result_rx,
            next_id: 1,
            latest_dashboard: None,
            latest_settings: None,
        })
    }

    fn thread_loop(
        api: &dyn ExpenseApi,
        request_rx: Receiver<ThreadMessage>,
        result_tx: Sender<Finished>,
    ) {
        while let Ok(ThreadMessage::Load(job)) = request_rx.recv() {
            let outcome = match job.request {
                LoadRequest::Dashboard(month) => LoadOutcome::Dashboard {
                    month,
                    result: api::fetch_dashboard(api, month),
                },
                LoadRequest::Settings => LoadOutcome::Settings(api::fetch_settings(api)),
            };
            if result_tx.send(Finished { id: job.id, outcome }).is_err() {
                break;
            }
        }
    }

    fn latest_mut(&mut self, kind: LoadKind) -> &mut Option<RequestId> {
        match kind {
            LoadKind::Dashboard => &mut self.latest_dashboard,
            LoadKind::Settings => &mut self.latest_settings,
        }
    }

    /// Queues a load, superseding any pending load of the same kind.
    pub fn request(&mut self, request: LoadRequest) -> RequestId {
        let id = self.next_id;
        self.next_id += 1;
        *self.latest_mut(request.kind()) = Some(id);

        if self
            .request_tx
            .send(ThreadMessage::Load(Job { id, request }))
            .is_err()
        {
            tracing::error!(id, "loader thread is gone, request dropped");
        } else {
            tracing::debug!(id, ?request, "load requested");
        }
        id
    }

    /// Whether a load of `kind` is still outstanding.
    pub fn is_pending(&self, kind: LoadKind) -> bool {
        match kind {
            LoadKind::Dashboard => self.latest_dashboard.is_some(),
            LoadKind::Settings => self.latest_settings.is_some(),
        }
    }

    /// Accepts a finished load if it answers the newest request of its kind.
    fn accept(&mut self, finished: Finished) -> Option<LoadOutcome> {
        let latest = self.latest_mut(finished.outcome.kind());
        if *latest != Some(finished.id) {
            tracing::debug!(id = finished.id, "dropping stale load result");
            return None;
        }
        *latest = None;
        Some(finished.outcome)
    }

    /// Next current result, if one is ready. Never blocks.
    pub fn poll(&mut self) -> Option<LoadOutcome> {
        loop {
            match self.result_rx.try_recv() {
                Ok(finished) => {
                    if let Some(outcome) = self.accept(finished) {
                        return Some(outcome);
                    }
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("loader thread disconnected");
                    return None;
                }
            }
        }
    }

    #[cfg(test)]
    fn wait(&mut self, timeout: std::time::Duration) -> Option<LoadOutcome> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.checked_duration_since(std::time::Instant::now())?;
            let finished = self.result_rx.recv_timeout(remaining).ok()?;
            if let Some(outcome) = self.accept(finished) {
                return Some(outcome);
            }
        }
    }
}

impl Drop for Loader {
    fn drop(&mut self) {
        // An in-flight request may be waiting on the network; don't join.
        let _ = self.request_tx.send(ThreadMessage::Shutdown);
    }
}
