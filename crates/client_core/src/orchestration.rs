//! Event-loop glue between navigation, spawned fetches, and the controllers.
//!
//! Fetches run as tokio tasks and report back through a channel; the session
//! applies each completion to its controller one at a time, so controller
//! state is only ever touched from the task that owns the session.

use std::sync::Arc;

use shared::domain::{Company, CompanyId, Location};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{
    data_access::DataAccess, detail::DetailController, directory::DirectoryController,
    error::FetchError, load::LoadTicket, routes::Route,
};

#[derive(Debug)]
pub enum ControllerEvent {
    CompaniesFetched {
        ticket: LoadTicket,
        result: Result<Vec<Company>, FetchError>,
    },
    CompanyFetched {
        ticket: LoadTicket<CompanyId>,
        result: Result<Company, FetchError>,
    },
    LocationsFetched {
        ticket: LoadTicket<CompanyId>,
        result: Result<Vec<Location>, FetchError>,
    },
}

impl ControllerEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::CompaniesFetched { .. } => "companies_fetched",
            Self::CompanyFetched { .. } => "company_fetched",
            Self::LocationsFetched { .. } => "locations_fetched",
        }
    }
}

/// Reports a fetch's completion exactly once. If the task is dropped before
/// reporting (panic or abort), the fallback failure is sent instead so the
/// session never waits on a completion that cannot arrive.
struct CompletionGuard {
    events: mpsc::UnboundedSender<ControllerEvent>,
    fallback: Option<ControllerEvent>,
}

impl CompletionGuard {
    fn new(events: mpsc::UnboundedSender<ControllerEvent>, fallback: ControllerEvent) -> Self {
        Self {
            events,
            fallback: Some(fallback),
        }
    }

    fn complete(mut self, event: ControllerEvent) {
        self.fallback = None;
        let _ = self.events.send(event);
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(event) = self.fallback.take() {
            warn!(event = event.name(), "fetch task ended without a result");
            let _ = self.events.send(event);
        }
    }
}

fn abandoned() -> FetchError {
    FetchError::Transport("fetch task ended without a result".to_string())
}

/// Spawns the directory fetch. Requires a tokio runtime.
pub fn spawn_directory_fetch(
    data: Arc<dyn DataAccess>,
    ticket: LoadTicket,
    events: mpsc::UnboundedSender<ControllerEvent>,
) {
    let guard = CompletionGuard::new(
        events,
        ControllerEvent::CompaniesFetched {
            ticket,
            result: Err(abandoned()),
        },
    );
    tokio::spawn(async move {
        let result = data.fetch_companies().await;
        guard.complete(ControllerEvent::CompaniesFetched { ticket, result });
    });
}

/// Spawns the company and locations fetches as independent tasks. Requires a
/// tokio runtime.
pub fn spawn_detail_fetches(
    data: Arc<dyn DataAccess>,
    ticket: LoadTicket<CompanyId>,
    events: mpsc::UnboundedSender<ControllerEvent>,
) {
    let company_id = ticket.key();
    {
        let data = Arc::clone(&data);
        let guard = CompletionGuard::new(
            events.clone(),
            ControllerEvent::CompanyFetched {
                ticket,
                result: Err(abandoned()),
            },
        );
        tokio::spawn(async move {
            let result = data.fetch_company(company_id).await;
            guard.complete(ControllerEvent::CompanyFetched { ticket, result });
        });
    }
    let guard = CompletionGuard::new(
        events,
        ControllerEvent::LocationsFetched {
            ticket,
            result: Err(abandoned()),
        },
    );
    tokio::spawn(async move {
        let result = data.fetch_locations(company_id).await;
        guard.complete(ControllerEvent::LocationsFetched { ticket, result });
    });
}

pub struct Session {
    data: Arc<dyn DataAccess>,
    directory: DirectoryController,
    detail: DetailController,
    route: Route,
    events_tx: mpsc::UnboundedSender<ControllerEvent>,
    events_rx: mpsc::UnboundedReceiver<ControllerEvent>,
    in_flight: usize,
}

impl Session {
    pub fn new(data: Arc<dyn DataAccess>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            data,
            directory: DirectoryController::new(),
            detail: DetailController::new(),
            route: Route::Directory,
            events_tx,
            events_rx,
            in_flight: 0,
        }
    }

    /// Switches the active view and issues whatever fetches it needs. The
    /// directory is fetched once; every detail navigation reloads.
    pub fn navigate(&mut self, route: Route) {
        debug!(%route, "navigate");
        self.route = route;
        match route {
            Route::Directory => {
                if !self.directory.is_loaded() {
                    self.reload_directory();
                }
            }
            Route::CompanyDetail(company_id) => {
                let ticket = self.detail.begin_load(company_id);
                spawn_detail_fetches(Arc::clone(&self.data), ticket, self.events_tx.clone());
                self.in_flight += 2;
            }
        }
    }

    pub fn reload_directory(&mut self) {
        let ticket = self.directory.begin_load();
        spawn_directory_fetch(Arc::clone(&self.data), ticket, self.events_tx.clone());
        self.in_flight += 1;
    }

    pub fn apply(&mut self, event: ControllerEvent) {
        debug!(event = event.name(), "applying controller event");
        match event {
            ControllerEvent::CompaniesFetched { ticket, result } => {
                self.directory.apply_load(ticket, result)
            }
            ControllerEvent::CompanyFetched { ticket, result } => {
                self.detail.apply_company(ticket, result)
            }
            ControllerEvent::LocationsFetched { ticket, result } => {
                self.detail.apply_locations(ticket, result)
            }
        }
    }

    /// Waits for one completion and applies it. Returns `false` when nothing
    /// is in flight.
    pub async fn process_next(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.events_rx.recv().await {
            Some(event) => {
                self.in_flight -= 1;
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Applies completions until every issued fetch, stale ones included, has
    /// reported back.
    pub async fn settle(&mut self) {
        while self.process_next().await {}
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn directory(&self) -> &DirectoryController {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut DirectoryController {
        &mut self.directory
    }

    pub fn detail(&self) -> &DetailController {
        &self.detail
    }

    pub fn detail_mut(&mut self) -> &mut DetailController {
        &mut self.detail
    }
}

#[cfg(test)]
#[path = "tests/orchestration_tests.rs"]
mod tests;
