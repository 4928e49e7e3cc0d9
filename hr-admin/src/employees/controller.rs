//! Employee Collection Controller
//!
//! Two layers:
//! - [`QueryState`] / [`CollectionState`]: pure transition functions, no I/O
//! - [`EmployeeCollectionController`]: drives them against a repository
//!
//! A fetch is identified by a [`FetchTicket`]. Only the ticket of the most
//! recent request may change the list state; older responses are dropped.

use crate::core::Notifier;
use hr_client::{ClientError, EmployeeRepository, ListQuery};
use shared::models::{Employee, Page};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const LOAD_FAILED: &str = "Error al cargar empleados.";
pub const EMPTY_ROSTER: &str = "No hay empleados registrados.";

/// External triggers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryIntent {
    Mount,
    Search(String),
    SetActiveOnly(bool),
    GoToPage(u32),
    SetPageSize(u32),
    /// After a mutation
    Refresh,
}

/// Live query parameters of the roster screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub page: u32,
    pub size: u32,
    pub search: String,
    pub active_only: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl QueryState {
    pub fn new(size: u32) -> Self {
        Self {
            page: 0,
            size: size.clamp(1, MAX_PAGE_SIZE),
            search: String::new(),
            active_only: false,
        }
    }

    /// Next query for `intent`
    ///
    /// Search, filter and page-size changes go back to page 0; explicit
    /// pagination keeps search and filter.
    pub fn apply(&self, intent: &QueryIntent) -> QueryState {
        let mut next = self.clone();
        match intent {
            QueryIntent::Mount | QueryIntent::Refresh => {}
            QueryIntent::Search(text) => {
                next.search = text.trim().to_string();
                next.page = 0;
            }
            QueryIntent::SetActiveOnly(active) => {
                next.active_only = *active;
                next.page = 0;
            }
            QueryIntent::GoToPage(page) => next.page = *page,
            QueryIntent::SetPageSize(size) => {
                next.size = (*size).clamp(1, MAX_PAGE_SIZE);
                next.page = 0;
            }
        }
        next
    }

    /// Unchecked toggle means "no filter", not "inactive only"
    pub fn to_list_query(&self) -> ListQuery {
        let query = ListQuery::new(self.page, self.size)
            .with_active_only(self.active_only.then_some(true));
        if self.search.is_empty() {
            query
        } else {
            query.with_search(self.search.clone())
        }
    }

    /// Human summary of the active filters, for export headers
    pub fn describe_filters(&self) -> Option<String> {
        let mut parts = Vec::new();
        if !self.search.is_empty() {
            parts.push(format!("Búsqueda: \"{}\"", self.search));
        }
        if self.active_only {
            parts.push("Solo activos".to_string());
        }
        if parts.is_empty() {
            None
        } else {
            Some(format!("Filtros: {}", parts.join(" · ")))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Idle,
    Loading,
    Loaded(Page<Employee>),
    /// No rows are kept next to an error
    Error { message: String },
}

impl ListState {
    pub fn page(&self) -> Option<&Page<Employee>> {
        match self {
            ListState::Loaded(page) => Some(page),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ListState::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: QueryState,
}

/// Pure controller state machine
#[derive(Debug, Clone)]
pub struct CollectionState {
    query: QueryState,
    /// Last query that loaded successfully
    last_good: QueryState,
    list: ListState,
    seq: u64,
}

impl CollectionState {
    pub fn new(query: QueryState) -> Self {
        Self {
            last_good: query.clone(),
            query,
            list: ListState::Idle,
            seq: 0,
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn last_good(&self) -> &QueryState {
        &self.last_good
    }

    pub fn list(&self) -> &ListState {
        &self.list
    }

    /// Any trigger: move to Loading and hand out the ticket for the fetch
    pub fn begin(&mut self, intent: &QueryIntent) -> FetchTicket {
        self.begin_all(std::slice::from_ref(intent))
    }

    /// Several triggers folded into a single fetch
    pub fn begin_all(&mut self, intents: &[QueryIntent]) -> FetchTicket {
        self.query = intents.iter().fold(self.query.clone(), |q, i| q.apply(i));
        self.seq += 1;
        self.list = ListState::Loading;
        FetchTicket {
            seq: self.seq,
            query: self.query.clone(),
        }
    }

    /// Apply a response; false (and no change) when `ticket` is stale
    pub fn complete(&mut self, ticket: &FetchTicket, result: Result<Page<Employee>, String>) -> bool {
        if ticket.seq != self.seq {
            return false;
        }
        self.list = match result {
            Ok(page) => {
                self.last_good = ticket.query.clone();
                ListState::Loaded(page)
            }
            Err(message) => ListState::Error { message },
        };
        true
    }
}

/// Async controller over a repository
#[derive(Clone)]
pub struct EmployeeCollectionController {
    repo: Arc<dyn EmployeeRepository>,
    state: Arc<Mutex<CollectionState>>,
    notifier: Notifier,
}

impl EmployeeCollectionController {
    pub fn new(repo: Arc<dyn EmployeeRepository>, notifier: Notifier, page_size: u32) -> Self {
        Self {
            repo,
            state: Arc::new(Mutex::new(CollectionState::new(QueryState::new(page_size)))),
            notifier,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CollectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one trigger to completion
    ///
    /// Returns the list state after the response was applied; if a newer
    /// trigger started meanwhile, this response is discarded.
    pub async fn dispatch(&self, intent: QueryIntent) -> ListState {
        self.dispatch_all(&[intent]).await
    }

    /// Apply every intent in order, then fetch once
    pub async fn dispatch_all(&self, intents: &[QueryIntent]) -> ListState {
        let ticket = self.lock().begin_all(intents);
        tracing::debug!(seq = ticket.seq, ?intents, "Fetching employees");

        let result = self.repo.list(&ticket.query.to_list_query()).await;

        let (applied, notice) = {
            let mut state = self.lock();
            let notice = match &result {
                Err(ClientError::SessionExpired) => None,
                Err(e) => Some(e.user_message()),
                Ok(_) => None,
            };
            let outcome = result.map_err(|e| {
                tracing::warn!(error = %e, "Employee list failed");
                LOAD_FAILED.to_string()
            });
            (state.complete(&ticket, outcome), notice)
        };

        if !applied {
            tracing::debug!(seq = ticket.seq, "Discarding stale employee page");
        } else if let Some(message) = notice {
            self.notifier.error(message);
        }
        self.state()
    }

    pub fn state(&self) -> ListState {
        self.lock().list().clone()
    }

    pub fn query(&self) -> QueryState {
        self.lock().query().clone()
    }

    pub fn current_page(&self) -> Option<Page<Employee>> {
        self.lock().list().page().cloned()
    }
}
