//! Company directory: full collection, list/search display modes, and the
//! filtered view the renderer shows.

use std::collections::HashSet;

use shared::domain::Company;
use tracing::{debug, info, warn};

use crate::{
    data_access::DataAccess,
    error::FetchError,
    load::{LoadTicket, LoadTracker},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    None,
    List,
    Search,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub performed: bool,
    pub text_field_focused: bool,
}

/// Companies whose name contains the trimmed query, ignoring case. A blank
/// query matches nothing.
pub fn search_companies(companies: &[Company], query: &str) -> Vec<Company> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    companies
        .iter()
        .filter(|company| company.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[derive(Debug, Default)]
pub struct DirectoryController {
    loads: LoadTracker<()>,
    companies: Vec<Company>,
    filtered: Vec<Company>,
    mode: DisplayMode,
    search: SearchState,
    load_error: Option<FetchError>,
    loaded: bool,
}

impl DirectoryController {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, data: &dyn DataAccess) {
        let ticket = self.begin_load();
        let result = data.fetch_companies().await;
        self.apply_load(ticket, result);
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        let ticket = self.loads.begin(());
        debug!(generation = ticket.generation(), "directory load started");
        ticket
    }

    pub fn apply_load(&mut self, ticket: LoadTicket, result: Result<Vec<Company>, FetchError>) {
        if !self.loads.is_current(&ticket) {
            debug!(generation = ticket.generation(), "dropping stale directory load");
            return;
        }

        match result {
            Ok(companies) => {
                let companies = dedupe_by_id(companies);
                info!(count = companies.len(), "directory loaded");
                self.filtered = companies.clone();
                self.companies = companies;
                self.load_error = None;
                self.loaded = true;
            }
            Err(err) => {
                warn!(error = %err, "failed to load companies");
                self.companies.clear();
                self.filtered.clear();
                self.load_error = Some(err);
                self.loaded = false;
            }
        }
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
        match mode {
            DisplayMode::List => {
                self.filtered = self.companies.clone();
                self.search.query.clear();
                self.search.performed = false;
            }
            DisplayMode::Search => {
                self.filtered.clear();
                self.search.query.clear();
                self.search.performed = false;
            }
            DisplayMode::None => self.filtered.clear(),
        }
    }

    /// Records the text input without filtering.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.search.query = query.into();
    }

    pub fn search(&mut self, query: &str) {
        self.search.query = query.to_string();
        self.filtered = search_companies(&self.companies, query);
        self.search.performed = true;
    }

    pub fn submit_search(&mut self) {
        let query = self.search.query.clone();
        self.search(&query);
    }

    pub fn clear(&mut self) {
        self.search.query.clear();
        self.filtered.clear();
        self.search.performed = false;
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.search.text_field_focused = focused;
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn filtered_companies(&self) -> &[Company] {
        &self.filtered
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    pub fn search_performed(&self) -> bool {
        self.search.performed
    }

    pub fn text_field_focused(&self) -> bool {
        self.search.text_field_focused
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn load_error(&self) -> Option<&FetchError> {
        self.load_error.as_ref()
    }

    pub fn shows_no_results_hint(&self) -> bool {
        self.search.performed && self.filtered.is_empty()
    }

    pub fn shows_enter_name_hint(&self) -> bool {
        self.search.text_field_focused && !self.search.performed
    }
}

fn dedupe_by_id(companies: Vec<Company>) -> Vec<Company> {
    let mut seen = HashSet::new();
    let total = companies.len();
    let unique: Vec<Company> = companies
        .into_iter()
        .filter(|company| seen.insert(company.company_id))
        .collect();
    if unique.len() != total {
        warn!(
            dropped = total - unique.len(),
            "duplicate company ids in directory response"
        );
    }
    unique
}

#[cfg(test)]
#[path = "tests/directory_tests.rs"]
mod tests;
