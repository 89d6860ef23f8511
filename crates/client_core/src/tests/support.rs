//! Fixtures and a scripted in-memory data source for controller tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use shared::{
    domain::{Company, CompanyId, Coordinate, Location, LocationId},
    error::ErrorCode,
};
use tokio::sync::Semaphore;

use crate::{data_access::DataAccess, error::FetchError};

pub(crate) fn company(id: i64, name: &str) -> Company {
    Company {
        company_id: CompanyId(id),
        name: name.to_string(),
        address: format!("{id} Company Road"),
        coordinate: Coordinate::new(id as f64, -(id as f64)),
    }
}

pub(crate) fn location(
    id: i64,
    company_id: i64,
    category: &str,
    latitude: f64,
    longitude: f64,
) -> Location {
    Location {
        location_id: LocationId(id),
        company_id: CompanyId(company_id),
        name: format!("site-{id}"),
        address: format!("{id} Site Lane"),
        coordinate: Coordinate::new(latitude, longitude),
        category: category.to_string(),
    }
}

pub(crate) fn transport_error() -> FetchError {
    FetchError::Transport("connection refused".to_string())
}

/// Canned per-id responses. Ids with a gate block every fetch until the test
/// adds permits to the gate's semaphore.
#[derive(Default)]
pub(crate) struct ScriptedDataAccess {
    companies: Option<Result<Vec<Company>, FetchError>>,
    company: HashMap<CompanyId, Result<Company, FetchError>>,
    locations: HashMap<CompanyId, Result<Vec<Location>, FetchError>>,
    gates: HashMap<CompanyId, Arc<Semaphore>>,
    panics: HashSet<CompanyId>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedDataAccess {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_companies(mut self, result: Result<Vec<Company>, FetchError>) -> Self {
        self.companies = Some(result);
        self
    }

    pub(crate) fn with_company(mut self, id: i64, result: Result<Company, FetchError>) -> Self {
        self.company.insert(CompanyId(id), result);
        self
    }

    pub(crate) fn with_locations(
        mut self,
        id: i64,
        result: Result<Vec<Location>, FetchError>,
    ) -> Self {
        self.locations.insert(CompanyId(id), result);
        self
    }

    pub(crate) fn gated(mut self, id: i64, gate: Arc<Semaphore>) -> Self {
        self.gates.insert(CompanyId(id), gate);
        self
    }

    /// Company fetches for `id` panic instead of answering.
    pub(crate) fn panicking(mut self, id: i64) -> Self {
        self.panics.insert(CompanyId(id));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }

    async fn wait_gate(&self, id: CompanyId) {
        if let Some(gate) = self.gates.get(&id) {
            gate.acquire().await.expect("gate open").forget();
        }
    }
}

#[async_trait]
impl DataAccess for ScriptedDataAccess {
    async fn fetch_companies(&self) -> Result<Vec<Company>, FetchError> {
        self.record("companies".to_string());
        self.companies.clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_company(&self, id: CompanyId) -> Result<Company, FetchError> {
        self.record(format!("company:{id}"));
        self.wait_gate(id).await;
        if self.panics.contains(&id) {
            panic!("company {id} fetch blew up");
        }
        self.company.get(&id).cloned().unwrap_or_else(|| {
            Err(FetchError::Status {
                status: 404,
                code: ErrorCode::NotFound,
                message: "Company not found".to_string(),
            })
        })
    }

    async fn fetch_locations(&self, company_id: CompanyId) -> Result<Vec<Location>, FetchError> {
        self.record(format!("locations:{company_id}"));
        self.wait_gate(company_id).await;
        self.locations
            .get(&company_id)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
