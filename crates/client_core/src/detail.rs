//! Single-company view: the company record, its locations, map framing,
//! marker selection, and the category chart.

use serde::Serialize;
use shared::domain::{Company, CompanyId, Coordinate, Location, LocationId};
use tracing::{debug, info, warn};

use crate::{
    data_access::DataAccess,
    error::FetchError,
    geo::{self, GeoBounds},
    histogram::{CategoryHistogram, ChartSlice},
    load::{LoadTicket, LoadTracker},
};

pub const DEFAULT_MAP_ZOOM: u8 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
    pub fit_bounds: Option<GeoBounds>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker<'a> {
    pub location_id: LocationId,
    pub name: &'a str,
    pub coordinate: Coordinate,
    pub selected: bool,
}

/// Both fetches of a load must succeed for the view to render; the first
/// failure discards whatever the other half delivered.
#[derive(Debug, Default)]
pub struct DetailController {
    loads: LoadTracker<CompanyId>,
    company: Option<Company>,
    locations: Option<Vec<Location>>,
    selected: Option<LocationId>,
    error: Option<FetchError>,
}

impl DetailController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the company and its locations concurrently and applies both.
    pub async fn load(&mut self, data: &dyn DataAccess, company_id: CompanyId) {
        let ticket = self.begin_load(company_id);
        let (company, locations) = futures::join!(
            data.fetch_company(company_id),
            data.fetch_locations(company_id)
        );
        self.apply_company(ticket, company);
        self.apply_locations(ticket, locations);
    }

    /// Starts a load for `company_id`, superseding any load in flight.
    pub fn begin_load(&mut self, company_id: CompanyId) -> LoadTicket<CompanyId> {
        let ticket = self.loads.begin(company_id);
        self.company = None;
        self.locations = None;
        self.selected = None;
        self.error = None;
        debug!(
            company_id = company_id.0,
            generation = ticket.generation(),
            "detail load started"
        );
        ticket
    }

    pub fn apply_company(
        &mut self,
        ticket: LoadTicket<CompanyId>,
        result: Result<Company, FetchError>,
    ) {
        if !self.accepts(&ticket, "company") {
            return;
        }
        match result {
            Ok(company) if company.company_id != ticket.key() => {
                warn!(
                    requested = ticket.key().0,
                    received = company.company_id.0,
                    "company response does not match requested id"
                );
                self.fail(FetchError::Decode(format!(
                    "expected company {}, received {}",
                    ticket.key(),
                    company.company_id
                )));
            }
            Ok(company) => {
                info!(company_id = company.company_id.0, "company loaded");
                self.company = Some(company);
            }
            Err(err) => {
                warn!(company_id = ticket.key().0, error = %err, "failed to load company");
                self.fail(err);
            }
        }
    }

    pub fn apply_locations(
        &mut self,
        ticket: LoadTicket<CompanyId>,
        result: Result<Vec<Location>, FetchError>,
    ) {
        if !self.accepts(&ticket, "locations") {
            return;
        }
        match result {
            Ok(locations) => {
                let company_id = ticket.key();
                let total = locations.len();
                let owned: Vec<Location> = locations
                    .into_iter()
                    .filter(|location| location.company_id == company_id)
                    .collect();
                if owned.len() != total {
                    warn!(
                        company_id = company_id.0,
                        dropped = total - owned.len(),
                        "ignoring locations owned by another company"
                    );
                }
                info!(company_id = company_id.0, count = owned.len(), "locations loaded");
                self.locations = Some(owned);
            }
            Err(err) => {
                warn!(company_id = ticket.key().0, error = %err, "failed to load locations");
                self.fail(err);
            }
        }
    }

    /// Selects the marker for `location_id`. Unknown ids leave the current
    /// selection untouched and return `false`.
    pub fn select(&mut self, location_id: LocationId) -> bool {
        let known = self
            .locations
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|location| location.location_id == location_id);
        if known {
            self.selected = Some(location_id);
        }
        known
    }

    pub fn status(&self) -> DetailStatus {
        if self.error.is_some() {
            DetailStatus::Failed
        } else if self.loads.active().is_none() {
            DetailStatus::Idle
        } else if self.company.is_some() && self.locations.is_some() {
            DetailStatus::Ready
        } else {
            DetailStatus::Loading
        }
    }

    pub fn active_company_id(&self) -> Option<CompanyId> {
        self.loads.active().map(|ticket| ticket.key())
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn company(&self) -> Option<&Company> {
        self.company.as_ref()
    }

    pub fn locations(&self) -> &[Location] {
        self.locations.as_deref().unwrap_or_default()
    }

    pub fn selected_location(&self) -> Option<&Location> {
        let selected = self.selected?;
        self.locations()
            .iter()
            .find(|location| location.location_id == selected)
    }

    /// Address line under the title: the selected site's, else the company's.
    pub fn display_address(&self) -> Option<&str> {
        self.selected_location()
            .map(|location| location.address.as_str())
            .or_else(|| self.company.as_ref().map(|company| company.address.as_str()))
    }

    /// `None` until locations have arrived, and for an empty location set.
    pub fn bounds(&self) -> Option<GeoBounds> {
        geo::bounds(self.locations.as_deref()?)
    }

    /// `None` until locations have arrived; an empty set yields an empty
    /// histogram.
    pub fn histogram(&self) -> Option<CategoryHistogram> {
        self.locations
            .as_deref()
            .map(|locations| CategoryHistogram::from_locations(locations))
    }

    pub fn chart(&self) -> Option<Vec<ChartSlice>> {
        self.histogram().map(|histogram| histogram.chart())
    }

    pub fn map_view(&self) -> Option<MapView> {
        let company = self.company.as_ref()?;
        Some(MapView {
            center: company.coordinate,
            zoom: DEFAULT_MAP_ZOOM,
            fit_bounds: self.bounds(),
        })
    }

    pub fn markers(&self) -> Vec<MapMarker<'_>> {
        self.locations()
            .iter()
            .map(|location| MapMarker {
                location_id: location.location_id,
                name: &location.name,
                coordinate: location.coordinate,
                selected: self.selected == Some(location.location_id),
            })
            .collect()
    }

    fn accepts(&self, ticket: &LoadTicket<CompanyId>, what: &str) -> bool {
        if !self.loads.is_current(ticket) {
            debug!(
                company_id = ticket.key().0,
                generation = ticket.generation(),
                what,
                "dropping stale detail completion"
            );
            return false;
        }
        if self.error.is_some() {
            debug!(company_id = ticket.key().0, what, "detail load already failed");
            return false;
        }
        true
    }

    fn fail(&mut self, err: FetchError) {
        self.company = None;
        self.locations = None;
        self.selected = None;
        self.error = Some(err);
    }
}

#[cfg(test)]
#[path = "tests/detail_tests.rs"]
mod tests;
