//! Presentation-state core for the company directory client.
//!
//! Two controllers own the mutable view state: [`DirectoryController`] for the
//! company list and search, [`DetailController`] for one company's locations,
//! map framing and category chart. Derivations ([`geo`], [`histogram`],
//! [`directory::search_companies`]) are pure functions kept apart from the
//! event handlers. Fetching goes through the [`DataAccess`] seam.

pub mod data_access;
pub mod detail;
pub mod directory;
pub mod error;
pub mod geo;
pub mod histogram;
pub mod load;
pub mod orchestration;
pub mod routes;

pub use data_access::{DataAccess, HttpDataAccess};
pub use detail::{DetailController, DetailStatus, MapMarker, MapView};
pub use directory::{DirectoryController, DisplayMode, SearchState};
pub use error::FetchError;
pub use geo::GeoBounds;
pub use histogram::{CategoryCount, CategoryHistogram, ChartSlice};
pub use load::LoadTicket;
pub use orchestration::{ControllerEvent, Session};
pub use routes::Route;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
