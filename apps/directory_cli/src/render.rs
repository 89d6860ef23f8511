//! Plain-text and JSON renderings of the controller views.

use std::fmt::Write as _;

use client_core::{ChartSlice, DetailController, FetchError, GeoBounds, MapMarker, MapView, Route};
use serde::Serialize;
use shared::domain::{Company, CompanyId, Location};

pub const NO_RESULTS_HINT: &str = "No companies found matching your search criteria.";
pub const DETAIL_ERROR: &str =
    "Error loading data. Please check your network connection and try again.";

#[derive(Debug, Serialize)]
pub struct DetailView<'a> {
    pub company: &'a Company,
    pub address: &'a str,
    pub selected_location: Option<&'a Location>,
    pub map: MapView,
    pub markers: Vec<MapMarker<'a>>,
    pub chart: Vec<ChartSlice>,
}

impl<'a> DetailView<'a> {
    /// `None` unless the detail controller holds a complete, error-free load.
    pub fn from_controller(detail: &'a DetailController) -> Option<Self> {
        if detail.has_error() {
            return None;
        }
        let company = detail.company()?;
        Some(Self {
            company,
            address: detail.display_address().unwrap_or_default(),
            selected_location: detail.selected_location(),
            map: detail.map_view()?,
            markers: detail.markers(),
            chart: detail.chart()?,
        })
    }
}

/// Blocking message shown instead of the detail view.
pub fn detail_error(company_id: CompanyId, err: &FetchError) -> String {
    if err.is_not_found() {
        format!("Company {company_id} was not found.")
    } else {
        DETAIL_ERROR.to_string()
    }
}

pub fn company_list(companies: &[Company]) -> String {
    let mut out = String::new();
    for company in companies {
        let _ = writeln!(out, "[{}] {}", company.company_id, company.name);
        if !company.address.is_empty() {
            let _ = writeln!(out, "    {}", company.address);
        }
        let _ = writeln!(out, "    {}", Route::CompanyDetail(company.company_id));
    }
    out
}

pub fn detail(view: &DetailView<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.company.name);
    let _ = writeln!(out, "{}", view.address);
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Map: centre {:.5}, {:.5} at zoom {}",
        view.map.center.latitude, view.map.center.longitude, view.map.zoom
    );
    match view.map.fit_bounds {
        Some(bounds) => {
            let _ = writeln!(out, "Fit: {}", describe_bounds(&bounds));
        }
        None => {
            let _ = writeln!(out, "Fit: none (no locations)");
        }
    }
    for marker in &view.markers {
        let flag = if marker.selected { '*' } else { ' ' };
        let _ = writeln!(
            out,
            " {flag} [{}] {} ({:.5}, {:.5})",
            marker.location_id,
            marker.name,
            marker.coordinate.latitude,
            marker.coordinate.longitude
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Location Types Distribution");
    if view.chart.is_empty() {
        let _ = writeln!(out, "  (no locations)");
    }
    for slice in &view.chart {
        let _ = writeln!(out, "  {:<20} {:>4}  {}", slice.category, slice.count, slice.color);
    }
    out
}

fn describe_bounds(bounds: &GeoBounds) -> String {
    let sw = bounds.south_west();
    let ne = bounds.north_east();
    let centre = bounds.center();
    format!(
        "SW {:.5}, {:.5} / NE {:.5}, {:.5} (centre {:.5}, {:.5})",
        sw.latitude, sw.longitude, ne.latitude, ne.longitude, centre.latitude, centre.longitude
    )
}

#[cfg(test)]
mod tests {
    use shared::{
        domain::{Coordinate, LocationId},
        error::ErrorCode,
    };

    use super::*;

    fn acme() -> Company {
        Company {
            company_id: CompanyId(1),
            name: "Acme Corp".into(),
            address: "1 Main St".into(),
            coordinate: Coordinate::new(10.0, 20.0),
        }
    }

    fn site(id: i64, category: &str, latitude: f64, longitude: f64) -> Location {
        Location {
            location_id: LocationId(id),
            company_id: CompanyId(1),
            name: format!("site-{id}"),
            address: format!("{id} Site Lane"),
            coordinate: Coordinate::new(latitude, longitude),
            category: category.into(),
        }
    }

    #[test]
    fn company_list_links_to_detail_route() {
        let text = company_list(&[acme()]);
        assert!(text.contains("[1] Acme Corp"));
        assert!(text.contains("1 Main St"));
        assert!(text.contains("/company/1"));
    }

    #[test]
    fn detail_view_requires_complete_load() {
        let mut controller = DetailController::new();
        let ticket = controller.begin_load(CompanyId(1));
        controller.apply_company(ticket, Ok(acme()));
        assert!(DetailView::from_controller(&controller).is_none());

        controller.apply_locations(
            ticket,
            Ok(vec![site(10, "warehouse", 10.0, 20.0), site(11, "factory", 12.0, 18.0)]),
        );
        controller.select(LocationId(11));

        let view = DetailView::from_controller(&controller).expect("view");
        assert_eq!(view.address, "11 Site Lane");

        let text = detail(&view);
        assert!(text.contains("Acme Corp"));
        assert!(text.contains("SW 10.00000, 18.00000 / NE 12.00000, 20.00000"));
        assert!(text.contains("(centre 11.00000, 19.00000)"));
        assert!(text.contains(" * [11] site-11"));
        assert!(text.contains("warehouse"));

        let json = serde_json::to_value(&view).expect("json");
        assert_eq!(json["map"]["zoom"], 13);
        assert_eq!(json["chart"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn empty_location_set_renders_without_bounds() {
        let mut controller = DetailController::new();
        let ticket = controller.begin_load(CompanyId(1));
        controller.apply_company(ticket, Ok(acme()));
        controller.apply_locations(ticket, Ok(Vec::new()));

        let view = DetailView::from_controller(&controller).expect("view");
        let text = detail(&view);
        assert!(text.contains("Fit: none"));
        assert!(text.contains("(no locations)"));
    }

    #[test]
    fn detail_error_names_missing_company() {
        let missing = FetchError::Status {
            status: 404,
            code: ErrorCode::NotFound,
            message: "Company not found".into(),
        };
        assert_eq!(detail_error(CompanyId(9), &missing), "Company 9 was not found.");

        let refused = FetchError::Transport("connection refused".into());
        assert_eq!(detail_error(CompanyId(9), &refused), DETAIL_ERROR);
    }
}
