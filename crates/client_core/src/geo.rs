//! Map framing: the enclosing rectangle over a set of coordinates.

use serde::Serialize;
use shared::domain::{Coordinate, Location};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoBounds {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl GeoBounds {
    /// Smallest rectangle covering every finite coordinate, or `None` when
    /// there is nothing to cover.
    pub fn from_coordinates(coordinates: impl IntoIterator<Item = Coordinate>) -> Option<Self> {
        coordinates
            .into_iter()
            .filter(|c| c.latitude.is_finite() && c.longitude.is_finite())
            .fold(None, |acc: Option<Self>, c| {
                Some(match acc {
                    None => Self {
                        min_latitude: c.latitude,
                        max_latitude: c.latitude,
                        min_longitude: c.longitude,
                        max_longitude: c.longitude,
                    },
                    Some(b) => Self {
                        min_latitude: b.min_latitude.min(c.latitude),
                        max_latitude: b.max_latitude.max(c.latitude),
                        min_longitude: b.min_longitude.min(c.longitude),
                        max_longitude: b.max_longitude.max(c.longitude),
                    },
                })
            })
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&coordinate.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&coordinate.longitude)
    }

    pub fn south_west(&self) -> Coordinate {
        Coordinate::new(self.min_latitude, self.min_longitude)
    }

    pub fn north_east(&self) -> Coordinate {
        Coordinate::new(self.max_latitude, self.max_longitude)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_latitude + self.max_latitude) / 2.0,
            (self.min_longitude + self.max_longitude) / 2.0,
        )
    }
}

pub fn bounds(locations: &[Location]) -> Option<GeoBounds> {
    GeoBounds::from_coordinates(locations.iter().map(|l| l.coordinate))
}
