// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Mean earth radius in meters.
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Approximate length of one degree of latitude in meters.
const METERS_PER_DEGREE: f64 = 111_320.0;

/// A coordinate component as clients send it: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordinateInput {
    Number(f64),
    Text(String),
}

impl CoordinateInput {
    /// Converts the input to a finite number, if it is one.
    #[must_use]
    pub fn to_finite(&self) -> Option<f64> {
        let value: f64 = match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for CoordinateInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CoordinateInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A validated point on the earth, held in (longitude, latitude) order.
///
/// Only finiteness is checked. Values outside the usual degree ranges are
/// accepted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    longitude: f64,
    latitude: f64,
}

impl Geolocation {
    /// Parses a latitude/longitude pair from client input.
    ///
    /// # Arguments
    ///
    /// * `latitude` - The latitude component, if supplied
    /// * `longitude` - The longitude component, if supplied
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if either component is
    /// missing or is not a finite number.
    pub fn parse(
        latitude: Option<&CoordinateInput>,
        longitude: Option<&CoordinateInput>,
    ) -> Result<Self, DomainError> {
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            return Err(DomainError::InvalidCoordinates {
                reason: String::from("lat and lng are required"),
            });
        };
        let latitude: f64 = latitude
            .to_finite()
            .ok_or_else(|| DomainError::InvalidCoordinates {
                reason: String::from("lat must be a finite number"),
            })?;
        let longitude: f64 = longitude
            .to_finite()
            .ok_or_else(|| DomainError::InvalidCoordinates {
                reason: String::from("lng must be a finite number"),
            })?;
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Builds a point from an already-numeric `[longitude, latitude]` pair.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if either value is not finite.
    pub fn from_coordinates(coordinates: [f64; 2]) -> Result<Self, DomainError> {
        let [longitude, latitude] = coordinates;
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(DomainError::InvalidCoordinates {
                reason: String::from("coordinates must be finite numbers"),
            });
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the point as `[longitude, latitude]`.
    #[must_use]
    pub const fn coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Great-circle distance to another point, using the haversine formula.
    #[must_use]
    pub fn distance_meters(&self, other: &Self) -> f64 {
        let lat1: f64 = self.latitude.to_radians();
        let lat2: f64 = other.latitude.to_radians();
        let delta_lat: f64 = (other.latitude - self.latitude).to_radians();
        let delta_lng: f64 = (other.longitude - self.longitude).to_radians();

        let a: f64 = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
        let c: f64 = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_METERS * c
    }

    /// Returns a box that contains every point within `radius_meters`.
    ///
    /// The box is a prefilter only; callers still check the exact distance.
    /// When the box would cross a pole or the antimeridian the full
    /// longitude range is used.
    #[must_use]
    pub fn bounding_box(&self, radius_meters: f64) -> BoundingBox {
        let lat_delta: f64 = radius_meters / METERS_PER_DEGREE;
        let min_latitude: f64 = (self.latitude - lat_delta).max(-90.0);
        let max_latitude: f64 = (self.latitude + lat_delta).min(90.0);

        let cos_lat: f64 = self.latitude.to_radians().cos();
        let near_pole: bool = max_latitude >= 90.0 || min_latitude <= -90.0 || cos_lat <= 1e-9;
        if near_pole {
            return BoundingBox {
                min_longitude: -180.0,
                max_longitude: 180.0,
                min_latitude,
                max_latitude,
            };
        }

        let lng_delta: f64 = radius_meters / (METERS_PER_DEGREE * cos_lat);
        let min_longitude: f64 = self.longitude - lng_delta;
        let max_longitude: f64 = self.longitude + lng_delta;
        if min_longitude < -180.0 || max_longitude > 180.0 {
            return BoundingBox {
                min_longitude: -180.0,
                max_longitude: 180.0,
                min_latitude,
                max_latitude,
            };
        }

        BoundingBox {
            min_longitude,
            max_longitude,
            min_latitude,
            max_latitude,
        }
    }
}

/// Axis-aligned longitude/latitude bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub min_latitude: f64,
    pub max_latitude: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn contains(&self, point: &Geolocation) -> bool {
        (self.min_longitude..=self.max_longitude).contains(&point.longitude())
            && (self.min_latitude..=self.max_latitude).contains(&point.latitude())
    }
}
