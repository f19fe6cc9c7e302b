use crate::error::TrackingError;

/// Radius used by the web mapping provider for its spherical computations.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Point {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
    }

    // great-circle distance on a sphere with the given radius
    pub fn haversine_distance_with_radius(&self, other: &Point, radius: f64) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = lat2 - lat1;
        let d_lng = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * radius * a.sqrt().min(1.0).asin()
    }

    pub fn haversine_distance(&self, other: &Point) -> f64 {
        self.haversine_distance_with_radius(other, EARTH_RADIUS_M)
    }
}

/// The mapping provider's geometry capability.
pub trait GeometryProvider {
    /// Great-circle distance in meters. `GeometryUnavailable` means the
    /// capability isn't loaded (yet); callers treat that as "no reading".
    fn distance_meters(&self, a: &Point, b: &Point) -> Result<f64, TrackingError>;
}

pub struct SphericalGeometry {
    radius: Option<f64>,
}

impl SphericalGeometry {
    pub fn new() -> Self {
        SphericalGeometry {
            radius: Some(EARTH_RADIUS_M),
        }
    }

    pub fn with_radius(radius: f64) -> Self {
        SphericalGeometry {
            radius: Some(radius),
        }
    }

    /// A provider whose geometry library never loaded.
    pub fn unavailable() -> Self {
        SphericalGeometry { radius: None }
    }
}

impl GeometryProvider for SphericalGeometry {
    fn distance_meters(&self, a: &Point, b: &Point) -> Result<f64, TrackingError> {
        let radius = self.radius.ok_or(TrackingError::GeometryUnavailable)?;
        for point in [a, b] {
            if !point.is_valid() {
                return Err(TrackingError::InvalidCoordinate {
                    latitude: point.latitude,
                    longitude: point.longitude,
                });
            }
        }
        Ok(a.haversine_distance_with_radius(b, radius))
    }
}
