//! Spherical coordinates and great-circle helpers.

use crate::constants::{EARTH_RADIUS_KM, EPSILON_RAD, M_2PI, M_PI, M_PI_2};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point on the sphere: latitude and longitude in radians.
///
/// Latitude lies in `[-pi/2, pi/2]`; longitude is normalized to
/// `(-pi, pi]` by the operations that produce coordinates.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoCoord {
  /// Latitude in radians.
  pub lat: f64,
  /// Longitude in radians.
  pub lng: f64,
}

impl GeoCoord {
  /// Creates a coordinate from radians.
  #[must_use]
  pub const fn new(lat: f64, lng: f64) -> Self {
    Self { lat, lng }
  }

  /// Creates a coordinate from decimal degrees.
  #[must_use]
  pub fn from_degrees(lat_deg: f64, lng_deg: f64) -> Self {
    Self {
      lat: lat_deg.to_radians(),
      lng: lng_deg.to_radians(),
    }
  }

  /// Componentwise comparison within `threshold` radians.
  #[must_use]
  pub(crate) fn almost_eq_threshold(&self, other: &GeoCoord, threshold: f64) -> bool {
    (self.lat - other.lat).abs() < threshold && (self.lng - other.lng).abs() < threshold
  }

  /// Componentwise comparison within the standard epsilon.
  #[must_use]
  pub(crate) fn almost_eq(&self, other: &GeoCoord) -> bool {
    self.almost_eq_threshold(other, EPSILON_RAD)
  }

  /// Azimuth in radians from `self` to `other`.
  #[must_use]
  pub(crate) fn azimuth_to(&self, other: &GeoCoord) -> f64 {
    (other.lat.cos() * (other.lng - self.lng).sin()).atan2(
      self.lat.cos() * other.lat.sin() - self.lat.sin() * other.lat.cos() * (other.lng - self.lng).cos(),
    )
  }

  /// The point at the given azimuth and angular distance (radians) from
  /// `self`.
  #[must_use]
  pub(crate) fn at_azimuth_distance(&self, az: f64, distance: f64) -> GeoCoord {
    if distance < EPSILON_RAD {
      return *self;
    }

    let az = pos_angle(az);
    let mut out = GeoCoord::default();

    if az < EPSILON_RAD || (az - M_PI).abs() < EPSILON_RAD {
      // due north or south
      out.lat = if az < EPSILON_RAD {
        self.lat + distance
      } else {
        self.lat - distance
      };

      if (out.lat - M_PI_2).abs() < EPSILON_RAD {
        out.lat = M_PI_2;
        out.lng = 0.0;
      } else if (out.lat + M_PI_2).abs() < EPSILON_RAD {
        out.lat = -M_PI_2;
        out.lng = 0.0;
      } else {
        out.lng = constrain_lng(self.lng);
      }
    } else {
      let sin_lat =
        (self.lat.sin() * distance.cos() + self.lat.cos() * distance.sin() * az.cos()).clamp(-1.0, 1.0);
      out.lat = sin_lat.asin();

      if (out.lat - M_PI_2).abs() < EPSILON_RAD {
        out.lat = M_PI_2;
        out.lng = 0.0;
      } else if (out.lat + M_PI_2).abs() < EPSILON_RAD {
        out.lat = -M_PI_2;
        out.lng = 0.0;
      } else {
        let inv_cos_lat = 1.0 / out.lat.cos();
        let sin_lng = (az.sin() * distance.sin() * inv_cos_lat).clamp(-1.0, 1.0);
        let cos_lng =
          ((distance.cos() - self.lat.sin() * out.lat.sin()) / self.lat.cos() * inv_cos_lat).clamp(-1.0, 1.0);
        out.lng = constrain_lng(self.lng + sin_lng.atan2(cos_lng));
      }
    }
    out
  }
}

/// Normalizes an angle in radians to `[0, 2*pi)`.
#[inline]
#[must_use]
pub(crate) fn pos_angle(rads: f64) -> f64 {
  let mut tmp = if rads < 0.0 { rads + M_2PI } else { rads };
  while tmp >= M_2PI {
    tmp -= M_2PI;
  }
  tmp
}

/// Constrains longitude to `[-pi, pi]`.
#[inline]
#[must_use]
pub(crate) fn constrain_lng(mut lng: f64) -> f64 {
  while lng > M_PI {
    lng -= M_2PI;
  }
  while lng < -M_PI {
    lng += M_2PI;
  }
  lng
}

/// Great-circle distance between two points in radians, by the haversine
/// formula.
#[must_use]
pub fn great_circle_distance_rads(a: &GeoCoord, b: &GeoCoord) -> f64 {
  let sin_lat = ((b.lat - a.lat) * 0.5).sin();
  let sin_lng = ((b.lng - a.lng) * 0.5).sin();
  let h = (sin_lat * sin_lat + a.lat.cos() * b.lat.cos() * sin_lng * sin_lng).clamp(0.0, 1.0);
  2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Great-circle distance between two points in kilometers.
#[must_use]
pub fn great_circle_distance_km(a: &GeoCoord, b: &GeoCoord) -> f64 {
  great_circle_distance_rads(a, b) * EARTH_RADIUS_KM
}

/// Great-circle distance between two points in meters.
#[must_use]
pub fn great_circle_distance_m(a: &GeoCoord, b: &GeoCoord) -> f64 {
  great_circle_distance_km(a, b) * 1000.0
}
