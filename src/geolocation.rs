//! One-shot device position lookup
//!
//! The browser reports positions through a callback API, so the trait is
//! `?Send`: implementations may hold JS values across the await.

use crate::core::geo::LatLng;
use async_trait::async_trait;

/// Why a position could not be obtained
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeolocationError {
    #[error("geolocation is not supported on this device")]
    Unsupported,

    #[error("permission to read the location was denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("timed out waiting for a position")]
    Timeout,

    #[error("device reported an invalid position: {0}, {1}")]
    InvalidPosition(f64, f64),
}

#[async_trait(?Send)]
pub trait Geolocator {
    /// Resolves once with the current position or the reason there is none
    async fn current_position(&self) -> Result<LatLng, GeolocationError>;
}

/// Checks a reported position before the map uses it
pub(crate) fn validate_position(lat: f64, lng: f64) -> Result<LatLng, GeolocationError> {
    LatLng::checked(lat, lng).ok_or(GeolocationError::InvalidPosition(lat, lng))
}

/// Always reports the same position. Used by headless hosts and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedGeolocator(pub LatLng);

#[async_trait(?Send)]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<LatLng, GeolocationError> {
        validate_position(self.0.lat, self.0.lng)
    }
}

/// Always fails with the same error, e.g. a denied permission prompt
#[derive(Debug, Clone, PartialEq)]
pub struct UnavailableGeolocator(pub GeolocationError);

impl Default for UnavailableGeolocator {
    fn default() -> Self {
        Self(GeolocationError::Unsupported)
    }
}

#[async_trait(?Send)]
impl Geolocator for UnavailableGeolocator {
    async fn current_position(&self) -> Result<LatLng, GeolocationError> {
        Err(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_geolocator() {
        let geolocator = FixedGeolocator(LatLng::new(-1.5, 36.9));
        assert_eq!(
            geolocator.current_position().await,
            Ok(LatLng::new(-1.5, 36.9))
        );
    }

    #[tokio::test]
    async fn test_fixed_geolocator_rejects_out_of_range() {
        let geolocator = FixedGeolocator(LatLng::new(95.0, 36.9));
        assert_eq!(
            geolocator.current_position().await,
            Err(GeolocationError::InvalidPosition(95.0, 36.9))
        );
    }

    #[tokio::test]
    async fn test_unavailable_geolocator() {
        let denied = UnavailableGeolocator(GeolocationError::PermissionDenied);
        assert_eq!(
            denied.current_position().await,
            Err(GeolocationError::PermissionDenied)
        );
        assert_eq!(
            UnavailableGeolocator::default().current_position().await,
            Err(GeolocationError::Unsupported)
        );
    }
}
