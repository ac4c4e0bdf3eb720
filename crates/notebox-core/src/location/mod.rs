//! Location permission tracking and place names for notes.
//!
//! The platform location service and geocoder are external. This module keeps
//! the state that decides what to ask them next, and turns geocoder results
//! into the label shown on a note.

use serde::{Deserialize, Serialize};

use crate::models::Coordinate;
use crate::Result;

/// Label used when a coordinate cannot be resolved to a place.
pub const UNKNOWN_PLACE: &str = "Unknown";

/// Location permission state reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    #[default]
    NotDetermined,
    Restricted,
    Denied,
    AuthorizedWhenInUse,
    AuthorizedAlways,
}

impl AuthorizationStatus {
    #[must_use]
    pub const fn is_authorized(self) -> bool {
        matches!(self, Self::AuthorizedWhenInUse | Self::AuthorizedAlways)
    }
}

/// What the caller should ask the platform location service to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationAction {
    StartUpdates,
    RequestAuthorization,
    StopUpdates,
    None,
}

/// Tracks authorization and keeps the first position fix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationTracker {
    status: AuthorizationStatus,
    permission_denied: bool,
    location: Option<Coordinate>,
    updating: bool,
}

impl LocationTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_authorization(&mut self, status: AuthorizationStatus) -> LocationAction {
        self.status = status;
        match status {
            AuthorizationStatus::AuthorizedWhenInUse | AuthorizationStatus::AuthorizedAlways => {
                self.permission_denied = false;
                if self.location.is_some() || self.updating {
                    LocationAction::None
                } else {
                    self.updating = true;
                    LocationAction::StartUpdates
                }
            }
            AuthorizationStatus::Denied | AuthorizationStatus::Restricted => {
                self.permission_denied = true;
                if self.updating {
                    self.updating = false;
                    LocationAction::StopUpdates
                } else {
                    LocationAction::None
                }
            }
            AuthorizationStatus::NotDetermined => LocationAction::RequestAuthorization,
        }
    }

    /// Record a position fix. Only the first fix is kept.
    pub fn record_fix(&mut self, coordinate: Coordinate) -> LocationAction {
        if self.location.is_none() {
            tracing::debug!(
                "Location fix at {:.5}, {:.5}",
                coordinate.latitude,
                coordinate.longitude
            );
            self.location = Some(coordinate);
        }
        if self.updating {
            self.updating = false;
            LocationAction::StopUpdates
        } else {
            LocationAction::None
        }
    }

    /// Log a location failure. State is left unchanged.
    pub fn record_failure(&self, message: &str) {
        tracing::warn!("Failed to get location: {message}");
    }

    #[must_use]
    pub const fn status(&self) -> AuthorizationStatus {
        self.status
    }

    #[must_use]
    pub const fn permission_denied(&self) -> bool {
        self.permission_denied
    }

    #[must_use]
    pub const fn permission_granted(&self) -> bool {
        self.status.is_authorized()
    }

    #[must_use]
    pub const fn location(&self) -> Option<Coordinate> {
        self.location
    }

    #[must_use]
    pub const fn is_updating(&self) -> bool {
        self.updating
    }
}

/// A reverse-geocoding result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placemark {
    pub name: Option<String>,
    pub locality: Option<String>,
    pub country: Option<String>,
}

/// Join the present parts of a placemark with `", "`.
///
/// Returns `None` when every part is missing or blank.
#[must_use]
pub fn format_place_name(placemark: &Placemark) -> Option<String> {
    let parts: Vec<&str> = [&placemark.name, &placemark.locality, &placemark.country]
        .into_iter()
        .filter_map(|part| part.as_deref().map(str::trim))
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Reverse geocoder provided by the platform
#[allow(async_fn_in_trait)]
pub trait Geocoder {
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Vec<Placemark>>;
}

/// Resolve a coordinate to a display label, falling back to [`UNKNOWN_PLACE`].
pub async fn resolve_place_name<G: Geocoder>(geocoder: &G, coordinate: Coordinate) -> String {
    match geocoder.reverse_geocode(coordinate).await {
        Ok(placemarks) => placemarks
            .first()
            .and_then(format_place_name)
            .unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
        Err(error) => {
            tracing::warn!("Reverse geocoding failed: {error}");
            UNKNOWN_PLACE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct FixedGeocoder(Result<Vec<Placemark>>);

    impl Geocoder for FixedGeocoder {
        async fn reverse_geocode(&self, _coordinate: Coordinate) -> Result<Vec<Placemark>> {
            match &self.0 {
                Ok(placemarks) => Ok(placemarks.clone()),
                Err(error) => Err(Error::InvalidInput(error.to_string())),
            }
        }
    }

    fn paris() -> Coordinate {
        Coordinate::new(48.8566, 2.3522).unwrap()
    }

    #[test]
    fn not_determined_requests_authorization() {
        let mut tracker = LocationTracker::new();
        assert_eq!(
            tracker.handle_authorization(AuthorizationStatus::NotDetermined),
            LocationAction::RequestAuthorization
        );
        assert!(!tracker.permission_denied());
        assert!(!tracker.permission_granted());
    }

    #[test]
    fn authorized_starts_then_first_fix_stops() {
        let mut tracker = LocationTracker::new();
        assert_eq!(
            tracker.handle_authorization(AuthorizationStatus::AuthorizedWhenInUse),
            LocationAction::StartUpdates
        );
        assert!(tracker.is_updating());

        assert_eq!(tracker.record_fix(paris()), LocationAction::StopUpdates);
        assert_eq!(tracker.location(), Some(paris()));

        let later = Coordinate::new(0.0, 0.0).unwrap();
        assert_eq!(tracker.record_fix(later), LocationAction::None);
        assert_eq!(tracker.location(), Some(paris()));
    }

    #[test]
    fn denied_sets_flag() {
        let mut tracker = LocationTracker::new();
        tracker.handle_authorization(AuthorizationStatus::AuthorizedAlways);
        assert_eq!(
            tracker.handle_authorization(AuthorizationStatus::Denied),
            LocationAction::StopUpdates
        );
        assert!(tracker.permission_denied());

        let mut restricted = LocationTracker::new();
        assert_eq!(
            restricted.handle_authorization(AuthorizationStatus::Restricted),
            LocationAction::None
        );
        assert!(restricted.permission_denied());
    }

    #[test]
    fn failure_leaves_state_unchanged() {
        let mut tracker = LocationTracker::new();
        tracker.handle_authorization(AuthorizationStatus::AuthorizedWhenInUse);
        let before = tracker.clone();
        tracker.record_failure("timeout");
        assert_eq!(tracker, before);
    }

    #[test]
    fn formats_present_parts() {
        let placemark = Placemark {
            name: Some("Eiffel Tower".to_string()),
            locality: None,
            country: Some("France".to_string()),
        };
        assert_eq!(
            format_place_name(&placemark).as_deref(),
            Some("Eiffel Tower, France")
        );
        assert_eq!(format_place_name(&Placemark::default()), None);
    }

    #[tokio::test]
    async fn resolves_first_placemark() {
        let geocoder = FixedGeocoder(Ok(vec![
            Placemark {
                name: Some("Louvre".to_string()),
                locality: Some("Paris".to_string()),
                country: Some("France".to_string()),
            },
            Placemark {
                name: Some("Ignored".to_string()),
                ..Placemark::default()
            },
        ]));
        assert_eq!(
            resolve_place_name(&geocoder, paris()).await,
            "Louvre, Paris, France"
        );
    }

    #[tokio::test]
    async fn falls_back_to_unknown() {
        let empty = FixedGeocoder(Ok(Vec::new()));
        assert_eq!(resolve_place_name(&empty, paris()).await, UNKNOWN_PLACE);

        let failing = FixedGeocoder(Err(Error::Media("offline".to_string())));
        assert_eq!(resolve_place_name(&failing, paris()).await, UNKNOWN_PLACE);
    }
}
