//! Ride request documents as the back end injects them into the driver page
//!
//! The documents are loosely typed: `pickup` and `destination` may be
//! `"lat, lng"` text, a free-text address, a number or absent, and the
//! list itself may be missing or malformed. Decoding never fails; anything
//! unusable is dropped with a log record.

use crate::{core::geo::LatLng, data::coordinate::parse_lat_lng};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Lifecycle of a ride request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RideStatus {
    #[default]
    Pending,
    Accepted,
    InProgress,
    Completed,
    /// A status this client does not know about, kept verbatim
    Other(String),
}

impl RideStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RideStatus::Pending => "pending",
            RideStatus::Accepted => "accepted",
            RideStatus::InProgress => "in_progress",
            RideStatus::Completed => "completed",
            RideStatus::Other(status) => status,
        }
    }

    fn from_text(text: &str) -> Self {
        match text {
            "pending" => RideStatus::Pending,
            "accepted" => RideStatus::Accepted,
            "in_progress" => RideStatus::InProgress,
            "completed" => RideStatus::Completed,
            other => RideStatus::Other(other.to_string()),
        }
    }
}

impl Serialize for RideStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RideStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(text) => RideStatus::from_text(&text),
            _ => RideStatus::default(),
        })
    }
}

/// Reads strings as-is and numbers as their text; anything else is absent.
/// Mongo-style `{"$oid": "..."}` ids unwrap to the inner string.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(text_of(&value))
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Object(fields) => match fields.get("$oid") {
            Some(Value::String(oid)) => Some(oid.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// One ride request. Only `pickup` and `destination` matter for plotting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RideRequest {
    #[serde(alias = "_id", deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub pickup: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub destination: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub rider_id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub driver_id: Option<String>,
    pub status: RideStatus,
}

impl RideRequest {
    pub fn new(pickup: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            pickup: Some(pickup.into()),
            destination: Some(destination.into()),
            ..Default::default()
        }
    }

    /// Pickup as a coordinate, when the text is a strict `"lat, lng"` pair
    pub fn pickup_lat_lng(&self) -> Option<LatLng> {
        self.pickup.as_deref().and_then(parse_lat_lng)
    }

    /// Destination as a coordinate, when the text is a strict `"lat, lng"` pair
    pub fn destination_lat_lng(&self) -> Option<LatLng> {
        self.destination.as_deref().and_then(parse_lat_lng)
    }

    pub fn is_pending(&self) -> bool {
        self.status == RideStatus::Pending
    }
}

/// Ordered list of ride requests
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RideList {
    rides: Vec<RideRequest>,
}

impl RideList {
    pub fn new(rides: Vec<RideRequest>) -> Self {
        Self { rides }
    }

    /// Decodes a JSON array of ride documents. Invalid JSON or a non-array
    /// yields an empty list; elements that are not ride objects are skipped.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => Self::from_value(value),
            Err(err) => {
                log::warn!("ride list is not valid JSON: {}", err);
                Self::default()
            }
        }
    }

    pub fn from_value(value: Value) -> Self {
        let Value::Array(items) = value else {
            log::warn!("ride list is not an array; no rides plotted");
            return Self::default();
        };

        let rides = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| {
                if !item.is_object() {
                    log::debug!("skipping ride {}: not an object", index);
                    return None;
                }
                match serde_json::from_value::<RideRequest>(item) {
                    Ok(ride) => Some(ride),
                    Err(err) => {
                        log::debug!("skipping ride {}: {}", index, err);
                        None
                    }
                }
            })
            .collect();

        Self { rides }
    }

    /// Rides still waiting for a driver
    pub fn pending(&self) -> impl Iterator<Item = &RideRequest> {
        self.rides.iter().filter(|ride| ride.is_pending())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RideRequest> {
        self.rides.iter()
    }

    pub fn len(&self) -> usize {
        self.rides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rides.is_empty()
    }

    pub fn into_vec(self) -> Vec<RideRequest> {
        self.rides
    }
}

impl From<Vec<RideRequest>> for RideList {
    fn from(rides: Vec<RideRequest>) -> Self {
        Self::new(rides)
    }
}

impl FromIterator<RideRequest> for RideList {
    fn from_iter<I: IntoIterator<Item = RideRequest>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for RideList {
    type Item = RideRequest;
    type IntoIter = std::vec::IntoIter<RideRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.rides.into_iter()
    }
}

impl<'a> IntoIterator for &'a RideList {
    type Item = &'a RideRequest;
    type IntoIter = std::slice::Iter<'a, RideRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.rides.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_ride_documents() {
        let rides = RideList::from_json(
            r#"[
                {"_id": {"$oid": "64f1"}, "pickup": "-1.3,36.8", "destination": "Westlands",
                 "rider_id": "r1", "status": "pending", "driver_id": null},
                {"id": "2", "pickup": "-1.2, 36.9", "destination": "-1.25,36.85", "status": "accepted"}
            ]"#,
        );

        assert_eq!(rides.len(), 2);
        let first = rides.iter().next().unwrap();
        assert_eq!(first.id.as_deref(), Some("64f1"));
        assert_eq!(first.rider_id.as_deref(), Some("r1"));
        assert_eq!(first.driver_id, None);
        assert_eq!(first.pickup_lat_lng(), Some(LatLng::new(-1.3, 36.8)));
        assert_eq!(first.destination_lat_lng(), None);

        assert_eq!(rides.pending().count(), 1);
    }

    #[test]
    fn test_non_array_is_empty() {
        assert!(RideList::from_json(r#"{"pickup": "1,2"}"#).is_empty());
        assert!(RideList::from_json("null").is_empty());
        assert!(RideList::from_json("not json").is_empty());
    }

    #[test]
    fn test_skips_non_objects() {
        let rides = RideList::from_json(r#"[1, "x", null, ["1,2", "3,4"], {"pickup": "1,2"}]"#);
        assert_eq!(rides.len(), 1);
        assert_eq!(rides.iter().next().unwrap().pickup.as_deref(), Some("1,2"));
    }

    #[test]
    fn test_lenient_fields() {
        let rides = RideList::from_json(
            r#"[{"pickup": 5, "destination": {"lat": 1}, "status": "cancelled"}]"#,
        );
        let ride = rides.iter().next().unwrap();

        assert_eq!(ride.pickup.as_deref(), Some("5"));
        assert_eq!(ride.pickup_lat_lng(), None);
        assert_eq!(ride.destination, None);
        assert_eq!(ride.status, RideStatus::Other("cancelled".to_string()));
        assert!(!ride.is_pending());
    }

    #[test]
    fn test_missing_status_defaults_to_pending() {
        let ride: RideRequest = serde_json::from_str(r#"{"pickup": "1,2"}"#).unwrap();
        assert_eq!(ride.status, RideStatus::Pending);
        assert_eq!(ride.destination, None);
    }
}
