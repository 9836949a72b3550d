//! Parsing and formatting of `"lat, lng"` text
//!
//! Form fields and ride documents carry coordinates as plain text. Only the
//! strict decimal form is accepted: an optional minus sign, digits, an
//! optional fraction, a comma, and the same again. No exponents, no `+`, no
//! surrounding text beyond whitespace.

use crate::{core::geo::LatLng, MapError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

static LAT_LNG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)$")
        .expect("coordinate pattern is a valid regex")
});

/// Parses `"lat, lng"` text into an in-range coordinate.
///
/// Surrounding whitespace is ignored. Returns `None` for anything that is not
/// a strict decimal pair or falls outside lat ∈ [-90, 90], lng ∈ [-180, 180].
pub fn parse_lat_lng(text: &str) -> Option<LatLng> {
    let captures = LAT_LNG_PATTERN.captures(text.trim())?;
    let lat = captures.get(1)?.as_str().parse::<f64>().ok()?;
    let lng = captures.get(2)?.as_str().parse::<f64>().ok()?;
    LatLng::checked(lat, lng)
}

impl FromStr for LatLng {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_lat_lng(s).ok_or_else(|| MapError::InvalidCoordinates(s.trim().to_string()))
    }
}

/// How a coordinate is written into a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateFormat {
    /// Shortest text that reads back to the same `f64`, e.g. `"1, 2"`
    Shortest,
    /// Fixed number of decimals, e.g. `"-1.500000, 36.900000"`
    Fixed(usize),
}

pub fn format_lat_lng(lat_lng: &LatLng, format: CoordinateFormat) -> String {
    match format {
        CoordinateFormat::Shortest => format!("{}, {}", lat_lng.lat, lat_lng.lng),
        CoordinateFormat::Fixed(decimals) => format!(
            "{:.prec$}, {:.prec$}",
            lat_lng.lat,
            lat_lng.lng,
            prec = decimals
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_strict_pairs() {
        assert_eq!(parse_lat_lng("-1.3,36.8"), Some(LatLng::new(-1.3, 36.8)));
        assert_eq!(parse_lat_lng("  -1.3 ,  36.8 "), Some(LatLng::new(-1.3, 36.8)));
        assert_eq!(parse_lat_lng("1, 2"), Some(LatLng::new(1.0, 2.0)));
        assert_eq!(parse_lat_lng("90,-180"), Some(LatLng::new(90.0, -180.0)));
    }

    #[test]
    fn test_rejects_loose_text() {
        for text in [
            "",
            "not an address",
            "Kenyatta Avenue, Nairobi",
            "1.,2",
            ".5,2",
            "+1,2",
            "1e2,3",
            "1,2,3",
            "1 2",
            "(1, 2)",
            "1, 2 north",
        ] {
            assert_eq!(parse_lat_lng(text), None, "{:?} should not parse", text);
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(parse_lat_lng("91,0"), None);
        assert_eq!(parse_lat_lng("-90.5,0"), None);
        assert_eq!(parse_lat_lng("0,180.0001"), None);
    }

    #[test]
    fn test_from_str() {
        let parsed: LatLng = "-1.2921, 36.8219".parse().unwrap();
        assert_eq!(parsed, LatLng::new(-1.2921, 36.8219));

        let err = "somewhere".parse::<LatLng>().unwrap_err();
        assert!(matches!(err, MapError::InvalidCoordinates(text) if text == "somewhere"));
    }

    #[test]
    fn test_formats() {
        let point = LatLng::new(1.0, 2.0);
        assert_eq!(format_lat_lng(&point, CoordinateFormat::Shortest), "1, 2");

        let driver = LatLng::new(-1.5, 36.9);
        assert_eq!(
            format_lat_lng(&driver, CoordinateFormat::Fixed(6)),
            "-1.500000, 36.900000"
        );
    }

    #[test]
    fn test_field_text_reads_back() {
        let original = LatLng::new(-1.292066, 36.821946);

        let rider = format_lat_lng(&original, CoordinateFormat::Shortest);
        assert_eq!(parse_lat_lng(&rider), Some(original));

        let driver = format_lat_lng(&LatLng::new(-1.2920661234, 36.8219469876), CoordinateFormat::Fixed(6));
        let back = parse_lat_lng(&driver).unwrap();
        assert!((back.lat - -1.2920661234).abs() <= 5e-7);
        assert!((back.lng - 36.8219469876).abs() <= 5e-7);
    }
}
