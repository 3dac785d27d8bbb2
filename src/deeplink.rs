//! Builds the external navigation URLs handed off to the platform maps app.
//!
//! Two schemes, picked by the shell's platform: Apple Maps query URLs and the
//! Google Maps universal directions URL. Only routable stops participate;
//! itinerary order is list order. The crate never opens the URL itself, it
//! surfaces it through the view model and lets the shell dispatch it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stops::{Stop, StopList};

pub const APPLE_MAPS_BASE: &str = "http://maps.apple.com/";
pub const GOOGLE_MAPS_DIR_BASE: &str = "https://www.google.com/maps/dir/?api=1&travelmode=driving";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapsTarget {
    Apple,
    Google,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeepLinkError {
    #[error("stop has no coordinates")]
    MissingCoordinates,
    #[error("no stop in the itinerary has coordinates")]
    EmptyItinerary,
}

/// `"{lat},{lng}"` with plain f64 Display formatting, so `7.0` renders as `7`.
/// Both maps services accept the shortened form.
fn coordinate_param(lat: f64, lng: f64) -> String {
    format!("{lat},{lng}")
}

/// Directions from the user's current location to a single stop.
pub fn single_stop_url(target: MapsTarget, stop: &Stop) -> Result<String, DeepLinkError> {
    let (lat, lng) = stop.coordinate().ok_or(DeepLinkError::MissingCoordinates)?;
    let coord = coordinate_param(lat, lng);
    Ok(match target {
        MapsTarget::Apple => format!("{APPLE_MAPS_BASE}?daddr={coord}&dirflg=d"),
        MapsTarget::Google => format!("{GOOGLE_MAPS_DIR_BASE}&destination={coord}"),
    })
}

/// Directions through every routable stop, in list order.
///
/// Apple chains intermediate stops onto `daddr` with `+to:` separators.
/// Google takes `origin`/`destination` plus a percent-encoded, pipe-joined
/// `waypoints` parameter, emitted only when there is at least one stop
/// between the endpoints.
pub fn itinerary_url(target: MapsTarget, stops: &StopList) -> Result<String, DeepLinkError> {
    let coords: Vec<String> = stops
        .qualifying()
        .filter_map(Stop::coordinate)
        .map(|(lat, lng)| coordinate_param(lat, lng))
        .collect();

    let (first, rest) = coords.split_first().ok_or(DeepLinkError::EmptyItinerary)?;

    Ok(match target {
        MapsTarget::Apple => {
            let mut link = format!("{APPLE_MAPS_BASE}?saddr={first}");
            if let Some((last, middle)) = rest.split_last() {
                link.push_str("&daddr=");
                for coord in middle {
                    link.push_str(coord);
                    link.push_str("+to:");
                }
                link.push_str(last);
            }
            link
        }
        MapsTarget::Google => {
            let last = rest.last().unwrap_or(first);
            let mut link = format!("{GOOGLE_MAPS_DIR_BASE}&origin={first}&destination={last}");
            if rest.len() > 1 {
                let middle = &rest[..rest.len() - 1];
                let joined = middle.join("|");
                let encoded: String =
                    url::form_urlencoded::byte_serialize(joined.as_bytes()).collect();
                link.push_str("&waypoints=");
                link.push_str(&encoded);
            }
            link
        }
    })
}
