//! Stop list model: the ordered sequence of road-trip waypoints edited on the
//! map screen.
//!
//! List order is itinerary order: the first stop is the route origin, the last
//! is the destination, everything in between is a waypoint. A stop without
//! coordinates stays in the list (it can still be renamed or deleted) but is
//! never rendered and never routed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_STOP_NAME_PREFIX: &str = "Arrêt";

/// Stable identity for a stop, assigned at creation/normalization time.
///
/// The UI selects stops by id, not by index: deletions shift indices, and a
/// selection held across a structural mutation would otherwise point at the
/// wrong stop. Indices are resolved from ids only at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StopId(Uuid);

impl StopId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for StopId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: String,
}

impl Stop {
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        Self {
            id: StopId::generate(),
            name: name.into(),
            latitude,
            longitude,
            description: String::new(),
        }
    }

    /// Both coordinates present: the stop can be drawn and routed.
    #[must_use]
    pub fn coordinate(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_routable(&self) -> bool {
        self.coordinate().is_some()
    }
}

// --- Upstream wire shapes ---
//
// The backend serves stops in two shapes: user-saved custom stops with flat
// coordinate fields (older records nest them instead), and template road-trip
// stops which always nest them under `coordinates`. Normalization happens here,
// once, at the boundary; the rest of the crate only ever sees `Stop`.

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinatePair {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomStopRecord {
    pub name: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub coordinates: Option<CoordinatePair>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateStopRecord {
    pub name: String,
    #[serde(default)]
    pub coordinates: Option<CoordinatePair>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CustomStopRecord> for Stop {
    fn from(record: CustomStopRecord) -> Self {
        // Flat fields win over the nested pair when both are present.
        let latitude = record.latitude.or(record.coordinates.map(|c| c.lat));
        let longitude = record.longitude.or(record.coordinates.map(|c| c.lng));
        Self {
            id: StopId::generate(),
            name: record.name,
            latitude,
            longitude,
            description: record.description.unwrap_or_default(),
        }
    }
}

impl From<TemplateStopRecord> for Stop {
    fn from(record: TemplateStopRecord) -> Self {
        Self {
            id: StopId::generate(),
            name: record.name,
            latitude: record.coordinates.map(|c| c.lat),
            longitude: record.coordinates.map(|c| c.lng),
            description: record.description.unwrap_or_default(),
        }
    }
}

/// Flat shape persisted back to the backend, regardless of which upstream
/// shape populated the list. Coordinate-less stops are persisted too: name and
/// description edits on them are meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedStop {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopList {
    stops: Vec<Stop>,
}

impl StopList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_custom_records(records: Vec<CustomStopRecord>) -> Self {
        Self {
            stops: records.into_iter().map(Stop::from).collect(),
        }
    }

    #[must_use]
    pub fn from_template_records(records: Vec<TemplateStopRecord>) -> Self {
        Self {
            stops: records.into_iter().map(Stop::from).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Stop> {
        self.stops.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter()
    }

    #[must_use]
    pub fn index_of(&self, id: StopId) -> Option<usize> {
        self.stops.iter().position(|s| s.id == id)
    }

    /// First stop that can be drawn; the recenter target.
    #[must_use]
    pub fn first_coordinate(&self) -> Option<(f64, f64)> {
        self.stops.iter().find_map(Stop::coordinate)
    }

    /// Appends a stop at the given coordinate with a generated name
    /// (`"Arrêt {n}"`, n = 1-based position). Never fails.
    pub fn append(&mut self, latitude: f64, longitude: f64) -> StopId {
        let stop = Stop::new(
            format!("{} {}", DEFAULT_STOP_NAME_PREFIX, self.stops.len() + 1),
            Some(latitude),
            Some(longitude),
        );
        let id = stop.id;
        self.stops.push(stop);
        id
    }

    /// Replaces the coordinate of the stop at `index`. Out-of-range indices
    /// are a silent no-op; callers only hold indices from the current render.
    pub fn update_coordinate(&mut self, index: usize, latitude: f64, longitude: f64) {
        if let Some(stop) = self.stops.get_mut(index) {
            stop.latitude = Some(latitude);
            stop.longitude = Some(longitude);
        }
    }

    /// Renames the stop at `index`. A name that is empty after trimming is
    /// rejected as a no-op; the stored name is the trimmed text.
    pub fn rename(&mut self, index: usize, name: &str) {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return;
        }
        if let Some(stop) = self.stops.get_mut(index) {
            stop.name = trimmed.to_owned();
        }
    }

    /// Removes the stop at `index`, shifting subsequent stops down by one.
    pub fn remove(&mut self, index: usize) {
        if index < self.stops.len() {
            self.stops.remove(index);
        }
    }

    /// Coordinates of routable stops, in list order: the render path of the
    /// itinerary polyline.
    #[must_use]
    pub fn polyline_coordinates(&self) -> Vec<(f64, f64)> {
        self.stops.iter().filter_map(Stop::coordinate).collect()
    }

    /// Routable stops in list order, as used by the deep-link builder.
    pub fn qualifying(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter().filter(|s| s.is_routable())
    }

    /// Ordered save payload covering every stop, coordinate-less ones
    /// included.
    #[must_use]
    pub fn to_persistable(&self) -> Vec<PersistedStop> {
        self.stops
            .iter()
            .map(|s| PersistedStop {
                name: s.name.clone(),
                latitude: s.latitude,
                longitude: s.longitude,
                description: s.description.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn list_of(coords: &[Option<(f64, f64)>]) -> StopList {
        let mut list = StopList::new();
        for (i, c) in coords.iter().enumerate() {
            list.stops.push(Stop {
                id: StopId::generate(),
                name: format!("S{i}"),
                latitude: c.map(|(lat, _)| lat),
                longitude: c.map(|(_, lng)| lng),
                description: String::new(),
            });
        }
        list
    }

    #[test]
    fn append_generates_sequential_default_names() {
        let mut list = StopList::new();
        for i in 0..5 {
            list.append(7.0 + f64::from(i), 80.0);
        }
        assert_eq!(list.len(), 5);
        for (i, stop) in list.iter().enumerate() {
            assert_eq!(stop.name, format!("Arrêt {}", i + 1));
            assert_eq!(stop.description, "");
            assert!(stop.is_routable());
        }
    }

    #[test]
    fn remove_shifts_subsequent_stops_down() {
        let mut list = StopList::new();
        list.append(1.0, 1.0);
        list.append(2.0, 2.0);
        list.append(3.0, 3.0);
        let last_id = list.get(2).unwrap().id;

        list.remove(1);

        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0).unwrap().latitude, Some(1.0));
        assert_eq!(list.get(1).unwrap().latitude, Some(3.0));
        assert_eq!(list.index_of(last_id), Some(1));
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut list = StopList::new();
        list.append(1.0, 1.0);
        list.remove(5);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn rename_rejects_blank_names() {
        let mut list = StopList::new();
        list.append(1.0, 1.0);
        let before = list.clone();

        list.rename(0, "");
        assert_eq!(list, before);

        list.rename(0, "   ");
        assert_eq!(list, before);
    }

    #[test]
    fn rename_stores_trimmed_name() {
        let mut list = StopList::new();
        list.append(1.0, 1.0);
        list.rename(0, "  Kandy  ");
        assert_eq!(list.get(0).unwrap().name, "Kandy");
    }

    #[test]
    fn update_coordinate_out_of_range_is_noop() {
        let mut list = StopList::new();
        list.append(1.0, 1.0);
        let before = list.clone();
        list.update_coordinate(3, 9.0, 9.0);
        assert_eq!(list, before);
    }

    #[test]
    fn update_coordinate_fills_in_missing_coordinates() {
        let mut list = list_of(&[None]);
        list.update_coordinate(0, 6.9, 79.8);
        assert_eq!(list.get(0).unwrap().coordinate(), Some((6.9, 79.8)));
    }

    #[test]
    fn polyline_skips_coordinate_less_stops_in_order() {
        let list = list_of(&[Some((7.0, 80.0)), None, Some((8.0, 81.0))]);
        assert_eq!(
            list.polyline_coordinates(),
            vec![(7.0, 80.0), (8.0, 81.0)]
        );
    }

    #[test]
    fn to_persistable_is_idempotent_and_keeps_coordinate_less_stops() {
        let mut list = list_of(&[Some((7.0, 80.0)), None]);
        list.rename(1, "Sans carte");

        let first = list.to_persistable();
        let second = list.to_persistable();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].name, "Sans carte");
        assert_eq!(first[1].latitude, None);
    }

    #[test]
    fn custom_record_flat_fields_win_over_nested_pair() {
        let stop: Stop = CustomStopRecord {
            name: "Ella".into(),
            latitude: Some(6.87),
            longitude: Some(81.05),
            coordinates: Some(CoordinatePair { lat: 0.0, lng: 0.0 }),
            description: None,
        }
        .into();
        assert_eq!(stop.coordinate(), Some((6.87, 81.05)));
        assert_eq!(stop.description, "");
    }

    #[test]
    fn nested_pair_round_trips_to_flat_persistable() {
        let list = StopList::from_custom_records(vec![CustomStopRecord {
            name: "Galle".into(),
            latitude: None,
            longitude: None,
            coordinates: Some(CoordinatePair {
                lat: 6.0329,
                lng: 80.2168,
            }),
            description: Some("Fort".into()),
        }]);

        let persisted = list.to_persistable();
        assert_eq!(persisted[0].latitude, Some(6.0329));
        assert_eq!(persisted[0].longitude, Some(80.2168));
        assert_eq!(persisted[0].description, "Fort");
    }

    #[test]
    fn template_records_normalize_nested_coordinates() {
        let list = StopList::from_template_records(vec![TemplateStopRecord {
            name: "Sigiriya".into(),
            coordinates: Some(CoordinatePair {
                lat: 7.957,
                lng: 80.76,
            }),
            description: None,
        }]);
        assert_eq!(list.get(0).unwrap().coordinate(), Some((7.957, 80.76)));
    }

    #[test]
    fn custom_record_deserializes_both_wire_shapes() {
        let flat: CustomStopRecord =
            serde_json::from_str(r#"{"name":"A","latitude":7.0,"longitude":80.0}"#).unwrap();
        let nested: CustomStopRecord =
            serde_json::from_str(r#"{"name":"B","coordinates":{"lat":7.0,"lng":80.0}}"#).unwrap();

        assert_eq!(Stop::from(flat).coordinate(), Some((7.0, 80.0)));
        assert_eq!(Stop::from(nested).coordinate(), Some((7.0, 80.0)));
    }

    proptest! {
        #[test]
        fn append_count_matches_length_and_names(count in 0usize..40) {
            let mut list = StopList::new();
            for _ in 0..count {
                list.append(1.0, 2.0);
            }
            prop_assert_eq!(list.len(), count);
            for (i, stop) in list.iter().enumerate() {
                prop_assert_eq!(&stop.name, &format!("Arrêt {}", i + 1));
            }
        }

        #[test]
        fn remove_never_keeps_the_removed_stop(
            count in 1usize..20,
            index in 0usize..20,
        ) {
            let mut list = StopList::new();
            for i in 0..count {
                list.append(i as f64, i as f64);
            }
            let removed_id = list.get(index % count).map(|s| s.id);
            list.remove(index % count);

            prop_assert_eq!(list.len(), count - 1);
            if let Some(id) = removed_id {
                prop_assert_eq!(list.index_of(id), None);
            }
        }
    }
}
