//! Wire types and response decoding for the trip-planning backend.
//!
//! Every request body and response payload the core exchanges with the server
//! lives here, together with the error taxonomy. HTTP responses are decoded
//! eagerly in the capability callback so that events carry plain
//! `Result<T, ApiError>` values the update loop can match on.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stops::{CustomStopRecord, PersistedStop, TemplateStopRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Trailing slashes are stripped so paths can always start with `/`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Appends `segment` to `path` as a single percent-encoded path segment,
    /// so a destination like `"Sri Lanka #sud"` cannot truncate the path.
    #[must_use]
    pub fn endpoint_with_segment(&self, path: &str, segment: &str) -> String {
        format!("{}{path}/{}", self.base_url, encode_path_segment(segment))
    }

    #[must_use]
    pub fn endpoint_with_query(&self, path: &str, key: &str, value: &str) -> String {
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair(key, value)
            .finish();
        format!("{}{path}?{query}", self.base_url)
    }
}

/// Query-style encoding with spaces as `%20` rather than `+`, which is what
/// path segments need.
fn encode_path_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new("http://localhost:5000/api")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ApiError {
    /// Non-2xx response; `message` is the server's own wording when the body
    /// carried one.
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("network failure: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Expired or missing credentials; the session is torn down on this.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Server { status: 401, .. })
    }
}

// --- Request bodies ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTripRequest {
    pub destination: String,
    pub days: u32,
    pub people: u32,
    pub rent_car: bool,
    pub road_trip_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBudgetRequest {
    pub items: Vec<BudgetItem>,
    pub total_budget: f64,
}

/// Seeding suggested items does not touch the budget total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedItemsRequest {
    pub items: Vec<BudgetItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveStopsRequest {
    pub stops: Vec<PersistedStop>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRequest {
    pub trip_id: String,
    pub story: String,
}

// --- Response payloads ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// Error envelope the server uses for non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub user: UserSummary,
    #[serde(default)]
    pub trips: Vec<Trip>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripEnvelope {
    #[serde(default)]
    pub trip: Option<Trip>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub destination: String,
    #[serde(default)]
    pub days: u32,
    #[serde(default)]
    pub people: u32,
    #[serde(default)]
    pub items: Vec<BudgetItem>,
    #[serde(default)]
    pub custom_stops: Vec<CustomStopRecord>,
    #[serde(default)]
    pub road_trip_id: Option<RoadTripRef>,
    #[serde(default)]
    pub total_budget: Option<f64>,
    #[serde(default)]
    pub story: Option<String>,
}

/// `roadTripId` arrives either populated (the server joined the template in)
/// or as the bare template id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoadTripRef {
    Populated(RoadTripTemplate),
    Id(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadTripTemplate {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stops: Vec<TemplateStopRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

impl BudgetItem {
    #[must_use]
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }
}

/// Suggested packing item for a destination. Quantity is either absolute or
/// per person; absent both, one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedItem {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub quantity_per_person: Option<u32>,
}

impl SuggestedItem {
    #[must_use]
    pub fn resolved_quantity(&self, people: u32) -> u32 {
        self.quantity
            .or_else(|| self.quantity_per_person.map(|q| q * people))
            .unwrap_or(1)
    }

    /// Seeded rows start unpriced.
    #[must_use]
    pub fn into_budget_item(self, people: u32) -> BudgetItem {
        let quantity = self.resolved_quantity(people);
        BudgetItem {
            name: self.name,
            quantity,
            price: 0.0,
        }
    }
}

/// `GET /items/{destination}` returns a list of suggestion groups; only the
/// first group's items are used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionGroup {
    #[serde(default)]
    pub items: Vec<SuggestedItem>,
}

// --- Response decoding ---

fn body_or_default(response: &mut crux_http::Response<String>) -> String {
    response.take_body().unwrap_or_default()
}

fn server_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ApiMessage>(body)
        .map(|m| m.message)
        .unwrap_or_else(|_| format!("HTTP {status}"));
    ApiError::Server { status, message }
}

/// Turns a raw HTTP outcome into the typed payload or an [`ApiError`].
pub fn decode<T: DeserializeOwned>(
    result: crux_http::Result<crux_http::Response<String>>,
) -> Result<T, ApiError> {
    let mut response = result.map_err(|e| ApiError::Network(e.to_string()))?;
    let status = u16::from(response.status());
    let body = body_or_default(&mut response);
    if !response.status().is_success() {
        return Err(server_error(status, &body));
    }
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Like [`decode`] but discards the success body.
pub fn decode_unit(
    result: crux_http::Result<crux_http::Response<String>>,
) -> Result<(), ApiError> {
    let mut response = result.map_err(|e| ApiError::Network(e.to_string()))?;
    let status = u16::from(response.status());
    let body = body_or_default(&mut response);
    if !response.status().is_success() {
        return Err(server_error(status, &body));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_strips_trailing_slashes() {
        let config = ApiConfig::new("https://api.example.com/");
        assert_eq!(
            config.endpoint("/trips/latest"),
            "https://api.example.com/trips/latest"
        );
    }

    #[test]
    fn endpoint_with_segment_percent_encodes_path_delimiters() {
        let config = ApiConfig::new("https://api.example.com");
        assert_eq!(
            config.endpoint_with_segment("/items", "Sri Lanka #sud"),
            "https://api.example.com/items/Sri%20Lanka%20%23sud"
        );
        assert_eq!(
            config.endpoint_with_segment("/items", "Pérou?"),
            "https://api.example.com/items/P%C3%A9rou%3F"
        );
    }

    #[test]
    fn endpoint_with_query_percent_encodes_the_value() {
        let config = ApiConfig::new("https://api.example.com");
        assert_eq!(
            config.endpoint_with_query("/roadtrips", "destination", "Sri Lanka"),
            "https://api.example.com/roadtrips?destination=Sri+Lanka"
        );
    }

    #[test]
    fn road_trip_ref_parses_both_shapes() {
        let bare: RoadTripRef = serde_json::from_str(r#""64ab01""#).unwrap();
        assert_eq!(bare, RoadTripRef::Id("64ab01".into()));

        let populated: RoadTripRef = serde_json::from_str(
            r#"{"_id":"64ab01","name":"Côte sud","stops":[{"name":"Galle"}]}"#,
        )
        .unwrap();
        match populated {
            RoadTripRef::Populated(template) => {
                assert_eq!(template.name, "Côte sud");
                assert_eq!(template.stops.len(), 1);
            }
            RoadTripRef::Id(_) => panic!("expected populated template"),
        }
    }

    #[test]
    fn trip_tolerates_missing_optional_fields() {
        let trip: Trip = serde_json::from_str(r#"{"destination":"Sri Lanka"}"#).unwrap();
        assert_eq!(trip.destination, "Sri Lanka");
        assert!(trip.items.is_empty());
        assert!(trip.custom_stops.is_empty());
        assert!(trip.road_trip_id.is_none());
    }

    #[test]
    fn suggested_quantity_prefers_absolute_over_per_person() {
        let item = SuggestedItem {
            name: "Tente".into(),
            quantity: Some(2),
            quantity_per_person: Some(1),
        };
        assert_eq!(item.resolved_quantity(4), 2);

        let per_person = SuggestedItem {
            name: "Gourde".into(),
            quantity: None,
            quantity_per_person: Some(1),
        };
        assert_eq!(per_person.resolved_quantity(4), 4);

        let bare = SuggestedItem {
            name: "Carte".into(),
            quantity: None,
            quantity_per_person: None,
        };
        assert_eq!(bare.resolved_quantity(4), 1);
    }

    #[test]
    fn seeded_budget_items_are_unpriced() {
        let item = SuggestedItem {
            name: "Gourde".into(),
            quantity: None,
            quantity_per_person: Some(2),
        };
        let budget = item.into_budget_item(3);
        assert_eq!(budget.quantity, 6);
        assert_eq!(budget.price, 0.0);
        assert_eq!(budget.line_total(), 0.0);
    }

    #[test]
    fn plan_request_serializes_camel_case() {
        let body = serde_json::to_value(PlanTripRequest {
            destination: "Sri Lanka".into(),
            days: 7,
            people: 2,
            rent_car: true,
            road_trip_id: None,
        })
        .unwrap();
        assert_eq!(body["rentCar"], true);
        assert_eq!(body["roadTripId"], serde_json::Value::Null);
    }

    #[test]
    fn server_error_prefers_the_body_message() {
        let err = server_error(401, r#"{"message":"Token invalide"}"#);
        assert_eq!(
            err,
            ApiError::Server {
                status: 401,
                message: "Token invalide".into()
            }
        );
        assert!(err.is_unauthorized());

        let fallback = server_error(500, "<html>oops</html>");
        assert_eq!(
            fallback,
            ApiError::Server {
                status: 500,
                message: "HTTP 500".into()
            }
        );
    }
}
