//! Application state: the single source of truth the update loop mutates and
//! the view projects from.
//!
//! The stop editor's interaction state machine lives here as methods on
//! [`StopEditor`], so every gesture rule is testable without the event
//! plumbing.

use serde::{Deserialize, Serialize};

use crate::api::{
    ApiConfig, BudgetItem, Destination, RoadTripTemplate, Trip, UserSummary,
};
use crate::i18n::{self, Label, Language};
use crate::stops::{StopId, StopList};
use crate::{BASE_DELTA, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Login,
    Register,
    Home,
    Planner,
    Profile,
    StopEditor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    #[must_use]
    pub fn error(language: Language, message: impl Into<String>) -> Self {
        Self {
            title: i18n::label(language, Label::Error).to_owned(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn success(language: Language, message: impl Into<String>) -> Self {
        Self {
            title: i18n::label(language, Label::Success).to_owned(),
            message: message.into(),
        }
    }
}

/// Map region the shell should display. `delta` is the span in degrees on
/// both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub latitude: f64,
    pub longitude: f64,
    pub delta: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            latitude: crate::DEFAULT_CENTER_LAT,
            longitude: crate::DEFAULT_CENTER_LNG,
            delta: BASE_DELTA,
        }
    }
}

/// Interaction state of the map screen.
///
/// Three logical states: idle (no selection), selected (a stop's callout
/// actions are available) and renaming (selected with the rename panel open).
/// Selection is held by stop id and resolved to an index only when needed, so
/// removals can never redirect it to a neighbouring stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopEditor {
    pub stops: StopList,
    pub selection: Option<StopId>,
    pub rename_panel_open: bool,
    pub rename_draft: String,
    pub zoom: f64,
    pub viewport: Viewport,
    /// One-shot flag telling the shell to animate the next viewport change.
    pub animate_viewport: bool,
    pub loading: bool,
    pub saving: bool,
}

impl Default for StopEditor {
    fn default() -> Self {
        Self {
            stops: StopList::new(),
            selection: None,
            rename_panel_open: false,
            rename_draft: String::new(),
            zoom: DEFAULT_ZOOM,
            viewport: Viewport::default(),
            animate_viewport: false,
            loading: false,
            saving: false,
        }
    }
}

impl StopEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_with(&mut self, stops: StopList) {
        *self = Self::new();
        self.stops = stops;
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selection.and_then(|id| self.stops.index_of(id))
    }

    fn clear_selection(&mut self) {
        self.selection = None;
        self.rename_panel_open = false;
        self.rename_draft.clear();
    }

    /// Marker or callout tap.
    pub fn tap_stop(&mut self, id: StopId) {
        if self.stops.index_of(id).is_some() {
            self.selection = Some(id);
            self.rename_panel_open = false;
            self.rename_draft.clear();
        }
    }

    /// "Rename" action on the selected stop; prefills the draft.
    pub fn begin_rename(&mut self) {
        if let Some(index) = self.selected_index() {
            if let Some(stop) = self.stops.get(index) {
                self.rename_draft = stop.name.clone();
                self.rename_panel_open = true;
            }
        }
    }

    pub fn set_rename_draft(&mut self, draft: String) {
        if self.rename_panel_open {
            self.rename_draft = draft;
        }
    }

    /// Applies the draft when it trims non-empty, then drops back to idle.
    /// An empty draft leaves the panel open and the list untouched.
    pub fn confirm_rename(&mut self) {
        if !self.rename_panel_open || self.rename_draft.trim().is_empty() {
            return;
        }
        if let Some(index) = self.selected_index() {
            let draft = std::mem::take(&mut self.rename_draft);
            self.stops.rename(index, &draft);
        }
        self.clear_selection();
    }

    /// Closes the panel, keeps the selection, discards the draft.
    pub fn cancel_rename(&mut self) {
        self.rename_panel_open = false;
        self.rename_draft.clear();
    }

    pub fn delete_selected(&mut self) {
        if let Some(index) = self.selected_index() {
            self.stops.remove(index);
        }
        self.clear_selection();
    }

    /// Background tap: appends a stop at the tapped coordinate. The new stop
    /// is not auto-selected.
    pub fn tap_map(&mut self, latitude: f64, longitude: f64) {
        self.stops.append(latitude, longitude);
        self.clear_selection();
    }

    /// Drag end moves the stop; selection survives, it is not structural.
    pub fn drag_stop(&mut self, index: usize, latitude: f64, longitude: f64) {
        self.stops.update_coordinate(index, latitude, longitude);
    }

    /// Whole-step zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`; the viewport span
    /// follows as `3 / zoom`.
    pub fn zoom_step(&mut self, step: f64) {
        let mut next = self.zoom + step;
        if next < MIN_ZOOM {
            next = MIN_ZOOM;
        }
        if next > MAX_ZOOM {
            next = MAX_ZOOM;
        }
        self.zoom = next;
        self.viewport.delta = BASE_DELTA / next;
    }

    /// Snaps the viewport onto the first routable stop without animation,
    /// used right after a trip loads. No routable stop, no movement.
    pub fn center_on_first_stop(&mut self) {
        if let Some((lat, lng)) = self.stops.first_coordinate() {
            self.viewport.latitude = lat;
            self.viewport.longitude = lng;
        }
    }

    /// Centers on the first routable stop at the current zoom, animated.
    /// No routable stop, no movement.
    pub fn recenter(&mut self) {
        if let Some((lat, lng)) = self.stops.first_coordinate() {
            self.viewport = Viewport {
                latitude: lat,
                longitude: lng,
                delta: BASE_DELTA / self.zoom,
            };
            self.animate_viewport = true;
        }
    }
}

/// Trip-planning form state. Day and people counts stay as raw shell input
/// until submission validates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerForm {
    pub destination: String,
    pub days: String,
    pub people: String,
    pub rent_car: bool,
    pub selected_road_trip: Option<String>,
    pub submitting: bool,
}

impl PlannerForm {
    /// Required fields, matching the submit guard of the form.
    #[must_use]
    pub fn validate(&self) -> Option<(u32, u32)> {
        if self.destination.is_empty() {
            return None;
        }
        let days = self.days.trim().parse().ok().filter(|d| *d > 0)?;
        let people = self.people.trim().parse().ok().filter(|p| *p > 0)?;
        Some((days, people))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileState {
    pub user: UserSummary,
    pub trips: Vec<Trip>,
    pub edit_name: String,
    pub edit_email: String,
    pub old_password: String,
    pub new_password: String,
    /// Trip whose story is being edited, with the draft text.
    pub editing_trip: Option<String>,
    pub story_draft: String,
    pub loading: bool,
}

#[derive(Debug, Default)]
pub struct Model {
    pub api: ApiConfig,
    pub screen: Screen,
    pub token: Option<String>,
    pub dark_mode: bool,
    pub language: Language,
    pub loading: bool,
    pub alert: Option<Alert>,
    /// URL the shell must hand to the OS; cleared once dispatched.
    pub pending_external_url: Option<String>,

    pub user: Option<UserSummary>,
    pub trip: Option<Trip>,
    pub items: Vec<BudgetItem>,
    pub road_trip: Option<RoadTripTemplate>,

    pub destinations: Vec<Destination>,
    pub road_trips: Vec<RoadTripTemplate>,
    pub planner: PlannerForm,

    pub profile: ProfileState,
    pub editor: StopEditor,
}

impl Model {
    #[must_use]
    pub fn budget_total(&self) -> f64 {
        self.items.iter().map(BudgetItem::line_total).sum()
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.alert = Some(Alert::error(self.language, message));
    }

    pub fn show_success(&mut self, message: impl Into<String>) {
        self.alert = Some(Alert::success(self.language, message));
    }

    /// Tears the session down and routes back to the login screen.
    pub fn clear_session(&mut self) {
        self.token = None;
        self.user = None;
        self.trip = None;
        self.items.clear();
        self.road_trip = None;
        self.profile = ProfileState::default();
        self.screen = Screen::Login;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_with_stops(n: usize) -> StopEditor {
        let mut editor = StopEditor::new();
        for i in 0..n {
            editor.stops.append(7.0 + i as f64, 80.0 + i as f64);
        }
        editor
    }

    #[test]
    fn tap_stop_selects_and_closes_panel() {
        let mut editor = editor_with_stops(2);
        let id = editor.stops.get(1).unwrap().id;
        editor.rename_panel_open = true;
        editor.rename_draft = "leftover".into();

        editor.tap_stop(id);

        assert_eq!(editor.selection, Some(id));
        assert_eq!(editor.selected_index(), Some(1));
        assert!(!editor.rename_panel_open);
        assert!(editor.rename_draft.is_empty());
    }

    #[test]
    fn begin_rename_prefills_draft_with_current_name() {
        let mut editor = editor_with_stops(1);
        editor.tap_stop(editor.stops.get(0).unwrap().id);
        editor.begin_rename();

        assert!(editor.rename_panel_open);
        assert_eq!(editor.rename_draft, "Arrêt 1");
    }

    #[test]
    fn confirm_rename_applies_and_returns_to_idle() {
        let mut editor = editor_with_stops(1);
        editor.tap_stop(editor.stops.get(0).unwrap().id);
        editor.begin_rename();
        editor.set_rename_draft("  Kandy ".into());
        editor.confirm_rename();

        assert_eq!(editor.stops.get(0).unwrap().name, "Kandy");
        assert_eq!(editor.selection, None);
        assert!(!editor.rename_panel_open);
        assert!(editor.rename_draft.is_empty());
    }

    #[test]
    fn confirm_rename_with_blank_draft_keeps_panel_open() {
        let mut editor = editor_with_stops(1);
        let id = editor.stops.get(0).unwrap().id;
        editor.tap_stop(id);
        editor.begin_rename();
        editor.set_rename_draft("   ".into());
        editor.confirm_rename();

        assert_eq!(editor.stops.get(0).unwrap().name, "Arrêt 1");
        assert_eq!(editor.selection, Some(id));
        assert!(editor.rename_panel_open);
    }

    #[test]
    fn cancel_rename_keeps_selection_and_drops_draft() {
        let mut editor = editor_with_stops(1);
        let id = editor.stops.get(0).unwrap().id;
        editor.tap_stop(id);
        editor.begin_rename();
        editor.set_rename_draft("abandoned".into());
        editor.cancel_rename();

        assert_eq!(editor.selection, Some(id));
        assert!(!editor.rename_panel_open);
        assert!(editor.rename_draft.is_empty());
        assert_eq!(editor.stops.get(0).unwrap().name, "Arrêt 1");
    }

    #[test]
    fn delete_selected_removes_and_clears_selection() {
        let mut editor = editor_with_stops(3);
        let id = editor.stops.get(1).unwrap().id;
        editor.tap_stop(id);
        editor.delete_selected();

        assert_eq!(editor.stops.len(), 2);
        assert_eq!(editor.selection, None);
        assert_eq!(editor.stops.index_of(id), None);
    }

    #[test]
    fn selection_survives_removal_of_an_earlier_stop() {
        let mut editor = editor_with_stops(3);
        let id = editor.stops.get(2).unwrap().id;
        editor.selection = Some(id);

        editor.stops.remove(0);

        assert_eq!(editor.selected_index(), Some(1));
        assert_eq!(editor.stops.get(1).unwrap().id, id);
    }

    #[test]
    fn tap_map_appends_without_selecting() {
        let mut editor = editor_with_stops(1);
        editor.tap_stop(editor.stops.get(0).unwrap().id);
        editor.tap_map(6.9, 79.8);

        assert_eq!(editor.stops.len(), 2);
        assert_eq!(editor.stops.get(1).unwrap().name, "Arrêt 2");
        assert_eq!(editor.selection, None);
    }

    #[test]
    fn drag_preserves_selection() {
        let mut editor = editor_with_stops(2);
        let id = editor.stops.get(0).unwrap().id;
        editor.tap_stop(id);
        editor.drag_stop(0, 5.5, 81.1);

        assert_eq!(editor.selection, Some(id));
        assert_eq!(editor.stops.get(0).unwrap().coordinate(), Some((5.5, 81.1)));
    }

    #[test]
    fn zoom_clamps_at_both_ends() {
        let mut editor = StopEditor::new();
        assert_eq!(editor.zoom, 3.0);

        for _ in 0..20 {
            editor.zoom_step(1.0);
        }
        assert_eq!(editor.zoom, 10.0);
        assert_eq!(editor.viewport.delta, 0.3);

        for _ in 0..20 {
            editor.zoom_step(-1.0);
        }
        assert_eq!(editor.zoom, 1.5);
        assert_eq!(editor.viewport.delta, 2.0);
    }

    #[test]
    fn zoom_never_drops_below_minimum() {
        let mut editor = StopEditor::new();
        editor.zoom = 1.5;
        editor.zoom_step(-1.0);
        assert_eq!(editor.zoom, 1.5);
    }

    #[test]
    fn recenter_targets_first_routable_stop() {
        let mut editor = StopEditor::new();
        editor.stops = StopList::from_custom_records(vec![
            crate::stops::CustomStopRecord {
                name: "no map".into(),
                latitude: None,
                longitude: None,
                coordinates: None,
                description: None,
            },
            crate::stops::CustomStopRecord {
                name: "Kandy".into(),
                latitude: Some(7.2906),
                longitude: Some(80.6337),
                coordinates: None,
                description: None,
            },
        ]);
        editor.zoom = 6.0;
        editor.recenter();

        assert_eq!(editor.viewport.latitude, 7.2906);
        assert_eq!(editor.viewport.longitude, 80.6337);
        assert_eq!(editor.viewport.delta, 0.5);
        assert!(editor.animate_viewport);
    }

    #[test]
    fn center_on_first_stop_moves_viewport_without_animating() {
        let mut editor = StopEditor::new();
        editor.stops = StopList::from_custom_records(vec![crate::stops::CustomStopRecord {
            name: "Galle".into(),
            latitude: Some(6.0329),
            longitude: Some(80.2168),
            coordinates: None,
            description: None,
        }]);
        editor.center_on_first_stop();

        assert_eq!(editor.viewport.latitude, 6.0329);
        assert_eq!(editor.viewport.longitude, 80.2168);
        assert_eq!(editor.viewport.delta, BASE_DELTA / DEFAULT_ZOOM);
        assert!(!editor.animate_viewport);
    }

    #[test]
    fn center_on_first_stop_without_coordinates_is_a_no_op() {
        let mut editor = StopEditor::new();
        let before = editor.viewport;
        editor.center_on_first_stop();
        assert_eq!(editor.viewport, before);
    }

    #[test]
    fn recenter_with_no_routable_stop_leaves_viewport_alone() {
        let mut editor = StopEditor::new();
        let before = editor.viewport;
        editor.recenter();
        assert_eq!(editor.viewport, before);
        assert!(!editor.animate_viewport);
    }

    #[test]
    fn planner_validation_requires_all_fields() {
        let mut form = PlannerForm::default();
        assert_eq!(form.validate(), None);

        form.destination = "Sri Lanka".into();
        form.days = "7".into();
        assert_eq!(form.validate(), None);

        form.people = "2".into();
        assert_eq!(form.validate(), Some((7, 2)));

        form.days = "zero".into();
        assert_eq!(form.validate(), None);
    }

    #[test]
    fn budget_total_sums_quantity_times_price() {
        let mut model = Model::default();
        model.items = vec![
            BudgetItem {
                name: "Tente".into(),
                quantity: 2,
                price: 45.0,
            },
            BudgetItem {
                name: "Gourde".into(),
                quantity: 3,
                price: 8.5,
            },
        ];
        assert_eq!(model.budget_total(), 115.5);
    }

    #[test]
    fn clear_session_routes_to_login() {
        let mut model = Model {
            token: Some("tok".into()),
            screen: Screen::Home,
            ..Model::default()
        };
        model.user = Some(UserSummary::default());
        model.clear_session();

        assert_eq!(model.token, None);
        assert_eq!(model.screen, Screen::Login);
        assert!(model.user.is_none());
    }
}
