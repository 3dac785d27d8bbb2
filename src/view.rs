//! Serializable projection of the model handed to the shell on every render.
//!
//! The view model is self-contained: labels are already localized and marker
//! indices already resolved, so the shell draws without consulting any other
//! state.

use serde::{Deserialize, Serialize};

use crate::api::BudgetItem;
use crate::i18n::{self, Label};
use crate::model::{Alert, Model, Screen, Viewport};
use crate::stops::StopId;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub screen: Screen,
    pub dark_mode: bool,
    pub language: String,
    pub loading: bool,
    pub alert: Option<Alert>,
    /// URL the shell must open externally, then acknowledge.
    pub pending_external_url: Option<String>,
    pub home: HomeView,
    pub planner: PlannerView,
    pub profile: ProfileView,
    pub editor: EditorView,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HomeView {
    pub greeting: Option<String>,
    pub trip_headline: Option<String>,
    pub trip_subtitle: Option<String>,
    pub road_trip_name: Option<String>,
    pub items: Vec<BudgetItemView>,
    pub budget_total: f64,
    /// Gates the "customize road trip" action.
    pub has_steps: bool,
    pub no_trip_message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetItemView {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    pub line_total: f64,
}

impl From<&BudgetItem> for BudgetItemView {
    fn from(item: &BudgetItem) -> Self {
        Self {
            name: item.name.clone(),
            quantity: item.quantity,
            price: item.price,
            line_total: item.line_total(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerView {
    pub destinations: Vec<String>,
    pub road_trips: Vec<RoadTripOption>,
    pub destination: String,
    pub days: String,
    pub people: String,
    pub rent_car: bool,
    pub selected_road_trip: Option<String>,
    pub submitting: bool,
    pub can_submit: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadTripOption {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub trips: Vec<ProfileTripView>,
    pub loading: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileTripView {
    pub id: String,
    pub destination: String,
    pub story: Option<String>,
    pub editing: bool,
    pub story_draft: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorView {
    pub markers: Vec<MarkerView>,
    pub polyline: Vec<Coordinate>,
    pub viewport: Option<Viewport>,
    pub animate_viewport: bool,
    pub zoom: f64,
    pub selected_stop: Option<SelectedStopView>,
    pub rename_panel_open: bool,
    pub rename_draft: String,
    pub loading: bool,
    pub saving: bool,
    /// Set when there is nothing to draw.
    pub empty_message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerView {
    pub id: StopId,
    pub index: usize,
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub selected: bool,
}

#[derive(Clone, Debug, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

pub fn view(model: &Model) -> ViewModel {
    ViewModel {
        screen: model.screen,
        dark_mode: model.dark_mode,
        language: model.language.code().to_owned(),
        loading: model.loading,
        alert: model.alert.clone(),
        pending_external_url: model.pending_external_url.clone(),
        home: home_view(model),
        planner: planner_view(model),
        profile: profile_view(model),
        editor: editor_view(model),
    }
}

fn home_view(model: &Model) -> HomeView {
    let language = model.language;
    HomeView {
        greeting: model
            .user
            .as_ref()
            .map(|u| i18n::welcome(language, &u.name)),
        trip_headline: model
            .trip
            .as_ref()
            .map(|t| i18n::last_trip(language, &t.destination)),
        trip_subtitle: model
            .trip
            .as_ref()
            .map(|t| i18n::for_people_days(language, t.people, t.days)),
        road_trip_name: model.road_trip.as_ref().map(|rt| rt.name.clone()),
        items: model.items.iter().map(BudgetItemView::from).collect(),
        budget_total: model.budget_total(),
        has_steps: model
            .trip
            .as_ref()
            .is_some_and(|t| !t.custom_stops.is_empty())
            || model.road_trip.as_ref().is_some_and(|rt| !rt.stops.is_empty()),
        no_trip_message: i18n::label(language, Label::NoTrip).to_owned(),
    }
}

fn planner_view(model: &Model) -> PlannerView {
    PlannerView {
        destinations: model.destinations.iter().map(|d| d.name.clone()).collect(),
        road_trips: model
            .road_trips
            .iter()
            .map(|rt| RoadTripOption {
                id: rt.id.clone(),
                name: rt.name.clone(),
                description: rt.description.clone(),
            })
            .collect(),
        destination: model.planner.destination.clone(),
        days: model.planner.days.clone(),
        people: model.planner.people.clone(),
        rent_car: model.planner.rent_car,
        selected_road_trip: model.planner.selected_road_trip.clone(),
        submitting: model.planner.submitting,
        can_submit: model.planner.validate().is_some(),
    }
}

fn profile_view(model: &Model) -> ProfileView {
    let profile = &model.profile;
    ProfileView {
        name: profile.edit_name.clone(),
        email: profile.edit_email.clone(),
        trips: profile
            .trips
            .iter()
            .map(|trip| {
                let editing = profile.editing_trip.as_deref() == Some(trip.id.as_str());
                ProfileTripView {
                    id: trip.id.clone(),
                    destination: trip.destination.clone(),
                    story: trip.story.clone(),
                    editing,
                    story_draft: if editing {
                        profile.story_draft.clone()
                    } else {
                        String::new()
                    },
                }
            })
            .collect(),
        loading: profile.loading,
    }
}

fn editor_view(model: &Model) -> EditorView {
    let editor = &model.editor;
    let selected = editor.selection;

    let markers = editor
        .stops
        .iter()
        .enumerate()
        .filter(|(_, stop)| stop.is_routable())
        .map(|(index, stop)| {
            let (latitude, longitude) = stop.coordinate().unwrap_or_default();
            MarkerView {
                id: stop.id,
                index,
                name: stop.name.clone(),
                description: stop.description.clone(),
                latitude,
                longitude,
                selected: selected == Some(stop.id),
            }
        })
        .collect::<Vec<_>>();

    let polyline = editor
        .stops
        .polyline_coordinates()
        .into_iter()
        .map(|(latitude, longitude)| Coordinate {
            latitude,
            longitude,
        })
        .collect::<Vec<_>>();

    let empty_message = if markers.is_empty() && !editor.loading {
        Some(i18n::label(model.language, Label::NoStepsToShow).to_owned())
    } else {
        None
    };

    let selected_stop = editor.selected_index().and_then(|index| {
        editor.stops.get(index).map(|stop| SelectedStopView {
            id: stop.id,
            index,
            name: stop.name.clone(),
            routable: stop.is_routable(),
        })
    });

    EditorView {
        markers,
        polyline,
        viewport: Some(editor.viewport),
        animate_viewport: editor.animate_viewport,
        zoom: editor.zoom,
        selected_stop,
        rename_panel_open: editor.rename_panel_open,
        rename_draft: editor.rename_draft.clone(),
        loading: editor.loading,
        saving: editor.saving,
        empty_message,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectedStopView {
    pub id: StopId,
    pub index: usize,
    pub name: String,
    pub routable: bool,
}
