use serde::{Deserialize, Serialize};

use crate::api::{
    ApiError, AuthResponse, BudgetItem, Destination, ProfileResponse, RoadTripTemplate,
    SuggestionGroup, TripEnvelope, UserSummary,
};
use crate::deeplink::MapsTarget;
use crate::model::Screen;
use crate::stops::StopId;

/// Everything that can happen to the app, from the shell or from a resolved
/// effect. `*Response` variants are produced by capability callbacks, never by
/// the shell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Lifecycle
    AppStarted,
    TokenLoaded(Option<String>),
    DarkModeLoaded(Option<bool>),
    LanguageLoaded(Option<String>),
    Navigate(Screen),

    // Auth
    LoginSubmitted {
        email: String,
        password: String,
    },
    RegisterSubmitted {
        name: String,
        email: String,
        password: String,
    },
    AuthResponse(Result<AuthResponse, ApiError>),
    LogoutRequested,

    // Home & budget
    HomeOpened,
    UserFetched(Result<UserSummary, ApiError>),
    LatestTripFetched(Result<TripEnvelope, ApiError>),
    RoadTripFetched(Result<RoadTripTemplate, ApiError>),
    SuggestedItemsFetched(Result<Vec<SuggestionGroup>, ApiError>),
    ItemsSeeded(Result<(), ApiError>),
    BudgetItemAdded,
    BudgetItemChanged {
        index: usize,
        item: BudgetItem,
    },
    BudgetItemRemoved {
        index: usize,
    },
    BudgetSaveRequested,
    BudgetSaved(Result<(), ApiError>),

    // Planner
    PlannerOpened,
    DestinationsFetched(Result<Vec<Destination>, ApiError>),
    PlannerDestinationChanged(String),
    RoadTripsFetched(Result<Vec<RoadTripTemplate>, ApiError>),
    PlannerDaysChanged(String),
    PlannerPeopleChanged(String),
    PlannerRentCarToggled,
    PlannerRoadTripSelected(Option<String>),
    PlanSubmitted,
    PlanSaved(Result<(), ApiError>),

    // Profile
    ProfileOpened,
    ProfileFetched(Result<ProfileResponse, ApiError>),
    ProfileNameChanged(String),
    ProfileEmailChanged(String),
    ProfileSaveRequested,
    ProfileSaved(Result<(), ApiError>),
    OldPasswordChanged(String),
    NewPasswordChanged(String),
    PasswordChangeRequested,
    PasswordChanged(Result<(), ApiError>),
    StoryEditStarted {
        trip_id: String,
    },
    StoryDraftChanged(String),
    StorySaveRequested,
    StoryDeleteRequested {
        trip_id: String,
    },
    StorySaved(Result<(), ApiError>),
    TripDeleteRequested {
        trip_id: String,
    },
    TripDeleted(Result<(), ApiError>),

    // Stop editor
    EditorOpened,
    EditorTripFetched(Result<TripEnvelope, ApiError>),
    StopTapped(StopId),
    RenameRequested,
    RenameDraftChanged(String),
    RenameConfirmed,
    RenameCancelled,
    StopDeleteRequested,
    MapPressed {
        latitude: f64,
        longitude: f64,
    },
    StopDragged {
        index: usize,
        latitude: f64,
        longitude: f64,
    },
    ZoomIn,
    ZoomOut,
    RecenterRequested,
    ViewportAnimated,
    StopsSaveRequested,
    StopsSaved(Result<(), ApiError>),
    OpenStopInMaps(MapsTarget),
    OpenItineraryInMaps(MapsTarget),
    ExternalUrlDispatched {
        opened: bool,
    },

    // Preferences & alerts
    DarkModeToggled,
    LanguageToggled,
    PreferencePersisted {
        ok: bool,
    },
    AlertDismissed,
}

impl Event {
    /// Stable name for log lines.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Event::AppStarted => "app_started",
            Event::TokenLoaded(_) => "token_loaded",
            Event::DarkModeLoaded(_) => "dark_mode_loaded",
            Event::LanguageLoaded(_) => "language_loaded",
            Event::Navigate(_) => "navigate",
            Event::LoginSubmitted { .. } => "login_submitted",
            Event::RegisterSubmitted { .. } => "register_submitted",
            Event::AuthResponse(_) => "auth_response",
            Event::LogoutRequested => "logout_requested",
            Event::HomeOpened => "home_opened",
            Event::UserFetched(_) => "user_fetched",
            Event::LatestTripFetched(_) => "latest_trip_fetched",
            Event::RoadTripFetched(_) => "road_trip_fetched",
            Event::SuggestedItemsFetched(_) => "suggested_items_fetched",
            Event::ItemsSeeded(_) => "items_seeded",
            Event::BudgetItemAdded => "budget_item_added",
            Event::BudgetItemChanged { .. } => "budget_item_changed",
            Event::BudgetItemRemoved { .. } => "budget_item_removed",
            Event::BudgetSaveRequested => "budget_save_requested",
            Event::BudgetSaved(_) => "budget_saved",
            Event::PlannerOpened => "planner_opened",
            Event::DestinationsFetched(_) => "destinations_fetched",
            Event::PlannerDestinationChanged(_) => "planner_destination_changed",
            Event::RoadTripsFetched(_) => "road_trips_fetched",
            Event::PlannerDaysChanged(_) => "planner_days_changed",
            Event::PlannerPeopleChanged(_) => "planner_people_changed",
            Event::PlannerRentCarToggled => "planner_rent_car_toggled",
            Event::PlannerRoadTripSelected(_) => "planner_road_trip_selected",
            Event::PlanSubmitted => "plan_submitted",
            Event::PlanSaved(_) => "plan_saved",
            Event::ProfileOpened => "profile_opened",
            Event::ProfileFetched(_) => "profile_fetched",
            Event::ProfileNameChanged(_) => "profile_name_changed",
            Event::ProfileEmailChanged(_) => "profile_email_changed",
            Event::ProfileSaveRequested => "profile_save_requested",
            Event::ProfileSaved(_) => "profile_saved",
            Event::OldPasswordChanged(_) => "old_password_changed",
            Event::NewPasswordChanged(_) => "new_password_changed",
            Event::PasswordChangeRequested => "password_change_requested",
            Event::PasswordChanged(_) => "password_changed",
            Event::StoryEditStarted { .. } => "story_edit_started",
            Event::StoryDraftChanged(_) => "story_draft_changed",
            Event::StorySaveRequested => "story_save_requested",
            Event::StoryDeleteRequested { .. } => "story_delete_requested",
            Event::StorySaved(_) => "story_saved",
            Event::TripDeleteRequested { .. } => "trip_delete_requested",
            Event::TripDeleted(_) => "trip_deleted",
            Event::EditorOpened => "editor_opened",
            Event::EditorTripFetched(_) => "editor_trip_fetched",
            Event::StopTapped(_) => "stop_tapped",
            Event::RenameRequested => "rename_requested",
            Event::RenameDraftChanged(_) => "rename_draft_changed",
            Event::RenameConfirmed => "rename_confirmed",
            Event::RenameCancelled => "rename_cancelled",
            Event::StopDeleteRequested => "stop_delete_requested",
            Event::MapPressed { .. } => "map_pressed",
            Event::StopDragged { .. } => "stop_dragged",
            Event::ZoomIn => "zoom_in",
            Event::ZoomOut => "zoom_out",
            Event::RecenterRequested => "recenter_requested",
            Event::ViewportAnimated => "viewport_animated",
            Event::StopsSaveRequested => "stops_save_requested",
            Event::StopsSaved(_) => "stops_saved",
            Event::OpenStopInMaps(_) => "open_stop_in_maps",
            Event::OpenItineraryInMaps(_) => "open_itinerary_in_maps",
            Event::ExternalUrlDispatched { .. } => "external_url_dispatched",
            Event::DarkModeToggled => "dark_mode_toggled",
            Event::LanguageToggled => "language_toggled",
            Event::PreferencePersisted { .. } => "preference_persisted",
            Event::AlertDismissed => "alert_dismissed",
        }
    }
}
