//! The update loop: every event lands here, mutates the model, and schedules
//! effects. No I/O happens inline; HTTP and storage go through capabilities
//! and come back as `*Fetched` / `*Saved` events.

use tracing::{debug, warn};

use crate::api::{
    self, ApiError, ChangePasswordRequest, LoginRequest, PlanTripRequest, RegisterRequest,
    SaveBudgetRequest, SaveStopsRequest, SeedItemsRequest, StoryRequest, UpdateProfileRequest,
};
use crate::capabilities::Capabilities;
use crate::deeplink;
use crate::event::Event;
use crate::i18n::{self, Label, Language};
use crate::model::{Model, Screen};
use crate::stops::StopList;
use crate::view::ViewModel;
use crate::{DARK_MODE_KEY, LANGUAGE_KEY, TOKEN_KEY};

#[derive(Default)]
pub struct App;

impl App {
    fn load_preferences(caps: &Capabilities) {
        caps.kv.get(TOKEN_KEY.to_string(), |result| {
            Event::TokenLoaded(
                result
                    .ok()
                    .flatten()
                    .and_then(|bytes| String::from_utf8(bytes).ok())
                    .filter(|token| !token.is_empty()),
            )
        });
        caps.kv.get(DARK_MODE_KEY.to_string(), |result| {
            Event::DarkModeLoaded(result.ok().flatten().map(|bytes| bytes == b"true".to_vec()))
        });
        caps.kv.get(LANGUAGE_KEY.to_string(), |result| {
            Event::LanguageLoaded(
                result
                    .ok()
                    .flatten()
                    .and_then(|bytes| String::from_utf8(bytes).ok()),
            )
        });
    }

    fn persist(caps: &Capabilities, key: &str, value: Vec<u8>) {
        caps.kv.set(key.to_string(), value, |result| {
            Event::PreferencePersisted {
                ok: result.is_ok(),
            }
        });
    }

    fn fetch_home(model: &mut Model, caps: &Capabilities) {
        model.loading = true;
        Self::send_get(model, caps, "/home", Event::UserFetched);
        Self::send_get(model, caps, "/trips/latest", Event::LatestTripFetched);
    }

    fn fetch_profile(model: &mut Model, caps: &Capabilities) {
        model.profile.loading = true;
        Self::send_get(model, caps, "/user/me", Event::ProfileFetched);
    }

    /// Authenticated GET with the response decoded into `make_event`'s payload.
    fn send_get<T, F>(model: &Model, caps: &Capabilities, path: &str, make_event: F)
    where
        T: serde::de::DeserializeOwned,
        F: Fn(Result<T, ApiError>) -> Event + Send + 'static,
    {
        let mut builder = caps.http.get(model.api.endpoint(path));
        if let Some(token) = &model.token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder
            .expect_string()
            .send(move |result| make_event(api::decode(result)));
    }

    fn send_json<B, F>(
        model: &Model,
        caps: &Capabilities,
        method: HttpMethod,
        path: &str,
        body: &B,
        make_event: F,
    ) where
        B: serde::Serialize,
        F: Fn(Result<(), ApiError>) -> Event + Send + 'static,
    {
        let url = model.api.endpoint(path);
        let bytes = match serde_json::to_vec(body) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path, error = %e, "request serialization failed");
                return;
            }
        };
        let mut builder = match method {
            HttpMethod::Post => caps.http.post(url),
            HttpMethod::Put => caps.http.put(url),
        };
        builder = builder.header("Content-Type", "application/json").body(bytes);
        if let Some(token) = &model.token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder
            .expect_string()
            .send(move |result| make_event(api::decode_unit(result)));
    }

    fn send_auth(caps: &Capabilities, model: &Model, path: &str, body: Vec<u8>) {
        caps.http
            .post(model.api.endpoint(path))
            .header("Content-Type", "application/json")
            .body(body)
            .expect_string()
            .send(|result| Event::AuthResponse(api::decode(result)));
    }

    /// Server message for the alert; 401 additionally tears the session down.
    fn report_failure(model: &mut Model, error: &ApiError) {
        warn!(%error, "request failed");
        if error.is_unauthorized() {
            model.clear_session();
            let message = i18n::label(model.language, Label::NotAuthorized);
            model.show_error(message);
            return;
        }
        let message = match error {
            ApiError::Server { message, .. } => message.clone(),
            other => other.to_string(),
        };
        model.show_error(message);
    }

    fn open_screen(model: &mut Model, caps: &Capabilities, screen: Screen) {
        model.screen = screen;
        match screen {
            Screen::Home => Self::fetch_home(model, caps),
            Screen::Planner => {
                caps.http
                    .get(model.api.endpoint("/destinations"))
                    .expect_string()
                    .send(|result| Event::DestinationsFetched(api::decode(result)));
            }
            Screen::Profile => Self::fetch_profile(model, caps),
            Screen::StopEditor => {
                model.editor.reset_with(StopList::new());
                model.editor.loading = true;
                Self::send_get(model, caps, "/trips/latest", Event::EditorTripFetched);
            }
            Screen::Login | Screen::Register => {}
        }
    }

    /// Normalizes whichever stop source the trip carries: user-saved custom
    /// stops win over the template's.
    fn stops_from_envelope(envelope: &api::TripEnvelope) -> StopList {
        let Some(trip) = &envelope.trip else {
            return StopList::new();
        };
        if !trip.custom_stops.is_empty() {
            return StopList::from_custom_records(trip.custom_stops.clone());
        }
        if let Some(api::RoadTripRef::Populated(template)) = &trip.road_trip_id {
            return StopList::from_template_records(template.stops.clone());
        }
        StopList::new()
    }
}

enum HttpMethod {
    Post,
    Put,
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    #[allow(clippy::too_many_lines)]
    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(event = event.name(), "update");

        match event {
            // --- Lifecycle ---
            Event::AppStarted => {
                Self::load_preferences(caps);
                caps.render.render();
            }

            Event::TokenLoaded(token) => {
                let authenticated = token.is_some();
                model.token = token;
                if authenticated {
                    Self::open_screen(model, caps, Screen::Home);
                } else {
                    model.screen = Screen::Login;
                }
                caps.render.render();
            }

            Event::DarkModeLoaded(value) => {
                model.dark_mode = value.unwrap_or(false);
                caps.render.render();
            }

            Event::LanguageLoaded(code) => {
                if let Some(code) = code {
                    model.language = Language::from_code(&code);
                }
                caps.render.render();
            }

            Event::Navigate(screen) => {
                Self::open_screen(model, caps, screen);
                caps.render.render();
            }

            // --- Auth ---
            Event::LoginSubmitted { email, password } => {
                model.loading = true;
                match serde_json::to_vec(&LoginRequest { email, password }) {
                    Ok(body) => Self::send_auth(caps, model, "/auth/login", body),
                    Err(e) => warn!(error = %e, "login serialization failed"),
                }
                caps.render.render();
            }

            Event::RegisterSubmitted {
                name,
                email,
                password,
            } => {
                model.loading = true;
                match serde_json::to_vec(&RegisterRequest {
                    name,
                    email,
                    password,
                }) {
                    Ok(body) => Self::send_auth(caps, model, "/auth/register", body),
                    Err(e) => warn!(error = %e, "register serialization failed"),
                }
                caps.render.render();
            }

            Event::AuthResponse(result) => {
                model.loading = false;
                match result {
                    Ok(auth) => {
                        Self::persist(caps, TOKEN_KEY, auth.token.clone().into_bytes());
                        model.token = Some(auth.token);
                        Self::open_screen(model, caps, Screen::Home);
                    }
                    Err(error) => Self::report_failure(model, &error),
                }
                caps.render.render();
            }

            Event::LogoutRequested => {
                Self::persist(caps, TOKEN_KEY, Vec::new());
                model.clear_session();
                caps.render.render();
            }

            // --- Home & budget ---
            Event::HomeOpened => {
                Self::open_screen(model, caps, Screen::Home);
                caps.render.render();
            }

            Event::UserFetched(result) => {
                match result {
                    Ok(user) => model.user = Some(user),
                    Err(error) => Self::report_failure(model, &error),
                }
                caps.render.render();
            }

            Event::LatestTripFetched(result) => {
                model.loading = false;
                match result {
                    Ok(envelope) => {
                        model.road_trip = None;
                        if let Some(trip) = envelope.trip {
                            model.items = trip.items.clone();
                            match &trip.road_trip_id {
                                Some(api::RoadTripRef::Populated(template)) => {
                                    model.road_trip = Some(template.clone());
                                }
                                Some(api::RoadTripRef::Id(id)) => {
                                    let path = format!("/roadtrips/{id}");
                                    Self::send_get(model, caps, &path, Event::RoadTripFetched);
                                }
                                None => {}
                            }
                            if trip.items.is_empty() {
                                let url = model
                                    .api
                                    .endpoint_with_segment("/items", &trip.destination);
                                caps.http.get(url).expect_string().send(|result| {
                                    Event::SuggestedItemsFetched(api::decode(result))
                                });
                            }
                            model.trip = Some(trip);
                        } else {
                            model.trip = None;
                            model.items.clear();
                        }
                    }
                    Err(error) => Self::report_failure(model, &error),
                }
                caps.render.render();
            }

            Event::RoadTripFetched(result) => {
                match result {
                    Ok(template) => model.road_trip = Some(template),
                    // A missing template only hides its card.
                    Err(error) => warn!(%error, "road trip fetch failed"),
                }
                caps.render.render();
            }

            Event::SuggestedItemsFetched(result) => {
                match result {
                    Ok(groups) => {
                        let people = model.trip.as_ref().map_or(1, |t| t.people.max(1));
                        let items: Vec<_> = groups
                            .into_iter()
                            .next()
                            .map(|group| group.items)
                            .unwrap_or_default()
                            .into_iter()
                            .map(|item| item.into_budget_item(people))
                            .collect();
                        if !items.is_empty() {
                            Self::send_json(
                                model,
                                caps,
                                HttpMethod::Put,
                                "/trips/latest",
                                &SeedItemsRequest {
                                    items: items.clone(),
                                },
                                Event::ItemsSeeded,
                            );
                        }
                        model.items = items;
                    }
                    Err(error) => warn!(%error, "suggested items fetch failed"),
                }
                caps.render.render();
            }

            Event::ItemsSeeded(result) => {
                if let Err(error) = result {
                    warn!(%error, "seeding items failed");
                }
            }

            Event::BudgetItemAdded => {
                model.items.insert(
                    0,
                    api::BudgetItem {
                        name: String::new(),
                        quantity: 1,
                        price: 0.0,
                    },
                );
                caps.render.render();
            }

            Event::BudgetItemChanged { index, item } => {
                if let Some(slot) = model.items.get_mut(index) {
                    *slot = item;
                }
                caps.render.render();
            }

            Event::BudgetItemRemoved { index } => {
                if index < model.items.len() {
                    model.items.remove(index);
                }
                caps.render.render();
            }

            Event::BudgetSaveRequested => {
                let request = SaveBudgetRequest {
                    items: model.items.clone(),
                    total_budget: model.budget_total(),
                };
                Self::send_json(
                    model,
                    caps,
                    HttpMethod::Put,
                    "/trips/latest",
                    &request,
                    Event::BudgetSaved,
                );
            }

            Event::BudgetSaved(result) => {
                match result {
                    Ok(()) => {
                        let message = i18n::label(model.language, Label::BudgetUpdated);
                        model.show_success(message);
                    }
                    Err(error) => Self::report_failure(model, &error),
                }
                caps.render.render();
            }

            // --- Planner ---
            Event::PlannerOpened => {
                Self::open_screen(model, caps, Screen::Planner);
                caps.render.render();
            }

            Event::DestinationsFetched(result) => {
                match result {
                    Ok(destinations) => model.destinations = destinations,
                    Err(error) => Self::report_failure(model, &error),
                }
                caps.render.render();
            }

            Event::PlannerDestinationChanged(destination) => {
                model.planner.selected_road_trip = None;
                model.road_trips.clear();
                if !destination.is_empty() {
                    let url =
                        model
                            .api
                            .endpoint_with_query("/roadtrips", "destination", &destination);
                    caps.http
                        .get(url)
                        .expect_string()
                        .send(|result| Event::RoadTripsFetched(api::decode(result)));
                }
                model.planner.destination = destination;
                caps.render.render();
            }

            Event::RoadTripsFetched(result) => {
                match result {
                    Ok(road_trips) => model.road_trips = road_trips,
                    Err(error) => {
                        model.road_trips.clear();
                        Self::report_failure(model, &error);
                    }
                }
                caps.render.render();
            }

            Event::PlannerDaysChanged(days) => {
                model.planner.days = days;
                caps.render.render();
            }

            Event::PlannerPeopleChanged(people) => {
                model.planner.people = people;
                caps.render.render();
            }

            Event::PlannerRentCarToggled => {
                model.planner.rent_car = !model.planner.rent_car;
                caps.render.render();
            }

            Event::PlannerRoadTripSelected(id) => {
                model.planner.selected_road_trip = id;
                caps.render.render();
            }

            Event::PlanSubmitted => {
                match model.planner.validate() {
                    Some((days, people)) => {
                        model.planner.submitting = true;
                        let request = PlanTripRequest {
                            destination: model.planner.destination.clone(),
                            days,
                            people,
                            rent_car: model.planner.rent_car,
                            road_trip_id: model.planner.selected_road_trip.clone(),
                        };
                        Self::send_json(
                            model,
                            caps,
                            HttpMethod::Post,
                            "/trips/plan",
                            &request,
                            Event::PlanSaved,
                        );
                    }
                    None => {
                        let message =
                            i18n::label(model.language, Label::MissingRequiredFields);
                        model.show_error(message);
                    }
                }
                caps.render.render();
            }

            Event::PlanSaved(result) => {
                model.planner.submitting = false;
                match result {
                    Ok(()) => {
                        let message = i18n::label(model.language, Label::TripPlanned);
                        model.show_success(message);
                        model.planner = crate::model::PlannerForm::default();
                        Self::open_screen(model, caps, Screen::Home);
                    }
                    Err(error) => Self::report_failure(model, &error),
                }
                caps.render.render();
            }

            // --- Profile ---
            Event::ProfileOpened => {
                Self::open_screen(model, caps, Screen::Profile);
                caps.render.render();
            }

            Event::ProfileFetched(result) => {
                model.profile.loading = false;
                match result {
                    Ok(response) => {
                        model.profile.edit_name = response.user.name.clone();
                        model.profile.edit_email = response.user.email.clone();
                        model.profile.user = response.user;
                        model.profile.trips = response.trips;
                    }
                    Err(error) => Self::report_failure(model, &error),
                }
                caps.render.render();
            }

            Event::ProfileNameChanged(name) => {
                model.profile.edit_name = name;
                caps.render.render();
            }

            Event::ProfileEmailChanged(email) => {
                model.profile.edit_email = email;
                caps.render.render();
            }

            Event::ProfileSaveRequested => {
                let request = UpdateProfileRequest {
                    name: model.profile.edit_name.clone(),
                    email: model.profile.edit_email.clone(),
                };
                Self::send_json(
                    model,
                    caps,
                    HttpMethod::Put,
                    "/user/update",
                    &request,
                    Event::ProfileSaved,
                );
            }

            Event::ProfileSaved(result) => {
                match result {
                    Ok(()) => {
                        model.profile.user.name = model.profile.edit_name.clone();
                        model.profile.user.email = model.profile.edit_email.clone();
                        let message = i18n::label(model.language, Label::Success);
                        model.show_success(message);
                    }
                    Err(error) => Self::report_failure(model, &error),
                }
                caps.render.render();
            }

            Event::OldPasswordChanged(password) => {
                model.profile.old_password = password;
            }

            Event::NewPasswordChanged(password) => {
                model.profile.new_password = password;
            }

            Event::PasswordChangeRequested => {
                let request = ChangePasswordRequest {
                    old_password: model.profile.old_password.clone(),
                    new_password: model.profile.new_password.clone(),
                };
                Self::send_json(
                    model,
                    caps,
                    HttpMethod::Put,
                    "/user/password",
                    &request,
                    Event::PasswordChanged,
                );
            }

            Event::PasswordChanged(result) => {
                match result {
                    Ok(()) => {
                        model.profile.old_password.clear();
                        model.profile.new_password.clear();
                        let message = i18n::label(model.language, Label::Success);
                        model.show_success(message);
                    }
                    Err(error) => Self::report_failure(model, &error),
                }
                caps.render.render();
            }

            Event::StoryEditStarted { trip_id } => {
                model.profile.story_draft = model
                    .profile
                    .trips
                    .iter()
                    .find(|t| t.id == trip_id)
                    .and_then(|t| t.story.clone())
                    .unwrap_or_default();
                model.profile.editing_trip = Some(trip_id);
                caps.render.render();
            }

            Event::StoryDraftChanged(draft) => {
                model.profile.story_draft = draft;
                caps.render.render();
            }

            Event::StorySaveRequested => {
                let Some(trip_id) = model.profile.editing_trip.clone() else {
                    return;
                };
                if model.profile.story_draft.trim().is_empty() {
                    let message = i18n::label(model.language, Label::EmptyStory);
                    model.show_error(message);
                    caps.render.render();
                    return;
                }
                let request = StoryRequest {
                    trip_id,
                    story: model.profile.story_draft.clone(),
                };
                Self::send_json(
                    model,
                    caps,
                    HttpMethod::Put,
                    "/trips/story",
                    &request,
                    Event::StorySaved,
                );
            }

            Event::StoryDeleteRequested { trip_id } => {
                let request = StoryRequest {
                    trip_id,
                    story: String::new(),
                };
                Self::send_json(
                    model,
                    caps,
                    HttpMethod::Put,
                    "/trips/story",
                    &request,
                    Event::StorySaved,
                );
            }

            Event::StorySaved(result) => {
                match result {
                    Ok(()) => {
                        model.profile.editing_trip = None;
                        model.profile.story_draft.clear();
                        Self::fetch_profile(model, caps);
                    }
                    Err(error) => Self::report_failure(model, &error),
                }
                caps.render.render();
            }

            Event::TripDeleteRequested { trip_id } => {
                let mut builder = caps
                    .http
                    .delete(model.api.endpoint(&format!("/trips/{trip_id}")));
                if let Some(token) = &model.token {
                    builder = builder.header("Authorization", format!("Bearer {token}"));
                }
                builder
                    .expect_string()
                    .send(|result| Event::TripDeleted(api::decode_unit(result)));
            }

            Event::TripDeleted(result) => {
                match result {
                    Ok(()) => Self::fetch_profile(model, caps),
                    Err(error) => Self::report_failure(model, &error),
                }
                caps.render.render();
            }

            // --- Stop editor ---
            Event::EditorOpened => {
                Self::open_screen(model, caps, Screen::StopEditor);
                caps.render.render();
            }

            Event::EditorTripFetched(result) => {
                model.editor.loading = false;
                match result {
                    Ok(envelope) => {
                        let stops = Self::stops_from_envelope(&envelope);
                        model.editor.reset_with(stops);
                        model.editor.center_on_first_stop();
                    }
                    Err(error) => {
                        warn!(%error, "editor trip fetch failed");
                        model.editor.reset_with(StopList::new());
                        if error.is_unauthorized() {
                            Self::report_failure(model, &error);
                        } else {
                            let message =
                                i18n::label(model.language, Label::RoadTripFetchFailed);
                            model.show_error(message);
                        }
                    }
                }
                caps.render.render();
            }

            Event::StopTapped(id) => {
                model.editor.tap_stop(id);
                caps.render.render();
            }

            Event::RenameRequested => {
                model.editor.begin_rename();
                caps.render.render();
            }

            Event::RenameDraftChanged(draft) => {
                model.editor.set_rename_draft(draft);
                caps.render.render();
            }

            Event::RenameConfirmed => {
                model.editor.confirm_rename();
                caps.render.render();
            }

            Event::RenameCancelled => {
                model.editor.cancel_rename();
                caps.render.render();
            }

            Event::StopDeleteRequested => {
                model.editor.delete_selected();
                caps.render.render();
            }

            Event::MapPressed {
                latitude,
                longitude,
            } => {
                model.editor.tap_map(latitude, longitude);
                caps.render.render();
            }

            Event::StopDragged {
                index,
                latitude,
                longitude,
            } => {
                model.editor.drag_stop(index, latitude, longitude);
                caps.render.render();
            }

            Event::ZoomIn => {
                model.editor.zoom_step(1.0);
                caps.render.render();
            }

            Event::ZoomOut => {
                model.editor.zoom_step(-1.0);
                caps.render.render();
            }

            Event::RecenterRequested => {
                model.editor.recenter();
                caps.render.render();
            }

            Event::ViewportAnimated => {
                model.editor.animate_viewport = false;
            }

            Event::StopsSaveRequested => {
                model.editor.saving = true;
                let request = SaveStopsRequest {
                    stops: model.editor.stops.to_persistable(),
                };
                Self::send_json(
                    model,
                    caps,
                    HttpMethod::Put,
                    "/trips/latest/stops",
                    &request,
                    Event::StopsSaved,
                );
                caps.render.render();
            }

            Event::StopsSaved(result) => {
                model.editor.saving = false;
                match result {
                    Ok(()) => {
                        let message = i18n::label(model.language, Label::StopsSaved);
                        model.show_success(message);
                        Self::open_screen(model, caps, Screen::Home);
                    }
                    Err(error) => {
                        if error.is_unauthorized() {
                            Self::report_failure(model, &error);
                        } else {
                            warn!(%error, "saving stops failed");
                            let message = i18n::label(model.language, Label::SaveFailed);
                            model.show_error(message);
                        }
                    }
                }
                caps.render.render();
            }

            Event::OpenStopInMaps(target) => {
                let selected = model
                    .editor
                    .selected_index()
                    .and_then(|index| model.editor.stops.get(index))
                    .cloned();
                if let Some(stop) = selected {
                    match deeplink::single_stop_url(target, &stop) {
                        Ok(url) => model.pending_external_url = Some(url),
                        Err(error) => {
                            warn!(%error, "single stop link failed");
                            let message =
                                i18n::label(model.language, Label::CannotOpenMaps);
                            model.show_error(message);
                        }
                    }
                    caps.render.render();
                }
            }

            Event::OpenItineraryInMaps(target) => {
                match deeplink::itinerary_url(target, &model.editor.stops) {
                    Ok(url) => model.pending_external_url = Some(url),
                    Err(error) => {
                        warn!(%error, "itinerary link failed");
                        let message = i18n::label(model.language, Label::NoStepsToShow);
                        model.show_error(message);
                    }
                }
                caps.render.render();
            }

            Event::ExternalUrlDispatched { opened } => {
                model.pending_external_url = None;
                if !opened {
                    let message = i18n::label(model.language, Label::CannotOpenMaps);
                    model.show_error(message);
                }
                caps.render.render();
            }

            // --- Preferences & alerts ---
            Event::DarkModeToggled => {
                model.dark_mode = !model.dark_mode;
                let value = if model.dark_mode { "true" } else { "false" };
                Self::persist(caps, DARK_MODE_KEY, value.as_bytes().to_vec());
                caps.render.render();
            }

            Event::LanguageToggled => {
                model.language = model.language.toggled();
                Self::persist(
                    caps,
                    LANGUAGE_KEY,
                    model.language.code().as_bytes().to_vec(),
                );
                caps.render.render();
            }

            Event::PreferencePersisted { ok } => {
                if !ok {
                    warn!("preference write failed");
                }
            }

            Event::AlertDismissed => {
                model.alert = None;
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        crate::view::view(model)
    }
}
