//! Shared core of the road-trip planning app.
//!
//! The native shells render views and forward gestures; everything else,
//! from auth to the interactive stop editor, happens in this crate's
//! event/update loop.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod app;
pub mod capabilities;
pub mod deeplink;
pub mod event;
pub mod i18n;
pub mod model;
pub mod stops;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use event::Event;
pub use model::Model;
pub use view::ViewModel;

// Preference keys in the shell's key-value store.
pub const TOKEN_KEY: &str = "token";
pub const DARK_MODE_KEY: &str = "darkMode";
pub const LANGUAGE_KEY: &str = "language";

// Map defaults: centered on Kandy, one whole-number zoom step per tap.
pub const DEFAULT_CENTER_LAT: f64 = 7.2906;
pub const DEFAULT_CENTER_LNG: f64 = 80.6337;
pub const BASE_DELTA: f64 = 3.0;
pub const DEFAULT_ZOOM: f64 = 3.0;
pub const MIN_ZOOM: f64 = 1.5;
pub const MAX_ZOOM: f64 = 10.0;
