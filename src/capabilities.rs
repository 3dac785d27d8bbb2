//! Capability set wired into the update loop.
//!
//! Crux's built-in Render capability is used directly; HTTP and key-value
//! storage come from the companion crates. The shell resolves the generated
//! `Effect` variants.
//!
//! The fields must spell out their event parameter inline; the Effect derive
//! reads the field types syntactically and cannot see through an alias.

pub use crux_core::render::Render;
pub use crux_http::Http;
pub use crux_kv::KeyValue;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub kv: KeyValue<Event>,
    pub render: Render<Event>,
}
