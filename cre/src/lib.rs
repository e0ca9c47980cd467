//! Reusable widgets on top of browser custom elements and shadow DOM.
//!
//! * [`ate`] registers a widget kind from a [`WidgetConfig`]: a template,
//!   initial state, named actions and shadow root event handlers.
//!   Every state write or action re-renders the whole widget.
//! * [`get`] looks up a live widget on the page and returns its state and
//!   actions.
//! * [`emit`] and [`on`] publish and subscribe on the global [`EventBus`].
//!
//! Widget markup binds DOM events to actions declaratively, see [`binding`].
//!
//! # Memory
//!
//! Each host element owns its widget instance through an exported
//! `CreWidgetHost` object. Rust only holds weak references to the element and
//! its shadow root, and all listeners are removed while the element is
//! detached, so a removed element can be garbage collected.
//! The instance itself is then dropped by the `CreWidgetHost` finalizer, which
//! only exists when the bindings are generated with `wasm-bindgen --weak-refs`.
//! Without it, instances of removed elements stay alive (but inert) for the
//! rest of the page.

pub mod binding;
pub mod bus;
mod error;
pub mod listener;
pub mod value;
pub mod web;
pub mod widget;

pub use self::{
    bus::EventBus,
    error::Error,
    value::Value,
    widget::{ate, get, Actions, State, Widget, WidgetConfig, WidgetHandle},
};

/// Emit `detail` as `name` on the global bus.
pub fn emit(name: &str, detail: impl Into<wasm_bindgen::JsValue>) {
    EventBus::global().emit(name, detail);
}

/// Subscribe to `name` on the global bus.
pub fn on<F: Fn(wasm_bindgen::JsValue) + 'static>(name: &str, callback: F) {
    EventBus::global().on(name, callback);
}
