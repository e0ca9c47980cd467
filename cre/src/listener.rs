use wasm_bindgen::{prelude::Closure, JsCast};

/// An event listener registration.
///
/// The listener is removed from its target when this value is dropped.
#[must_use]
pub struct Listener {
    target: web_sys::EventTarget,
    event: String,
    closure: Closure<dyn Fn(web_sys::Event)>,
}

impl Listener {
    pub fn add<F: Fn(web_sys::Event) + 'static>(
        target: web_sys::EventTarget,
        event: &str,
        callback: F,
    ) -> Result<Self, wasm_bindgen::JsValue> {
        let closure = Closure::<dyn Fn(web_sys::Event)>::new(callback);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target,
            event: event.to_string(),
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(_err) = self
            .target
            .remove_event_listener_with_callback(&self.event, self.closure.as_ref().unchecked_ref())
        {
            tracing::error!(event = %self.event, "Could not remove event listener");
        }
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}
