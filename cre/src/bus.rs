//! A process-wide publish/subscribe channel.
//!
//! The bus is a plain DOM [`web_sys::EventTarget`]: [`EventBus::emit`]
//! dispatches a `CustomEvent` carrying the payload as its `detail`, and
//! [`EventBus::on`] subscribes a listener that unwraps it again.
//!
//! Subscriptions are append-only and live as long as the bus.
//! There is no way to unsubscribe.

use std::{cell::RefCell, rc::Rc};

use once_cell::unsync::OnceCell;
use wasm_bindgen::{prelude::Closure, JsCast, JsValue};

use crate::{web::js_error_message, Error};

struct Inner {
    target: web_sys::EventTarget,
    subscriptions: RefCell<Vec<Closure<dyn Fn(web_sys::Event)>>>,
}

/// An event bus. Clones share the same subscriptions.
#[derive(Clone)]
pub struct EventBus(Rc<Inner>);

thread_local! {
    static GLOBAL: OnceCell<EventBus> = OnceCell::new();
}

impl EventBus {
    pub fn new() -> Result<Self, Error> {
        let target =
            web_sys::EventTarget::new().map_err(|err| Error::Bus(js_error_message(&err)))?;
        Ok(Self(Rc::new(Inner {
            target,
            subscriptions: RefCell::new(Vec::new()),
        })))
    }

    /// The global bus, created on first use and never torn down.
    ///
    /// # Panics
    ///
    /// Panics if the environment does not support constructing an `EventTarget`.
    pub fn global() -> Self {
        GLOBAL.with(|cell| {
            cell.get_or_init(|| Self::new().expect("Could not create global event bus"))
                .clone()
        })
    }

    /// Synchronously notify all subscribers of `name` with `detail`.
    pub fn emit(&self, name: &str, detail: impl Into<JsValue>) {
        let init = web_sys::CustomEventInit::new();
        init.set_detail(&detail.into());

        let event = match web_sys::CustomEvent::new_with_event_init_dict(name, &init) {
            Ok(event) => event,
            Err(err) => {
                tracing::error!(event = name, error = %js_error_message(&err), "Could not create bus event");
                return;
            }
        };
        tracing::trace!(event = name, "emit");

        if let Err(err) = self.0.target.dispatch_event(&event) {
            tracing::error!(event = name, error = %js_error_message(&err), "Could not dispatch bus event");
        }
    }

    /// Subscribe `callback` to every future emit of `name`.
    ///
    /// The callback receives the emitted detail.
    pub fn on<F: Fn(JsValue) + 'static>(&self, name: &str, callback: F) {
        let closure = Closure::<dyn Fn(web_sys::Event)>::new(move |event: web_sys::Event| {
            let detail = event
                .dyn_ref::<web_sys::CustomEvent>()
                .map(|event| event.detail())
                .unwrap_or(JsValue::UNDEFINED);
            callback(detail);
        });

        match self
            .0
            .target
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
        {
            Ok(()) => self.0.subscriptions.borrow_mut().push(closure),
            Err(err) => {
                tracing::error!(event = name, error = %js_error_message(&err), "Could not subscribe to bus event");
            }
        }
    }

    /// Number of subscriptions over all event names.
    pub fn subscription_count(&self) -> usize {
        self.0.subscriptions.borrow().len()
    }
}
