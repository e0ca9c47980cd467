mod actions;
mod config;
mod lifecycle;
mod registry;
mod state;

pub use self::{
    actions::{Action, ActionFn, Actions},
    config::{EventFn, TemplateFn, WidgetConfig},
    lifecycle::Lifecycle,
    registry::{get, instance_count, WidgetHandle},
    state::State,
};

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use wasm_bindgen::{prelude::*, JsCast};

use crate::{
    binding::{self, Binding},
    listener::Listener,
    value::Value,
    web::{self, js_error_message, WeakRef},
    Error,
};

/// Fixed stylesheet prepended to every render.
pub const STYLESHEET: &str = "<style>\
:host { display: block; }\
* { box-sizing: border-box; margin: 0; padding: 0; }\
</style>";

struct Inner {
    id: u32,
    kind: String,
    element: WeakRef<web_sys::HtmlElement>,
    root: WeakRef<web_sys::ShadowRoot>,
    config: Rc<WidgetConfig>,
    state: State,
    actions: Actions,
    lifecycle: Cell<Lifecycle>,
    /// Configured `events` handlers, bound on the shadow root while attached.
    root_listeners: RefCell<Vec<Listener>>,
    /// Declarative bindings of the current render, only while attached.
    element_listeners: RefCell<Vec<Listener>>,
    rendering: Cell<bool>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        tracing::trace!(widget = %self.kind, id = self.id, "dropped");
        registry::unregister(self.id);
    }
}

/// A live widget instance.
///
/// The host element owns the instance. Once the element is garbage collected
/// (which requires wasm-bindgen weak reference support, see the crate docs)
/// the instance is dropped and no longer found by [`get`].
#[derive(Clone)]
pub struct Widget(Rc<Inner>);

impl Widget {
    /// Build the instance for a freshly constructed host element.
    ///
    /// Attaches the shadow root, makes the instance discoverable through
    /// [`get`] and performs the first render.
    pub fn construct(
        kind: &str,
        element: web_sys::HtmlElement,
        config: Rc<WidgetConfig>,
    ) -> Result<Self, Error> {
        let init = web_sys::ShadowRootInit::new(web_sys::ShadowRootMode::Open);
        let root = element
            .attach_shadow(&init)
            .map_err(|err| Error::ShadowRoot(js_error_message(&err)))?;

        let id = registry::next_id();
        web::set_instance_id(&element, id)?;

        let state = State::new(config.initial_state.clone());
        let actions = Actions::new(state.clone(), config.actions.clone());

        let widget = Self(Rc::new(Inner {
            id,
            kind: kind.to_string(),
            element: WeakRef::new(&element),
            root: WeakRef::new(&root),
            config,
            state,
            actions,
            lifecycle: Cell::new(Lifecycle::Constructed),
            root_listeners: RefCell::new(Vec::new()),
            element_listeners: RefCell::new(Vec::new()),
            rendering: Cell::new(false),
        }));

        let weak = Rc::downgrade(&widget.0);
        widget.0.state.observe(move || {
            if let Some(inner) = weak.upgrade() {
                Widget(inner).render();
            }
        });

        tracing::trace!(widget = %widget.0.kind, id, "constructed");
        registry::register(id, &widget.0);
        widget.render();
        Ok(widget)
    }

    pub fn kind(&self) -> &str {
        &self.0.kind
    }

    /// The host element, unless it was already garbage collected.
    pub fn element(&self) -> Option<web_sys::HtmlElement> {
        self.0.element.get()
    }

    pub fn state(&self) -> &State {
        &self.0.state
    }

    pub fn actions(&self) -> &Actions {
        &self.0.actions
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.0.lifecycle.get()
    }

    /// Number of event listeners currently registered by this instance.
    pub fn listener_count(&self) -> usize {
        self.0.root_listeners.borrow().len() + self.0.element_listeners.borrow().len()
    }

    /// Replace the shadow root content with a fresh render and, while
    /// attached, rebind the declarative event bindings.
    pub fn render(&self) {
        let inner = &self.0;
        if inner.rendering.replace(true) {
            tracing::warn!(widget = %inner.kind, "State written during render, skipping nested render");
            return;
        }
        let stale = std::mem::take(&mut *inner.element_listeners.borrow_mut());
        drop(stale);

        let Some(root) = inner.root.get() else {
            tracing::trace!(widget = %inner.kind, "Shadow root collected, skipping render");
            inner.rendering.set(false);
            return;
        };
        tracing::trace!(widget = %inner.kind, "render");

        let markup = inner.config.render(&inner.state, &inner.actions);
        root.set_inner_html(&format!("{}{}", STYLESHEET, markup));

        if inner.lifecycle.get().is_attached() {
            self.bind_elements(&root);
        }
        inner.rendering.set(false);
    }

    fn bind_elements(&self, root: &web_sys::ShadowRoot) {
        let nodes = match root.query_selector_all("*") {
            Ok(nodes) => nodes,
            Err(err) => {
                tracing::error!(widget = %self.0.kind, error = %js_error_message(&err), "Could not scan rendered subtree");
                return;
            }
        };

        let mut listeners = Vec::new();
        for index in 0..nodes.length() {
            let Some(element) = nodes
                .get(index)
                .and_then(|node| node.dyn_into::<web_sys::Element>().ok())
            else {
                continue;
            };

            for attr in element.get_attribute_names().iter() {
                let Some(attr) = attr.as_string() else {
                    continue;
                };
                let Some(event) = binding::event_type(&attr) else {
                    continue;
                };
                let value = element.get_attribute(&attr).unwrap_or_default();

                match self.bind(&element, event, &value) {
                    Ok(Some(listener)) => listeners.push(listener),
                    Ok(None) => {}
                    Err(err) => {
                        tracing::error!(widget = %self.0.kind, event, error = %js_error_message(&err), "Could not bind event");
                    }
                }
            }
        }

        self.0.element_listeners.borrow_mut().extend(listeners);
    }

    fn bind(
        &self,
        element: &web_sys::Element,
        event: &str,
        value: &str,
    ) -> Result<Option<Listener>, JsValue> {
        let binding = match Binding::parse(value) {
            Ok(binding) => binding,
            Err(err) => {
                tracing::debug!(widget = %self.0.kind, event, value, error = %err, "Ignoring malformed event binding");
                return Ok(None);
            }
        };

        let weak = Rc::downgrade(&self.0);
        let action = binding.action;
        let args: Vec<Value> = binding.args.into_iter().map(Value::from).collect();
        let listener = Listener::add(element.clone().into(), event, move |_event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if !inner.actions.call(&action, &args) {
                tracing::debug!(widget = %inner.kind, action = %action, "Event binding names an unknown action");
            }
        })?;
        Ok(Some(listener))
    }

    /// Host callback: the element was inserted into a document.
    pub fn connected(&self) {
        let inner = &self.0;
        let previous = inner.lifecycle.get();
        let Some(next) = previous.connect() else {
            tracing::warn!(widget = %inner.kind, "Connected while already attached");
            return;
        };
        inner.lifecycle.set(next);
        tracing::trace!(widget = %inner.kind, ?previous, "attached");

        let Some(root) = inner.root.get() else {
            return;
        };

        let mut listeners = Vec::with_capacity(inner.config.events.len());
        for (event, handler) in &inner.config.events {
            let weak = Rc::downgrade(&self.0);
            let handler = handler.clone();
            let result = Listener::add(root.clone().into(), event, move |ev| {
                if let Some(inner) = weak.upgrade() {
                    handler(&inner.state, &ev);
                }
            });
            match result {
                Ok(listener) => listeners.push(listener),
                Err(err) => {
                    tracing::error!(widget = %inner.kind, event = %event, error = %js_error_message(&err), "Could not bind widget event handler");
                }
            }
        }
        inner.root_listeners.borrow_mut().extend(listeners);

        // Element bindings only exist while attached.
        self.bind_elements(&root);
    }

    /// Host callback: the element was removed from its document.
    pub fn disconnected(&self) {
        let inner = &self.0;
        let Some(next) = inner.lifecycle.get().disconnect() else {
            tracing::warn!(widget = %inner.kind, "Disconnected while not attached");
            return;
        };
        inner.lifecycle.set(next);

        let root = std::mem::take(&mut *inner.root_listeners.borrow_mut());
        let elements = std::mem::take(&mut *inner.element_listeners.borrow_mut());
        tracing::trace!(
            widget = %inner.kind,
            listeners = root.len() + elements.len(),
            "detached"
        );
        drop(root);
        drop(elements);
    }
}

impl std::fmt::Debug for Widget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widget")
            .field("kind", &self.0.kind)
            .field("lifecycle", &self.0.lifecycle.get())
            .field("state", &self.0.state)
            .finish_non_exhaustive()
    }
}

/// The object stored on each custom element, receiving its lifecycle callbacks.
#[wasm_bindgen(js_name = CreWidgetHost)]
pub struct WidgetHost {
    widget: Widget,
}

#[wasm_bindgen(js_class = CreWidgetHost)]
impl WidgetHost {
    pub fn connected(&self) {
        self.widget.connected();
    }

    pub fn disconnected(&self) {
        self.widget.disconnected();
    }
}

/// Register a new widget kind as custom element `name`.
///
/// `name` must be a valid custom element name (it has to contain a hyphen) and
/// must not be defined yet.
pub fn ate(name: &str, config: WidgetConfig) -> Result<(), Error> {
    let config = Rc::new(config);
    let kind = name.to_string();
    let construct = Closure::<dyn Fn(web_sys::HtmlElement) -> JsValue>::new(
        move |element: web_sys::HtmlElement| match Widget::construct(&kind, element, config.clone()) {
            Ok(widget) => WidgetHost { widget }.into(),
            Err(err) => {
                tracing::error!(widget = %kind, error = %err, "Could not construct widget");
                JsValue::UNDEFINED
            }
        },
    );

    web::define_element(name, construct.as_ref().unchecked_ref())?;
    tracing::debug!(widget = name, "defined widget");

    // Custom element definitions can not be removed, the constructor lives
    // for the rest of the page.
    construct.forget();
    Ok(())
}
