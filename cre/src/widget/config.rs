use std::{collections::BTreeMap, rc::Rc};

use crate::value::Value;

use super::{actions::ActionFn, state::State, Actions};

pub type TemplateFn = Box<dyn Fn(&State, &Actions) -> String>;
pub type EventFn = Rc<dyn Fn(&State, &web_sys::Event)>;

/// Configuration of a widget kind.
///
/// ```ignore
/// let config = WidgetConfig::new(|state, _| {
///     format!(r#"<button @click="add(1)">{}</button>"#, state.get("count").unwrap_or_default())
/// })
/// .state("count", 0)
/// .action("add", |state, args| {
///     let by = args.first().and_then(Value::as_f64).unwrap_or(1.0);
///     state.update("count", |v| *v = Value::from(v.as_f64().unwrap_or(0.0) + by));
/// });
/// cre::ate("my-counter", config)?;
/// ```
pub struct WidgetConfig {
    pub(crate) template: TemplateFn,
    pub(crate) initial_state: BTreeMap<String, Value>,
    pub(crate) actions: BTreeMap<String, ActionFn>,
    pub(crate) events: Vec<(String, EventFn)>,
}

impl WidgetConfig {
    pub fn new<F>(template: F) -> Self
    where
        F: Fn(&State, &Actions) -> String + 'static,
    {
        Self {
            template: Box::new(template),
            initial_state: BTreeMap::new(),
            actions: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Set an initial state value.
    pub fn state<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.initial_state.insert(key.into(), value.into());
        self
    }

    /// Register a named action. A later action with the same name replaces
    /// the earlier one.
    pub fn action<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&State, &[Value]) + 'static,
    {
        self.actions.insert(name.into(), Rc::new(handler));
        self
    }

    /// Handle every `event` occurring inside the widget's shadow root while
    /// the widget is attached to a document.
    pub fn on<F>(mut self, event: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&State, &web_sys::Event) + 'static,
    {
        let event = event.into();
        let handler: EventFn = Rc::new(handler);
        match self.events.iter_mut().find(|(name, _)| *name == event) {
            Some(slot) => slot.1 = handler,
            None => self.events.push((event, handler)),
        }
        self
    }

    pub(crate) fn render(&self, state: &State, actions: &Actions) -> String {
        (self.template)(state, actions)
    }
}

impl std::fmt::Debug for WidgetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("initial_state", &self.initial_state)
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field(
                "events",
                &self.events.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
