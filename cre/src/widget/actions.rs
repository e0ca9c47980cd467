use std::{collections::BTreeMap, rc::Rc};

use crate::value::Value;

use super::state::State;

/// A configured action handler.
pub type ActionFn = Rc<dyn Fn(&State, &[Value])>;

struct Inner {
    state: State,
    handlers: BTreeMap<String, ActionFn>,
}

/// The action table of a widget instance.
///
/// Each action applies its handler to the instance state and then notifies the
/// state observer exactly once, whether or not the handler wrote anything.
/// Writes made by the handler itself do not notify individually.
#[derive(Clone)]
pub struct Actions(Rc<Inner>);

impl Actions {
    pub fn new(state: State, handlers: BTreeMap<String, ActionFn>) -> Self {
        Self(Rc::new(Inner { state, handlers }))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.handlers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.handlers.keys().map(String::as_str)
    }

    /// Invoke the action `name`.
    ///
    /// Returns `false` without doing anything if no such action exists.
    pub fn call(&self, name: &str, args: &[Value]) -> bool {
        let Some(handler) = self.0.handlers.get(name) else {
            return false;
        };
        tracing::trace!(action = name, args = args.len(), "invoking action");

        let state = &self.0.state;
        state.hold(|| handler(state, args));
        state.notify();
        true
    }

    /// A callable handle to a single action.
    pub fn get(&self, name: &str) -> Option<Action> {
        if self.contains(name) {
            Some(Action {
                actions: self.clone(),
                name: name.to_string(),
            })
        } else {
            None
        }
    }
}

impl std::fmt::Debug for Actions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// A single bound action, see [`Actions::get`].
#[derive(Clone, Debug)]
pub struct Action {
    actions: Actions,
    name: String,
}

impl Action {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) {
        self.actions.call(&self.name, args);
    }
}
