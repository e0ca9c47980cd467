use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::{Rc, Weak},
};

use crate::web;

use super::{Actions, Inner, State, Widget};

thread_local! {
    /// Live widget instances by the id stored on their host element.
    static INSTANCES: RefCell<HashMap<u32, Weak<Inner>>> = RefCell::new(HashMap::new());
    static NEXT_ID: Cell<u32> = Cell::new(1);
}

pub(super) fn next_id() -> u32 {
    NEXT_ID.with(|next| {
        let id = next.get();
        next.set(id.wrapping_add(1).max(1));
        id
    })
}

pub(super) fn register(id: u32, inner: &Rc<Inner>) {
    INSTANCES.with(|instances| {
        instances.borrow_mut().insert(id, Rc::downgrade(inner));
    });
}

pub(super) fn unregister(id: u32) {
    // The registry may already be gone during thread teardown.
    let _ = INSTANCES.try_with(|instances| {
        instances.borrow_mut().remove(&id);
    });
}

/// Number of live registered instances.
pub fn instance_count() -> usize {
    INSTANCES.with(|instances| instances.borrow().len())
}

fn lookup(element: &web_sys::Element) -> Option<Widget> {
    let id = web::instance_id(element)?;
    INSTANCES.with(|instances| instances.borrow().get(&id).and_then(Weak::upgrade).map(Widget))
}

/// Read/write access to a live widget's state and actions.
#[derive(Clone, Debug)]
pub struct WidgetHandle {
    widget: Widget,
}

impl WidgetHandle {
    pub fn state(&self) -> &State {
        self.widget.state()
    }

    pub fn actions(&self) -> &Actions {
        self.widget.actions()
    }

    pub fn element(&self) -> Option<web_sys::HtmlElement> {
        self.widget.element()
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }
}

/// Find the widget instance of the first element in the document matching
/// `selector`.
///
/// Returns `None` if nothing matches, the selector is invalid, or the match
/// is not a widget.
pub fn get(selector: &str) -> Option<WidgetHandle> {
    let document = web::document().ok()?;
    let element = match document.query_selector(selector) {
        Ok(element) => element?,
        Err(err) => {
            tracing::debug!(selector, error = %web::js_error_message(&err), "Invalid selector");
            return None;
        }
    };
    lookup(&element).map(|widget| WidgetHandle { widget })
}
