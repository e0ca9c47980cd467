//! Helpers for interacting with the browser environment.

use wasm_bindgen::{prelude::*, JsCast};

use crate::Error;

pub fn window() -> Result<web_sys::Window, Error> {
    web_sys::window().ok_or(Error::NoWindow)
}

pub fn document() -> Result<web_sys::Document, Error> {
    window()?.document().ok_or(Error::NoWindow)
}

/// Best-effort human readable message of a thrown JS value.
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        String::from(err.message())
    } else if let Some(s) = value.as_string() {
        s
    } else {
        format!("{:?}", value)
    }
}

/// `web-sys` can not extend `HTMLElement`, so custom element classes are
/// declared in this small JS shim.
///
/// The class constructor hands the new element to `construct`, which returns
/// the lifecycle host object kept on the element. The connected and
/// disconnected callbacks are forwarded to that object.
#[wasm_bindgen(inline_js = "
export function __cre_define_element(name, construct) {
    class CreElement extends HTMLElement {
        constructor() {
            super();
            this.__cre_host = construct(this);
        }

        connectedCallback() {
            if (this.__cre_host) {
                this.__cre_host.connected();
            }
        }

        disconnectedCallback() {
            if (this.__cre_host) {
                this.__cre_host.disconnected();
            }
        }
    }

    customElements.define(name, CreElement);
}
")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn __cre_define_element(name: &str, construct: &js_sys::Function) -> Result<(), JsValue>;
}

/// Define a custom element `name` whose instances are constructed by `construct`.
pub fn define_element(name: &str, construct: &js_sys::Function) -> Result<(), Error> {
    let registry = window()?.custom_elements();
    if !registry.get(name).is_undefined() {
        return Err(Error::AlreadyDefined(name.to_string()));
    }

    __cre_define_element(name, construct).map_err(|err| Error::Define {
        name: name.to_string(),
        message: js_error_message(&err),
    })
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = WeakRef)]
    type JsWeakRef;

    #[wasm_bindgen(constructor, js_class = WeakRef)]
    fn new(target: &JsValue) -> JsWeakRef;

    #[wasm_bindgen(method, js_class = WeakRef)]
    fn deref(this: &JsWeakRef) -> JsValue;
}

/// A JS `WeakRef` to a DOM object.
///
/// Rust-held `web-sys` handles are GC roots. Widget instances reference their
/// own host element through this so the element stays collectable.
pub struct WeakRef<T> {
    inner: JsWeakRef,
    _marker: std::marker::PhantomData<T>,
}

impl<T: JsCast> WeakRef<T> {
    pub fn new(target: &T) -> Self {
        Self {
            inner: JsWeakRef::new(target.as_ref()),
            _marker: std::marker::PhantomData,
        }
    }

    /// The target, or `None` once it was garbage collected.
    pub fn get(&self) -> Option<T> {
        let value = self.inner.deref();
        if value.is_undefined() {
            None
        } else {
            Some(value.unchecked_into())
        }
    }
}

/// Property on a host element holding its widget instance id.
const INSTANCE_ID: &str = "__cre_id";

pub fn set_instance_id(element: &web_sys::Element, id: u32) -> Result<(), Error> {
    js_sys::Reflect::set(element, &JsValue::from_str(INSTANCE_ID), &JsValue::from(id))
        .map(|_| ())
        .map_err(|err| Error::Define {
            name: element.tag_name().to_lowercase(),
            message: js_error_message(&err),
        })
}

pub fn instance_id(element: &web_sys::Element) -> Option<u32> {
    js_sys::Reflect::get(element, &JsValue::from_str(INSTANCE_ID))
        .ok()?
        .as_f64()
        .map(|id| id as u32)
}
