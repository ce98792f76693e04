//! Browser adapter (feature `web`).
//!
//! Binds a [`Controller`] to the live document:
//!
//! ```text
//! window scroll/resize ─┐
//! document click/keydown├─Closure──► Event ──► Controller ──► Frame ──► WebSurface
//! [data-link-id] hover ─┤                          │
//! setTimeout ───────────┘◄──────── WebScheduler ◄──┘
//! ```
//!
//! The controller lives in an `Rc<RefCell<_>>` shared by every listener.
//! Browser callbacks never run while another one is on the stack, so each
//! event borrows the controller for exactly one dispatch.

use crate::widgets::carousel::{Scheduler, TimerToken};
use crate::widgets::controller::{CONFIG_ELEMENT_ID, ClickTarget, Controller, Event, WidgetConfig};
use crate::widgets::gallery::Key;
use crate::widgets::surface::{Surface, SurfaceError, Target};
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlElement, Window};

type WebController = Controller<WebSurface, WebScheduler>;
type PageSlot = Rc<OnceCell<Weak<RefCell<WebController>>>>;

fn dom_error(err: JsValue) -> SurfaceError {
    SurfaceError::Dom(format!("{err:?}"))
}

fn html_element(element: Element) -> Result<HtmlElement, SurfaceError> {
    element
        .dyn_into::<HtmlElement>()
        .map_err(|el| SurfaceError::Dom(format!("<{}> is not an HTML element", el.tag_name())))
}

// ============================================================================
// Surface
// ============================================================================

/// [`Surface`] over the page's `Document`.
pub struct WebSurface {
    document: Document,
}

impl WebSurface {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn elements(&self, target: &Target) -> Result<Vec<HtmlElement>, SurfaceError> {
        match target {
            Target::Id(id) => {
                let element = self
                    .document
                    .get_element_by_id(id)
                    .ok_or_else(|| SurfaceError::MissingId(id.clone()))?;
                Ok(vec![html_element(element)?])
            }
            Target::Nth { class, index } => {
                let element = u32::try_from(*index)
                    .ok()
                    .and_then(|i| self.document.get_elements_by_class_name(class).item(i))
                    .ok_or_else(|| SurfaceError::MissingNth {
                        class: class.to_string(),
                        index: *index,
                    })?;
                Ok(vec![html_element(element)?])
            }
            Target::All(class) => {
                let collection = self.document.get_elements_by_class_name(class);
                (0..collection.length())
                    .filter_map(|i| collection.item(i))
                    .map(html_element)
                    .collect()
            }
        }
    }
}

impl Surface for WebSurface {
    fn resolve(&self, target: &Target) -> Result<(), SurfaceError> {
        self.elements(target).map(|_| ())
    }

    fn set_style(
        &mut self,
        target: &Target,
        property: &str,
        value: &str,
    ) -> Result<(), SurfaceError> {
        for element in self.elements(target)? {
            let style = element.style();
            if value.is_empty() {
                style.remove_property(property).map_err(dom_error)?;
            } else {
                style.set_property(property, value).map_err(dom_error)?;
            }
        }
        Ok(())
    }

    fn set_class(
        &mut self,
        target: &Target,
        class: &str,
        present: bool,
    ) -> Result<(), SurfaceError> {
        for element in self.elements(target)? {
            element
                .class_list()
                .toggle_with_force(class, present)
                .map_err(dom_error)?;
        }
        Ok(())
    }
}

// ============================================================================
// Scheduler
// ============================================================================

/// [`Scheduler`] backed by `setTimeout`.
///
/// One long-lived callback serves every timer; the token travels as the
/// timeout's argument and comes back as a [`Event::TimerFired`].
pub struct WebScheduler {
    window: Window,
    callback: Closure<dyn FnMut(JsValue)>,
    handles: HashMap<TimerToken, i32>,
    next: u64,
}

impl WebScheduler {
    fn new(window: Window, page: PageSlot) -> Self {
        let callback = Closure::wrap(Box::new(move |token: JsValue| {
            let Some(raw) = token.as_f64() else {
                return;
            };
            if let Some(page) = page.get().and_then(Weak::upgrade) {
                dispatch(&page, Event::TimerFired(TimerToken(raw as u64)));
            }
        }) as Box<dyn FnMut(JsValue)>);
        Self {
            window,
            callback,
            handles: HashMap::new(),
            next: 0,
        }
    }
}

impl Scheduler for WebScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerToken {
        self.next += 1;
        let token = TimerToken(self.next);
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_1(
                self.callback.as_ref().unchecked_ref::<js_sys::Function>(),
                millis,
                &JsValue::from_f64(token.0 as f64),
            ) {
            Ok(handle) => {
                self.handles.insert(token, handle);
            }
            Err(err) => tracing::error!(?err, "setTimeout failed"),
        }
        token
    }

    fn cancel(&mut self, token: TimerToken) {
        if let Some(handle) = self.handles.remove(&token) {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    fn expired(&mut self, token: TimerToken) {
        self.handles.remove(&token);
    }
}

// ============================================================================
// Listeners
// ============================================================================

fn dispatch(page: &RefCell<WebController>, event: Event) {
    let Ok(mut controller) = page.try_borrow_mut() else {
        tracing::warn!(?event, "controller busy, event dropped");
        return;
    };
    if let Err(err) = controller.dispatch(event) {
        tracing::error!(%err, "widget update failed");
    }
}

fn viewport(window: &Window) -> (f64, f64) {
    let width = window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(0.0);
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    (width, scroll_y)
}

fn listen(
    target: &EventTarget,
    name: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), JsValue> {
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
    target.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())?;
    // Listeners live as long as the page
    callback.forget();
    Ok(())
}

/// Resolve a click to the nearest element carrying `data-action`.
fn click_target(event: &web_sys::Event) -> ClickTarget {
    let action_element = event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.closest("[data-action]").ok().flatten());
    match action_element {
        Some(el) => {
            let action = el.get_attribute("data-action");
            let index = el
                .get_attribute("data-index")
                .and_then(|i| i.parse::<usize>().ok());
            ClickTarget::from_action(action.as_deref(), index)
        }
        None => ClickTarget::Elsewhere,
    }
}

fn install_listeners(
    window: &Window,
    document: &Document,
    page: &Rc<RefCell<WebController>>,
) -> Result<(), JsValue> {
    for (name, resize) in [("scroll", false), ("resize", true)] {
        let page = Rc::clone(page);
        let win = window.clone();
        listen(window, name, move |_| {
            let (width, scroll_y) = viewport(&win);
            let event = if resize {
                Event::Resize { width, scroll_y }
            } else {
                Event::Scroll { width, scroll_y }
            };
            dispatch(&page, event);
        })?;
    }

    let click_page = Rc::clone(page);
    listen(document, "click", move |event| {
        dispatch(&click_page, Event::Click(click_target(&event)));
    })?;

    let key_page = Rc::clone(page);
    listen(document, "keydown", move |event| {
        if let Some(key) = event.dyn_ref::<web_sys::KeyboardEvent>() {
            dispatch(&key_page, Event::KeyDown(Key::from_name(&key.key())));
        }
    })?;

    let parents = document.query_selector_all("[data-link-id]")?;
    for i in 0..parents.length() {
        let Some(element) = parents.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let Some(link_id) = element.get_attribute("data-link-id") else {
            continue;
        };
        for (name, enter) in [("mouseenter", true), ("mouseleave", false)] {
            let page = Rc::clone(page);
            let link_id = link_id.clone();
            listen(&element, name, move |_| {
                let event = if enter {
                    Event::PointerEnter(link_id.clone())
                } else {
                    Event::PointerLeave(link_id.clone())
                };
                dispatch(&page, event);
            })?;
        }
    }
    Ok(())
}

fn read_config(document: &Document) -> Result<WidgetConfig, JsValue> {
    let json = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
        .ok_or_else(|| JsValue::from_str("widget config element missing"))?;
    serde_json::from_str(&json).map_err(|e| JsValue::from_str(&format!("widget config: {e}")))
}

/// Module entry point: wire the widgets to the current page.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;
    let config = read_config(&document)?;

    let slot: PageSlot = Rc::new(OnceCell::new());
    let scheduler = WebScheduler::new(window.clone(), Rc::clone(&slot));
    let controller = Controller::new(&config, WebSurface::new(document.clone()), scheduler)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let page = Rc::new(RefCell::new(controller));
    // Set exactly once, before any timer can fire.
    let _ = slot.set(Rc::downgrade(&page));

    install_listeners(&window, &document, &page)?;

    let (width, scroll_y) = viewport(&window);
    let url = window.location().href()?;
    tracing::debug!(%url, "widgets starting");
    dispatch(&page, Event::Load { width, scroll_y, url });
    Ok(())
}
