use crate::application::surface::{ResizeHandler, ResizeSource, ResizeSubscription};
use crate::domain::logging::LogComponent;
use crate::log_debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Event};

#[derive(Clone, Debug)]
pub struct EventOptions {
    pub passive: bool,
    pub capture: bool,
    pub once: bool,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self { passive: true, capture: false, once: false }
    }
}

/// Registered window listener. Dropping the handle removes the listener.
pub struct WindowEventListenerHandle {
    event_name: String,
    callback: Closure<dyn FnMut(Event)>,
    capture: bool,
}

impl WindowEventListenerHandle {
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn remove(self) {
        drop(self);
    }
}

impl Drop for WindowEventListenerHandle {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback_and_bool(
                &self.event_name,
                self.callback.as_ref().unchecked_ref(),
                self.capture,
            );
        }
    }
}

pub fn window_event_listener_with_options(
    event_name: &str,
    options: &EventOptions,
    cb: impl FnMut(Event) + 'static,
) -> WindowEventListenerHandle {
    let opts = AddEventListenerOptions::new();
    opts.set_passive(options.passive);
    opts.set_capture(options.capture);
    opts.set_once(options.once);

    let callback = Closure::wrap(Box::new(cb) as Box<dyn FnMut(Event)>);

    if let Some(window) = web_sys::window() {
        let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
            event_name,
            callback.as_ref().unchecked_ref(),
            &opts,
        );
    }

    WindowEventListenerHandle { event_name: event_name.to_string(), callback, capture: options.capture }
}

/// Window `resize` events reported as the width of a container element.
pub struct WindowResizeSource {
    container_id: String,
    options: EventOptions,
}

impl WindowResizeSource {
    pub fn new(container_id: impl Into<String>) -> Self {
        Self { container_id: container_id.into(), options: EventOptions::default() }
    }

    pub fn with_options(mut self, options: EventOptions) -> Self {
        self.options = options;
        self
    }
}

impl ResizeSource for WindowResizeSource {
    type Subscription = WindowEventListenerHandle;

    fn subscribe(&mut self, mut handler: ResizeHandler) -> Self::Subscription {
        let container_id = self.container_id.clone();
        window_event_listener_with_options("resize", &self.options, move |_event| {
            let width = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(&container_id))
                .map(|container| container.client_width().max(0) as u32);
            if let Some(width) = width {
                handler(width);
            }
        })
    }
}

impl ResizeSubscription for WindowEventListenerHandle {
    fn unsubscribe(self) {
        log_debug!(LogComponent::Infrastructure("Resize"), "removing '{}' listener", self.event_name);
        self.remove();
    }
}
