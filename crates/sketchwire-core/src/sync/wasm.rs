//! WebSocket transport for the browser.

use super::{Transport, TransportError, TransportEvent};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

/// WebSocket client for WASM.
///
/// Browser callbacks push into a shared queue that `poll` drains.
pub struct WasmWebSocket {
    ws: Option<WebSocket>,
    events: Rc<RefCell<Vec<TransportEvent>>>,
    // Keep the closures alive for as long as the socket
    _on_open: Option<Closure<dyn Fn()>>,
    _on_message: Option<Closure<dyn Fn(MessageEvent)>>,
    _on_close: Option<Closure<dyn Fn(CloseEvent)>>,
    _on_error: Option<Closure<dyn Fn(ErrorEvent)>>,
}

impl WasmWebSocket {
    pub fn new() -> Self {
        Self {
            ws: None,
            events: Rc::new(RefCell::new(Vec::new())),
            _on_open: None,
            _on_message: None,
            _on_close: None,
            _on_error: None,
        }
    }

    /// Start connecting to a hub URL.
    pub fn connect(&mut self, url: &str) -> Result<(), TransportError> {
        if self.ws.is_some() {
            return Err(TransportError::AlreadyConnected);
        }

        let ws = WebSocket::new(url).map_err(|e| TransportError::InvalidUrl(format!("{:?}", e)))?;

        let events_open = self.events.clone();
        let on_open = Closure::wrap(Box::new(move || {
            events_open.borrow_mut().push(TransportEvent::Opened);
        }) as Box<dyn Fn()>);
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));

        let events_msg = self.events.clone();
        let on_message = Closure::wrap(Box::new(move |e: MessageEvent| {
            if let Ok(txt) = e.data().dyn_into::<js_sys::JsString>() {
                events_msg
                    .borrow_mut()
                    .push(TransportEvent::Message(txt.into()));
            }
        }) as Box<dyn Fn(MessageEvent)>);
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        let events_close = self.events.clone();
        let on_close = Closure::wrap(Box::new(move |_e: CloseEvent| {
            events_close.borrow_mut().push(TransportEvent::Closed);
        }) as Box<dyn Fn(CloseEvent)>);
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        let events_err = self.events.clone();
        let on_error = Closure::wrap(Box::new(move |_e: ErrorEvent| {
            events_err
                .borrow_mut()
                .push(TransportEvent::Error("WebSocket error".to_string()));
        }) as Box<dyn Fn(ErrorEvent)>);
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        self.ws = Some(ws);
        self._on_open = Some(on_open);
        self._on_message = Some(on_message);
        self._on_close = Some(on_close);
        self._on_error = Some(on_error);
        Ok(())
    }
}

impl Default for WasmWebSocket {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for WasmWebSocket {
    fn send(&mut self, text: &str) -> Result<(), TransportError> {
        let ws = self.ws.as_ref().ok_or(TransportError::NotConnected)?;
        ws.send_with_str(text)
            .map_err(|e| TransportError::Send(format!("{:?}", e)))
    }

    fn poll(&mut self) -> Vec<TransportEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    fn close(&mut self) {
        if let Some(ws) = self.ws.take() {
            let _ = ws.close();
        }
        self._on_open = None;
        self._on_message = None;
        self._on_close = None;
        self._on_error = None;
    }
}
