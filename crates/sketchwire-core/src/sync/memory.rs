//! In-process transports for tests and offline sessions.

use super::{Transport, TransportError, TransportEvent};
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

#[derive(Default)]
struct HubInner {
    next_id: usize,
    /// Pending events per connected endpoint.
    queues: BTreeMap<usize, VecDeque<TransportEvent>>,
}

/// An in-process broadcast hub.
///
/// Every message an endpoint sends is relayed verbatim to all other
/// connected endpoints, never back to the sender. Single-threaded: clones
/// share the same hub.
#[derive(Clone, Default)]
pub struct MemoryHub {
    inner: Rc<RefCell<HubInner>>,
}

impl MemoryHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a new endpoint. Its first poll reports the connection open.
    pub fn connect(&self) -> MemoryTransport {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner
            .queues
            .insert(id, VecDeque::from([TransportEvent::Opened]));
        log::debug!("Memory hub: endpoint {} connected", id);

        MemoryTransport {
            id,
            hub: self.clone(),
            closed: false,
            pending_close: false,
        }
    }

    /// Drop an endpoint from the hub, as if its connection was lost.
    pub fn disconnect(&self, id: usize) {
        let mut inner = self.inner.borrow_mut();
        if let Some(queue) = inner.queues.get_mut(&id) {
            queue.push_back(TransportEvent::Closed);
        }
        log::debug!("Memory hub: endpoint {} disconnected", id);
    }

    /// Relay raw text from `from` to every other endpoint.
    pub fn inject(&self, from: usize, text: &str) {
        let mut inner = self.inner.borrow_mut();
        let receivers = inner
            .queues
            .iter_mut()
            .filter(|(id, queue)| **id != from && !queue.contains(&TransportEvent::Closed));
        for (_, queue) in receivers {
            queue.push_back(TransportEvent::Message(text.to_string()));
        }
    }

    /// Number of connected endpoints.
    pub fn peer_count(&self) -> usize {
        self.inner.borrow().queues.len()
    }

    fn is_connected(&self, id: usize) -> bool {
        self.inner
            .borrow()
            .queues
            .get(&id)
            .is_some_and(|q| !q.contains(&TransportEvent::Closed))
    }

    fn drain(&self, id: usize) -> Vec<TransportEvent> {
        let mut inner = self.inner.borrow_mut();
        let Some(queue) = inner.queues.get_mut(&id) else {
            return Vec::new();
        };
        let events: Vec<TransportEvent> = queue.drain(..).collect();
        if events.contains(&TransportEvent::Closed) {
            inner.queues.remove(&id);
        }
        events
    }

    fn remove(&self, id: usize) {
        self.inner.borrow_mut().queues.remove(&id);
    }
}

/// One participant's endpoint on a [`MemoryHub`].
pub struct MemoryTransport {
    id: usize,
    hub: MemoryHub,
    closed: bool,
    pending_close: bool,
}

impl MemoryTransport {
    pub fn id(&self) -> usize {
        self.id
    }
}

impl Transport for MemoryTransport {
    fn send(&mut self, text: &str) -> Result<(), TransportError> {
        if self.closed || !self.hub.is_connected(self.id) {
            return Err(TransportError::NotConnected);
        }
        self.hub.inject(self.id, text);
        Ok(())
    }

    fn poll(&mut self) -> Vec<TransportEvent> {
        let mut events = self.hub.drain(self.id);
        if self.pending_close {
            self.pending_close = false;
            events.push(TransportEvent::Closed);
        }
        events
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.pending_close = true;
            self.hub.remove(self.id);
        }
    }
}

impl Drop for MemoryTransport {
    fn drop(&mut self) {
        self.hub.remove(self.id);
    }
}

/// A transport that never connects. Sessions using it draw locally only.
#[derive(Debug, Default)]
pub struct OfflineTransport {
    announced: bool,
}

impl Transport for OfflineTransport {
    fn send(&mut self, _text: &str) -> Result<(), TransportError> {
        Err(TransportError::NotConnected)
    }

    fn poll(&mut self) -> Vec<TransportEvent> {
        if self.announced {
            return Vec::new();
        }
        self.announced = true;
        vec![TransportEvent::Closed]
    }

    fn close(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_to_all_others() {
        let hub = MemoryHub::new();
        let mut a = hub.connect();
        let mut b = hub.connect();
        let mut c = hub.connect();
        assert_eq!(hub.peer_count(), 3);
        for t in [&mut a, &mut b, &mut c] {
            assert_eq!(t.poll(), vec![TransportEvent::Opened]);
        }

        a.send("hello").unwrap();
        assert!(a.poll().is_empty());
        assert_eq!(b.poll(), vec![TransportEvent::Message("hello".into())]);
        assert_eq!(c.poll(), vec![TransportEvent::Message("hello".into())]);
    }

    #[test]
    fn test_close_reports_closed_once() {
        let hub = MemoryHub::new();
        let mut a = hub.connect();
        a.close();
        assert_eq!(hub.peer_count(), 0);
        assert_eq!(a.poll(), vec![TransportEvent::Closed]);
        assert!(a.poll().is_empty());
        assert_eq!(a.send("x"), Err(TransportError::NotConnected));
    }

    #[test]
    fn test_drop_leaves_hub() {
        let hub = MemoryHub::new();
        {
            let _a = hub.connect();
            assert_eq!(hub.peer_count(), 1);
        }
        assert_eq!(hub.peer_count(), 0);
    }

    #[test]
    fn test_disconnected_endpoint_cannot_send() {
        let hub = MemoryHub::new();
        let mut a = hub.connect();
        hub.disconnect(a.id());
        assert_eq!(a.send("x"), Err(TransportError::NotConnected));
        assert_eq!(a.poll(), vec![TransportEvent::Opened, TransportEvent::Closed]);
        assert_eq!(hub.peer_count(), 0);
    }
}
