//! Event listeners and message delivery.
//!
//! The host delivers UI messages either synchronously or through a
//! zero-delay timer. The simulator replaces the timer with an explicit
//! task queue: deliveries accumulate until [`MessageBus::flush`] runs,
//! which the test harness controls. With
//! [`Config::without_timeout`](crate::Config) set, deliveries happen
//! inline instead and `flush` is a no-op.
//!
//! Listener callbacks are identified by the [`ListenerId`] returned at
//! registration (closures have no identity to unsubscribe by).

use crate::MessagePayload;
use std::collections::VecDeque;

/// The event channels a session exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventChannel {
    /// The current page's selection changed.
    SelectionChange,
    /// The current page itself changed.
    CurrentPageChange,
    /// An inbound message for the plugin.
    Message,
}

/// Handle for unsubscribing a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&MessagePayload)>;

struct ListenerEntry {
    id: ListenerId,
    callback: Callback,
    once: bool,
}

enum Delivery {
    Channel(EventChannel, MessagePayload),
    Ui(MessagePayload),
}

/// Listener registries plus the deferred-delivery queue.
pub struct MessageBus {
    deliver_sync: bool,
    next_id: u64,
    selection_change: Vec<ListenerEntry>,
    current_page_change: Vec<ListenerEntry>,
    message: Vec<ListenerEntry>,
    ui_sink: Option<Callback>,
    queue: VecDeque<Delivery>,
}

impl std::fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBus")
            .field("deliver_sync", &self.deliver_sync)
            .field("selection_change", &self.selection_change.len())
            .field("current_page_change", &self.current_page_change.len())
            .field("message", &self.message.len())
            .field("ui_sink", &self.ui_sink.is_some())
            .field("queued", &self.queue.len())
            .finish()
    }
}

impl MessageBus {
    /// Create a bus; `deliver_sync` selects inline delivery over the
    /// task queue.
    pub fn new(deliver_sync: bool) -> Self {
        Self {
            deliver_sync,
            next_id: 0,
            selection_change: Vec::new(),
            current_page_change: Vec::new(),
            message: Vec::new(),
            ui_sink: None,
            queue: VecDeque::new(),
        }
    }

    fn listeners_mut(&mut self, channel: EventChannel) -> &mut Vec<ListenerEntry> {
        match channel {
            EventChannel::SelectionChange => &mut self.selection_change,
            EventChannel::CurrentPageChange => &mut self.current_page_change,
            EventChannel::Message => &mut self.message,
        }
    }

    fn register(
        &mut self,
        channel: EventChannel,
        callback: impl FnMut(&MessagePayload) + 'static,
        once: bool,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners_mut(channel).push(ListenerEntry {
            id,
            callback: Box::new(callback),
            once,
        });
        id
    }

    /// Register a listener; it fires on every dispatch until removed.
    pub fn on(
        &mut self,
        channel: EventChannel,
        callback: impl FnMut(&MessagePayload) + 'static,
    ) -> ListenerId {
        self.register(channel, callback, false)
    }

    /// Register a listener that is removed after its first dispatch.
    pub fn once(
        &mut self,
        channel: EventChannel,
        callback: impl FnMut(&MessagePayload) + 'static,
    ) -> ListenerId {
        self.register(channel, callback, true)
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn off(&mut self, channel: EventChannel, id: ListenerId) {
        self.listeners_mut(channel).retain(|entry| entry.id != id);
    }

    /// Install the outbound delivery function the harness provides.
    pub fn set_ui_sink(&mut self, sink: impl FnMut(&MessagePayload) + 'static) {
        self.ui_sink = Some(Box::new(sink));
    }

    /// Emit an event to a channel's listeners, inline or queued.
    pub fn emit(&mut self, channel: EventChannel, payload: MessagePayload) {
        if self.deliver_sync {
            self.dispatch(channel, &payload);
        } else {
            self.queue.push_back(Delivery::Channel(channel, payload));
        }
    }

    /// Emit an outbound UI message, inline or queued.
    pub fn emit_ui(&mut self, payload: MessagePayload) {
        if self.deliver_sync {
            self.dispatch_ui(&payload);
        } else {
            self.queue.push_back(Delivery::Ui(payload));
        }
    }

    /// Deliver everything queued so far, in emission order.
    ///
    /// Deliveries queued while flushing (by listeners emitting further
    /// events) are drained in the same pass.
    pub fn flush(&mut self) {
        while let Some(delivery) = self.queue.pop_front() {
            match delivery {
                Delivery::Channel(channel, payload) => self.dispatch(channel, &payload),
                Delivery::Ui(payload) => self.dispatch_ui(&payload),
            }
        }
    }

    /// Number of deliveries waiting for a flush.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn dispatch(&mut self, channel: EventChannel, payload: &MessagePayload) {
        let listeners = self.listeners_mut(channel);
        for entry in listeners.iter_mut() {
            (entry.callback)(payload);
        }
        listeners.retain(|entry| !entry.once);
    }

    fn dispatch_ui(&mut self, payload: &MessagePayload) {
        if let Some(sink) = self.ui_sink.as_mut() {
            sink(payload);
        }
    }
}
