//! Publish/subscribe event bus
//!
//! Delivery is synchronous: `publish` runs every handler subscribed to the
//! kind, in subscription order, before returning. The bus snapshots the
//! subscriber list before delivering, so handlers may subscribe,
//! unsubscribe, or publish further events without disturbing the delivery
//! in progress.

use core::cell::{Cell, RefCell};

use chameleon_hal::Clock;
use heapless::Vec;

use super::types::{Event, EventType, MAX_EVENT_TYPES};

/// Subscribers per event kind
pub const MAX_SUBSCRIBERS_PER_EVENT: usize = 8;

/// Nested publish calls allowed from inside handlers
pub const MAX_PUBLISH_DEPTH: u8 = 8;

/// Receives events from the bus
///
/// Handlers get the bus back so they can publish follow-up events.
/// Identity is the handler's address: subscribing the same handler twice to
/// one kind is a no-op. Zero-sized handlers of the same type may share an
/// address and then count as the same handler.
pub trait EventHandler {
    fn handle(&self, bus: &EventBus<'_>, event: &Event<'_>);
}

impl<F> EventHandler for F
where
    F: Fn(&EventBus<'_>, &Event<'_>),
{
    fn handle(&self, bus: &EventBus<'_>, event: &Event<'_>) {
        self(bus, event)
    }
}

/// Event bus errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// `init` has not been called
    NotInitialized,
    /// Kind has no subscriber slot
    InvalidType,
    /// Handler was not subscribed to the kind
    NotFound,
    /// Kind already has the maximum number of subscribers
    SubscriberListFull,
    /// Handlers nested publish calls too deeply
    RecursionLimit,
}

impl BusError {
    /// Numeric status code (negative)
    pub fn code(&self) -> i8 {
        match self {
            BusError::NotInitialized => -1,
            BusError::InvalidType => -2,
            BusError::NotFound => -3,
            BusError::SubscriberListFull => -4,
            BusError::RecursionLimit => -5,
        }
    }
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BusError::NotInitialized => write!(f, "event bus not initialized"),
            BusError::InvalidType => write!(f, "invalid event type"),
            BusError::NotFound => write!(f, "handler not subscribed"),
            BusError::SubscriberListFull => write!(f, "too many subscribers"),
            BusError::RecursionLimit => write!(f, "publish nested too deeply"),
        }
    }
}

impl core::error::Error for BusError {}

type SubscriberList<'h> = Vec<&'h dyn EventHandler, MAX_SUBSCRIBERS_PER_EVENT>;

/// The event bus
///
/// All operations take `&self` so handlers, which receive a shared
/// reference, can use the full API.
pub struct EventBus<'h> {
    clock: &'h dyn Clock,
    subscribers: RefCell<[SubscriberList<'h>; MAX_EVENT_TYPES]>,
    initialized: Cell<bool>,
    depth: Cell<u8>,
}

impl<'h> EventBus<'h> {
    /// Create an uninitialized bus stamping events from `clock`
    pub fn new(clock: &'h dyn Clock) -> Self {
        Self {
            clock,
            subscribers: RefCell::new(core::array::from_fn(|_| Vec::new())),
            initialized: Cell::new(false),
            depth: Cell::new(0),
        }
    }

    /// Clear all subscriptions and mark the bus ready
    pub fn init(&mut self) {
        for list in self.subscribers.get_mut().iter_mut() {
            list.clear();
        }
        self.depth.set(0);
        self.initialized.set(true);
        info!("Event bus initialized");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    /// Register `handler` for `kind`
    pub fn subscribe(&self, kind: EventType, handler: &'h dyn EventHandler) -> Result<(), BusError> {
        let slot = self.slot(kind)?;
        let mut subscribers = self.subscribers.borrow_mut();
        let list = &mut subscribers[slot];

        if list.iter().any(|existing| same_handler(*existing, handler)) {
            debug!("Handler already subscribed to event {}", kind.id());
            return Ok(());
        }

        list.push(handler).map_err(|_| {
            warn!("Subscriber list full for event {}", kind.id());
            BusError::SubscriberListFull
        })?;

        debug!("Subscribed to event {} ({} handlers)", kind.id(), list.len());
        Ok(())
    }

    /// Remove `handler` from `kind`, keeping the order of the rest
    pub fn unsubscribe(&self, kind: EventType, handler: &dyn EventHandler) -> Result<(), BusError> {
        let slot = self.slot(kind)?;
        let mut subscribers = self.subscribers.borrow_mut();
        let list = &mut subscribers[slot];

        match list.iter().position(|existing| same_handler(*existing, handler)) {
            Some(index) => {
                list.remove(index);
                debug!("Unsubscribed from event {}", kind.id());
                Ok(())
            }
            None => {
                warn!("Handler not found for event {}", kind.id());
                Err(BusError::NotFound)
            }
        }
    }

    /// Stamp `event` with the current time and deliver it
    pub fn publish(&self, event: &mut Event<'_>) -> Result<(), BusError> {
        let slot = self.slot(event.kind)?;

        let depth = self.depth.get();
        if depth >= MAX_PUBLISH_DEPTH {
            warn!("Publish of event {} nested too deeply", event.kind.id());
            return Err(BusError::RecursionLimit);
        }

        event.timestamp_ms = self.clock.now_ms();

        // Release the borrow before calling out so handlers can re-enter
        let snapshot: SubscriberList<'h> = self.subscribers.borrow()[slot].clone();
        trace!(
            "Publishing event {} to {} handlers",
            event.kind.id(),
            snapshot.len()
        );

        self.depth.set(depth + 1);
        for handler in snapshot.iter() {
            handler.handle(self, event);
        }
        self.depth.set(depth);

        Ok(())
    }

    /// Deferred-delivery hook, called once per frame
    ///
    /// Delivery is synchronous, so there is nothing queued.
    pub fn process(&self) {}

    /// Number of handlers subscribed to `kind`
    pub fn subscriber_count(&self, kind: EventType) -> usize {
        match kind.slot() {
            Some(slot) => self.subscribers.borrow()[slot].len(),
            None => 0,
        }
    }

    fn slot(&self, kind: EventType) -> Result<usize, BusError> {
        if !self.initialized.get() {
            warn!("Event bus not initialized");
            return Err(BusError::NotInitialized);
        }
        kind.slot().ok_or_else(|| {
            warn!("Invalid event type {}", kind.id());
            BusError::InvalidType
        })
    }
}

/// Compares data addresses only; vtables may be duplicated across codegen units
fn same_handler(a: &dyn EventHandler, b: &dyn EventHandler) -> bool {
    core::ptr::addr_eq(a, b)
}
