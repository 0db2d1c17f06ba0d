//! Event kinds and the event record

use core::any::Any;

/// Number of subscriber slots the bus keeps
pub const MAX_EVENT_TYPES: usize = 32;

/// First identifier of the application-defined range
pub const CUSTOM_EVENT_BASE: u16 = 100;

/// Slots taken by the built-in kinds (`None` through `ButtonPress`)
const BUILTIN_SLOTS: usize = 7;

/// Number of custom identifiers the bus can route
pub const MAX_CUSTOM_EVENTS: usize = MAX_EVENT_TYPES - BUILTIN_SLOTS;

/// Event kind
///
/// Built-in kinds use identifiers 0 to 6. Application-defined kinds start
/// at [`CUSTOM_EVENT_BASE`] and share the remaining bus slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventType {
    None,
    /// Payload: [`TouchSample`](chameleon_hal::TouchSample)
    Touch,
    /// Payload: [`WifiStatus`](chameleon_hal::WifiStatus)
    WifiStatus,
    /// Payload: [`AppId`](crate::app::AppId) of the app entered
    AppSwitch,
    /// Payload: [`ThemeVariant`](crate::theme::ThemeVariant) now active
    ThemeChange,
    /// Payload: `bool` sync state
    TimeSync,
    ButtonPress,
    /// Application-defined identifier (100 and up)
    Custom(u16),
}

impl EventType {
    /// Build an application-defined kind from its offset in the custom range
    ///
    /// Offsets past the end of the identifier space saturate to `u16::MAX`,
    /// which has no slot.
    pub const fn custom(offset: u16) -> Self {
        EventType::Custom(CUSTOM_EVENT_BASE.saturating_add(offset))
    }

    /// Decode a numeric identifier
    ///
    /// Identifiers between the built-in and custom ranges have no kind.
    pub fn from_id(id: u16) -> Option<Self> {
        Some(match id {
            0 => EventType::None,
            1 => EventType::Touch,
            2 => EventType::WifiStatus,
            3 => EventType::AppSwitch,
            4 => EventType::ThemeChange,
            5 => EventType::TimeSync,
            6 => EventType::ButtonPress,
            id if id >= CUSTOM_EVENT_BASE => EventType::Custom(id),
            _ => return None,
        })
    }

    /// Numeric identifier
    pub const fn id(self) -> u16 {
        match self {
            EventType::None => 0,
            EventType::Touch => 1,
            EventType::WifiStatus => 2,
            EventType::AppSwitch => 3,
            EventType::ThemeChange => 4,
            EventType::TimeSync => 5,
            EventType::ButtonPress => 6,
            EventType::Custom(id) => id,
        }
    }

    /// Subscriber slot on the bus, `None` when the kind cannot be routed
    pub fn slot(self) -> Option<usize> {
        match self {
            EventType::Custom(id) => {
                let offset = id.checked_sub(CUSTOM_EVENT_BASE)? as usize;
                (offset < MAX_CUSTOM_EVENTS).then_some(BUILTIN_SLOTS + offset)
            }
            builtin => Some(builtin.id() as usize),
        }
    }

    pub fn is_custom(self) -> bool {
        matches!(self, EventType::Custom(_))
    }
}

/// A published event
///
/// The payload is borrowed from the publisher for the duration of the
/// publish call only. Handlers read it through [`Event::data`] and copy
/// whatever they need to keep.
#[derive(Debug, Clone, Copy)]
pub struct Event<'p> {
    pub kind: EventType,
    data: Option<&'p dyn Any>,
    size: usize,
    /// Milliseconds since boot, overwritten by the bus on publish
    pub timestamp_ms: u32,
}

impl<'p> Event<'p> {
    /// Event without payload
    pub const fn new(kind: EventType) -> Self {
        Self {
            kind,
            data: None,
            size: 0,
            timestamp_ms: 0,
        }
    }

    /// Event carrying a borrowed payload
    pub fn with_data<T: Any>(kind: EventType, data: &'p T) -> Self {
        Self {
            kind,
            data: Some(data),
            size: core::mem::size_of::<T>(),
            timestamp_ms: 0,
        }
    }

    /// Payload viewed as `T`, if it is one
    pub fn data<T: Any>(&self) -> Option<&'p T> {
        self.data?.downcast_ref::<T>()
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Payload size in bytes
    pub fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_slots() {
        assert_eq!(EventType::None.slot(), Some(0));
        assert_eq!(EventType::Touch.slot(), Some(1));
        assert_eq!(EventType::ButtonPress.slot(), Some(6));
    }

    #[test]
    fn test_custom_slots() {
        assert_eq!(EventType::custom(0).slot(), Some(7));
        assert_eq!(EventType::Custom(124).slot(), Some(MAX_EVENT_TYPES - 1));
        assert_eq!(EventType::Custom(125).slot(), None);
        assert_eq!(EventType::Custom(50).slot(), None);
    }

    #[test]
    fn test_custom_offset_saturates() {
        let kind = EventType::custom(u16::MAX - 50);
        assert_eq!(kind, EventType::Custom(u16::MAX));
        assert_eq!(kind.slot(), None);
        assert_eq!(EventType::custom(MAX_CUSTOM_EVENTS as u16).slot(), None);
    }

    #[test]
    fn test_id_round_trip() {
        for id in [0u16, 3, 6, 100, 112] {
            let kind = EventType::from_id(id).unwrap();
            assert_eq!(kind.id(), id);
        }
        assert_eq!(EventType::from_id(7), None);
        assert_eq!(EventType::from_id(99), None);
    }

    #[test]
    fn test_payload_downcast() {
        let value: u32 = 42;
        let event = Event::with_data(EventType::custom(1), &value);
        assert_eq!(event.data::<u32>(), Some(&42));
        assert_eq!(event.data::<i32>(), None);
        assert_eq!(event.size(), 4);

        let empty = Event::new(EventType::ButtonPress);
        assert!(!empty.has_data());
        assert_eq!(empty.data::<u32>(), None);
    }
}
