//! Common types for GATT operations
//!
//! Services, characteristics and descriptors are plain, immutable values
//! produced by topology resolution. Their `handle` is the native attribute
//! handle the peripheral stack uses to address them.

use bitflags::bitflags;
use byteorder::{ByteOrder, LittleEndian};

use crate::error::GattStatus;
use crate::uuid::{Uuid, CLIENT_CHARACTERISTIC_CONFIGURATION};

bitflags! {
    /// Characteristic properties as advertised in the characteristic declaration
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CharacteristicProperties: u8 {
        const BROADCAST = 0x01;
        const READ = 0x02;
        const WRITE_WITHOUT_RESPONSE = 0x04;
        const WRITE = 0x08;
        const NOTIFY = 0x10;
        const INDICATE = 0x20;
        const AUTHENTICATED_SIGNED_WRITES = 0x40;
        const EXTENDED_PROPERTIES = 0x80;
    }
}

impl CharacteristicProperties {
    pub fn can_read(&self) -> bool {
        self.contains(Self::READ)
    }

    pub fn can_write(&self) -> bool {
        self.contains(Self::WRITE)
    }

    pub fn can_write_without_response(&self) -> bool {
        self.contains(Self::WRITE_WITHOUT_RESPONSE)
    }

    pub fn can_notify(&self) -> bool {
        self.contains(Self::NOTIFY)
    }

    pub fn can_indicate(&self) -> bool {
        self.contains(Self::INDICATE)
    }
}

/// A GATT service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Service {
    pub uuid: Uuid,
    /// Native handle of the service declaration
    pub handle: u16,
}

/// A GATT characteristic
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Characteristic {
    pub uuid: Uuid,
    /// UUID of the service this characteristic belongs to
    pub service_uuid: Uuid,
    /// Native handle of the parent service
    pub service_handle: u16,
    /// Native handle of the characteristic value
    pub handle: u16,
    pub properties: CharacteristicProperties,
}

/// A GATT characteristic descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Descriptor {
    pub uuid: Uuid,
    /// Native handle of the parent characteristic value
    pub characteristic_handle: u16,
    pub handle: u16,
}

impl Descriptor {
    /// Whether this is the Client Characteristic Configuration Descriptor.
    pub fn is_cccd(&self) -> bool {
        self.uuid == CLIENT_CHARACTERISTIC_CONFIGURATION
    }
}

/// A readable/writable attribute: a characteristic value or a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeRef<'a> {
    Characteristic(&'a Characteristic),
    Descriptor(&'a Descriptor),
}

impl AttributeRef<'_> {
    pub fn uuid(&self) -> Uuid {
        match self {
            AttributeRef::Characteristic(c) => c.uuid,
            AttributeRef::Descriptor(d) => d.uuid,
        }
    }

    pub fn handle(&self) -> u16 {
        match self {
            AttributeRef::Characteristic(c) => c.handle,
            AttributeRef::Descriptor(d) => d.handle,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AttributeRef::Characteristic(_) => "characteristic",
            AttributeRef::Descriptor(_) => "descriptor",
        }
    }
}

impl<'a> From<&'a Characteristic> for AttributeRef<'a> {
    fn from(characteristic: &'a Characteristic) -> Self {
        AttributeRef::Characteristic(characteristic)
    }
}

impl<'a> From<&'a Descriptor> for AttributeRef<'a> {
    fn from(descriptor: &'a Descriptor) -> Self {
        AttributeRef::Descriptor(descriptor)
    }
}

/// Value written to a Client Characteristic Configuration Descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CccdValue {
    None,
    Notify,
    Indicate,
}

impl CccdValue {
    const NOTIFY_BIT: u16 = 0x0001;
    const INDICATE_BIT: u16 = 0x0002;

    /// Picks the value that arms a characteristic. Indicate wins over
    /// notify when both are advertised.
    pub fn for_properties(properties: CharacteristicProperties) -> Self {
        if properties.can_indicate() {
            CccdValue::Indicate
        } else if properties.can_notify() {
            CccdValue::Notify
        } else {
            CccdValue::None
        }
    }

    pub fn bits(&self) -> u16 {
        match self {
            CccdValue::None => 0,
            CccdValue::Notify => Self::NOTIFY_BIT,
            CccdValue::Indicate => Self::INDICATE_BIT,
        }
    }

    /// The 2-byte little-endian wire form.
    pub fn to_bytes(&self) -> [u8; 2] {
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, self.bits());
        buf
    }

    /// Interprets a CCCD value as read back from a peripheral. Returns
    /// `None` for short buffers. When both bits are set, indicate is reported.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 2 {
            return None;
        }
        let bits = LittleEndian::read_u16(bytes);
        Some(if bits & Self::INDICATE_BIT != 0 {
            CccdValue::Indicate
        } else if bits & Self::NOTIFY_BIT != 0 {
            CccdValue::Notify
        } else {
            CccdValue::None
        })
    }
}

/// Whether a read may be served from the local attribute cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    Cached,
    Uncached,
}

/// Write procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    /// ATT Write Request; completes when the peripheral acknowledges.
    WithResponse,
    /// ATT Write Command; completes on local submission.
    WithoutResponse,
}

impl WriteKind {
    pub fn from_flag(with_response: bool) -> Self {
        if with_response {
            WriteKind::WithResponse
        } else {
            WriteKind::WithoutResponse
        }
    }
}

/// Result of a read: a status and the value, which is empty unless the
/// status is `Success`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    pub status: GattStatus,
    pub value: Vec<u8>,
}

impl ReadOutcome {
    pub fn success(value: Vec<u8>) -> Self {
        ReadOutcome {
            status: GattStatus::Success,
            value,
        }
    }

    pub fn failure(status: GattStatus) -> Self {
        ReadOutcome {
            status,
            value: Vec::new(),
        }
    }
}

/// Flattened attribute tree of a peripheral
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    pub services: Vec<Service>,
    pub characteristics: Vec<Characteristic>,
    pub descriptors: Vec<Descriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicate_preferred_over_notify() {
        let both = CharacteristicProperties::NOTIFY | CharacteristicProperties::INDICATE;
        assert_eq!(CccdValue::for_properties(both), CccdValue::Indicate);
        assert_eq!(
            CccdValue::for_properties(CharacteristicProperties::NOTIFY),
            CccdValue::Notify
        );
        assert_eq!(
            CccdValue::for_properties(CharacteristicProperties::READ),
            CccdValue::None
        );
    }

    #[test]
    fn test_cccd_wire_values() {
        assert_eq!(CccdValue::None.to_bytes(), [0x00, 0x00]);
        assert_eq!(CccdValue::Notify.to_bytes(), [0x01, 0x00]);
        assert_eq!(CccdValue::Indicate.to_bytes(), [0x02, 0x00]);
        assert_eq!(CccdValue::from_bytes(&[0x03, 0x00]), Some(CccdValue::Indicate));
        assert_eq!(CccdValue::from_bytes(&[0x01]), None);
    }

    #[test]
    fn test_properties_from_declaration_byte() {
        let props = CharacteristicProperties::from_bits_truncate(0x1A);
        assert!(props.can_read());
        assert!(props.can_write());
        assert!(props.can_notify());
        assert!(!props.can_indicate());
        assert!(!props.can_write_without_response());
    }

    #[test]
    fn test_failed_read_outcome_is_empty() {
        let outcome = ReadOutcome::failure(GattStatus::Unreachable);
        assert!(outcome.value.is_empty());
        assert_eq!(outcome.status, GattStatus::Unreachable);
    }
}
