//! GATT client operations
//!
//! This module provides attribute discovery, attribute I/O and notification
//! subscription against a connected peripheral.

pub mod codec;
pub mod io;
pub mod notify;
pub mod peripheral;
pub mod resolve;
pub mod types;


pub use codec::{AttributeBuffer, WriteBuffer};
pub use notify::{NotificationCallback, NotificationRegistry, RegistrationKey};
pub use peripheral::{GattPeripheral, ValueChangedHandler};
pub use types::{
    AttributeRef, CacheMode, CccdValue, Characteristic, CharacteristicProperties, Descriptor,
    ReadOutcome, Service, Topology, WriteKind,
};
