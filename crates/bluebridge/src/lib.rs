//! BlueBridge - a client-side BLE GATT bridge
//!
//! This library sits between a host Bluetooth LE stack and a caller that
//! wants a uniform request/response surface. It resolves a connected
//! peripheral's service/characteristic/descriptor tree, performs uncached
//! reads and writes, and multiplexes value-changed events into per-
//! characteristic callbacks.
//!
//! The host stack is plugged in through [`GattPeripheral`].

pub mod bridge;
pub mod config;
pub mod error;
pub mod gatt;
pub mod uuid;

pub use bridge::Bridge;
pub use config::{BridgeConfig, RegistryKey};
pub use error::{GattError, GattStatus, ResolveError, SubscribeError};
pub use gatt::{
    AttributeBuffer, CccdValue, Characteristic, CharacteristicProperties, Descriptor,
    GattPeripheral, NotificationCallback, ReadOutcome, Service, Topology, ValueChangedHandler,
    WriteBuffer,
};
pub use uuid::Uuid;
