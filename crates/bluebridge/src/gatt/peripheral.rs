//! The connected-peripheral seam
//!
//! The bridge does not own a radio. A host BLE stack provides a connected
//! peripheral by implementing [`GattPeripheral`]; the bridge borrows it for
//! the duration of each call.

use std::sync::Arc;

use async_trait::async_trait;

use super::codec::{AttributeBuffer, WriteBuffer};
use super::types::{
    AttributeRef, CacheMode, CccdValue, Characteristic, Descriptor, Service, WriteKind,
};
use crate::error::{GattError, SubscribeError};

/// Receives value-changed events pushed by the peripheral stack.
///
/// Called on whatever thread the stack delivers events on.
pub trait ValueChangedHandler: Send + Sync {
    fn value_changed(&self, characteristic: &Characteristic, value: AttributeBuffer);
}

/// A connected remote GATT server as exposed by the host stack
#[async_trait]
pub trait GattPeripheral: Send + Sync {
    /// All services, in the order the stack reports them.
    async fn services(&self) -> Result<Vec<Service>, GattError>;

    async fn characteristics(&self, service: &Service) -> Result<Vec<Characteristic>, GattError>;

    async fn descriptors(
        &self,
        characteristic: &Characteristic,
    ) -> Result<Vec<Descriptor>, GattError>;

    async fn read_value(
        &self,
        attribute: AttributeRef<'_>,
        cache_mode: CacheMode,
    ) -> Result<AttributeBuffer, GattError>;

    /// For `WriteKind::WithoutResponse` the result reflects local submission
    /// only.
    async fn write_value(
        &self,
        attribute: AttributeRef<'_>,
        value: WriteBuffer,
        kind: WriteKind,
    ) -> Result<(), GattError>;

    /// Writes the characteristic's Client Characteristic Configuration
    /// Descriptor and waits for the peripheral's response.
    async fn write_cccd(
        &self,
        characteristic: &Characteristic,
        value: CccdValue,
    ) -> Result<(), GattError>;

    /// Starts delivering value-changed events for `characteristic` to `handler`.
    fn attach_value_changed(
        &self,
        characteristic: &Characteristic,
        handler: Arc<dyn ValueChangedHandler>,
    ) -> Result<(), SubscribeError>;

    fn detach_value_changed(&self, characteristic: &Characteristic);
}
