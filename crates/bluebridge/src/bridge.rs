//! Caller-facing bridge
//!
//! `Bridge` owns the notification registry and exposes every operation as a
//! method taking the borrowed peripheral the attribute belongs to.

use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::error::{GattError, GattStatus, ResolveError};
use crate::gatt::io;
use crate::gatt::notify::{NotificationCallback, NotificationRegistry};
use crate::gatt::peripheral::GattPeripheral;
use crate::gatt::resolve;
use crate::gatt::types::{
    AttributeRef, Characteristic, Descriptor, ReadOutcome, Service, Topology, WriteKind,
};

/// A GATT bridge instance
#[derive(Debug)]
pub struct Bridge {
    config: BridgeConfig,
    registry: NotificationRegistry,
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Bridge {
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    pub fn with_config(config: BridgeConfig) -> Self {
        let registry = NotificationRegistry::new(config.registry_key, config.log_payloads);
        Bridge { config, registry }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn registry(&self) -> &NotificationRegistry {
        &self.registry
    }

    /// Resolves the full service/characteristic/descriptor tree.
    pub async fn resolve<P>(&self, peripheral: &P) -> Result<Topology, ResolveError>
    where
        P: GattPeripheral + ?Sized,
    {
        resolve::resolve(peripheral).await
    }

    pub async fn services<P>(&self, peripheral: &P) -> Result<Vec<Service>, GattError>
    where
        P: GattPeripheral + ?Sized,
    {
        peripheral.services().await
    }

    pub async fn characteristics<P>(
        &self,
        peripheral: &P,
        service: &Service,
    ) -> Result<Vec<Characteristic>, GattError>
    where
        P: GattPeripheral + ?Sized,
    {
        peripheral.characteristics(service).await
    }

    pub async fn descriptors<P>(
        &self,
        peripheral: &P,
        characteristic: &Characteristic,
    ) -> Result<Vec<Descriptor>, GattError>
    where
        P: GattPeripheral + ?Sized,
    {
        peripheral.descriptors(characteristic).await
    }

    pub async fn read_characteristic<P>(
        &self,
        peripheral: &P,
        characteristic: &Characteristic,
    ) -> ReadOutcome
    where
        P: GattPeripheral + ?Sized,
    {
        io::read(
            peripheral,
            AttributeRef::Characteristic(characteristic),
            self.config.log_payloads,
        )
        .await
    }

    pub async fn write_characteristic<P>(
        &self,
        peripheral: &P,
        characteristic: &Characteristic,
        value: &[u8],
        with_response: bool,
    ) -> GattStatus
    where
        P: GattPeripheral + ?Sized,
    {
        io::write(
            peripheral,
            AttributeRef::Characteristic(characteristic),
            value,
            WriteKind::from_flag(with_response),
            self.config.log_payloads,
        )
        .await
    }

    pub async fn read_descriptor<P>(&self, peripheral: &P, descriptor: &Descriptor) -> ReadOutcome
    where
        P: GattPeripheral + ?Sized,
    {
        io::read(
            peripheral,
            AttributeRef::Descriptor(descriptor),
            self.config.log_payloads,
        )
        .await
    }

    pub async fn write_descriptor<P>(
        &self,
        peripheral: &P,
        descriptor: &Descriptor,
        value: &[u8],
        with_response: bool,
    ) -> GattStatus
    where
        P: GattPeripheral + ?Sized,
    {
        io::write(
            peripheral,
            AttributeRef::Descriptor(descriptor),
            value,
            WriteKind::from_flag(with_response),
            self.config.log_payloads,
        )
        .await
    }

    /// Arms `characteristic` and routes its value changes to `callback`.
    pub async fn start_notify<P, C>(
        &self,
        peripheral: &P,
        characteristic: &Characteristic,
        callback: C,
    ) -> GattStatus
    where
        P: GattPeripheral + ?Sized,
        C: NotificationCallback + 'static,
    {
        self.registry
            .start_notify(peripheral, characteristic, Arc::new(callback))
            .await
    }

    pub async fn stop_notify<P>(
        &self,
        peripheral: &P,
        characteristic: &Characteristic,
    ) -> GattStatus
    where
        P: GattPeripheral + ?Sized,
    {
        self.registry.stop_notify(peripheral, characteristic).await
    }
}
