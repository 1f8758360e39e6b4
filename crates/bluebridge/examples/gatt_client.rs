use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bluebridge::gatt::{AttributeRef, CacheMode, WriteKind};
use bluebridge::{
    AttributeBuffer, Bridge, CccdValue, Characteristic, CharacteristicProperties, Descriptor,
    GattError, GattPeripheral, Service, SubscribeError, Uuid, ValueChangedHandler, WriteBuffer,
};

/// A battery sensor held in memory in place of a host BLE stack.
struct BatterySensor {
    service: Service,
    level: Characteristic,
    cccd: Descriptor,
    values: Mutex<HashMap<u16, Vec<u8>>>,
    handler: Mutex<Option<Arc<dyn ValueChangedHandler>>>,
}

impl BatterySensor {
    fn new() -> Self {
        let service = Service {
            uuid: Uuid::from_u16(0x180F),
            handle: 0x0001,
        };
        let level = Characteristic {
            uuid: Uuid::from_u16(0x2A19),
            service_uuid: service.uuid,
            service_handle: service.handle,
            handle: 0x0003,
            properties: CharacteristicProperties::READ | CharacteristicProperties::NOTIFY,
        };
        let cccd = Descriptor {
            uuid: bluebridge::uuid::CLIENT_CHARACTERISTIC_CONFIGURATION,
            characteristic_handle: level.handle,
            handle: 0x0004,
        };
        let values = HashMap::from([(level.handle, vec![87]), (cccd.handle, vec![0, 0])]);
        BatterySensor {
            service,
            level,
            cccd,
            values: Mutex::new(values),
            handler: Mutex::new(None),
        }
    }

    fn drain_battery(&self, level: u8) {
        self.values.lock().unwrap().insert(self.level.handle, vec![level]);
        let handler = self.handler.lock().unwrap().clone();
        if let Some(handler) = handler {
            handler.value_changed(&self.level, AttributeBuffer::new(vec![level]));
        }
    }
}

#[async_trait]
impl GattPeripheral for BatterySensor {
    async fn services(&self) -> Result<Vec<Service>, GattError> {
        Ok(vec![self.service.clone()])
    }

    async fn characteristics(&self, _service: &Service) -> Result<Vec<Characteristic>, GattError> {
        Ok(vec![self.level.clone()])
    }

    async fn descriptors(&self, _c: &Characteristic) -> Result<Vec<Descriptor>, GattError> {
        Ok(vec![self.cccd.clone()])
    }

    async fn read_value(
        &self,
        attribute: AttributeRef<'_>,
        _cache_mode: CacheMode,
    ) -> Result<AttributeBuffer, GattError> {
        let values = self.values.lock().unwrap();
        values
            .get(&attribute.handle())
            .cloned()
            .map(AttributeBuffer::new)
            .ok_or(GattError::ProtocolError(Some(0x0A)))
    }

    async fn write_value(
        &self,
        attribute: AttributeRef<'_>,
        value: WriteBuffer,
        _kind: WriteKind,
    ) -> Result<(), GattError> {
        self.values
            .lock()
            .unwrap()
            .insert(attribute.handle(), value.into_bytes());
        Ok(())
    }

    async fn write_cccd(&self, _c: &Characteristic, value: CccdValue) -> Result<(), GattError> {
        self.values
            .lock()
            .unwrap()
            .insert(self.cccd.handle, value.to_bytes().to_vec());
        Ok(())
    }

    fn attach_value_changed(
        &self,
        _c: &Characteristic,
        handler: Arc<dyn ValueChangedHandler>,
    ) -> Result<(), SubscribeError> {
        *self.handler.lock().unwrap() = Some(handler);
        Ok(())
    }

    fn detach_value_changed(&self, _c: &Characteristic) {
        self.handler.lock().unwrap().take();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sensor = BatterySensor::new();
    let bridge = Bridge::new();

    println!("Resolving attributes...");
    let topology = bridge.resolve(&sensor).await?;
    for service in &topology.services {
        println!("Service: UUID = {}", service.uuid);
    }

    for characteristic in &topology.characteristics {
        println!("  Characteristic: UUID = {}", characteristic.uuid);
        if characteristic.properties.can_read() {
            let outcome = bridge.read_characteristic(&sensor, characteristic).await;
            println!("    Value: {:?} ({})", outcome.value, outcome.status);
        }
    }

    let level = &topology.characteristics[0];
    let status = bridge
        .start_notify(&sensor, level, |c: &Characteristic, value: &[u8]| {
            println!("  Notification from {}: {:?}", c.uuid, value);
        })
        .await;
    println!("Start notify: {}", status);

    for cccd in topology.descriptors.iter().filter(|d| d.is_cccd()) {
        let outcome = bridge.read_descriptor(&sensor, cccd).await;
        println!("  CCCD now {:?}", CccdValue::from_bytes(&outcome.value));
    }

    sensor.drain_battery(86);
    sensor.drain_battery(85);

    println!("Stop notify: {}", bridge.stop_notify(&sensor, level).await);
    sensor.drain_battery(84);

    println!("Done!");
    Ok(())
}
