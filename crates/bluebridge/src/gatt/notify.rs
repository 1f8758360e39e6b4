//! Notification and indication subscriptions
//!
//! The registry maps characteristic identity to a callback. Arming writes the
//! characteristic's CCCD first and only then records the callback and
//! attaches one shared dispatcher to the characteristic's value-changed
//! event. Every event funnels through [`NotificationRegistry::dispatch`].
//!
//! The lock around the mapping is held for insert/remove/lookup only. CCCD
//! writes and callback invocations happen outside it.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, trace, warn};

use super::codec::{self, AttributeBuffer};
use super::peripheral::{GattPeripheral, ValueChangedHandler};
use super::types::{CccdValue, Characteristic};
use crate::config::RegistryKey;
use crate::error::{GattStatus, SubscribeError};
use crate::uuid::Uuid;

/// Receives decoded values pushed by a characteristic.
pub trait NotificationCallback: Send + Sync {
    fn receive(&self, characteristic: &Characteristic, value: &[u8]);
}

impl<F> NotificationCallback for F
where
    F: Fn(&Characteristic, &[u8]) + Send + Sync,
{
    fn receive(&self, characteristic: &Characteristic, value: &[u8]) {
        self(characteristic, value)
    }
}

/// Identity of a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationKey {
    /// Only set when registrations are keyed per service.
    pub service: Option<Uuid>,
    pub characteristic: Uuid,
}

impl RegistrationKey {
    pub fn new(characteristic: &Characteristic, keying: RegistryKey) -> Self {
        let service = match keying {
            RegistryKey::CharacteristicUuid => None,
            RegistryKey::ServiceAndCharacteristic => Some(characteristic.service_uuid),
        };
        RegistrationKey {
            service,
            characteristic: characteristic.uuid,
        }
    }
}

impl fmt::Display for RegistrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.service {
            Some(service) => write!(f, "{}/{}", service, self.characteristic),
            None => write!(f, "{}", self.characteristic),
        }
    }
}

#[derive(Default)]
struct Registrations {
    callbacks: HashMap<RegistrationKey, Arc<dyn NotificationCallback>>,
    /// Native handles of characteristics with the dispatcher attached.
    attached: HashSet<u16>,
}

/// The single handler attached to every armed characteristic.
struct Dispatcher {
    keying: RegistryKey,
    log_payloads: bool,
    registrations: Arc<Mutex<Registrations>>,
}

impl Dispatcher {
    fn dispatch(&self, characteristic: &Characteristic, buffer: AttributeBuffer) {
        let value = codec::decode(buffer);
        let key = RegistrationKey::new(characteristic, self.keying);

        let callback = lock(&self.registrations).callbacks.get(&key).cloned();
        match callback {
            Some(callback) => {
                if self.log_payloads {
                    trace!("value changed on {}: {}", key, hex::encode(&value));
                } else {
                    trace!("value changed on {}: {} bytes", key, value.len());
                }
                callback.receive(characteristic, &value);
            }
            None => trace!("dropping value change on {}: no registration", key),
        }
    }
}

impl ValueChangedHandler for Dispatcher {
    fn value_changed(&self, characteristic: &Characteristic, value: AttributeBuffer) {
        self.dispatch(characteristic, value);
    }
}

fn lock(registrations: &Mutex<Registrations>) -> MutexGuard<'_, Registrations> {
    registrations.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Per-characteristic notification registry
pub struct NotificationRegistry {
    keying: RegistryKey,
    registrations: Arc<Mutex<Registrations>>,
    dispatcher: Arc<Dispatcher>,
}

impl NotificationRegistry {
    pub fn new(keying: RegistryKey, log_payloads: bool) -> Self {
        let registrations = Arc::new(Mutex::new(Registrations::default()));
        let dispatcher = Arc::new(Dispatcher {
            keying,
            log_payloads,
            registrations: Arc::clone(&registrations),
        });
        NotificationRegistry {
            keying,
            registrations,
            dispatcher,
        }
    }

    pub fn keying(&self) -> RegistryKey {
        self.keying
    }

    /// Arms notifications or indications on `characteristic`.
    ///
    /// Indicate is used when the characteristic advertises it, otherwise
    /// notify; with neither the CCCD is written with `None`. A failed CCCD
    /// write leaves the characteristic unarmed and returns its status.
    /// `AccessDenied` is returned when the peripheral accepted the CCCD but
    /// the local stack refused the value-changed subscription. A successful
    /// call replaces any callback already registered under the same key.
    pub async fn start_notify<P>(
        &self,
        peripheral: &P,
        characteristic: &Characteristic,
        callback: Arc<dyn NotificationCallback>,
    ) -> GattStatus
    where
        P: GattPeripheral + ?Sized,
    {
        let key = RegistrationKey::new(characteristic, self.keying);
        let cccd = CccdValue::for_properties(characteristic.properties);
        debug!("arming {} with CCCD {:?}", key, cccd);

        if let Err(err) = peripheral.write_cccd(characteristic, cccd).await {
            debug!("CCCD write for {} failed: {}", key, err);
            return err.status();
        }

        let needs_attach = !lock(&self.registrations)
            .attached
            .contains(&characteristic.handle);
        if needs_attach {
            let handler: Arc<dyn ValueChangedHandler> = self.dispatcher.clone();
            if let Err(SubscribeError::Unauthorized) =
                peripheral.attach_value_changed(characteristic, handler)
            {
                warn!(
                    "{} accepted CCCD {:?} but value-changed subscription was refused",
                    key, cccd
                );
                return GattStatus::AccessDenied;
            }
        }

        let mut registrations = lock(&self.registrations);
        registrations.attached.insert(characteristic.handle);
        if registrations.callbacks.insert(key, callback).is_some() {
            debug!("replaced existing registration for {}", key);
        }
        GattStatus::Success
    }

    /// Disarms `characteristic`. On failure the registration is untouched.
    pub async fn stop_notify<P>(
        &self,
        peripheral: &P,
        characteristic: &Characteristic,
    ) -> GattStatus
    where
        P: GattPeripheral + ?Sized,
    {
        let key = RegistrationKey::new(characteristic, self.keying);

        if let Err(err) = peripheral.write_cccd(characteristic, CccdValue::None).await {
            debug!("CCCD clear for {} failed: {}", key, err);
            return err.status();
        }

        let was_attached = {
            let mut registrations = lock(&self.registrations);
            registrations.callbacks.remove(&key);
            registrations.attached.remove(&characteristic.handle)
        };
        if was_attached {
            peripheral.detach_value_changed(characteristic);
        }
        debug!("disarmed {}", key);
        GattStatus::Success
    }

    /// Routes a value pushed by `characteristic` to its callback, if any.
    pub fn dispatch(&self, characteristic: &Characteristic, value: AttributeBuffer) {
        self.dispatcher.dispatch(characteristic, value);
    }

    pub fn is_registered(&self, characteristic: &Characteristic) -> bool {
        let key = RegistrationKey::new(characteristic, self.keying);
        lock(&self.registrations).callbacks.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        lock(&self.registrations).callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for NotificationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registrations = lock(&self.registrations);
        f.debug_struct("NotificationRegistry")
            .field("keying", &self.keying)
            .field("registered", &registrations.callbacks.keys().collect::<Vec<_>>())
            .field("attached", &registrations.attached.len())
            .finish()
    }
}
