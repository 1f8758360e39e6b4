//! Bridge configuration

/// How notification registrations are keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistryKey {
    /// Characteristic UUID only. Characteristics sharing a UUID across
    /// services share one registration.
    #[default]
    CharacteristicUuid,
    /// (service UUID, characteristic UUID) pair.
    ServiceAndCharacteristic,
}

/// Configuration for a [`Bridge`](crate::Bridge)
#[derive(Debug, Clone, Default)]
pub struct BridgeConfig {
    pub registry_key: RegistryKey,
    /// Include hex dumps of attribute values in trace logs
    pub log_payloads: bool,
}
