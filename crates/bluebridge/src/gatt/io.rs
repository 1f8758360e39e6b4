//! Reads and writes against characteristic values and descriptors
//!
//! Both attribute kinds share the same semantics. Reads always bypass the
//! attribute cache. Failures come back as statuses, never as errors.

use log::trace;

use super::codec;
use super::peripheral::GattPeripheral;
use super::types::{AttributeRef, CacheMode, ReadOutcome, WriteKind};
use crate::error::GattStatus;

/// Reads `attribute` from the peripheral.
///
/// On failure the outcome carries the failing status and an empty value.
pub async fn read<P>(
    peripheral: &P,
    attribute: AttributeRef<'_>,
    log_payloads: bool,
) -> ReadOutcome
where
    P: GattPeripheral + ?Sized,
{
    match peripheral.read_value(attribute, CacheMode::Uncached).await {
        Ok(buffer) => {
            let value = codec::decode(buffer);
            trace!(
                "read {} {} (0x{:04X}): {} bytes{}",
                attribute.kind(),
                attribute.uuid(),
                attribute.handle(),
                value.len(),
                payload_suffix(&value, log_payloads)
            );
            ReadOutcome::success(value)
        }
        Err(err) => {
            trace!(
                "read {} {} (0x{:04X}) failed: {}",
                attribute.kind(),
                attribute.uuid(),
                attribute.handle(),
                err
            );
            ReadOutcome::failure(err.status())
        }
    }
}

/// Writes `value` to `attribute`.
///
/// With a response the returned status is the peripheral's. Without one it
/// is the local submission status.
pub async fn write<P>(
    peripheral: &P,
    attribute: AttributeRef<'_>,
    value: &[u8],
    kind: WriteKind,
    log_payloads: bool,
) -> GattStatus
where
    P: GattPeripheral + ?Sized,
{
    let buffer = codec::encode(value);
    let result = peripheral.write_value(attribute, buffer, kind).await;
    let status = GattStatus::from(result);
    trace!(
        "write {} {} (0x{:04X}) {:?}: {} bytes{} -> {}",
        attribute.kind(),
        attribute.uuid(),
        attribute.handle(),
        kind,
        value.len(),
        payload_suffix(value, log_payloads),
        status
    );
    status
}

fn payload_suffix(value: &[u8], log_payloads: bool) -> String {
    if log_payloads {
        format!(" [{}]", hex::encode(value))
    } else {
        String::new()
    }
}
