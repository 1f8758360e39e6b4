//! Attribute tree discovery
//!
//! Walks services, then each service's characteristics, then each
//! characteristic's descriptors. Queries are issued one at a time against
//! the connection; some stacks reject overlapping requests on a single link.

use log::debug;

use super::peripheral::GattPeripheral;
use super::types::Topology;
use crate::error::ResolveError;

/// Resolves the full attribute tree of `peripheral`.
///
/// Services keep the order the stack reports them in. Characteristics and
/// descriptors are flattened in service order. The first failing query
/// aborts the walk and nothing discovered so far is returned.
pub async fn resolve<P>(peripheral: &P) -> Result<Topology, ResolveError>
where
    P: GattPeripheral + ?Sized,
{
    let services = peripheral
        .services()
        .await
        .map_err(ResolveError::Services)?;

    let mut characteristics = Vec::new();
    let mut descriptors = Vec::new();

    for service in &services {
        let service_characteristics = peripheral.characteristics(service).await.map_err(|source| {
            ResolveError::Characteristics {
                service: service.uuid,
                source,
            }
        })?;

        for characteristic in &service_characteristics {
            let found = peripheral.descriptors(characteristic).await.map_err(|source| {
                ResolveError::Descriptors {
                    characteristic: characteristic.uuid,
                    source,
                }
            })?;
            descriptors.extend(found);
        }

        debug!(
            "service {} (0x{:04X}): {} characteristics",
            service.uuid,
            service.handle,
            service_characteristics.len()
        );
        characteristics.extend(service_characteristics);
    }

    debug!(
        "resolved {} services, {} characteristics, {} descriptors",
        services.len(),
        characteristics.len(),
        descriptors.len()
    );

    Ok(Topology {
        services,
        characteristics,
        descriptors,
    })
}
