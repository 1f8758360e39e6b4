//! Error and status types for the bridge
//!
//! Failures are returned as values. `GattStatus` is the flat status surfaced
//! to callers; `GattError` is its failure half and is what the peripheral
//! seam reports.

use std::fmt;

use thiserror::Error;

// ATT error codes that carry a meaning beyond "protocol error"
const ATT_ERROR_READ_NOT_PERMITTED: u8 = 0x02;
const ATT_ERROR_WRITE_NOT_PERMITTED: u8 = 0x03;
const ATT_ERROR_INSUFFICIENT_AUTHENTICATION: u8 = 0x05;
const ATT_ERROR_INSUFFICIENT_AUTHORIZATION: u8 = 0x08;
const ATT_ERROR_INSUFFICIENT_ENCRYPTION_KEY_SIZE: u8 = 0x0C;
const ATT_ERROR_INSUFFICIENT_ENCRYPTION: u8 = 0x0F;
const ATT_ERROR_INSUFFICIENT_RESOURCES: u8 = 0x11;

/// Communication status of a GATT operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GattStatus {
    Success,
    Unreachable,
    AccessDenied,
    ProtocolError,
    InsufficientResources,
}

impl GattStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, GattStatus::Success)
    }
}

impl fmt::Display for GattStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GattStatus::Success => "success",
            GattStatus::Unreachable => "unreachable",
            GattStatus::AccessDenied => "access denied",
            GattStatus::ProtocolError => "protocol error",
            GattStatus::InsufficientResources => "insufficient resources",
        };
        f.write_str(name)
    }
}

/// A failed GATT operation as reported by the peripheral stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GattError {
    #[error("peripheral unreachable")]
    Unreachable,

    #[error("access denied")]
    AccessDenied,

    /// The optional byte is the ATT error code returned by the peripheral.
    #[error("protocol error{}", att_code_suffix(.0))]
    ProtocolError(Option<u8>),

    #[error("insufficient resources")]
    InsufficientResources,
}

fn att_code_suffix(code: &Option<u8>) -> String {
    match code {
        Some(code) => format!(" (ATT 0x{:02X})", code),
        None => String::new(),
    }
}

impl GattError {
    /// Classifies an ATT Error Response code.
    pub fn from_att_code(code: u8) -> Self {
        match code {
            ATT_ERROR_READ_NOT_PERMITTED
            | ATT_ERROR_WRITE_NOT_PERMITTED
            | ATT_ERROR_INSUFFICIENT_AUTHENTICATION
            | ATT_ERROR_INSUFFICIENT_AUTHORIZATION
            | ATT_ERROR_INSUFFICIENT_ENCRYPTION_KEY_SIZE
            | ATT_ERROR_INSUFFICIENT_ENCRYPTION => GattError::AccessDenied,
            ATT_ERROR_INSUFFICIENT_RESOURCES => GattError::InsufficientResources,
            _ => GattError::ProtocolError(Some(code)),
        }
    }

    pub fn status(&self) -> GattStatus {
        match self {
            GattError::Unreachable => GattStatus::Unreachable,
            GattError::AccessDenied => GattStatus::AccessDenied,
            GattError::ProtocolError(_) => GattStatus::ProtocolError,
            GattError::InsufficientResources => GattStatus::InsufficientResources,
        }
    }
}

impl From<GattError> for GattStatus {
    fn from(err: GattError) -> Self {
        err.status()
    }
}

impl<T> From<Result<T, GattError>> for GattStatus {
    fn from(result: Result<T, GattError>) -> Self {
        match result {
            Ok(_) => GattStatus::Success,
            Err(err) => err.status(),
        }
    }
}

/// Failure to attach a value-changed handler to a characteristic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscribeError {
    /// The local stack refused the subscription even though the
    /// peripheral accepted the configuration write.
    #[error("not authorized to subscribe to value changes")]
    Unauthorized,
}

/// Failure of a topology walk, tagged with the level that failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("failed to query services: {0}")]
    Services(#[source] GattError),

    #[error("failed to query characteristics of service {service}: {source}")]
    Characteristics {
        service: crate::Uuid,
        #[source]
        source: GattError,
    },

    #[error("failed to query descriptors of characteristic {characteristic}: {source}")]
    Descriptors {
        characteristic: crate::Uuid,
        #[source]
        source: GattError,
    },
}

impl ResolveError {
    pub fn gatt_error(&self) -> GattError {
        match self {
            ResolveError::Services(err) => *err,
            ResolveError::Characteristics { source, .. } => *source,
            ResolveError::Descriptors { source, .. } => *source,
        }
    }

    /// The status surfaced to the caller for an aborted resolution.
    pub fn status(&self) -> GattStatus {
        self.gatt_error().status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_att_codes_classify() {
        assert_eq!(GattError::from_att_code(0x02), GattError::AccessDenied);
        assert_eq!(GattError::from_att_code(0x0F), GattError::AccessDenied);
        assert_eq!(
            GattError::from_att_code(0x11),
            GattError::InsufficientResources
        );
        assert_eq!(
            GattError::from_att_code(0x0D),
            GattError::ProtocolError(Some(0x0D))
        );
    }

    #[test]
    fn test_status_from_result() {
        assert_eq!(GattStatus::from(Ok::<(), GattError>(())), GattStatus::Success);
        assert_eq!(
            GattStatus::from(Err::<(), _>(GattError::ProtocolError(None))),
            GattStatus::ProtocolError
        );
        assert!(!GattStatus::Unreachable.is_success());
    }

    #[test]
    fn test_protocol_error_display_includes_att_code() {
        assert_eq!(
            GattError::ProtocolError(Some(0x0D)).to_string(),
            "protocol error (ATT 0x0D)"
        );
        assert_eq!(GattError::ProtocolError(None).to_string(), "protocol error");
    }

    #[test]
    fn test_resolve_error_surfaces_first_failure() {
        let err = ResolveError::Characteristics {
            service: crate::Uuid::from_u16(0x180F),
            source: GattError::Unreachable,
        };
        assert_eq!(err.status(), GattStatus::Unreachable);
    }
}
