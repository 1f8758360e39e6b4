//! Bluetooth UUIDs
//!
//! Every attribute the bridge hands out is identified by a 128-bit UUID.
//! SIG-assigned attributes use 16-bit or 32-bit short forms which expand
//! against the Bluetooth base UUID `00000000-0000-1000-8000-00805F9B34FB`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A 128-bit Bluetooth UUID, stored little-endian as it travels over ATT.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Uuid {
    bytes: [u8; 16],
}

const BASE_UUID_BYTES: [u8; 16] = [
    0xFB, 0x34, 0x9B, 0x5F, 0x80, 0x00, 0x00, 0x80, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Offset within the base UUID where the 16/32-bit value is inserted.
const BASE_OFFSET: usize = 12;

/// Primary Service declaration (0x2800)
pub const PRIMARY_SERVICE: Uuid = Uuid::from_u16(0x2800);
/// Characteristic declaration (0x2803)
pub const CHARACTERISTIC_DECLARATION: Uuid = Uuid::from_u16(0x2803);
/// Client Characteristic Configuration Descriptor (0x2902)
pub const CLIENT_CHARACTERISTIC_CONFIGURATION: Uuid = Uuid::from_u16(0x2902);

impl Uuid {
    /// Creates a UUID from 16 big-endian bytes (textual order).
    pub fn from_bytes_be(mut bytes: [u8; 16]) -> Self {
        bytes.reverse();
        Uuid { bytes }
    }

    /// Expands a 16-bit SIG-assigned value against the base UUID.
    pub const fn from_u16(uuid16: u16) -> Self {
        Self::from_u32(uuid16 as u32)
    }

    /// Expands a 32-bit SIG-assigned value against the base UUID.
    pub const fn from_u32(uuid32: u32) -> Self {
        let mut bytes = BASE_UUID_BYTES;
        let short = uuid32.to_le_bytes();
        bytes[BASE_OFFSET] = short[0];
        bytes[BASE_OFFSET + 1] = short[1];
        bytes[BASE_OFFSET + 2] = short[2];
        bytes[BASE_OFFSET + 3] = short[3];
        Uuid { bytes }
    }

    fn is_sig_assigned(&self) -> bool {
        self.bytes[..BASE_OFFSET] == BASE_UUID_BYTES[..BASE_OFFSET]
    }

    /// Returns the 16-bit short form if this is a SIG-assigned 16-bit UUID.
    pub fn as_u16(&self) -> Option<u16> {
        self.as_u32().and_then(|value| u16::try_from(value).ok())
    }

    /// Returns the 32-bit short form if this UUID derives from the base UUID.
    pub fn as_u32(&self) -> Option<u32> {
        if !self.is_sig_assigned() {
            return None;
        }
        Some(u32::from_le_bytes([
            self.bytes[BASE_OFFSET],
            self.bytes[BASE_OFFSET + 1],
            self.bytes[BASE_OFFSET + 2],
            self.bytes[BASE_OFFSET + 3],
        ]))
    }
}

impl From<u16> for Uuid {
    fn from(uuid16: u16) -> Self {
        Uuid::from_u16(uuid16)
    }
}

impl From<u32> for Uuid {
    fn from(uuid32: u32) -> Self {
        Uuid::from_u32(uuid32)
    }
}

impl PartialEq<u16> for Uuid {
    fn eq(&self, other: &u16) -> bool {
        self.as_u16() == Some(*other)
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bytes_be = self.bytes;
        bytes_be.reverse();
        let b = hex::encode(bytes_be);
        write!(
            f,
            "{}-{}-{}-{}-{}",
            &b[0..8],
            &b[8..12],
            &b[12..16],
            &b[16..20],
            &b[20..32]
        )
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_u32() {
            Some(short) if short <= u16::MAX as u32 => write!(f, "Uuid(0x{:04X})", short),
            Some(short) => write!(f, "Uuid(0x{:08X})", short),
            None => write!(f, "Uuid({})", self),
        }
    }
}

/// Errors produced while parsing a textual UUID
#[derive(Debug, Error, PartialEq)]
pub enum UuidParseError {
    #[error("UUID must have 4, 8 or 32 hex digits, found {0}")]
    InvalidLength(usize),

    #[error("misplaced hyphen in UUID")]
    InvalidFormat,

    #[error("invalid hex in UUID: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl FromStr for Uuid {
    type Err = UuidParseError;

    /// Accepts `180A`, `0000180A`, a bare 32-digit form, or the hyphenated
    /// 8-4-4-4-12 form. Hex digits are case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('-') {
            let groups: Vec<usize> = s.split('-').map(str::len).collect();
            if groups != [8, 4, 4, 4, 12] {
                return Err(UuidParseError::InvalidFormat);
            }
        }
        let digits: String = s.chars().filter(|c| *c != '-').collect();

        match digits.len() {
            4 => {
                let mut short = [0u8; 2];
                hex::decode_to_slice(&digits, &mut short)?;
                Ok(Uuid::from_u16(u16::from_be_bytes(short)))
            }
            8 => {
                let mut short = [0u8; 4];
                hex::decode_to_slice(&digits, &mut short)?;
                Ok(Uuid::from_u32(u32::from_be_bytes(short)))
            }
            32 => {
                let mut bytes_be = [0u8; 16];
                hex::decode_to_slice(&digits, &mut bytes_be)?;
                Ok(Uuid::from_bytes_be(bytes_be))
            }
            other => Err(UuidParseError::InvalidLength(other)),
        }
    }
}
