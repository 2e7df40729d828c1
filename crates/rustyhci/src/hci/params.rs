//! Command parameters and response decoding
//!
//! Command parameters are an ordered list of typed scalars and blobs,
//! serialized back to back in little-endian order. Responses are not
//! self-describing, so each opcode gets its own decoder in a
//! [`ResponseDecoders`] registry.

use crate::error::{HciError, Result};
use crate::hci::constants::HCI_MAX_PARAM_LEN;
use crate::hci::opcode::{self, OpCode};
use crate::hci::status::check_status;
use byteorder::{ByteOrder, LittleEndian};
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;

/// A single typed command or response parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Bytes(Vec<u8>),
}

impl Parameter {
    /// Number of bytes this value occupies on the wire
    pub fn wire_len(&self) -> usize {
        match self {
            Parameter::U8(_) | Parameter::I8(_) => 1,
            Parameter::U16(_) | Parameter::I16(_) => 2,
            Parameter::U32(_) | Parameter::I32(_) => 4,
            Parameter::U64(_) | Parameter::I64(_) => 8,
            Parameter::Bytes(b) => b.len(),
        }
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Parameter::U8(v) => out.push(*v),
            Parameter::I8(v) => out.push(*v as u8),
            Parameter::U16(v) => out.extend_from_slice(&v.to_le_bytes()),
            Parameter::I16(v) => out.extend_from_slice(&v.to_le_bytes()),
            Parameter::U32(v) => out.extend_from_slice(&v.to_le_bytes()),
            Parameter::I32(v) => out.extend_from_slice(&v.to_le_bytes()),
            Parameter::U64(v) => out.extend_from_slice(&v.to_le_bytes()),
            Parameter::I64(v) => out.extend_from_slice(&v.to_le_bytes()),
            Parameter::Bytes(b) => out.extend_from_slice(b),
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        match self {
            Parameter::U8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i8(&self) -> Option<i8> {
        match self {
            Parameter::I8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match self {
            Parameter::U16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Parameter::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),+) => {
        $(
            impl From<$ty> for Parameter {
                fn from(value: $ty) -> Self {
                    Parameter::$variant(value)
                }
            }
        )+
    };
}

impl_from_scalar!(
    u8 => U8, i8 => I8, u16 => U16, i16 => I16,
    u32 => U32, i32 => I32, u64 => U64, i64 => I64,
    Vec<u8> => Bytes
);

impl From<&[u8]> for Parameter {
    fn from(value: &[u8]) -> Self {
        Parameter::Bytes(value.to_vec())
    }
}

/// An ordered parameter list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters(Vec<Parameter>);

impl Parameters {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a value, builder style
    pub fn with(mut self, value: impl Into<Parameter>) -> Self {
        self.0.push(value.into());
        self
    }

    pub fn push(&mut self, value: impl Into<Parameter>) {
        self.0.push(value.into());
    }

    pub fn into_inner(self) -> Vec<Parameter> {
        self.0
    }

    /// Serializes every value in order.
    ///
    /// Fails with [`HciError::InvalidParamLength`] if the result would not
    /// fit the one-byte length field of a command.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let len: usize = self.0.iter().map(Parameter::wire_len).sum();
        if len > HCI_MAX_PARAM_LEN {
            return Err(HciError::InvalidParamLength(len));
        }

        let mut out = Vec::with_capacity(len);
        for param in &self.0 {
            param.write_to(&mut out);
        }
        Ok(out)
    }
}

impl Deref for Parameters {
    type Target = [Parameter];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Parameter>> for Parameters {
    fn from(value: Vec<Parameter>) -> Self {
        Self(value)
    }
}

impl FromIterator<Parameter> for Parameters {
    fn from_iter<T: IntoIterator<Item = Parameter>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Decodes the return parameters of one opcode's Command Complete event
pub type ResponseDecoder = Box<dyn Fn(&[u8]) -> Result<Parameters> + Send + Sync + 'static>;

/// Registry of per-opcode response decoders
pub struct ResponseDecoders {
    decoders: HashMap<OpCode, ResponseDecoder>,
}

impl ResponseDecoders {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// A registry holding the built-in decoders
    pub fn with_defaults() -> Self {
        let mut decoders = Self::new();
        decoders.register(opcode::RESET, decode_reset);
        decoders.register(opcode::READ_LOCAL_VERSION, decode_read_local_version);
        decoders.register(opcode::READ_BD_ADDR, decode_read_bd_addr);
        decoders.register(opcode::READ_RSSI, decode_read_rssi);
        decoders
    }

    /// Registers `decoder` for `opcode`, replacing any previous one
    pub fn register<F>(&mut self, opcode: OpCode, decoder: F)
    where
        F: Fn(&[u8]) -> Result<Parameters> + Send + Sync + 'static,
    {
        self.decoders.insert(opcode, Box::new(decoder));
    }

    pub fn contains(&self, opcode: OpCode) -> bool {
        self.decoders.contains_key(&opcode)
    }

    /// Decodes a Command Complete return payload for `opcode`
    pub fn decode(&self, opcode: OpCode, data: &[u8]) -> Result<Parameters> {
        match self.decoders.get(&opcode) {
            Some(decoder) => decoder(data),
            None => Err(HciError::UnknownOpcode(opcode)),
        }
    }
}

impl Default for ResponseDecoders {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for ResponseDecoders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut opcodes: Vec<_> = self.decoders.keys().collect();
        opcodes.sort();
        f.debug_struct("ResponseDecoders")
            .field("opcodes", &opcodes)
            .finish()
    }
}

fn require_len(opcode: OpCode, data: &[u8], expected: usize) -> Result<()> {
    if data.len() < expected {
        return Err(HciError::ResponseTooShort {
            opcode,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Status only
fn decode_reset(data: &[u8]) -> Result<Parameters> {
    require_len(opcode::RESET, data, 1)?;
    check_status(data[0])?;
    Ok(Parameters::new())
}

/// Status, HCI version, HCI revision, LMP version, manufacturer, LMP subversion
fn decode_read_local_version(data: &[u8]) -> Result<Parameters> {
    require_len(opcode::READ_LOCAL_VERSION, data, 9)?;
    check_status(data[0])?;
    Ok(Parameters::new()
        .with(data[1])
        .with(LittleEndian::read_u16(&data[2..4]))
        .with(data[4])
        .with(LittleEndian::read_u16(&data[5..7]))
        .with(LittleEndian::read_u16(&data[7..9])))
}

/// Status, BD_ADDR in wire order
fn decode_read_bd_addr(data: &[u8]) -> Result<Parameters> {
    require_len(opcode::READ_BD_ADDR, data, 7)?;
    check_status(data[0])?;
    Ok(Parameters::new().with(&data[1..7]))
}

/// Connection handle and RSSI (signed dBm), optionally led by a status byte.
/// A three byte payload carries no status.
fn decode_read_rssi(data: &[u8]) -> Result<Parameters> {
    require_len(opcode::READ_RSSI, data, 3)?;
    let body = if data.len() == 3 {
        data
    } else {
        check_status(data[0])?;
        &data[1..4]
    };
    Ok(Parameters::new()
        .with(LittleEndian::read_u16(&body[0..2]))
        .with(body[2] as i8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hci::status::StatusCode;

    #[test]
    fn test_serialize_each_width() {
        let params = Parameters::new()
            .with(0xABu8)
            .with(-2i8)
            .with(0x1234u16)
            .with(-2i16)
            .with(0x12345678u32)
            .with(-2i32)
            .with(0x0102030405060708u64)
            .with(-2i64)
            .with(vec![0xDE, 0xAD]);

        let bytes = params.to_bytes().unwrap();
        assert_eq!(
            bytes,
            vec![
                0xAB, // u8
                0xFE, // i8
                0x34, 0x12, // u16
                0xFE, 0xFF, // i16
                0x78, 0x56, 0x34, 0x12, // u32
                0xFE, 0xFF, 0xFF, 0xFF, // i32
                0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01, // u64
                0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // i64
                0xDE, 0xAD, // blob
            ]
        );
    }

    #[test]
    fn test_serialize_rejects_oversized() {
        let params = Parameters::new().with(vec![0u8; 255]);
        assert_eq!(params.to_bytes().unwrap().len(), 255);

        let params = Parameters::new().with(vec![0u8; 255]).with(0u8);
        assert!(matches!(
            params.to_bytes(),
            Err(HciError::InvalidParamLength(256))
        ));
    }

    #[test]
    fn test_unregistered_opcode_fails() {
        let decoders = ResponseDecoders::new();
        assert!(matches!(
            decoders.decode(opcode::READ_RSSI, &[0, 1, 0, 0xC4]),
            Err(HciError::UnknownOpcode(op)) if op == opcode::READ_RSSI
        ));
    }

    #[test]
    fn test_custom_decoder_registration() {
        let mut decoders = ResponseDecoders::new();
        let op = OpCode::new(0x3f, 0x0001);
        decoders.register(op, |data| Ok(Parameters::new().with(data.to_vec())));

        assert!(decoders.contains(op));
        let params = decoders.decode(op, &[1, 2, 3]).unwrap();
        assert_eq!(params[0].as_bytes(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_read_rssi_decoder() {
        let decoders = ResponseDecoders::with_defaults();
        let params = decoders
            .decode(opcode::READ_RSSI, &[0x00, 0x40, 0x00, 0xC4])
            .unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].as_u16(), Some(0x0040));
        assert_eq!(params[1].as_i8(), Some(-60));

        let err = decoders
            .decode(opcode::READ_RSSI, &[0x02, 0x40, 0x00, 0x00])
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::UnknownConnectionId));

        assert!(matches!(
            decoders.decode(opcode::READ_RSSI, &[0x00, 0x40]),
            Err(HciError::ResponseTooShort {
                expected: 3,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_read_rssi_decoder_without_status() {
        let decoders = ResponseDecoders::with_defaults();
        let params = decoders
            .decode(opcode::READ_RSSI, &[0x40, 0x00, 0xC4])
            .unwrap();
        assert_eq!(
            params.into_inner(),
            vec![Parameter::U16(0x0040), Parameter::I8(-60)]
        );
    }

    #[test]
    fn test_read_local_version_decoder() {
        let decoders = ResponseDecoders::with_defaults();
        let params = decoders
            .decode(
                opcode::READ_LOCAL_VERSION,
                &[0x00, 0x0B, 0x34, 0x12, 0x0B, 0x0F, 0x00, 0x78, 0x56],
            )
            .unwrap();
        assert_eq!(
            params.into_inner(),
            vec![
                Parameter::U8(0x0B),
                Parameter::U16(0x1234),
                Parameter::U8(0x0B),
                Parameter::U16(0x000F),
                Parameter::U16(0x5678),
            ]
        );
    }

    #[test]
    fn test_read_bd_addr_and_reset_decoders() {
        let decoders = ResponseDecoders::default();
        let params = decoders
            .decode(opcode::READ_BD_ADDR, &[0x00, 1, 2, 3, 4, 5, 6])
            .unwrap();
        assert_eq!(params[0].as_bytes(), Some(&[1u8, 2, 3, 4, 5, 6][..]));

        assert!(decoders.decode(opcode::RESET, &[0x00]).unwrap().is_empty());
        assert_eq!(
            decoders.decode(opcode::RESET, &[0x0C]).unwrap_err().status(),
            Some(StatusCode::CommandDisallowed)
        );
    }
}
