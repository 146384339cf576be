//! # Record Serialization
//!
//! Typed field reader/writer over a byte stream.
//!
//! ## Design
//!
//! - Little-endian fixed-width integers
//! - Strings are raw bytes behind a one-byte length, copied byte for byte
//! - Records decode all-or-nothing: a short stream yields an error and no fields

use thiserror::Error;

/// Longest payload a `DYNAMIC_LEN_STR_8` field can carry.
pub const MAX_STR8_LEN: usize = u8::MAX as usize;

/// Primitive field kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// One unsigned byte.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Unsigned 32-bit integer.
    U32,
    /// Signed 32-bit integer.
    I32,
    /// One length byte followed by that many raw bytes.
    DynamicLenStr8,
}

impl FieldKind {
    /// Encoded size of a fixed-width kind. `None` for strings.
    #[must_use]
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            Self::U8 => Some(1),
            Self::U16 => Some(2),
            Self::U32 | Self::I32 => Some(4),
            Self::DynamicLenStr8 => None,
        }
    }
}

/// A decoded (or to-be-encoded) field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// `UINT8`
    U8(u8),
    /// `UINT16`
    U16(u16),
    /// `UINT32`
    U32(u32),
    /// `INT32`
    I32(i32),
    /// `DYNAMIC_LEN_STR_8`
    DynamicLenStr8(Vec<u8>),
}

impl FieldValue {
    /// The kind of this value.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::U8(_) => FieldKind::U8,
            Self::U16(_) => FieldKind::U16,
            Self::U32(_) => FieldKind::U32,
            Self::I32(_) => FieldKind::I32,
            Self::DynamicLenStr8(_) => FieldKind::DynamicLenStr8,
        }
    }
}

/// Errors raised while encoding or decoding records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// The stream ended inside a field. The whole record is dropped.
    #[error("malformed record: field {field} ({kind:?}) needs {needed} bytes, {remaining} left")]
    Truncated {
        /// Position of the field in the record.
        field: usize,
        /// Kind being read.
        kind: FieldKind,
        /// Bytes the field needed.
        needed: usize,
        /// Bytes left in the stream.
        remaining: usize,
    },

    /// A string longer than a `DYNAMIC_LEN_STR_8` can describe.
    #[error("string of {len} bytes exceeds the {max} byte limit", max = MAX_STR8_LEN)]
    StringTooLong {
        /// Actual length.
        len: usize,
    },

    /// A field was read as a different kind than the record declares.
    #[error("field {field}: expected {expected:?}, found {found:?}")]
    KindMismatch {
        /// Position of the field in the record.
        field: usize,
        /// Kind the caller asked for.
        expected: FieldKind,
        /// Kind actually present.
        found: FieldKind,
    },
}

/// Record writer - appends fields to a growable buffer.
///
/// Reuse one writer across records with [`reset`](Self::reset) to keep the allocation.
#[derive(Clone, Debug, Default)]
pub struct WireWriter {
    buffer: Vec<u8>,
}

impl WireWriter {
    /// Creates an empty writer.
    #[must_use]
    pub const fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Creates an empty writer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Resets the writer for reuse.
    #[inline]
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Returns the number of bytes written.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no bytes have been written.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns a slice of the written data.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes the writer, returning the written data.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Writes a u16 in little-endian format.
    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a u32 in little-endian format.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes an i32 in little-endian format.
    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a length byte followed by the raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::StringTooLong`] for more than 255 bytes; nothing is written.
    pub fn write_str8(&mut self, bytes: &[u8]) -> Result<(), WireError> {
        let len = u8::try_from(bytes.len()).map_err(|_| WireError::StringTooLong { len: bytes.len() })?;
        self.buffer.push(len);
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// Writes one field.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::StringTooLong`] for an oversized string.
    pub fn write_value(&mut self, value: &FieldValue) -> Result<(), WireError> {
        match value {
            FieldValue::U8(v) => self.write_u8(*v),
            FieldValue::U16(v) => self.write_u16(*v),
            FieldValue::U32(v) => self.write_u32(*v),
            FieldValue::I32(v) => self.write_i32(*v),
            FieldValue::DynamicLenStr8(bytes) => self.write_str8(bytes)?,
        }
        Ok(())
    }

    /// Writes every field in order. On error the writer is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::StringTooLong`] for an oversized string.
    pub fn write_record(&mut self, values: &[FieldValue]) -> Result<(), WireError> {
        let start = self.buffer.len();
        for value in values {
            if let Err(e) = self.write_value(value) {
                self.buffer.truncate(start);
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Record reader - reads fields from a borrowed buffer.
pub struct WireReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> WireReader<'a> {
    /// Creates a new reader over a buffer.
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, position: 0 }
    }

    /// Returns the number of bytes remaining.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Returns the read position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        if self.remaining() < len {
            return None;
        }
        let bytes = &self.buffer[self.position..self.position + len];
        self.position += len;
        Some(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.take(N)?.try_into().ok()
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Option<u8> {
        self.take_array::<1>().map(|[b]| b)
    }

    /// Reads a u16 in little-endian format.
    #[inline]
    pub fn read_u16(&mut self) -> Option<u16> {
        self.take_array().map(u16::from_le_bytes)
    }

    /// Reads a u32 in little-endian format.
    #[inline]
    pub fn read_u32(&mut self) -> Option<u32> {
        self.take_array().map(u32::from_le_bytes)
    }

    /// Reads an i32 in little-endian format.
    #[inline]
    pub fn read_i32(&mut self) -> Option<i32> {
        self.take_array().map(i32::from_le_bytes)
    }

    /// Reads a length-prefixed string. The position is unchanged on failure.
    pub fn read_str8(&mut self) -> Option<&'a [u8]> {
        let start = self.position;
        let len = usize::from(self.read_u8()?);
        let bytes = self.take(len);
        if bytes.is_none() {
            self.position = start;
        }
        bytes
    }

    /// Reads one field of the given kind.
    pub fn read_field(&mut self, kind: FieldKind) -> Option<FieldValue> {
        match kind {
            FieldKind::U8 => self.read_u8().map(FieldValue::U8),
            FieldKind::U16 => self.read_u16().map(FieldValue::U16),
            FieldKind::U32 => self.read_u32().map(FieldValue::U32),
            FieldKind::I32 => self.read_i32().map(FieldValue::I32),
            FieldKind::DynamicLenStr8 => self
                .read_str8()
                .map(|bytes| FieldValue::DynamicLenStr8(bytes.to_vec())),
        }
    }

    /// Reads a whole record, strictly in the declared order.
    ///
    /// Either every field is returned, or none: on failure the reader is rewound to
    /// where the record started.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Truncated`] naming the first field that ran out of bytes.
    pub fn read_record(&mut self, kinds: &[FieldKind]) -> Result<Vec<FieldValue>, WireError> {
        let start = self.position;
        let mut values = Vec::with_capacity(kinds.len());

        for (field, &kind) in kinds.iter().enumerate() {
            let remaining = self.remaining();
            if let Some(value) = self.read_field(kind) {
                values.push(value);
            } else {
                let needed = kind.fixed_size().unwrap_or_else(|| {
                    // Length byte plus whatever it announces.
                    1 + self.buffer.get(self.position).map_or(0, |&len| usize::from(len))
                });
                self.position = start;
                return Err(WireError::Truncated {
                    field,
                    kind,
                    needed,
                    remaining,
                });
            }
        }

        Ok(values)
    }
}

/// Typed cursor over the fields of a decoded record.
///
/// ```rust
/// use warden_networking::{FieldKind, RecordFields, WireReader, WireWriter};
///
/// let mut writer = WireWriter::new();
/// writer.write_u16(7);
/// writer.write_str8(b"ok").unwrap();
///
/// let values = WireReader::new(writer.as_slice())
///     .read_record(&[FieldKind::U16, FieldKind::DynamicLenStr8])
///     .unwrap();
/// let mut fields = RecordFields::new(values);
/// assert_eq!(fields.u16().unwrap(), 7);
/// assert_eq!(fields.str8().unwrap(), b"ok");
/// ```
pub struct RecordFields {
    values: std::vec::IntoIter<FieldValue>,
    field: usize,
}

impl RecordFields {
    /// Wraps the output of [`WireReader::read_record`].
    #[must_use]
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self {
            values: values.into_iter(),
            field: 0,
        }
    }

    /// Position of the next field.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.field
    }

    /// Takes the next field, handing it to `extract`; `None` from `extract` means the
    /// field has another kind.
    fn next_value<V>(
        &mut self,
        expected: FieldKind,
        extract: fn(FieldValue) -> Option<V>,
    ) -> Result<V, WireError> {
        let field = self.field;
        self.field += 1;
        let value = self.values.next().ok_or(WireError::Truncated {
            field,
            kind: expected,
            needed: expected.fixed_size().unwrap_or(1),
            remaining: 0,
        })?;
        let found = value.kind();
        extract(value).ok_or(WireError::KindMismatch {
            field,
            expected,
            found,
        })
    }

    /// Next field as `UINT8`.
    ///
    /// # Errors
    ///
    /// Fails if the record is exhausted or the field has another kind.
    pub fn u8(&mut self) -> Result<u8, WireError> {
        self.next_value(FieldKind::U8, |value| match value {
            FieldValue::U8(v) => Some(v),
            _ => None,
        })
    }

    /// Next field as `UINT16`.
    ///
    /// # Errors
    ///
    /// Fails if the record is exhausted or the field has another kind.
    pub fn u16(&mut self) -> Result<u16, WireError> {
        self.next_value(FieldKind::U16, |value| match value {
            FieldValue::U16(v) => Some(v),
            _ => None,
        })
    }

    /// Next field as `UINT32`.
    ///
    /// # Errors
    ///
    /// Fails if the record is exhausted or the field has another kind.
    pub fn u32(&mut self) -> Result<u32, WireError> {
        self.next_value(FieldKind::U32, |value| match value {
            FieldValue::U32(v) => Some(v),
            _ => None,
        })
    }

    /// Next field as `INT32`.
    ///
    /// # Errors
    ///
    /// Fails if the record is exhausted or the field has another kind.
    pub fn i32(&mut self) -> Result<i32, WireError> {
        self.next_value(FieldKind::I32, |value| match value {
            FieldValue::I32(v) => Some(v),
            _ => None,
        })
    }

    /// Next field as `DYNAMIC_LEN_STR_8`.
    ///
    /// # Errors
    ///
    /// Fails if the record is exhausted or the field has another kind.
    pub fn str8(&mut self) -> Result<Vec<u8>, WireError> {
        self.next_value(FieldKind::DynamicLenStr8, |value| match value {
            FieldValue::DynamicLenStr8(v) => Some(v),
            _ => None,
        })
    }
}
