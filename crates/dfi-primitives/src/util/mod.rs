//! Conversion and binary serialization utilities.
//!
//! Provides the integer/hex/byte converters used when composing scripts and
//! transactions, VarInt encoding/decoding, and `TxReader`/`TxWriter` structs
//! for reading/writing DeFiChain transaction wire data.

use crate::PrimitivesError;

// ---------------------------------------------------------------------------
// Converters
// ---------------------------------------------------------------------------

/// Encode an integer as exactly `width` little-endian bytes.
///
/// # Arguments
/// * `value` - The integer to encode.
/// * `width` - The fixed output width in bytes.
///
/// # Returns
/// A `Vec<u8>` of length `width`, or `IntOutOfRange` if the value does not
/// fit (or `width` is zero).
pub fn int_to_bytes(value: u64, width: usize) -> Result<Vec<u8>, PrimitivesError> {
    if width == 0 || (width < 8 && (value >> (8 * width as u32)) != 0) {
        return Err(PrimitivesError::IntOutOfRange { value, width });
    }
    let mut bytes = value.to_le_bytes().to_vec();
    if width <= 8 {
        bytes.truncate(width);
    } else {
        bytes.resize(width, 0);
    }
    Ok(bytes)
}

/// Encode an integer as exactly `width` little-endian bytes of hex text.
///
/// # Arguments
/// * `value` - The integer to encode.
/// * `width` - The fixed output width in bytes (hex length is `2 * width`).
///
/// # Returns
/// A lowercase hex string, or `IntOutOfRange` if the value does not fit.
pub fn int_to_hex(value: u64, width: usize) -> Result<String, PrimitivesError> {
    Ok(hex::encode(int_to_bytes(value, width)?))
}

/// Decode a little-endian hex string back into an integer.
///
/// Exact inverse of [`int_to_hex`] for widths up to 8 bytes; wider inputs
/// are accepted as long as the extra high bytes are zero.
///
/// # Arguments
/// * `hex_str` - Little-endian hex text.
///
/// # Returns
/// The decoded value, or an error for invalid hex or an overflowing value.
pub fn hex_to_int(hex_str: &str) -> Result<u64, PrimitivesError> {
    let bytes = hex_to_bytes(hex_str)?;
    if bytes.len() > 8 && bytes[8..].iter().any(|&b| b != 0) {
        return Err(PrimitivesError::InvalidHex(format!(
            "'{}' exceeds 64 bits",
            hex_str
        )));
    }
    let mut le = [0u8; 8];
    let n = bytes.len().min(8);
    le[..n].copy_from_slice(&bytes[..n]);
    Ok(u64::from_le_bytes(le))
}

/// Decode a hex string into raw bytes.
///
/// # Arguments
/// * `hex_str` - The hex text to decode.
///
/// # Returns
/// The decoded bytes, or `InvalidHex` if the text is malformed.
pub fn hex_to_bytes(hex_str: &str) -> Result<Vec<u8>, PrimitivesError> {
    hex::decode(hex_str).map_err(|e| PrimitivesError::InvalidHex(e.to_string()))
}

/// Encode raw bytes as lowercase hex text.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Encode a text payload as the hex of its raw UTF-8 bytes, with no escaping.
pub fn str_to_hex(s: &str) -> String {
    hex::encode(s.as_bytes())
}

// ---------------------------------------------------------------------------
// VarInt
// ---------------------------------------------------------------------------

/// A Bitcoin-style variable-length integer.
///
/// VarInt is used in transaction data to indicate the number of upcoming
/// fields or the length of an upcoming field. The encoding uses 1, 3, 5, or
/// 9 bytes depending on the magnitude of the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Return the wire-format byte length of this VarInt.
    ///
    /// # Returns
    /// 1, 3, 5, or 9 depending on the value.
    pub fn length(&self) -> usize {
        if self.0 < 0xfd {
            1
        } else if self.0 < 0x10000 {
            3
        } else if self.0 < 0x100000000 {
            5
        } else {
            9
        }
    }

    /// Encode the VarInt into a new byte vector.
    ///
    /// # Returns
    /// A `Vec<u8>` of 1, 3, 5, or 9 bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let v = self.0;
        let mut buf = Vec::with_capacity(self.length());
        if v < 0xfd {
            buf.push(v as u8);
        } else if v < 0x10000 {
            buf.push(0xfd);
            buf.extend_from_slice(&(v as u16).to_le_bytes());
        } else if v < 0x100000000 {
            buf.push(0xfe);
            buf.extend_from_slice(&(v as u32).to_le_bytes());
        } else {
            buf.push(0xff);
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }

    /// Return the underlying u64 value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for VarInt {
    fn from(v: u64) -> Self {
        VarInt(v)
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

// ---------------------------------------------------------------------------
// TxReader
// ---------------------------------------------------------------------------

/// A cursor-based reader for transaction wire data.
///
/// Wraps a byte slice and maintains a read position, providing methods
/// to read fixed-size integers and VarInt values in little-endian order.
pub struct TxReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> TxReader<'a> {
    /// Create a new reader over the given byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        TxReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance the position.
    ///
    /// # Arguments
    /// * `n` - Number of bytes to read.
    ///
    /// # Returns
    /// A byte slice of length `n`, or `UnexpectedEof` if insufficient data
    /// remains.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        if self.pos + n > self.data.len() {
            return Err(PrimitivesError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a single byte and advance the position.
    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Read a little-endian u16 and advance the position by 2 bytes.
    pub fn read_u16_le(&mut self) -> Result<u16, PrimitivesError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read a little-endian u32 and advance the position by 4 bytes.
    pub fn read_u32_le(&mut self) -> Result<u32, PrimitivesError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a little-endian u64 and advance the position by 8 bytes.
    pub fn read_u64_le(&mut self) -> Result<u64, PrimitivesError> {
        let bytes = self.read_bytes(8)?;
        Ok(u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    /// Read a VarInt and advance the position accordingly.
    pub fn read_varint(&mut self) -> Result<VarInt, PrimitivesError> {
        let first = self.read_u8()?;
        match first {
            0xff => Ok(VarInt(self.read_u64_le()?)),
            0xfe => Ok(VarInt(self.read_u32_le()? as u64)),
            0xfd => Ok(VarInt(self.read_u16_le()? as u64)),
            b => Ok(VarInt(b as u64)),
        }
    }

    /// Return the number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

// ---------------------------------------------------------------------------
// TxWriter
// ---------------------------------------------------------------------------

/// A buffer-based writer for transaction wire data.
///
/// Wraps a `Vec<u8>` and provides methods to append fixed-size integers
/// and VarInt values in little-endian order.
pub struct TxWriter {
    buf: Vec<u8>,
}

impl TxWriter {
    /// Create a new empty writer.
    pub fn new() -> Self {
        TxWriter { buf: Vec::new() }
    }

    /// Create a new writer with a pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        TxWriter {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Append raw bytes to the buffer.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a single byte to the buffer.
    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    /// Append a little-endian u16 (2 bytes) to the buffer.
    pub fn write_u16_le(&mut self, val: u16) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a little-endian u32 (4 bytes) to the buffer.
    pub fn write_u32_le(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a little-endian u64 (8 bytes) to the buffer.
    pub fn write_u64_le(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a little-endian i64 (8 bytes) to the buffer.
    pub fn write_i64_le(&mut self, val: i64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a VarInt to the buffer.
    pub fn write_varint(&mut self, varint: VarInt) {
        self.buf.extend_from_slice(&varint.to_bytes());
    }

    /// Consume the writer and return the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Return a reference to the current buffer contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Return the current length of the buffer.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Default for TxWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Converter tests --

    #[test]
    fn test_int_to_hex_fixed_width() {
        assert_eq!(int_to_hex(0, 1).unwrap(), "00");
        assert_eq!(int_to_hex(20, 1).unwrap(), "14");
        assert_eq!(int_to_hex(300, 2).unwrap(), "2c01");
        assert_eq!(int_to_hex(1, 4).unwrap(), "01000000");
        assert_eq!(int_to_hex(100, 8).unwrap(), "6400000000000000");
    }

    #[test]
    fn test_int_to_hex_out_of_range() {
        assert!(int_to_hex(256, 1).is_err());
        assert!(int_to_hex(65536, 2).is_err());
        assert!(int_to_hex(1, 0).is_err());
        // Boundary values still fit.
        assert_eq!(int_to_hex(255, 1).unwrap(), "ff");
        assert_eq!(int_to_hex(65535, 2).unwrap(), "ffff");
    }

    #[test]
    fn test_hex_to_int_inverse() {
        for (value, width) in [(0u64, 1usize), (255, 1), (300, 2), (1, 4), (u64::MAX, 8)] {
            let encoded = int_to_hex(value, width).unwrap();
            assert_eq!(hex_to_int(&encoded).unwrap(), value);
        }
    }

    #[test]
    fn test_hex_bytes_roundtrip() {
        let bytes = hex_to_bytes("76a914e2a6").unwrap();
        assert_eq!(bytes_to_hex(&bytes), "76a914e2a6");
        assert!(hex_to_bytes("zz").is_err());
    }

    #[test]
    fn test_str_to_hex() {
        assert_eq!(str_to_hex("hello world"), "68656c6c6f20776f726c64");
        assert_eq!(str_to_hex(""), "");
    }

    // -- VarInt tests --

    #[test]
    fn test_varint_to_bytes() {
        let cases: Vec<(u64, Vec<u8>)> = vec![
            (0, vec![0x00]),
            (1, vec![0x01]),
            (252, vec![0xfc]),
            (253, vec![0xfd, 0xfd, 0x00]),
            (65535, vec![0xfd, 0xff, 0xff]),
            (65536, vec![0xfe, 0x00, 0x00, 0x01, 0x00]),
            (4294967295, vec![0xfe, 0xff, 0xff, 0xff, 0xff]),
            (4294967296, vec![0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]),
            (u64::MAX, vec![0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
        ];
        for (value, expected) in cases {
            let vi = VarInt(value);
            assert_eq!(vi.to_bytes(), expected, "encoding mismatch for {}", value);
            assert_eq!(vi.length(), expected.len(), "length mismatch for {}", value);
        }
    }

    #[test]
    fn test_varint_read_sizes() {
        let mut reader = TxReader::new(&[0x05]);
        assert_eq!(reader.read_varint().unwrap(), VarInt(5));

        let mut reader = TxReader::new(&[0xfd, 0x00, 0x01]);
        assert_eq!(reader.read_varint().unwrap(), VarInt(256));

        let mut reader = TxReader::new(&[0xfe, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(reader.read_varint().unwrap(), VarInt(65536));

        let mut reader = TxReader::new(&[0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]);
        assert_eq!(reader.read_varint().unwrap(), VarInt(4294967296));
    }

    // -- TxReader / TxWriter round-trip tests --

    #[test]
    fn test_reader_writer_roundtrip() {
        let mut writer = TxWriter::new();
        writer.write_u8(0x42);
        writer.write_u16_le(0x1234);
        writer.write_u32_le(0xDEADBEEF);
        writer.write_u64_le(0x0102030405060708);
        writer.write_varint(VarInt(300));
        writer.write_bytes(b"hello");

        let data = writer.into_bytes();
        let mut reader = TxReader::new(&data);

        assert_eq!(reader.read_u8().unwrap(), 0x42);
        assert_eq!(reader.read_u16_le().unwrap(), 0x1234);
        assert_eq!(reader.read_u32_le().unwrap(), 0xDEADBEEF);
        assert_eq!(reader.read_u64_le().unwrap(), 0x0102030405060708);
        assert_eq!(reader.read_varint().unwrap(), VarInt(300));
        assert_eq!(reader.read_bytes(5).unwrap(), b"hello");
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_reader_eof() {
        let mut reader = TxReader::new(&[0x01]);
        assert!(reader.read_u8().is_ok());
        assert!(reader.read_u8().is_err());

        let mut reader = TxReader::new(&[0xfd, 0x00]);
        assert!(reader.read_varint().is_err());
    }
}
