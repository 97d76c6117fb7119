//! Big-endian byte writer with auto-growing capacity.

/// A binary writer that grows as needed.
///
/// # Example
///
/// ```
/// use amqp_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x70);
/// writer.u32(0x0000_0102);
/// assert_eq!(writer.flush(), [0x70, 0x00, 0x00, 0x01, 0x02]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Writer {
    uint8: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Bytes written since the last flush.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8
    }

    /// Discards everything written since the last flush.
    pub fn reset(&mut self) {
        self.uint8.clear();
    }

    /// Drops bytes written after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.uint8.truncate(len);
    }

    /// Returns the written data and leaves the writer empty.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.uint8.push(val);
    }

    #[inline]
    pub fn i8(&mut self, val: i8) {
        self.uint8.push(val as u8);
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn i16(&mut self, val: i16) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn i32(&mut self, val: i32) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn i64(&mut self, val: i64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u128(&mut self, val: u128) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn f32(&mut self, val: f32) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn f64(&mut self, val: f64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a byte slice.
    pub fn buf(&mut self, buf: &[u8]) {
        self.uint8.extend_from_slice(buf);
    }

    /// Writes the UTF-8 bytes of `s`. Returns the number of bytes written.
    pub fn utf8(&mut self, s: &str) -> usize {
        self.buf(s.as_bytes());
        s.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8() {
        let mut writer = Writer::new();
        writer.u8(0x01);
        writer.u8(0x02);
        assert_eq!(writer.flush(), [0x01, 0x02]);
    }

    #[test]
    fn test_u32() {
        let mut writer = Writer::new();
        writer.u32(0x01020304);
        assert_eq!(writer.flush(), [0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_i8_negative() {
        let mut writer = Writer::new();
        writer.i8(-2i8);
        assert_eq!(writer.flush(), [0xfe]);
    }

    #[test]
    fn test_reset_and_truncate() {
        let mut writer = Writer::with_capacity(8);
        writer.u16(0x0102);
        writer.u64(1);
        writer.truncate(2);
        assert_eq!(writer.as_slice(), [0x01, 0x02]);
        writer.reset();
        assert!(writer.is_empty());
        writer.u128(1);
        assert_eq!(writer.len(), 16);
    }

    #[test]
    fn test_flush_multiple() {
        let mut writer = Writer::new();
        writer.u8(0x01);
        assert_eq!(writer.flush(), [0x01]);
        assert!(writer.is_empty());
        writer.u8(0x02);
        assert_eq!(writer.flush(), [0x02]);
    }

    #[test]
    fn test_utf8() {
        let mut writer = Writer::new();
        let n = writer.utf8("café");
        assert_eq!(n, 5);
        assert_eq!(writer.as_slice(), "café".as_bytes());
    }
}
