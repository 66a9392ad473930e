/// Endianness-configurable cursor over an owned byte buffer.
///
/// The reader itself performs no bounds validation beyond what slice
/// indexing enforces; format parsers are expected to check `len()` /
/// `remaining()` up front and reject malformed input before reading.
pub struct ByteReader {
    data: Vec<u8>,
    cursor: usize,
    little_endian: bool,
}

impl ByteReader {
    pub fn new(data: Vec<u8>, little_endian: bool) -> Self {
        Self {
            data,
            cursor: 0,
            little_endian,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Bytes between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Returns the byte at `cursor + offset` without advancing.
    pub fn peek(&self, offset: usize) -> u8 {
        self.data[self.cursor + offset]
    }

    pub fn advance(&mut self, count: usize) {
        self.cursor += count;
    }

    pub fn seek(&mut self, position: usize) {
        self.cursor = position;
    }

    pub fn read_u8(&mut self) -> u8 {
        let value = self.data[self.cursor];
        self.cursor += 1;
        value
    }

    pub fn read_u16(&mut self) -> u16 {
        let bytes = [self.data[self.cursor], self.data[self.cursor + 1]];
        self.cursor += 2;
        if self.little_endian {
            u16::from_le_bytes(bytes)
        } else {
            u16::from_be_bytes(bytes)
        }
    }

    pub fn read_u32(&mut self) -> u32 {
        let bytes = [
            self.data[self.cursor],
            self.data[self.cursor + 1],
            self.data[self.cursor + 2],
            self.data[self.cursor + 3],
        ];
        self.cursor += 4;
        if self.little_endian {
            u32::from_le_bytes(bytes)
        } else {
            u32::from_be_bytes(bytes)
        }
    }

    /// Reads 4 bytes and reinterprets the unsigned bit pattern as a
    /// two's-complement signed value.
    pub fn read_i32(&mut self) -> i32 {
        self.read_u32() as i32
    }

    /// Bulk copy from the cursor into `dest`, advancing by `dest.len()`.
    pub fn read_into(&mut self, dest: &mut [u8]) {
        dest.copy_from_slice(&self.data[self.cursor..self.cursor + dest.len()]);
        self.cursor += dest.len();
    }

    /// Bounds-checked equality test against `expected` at an absolute
    /// offset. Does not move the cursor; out-of-range is simply `false`.
    pub fn compare(&self, location: usize, expected: &[u8]) -> bool {
        match self.data.get(location..location + expected.len()) {
            Some(actual) => actual == expected,
            None => false,
        }
    }

    /// Swaps in a new backing buffer and resets the cursor. Used to
    /// substitute an RLE-expanded stream for the compressed one so
    /// downstream pixel walking is identical to the uncompressed path.
    pub fn replace(&mut self, data: Vec<u8>) {
        self.data = data;
        self.cursor = 0;
    }
}
