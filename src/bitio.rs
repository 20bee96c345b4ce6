//! Bit-granularity I/O over byte streams.
//!
//! The archive format is bit-packed: tree topology bits, symbol bytes and
//! Huffman codes share one stream with no alignment between fields.
//! [`BitWriter`] and [`BitReader`] are the MSB-first accumulators both
//! directions of the codec are built on.

use std::io::{self, Read, Write};

use bitvec::prelude::*;

/// An in-memory bit string, most significant bit first.
pub type Bits = BitVec<u8, Msb0>;

/// Writes individual bits to an underlying byte stream, MSB-first.
///
/// Bits accumulate in a one-byte buffer and a byte is emitted each time
/// eight have been collected. Dropping the writer flushes the partial
/// trailing byte (zero-padded) on a best-effort basis; call
/// [`BitWriter::finish`] to observe the result instead.
pub struct BitWriter<W: Write> {
    inner: W,
    buffer: u8,
    count: u8,
}

impl<W: Write> BitWriter<W> {
    /// Wrap a byte sink.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: 0,
            count: 0,
        }
    }

    /// Append one bit.
    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.buffer = (self.buffer << 1) | u8::from(bit);
        self.count += 1;
        if self.count == 8 {
            self.inner.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.count = 0;
        }
        Ok(())
    }

    /// Append every bit of a bit string, in order.
    pub fn write_bits(&mut self, bits: &BitSlice<u8, Msb0>) -> io::Result<()> {
        for bit in bits.iter().by_vals() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Append the eight bits of `byte`, most significant first.
    pub fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        for shift in (0..8).rev() {
            self.write_bit((byte >> shift) & 1 == 1)?;
        }
        Ok(())
    }

    /// Zero-pad the trailing partial byte, emit it, and flush the
    /// underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.count > 0 {
            let byte = self.buffer << (8 - self.count);
            self.buffer = 0;
            self.count = 0;
            self.inner.write_all(&[byte])?;
        }
        self.inner.flush()
    }

    /// Flush and consume the writer, reporting any failure that `Drop`
    /// would swallow.
    pub fn finish(mut self) -> io::Result<()> {
        self.flush()
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Reads individual bits from an underlying byte stream, MSB-first.
///
/// The internal byte buffer refills lazily, one byte at a time.
pub struct BitReader<R: Read> {
    inner: R,
    buffer: u8,
    count: u8,
}

impl<R: Read> BitReader<R> {
    /// Wrap a byte source.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buffer: 0,
            count: 0,
        }
    }

    /// Read one bit.
    ///
    /// Returns `Ok(None)` once the underlying stream is exhausted. The
    /// sentinel is distinct from both bit values; callers must never
    /// treat it as one.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        if self.count == 0 {
            let mut byte = [0u8; 1];
            match self.inner.read_exact(&mut byte) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
                Err(e) => return Err(e),
            }
            self.buffer = byte[0];
            self.count = 8;
        }
        self.count -= 1;
        Ok(Some((self.buffer >> self.count) & 1 == 1))
    }

    /// Read eight bits as one byte, most significant first.
    ///
    /// Returns `Ok(None)` if the stream ends anywhere inside the byte.
    pub fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        for _ in 0..8 {
            match self.read_bit()? {
                Some(bit) => byte = (byte << 1) | u8::from(bit),
                None => return Ok(None),
            }
        }
        Ok(Some(byte))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn writer_packs_msb_first() {
        let mut out = Vec::new();
        let mut bw = BitWriter::new(&mut out);
        for bit in [true, false, true] {
            bw.write_bit(bit).unwrap();
        }
        bw.finish().unwrap();
        assert_eq!(out, [0b1010_0000]);
    }

    #[test]
    fn write_bits_matches_bit_by_bit() {
        let bits = bitvec![u8, Msb0; 1, 0, 0, 1, 1];
        let mut out = Vec::new();
        let mut bw = BitWriter::new(&mut out);
        bw.write_bits(&bits).unwrap();
        bw.finish().unwrap();
        assert_eq!(out, [0b1001_1000]);
    }

    #[test]
    fn byte_roundtrip_across_alignment() {
        let mut out = Vec::new();
        let mut bw = BitWriter::new(&mut out);
        bw.write_bit(true).unwrap();
        bw.write_byte(0xA5).unwrap();
        bw.finish().unwrap();
        assert_eq!(out, [0b1101_0010, 0b1000_0000]);

        let mut br = BitReader::new(Cursor::new(out));
        assert_eq!(br.read_bit().unwrap(), Some(true));
        assert_eq!(br.read_byte().unwrap(), Some(0xA5));
    }

    #[test]
    fn drop_flushes_partial_byte() {
        let mut out = Vec::new();
        {
            let mut bw = BitWriter::new(&mut out);
            bw.write_bit(true).unwrap();
        }
        assert_eq!(out, [0b1000_0000]);
    }

    #[test]
    fn reader_signals_eof_with_sentinel() {
        let mut br = BitReader::new(Cursor::new(vec![0xFF]));
        for _ in 0..8 {
            assert_eq!(br.read_bit().unwrap(), Some(true));
        }
        assert_eq!(br.read_bit().unwrap(), None);
        assert_eq!(br.read_byte().unwrap(), None);
    }

    #[test]
    fn read_byte_is_none_on_partial_tail() {
        let mut br = BitReader::new(Cursor::new(vec![0xAB]));
        assert_eq!(br.read_bit().unwrap(), Some(true));
        assert_eq!(br.read_byte().unwrap(), None);
    }
}
