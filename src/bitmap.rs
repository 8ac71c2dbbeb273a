use bitvec::order::Lsb0;
use bitvec::vec::BitVec;

/// An allocation bitmap over a whole-block-sized byte region of the device.
///
/// Bits are addressed byte-major, then least-significant-bit-first within a
/// byte; a set bit means "allocated". The backing bytes are read from and
/// written back to the device verbatim, so the in-memory view stays
/// bit-exact with the on-disk region.
pub struct Bitmap {
    bits: BitVec<u8, Lsb0>,
}

impl Bitmap {
    /// Wraps the raw bytes of a bitmap region.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Bitmap {
            bits: BitVec::from_vec(bytes),
        }
    }

    /// The backing bytes, for writing the region back out.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    #[must_use]
    pub fn test(&self, index: usize) -> bool {
        self.bits[index]
    }

    pub fn set(&mut self, index: usize) {
        self.bits.set(index, true);
    }

    pub fn clear(&mut self, index: usize) {
        self.bits.set(index, false);
    }

    /// Finds the first clear bit with an index below `limit`.
    ///
    /// Scans byte-by-byte, skipping fully-set `0xFF` bytes, then
    /// least-significant-bit-first within the first byte with a hole.
    /// Returns `None` when every bit below `limit` is set.
    #[must_use]
    pub fn first_clear(&self, limit: usize) -> Option<usize> {
        for (byte_index, &byte) in self.bits.as_raw_slice().iter().enumerate() {
            if byte == 0xFF {
                continue;
            }

            for bit_index in 0..8 {
                let index = byte_index * 8 + bit_index;
                if index >= limit {
                    return None;
                }

                if byte & (1 << bit_index) == 0 {
                    return Some(index);
                }
            }
        }

        None
    }
}
