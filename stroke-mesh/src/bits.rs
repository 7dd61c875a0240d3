//! LSB-first bit cursor over a byte region
//!
//! Bit `n` of the stream is bit `n % 8` of byte `n / 8`. A value written with
//! `width` bits lands in the next `width` stream bits, least significant bit
//! first. The packer and the decoder both go through this module, so the two
//! sides agree on layout by construction.

/// Largest value representable in `bits` bits (`bits <= 32`)
#[inline]
pub const fn max_value_for_bits(bits: u8) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

/// Sequential bit writer
///
/// The region must start zeroed; writes OR bits into place.
pub struct BitWriter<'a> {
    bytes: &'a mut [u8],
    position: usize,
}

impl<'a> BitWriter<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Append the low `width` bits of `value`
    ///
    /// Panics if the region has fewer than `width` bits left.
    pub fn write(&mut self, value: u32, width: u8) {
        assert!(width <= 32, "bit width {width} exceeds 32");
        assert!(
            self.position + width as usize <= self.bytes.len() * 8,
            "bit cursor overrun: {} + {} bits in a {}-byte region",
            self.position,
            width,
            self.bytes.len()
        );

        let mut value = value & max_value_for_bits(width);
        let mut remaining = width as usize;
        while remaining > 0 {
            let byte = self.position / 8;
            let shift = self.position % 8;
            let take = remaining.min(8 - shift);
            let chunk = (value & ((1u32 << take) - 1)) as u8;
            self.bytes[byte] |= chunk << shift;

            value >>= take;
            self.position += take;
            remaining -= take;
        }
    }

    /// Bits written so far
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Sequential bit reader, mirror of [`BitWriter`]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Read the next `width` bits as an unsigned value
    ///
    /// Panics if the region has fewer than `width` bits left.
    pub fn read(&mut self, width: u8) -> u32 {
        assert!(width <= 32, "bit width {width} exceeds 32");
        assert!(
            self.position + width as usize <= self.bytes.len() * 8,
            "bit cursor overrun: {} + {} bits in a {}-byte region",
            self.position,
            width,
            self.bytes.len()
        );

        let mut value = 0u32;
        let mut filled = 0usize;
        let width = width as usize;
        while filled < width {
            let byte = self.position / 8;
            let shift = self.position % 8;
            let take = (width - filled).min(8 - shift);
            let chunk = (u32::from(self.bytes[byte]) >> shift) & ((1u32 << take) - 1);
            value |= chunk << filled;

            self.position += take;
            filled += take;
        }
        value
    }

    /// Bits consumed so far
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }
}
