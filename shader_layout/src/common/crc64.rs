//! CRC-64/XZ (ECMA-182 polynomial, reflected), used for structural hashes of
//! composite and resource type declarations.

const CRC64_TABLE: [u64; 256] = {
    let mut table = [0u64; 256];
    let polynomial: u64 = 0xC96C_5795_D787_0F42; // ECMA-182 (reversed)
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u64;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ polynomial;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// incremental CRC-64 state.
///
/// `finish` does not consume the state, so a running hash can be read and
/// then extended further (composites fold in one member at a time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crc64 {
    crc: u64,
}

impl Default for Crc64 {
    fn default() -> Self { Self::new() }
}

impl Crc64 {
    pub const fn new() -> Self { Self { crc: !0u64 } }

    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            let index = ((self.crc ^ byte as u64) & 0xFF) as usize;
            self.crc = (self.crc >> 8) ^ CRC64_TABLE[index];
        }
    }

    /// length prefixed, so that `("ab", "c")` and `("a", "bc")` hash differently
    pub fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.update(s.as_bytes());
    }

    pub fn write_u64(&mut self, value: u64) { self.update(&value.to_le_bytes()) }

    pub fn write_u8(&mut self, value: u8) { self.update(&[value]) }

    pub const fn finish(&self) -> u64 { !self.crc }
}
