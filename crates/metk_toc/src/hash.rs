//! Case-insensitive filename hash used to place TOC entries into buckets.
//!
//! This is the engine's wide-character string hash: every UTF-16 code unit of the
//! uppercased name is fed through a CRC table twice, once for the low byte and
//! once more with nothing mixed in for the high byte. Game lookups depend on this
//! exact shape.

use std::sync::OnceLock;

const POLYNOMIAL: u32 = 0x04C1_1DB7;

fn crc_table() -> &'static [u32; 256] {
    static TABLE: OnceLock<[u32; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0u32; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            let mut crc = (i as u32) << 24;
            for _ in 0..8 {
                crc = if crc & 0x8000_0000 != 0 {
                    (crc << 1) ^ POLYNOMIAL
                } else {
                    crc << 1
                };
            }
            *slot = crc;
        }
        table
    })
}

/// Hash a bare filename.
pub fn hash_name(name: &str) -> u32 {
    let table = crc_table();
    let mut hash = 0u32;
    for unit in name.to_uppercase().encode_utf16() {
        let low = u32::from(unit & 0xFF);
        hash = ((hash >> 8) & 0x00FF_FFFF) ^ table[((hash ^ low) & 0xFF) as usize];
        hash = ((hash >> 8) & 0x00FF_FFFF) ^ table[(hash & 0xFF) as usize];
    }
    hash
}

/// Reduce a full hash to a bucket index.
///
/// # Panics
///
/// Panics if `table_size` is zero.
pub fn bounded(hash: u32, table_size: usize) -> usize {
    hash as usize % table_size
}

/// Hash a bare filename and reduce it to a bucket index.
pub fn bounded_hash(name: &str, table_size: usize) -> usize {
    bounded(hash_name(name), table_size)
}
