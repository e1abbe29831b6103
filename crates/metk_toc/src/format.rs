//! On-disk `PCConsoleTOC.bin` layout.
//!
//! All integers are little-endian:
//!
//! ```text
//! u32  magic            0x3AB70C13
//! u32  media_data_count 0
//! u32  hash_table_count number of buckets
//! u32  hash_table_offset 0x8
//! per bucket:
//!     u32 entry_count
//!     per entry:
//!         u16      next_entry_offset  bytes to the next entry of this bucket, 0 for the last
//!         u16      flags
//!         u32      file_size
//!         [u8; 20] sha1               always zero
//!         cstr     path               ASCII, NUL-terminated
//! ```
//!
//! The entry describing the TOC itself gets its `file_size` patched to the final
//! length of the serialized file, so that re-indexing never sees it as stale.

use crate::error::{Error, Result};
use crate::table::{BucketTable, IndexEntry};
use binrw::{binrw, BinRead, BinWrite};
use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use camino::Utf8Path;
use std::io::{BufReader, Cursor, Read, Seek, Write};

/// Magic number at the start of every TOC.
pub const TOC_MAGIC: u32 = 0x3AB7_0C13;

/// Value of the legacy hash table offset field.
pub const HASH_TABLE_OFFSET: u32 = 0x8;

const SHA1_LEN: usize = 20;

/// `next_entry_offset` + `flags` + `file_size` + `sha1`.
const ENTRY_FIXED_LEN: usize = 2 + 2 + 4 + SHA1_LEN;

/// Fixed 16 byte TOC header.
#[binrw]
#[brw(little, magic = 0x3AB70C13u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocHeader {
    pub media_data_count: u32,
    pub hash_table_count: u32,
    pub hash_table_offset: u32,
}

impl TocHeader {
    pub fn new(hash_table_count: u32) -> Self {
        Self {
            media_data_count: 0,
            hash_table_count,
            hash_table_offset: HASH_TABLE_OFFSET,
        }
    }
}

/// Serialize a bucket table into TOC bytes.
///
/// Returns `Ok(None)` when the table holds no entries: there is nothing to write,
/// and an empty TOC must never be produced.
pub fn serialize(table: &BucketTable) -> Result<Option<Vec<u8>>> {
    if table.is_empty() {
        return Ok(None);
    }

    let mut writer = Cursor::new(Vec::new());
    TocHeader::new(table.len() as u32).write(&mut writer)?;

    let mut self_size_offset = None;
    for bucket in table.buckets() {
        writer.write_u32::<LE>(bucket.len() as u32)?;

        for (i, entry) in bucket.iter().enumerate() {
            let path = encode_path(&entry.path);
            let next_entry_offset = if i + 1 == bucket.len() {
                0
            } else {
                let entry_len = ENTRY_FIXED_LEN + path.len() + 1;
                u16::try_from(entry_len).map_err(|_| Error::InvalidPath(entry.path.clone()))?
            };

            writer.write_u16::<LE>(next_entry_offset)?;
            writer.write_u16::<LE>(entry.flags)?;
            if entry.is_toc_file() {
                self_size_offset = Some(writer.position() as usize);
                writer.write_u32::<LE>(0)?;
            } else {
                writer.write_u32::<LE>(entry.size)?;
            }
            writer.write_all(&[0u8; SHA1_LEN])?;
            writer.write_all(&path)?;
            writer.write_u8(0)?;
        }
    }

    let mut bytes = writer.into_inner();
    if let Some(offset) = self_size_offset {
        let total = bytes.len() as u32;
        bytes[offset..offset + 4].copy_from_slice(&total.to_le_bytes());
    }

    Ok(Some(bytes))
}

/// ASCII-encode a stored path, replacing anything outside ASCII with `?`.
fn encode_path(path: &str) -> Vec<u8> {
    if !path.is_ascii() {
        tracing::warn!("Non-ASCII characters in TOC path will be replaced: {}", path);
    }
    path.chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect()
}

/// A TOC parsed back from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocFile {
    pub header: TocHeader,
    pub buckets: Vec<Vec<IndexEntry>>,
}

impl TocFile {
    /// Parse a TOC from a reader positioned at its first byte.
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let header = TocHeader::read(reader)?;

        // The hash table always follows the header directly; the offset field is
        // a legacy constant and not a real seek target.
        let bucket_count = header.hash_table_count as usize;
        let mut buckets = Vec::with_capacity(bucket_count.min(u16::MAX as usize));
        for _ in 0..bucket_count {
            let entry_count = reader.read_u32::<LE>()? as usize;
            let mut bucket = Vec::with_capacity(entry_count.min(u16::MAX as usize));
            for _ in 0..entry_count {
                bucket.push(read_entry(reader)?);
            }
            buckets.push(bucket);
        }

        Ok(Self { header, buckets })
    }

    /// Parse a TOC file from disk.
    pub fn from_path(path: &Utf8Path) -> Result<Self> {
        let file = std::fs::File::open(path.as_std_path())?;
        Self::read(&mut BufReader::new(file))
    }

    /// All entries, bucket by bucket.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.buckets.iter().flatten()
    }

    pub fn entry_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

fn read_entry<R: Read>(reader: &mut R) -> Result<IndexEntry> {
    let _next_entry_offset = reader.read_u16::<LE>()?;
    let flags = reader.read_u16::<LE>()?;
    let size = reader.read_u32::<LE>()?;

    let mut sha1 = [0u8; SHA1_LEN];
    reader.read_exact(&mut sha1)?;

    let mut path = Vec::new();
    loop {
        match reader.read_u8()? {
            0 => break,
            b => path.push(b),
        }
    }
    let path = String::from_utf8(path)
        .map_err(|e| Error::InvalidPath(String::from_utf8_lossy(e.as_bytes()).into_owned()))?;

    Ok(IndexEntry { path, size, flags })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn build(entries: Vec<IndexEntry>) -> Vec<u8> {
        serialize(&BucketTable::build(entries)).unwrap().unwrap()
    }

    #[test]
    fn test_empty_table_writes_nothing() {
        assert!(serialize(&BucketTable::default()).unwrap().is_none());
    }

    #[test]
    fn test_header_bytes() {
        let bytes = build(vec![
            IndexEntry::new("BIOGame\\CookedPCConsole\\A.pcc", 100),
            IndexEntry::new("BIOGame\\CookedPCConsole\\b.UPK", 50),
        ]);

        assert_eq!(
            &bytes[..16],
            &[
                0x13, 0x0C, 0xB7, 0x3A, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x08,
                0x00, 0x00, 0x00
            ]
        );
        assert_eq!(bytes.len(), 140);
    }

    #[test]
    fn test_single_entry_bucket_layout() {
        let bytes = build(vec![
            IndexEntry::new("BIOGame\\CookedPCConsole\\A.pcc", 100),
            IndexEntry::new("BIOGame\\CookedPCConsole\\b.UPK", 50),
        ]);

        // Bucket 0 holds b.UPK only.
        assert_eq!(&bytes[16..20], &1u32.to_le_bytes());
        assert_eq!(&bytes[20..22], &0u16.to_le_bytes());
        assert_eq!(&bytes[22..24], &0u16.to_le_bytes());
        assert_eq!(&bytes[24..28], &50u32.to_le_bytes());
        assert!(bytes[28..48].iter().all(|b| *b == 0));
        assert_eq!(&bytes[48..77], b"BIOGame\\CookedPCConsole\\b.UPK");
        assert_eq!(bytes[77], 0);
    }

    #[test]
    fn test_next_entry_offset_in_chain() {
        let bytes = build(vec![
            IndexEntry::new("F0.pcc", 1),
            IndexEntry::new("F1.pcc", 2),
            IndexEntry::new("F3.pcc", 3),
        ]);

        assert_eq!(bytes.len(), 133);
        // Bucket 2 starts at 59 and chains F0.pcc -> F3.pcc.
        assert_eq!(&bytes[59..63], &2u32.to_le_bytes());
        assert_eq!(&bytes[63..65], &35u16.to_le_bytes());
        assert_eq!(&bytes[98..100], &0u16.to_le_bytes());
    }

    #[test]
    fn test_self_size_patch() {
        let bytes = build(vec![
            IndexEntry::new("CookedPCConsole\\A.pcc", 100),
            IndexEntry::new("PCConsoleTOC.bin", 12345),
        ]);

        let toc = TocFile::read(&mut Cursor::new(&bytes)).unwrap();
        let own = toc.entries().find(|e| e.is_toc_file()).unwrap();
        assert_eq!(own.size as usize, bytes.len());
        assert_eq!(bytes.len(), 119);
    }

    #[test]
    fn test_self_size_patch_case_insensitive() {
        let bytes = build(vec![
            IndexEntry::new("DLC_MOD\\CookedPCConsole\\Mount.dlc", 8),
            IndexEntry::new("DLC_MOD\\pcconsoletoc.BIN", 0),
        ]);

        let toc = TocFile::read(&mut Cursor::new(&bytes)).unwrap();
        let own = toc.entries().find(|e| e.is_toc_file()).unwrap();
        assert_eq!(own.size as usize, bytes.len());
    }

    #[test]
    fn test_non_ascii_path_is_replaced() {
        let bytes = build(vec![IndexEntry::new("Movies\\Intro\u{e9}.bik", 10)]);
        let toc = TocFile::read(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(toc.entries().next().unwrap().path, "Movies\\Intro?.bik");
    }

    #[test]
    fn test_read_rejects_bad_magic() {
        let mut bytes = build(vec![IndexEntry::new("A.pcc", 1)]);
        bytes[0] = 0;
        assert!(matches!(
            TocFile::read(&mut Cursor::new(&bytes)),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_read_rejects_truncated() {
        let bytes = build(vec![IndexEntry::new("A.pcc", 1)]);
        let truncated = &bytes[..bytes.len() - 3];
        assert!(matches!(
            TocFile::read(&mut Cursor::new(truncated)),
            Err(Error::Io(_))
        ));
    }

    proptest! {
        #[test]
        fn test_roundtrip_preserves_entries(
            files in prop::collection::hash_map("[A-Za-z0-9_]{1,16}\\.(pcc|tfc|afc)", any::<u32>(), 1..64)
        ) {
            let entries: Vec<IndexEntry> = files
                .iter()
                .map(|(name, size)| IndexEntry::new(format!("BIOGame\\CookedPCConsole\\{name}"), *size))
                .collect();
            let bytes = build(entries.clone());

            let toc = TocFile::read(&mut Cursor::new(&bytes)).unwrap();
            prop_assert_eq!(toc.header.hash_table_count as usize, toc.buckets.len());

            let expected: HashSet<IndexEntry> = entries.into_iter().collect();
            let actual: HashSet<IndexEntry> = toc.entries().cloned().collect();
            prop_assert_eq!(expected, actual);
        }
    }
}
