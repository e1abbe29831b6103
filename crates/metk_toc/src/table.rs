//! TOC entries and the hash bucket table they are laid out in.
//!
//! The table starts with one bucket per entry and shrinks by a quarter at a time
//! while more than 25% of the buckets are empty, never going below half the entry
//! count. A sparse table is still valid; shrinking only keeps the file small.

use crate::game::{is_toc_file_name, TOC_PATH_SEPARATOR};
use crate::hash::{bounded, hash_name};

/// A single file described by a TOC.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexEntry {
    /// Path as stored in the TOC, relative to the TOC root and `\`-separated.
    pub path: String,
    /// File size in bytes at scan time.
    pub size: u32,
    /// Reserved, always `0` when generated.
    pub flags: u16,
}

impl IndexEntry {
    pub fn new(path: impl Into<String>, size: u32) -> Self {
        Self {
            path: path.into(),
            size,
            flags: 0,
        }
    }

    /// The bare filename, which is what gets hashed.
    pub fn file_name(&self) -> &str {
        self.path
            .rsplit([TOC_PATH_SEPARATOR, '/'])
            .next()
            .unwrap_or(&self.path)
    }

    /// Whether this entry describes the TOC file itself.
    pub fn is_toc_file(&self) -> bool {
        is_toc_file_name(self.file_name())
    }
}

/// Entries sharing one bounded hash value, in insertion order.
pub type HashBucket = Vec<IndexEntry>;

/// Fixed-size array of hash buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketTable {
    buckets: Vec<HashBucket>,
}

impl BucketTable {
    /// Lay `entries` out into an adaptively sized bucket table.
    ///
    /// An empty entry list produces a table with no buckets.
    pub fn build(entries: Vec<IndexEntry>) -> Self {
        if entries.is_empty() {
            return Self::default();
        }

        let hashes: Vec<u32> = entries
            .iter()
            .map(|entry| hash_name(entry.file_name()))
            .collect();
        let table_size = choose_table_size(&hashes);

        let mut buckets: Vec<HashBucket> = vec![Vec::new(); table_size];
        for (entry, hash) in entries.into_iter().zip(hashes) {
            buckets[bounded(hash, table_size)].push(entry);
        }

        Self { buckets }
    }

    pub fn buckets(&self) -> &[HashBucket] {
        &self.buckets
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether the table holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|bucket| bucket.is_empty())
    }

    pub fn entry_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn empty_bucket_count(&self) -> usize {
        self.buckets.iter().filter(|bucket| bucket.is_empty()).count()
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.buckets.iter().flatten()
    }
}

/// Pick the bucket count for the given entry hashes.
fn choose_table_size(hashes: &[u32]) -> usize {
    let floor = hashes.len().div_ceil(2);
    let mut table_size = hashes.len();
    let mut occupied = Vec::new();

    loop {
        occupied.clear();
        occupied.resize(table_size, false);
        for hash in hashes {
            occupied[bounded(*hash, table_size)] = true;
        }
        let empty = occupied.iter().filter(|used| !**used).count();

        tracing::trace!(
            "TOC table trial: size={} empty={} entries={}",
            table_size,
            empty,
            hashes.len()
        );

        if empty <= table_size / 4 {
            return table_size;
        }

        let shrunk = floor.max(table_size - table_size / 4);
        if shrunk == table_size {
            return table_size;
        }
        table_size = shrunk;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entries(names: &[&str]) -> Vec<IndexEntry> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| IndexEntry::new(format!("CookedPCConsole\\{name}"), i as u32))
            .collect()
    }

    #[test]
    fn test_file_name() {
        let entry = IndexEntry::new("BIOGame\\CookedPCConsole\\Startup.pcc", 1);
        assert_eq!(entry.file_name(), "Startup.pcc");
        assert_eq!(IndexEntry::new("Startup.pcc", 1).file_name(), "Startup.pcc");
        assert!(IndexEntry::new("DLC_MOD\\pcconsoletoc.bin", 0).is_toc_file());
        assert!(!IndexEntry::new("DLC_MOD\\Mount.dlc", 0).is_toc_file());
    }

    #[test]
    fn test_empty_table() {
        let table = BucketTable::build(Vec::new());
        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_two_entries() {
        let table = BucketTable::build(entries(&["A.pcc", "b.UPK"]));
        assert_eq!(table.len(), 2);
        assert_eq!(table.buckets()[0][0].file_name(), "b.UPK");
        assert_eq!(table.buckets()[1][0].file_name(), "A.pcc");
    }

    #[test]
    fn test_collision_chain_keeps_insertion_order() {
        let table = BucketTable::build(entries(&["F0.pcc", "F1.pcc", "F3.pcc"]));
        assert_eq!(table.len(), 3);
        assert_eq!(table.empty_bucket_count(), 1);
        let chain: Vec<&str> = table.buckets()[2]
            .iter()
            .map(IndexEntry::file_name)
            .collect();
        assert_eq!(chain, ["F0.pcc", "F3.pcc"]);
    }

    #[test]
    fn test_hash_uses_file_name_only() {
        let table = BucketTable::build(vec![
            IndexEntry::new("BIOGame\\CookedPCConsole\\A.pcc", 1),
            IndexEntry::new("BIOGame\\Movies\\b.UPK", 2),
        ]);
        assert_eq!(table.buckets()[1][0].path, "BIOGame\\CookedPCConsole\\A.pcc");
    }

    #[test]
    fn test_entries_land_in_bounded_hash_bucket() {
        let names: Vec<String> = (0..40).map(|i| format!("Pack{i}.tfc")).collect();
        let table = BucketTable::build(names.iter().map(|n| IndexEntry::new(n, 0)).collect());

        for (index, bucket) in table.buckets().iter().enumerate() {
            for entry in bucket {
                assert_eq!(crate::hash::bounded_hash(entry.file_name(), table.len()), index);
            }
        }
    }

    #[test]
    fn test_large_table_shrinks() {
        let names: Vec<String> = (0..100).map(|i| format!("File{i}.pcc")).collect();
        let table = BucketTable::build(names.iter().map(|n| IndexEntry::new(n, 0)).collect());
        assert_eq!(table.len(), 57);
        assert_eq!(table.entry_count(), 100);
    }

    proptest! {
        #[test]
        fn test_table_size_bounds(names in prop::collection::vec("[A-Za-z0-9_]{1,12}\\.pcc", 1..300)) {
            let n = names.len();
            let table = BucketTable::build(names.iter().map(|name| IndexEntry::new(name, 0)).collect());
            let size = table.len();

            prop_assert!(size >= n.div_ceil(2));
            prop_assert!(size <= n);
            prop_assert_eq!(table.entry_count(), n);

            let floor_hit = n.div_ceil(2).max(size - size / 4) == size;
            prop_assert!(table.empty_bucket_count() <= size / 4 || floor_hit);
        }
    }
}
