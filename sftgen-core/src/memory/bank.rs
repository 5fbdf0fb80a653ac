//! The memory bank index: records keyed by `memory_id`.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use super::MemoryRecord;
use crate::error::Result;
use crate::io;

/// Read-only lookup table of memory records.
///
/// Built once before any episode is processed. Records with an empty id are
/// ignored; a later record with a duplicate id replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct MemoryBankIndex {
    records: HashMap<String, MemoryRecord>,
}

impl MemoryBankIndex {
    /// Create an empty index (memory disabled or no memory sources).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from in-memory records.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = MemoryRecord>) -> Self {
        let mut index = Self::new();
        index.extend(records);
        index
    }

    /// Load every JSONL source in order, later sources overwriting earlier
    /// ones on duplicate ids.
    ///
    /// # Errors
    ///
    /// Fails on the first unreadable file or malformed line.
    pub fn load<P: AsRef<Path>>(sources: &[P]) -> Result<Self> {
        let mut index = Self::new();
        for source in sources {
            let path = source.as_ref();
            info!(path = %path.display(), "Loading memory source");
            let records: Vec<MemoryRecord> = io::read_jsonl(path)?;
            debug!(path = %path.display(), records = records.len(), "Memory source parsed");
            index.extend(records);
        }
        info!(
            memories = index.len(),
            sources = sources.len(),
            "Memory bank loaded"
        );
        Ok(index)
    }

    /// Insert one record. Returns `false` if it had no id and was skipped.
    pub fn insert(&mut self, record: MemoryRecord) -> bool {
        if record.memory_id.is_empty() {
            return false;
        }
        self.records.insert(record.memory_id.clone(), record);
        true
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, memory_id: &str) -> Option<&MemoryRecord> {
        self.records.get(memory_id)
    }

    /// Whether a record with this id is indexed.
    #[must_use]
    pub fn contains(&self, memory_id: &str) -> bool {
        self.records.contains_key(memory_id)
    }

    /// Number of indexed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Extend<MemoryRecord> for MemoryBankIndex {
    fn extend<I: IntoIterator<Item = MemoryRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn record(id: &str, query: &str) -> MemoryRecord {
        MemoryRecord {
            memory_id: id.to_string(),
            query: query.to_string(),
            ..MemoryRecord::default()
        }
    }

    #[test]
    fn empty_ids_are_not_indexed() {
        let mut index = MemoryBankIndex::new();
        assert!(!index.insert(record("", "no id")));
        assert!(index.insert(record("m1", "has id")));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn duplicate_ids_last_write_wins() {
        let index = MemoryBankIndex::from_records([record("m1", "first"), record("m1", "second")]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("m1").map(|r| r.query.as_str()), Some("second"));
    }

    #[test]
    fn later_sources_override_earlier_ones() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = dir.path().join("a_memory.jsonl");
        let b = dir.path().join("b_memory.jsonl");
        let mut fa = std::fs::File::create(&a).expect("create a");
        writeln!(fa, r#"{{"memory_id": "m1", "query": "from a"}}"#).expect("write");
        writeln!(fa, r#"{{"query": "missing id"}}"#).expect("write");
        writeln!(fa, r#"{{"memory_id": "m2", "query": "only a"}}"#).expect("write");
        let mut fb = std::fs::File::create(&b).expect("create b");
        writeln!(fb, r#"{{"memory_id": "m1", "query": "from b"}}"#).expect("write");

        let index = MemoryBankIndex::load(&[&a, &b]).expect("load");
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("m1").map(|r| r.query.as_str()), Some("from b"));
        assert!(index.contains("m2"));
    }

    #[test]
    fn loading_no_sources_gives_empty_bank() {
        let index = MemoryBankIndex::load::<&Path>(&[]).expect("load");
        assert!(index.is_empty());
    }
}
