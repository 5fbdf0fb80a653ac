//! Join an episode's used-memory references against the bank.

use tracing::trace;

use super::{MemoryBankIndex, RetrievedMemory, UsedMemoryReference};

/// Resolve `references` into materialized memory views.
///
/// Output order follows `references`; nothing is re-sorted by similarity.
/// References whose id is not in the bank are dropped: retrieval may point
/// at memories produced by a different run.
#[must_use]
pub fn resolve(references: &[UsedMemoryReference], bank: &MemoryBankIndex) -> Vec<RetrievedMemory> {
    references
        .iter()
        .filter_map(|reference| {
            let Some(record) = bank.get(&reference.memory_id) else {
                trace!(memory_id = %reference.memory_id, "Dangling memory reference dropped");
                return None;
            };
            Some(RetrievedMemory {
                memory_id: reference.memory_id.clone(),
                similarity: reference.similarity,
                query: record.query.clone(),
                is_success: record.is_success,
                trajectory: record.trajectory.clone(),
                memory_items: record.memory_items.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryItem, MemoryRecord};

    fn bank() -> MemoryBankIndex {
        MemoryBankIndex::from_records([
            MemoryRecord {
                memory_id: "m1".into(),
                query: "heat an egg".into(),
                is_success: true,
                memory_items: vec![MemoryItem {
                    title: "Use the microwave".into(),
                    description: "Eggs heat in microwave 1".into(),
                    content: String::new(),
                }],
                ..MemoryRecord::default()
            },
            MemoryRecord {
                memory_id: "m2".into(),
                query: "cool a tomato".into(),
                ..MemoryRecord::default()
            },
        ])
    }

    fn reference(id: &str, similarity: f64) -> UsedMemoryReference {
        UsedMemoryReference {
            memory_id: id.into(),
            similarity,
        }
    }

    #[test]
    fn keeps_reference_order_and_similarity() {
        let refs = [reference("m2", 0.4), reference("m1", 0.9)];
        let resolved = resolve(&refs, &bank());
        let ids: Vec<_> = resolved.iter().map(|m| m.memory_id.as_str()).collect();
        assert_eq!(ids, ["m2", "m1"]);
        assert!((resolved[1].similarity - 0.9).abs() < f64::EPSILON);
        assert!(resolved[1].is_success);
        assert_eq!(resolved[1].memory_items.len(), 1);
    }

    #[test]
    fn dangling_references_are_dropped() {
        let refs = [reference("ghost", 0.99), reference("m1", 0.5)];
        let resolved = resolve(&refs, &bank());
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].memory_id, "m1");
    }

    #[test]
    fn empty_bank_resolves_nothing() {
        let refs = [reference("m1", 0.5)];
        assert!(resolve(&refs, &MemoryBankIndex::new()).is_empty());
    }
}
