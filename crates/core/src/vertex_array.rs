//! Cache of configured vertex array objects.
//!
//! A vertex array captures the attribute pointers for one program, buffer
//! pair and base vertex. Reusing it saves re-issuing every attribute call.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHashMap;

use crate::object::{BufferId, ObjectKind, ProgramId, UniqueVertexArray, VertexArrayId};
use crate::recycler::AbandonedObjects;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexArrayKey {
    pub program: ProgramId,
    pub vertex_buffer: BufferId,
    /// `0` for non-indexed drawing.
    pub index_buffer: BufferId,
    pub vertex_offset: usize,
}

impl VertexArrayKey {
    /// Folds the four fields into one word.
    fn combined(&self) -> u64 {
        let fields = [
            u64::from(self.program),
            u64::from(self.vertex_buffer),
            u64::from(self.index_buffer),
            self.vertex_offset as u64,
        ];
        fields.iter().fold(0u64, |seed, &v| {
            seed ^ v
                .wrapping_add(0x9e37_79b9_7f4a_7c15)
                .wrapping_add(seed << 6)
                .wrapping_add(seed >> 2)
        })
    }

    /// Whether the key names any object in `abandoned`.
    pub fn references(&self, abandoned: &AbandonedObjects) -> bool {
        abandoned.contains(ObjectKind::Program, self.program)
            || abandoned.contains(ObjectKind::Buffer, self.vertex_buffer)
            || abandoned.contains(ObjectKind::Buffer, self.index_buffer)
    }
}

impl Hash for VertexArrayKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.combined());
    }
}

#[derive(Debug, Default)]
pub struct VertexArrayCache {
    entries: FxHashMap<VertexArrayKey, UniqueVertexArray>,
}

impl VertexArrayCache {
    pub fn get(&self, key: &VertexArrayKey) -> Option<VertexArrayId> {
        self.entries.get(key).map(UniqueVertexArray::id)
    }

    /// Stores `vertex_array` under `key`, returning its name. A previous
    /// entry for the key is dropped.
    pub fn insert(&mut self, key: VertexArrayKey, vertex_array: UniqueVertexArray) -> VertexArrayId {
        let id = vertex_array.id();
        self.entries.insert(key, vertex_array);
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &VertexArrayKey> + '_ {
        self.entries.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry whose key references an abandoned program or
    /// buffer. The dropped vertex arrays land on the abandoned list.
    ///
    /// Must not be called with the recycler locked.
    pub fn purge(&mut self, abandoned: &AbandonedObjects) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.references(abandoned));
        before - self.entries.len()
    }

    /// Drops every entry. Must not be called with the recycler locked.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recycler::Recycler;

    fn key(program: u32, vertex_buffer: u32, index_buffer: u32, vertex_offset: usize) -> VertexArrayKey {
        VertexArrayKey {
            program,
            vertex_buffer,
            index_buffer,
            vertex_offset,
        }
    }

    #[test]
    fn hash_depends_on_every_field() {
        let base = key(1, 2, 3, 4);
        assert_ne!(base.combined(), key(9, 2, 3, 4).combined());
        assert_ne!(base.combined(), key(1, 9, 3, 4).combined());
        assert_ne!(base.combined(), key(1, 2, 9, 4).combined());
        assert_ne!(base.combined(), key(1, 2, 3, 9).combined());
    }

    #[test]
    fn hash_is_order_sensitive() {
        assert_ne!(key(1, 2, 0, 0).combined(), key(2, 1, 0, 0).combined());
    }

    #[test]
    fn insert_then_get() {
        let shared = Recycler::shared(0);
        let mut cache = VertexArrayCache::default();
        let id = cache.insert(key(1, 1, 0, 0), UniqueVertexArray::new(5, shared));
        assert_eq!(id, 5);
        assert_eq!(cache.get(&key(1, 1, 0, 0)), Some(5));
        assert_eq!(cache.get(&key(1, 1, 0, 8)), None);
    }

    #[test]
    fn purge_drops_entries_referencing_abandoned_objects() {
        let shared = Recycler::shared(0);
        let mut cache = VertexArrayCache::default();
        cache.insert(key(1, 10, 0, 0), UniqueVertexArray::new(1, shared.clone()));
        cache.insert(key(2, 11, 20, 0), UniqueVertexArray::new(2, shared.clone()));
        cache.insert(key(3, 12, 0, 0), UniqueVertexArray::new(3, shared.clone()));

        let mut doomed = Recycler::new(0);
        doomed.abandon(ObjectKind::Program, 1);
        doomed.abandon(ObjectKind::Buffer, 20);
        let abandoned = doomed.take_abandoned();

        assert_eq!(cache.purge(&abandoned), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key(3, 12, 0, 0)), Some(3));

        let mut purged = shared.lock().abandoned(ObjectKind::VertexArray).to_vec();
        purged.sort_unstable();
        assert_eq!(purged, vec![1, 2]);
    }

    #[test]
    fn abandoned_name_zero_never_matches_non_indexed_keys() {
        let shared = Recycler::shared(0);
        let mut cache = VertexArrayCache::default();
        cache.insert(key(1, 10, 0, 0), UniqueVertexArray::new(1, shared));

        let mut doomed = Recycler::new(0);
        doomed.abandon(ObjectKind::Buffer, 0);
        assert_eq!(cache.purge(&doomed.take_abandoned()), 0);
    }

    #[test]
    fn clear_abandons_everything() {
        let shared = Recycler::shared(0);
        let mut cache = VertexArrayCache::default();
        cache.insert(key(1, 1, 0, 0), UniqueVertexArray::new(1, shared.clone()));
        cache.insert(key(1, 1, 0, 4), UniqueVertexArray::new(2, shared.clone()));

        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
        assert_eq!(shared.lock().abandoned(ObjectKind::VertexArray).len(), 2);
    }
}
