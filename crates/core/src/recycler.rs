//! Deferred reclamation of driver object names.
//!
//! Deleters run wherever a [`Unique`](crate::object::Unique) is dropped,
//! which need not be the render thread. They only append to the lists held
//! here; the owning context drains them at a safe point.

use std::mem;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::object::{ObjectId, ObjectKind, TextureId};

/// Recycler shared between a context and the deleters of its objects.
pub type SharedRecycler = Arc<Mutex<Recycler>>;

/// Texture pool plus one abandoned list per object kind.
#[derive(Debug, Default)]
pub struct Recycler {
    pooled_textures: Vec<TextureId>,
    pool_capacity: usize,
    abandoned: [Vec<ObjectId>; 6],
}

impl Recycler {
    /// Creates an empty recycler whose texture pool holds at most
    /// `pool_capacity` names.
    pub fn new(pool_capacity: usize) -> Self {
        Self {
            pooled_textures: Vec::with_capacity(pool_capacity),
            pool_capacity,
            abandoned: Default::default(),
        }
    }

    pub fn shared(pool_capacity: usize) -> SharedRecycler {
        Arc::new(Mutex::new(Self::new(pool_capacity)))
    }

    /// Queues `id` for deletion at the next cleanup.
    pub fn abandon(&mut self, kind: ObjectKind, id: ObjectId) {
        self.abandoned[kind.index()].push(id);
    }

    /// Keeps a dropped texture name for reuse, or abandons it when the pool
    /// is full.
    pub fn recycle_texture(&mut self, id: TextureId) {
        if self.pooled_textures.len() < self.pool_capacity {
            self.pooled_textures.push(id);
        } else {
            self.abandon(ObjectKind::Texture, id);
        }
    }

    /// Takes the most recently pooled texture name, if any.
    pub fn take_pooled_texture(&mut self) -> Option<TextureId> {
        self.pooled_textures.pop()
    }

    pub fn pooled_textures(&self) -> &[TextureId] {
        &self.pooled_textures
    }

    pub fn abandoned(&self, kind: ObjectKind) -> &[ObjectId] {
        &self.abandoned[kind.index()]
    }

    /// Moves every pooled texture onto the abandoned texture list.
    pub fn drain_pool(&mut self) {
        let pooled = mem::take(&mut self.pooled_textures);
        self.abandoned[ObjectKind::Texture.index()].extend(pooled);
    }

    /// Empties every abandoned list, returning their contents.
    pub fn take_abandoned(&mut self) -> AbandonedObjects {
        AbandonedObjects {
            lists: mem::take(&mut self.abandoned),
        }
    }

    /// `true` when the pool and every abandoned list are empty.
    pub fn is_empty(&self) -> bool {
        self.pooled_textures.is_empty() && self.abandoned.iter().all(Vec::is_empty)
    }
}

/// A snapshot of abandoned names taken for one cleanup pass.
#[derive(Debug, Default)]
pub struct AbandonedObjects {
    lists: [Vec<ObjectId>; 6],
}

impl AbandonedObjects {
    pub fn get(&self, kind: ObjectKind) -> &[ObjectId] {
        &self.lists[kind.index()]
    }

    pub fn contains(&self, kind: ObjectKind, id: ObjectId) -> bool {
        id != 0 && self.get(kind).contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(Vec::is_empty)
    }

    pub fn total(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    /// Appends every name from `other`.
    pub fn merge(&mut self, other: AbandonedObjects) {
        for (mine, theirs) in self.lists.iter_mut().zip(other.lists) {
            mine.extend(theirs);
        }
    }

    /// Non-empty lists, in [`ObjectKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectKind, &[ObjectId])> + '_ {
        ObjectKind::ALL
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
            .filter(|(_, ids)| !ids.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_recycler_is_empty() {
        let r = Recycler::new(8);
        assert!(r.is_empty());
        assert!(r.pooled_textures().is_empty());
    }

    #[test]
    fn recycle_texture_fills_pool_then_abandons() {
        let mut r = Recycler::new(2);
        r.recycle_texture(1);
        r.recycle_texture(2);
        r.recycle_texture(3);

        assert_eq!(r.pooled_textures(), &[1, 2]);
        assert_eq!(r.abandoned(ObjectKind::Texture), &[3]);
    }

    #[test]
    fn zero_capacity_pool_abandons_every_texture() {
        let mut r = Recycler::new(0);
        r.recycle_texture(4);
        assert!(r.pooled_textures().is_empty());
        assert_eq!(r.abandoned(ObjectKind::Texture), &[4]);
    }

    #[test]
    fn take_pooled_texture_is_last_in_first_out() {
        let mut r = Recycler::new(4);
        r.recycle_texture(10);
        r.recycle_texture(11);
        assert_eq!(r.take_pooled_texture(), Some(11));
        assert_eq!(r.take_pooled_texture(), Some(10));
        assert_eq!(r.take_pooled_texture(), None);
    }

    #[test]
    fn take_abandoned_empties_lists() {
        let mut r = Recycler::new(0);
        r.abandon(ObjectKind::Program, 1);
        r.abandon(ObjectKind::Buffer, 2);
        r.abandon(ObjectKind::Buffer, 3);

        let taken = r.take_abandoned();
        assert_eq!(taken.get(ObjectKind::Program), &[1]);
        assert_eq!(taken.get(ObjectKind::Buffer), &[2, 3]);
        assert_eq!(taken.total(), 3);
        assert!(r.is_empty());
    }

    #[test]
    fn drain_pool_moves_pooled_textures_to_abandoned() {
        let mut r = Recycler::new(4);
        r.recycle_texture(5);
        r.recycle_texture(6);
        r.drain_pool();

        assert!(r.pooled_textures().is_empty());
        assert_eq!(r.abandoned(ObjectKind::Texture), &[5, 6]);
    }

    #[test]
    fn abandoned_objects_iter_skips_empty_kinds() {
        let mut r = Recycler::new(0);
        r.abandon(ObjectKind::Framebuffer, 8);
        r.abandon(ObjectKind::Shader, 9);
        let taken = r.take_abandoned();

        let kinds: Vec<ObjectKind> = taken.iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![ObjectKind::Shader, ObjectKind::Framebuffer]);
    }

    #[test]
    fn contains_never_matches_name_zero() {
        let mut r = Recycler::new(0);
        r.abandon(ObjectKind::Buffer, 0);
        let taken = r.take_abandoned();
        assert!(!taken.contains(ObjectKind::Buffer, 0));
    }

    #[test]
    fn merge_appends_lists() {
        let mut a = Recycler::new(0);
        a.abandon(ObjectKind::Program, 1);
        let mut b = Recycler::new(0);
        b.abandon(ObjectKind::Program, 2);
        b.abandon(ObjectKind::VertexArray, 3);

        let mut merged = a.take_abandoned();
        merged.merge(b.take_abandoned());
        assert_eq!(merged.get(ObjectKind::Program), &[1, 2]);
        assert_eq!(merged.get(ObjectKind::VertexArray), &[3]);
    }
}
