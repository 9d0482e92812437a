//! Exclusively-owned driver object names.
//!
//! Every GPU object the context hands out is wrapped in a [`Unique`]. The
//! wrapper is move-only; dropping it passes the name to the object kind's
//! deleter, which queues it on the context's [`Recycler`] instead of calling
//! the driver. The actual deletion happens in
//! [`Context::perform_cleanup`](crate::Context::perform_cleanup).

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;

use crate::recycler::{Recycler, SharedRecycler};

/// Raw driver name. `0` is reserved for "no object".
pub type ObjectId = u32;

pub type ProgramId = ObjectId;
pub type ShaderId = ObjectId;
pub type BufferId = ObjectId;
pub type TextureId = ObjectId;
pub type VertexArrayId = ObjectId;
pub type FramebufferId = ObjectId;

/// The six kinds of driver object managed by the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Program,
    Shader,
    Buffer,
    Texture,
    VertexArray,
    Framebuffer,
}

impl ObjectKind {
    /// All kinds, in cleanup order.
    pub const ALL: [ObjectKind; 6] = [
        ObjectKind::Program,
        ObjectKind::Shader,
        ObjectKind::Buffer,
        ObjectKind::Texture,
        ObjectKind::VertexArray,
        ObjectKind::Framebuffer,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Program => "program",
            ObjectKind::Shader => "shader",
            ObjectKind::Buffer => "buffer",
            ObjectKind::Texture => "texture",
            ObjectKind::VertexArray => "vertex array",
            ObjectKind::Framebuffer => "framebuffer",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A driver object kind together with its deleter.
pub trait Object {
    const KIND: ObjectKind;

    /// Hands a dropped name over to the recycler.
    fn release(recycler: &mut Recycler, id: ObjectId) {
        recycler.abandon(Self::KIND, id);
    }
}

/// Type-level markers for each object kind.
pub mod kind {
    use super::{Object, ObjectId, ObjectKind};
    use crate::recycler::Recycler;

    pub enum Program {}
    pub enum Shader {}
    pub enum Buffer {}
    pub enum Texture {}
    pub enum VertexArray {}
    pub enum Framebuffer {}

    impl Object for Program {
        const KIND: ObjectKind = ObjectKind::Program;
    }

    impl Object for Shader {
        const KIND: ObjectKind = ObjectKind::Shader;
    }

    impl Object for Buffer {
        const KIND: ObjectKind = ObjectKind::Buffer;
    }

    impl Object for Texture {
        const KIND: ObjectKind = ObjectKind::Texture;

        // Textures go back to the pool while it has room.
        fn release(recycler: &mut Recycler, id: ObjectId) {
            recycler.recycle_texture(id);
        }
    }

    impl Object for VertexArray {
        const KIND: ObjectKind = ObjectKind::VertexArray;
    }

    impl Object for Framebuffer {
        const KIND: ObjectKind = ObjectKind::Framebuffer;
    }
}

/// Sole owner of one driver object name.
///
/// Not `Clone`: a name is never held by two live wrappers. May be dropped on
/// any thread; the deletion itself is deferred to the owning context.
pub struct Unique<K: Object> {
    id: ObjectId,
    recycler: SharedRecycler,
    _kind: PhantomData<fn() -> K>,
}

pub type UniqueProgram = Unique<kind::Program>;
pub type UniqueShader = Unique<kind::Shader>;
pub type UniqueBuffer = Unique<kind::Buffer>;
pub type UniqueTexture = Unique<kind::Texture>;
pub type UniqueVertexArray = Unique<kind::VertexArray>;
pub type UniqueFramebuffer = Unique<kind::Framebuffer>;

impl<K: Object> Unique<K> {
    pub(crate) fn new(id: ObjectId, recycler: SharedRecycler) -> Self {
        debug_assert_ne!(id, 0, "driver issued the reserved name 0");
        Self {
            id,
            recycler,
            _kind: PhantomData,
        }
    }

    /// The raw driver name.
    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The kind of object this wrapper owns.
    pub fn kind(&self) -> ObjectKind {
        K::KIND
    }
}

impl<K: Object> Drop for Unique<K> {
    fn drop(&mut self) {
        K::release(&mut self.recycler.lock(), self.id);
    }
}

impl<K: Object> fmt::Debug for Unique<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unique<{}>({})", K::KIND, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recycler::Recycler;

    fn recycler(pool_capacity: usize) -> SharedRecycler {
        Recycler::shared(pool_capacity)
    }

    #[test]
    fn drop_queues_name_on_abandoned_list() {
        let shared = recycler(4);
        let program = UniqueProgram::new(7, shared.clone());
        assert_eq!(program.id(), 7);
        assert!(shared.lock().is_empty());

        drop(program);

        assert_eq!(shared.lock().abandoned(ObjectKind::Program), &[7]);
    }

    #[test]
    fn each_kind_drops_onto_its_own_list() {
        let shared = recycler(0);
        drop(UniqueShader::new(1, shared.clone()));
        drop(UniqueBuffer::new(2, shared.clone()));
        drop(UniqueVertexArray::new(3, shared.clone()));
        drop(UniqueFramebuffer::new(4, shared.clone()));

        let r = shared.lock();
        assert_eq!(r.abandoned(ObjectKind::Shader), &[1]);
        assert_eq!(r.abandoned(ObjectKind::Buffer), &[2]);
        assert_eq!(r.abandoned(ObjectKind::VertexArray), &[3]);
        assert_eq!(r.abandoned(ObjectKind::Framebuffer), &[4]);
        assert!(r.abandoned(ObjectKind::Program).is_empty());
    }

    #[test]
    fn dropped_texture_returns_to_pool() {
        let shared = recycler(4);
        drop(UniqueTexture::new(9, shared.clone()));

        let r = shared.lock();
        assert_eq!(r.pooled_textures(), &[9]);
        assert!(r.abandoned(ObjectKind::Texture).is_empty());
    }

    #[test]
    fn unique_can_be_dropped_on_another_thread() {
        let shared = recycler(4);
        let buffer = UniqueBuffer::new(5, shared.clone());

        std::thread::spawn(move || drop(buffer))
            .join()
            .unwrap();

        assert_eq!(shared.lock().abandoned(ObjectKind::Buffer), &[5]);
    }

    #[test]
    fn debug_format_shows_kind_and_name() {
        let shared = recycler(4);
        let fb = UniqueFramebuffer::new(12, shared);
        assert_eq!(format!("{fb:?}"), "Unique<framebuffer>(12)");
        assert_eq!(fb.kind(), ObjectKind::Framebuffer);
    }

    #[test]
    fn unique_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<UniqueTexture>();
        assert_send_sync::<UniqueProgram>();
    }

    #[test]
    fn kind_indices_match_all_order() {
        for (i, kind) in ObjectKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
