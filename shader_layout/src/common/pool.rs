use std::{
    hash::Hash,
    marker::PhantomData,
    num::NonZeroU32,
    sync::atomic::{AtomicU32, Ordering},
};

/// the only process wide state of the crate. It tags pools so keys of one
/// catalog do not resolve in another, nothing else reads it.
static NEXT_GENERATION: AtomicU32 = AtomicU32::new(1);

/// a generation that no other pool created in this process has been given.
///
/// wraps around after 2^32 - 1 pools, after which two pools may share a
/// generation again.
pub fn fresh_generation() -> NonZeroU32 {
    NonZeroU32::new(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)).unwrap_or(NonZeroU32::MIN)
}

/// append-only arena. Elements are never removed, so a [`Key`] stays valid
/// for as long as the pool lives.
///
/// keys remember the generation of the pool that created them, a key of a
/// different pool never resolves.
pub struct Pool<T> {
    store: Vec<T>,
    generation: NonZeroU32,
}

impl<T> Pool<T> {
    pub fn new(generation: NonZeroU32) -> Pool<T> {
        Pool {
            store: Vec::new(),
            generation,
        }
    }

    pub fn push(&mut self, t: T) -> Key<T> {
        let index = self.store.len();
        self.store.push(t);
        Key::new(index as u32, self.generation)
    }

    pub fn len(&self) -> usize { self.store.len() }

    pub fn is_empty(&self) -> bool { self.store.is_empty() }

    pub fn get(&self, key: Key<T>) -> Option<&T> {
        (key.generation == self.generation)
            .then_some(())
            .and_then(|_| self.store.get(key.index as usize))
    }

    pub fn get_mut(&mut self, key: Key<T>) -> Option<&mut T> {
        (key.generation == self.generation)
            .then_some(())
            .and_then(|_| self.store.get_mut(key.index as usize))
    }

    pub fn enumerate(&self) -> impl DoubleEndedIterator<Item = (Key<T>, &T)> {
        let generation = self.generation;
        self.store
            .iter()
            .enumerate()
            .map(move |(i, t)| (Key::new(i as u32, generation), t))
    }
}

pub struct Key<T> {
    generation: NonZeroU32,
    index: u32,
    phantom: PhantomData<T>,
}

impl<T> Key<T> {
    fn new(index: u32, generation: NonZeroU32) -> Self {
        Self {
            generation,
            index,
            phantom: PhantomData,
        }
    }

    pub fn generation(&self) -> NonZeroU32 { self.generation }

    /// position of the keyed element in insertion order
    pub fn index(&self) -> usize { self.index as usize }
}

impl<T> std::fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Key")
            .field("generation", &self.generation)
            .field("index", &self.index)
            .finish()
    }
}

impl<T> Eq for Key<T> {}

impl<T> PartialEq for Key<T> {
    fn eq(&self, other: &Self) -> bool { self.generation == other.generation && self.index == other.index }
}

impl<T> Hash for Key<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.generation.hash(state);
        self.index.hash(state);
    }
}

//workaround because we cannot derive copy and clone because of PhantomData
impl<T> Clone for Key<T> {
    fn clone(&self) -> Self { *self }
}

impl<T> Copy for Key<T> {}
