//! Entity trait: identity + creation time.

use chrono::{DateTime, Utc};

/// A persisted record with a stable identity and an immutable creation time.
pub trait Entity {
    /// Strongly-typed entity identifier. Ordered so recency ties break deterministically.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    fn created_at(&self) -> DateTime<Utc>;

    /// Ordering key for "most recent": creation time, then id.
    fn recency_key(&self) -> (DateTime<Utc>, Self::Id) {
        (self.created_at(), *self.id())
    }
}

/// Pick the most recently created entity (highest `created_at`, then highest id).
pub fn most_recent<'a, E, I>(entities: I) -> Option<&'a E>
where
    E: Entity + 'a,
    I: IntoIterator<Item = &'a E>,
{
    entities.into_iter().max_by_key(|e| e.recency_key())
}

/// Sort entities newest first (creation time desc, then id desc).
pub fn sort_newest_first<E: Entity>(entities: &mut [E]) {
    entities.sort_by(|a, b| b.recency_key().cmp(&a.recency_key()));
}
