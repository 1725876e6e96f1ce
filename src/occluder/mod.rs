pub mod blocking;
pub mod segment;

pub use blocking::{Blocking, Channel, ChannelBlocking, Facing};
pub use segment::{Occluder, OccluderId, OccluderKind};

use slotmap::SlotMap;

/// Arena owning the occluder snapshot a sweep reads from.
///
/// Sweeps borrow the store immutably and keep every derived value in their
/// own tables, so one store can serve several origins at once.
#[derive(Debug, Default, Clone)]
pub struct OccluderStore {
    occluders: SlotMap<OccluderId, Occluder>,
}

impl OccluderStore {
    /// Creates a new, empty occluder store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an occluder and returns its ID.
    pub fn insert(&mut self, occluder: Occluder) -> OccluderId {
        self.occluders.insert(occluder)
    }

    /// Removes an occluder, returning it if it was present.
    pub fn remove(&mut self, id: OccluderId) -> Option<Occluder> {
        self.occluders.remove(id)
    }

    /// Looks up an occluder by id.
    #[must_use]
    pub fn get(&self, id: OccluderId) -> Option<&Occluder> {
        self.occluders.get(id)
    }

    /// Number of stored occluders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.occluders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occluders.is_empty()
    }

    /// Iterates occluders in a stable order (slot order).
    pub fn iter(&self) -> impl Iterator<Item = (OccluderId, &Occluder)> {
        self.occluders.iter()
    }
}

impl FromIterator<Occluder> for OccluderStore {
    fn from_iter<T: IntoIterator<Item = Occluder>>(iter: T) -> Self {
        let mut store = Self::new();
        for occluder in iter {
            store.insert(occluder);
        }
        store
    }
}
