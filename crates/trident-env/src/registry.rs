//! Per-agent stable ID registries.
//!
//! Each agent keeps one registry for its own controllable units and one for
//! the adversary groups it has detected. A registry maps backend handles to
//! small agent-local integers that are handed out in increasing order and
//! never reused within an episode. IDs index the action and observation
//! schema, so a registry stops handing them out at its slot capacity.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use trident_core::enums::Faction;
use trident_core::types::{EntityHandle, TargetGroupHandle};

/// Outcome of a [`StableIdRegistry::track`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tracked {
    pub id: u32,
    /// False when the handle was already tracked.
    pub inserted: bool,
}

#[derive(Debug, Clone)]
pub struct StableIdRegistry<H> {
    owner: Faction,
    capacity: u32,
    ids: HashMap<H, u32>,
    handles: BTreeMap<u32, H>,
    next_id: u32,
    /// Handles turned away because every ID was spent.
    refused: HashSet<H>,
}

pub type EntityRegistry = StableIdRegistry<EntityHandle>;
pub type TargetGroupRegistry = StableIdRegistry<TargetGroupHandle>;

impl<H: Copy + Eq + Hash + Debug> StableIdRegistry<H> {
    /// A registry handing out IDs `0..capacity`.
    pub fn new(owner: Faction, capacity: usize) -> Self {
        Self {
            owner,
            capacity: u32::try_from(capacity).unwrap_or(u32::MAX),
            ids: HashMap::new(),
            handles: BTreeMap::new(),
            next_id: 0,
            refused: HashSet::new(),
        }
    }

    pub fn owner(&self) -> Faction {
        self.owner
    }

    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    /// Assign an ID to `handle`, or return the one it already has.
    ///
    /// Returns `None` once all `capacity` IDs of the episode have been
    /// handed out; the handle is then remembered in [`Self::refused`].
    ///
    /// # Panics
    ///
    /// If `faction` is not the registry's owner. Routing another faction's
    /// object here is an integration bug, not a game condition.
    pub fn track(&mut self, handle: H, faction: Faction) -> Option<Tracked> {
        assert_eq!(
            faction, self.owner,
            "cross-faction tracking: {handle:?} belongs to {faction:?}, registry is {:?}",
            self.owner
        );
        if let Some(&id) = self.ids.get(&handle) {
            return Some(Tracked {
                id,
                inserted: false,
            });
        }
        if self.next_id >= self.capacity {
            self.refused.insert(handle);
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.ids.insert(handle, id);
        self.handles.insert(id, handle);
        Some(Tracked { id, inserted: true })
    }

    /// Distinct handles refused for lack of IDs this episode.
    pub fn refused(&self) -> usize {
        self.refused.len()
    }

    pub fn is_refused(&self, handle: H) -> bool {
        self.refused.contains(&handle)
    }

    /// Stop tracking `handle`. Unknown handles are ignored.
    pub fn forget(&mut self, handle: H) -> Option<u32> {
        let id = self.ids.remove(&handle)?;
        self.handles.remove(&id);
        Some(id)
    }

    pub fn get(&self, id: u32) -> Option<H> {
        self.handles.get(&id).copied()
    }

    /// Look up a raw action-schema index. Negative or oversized values miss.
    pub fn get_raw(&self, id: i64) -> Option<H> {
        u32::try_from(id).ok().and_then(|id| self.get(id))
    }

    pub fn id_of(&self, handle: H) -> Option<u32> {
        self.ids.get(&handle).copied()
    }

    /// Currently tracked objects in ID order.
    pub fn all(&self) -> impl Iterator<Item = (u32, H)> + '_ {
        self.handles.iter().map(|(id, h)| (*id, *h))
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Forget everything and restart numbering.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.handles.clear();
        self.refused.clear();
        self.next_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_is_idempotent() {
        let mut reg = EntityRegistry::new(Faction::Legacy, 8);
        let a = reg.track(EntityHandle(10), Faction::Legacy).unwrap();
        let again = reg.track(EntityHandle(10), Faction::Legacy).unwrap();
        assert!(a.inserted);
        assert!(!again.inserted);
        assert_eq!(a.id, again.id);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut reg = TargetGroupRegistry::new(Faction::Dynasty, 8);
        let first = reg.track(TargetGroupHandle(1), Faction::Dynasty).unwrap().id;
        assert_eq!(reg.forget(TargetGroupHandle(1)), Some(first));
        let second = reg.track(TargetGroupHandle(1), Faction::Dynasty).unwrap().id;
        assert!(second > first);
        assert_eq!(reg.get(first), None);
        assert_eq!(reg.get(second), Some(TargetGroupHandle(1)));
    }

    #[test]
    fn unknown_lookups_miss() {
        let mut reg = EntityRegistry::new(Faction::Legacy, 8);
        reg.track(EntityHandle(3), Faction::Legacy);
        assert_eq!(reg.get(99), None);
        assert_eq!(reg.get_raw(-1), None);
        assert_eq!(reg.get_raw(i64::MAX), None);
        assert_eq!(reg.forget(EntityHandle(4)), None);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    #[should_panic(expected = "cross-faction tracking")]
    fn cross_faction_tracking_panics() {
        let mut reg = EntityRegistry::new(Faction::Legacy, 8);
        reg.track(EntityHandle(1), Faction::Dynasty);
    }

    #[test]
    fn all_lists_in_id_order() {
        let mut reg = EntityRegistry::new(Faction::Legacy, 8);
        for h in [30, 10, 20] {
            reg.track(EntityHandle(h), Faction::Legacy);
        }
        reg.forget(EntityHandle(10));
        let listed: Vec<_> = reg.all().collect();
        assert_eq!(listed, vec![(0, EntityHandle(30)), (2, EntityHandle(20))]);
    }

    #[test]
    fn churn_stops_at_capacity() {
        let mut reg = TargetGroupRegistry::new(Faction::Legacy, 3);
        for h in 0..10 {
            if let Some(t) = reg.track(TargetGroupHandle(h), Faction::Legacy) {
                assert!(t.id < 3);
                reg.forget(TargetGroupHandle(h));
            }
        }
        assert!(reg.is_empty());
        assert_eq!(reg.refused(), 7);
        assert!(reg.is_refused(TargetGroupHandle(9)));
        // Repeated reports of a refused handle count once.
        assert_eq!(reg.track(TargetGroupHandle(9), Faction::Legacy), None);
        assert_eq!(reg.refused(), 7);

        reg.clear();
        assert_eq!(reg.refused(), 0);
        assert_eq!(reg.track(TargetGroupHandle(9), Faction::Legacy).map(|t| t.id), Some(0));
    }
}
