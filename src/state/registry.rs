use super::{lifecycle::Lifecycle, placement::Placement};
use crate::backend::{Content, SurfaceId};
use std::collections::HashMap;

/// A notification currently on screen or waiting to be placed
#[derive(Debug)]
pub struct NotificationEntry {
    pub id: u32,
    pub content: Content,
    pub transient: bool,
    pub surface: SurfaceId,
    /// Size used for the current placement
    pub size: (i32, i32),
    pub placement: Option<Placement>,
    pub lifecycle: Lifecycle,
}

/// Active notifications by id
#[derive(Debug)]
pub struct Registry {
    entries: HashMap<u32, NotificationEntry>,
    surfaces: HashMap<SurfaceId, u32>,
    next_id: u32,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            surfaces: HashMap::new(),
            next_id: 1,
        }
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next free id. Ids count up from 1, wrap around and skip 0 and
    /// every id still in use.
    pub fn generate_id(&mut self) -> u32 {
        loop {
            if self.next_id == 0 {
                self.next_id = 1;
            }
            let id = self.next_id;
            self.next_id = self.next_id.wrapping_add(1);
            if !self.entries.contains_key(&id) {
                return id;
            }
        }
    }

    pub fn insert(&mut self, entry: NotificationEntry) {
        self.surfaces.insert(entry.surface, entry.id);
        if let Some(old) = self.entries.insert(entry.id, entry) {
            self.surfaces.remove(&old.surface);
            tracing::warn!("Notification {} was registered twice", old.id);
        }
    }

    pub fn remove(&mut self, id: u32) -> Option<NotificationEntry> {
        let entry = self.entries.remove(&id)?;
        self.surfaces.remove(&entry.surface);
        Some(entry)
    }

    pub fn get(&self, id: u32) -> Option<&NotificationEntry> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut NotificationEntry> {
        self.entries.get_mut(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn by_surface(&self, surface: SurfaceId) -> Option<u32> {
        self.surfaces.get(&surface).copied()
    }

    /// Active ids in ascending order
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn set_next_id(&mut self, next_id: u32) {
        self.next_id = next_id;
    }
}
