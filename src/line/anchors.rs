//! In-memory anchor store
//!
//! Minimal `AnchorSource` for hosts without a scene graph (and for tests).

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::host::{AnchorId, AnchorSource};

/// A tracked object position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub id: AnchorId,
    pub position: Vec3,
}

/// Anchors kept sorted by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnchorSet {
    anchors: Vec<Anchor>,
    next_id: u32,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self {
            anchors: Vec::new(),
            next_id: 1,
        }
    }

    /// Add an anchor and return its id
    pub fn spawn(&mut self, position: Vec3) -> AnchorId {
        let id = AnchorId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.anchors.push(Anchor { id, position });
        id
    }

    /// Remove an anchor, returning its last position
    pub fn despawn(&mut self, id: AnchorId) -> Option<Vec3> {
        let index = self.index_of(id)?;
        Some(self.anchors.remove(index).position)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    fn index_of(&self, id: AnchorId) -> Option<usize> {
        self.anchors.binary_search_by_key(&id, |a| a.id).ok()
    }
}

impl AnchorSource for AnchorSet {
    fn anchor_position(&self, id: AnchorId) -> Option<Vec3> {
        self.index_of(id).map(|i| self.anchors[i].position)
    }

    fn set_anchor_position(&mut self, id: AnchorId, position: Vec3) -> bool {
        match self.index_of(id) {
            Some(i) => {
                self.anchors[i].position = position;
                true
            }
            None => false,
        }
    }
}
