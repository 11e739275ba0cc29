//! Per-sprite cache of validated layouts.

use crate::layout::{LayoutError, SpriteLayout};
use evolvit_core::SpriteId;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

struct CacheEntry {
    raw: String,
    layout: Result<SpriteLayout, LayoutError>,
}

/// Decoded layouts keyed by sprite id.
///
/// An entry is reused only while the raw layout string for its id is
/// unchanged. Invalid layouts are cached as well so they are reported once.
#[derive(Default)]
pub struct SpriteCache {
    entries: HashMap<SpriteId, CacheEntry>,
    hits: u64,
    misses: u64,
}

impl SpriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout for `id`, decoding `raw` on a miss
    pub fn resolve(&mut self, id: SpriteId, raw: &str) -> Result<&SpriteLayout, &LayoutError> {
        let fresh = self.entries.get(&id).is_some_and(|entry| entry.raw == raw);

        if fresh {
            self.hits += 1;
        } else {
            self.misses += 1;
            let layout = SpriteLayout::parse(raw);
            match &layout {
                Ok(decoded) => debug!(sprite_id = id, organs = decoded.len(), "Decoded sprite layout"),
                Err(e) => warn!(sprite_id = id, "Sprite layout is not renderable: {}", e),
            }
            self.entries.insert(
                id,
                CacheEntry {
                    raw: raw.to_string(),
                    layout,
                },
            );
        }

        self.entries[&id].layout.as_ref()
    }

    /// Drop entries whose sprite id is no longer in the sprite table
    pub fn retain_table(&mut self, sprites: &BTreeMap<SpriteId, String>) {
        self.entries.retain(|id, _| sprites.contains_key(id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
