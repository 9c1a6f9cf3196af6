//! Procedural level generation and culling
//!
//! Items are stacked upward only: each new overlay sits directly on top of
//! the previous one (footprints abut, no gap). The active collection is the
//! single owner of every placed item; removal happens through culling or
//! gameplay consumption and is idempotent.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::{Archetype, Category, ItemKind, OverlayCatalog, Shape};
use super::rng::SimRng;
use crate::Rect;
use crate::consts::*;

/// Stable identifier of a placed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// One placed occurrence of an archetype
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayInstance {
    pub id: ItemId,
    pub archetype: Archetype,
    pub pos: Vec2,
    /// Mirrored horizontally
    pub flipped: bool,
    pub alive: bool,
}

impl OverlayInstance {
    #[inline]
    pub fn kind(&self) -> ItemKind {
        self.archetype.kind
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.archetype.kind.category()
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, self.archetype.footprint.size())
    }
}

/// Roll the weighted placement policy once
pub fn choose_item(rng: &mut SimRng, catalog: &OverlayCatalog) -> (ItemKind, Shape, bool) {
    let kind = if rng.percent() <= PLATFORM_PERCENT {
        if rng.percent() <= PLAIN_PLATFORM_PERCENT {
            ItemKind::PlatformPlain
        } else {
            ItemKind::PlatformBreakable
        }
    } else if rng.percent() <= PLAIN_COIN_PERCENT {
        ItemKind::CoinPlain
    } else {
        ItemKind::CoinSpecial
    };
    let variant = rng.pick(catalog.variants(kind));
    (kind, variant.shape, variant.flipped)
}

/// Owns the active items and the upward placement cursor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelGenerator {
    last_placed: Vec2,
    last_half_height: f32,
    /// Highest Y content has been requested up to
    level_top: f32,
    /// Active items, ordered by placement (and therefore by id and Y)
    items: Vec<OverlayInstance>,
    next_id: u32,
}

impl LevelGenerator {
    /// Start a level with a plain five-across platform just under the player
    pub fn new(player_pos: Vec2, player_height: f32, catalog: &OverlayCatalog, level_top: f32) -> Self {
        let archetype = catalog.archetype(ItemKind::PlatformPlain, Shape::FiveAcross);
        let pos = Vec2::new(
            player_pos.x,
            player_pos.y - (player_height * 0.5 + archetype.footprint.height * 0.2),
        );
        let mut level = Self {
            last_placed: pos,
            last_half_height: archetype.footprint.half_height(),
            level_top,
            items: Vec::new(),
            next_id: 1,
        };
        level.push(archetype, pos, false);
        level
    }

    pub fn last_placed(&self) -> Vec2 {
        self.last_placed
    }

    pub fn last_half_height(&self) -> f32 {
        self.last_half_height
    }

    pub fn level_top(&self) -> f32 {
        self.level_top
    }

    pub fn items(&self) -> &[OverlayInstance] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&OverlayInstance> {
        self.items.iter().find(|item| item.id == id)
    }

    fn push(&mut self, archetype: Archetype, pos: Vec2, flipped: bool) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.push(OverlayInstance {
            id,
            archetype,
            pos,
            flipped,
            alive: true,
        });
        id
    }

    /// Place an archetype directly above the previous item
    pub fn place(&mut self, archetype: Archetype, flipped: bool) -> ItemId {
        let half = archetype.footprint.half_height();
        self.last_placed.y += self.last_half_height + half;
        self.last_half_height = half;
        self.push(archetype, self.last_placed, flipped)
    }

    /// Append randomly chosen items until the cursor reaches `target_y`.
    /// Returns the number of items placed.
    pub fn generate_up_to(&mut self, target_y: f32, rng: &mut SimRng, catalog: &OverlayCatalog) -> usize {
        if !target_y.is_finite() {
            log::warn!("Ignoring non-finite generation target {target_y}");
            return 0;
        }
        let mut placed = 0;
        while self.last_placed.y < target_y {
            let (kind, shape, flipped) = choose_item(rng, catalog);
            self.place(catalog.archetype(kind, shape), flipped);
            placed += 1;
        }
        if placed > 0 {
            log::debug!(
                "Generated {} items up to y={:.0} (cursor {:.0})",
                placed,
                target_y,
                self.last_placed.y
            );
        }
        placed
    }

    /// Extend by one background segment once the centre of the view gets
    /// within `scene_height * extend_threshold` of the top of generated
    /// content. `camera_y` is the bottom edge of the view. Returns the base Y
    /// of the new segment.
    pub fn extend_for_camera(
        &mut self,
        camera_y: f32,
        scene_height: f32,
        extend_threshold: f32,
        segment_height: f32,
        rng: &mut SimRng,
        catalog: &OverlayCatalog,
    ) -> Option<f32> {
        let view_center = camera_y + scene_height / 2.0;
        if view_center <= self.level_top - scene_height * extend_threshold {
            return None;
        }
        let segment_base = self.level_top;
        self.level_top += segment_height;
        self.generate_up_to(self.level_top, rng, catalog);
        Some(segment_base)
    }

    /// Remove one item. Removing an id that is no longer active is a no-op
    /// and returns `None`.
    pub fn remove(&mut self, id: ItemId) -> Option<OverlayInstance> {
        let index = self.items.iter().position(|item| item.id == id)?;
        let mut item = self.items.remove(index);
        item.alive = false;
        Some(item)
    }

    /// Drop every item the predicate reports as not visible.
    /// Returns the removed items, each marked not-alive.
    pub fn cull(&mut self, mut is_visible: impl FnMut(&OverlayInstance) -> bool) -> Vec<OverlayInstance> {
        let mut removed = Vec::new();
        self.items.retain(|item| {
            if is_visible(item) {
                true
            } else {
                let mut gone = item.clone();
                gone.alive = false;
                removed.push(gone);
                false
            }
        });
        if !removed.is_empty() {
            log::trace!("Culled {} items, {} active", removed.len(), self.items.len());
        }
        removed
    }
}
