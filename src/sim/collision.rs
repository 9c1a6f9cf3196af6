//! Contact resolution
//!
//! Contacts arrive as pairs of bodies tagged with category bitmasks. The
//! non-player side decides the effect: coins are consumed unconditionally,
//! platforms only react while the player is falling so the player can pass
//! up through them from below.

use serde::{Deserialize, Serialize};

use super::catalog::{Category, ItemKind};
use super::level::{ItemId, OverlayInstance};
use super::scheduler::Deferred;
use super::state::{Cue, Effect, Session, VisualKind};

/// One side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyRef {
    pub category: Category,
    /// Placed item behind this body, if any
    pub item: Option<ItemId>,
}

impl BodyRef {
    pub fn player() -> Self {
        Self {
            category: Category::PLAYER,
            item: None,
        }
    }

    pub fn edges() -> Self {
        Self {
            category: Category::EDGES,
            item: None,
        }
    }

    pub fn item(item: &OverlayInstance) -> Self {
        Self {
            category: item.category(),
            item: Some(item.id),
        }
    }
}

/// A begin-contact event from the physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub body_a: BodyRef,
    pub body_b: BodyRef,
}

/// What a contact did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactOutcome {
    /// No gameplay effect
    Ignored,
    CoinCollected(ItemKind),
    /// Bounced off a plain platform
    Landed,
    /// Bounced off and destroyed a breakable platform
    Broke,
}

/// Apply the gameplay effect of one contact
pub fn resolve_contact(session: &mut Session, contact: &ContactEvent) -> ContactOutcome {
    let other = if contact.body_a.category == Category::PLAYER {
        contact.body_b
    } else if contact.body_b.category == Category::PLAYER {
        contact.body_a
    } else {
        return ContactOutcome::Ignored;
    };
    let Some(id) = other.item else {
        return ContactOutcome::Ignored;
    };
    let falling = session.player.vel.y < 0.0;

    if other.category.intersects(Category::COIN_NORMAL) {
        if !consume(session, id, VisualKind::CollectNormal) {
            return ContactOutcome::Ignored;
        }
        session.jump_player();
        session.cue(Cue::Coin);
        ContactOutcome::CoinCollected(ItemKind::CoinPlain)
    } else if other.category.intersects(Category::COIN_SPECIAL) {
        if !consume(session, id, VisualKind::CollectSpecial) {
            return ContactOutcome::Ignored;
        }
        session.boost_player();
        session.cue(Cue::Boost);
        ContactOutcome::CoinCollected(ItemKind::CoinSpecial)
    } else if other.category.intersects(Category::PLATFORM_NORMAL) {
        if !falling || session.level.get(id).is_none() {
            return ContactOutcome::Ignored;
        }
        session.effect(Effect::PlatformShake { item: id });
        session.jump_player();
        session.cue(Cue::Jump);
        ContactOutcome::Landed
    } else if other.category.intersects(Category::PLATFORM_BREAKABLE) {
        if !falling || session.level.get(id).is_none() {
            return ContactOutcome::Ignored;
        }
        session.effect(Effect::PlatformShake { item: id });
        consume(session, id, VisualKind::BrokenPlatform);
        session.jump_player();
        session.cue(Cue::Brick);
        ContactOutcome::Broke
    } else {
        ContactOutcome::Ignored
    }
}

/// Remove an item with particles and a shrink-out. Returns false if the item
/// was already gone.
fn consume(session: &mut Session, id: ItemId, particles: VisualKind) -> bool {
    let Some(item) = session.level.remove(id) else {
        return false;
    };
    if !item.kind().is_platform() {
        session.score += 1;
    }
    let handle = session.spawn_visual(particles, item.pos, 1.0);
    let lifetime = session.tuning.particle_lifetime;
    session.scheduler.schedule(lifetime, Deferred::RemoveVisual(handle));
    session.effect(Effect::ShrinkAndRemove { item: id, pos: item.pos });
    session.touching.retain(|t| *t != id);
    true
}
