//! Minimal body integration and contact detection
//!
//! Stands in for a physics engine in the headless core: explicit Euler
//! gravity on the player body and AABB overlap tests against active items.
//! Only newly started overlaps are reported, matching begin-contact callbacks.

use super::collision::{BodyRef, ContactEvent};
use super::level::{ItemId, OverlayInstance};
use super::player::PlayerBody;
use super::state::Session;
use crate::Rect;

/// Apply gravity and move the body (no-op unless dynamic)
pub fn integrate(body: &mut PlayerBody, gravity: f32, dt: f32) {
    if !body.dynamic {
        return;
    }
    body.vel.y += gravity * dt;
    body.pos += body.vel * dt;
}

/// Report overlaps that were not present last step and update `touching`
/// to the current overlap set.
pub fn begin_contacts(player: Rect, items: &[OverlayInstance], touching: &mut Vec<ItemId>) -> Vec<ContactEvent> {
    let mut current = Vec::new();
    let mut events = Vec::new();
    for item in items.iter().filter(|item| item.alive) {
        if !player.intersects(&item.bounds()) {
            continue;
        }
        current.push(item.id);
        if !touching.contains(&item.id) {
            events.push(ContactEvent {
                body_a: BodyRef::player(),
                body_b: BodyRef::item(item),
            });
        }
    }
    *touching = current;
    events
}

/// Integrate the player and collect this step's begin contacts
pub fn step(session: &mut Session, dt: f32) -> Vec<ContactEvent> {
    integrate(&mut session.player, session.tuning.gravity, dt);
    if !session.player.dynamic {
        return Vec::new();
    }
    begin_contacts(session.player.bounds(), session.level.items(), &mut session.touching)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::{ItemKind, OverlayCatalog, Shape};
    use crate::sim::level::LevelGenerator;
    use crate::tuning::FootprintTable;
    use glam::Vec2;

    #[test]
    fn test_static_body_does_not_move() {
        let mut body = PlayerBody::new(Vec2::new(10.0, 10.0));
        integrate(&mut body, -1000.0, 0.1);
        assert_eq!(body.pos, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut body = PlayerBody::new(Vec2::ZERO);
        body.dynamic = true;
        integrate(&mut body, -1000.0, 0.1);
        assert!((body.vel.y + 100.0).abs() < 1e-3);
        assert!((body.pos.y + 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_contacts_begin_once() {
        let catalog = OverlayCatalog::new(&FootprintTable::default()).unwrap();
        let mut level = LevelGenerator::new(Vec2::new(500.0, 0.0), 100.0, &catalog, 1000.0);
        level.place(catalog.archetype(ItemKind::CoinPlain, Shape::Cross), false);
        let first = level.items()[0].pos;
        let player = Rect::from_center(first, Vec2::splat(50.0));
        let mut touching = Vec::new();

        let events = begin_contacts(player, level.items(), &mut touching);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].body_b.category, crate::sim::Category::PLATFORM_NORMAL);

        // Still overlapping: no new contact
        assert!(begin_contacts(player, level.items(), &mut touching).is_empty());

        // Leave and come back: contact begins again
        let away = Rect::from_center(first + Vec2::new(0.0, -5000.0), Vec2::splat(50.0));
        assert!(begin_contacts(away, level.items(), &mut touching).is_empty());
        assert_eq!(begin_contacts(player, level.items(), &mut touching).len(), 1);
    }
}
