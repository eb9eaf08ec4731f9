//! Pairwise overlap detection, elastic response and proximity links.
//!
//! Every frame scans all unordered pairs, which is O(n²). That is fine for a
//! café (tens of stains, capacity 64). A much larger crowd would need a
//! uniform grid so each stain only checks neighbouring cells.

use crate::dataset::Category;
use crate::entity::Entity;
use crate::settings::Settings;

/// A resolved hit between stains `a` and `b` (indices into the scene)
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollisionEvent {
    pub a: usize,
    pub b: usize,
    pub category_a: Category,
    pub category_b: Category,
}

impl CollisionEvent {
    pub fn same_category(&self) -> bool {
        self.category_a == self.category_b
    }
}

/// Faint line between two nearby stains that are not touching
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    /// Line alpha in [0, link_alpha]
    pub alpha: f32,
}

/// Outcome of one pairwise pass
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Pairs found overlapping
    pub overlapping: usize,
    /// Pairs whose velocities were actually changed
    pub resolved: usize,
}

pub fn overlaps(a: &Entity, b: &Entity) -> bool {
    a.distance_to(b) < a.contact_distance(b)
}

/// Resolve an overlapping pair in place.
///
/// Returns false without touching either stain when the centres coincide or
/// the pair is already moving apart along the normal.
pub fn resolve(a: &mut Entity, b: &mut Entity, settings: &Settings) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let distance = libm::sqrtf(dx * dx + dy * dy);
    if distance == 0.0 {
        return false;
    }

    let nx = dx / distance;
    let ny = dy / distance;

    let dvn = (b.vx - a.vx) * nx + (b.vy - a.vy) * ny;
    if dvn >= 0.0 {
        return false;
    }

    let impulse = -settings.restitution * dvn;
    a.vx -= impulse * nx;
    a.vy -= impulse * ny;
    b.vx += impulse * nx;
    b.vy += impulse * ny;

    let overlap = a.contact_distance(b) - distance;
    let push = overlap / 2.0;
    a.x -= push * nx;
    a.y -= push * ny;
    b.x += push * nx;
    b.y += push * ny;

    a.size = a.base_size * settings.pop_scale;
    b.size = b.base_size * settings.pop_scale;
    true
}

/// Run detection and resolution over every pair `i < j`.
///
/// `on_hit` receives an event for each resolved collision, in scan order.
pub fn collide_all<F>(entities: &mut [Entity], settings: &Settings, mut on_hit: F) -> CollisionStats
where
    F: FnMut(CollisionEvent),
{
    let mut stats = CollisionStats::default();
    for i in 0..entities.len() {
        // Split so both halves of the pair can be borrowed mutably
        let (head, tail) = entities.split_at_mut(i + 1);
        let a = &mut head[i];
        for (offset, b) in tail.iter_mut().enumerate() {
            if !overlaps(a, b) {
                continue;
            }
            stats.overlapping += 1;
            if resolve(a, b, settings) {
                stats.resolved += 1;
                on_hit(CollisionEvent {
                    a: i,
                    b: i + 1 + offset,
                    category_a: a.category,
                    category_b: b.category,
                });
            }
        }
    }
    stats
}

/// Link between two stains, if they are close but not touching.
///
/// Alpha falls linearly from `link_alpha` at the contact distance to zero at
/// `link_radius`, then scales by both opacities.
pub fn link_between(a: &Entity, b: &Entity, settings: &Settings) -> Option<f32> {
    let d = a.distance_to(b);
    let contact = a.contact_distance(b);
    if d >= settings.link_radius || d <= contact {
        return None;
    }
    let span = settings.link_radius - contact;
    let t = (d - contact) / span;
    Some(settings.link_alpha * (1.0 - t) * a.opacity * b.opacity)
}

/// All links in the scene, in pair order
pub fn links<'a>(entities: &'a [Entity], settings: &'a Settings) -> impl Iterator<Item = Link> + 'a {
    (0..entities.len()).flat_map(move |a| {
        ((a + 1)..entities.len()).filter_map(move |b| {
            link_between(&entities[a], &entities[b], settings).map(|alpha| Link { a, b, alpha })
        })
    })
}
