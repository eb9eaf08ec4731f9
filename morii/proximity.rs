//! Isolation flags: who has nobody nearby

use crate::entity::Entity;

/// True when no other stain's centre is within `radius` of stain `index`.
///
/// Faded stains still count as company. O(n) per stain, O(n²) for a scene.
pub fn is_isolated(entities: &[Entity], index: usize, radius: f32) -> bool {
    let Some(me) = entities.get(index) else {
        return false;
    };
    entities
        .iter()
        .enumerate()
        .all(|(j, other)| j == index || me.distance_to(other) >= radius)
}

/// Isolation flag for every stain, in scene order
pub fn isolation_flags(entities: &[Entity], radius: f32) -> impl Iterator<Item = bool> + '_ {
    (0..entities.len()).map(move |i| is_isolated(entities, i, radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Category;
    use crate::shape::{Offset, STAIN_POINTS};

    fn at(x: f32, y: f32) -> Entity {
        Entity {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            size: 30.0,
            base_size: 30.0,
            category: Category::Older,
            opacity: 1.0,
            fade_rate: 0.001,
            shape: [Offset::default(); STAIN_POINTS],
            rotation: 0.0,
            rotation_speed: 0.0,
        }
    }

    #[test]
    fn loner_and_clustered_pair() {
        let scene = [at(100.0, 100.0), at(150.0, 120.0), at(900.0, 600.0)];
        let flags: std::vec::Vec<bool> = isolation_flags(&scene, 200.0).collect();
        assert_eq!(flags, [false, false, true]);
    }

    #[test]
    fn boundary_distance_counts_as_alone() {
        let scene = [at(0.0, 0.0), at(200.0, 0.0)];
        assert!(is_isolated(&scene, 0, 200.0));
        let scene = [at(0.0, 0.0), at(199.9, 0.0)];
        assert!(!is_isolated(&scene, 0, 200.0));
    }

    #[test]
    fn faded_neighbours_still_count() {
        let mut ghost = at(50.0, 0.0);
        ghost.opacity = 0.0;
        let scene = [at(0.0, 0.0), ghost];
        assert!(!is_isolated(&scene, 0, 200.0));
    }

    #[test]
    fn single_stain_is_isolated() {
        assert!(is_isolated(&[at(5.0, 5.0)], 0, 200.0));
        assert!(!is_isolated(&[], 0, 200.0));
    }
}
