//! Helpers shared by the stage library.
use rand::RngCore;

use crate::error::{Error, Result};
use crate::grid::{TileKind, TileMap};
use crate::rng::rand01;

/// Returns the items in randomized order, drawing one value per removal.
pub(crate) fn shuffle<T>(rng: &mut dyn RngCore, mut items: Vec<T>) -> Vec<T> {
    let mut shuffled = Vec::with_capacity(items.len());
    while !items.is_empty() {
        let index = (rand01(rng) * items.len() as f64).floor() as usize;
        shuffled.push(items.remove(index));
    }
    shuffled
}

/// Converts uniformly random `source` tiles to `target` until
/// `count(target) / count(source)` reaches `target_density` or the source kind
/// is exhausted.
///
/// Counts are recomputed each round. A long run of rounds that change neither
/// count (blend mode or immutability swallowing every write) aborts with an
/// error instead of spinning forever.
pub(crate) fn fill_to_density(
    map: &mut TileMap,
    source: TileKind,
    target: TileKind,
    target_density: f64,
    rng: &mut dyn RngCore,
) -> Result<()> {
    let mut last_counts = None;
    let mut stalled = 0usize;
    loop {
        let sources = map.tiles_of_kind(source);
        if sources.is_empty() {
            return Ok(());
        }
        let target_count = map.count_of_kind(target);
        if target_count as f64 / sources.len() as f64 >= target_density {
            return Ok(());
        }
        if last_counts == Some((sources.len(), target_count)) {
            stalled += 1;
            if stalled > sources.len().max(64) {
                return Err(Error::Other(format!(
                    "density target {target_density} is unreachable: writes make no progress"
                )));
            }
        } else {
            stalled = 0;
        }
        last_counts = Some((sources.len(), target_count));

        let index = (rand01(rng) * sources.len() as f64).floor() as usize;
        let (x, y) = sources[index];
        map.symmetric_set_kind(x, y, target)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BlendMode;
    use crate::rng::Mulberry32;

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = Mulberry32::new(3);
        let mut shuffled = shuffle(&mut rng, (0..50).collect::<Vec<i32>>());
        shuffled.sort_unstable();
        assert_eq!(shuffled, (0..50).collect::<Vec<i32>>());
    }

    #[test]
    fn shuffle_is_deterministic_per_seed() {
        let mut a = Mulberry32::new(12);
        let mut b = Mulberry32::new(12);
        let items: Vec<i32> = (0..20).collect();
        assert_eq!(shuffle(&mut a, items.clone()), shuffle(&mut b, items));
    }

    #[test]
    fn fill_to_density_reaches_the_target_ratio() {
        let mut map = TileMap::new(12, 12).expect("valid dimensions");
        let mut rng = Mulberry32::new(77);
        fill_to_density(&mut map, TileKind::Empty, TileKind::Wall, 2.0, &mut rng)
            .expect("reachable target");
        let walls = map.count_of_kind(TileKind::Wall) as f64;
        let empties = map.count_of_kind(TileKind::Empty) as f64;
        assert!(empties > 0.0);
        assert!(walls / empties >= 2.0);
    }

    #[test]
    fn fill_to_density_fails_when_writes_are_swallowed() {
        let mut map = TileMap::new(8, 8).expect("valid dimensions");
        // Clear blend turns every wall write back into empty.
        map.set_blend_mode(BlendMode::Clear);
        let mut rng = Mulberry32::new(1);
        let result = fill_to_density(&mut map, TileKind::Empty, TileKind::Wall, 1.0, &mut rng);
        assert!(result.is_err());
    }
}
