//! Connectivity repair: punches walls between isolated empty regions.
use std::collections::HashSet;

use rand::RngCore;

use crate::error::Result;
use crate::events::{Color, EventSink, PipelineEvent};
use crate::grid::{Direction, TileKind, TileMap, PROP_IMMUTABLE};
use crate::stage::{Schema, SettingSpec, Settings, Stage};

/// An empty tile carrying a region label and its display color.
struct RegionTile {
    x: i32,
    y: i32,
    id: u32,
    color: Color,
}

/// A connected group of labeled tiles.
struct Region {
    id: u32,
    count: usize,
    tiles: Vec<(i32, i32)>,
}

/// Labels connected empty regions and punches openings through the walls
/// separating the smallest region from the rest, repeating until the map is
/// fully connected or labeling settles.
///
/// Every labeled tile gets a random highlight color, so the stage consumes
/// random draws even when no sink listens. Walls are punched closest-first,
/// measured as straight-line distance to the nearest tile of another region.
/// Immutable walls are never punched; a region fenced in by them alone stays
/// isolated.
pub struct HolePuncher;

impl Stage for HolePuncher {
    fn name(&self) -> &'static str {
        "holepuncher"
    }

    fn label(&self) -> &'static str {
        "Hole Puncher"
    }

    fn schema(&self) -> Schema {
        Schema::new().with(
            "punch_rate",
            SettingSpec::Number {
                label: "Punch Rate",
                default: 0.2,
                min: 0.01,
                max: 1.0,
                step: 0.01,
                random_range: Some((0.01, 1.0)),
            },
        )
    }

    fn execute(
        &self,
        map: &mut TileMap,
        settings: &Settings,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<()> {
        let punch_rate = settings.number("punch_rate")?;

        let mut counter = 0u32;
        let mut tracked: HashSet<(i32, i32)> = HashSet::new();
        let mut labeled: Vec<RegionTile> = Vec::new();
        for (x, y) in map.tiles_of_kind(TileKind::Empty) {
            labeled.push(label_tile(x, y, &mut counter, rng, sink));
            tracked.insert((x, y));
        }
        if labeled.is_empty() {
            return Ok(());
        }

        let mut iteration = 0;
        loop {
            let (regions, change) = relax(&mut labeled, sink, iteration == 0);
            iteration += 1;

            if regions.len() == 1 {
                return Ok(());
            }

            // Repair the smallest region first.
            let target = &regions[0];
            let mut punch_count = (target.count as f64 * punch_rate).ceil() as usize;

            let mut touching: Vec<(i32, i32)> = Vec::new();
            for &(x, y) in &target.tiles {
                for dir in Direction::ORTHOGONAL {
                    let Some(neighbor) = map.adjacent(x, y, dir) else {
                        continue;
                    };
                    if neighbor.kind() == TileKind::Empty
                        || neighbor.has_property(PROP_IMMUTABLE)
                    {
                        continue;
                    }
                    let coords = neighbor.coords();
                    if !touching.contains(&coords) {
                        touching.push(coords);
                    }
                }
            }

            let mut ranked: Vec<((i32, i32), f64)> = touching
                .into_iter()
                .map(|(wx, wy)| {
                    let mut distance = f64::INFINITY;
                    for region in &regions {
                        if region.id == target.id {
                            continue;
                        }
                        for &(tx, ty) in &region.tiles {
                            let d = f64::from((wx - tx).pow(2) + (wy - ty).pow(2)).sqrt();
                            if d < distance {
                                distance = d;
                            }
                        }
                    }
                    ((wx, wy), distance)
                })
                .collect();
            ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

            punch_count = punch_count.min(ranked.len());
            for &((wx, wy), _) in ranked.iter().take(punch_count) {
                for (px, py) in map.symmetric_set_kind(wx, wy, TileKind::Empty)? {
                    if tracked.contains(&(px, py))
                        || map.get_tile(px, py)?.kind() != TileKind::Empty
                    {
                        continue;
                    }
                    labeled.push(label_tile(px, py, &mut counter, rng, sink));
                    tracked.insert((px, py));
                }
            }

            if !change {
                return Ok(());
            }
        }
    }
}

fn label_tile(
    x: i32,
    y: i32,
    counter: &mut u32,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> RegionTile {
    let id = *counter;
    *counter += 1;
    let color = Color::random(rng);
    sink.send(PipelineEvent::Computation { x, y, color });
    RegionTile { x, y, id, color }
}

/// Propagates the lowest label across orthogonal neighbors until stable, then
/// groups the tiles into regions sorted by ascending size.
fn relax(
    labeled: &mut [RegionTile],
    sink: &mut dyn EventSink,
    log_sorted: bool,
) -> (Vec<Region>, bool) {
    let mut change = false;
    loop {
        let mut growth = false;
        for i in 0..labeled.len() {
            for j in 0..labeled.len() {
                if i == j {
                    continue;
                }
                let dx = (labeled[i].x - labeled[j].x).abs();
                let dy = (labeled[i].y - labeled[j].y).abs();
                if dx + dy != 1 {
                    continue;
                }
                let (winner, loser) = if labeled[i].id < labeled[j].id {
                    (i, j)
                } else if labeled[j].id < labeled[i].id {
                    (j, i)
                } else {
                    continue;
                };
                labeled[loser].id = labeled[winner].id;
                labeled[loser].color = labeled[winner].color;
                sink.send(PipelineEvent::Computation {
                    x: labeled[loser].x,
                    y: labeled[loser].y,
                    color: labeled[loser].color,
                });
                growth = true;
            }
        }
        if !growth {
            break;
        }
        change = true;
    }

    labeled.sort_by_key(|t| t.id);
    if log_sorted {
        for tile in labeled.iter() {
            sink.send(PipelineEvent::Computation {
                x: tile.x,
                y: tile.y,
                color: tile.color,
            });
        }
    }

    let mut regions: Vec<Region> = Vec::new();
    for tile in labeled.iter() {
        if let Some(region) = regions.iter_mut().find(|r| r.id == tile.id) {
            region.count += 1;
            region.tiles.push((tile.x, tile.y));
        } else {
            regions.push(Region {
                id: tile.id,
                count: 1,
                tiles: vec![(tile.x, tile.y)],
            });
        }
    }
    regions.sort_by_key(|r| r.count);
    (regions, change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{PipelineEventKind, VecSink};
    use crate::rng::{hash_seed, Mulberry32};

    fn run(map: &mut TileMap, sink: &mut dyn EventSink, punch_rate: f64) {
        let stage = HolePuncher;
        let settings = stage
            .schema()
            .resolve(&Settings::new().with_number("punch_rate", punch_rate));
        let mut rng = Mulberry32::new(hash_seed("puncher"));
        stage
            .execute(map, &settings, &mut rng, sink)
            .expect("stage succeeds");
    }

    fn connected_empty_count(map: &TileMap) -> usize {
        let empties = map.tiles_of_kind(TileKind::Empty);
        let Some(&start) = empties.first() else {
            return 0;
        };
        let mut seen = HashSet::from([start]);
        let mut queue = vec![start];
        while let Some((x, y)) = queue.pop() {
            for dir in Direction::ORTHOGONAL {
                if let Some(t) = map.adjacent(x, y, dir) {
                    if t.kind() == TileKind::Empty && seen.insert(t.coords()) {
                        queue.push(t.coords());
                    }
                }
            }
        }
        seen.len()
    }

    fn bisect(map: &mut TileMap) {
        let x = map.width() / 2;
        for y in 1..map.height() - 1 {
            map.set_kind(x, y, TileKind::Wall).expect("in range");
        }
    }

    #[test]
    fn reconnects_a_bisected_map() {
        let mut map = TileMap::new(10, 10).expect("valid dimensions");
        bisect(&mut map);
        let dividing_walls = (map.height() - 2) as usize;
        let walls_before = map.count_of_kind(TileKind::Wall);
        assert!(connected_empty_count(&map) < map.count_of_kind(TileKind::Empty));

        run(&mut map, &mut (), 1.0);
        assert_eq!(
            connected_empty_count(&map),
            map.count_of_kind(TileKind::Empty)
        );
        let punched = walls_before - map.count_of_kind(TileKind::Wall);
        assert!(punched >= 1 && punched <= dividing_walls);
    }

    #[test]
    fn connected_maps_keep_their_walls() {
        let mut map = TileMap::new(7, 7).expect("valid dimensions");
        map.set_kind(3, 3, TileKind::Wall).expect("in range");
        run(&mut map, &mut (), 0.5);
        assert_eq!(map.count_of_kind(TileKind::Wall), 25);
    }

    #[test]
    fn a_map_without_empty_tiles_is_a_no_op() {
        let mut map = TileMap::new(6, 6).expect("valid dimensions");
        for (x, y) in map.tiles_of_kind(TileKind::Empty) {
            map.set_kind(x, y, TileKind::Wall).expect("in range");
        }
        run(&mut map, &mut (), 1.0);
        assert_eq!(map.count_of_kind(TileKind::Empty), 0);
    }

    #[test]
    fn emits_computation_highlights() {
        let mut map = TileMap::new(8, 8).expect("valid dimensions");
        bisect(&mut map);
        let mut sink = VecSink::new();
        run(&mut map, &mut sink, 1.0);
        assert!(sink
            .as_slice()
            .iter()
            .any(|e| e.kind() == PipelineEventKind::Computation));
    }

    #[test]
    fn results_do_not_depend_on_the_sink() {
        let build = |sink: &mut dyn EventSink| {
            let mut map = TileMap::new(9, 7).expect("valid dimensions");
            bisect(&mut map);
            run(&mut map, sink, 0.34);
            map.tiles_of_kind(TileKind::Wall)
        };
        let silent = build(&mut ());
        let mut sink = VecSink::new();
        assert_eq!(build(&mut sink), silent);
    }
}
