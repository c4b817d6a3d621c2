//! The tile map: a flat arena of tiles with symmetry-aware, blend-mode-aware writes.
use glam::DVec2;

use crate::error::{Error, Result};
use crate::grid::{BlendMode, Direction, Symmetry, Tile, TileKind, PROP_IMMUTABLE, PROP_UNTOUCHED};

/// Snapshot of a tile's state after a recorded mutation.
#[derive(Debug, Clone)]
pub struct TileChange {
    pub x: i32,
    pub y: i32,
    pub kind: TileKind,
    pub properties: Vec<String>,
}

/// A rectangular grid of tiles.
///
/// The border ring is wall and immutable from construction; the interior starts
/// empty. Dimensions are fixed for the map's lifetime. Writes honor the current
/// [`BlendMode`], and symmetric writes fan out to partner tiles per the current
/// [`Symmetry`] mode.
#[derive(Debug, Clone)]
pub struct TileMap {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    blend_mode: BlendMode,
    symmetry: Symmetry,
    recording: bool,
    changes: Vec<TileChange>,
}

impl TileMap {
    /// Creates a map with an immutable wall border and an empty interior.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidSettings(format!(
                "map dimensions must be positive, got {width}x{height}"
            )));
        }
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let border = x == 0 || x == width - 1 || y == 0 || y == height - 1;
                let kind = if border { TileKind::Wall } else { TileKind::Empty };
                let mut tile = Tile::new(kind, x, y);
                if border {
                    tile.add_property(PROP_IMMUTABLE);
                }
                tiles.push(tile);
            }
        }
        Ok(Self {
            width,
            height,
            tiles,
            blend_mode: BlendMode::default(),
            symmetry: Symmetry::default(),
            recording: false,
            changes: Vec::new(),
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn set_blend_mode(&mut self, blend_mode: BlendMode) {
        self.blend_mode = blend_mode;
    }

    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    pub fn set_symmetry(&mut self, symmetry: Symmetry) {
        self.symmetry = symmetry;
    }

    fn index(&self, x: i32, y: i32) -> Result<usize> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return Err(Error::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y * self.width + x) as usize)
    }

    pub fn get_tile(&self, x: i32, y: i32) -> Result<&Tile> {
        let index = self.index(x, y)?;
        Ok(&self.tiles[index])
    }

    /// The neighbor of `(x, y)` in `direction`, or `None` at the grid edge.
    pub fn adjacent(&self, x: i32, y: i32, direction: Direction) -> Option<&Tile> {
        let (dx, dy) = direction.offset();
        let index = self.index(x + dx, y + dy).ok()?;
        Some(&self.tiles[index])
    }

    /// Coordinates of every tile of `kind`, in row-major scan order.
    pub fn tiles_of_kind(&self, kind: TileKind) -> Vec<(i32, i32)> {
        self.tiles
            .iter()
            .filter(|t| t.kind() == kind)
            .map(Tile::coords)
            .collect()
    }

    pub fn count_of_kind(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|t| t.kind() == kind).count()
    }

    /// Writes `kind` to one tile, honoring immutability and the blend mode.
    ///
    /// Immutable tiles are untouched-preserving no-ops. Every other write
    /// removes the `"untouched"` property even when the applied kind equals the
    /// current one. Returns whether the tile's kind actually changed.
    pub fn set_kind(&mut self, x: i32, y: i32, kind: TileKind) -> Result<bool> {
        let index = self.index(x, y)?;
        if self.tiles[index].has_property(PROP_IMMUTABLE) {
            return Ok(false);
        }
        let current = self.tiles[index].kind();
        let applied = match self.blend_mode {
            BlendMode::Overwrite => kind,
            BlendMode::Overlay => {
                if current == TileKind::Empty {
                    kind
                } else {
                    current
                }
            }
            BlendMode::Clear => TileKind::Empty,
        };
        self.tiles[index].set_kind(applied);
        self.tiles[index].remove_property(PROP_UNTOUCHED);
        if self.recording {
            self.record(index);
        }
        Ok(applied != current)
    }

    /// Adds a property to one tile. Returns whether it was newly added.
    pub fn add_property(&mut self, x: i32, y: i32, property: &str) -> Result<bool> {
        let index = self.index(x, y)?;
        let added = self.tiles[index].add_property(property);
        if added && self.recording {
            self.record(index);
        }
        Ok(added)
    }

    /// Removes a property from one tile. Returns whether it was present.
    pub fn remove_property(&mut self, x: i32, y: i32, property: &str) -> Result<bool> {
        let index = self.index(x, y)?;
        let removed = self.tiles[index].remove_property(property);
        if removed && self.recording {
            self.record(index);
        }
        Ok(removed)
    }

    /// Symmetry partners of `(x, y)` under the current mode, the tile itself
    /// first, deduplicated.
    ///
    /// Radial partners are computed in polar form around the grid center and
    /// mapped back with floor semantics; rotated points that land outside the
    /// grid are discarded, so fewer than `points` partners can result.
    pub fn symmetry_partners(&self, x: i32, y: i32) -> Vec<(i32, i32)> {
        let (w, h) = (self.width, self.height);
        let mut partners = vec![(x, y)];
        let push = |partners: &mut Vec<(i32, i32)>, p: (i32, i32)| {
            if !partners.contains(&p) {
                partners.push(p);
            }
        };
        match self.symmetry {
            Symmetry::None => {}
            Symmetry::X => push(&mut partners, (w - 1 - x, y)),
            Symmetry::Y => push(&mut partners, (x, h - 1 - y)),
            Symmetry::Xy => {
                push(&mut partners, (w - 1 - x, y));
                push(&mut partners, (x, h - 1 - y));
                push(&mut partners, (w - 1 - x, h - 1 - y));
            }
            Symmetry::Radial { points } => {
                // Center offset; integer division centers both even and odd spans.
                let offset_x = -(w / 2);
                let offset_y = -(h / 2);
                let shifted = DVec2::new(
                    f64::from(x + offset_x),
                    -f64::from(y + offset_y),
                );
                let magnitude = shifted.length();
                let step = std::f64::consts::TAU / f64::from(points.max(1));
                let mut angle = shifted.y.atan2(shifted.x);
                if angle < 0.0 {
                    angle += std::f64::consts::TAU;
                }
                for _ in 1..points {
                    angle = (angle + step) % std::f64::consts::TAU;
                    let nx = (magnitude * angle.cos()).floor() as i32 - offset_x;
                    let ny = -((magnitude * angle.sin()).floor() as i32) - offset_y;
                    if nx < 0 || nx >= w || ny < 0 || ny >= h {
                        continue;
                    }
                    push(&mut partners, (nx, ny));
                }
            }
        }
        partners
    }

    /// Applies [`TileMap::set_kind`] to the tile and all of its symmetry
    /// partners, returning every coordinate touched.
    pub fn symmetric_set_kind(
        &mut self,
        x: i32,
        y: i32,
        kind: TileKind,
    ) -> Result<Vec<(i32, i32)>> {
        self.index(x, y)?;
        let partners = self.symmetry_partners(x, y);
        for &(px, py) in &partners {
            self.set_kind(px, py, kind)?;
        }
        Ok(partners)
    }

    /// Adds a property to the tile and all of its symmetry partners.
    pub fn symmetric_add_property(
        &mut self,
        x: i32,
        y: i32,
        property: &str,
    ) -> Result<Vec<(i32, i32)>> {
        self.index(x, y)?;
        let partners = self.symmetry_partners(x, y);
        for &(px, py) in &partners {
            self.add_property(px, py, property)?;
        }
        Ok(partners)
    }

    /// Enables or disables buffering of [`TileChange`] snapshots. Recording is
    /// purely observational and never affects generation results.
    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
        if !recording {
            self.changes.clear();
        }
    }

    /// Drains the buffered change snapshots accumulated since the last call.
    pub fn take_changes(&mut self) -> Vec<TileChange> {
        std::mem::take(&mut self.changes)
    }

    fn record(&mut self, index: usize) {
        let tile = &self.tiles[index];
        let (x, y) = tile.coords();
        self.changes.push(TileChange {
            x,
            y,
            kind: tile.kind(),
            properties: tile.properties().to_vec(),
        });
    }
}
