//! A single grid cell: kind, fixed coordinates, and free-form property labels.
use crate::grid::{TileKind, PROP_UNTOUCHED};

/// A single tile owned by a [`crate::grid::TileMap`].
///
/// Tiles store only their own state and coordinates; adjacency, symmetry, and
/// blend-mode behavior are resolved through map methods taking coordinates, so
/// the arena never holds back-references.
#[derive(Debug, Clone)]
pub struct Tile {
    kind: TileKind,
    coords: (i32, i32),
    properties: Vec<String>,
}

impl Tile {
    pub(crate) fn new(kind: TileKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            coords: (x, y),
            properties: vec![PROP_UNTOUCHED.to_owned()],
        }
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    /// Coordinates are fixed for the tile's lifetime.
    pub fn coords(&self) -> (i32, i32) {
        self.coords
    }

    pub fn has_property(&self, property: &str) -> bool {
        self.properties.iter().any(|p| p == property)
    }

    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    pub(crate) fn set_kind(&mut self, kind: TileKind) {
        self.kind = kind;
    }

    /// Returns whether the property was newly added.
    pub(crate) fn add_property(&mut self, property: &str) -> bool {
        if self.has_property(property) {
            return false;
        }
        self.properties.push(property.to_owned());
        true
    }

    /// Returns whether the property was present.
    pub(crate) fn remove_property(&mut self, property: &str) -> bool {
        let before = self.properties.len();
        self.properties.retain(|p| p != property);
        self.properties.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tiles_start_untouched() {
        let tile = Tile::new(TileKind::Empty, 2, 3);
        assert!(tile.has_property(PROP_UNTOUCHED));
        assert_eq!(tile.coords(), (2, 3));
        assert_eq!(tile.kind(), TileKind::Empty);
    }

    #[test]
    fn properties_are_deduplicated() {
        let mut tile = Tile::new(TileKind::Wall, 0, 0);
        assert!(tile.add_property("roof"));
        assert!(!tile.add_property("roof"));
        assert!(tile.remove_property("roof"));
        assert!(!tile.remove_property("roof"));
    }
}
