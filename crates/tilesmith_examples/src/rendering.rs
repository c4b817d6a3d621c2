//! Console output helpers shared by the example binaries.
use tilesmith::error::Result;
use tilesmith::grid::{TileKind, TileMap};
use tracing_subscriber::EnvFilter;

/// Installs a console tracing subscriber honoring `RUST_LOG`, defaulting to
/// `info`. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

/// Renders the map as one character per tile.
///
/// Walls are `#`, fences `+`, empty tiles `.`. Empty tiles carrying a property
/// show a marker instead: `r` roof, `w` weapon spawn, `s` free-for-all spawn.
pub fn render_ascii(map: &TileMap) -> Result<String> {
    let mut out = String::with_capacity(((map.width() + 1) * map.height()) as usize);
    for y in 0..map.height() {
        for x in 0..map.width() {
            let tile = map.get_tile(x, y)?;
            let ch = match tile.kind() {
                TileKind::Wall => '#',
                TileKind::Fence => '+',
                TileKind::Empty => {
                    if tile.has_property("roof") {
                        'r'
                    } else if tile.has_property("weapon_spawn") {
                        'w'
                    } else if tile.has_property("ffa_spawn") {
                        's'
                    } else {
                        '.'
                    }
                }
            };
            out.push(ch);
        }
        out.push('\n');
    }
    Ok(out)
}
