//! Map text format and map file discovery.
//!
//! ```text
//! SIZE 20 15
//! PLAYER_START 10.50 7.50
//! 0,0 0,0 1,1  0,0 0,0 0,0  ...
//! ```
//! Header lines are optional. Each cell is `floor ceiling wall`, each layer
//! `kind,texture`, row-major.
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use tracing::{info, warn};

use super::grid_map::{
    GridMap, Layer, MapError, Tile, TileKind, MAP_HEIGHT_DEFAULT, MAP_HEIGHT_MAX,
    MAP_WIDTH_DEFAULT, MAP_WIDTH_MAX,
};

fn split_first_line(text: &str) -> (&str, &str) {
    text.split_once('\n').unwrap_or((text, ""))
}

fn parse_size(line: &str) -> Option<(usize, usize)> {
    let mut it = line.split_whitespace().skip(1);
    let w = it.next()?.parse().ok()?;
    let h = it.next()?.parse().ok()?;
    Some((w, h))
}

fn parse_start(line: &str) -> Option<Vec2> {
    let mut it = line.split_whitespace().skip(1);
    let x = it.next()?.parse().ok()?;
    let y = it.next()?.parse().ok()?;
    Some(Vec2::new(x, y))
}

fn parse_layer(token: &str) -> Option<Tile> {
    let (kind, texture) = token.split_once(',')?;
    Some(Tile {
        kind: TileKind::from_code(kind.trim().parse().ok()?),
        texture: texture.trim().parse().ok()?,
    })
}

/// Parses map text. An out-of-range `SIZE` falls back to the default size;
/// a malformed or missing cell becomes empty on every layer.
pub fn parse_map(text: &str) -> Result<GridMap, MapError> {
    let mut rest = text;
    let (mut width, mut height) = (MAP_WIDTH_DEFAULT, MAP_HEIGHT_DEFAULT);

    let (line, tail) = split_first_line(rest);
    if line.trim_start().starts_with("SIZE") {
        match parse_size(line) {
            Some((w, h)) if (1..=MAP_WIDTH_MAX).contains(&w) && (1..=MAP_HEIGHT_MAX).contains(&h) => {
                width = w;
                height = h;
            }
            _ => warn!(line = line.trim(), "invalid map size, using default"),
        }
        rest = tail;
    }

    let mut start = None;
    let (line, tail) = split_first_line(rest);
    if line.trim_start().starts_with("PLAYER_START") {
        start = parse_start(line);
        rest = tail;
    }

    let mut map = GridMap::new(width, height)?;
    if let Some(start) = start {
        map.set_player_start(start);
    }

    let mut tokens = rest.split_whitespace();
    let mut malformed = 0usize;
    for y in 0..height {
        for x in 0..width {
            let raw = [tokens.next(), tokens.next(), tokens.next()];
            let cell: Option<Vec<Tile>> = raw.into_iter().map(|t| t.and_then(parse_layer)).collect();
            match cell {
                Some(tiles) => {
                    for (layer, tile) in Layer::ALL.into_iter().zip(tiles) {
                        map.set_tile(layer, x, y, tile)?;
                    }
                }
                // the map starts empty, nothing to reset
                None => malformed += 1,
            }
        }
    }
    if malformed > 0 {
        warn!(malformed, "map cells could not be read and were left empty");
    }
    Ok(map)
}

pub fn load_map(path: &Path) -> Result<GridMap, MapError> {
    let text = fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let map = parse_map(&text)?;
    info!(
        path = %path.display(),
        width = map.width(),
        height = map.height(),
        start_x = map.player_start().x,
        start_y = map.player_start().y,
        "map loaded"
    );
    Ok(map)
}

/// Writes the map in the format read by [`parse_map`].
pub fn map_to_string(map: &GridMap) -> String {
    let mut out = String::new();
    let start = map.player_start();
    let _ = writeln!(out, "SIZE {} {}", map.width(), map.height());
    let _ = writeln!(out, "PLAYER_START {:.2} {:.2}", start.x, start.y);
    for y in 0..map.height() as i32 {
        for x in 0..map.width() as i32 {
            for layer in Layer::ALL {
                let tile = map.tile(layer, x, y).unwrap_or_default();
                let _ = write!(out, "{},{} ", tile.kind.code(), tile.texture);
            }
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// `maps/<name>` with `.txt` appended unless already present.
pub fn resolve_map_path(maps_dir: &Path, name: &str) -> PathBuf {
    if name.ends_with(".txt") {
        maps_dir.join(name)
    } else {
        maps_dir.join(format!("{name}.txt"))
    }
}

/// Path of the light file that goes with a map file.
pub fn lights_path_for(map_path: &Path) -> PathBuf {
    let mut os = map_path.as_os_str().to_owned();
    os.push(".lights");
    PathBuf::from(os)
}

/// Names (without extension) of the `.txt` maps in `maps_dir`, sorted.
pub fn list_maps(maps_dir: &Path) -> Result<Vec<String>, MapError> {
    let entries = fs::read_dir(maps_dir).map_err(|source| MapError::Io {
        path: maps_dir.display().to_string(),
        source,
    })?;
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
        .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_cells() {
        let mut text = String::from("SIZE 10 8\nPLAYER_START 2.50 3.50\n");
        for _ in 0..8 {
            for x in 0..10 {
                let wall = if x == 0 { "1,4" } else { "0,0" };
                text.push_str(&format!("0,2 0,3 {wall}  "));
            }
            text.push('\n');
        }
        let map = parse_map(&text).unwrap();
        assert_eq!((map.width(), map.height()), (10, 8));
        assert_eq!(map.player_start(), Vec2::new(2.5, 3.5));
        assert!(map.is_wall(0, 5));
        assert_eq!(map.wall_texture(0, 5), 4);
        assert!(!map.is_wall(1, 5));
        assert_eq!(map.floor_texture(3, 3), 2);
        assert_eq!(map.ceiling_texture(3, 3), 3);
    }

    #[test]
    fn invalid_size_falls_back_to_default() {
        let map = parse_map("SIZE 99 2\n").unwrap();
        assert_eq!((map.width(), map.height()), (MAP_WIDTH_DEFAULT, MAP_HEIGHT_DEFAULT));
    }

    #[test]
    fn headerless_text_uses_defaults() {
        let map = parse_map("1,1 1,1 1,1").unwrap();
        assert_eq!(map.width(), MAP_WIDTH_DEFAULT);
        assert!(map.is_wall(0, 0));
        assert!(!map.is_wall(1, 0));
        assert_eq!(map.player_start(), Vec2::new(10.0, 7.5));
    }

    #[test]
    fn malformed_cell_is_empty() {
        let map = parse_map("SIZE 2 1\nx,1 0,0 1,1  1,1 1,1 1,7").unwrap();
        assert!(!map.is_wall(0, 0));
        assert!(map.is_wall(1, 0));
        assert_eq!(map.wall_texture(1, 0), 7);
    }

    #[test]
    fn written_map_reads_back() {
        let mut map = GridMap::with_border(12, 9).unwrap();
        map.set_tile(Layer::Ceiling, 3, 3, Tile { kind: TileKind::Solid, texture: 5 }).unwrap();
        map.set_player_start(Vec2::new(2.25, 4.75));
        let back = parse_map(&map_to_string(&map)).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn map_paths() {
        let dir = Path::new("maps");
        assert_eq!(resolve_map_path(dir, "level1"), PathBuf::from("maps/level1.txt"));
        assert_eq!(resolve_map_path(dir, "level1.txt"), PathBuf::from("maps/level1.txt"));
        assert_eq!(
            lights_path_for(Path::new("maps/level1.txt")),
            PathBuf::from("maps/level1.txt.lights")
        );
    }
}
