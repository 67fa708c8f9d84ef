//! Light text format.
//!
//! ```text
//! AMBIENT 0.30 0.30 0.30 0.20
//! LIGHTS 2
//! LIGHT 10.00 7.50 1.00 1.00 1.00 1.50 6.00
//! LIGHT 3.00 3.00 1.00 1.00 1.00 1.20 4.00
//! ```
//! `LIGHT` fields are `x y r g b intensity radius`. The `LIGHTS` count is
//! informational; every `LIGHT` line is read.
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3};
use thiserror::Error;
use tracing::{info, warn};

use super::grid_map::GridMap;
use super::lighting::LightManager;

#[derive(Debug, Error)]
pub enum LightsFileError {
    #[error("failed to read lights {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn parse_floats<const N: usize>(fields: &[&str]) -> Option<[f32; N]> {
    if fields.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field.parse().ok()?;
    }
    Some(out)
}

/// Builds a manager from light text. Bad lines and lights the manager
/// refuses are skipped with a warning.
pub fn parse_lights(text: &str) -> LightManager {
    let mut lights = LightManager::new();
    for (n, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let Some((&keyword, args)) = fields.split_first() else {
            continue;
        };
        match keyword {
            "AMBIENT" => match parse_floats::<4>(args) {
                Some([r, g, b, intensity]) => lights.set_ambient(Vec3::new(r, g, b), intensity),
                None => warn!(line = n + 1, "malformed AMBIENT line skipped"),
            },
            "LIGHTS" => {}
            "LIGHT" => match parse_floats::<7>(args) {
                Some([x, y, r, g, b, intensity, radius]) => {
                    if let Err(err) =
                        lights.add_light(Vec2::new(x, y), Vec3::new(r, g, b), intensity, radius)
                    {
                        warn!(line = n + 1, %err, "light skipped");
                    }
                }
                None => warn!(line = n + 1, "malformed LIGHT line skipped"),
            },
            other => warn!(line = n + 1, keyword = other, "unknown keyword in lights file"),
        }
    }
    lights
}

pub fn load_lights(path: &Path) -> Result<LightManager, LightsFileError> {
    let text = fs::read_to_string(path).map_err(|source| LightsFileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let lights = parse_lights(&text);
    info!(path = %path.display(), count = lights.len(), "lights loaded");
    Ok(lights)
}

/// Writes the ambient term and the active lights in the format read by
/// [`parse_lights`].
pub fn lights_to_string(lights: &LightManager) -> String {
    let mut out = String::new();
    let ambient = lights.ambient();
    let c = ambient.color;
    let _ = writeln!(out, "AMBIENT {:.2} {:.2} {:.2} {:.2}", c.x, c.y, c.z, ambient.intensity);
    let _ = writeln!(out, "LIGHTS {}", lights.active_indices().len());
    for light in lights.iter().filter(|l| l.is_active()) {
        let p = light.position();
        let c = light.color();
        let _ = writeln!(
            out,
            "LIGHT {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} {:.2}",
            p.x, p.y, c.x, c.y, c.z, light.intensity(), light.radius()
        );
    }
    out
}

/// White lights for a map that ships without a light file: one at the map
/// center, one near the top-left corner and, on larger maps, one near the
/// bottom-right corner.
pub fn install_default_lights(lights: &mut LightManager, map: &GridMap) {
    let (w, h) = (map.width() as f32, map.height() as f32);
    let mut defaults = vec![
        (Vec2::new(w / 2.0, h / 2.0), 1.5, 6.0),
        (Vec2::new(3.0, 3.0), 1.2, 4.0),
    ];
    if map.width() > 15 && map.height() > 10 {
        defaults.push((Vec2::new(w - 3.0, h - 3.0), 1.3, 5.0));
    }
    for (pos, intensity, radius) in defaults {
        if let Err(err) = lights.add_light(pos, Vec3::ONE, intensity, radius) {
            warn!(%err, "default light skipped");
        }
    }
    info!(count = lights.len(), "default lights installed");
}
