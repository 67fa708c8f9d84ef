use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use raylib::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lumencast::cli::Cli;
use lumencast::config::AppConfig;
use lumencast::render::color::{Pixel, rgba};
use lumencast::render::framebuffer::Framebuffer;
use lumencast::render::render3d::{Scene, render_3d};
use lumencast::render::textures::{MAX_TEXTURES, TEXTURE_SIZE, Texture as Pixmap, TextureStore};
use lumencast::world::camera::Camera;
use lumencast::world::grid_map::{GridMap, MAP_HEIGHT_DEFAULT, MAP_WIDTH_DEFAULT};
use lumencast::world::lighting::LightManager;
use lumencast::world::lights_file::{install_default_lights, load_lights};
use lumencast::world::map_loader::{lights_path_for, list_maps, load_map, resolve_map_path};
use lumencast::world::process_events::{MoveIntent, process_events};

/// Distance within which Backspace picks a light to remove.
const PICK_RADIUS: f32 = 1.0;
const START_DIR: Vec2 = Vec2::new(-1.0, 0.0);

struct Level {
    map: GridMap,
    lights: LightManager,
    path: Option<PathBuf>,
}

/// Map plus its lights. A missing map becomes an empty bordered room, a
/// missing light file becomes the default lights.
fn load_level(map_path: Option<&Path>) -> Result<Level> {
    let map = match map_path {
        Some(path) => match load_map(path) {
            Ok(map) => map,
            Err(err) => {
                warn!(%err, "using an empty room");
                GridMap::with_border(MAP_WIDTH_DEFAULT, MAP_HEIGHT_DEFAULT)?
            }
        },
        None => GridMap::with_border(MAP_WIDTH_DEFAULT, MAP_HEIGHT_DEFAULT)?,
    };

    let loaded = map_path.and_then(|p| load_lights(&lights_path_for(p)).ok());
    let lights = match loaded {
        Some(lights) => lights,
        None => {
            let mut lights = LightManager::new();
            install_default_lights(&mut lights, &map);
            lights
        }
    };
    Ok(Level { map, lights, path: map_path.map(Path::to_path_buf) })
}

fn load_textures(dir: &Path, seed: u64) -> TextureStore {
    let mut store = TextureStore::new();
    for id in 0..MAX_TEXTURES {
        let path = dir.join(format!("texture{id}.bmp"));
        let Ok(mut img) = Image::load_image(&path.to_string_lossy()) else {
            continue;
        };
        img.resize(TEXTURE_SIZE as i32, TEXTURE_SIZE as i32);
        let px: Vec<Pixel> = img
            .get_image_data()
            .iter()
            .map(|c| rgba(c.r, c.g, c.b, c.a))
            .collect();
        match Pixmap::from_pixels(px).and_then(|tex| store.insert(id, tex)) {
            Ok(_) => info!(id, path = %path.display(), "texture loaded"),
            Err(err) => warn!(id, %err, "texture rejected"),
        }
    }
    store.fill_missing(seed);
    store
}

fn read_intent(rl: &RaylibHandle) -> MoveIntent {
    let axis = |neg: bool, pos: bool| (pos as i32 - neg as i32) as f32;
    let down = |a: KeyboardKey, b: Option<KeyboardKey>| rl.is_key_down(a) || b.is_some_and(|b| rl.is_key_down(b));
    MoveIntent {
        forward: axis(
            down(KeyboardKey::KEY_S, Some(KeyboardKey::KEY_DOWN)),
            down(KeyboardKey::KEY_W, Some(KeyboardKey::KEY_UP)),
        ),
        strafe: axis(down(KeyboardKey::KEY_Q, None), down(KeyboardKey::KEY_E, None)),
        turn: axis(
            down(KeyboardKey::KEY_A, Some(KeyboardKey::KEY_LEFT)),
            down(KeyboardKey::KEY_D, Some(KeyboardKey::KEY_RIGHT)),
        ),
    }
}

fn screen_texture(rl: &mut RaylibHandle, thread: &RaylibThread, w: u32, h: u32) -> Result<Texture2D> {
    let img = Image::gen_image_color(w as i32, h as i32, Color::BLACK);
    rl.load_texture_from_image(thread, &img)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("failed to create the screen texture")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::default(),
    };
    cli.apply(&mut config);
    config.validate()?;

    let map_path = cli.map.as_deref().map(|name| resolve_map_path(&config.maps_dir, name));
    let mut level = load_level(map_path.as_deref())?;

    let (mut rl, thread) = raylib::init()
        .size(config.window.width as i32, config.window.height as i32)
        .title(&config.window.title)
        .resizable()
        .build();

    let textures = load_textures(&config.textures_dir, config.texture_seed);
    let mut camera = Camera::new(level.map.player_start(), START_DIR);
    let mut lighting = !cli.no_lighting;

    let (mut width, mut height) = (config.window.width, config.window.height);
    let mut framebuffer = Framebuffer::new(width, height);
    let mut screen = screen_texture(&mut rl, &thread, width, height)?;
    let mut bytes = Vec::new();

    info!(
        width, height, lights = level.lights.len(), lighting,
        "controls: WASD/arrows move and turn, Q/E strafe, O lighting, N add light, Backspace remove light, L next map"
    );

    while !rl.window_should_close() {
        if rl.is_window_resized() {
            let (w, h) = (rl.get_screen_width().max(1) as u32, rl.get_screen_height().max(1) as u32);
            if (w, h) != (width, height) {
                (width, height) = (w, h);
                framebuffer.resize(width, height);
                screen = screen_texture(&mut rl, &thread, width, height)?;
                info!(width, height, "window resized");
            }
        }

        if rl.is_key_pressed(KeyboardKey::KEY_O) {
            lighting = !lighting;
            info!(lighting, lights = level.lights.len(), "lighting toggled");
        }
        if rl.is_key_pressed(KeyboardKey::KEY_N) {
            if let Err(err) = level.lights.add_light(camera.pos, glam::Vec3::ONE, 1.2, 4.0) {
                warn!(%err, "cannot place light");
            }
        }
        if rl.is_key_pressed(KeyboardKey::KEY_BACKSPACE) {
            if let Some(index) = level.lights.nearest_light(camera.pos, PICK_RADIUS) {
                level.lights.remove_light(index);
            }
        }
        if rl.is_key_pressed(KeyboardKey::KEY_L) {
            match next_map(&config.maps_dir, level.path.as_deref()) {
                Some(path) => {
                    level = load_level(Some(&path))?;
                    camera = Camera::new(level.map.player_start(), START_DIR);
                }
                None => warn!(dir = %config.maps_dir.display(), "no maps to switch to"),
            }
        }

        let dt = rl.get_frame_time();
        process_events(&mut camera, &level.map, read_intent(&rl), dt);

        let scene = Scene {
            map: &level.map,
            camera: &camera,
            textures: &textures,
            lights: lighting.then_some(&level.lights),
        };
        render_3d(&mut framebuffer, &scene, &config.render);
        framebuffer.write_rgba_bytes(&mut bytes);
        if let Err(err) = screen.update_texture(&bytes) {
            warn!(%err, "frame upload failed");
        }

        let fps = rl.get_fps();
        {
            let mut d = rl.begin_drawing(&thread);
            d.clear_background(Color::BLACK);
            d.draw_texture(&screen, 0, 0, Color::WHITE);
            d.draw_text(&format!("FPS: {fps}"), 10, 10, 20, Color::WHITE);
            if !lighting {
                d.draw_text("LIGHTING OFF", 10, 36, 20, Color::YELLOW);
            }
        }

        thread::sleep(Duration::from_millis(config.frame_delay_ms));
    }
    Ok(())
}

/// The map after `current` in name order, wrapping around.
fn next_map(maps_dir: &Path, current: Option<&Path>) -> Option<PathBuf> {
    let names = match list_maps(maps_dir) {
        Ok(names) if !names.is_empty() => names,
        Ok(_) => return None,
        Err(err) => {
            warn!(%err, "cannot list maps");
            return None;
        }
    };
    let current = current.and_then(|p| p.file_stem()).map(|s| s.to_string_lossy().into_owned());
    let next = match current.and_then(|c| names.iter().position(|n| *n == c)) {
        Some(i) => &names[(i + 1) % names.len()],
        None => &names[0],
    };
    Some(resolve_map_path(maps_dir, next))
}
