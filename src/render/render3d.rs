//! Frame renderer: perspective floor/ceiling rows, then DDA wall columns.
use glam::{Vec2, Vec3};

use super::casters::{Intersect, Side, cast_ray};
use super::color::{Pixel, scale_pixel};
use super::framebuffer::Framebuffer;
use super::textures::{TEXTURE_SIZE, TextureStore, sample};
use crate::config::RenderConfig;
use crate::world::camera::Camera;
use crate::world::grid_map::GridMap;
use crate::world::lighting::LightManager;

/// Everything one frame reads. Borrowed for the whole frame, so lights
/// cannot change while a frame is being drawn.
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    pub map: &'a GridMap,
    pub camera: &'a Camera,
    pub textures: &'a TextureStore,
    /// `None` turns lighting off: pixels keep their raw texel color.
    pub lights: Option<&'a LightManager>,
}

#[inline]
fn lit(lights: Option<&LightManager>, point: Vec2, texel: Pixel) -> Pixel {
    match lights {
        Some(lm) => lm.shade(point, texel),
        None => texel,
    }
}

pub fn render_3d(fb: &mut Framebuffer, scene: &Scene<'_>, config: &RenderConfig) {
    if fb.width == 0 || fb.height == 0 {
        return;
    }
    render_floor_and_ceiling(fb, scene, config);
    render_walls(fb, scene, config);
}

/// Fills every row with floor (below the horizon) or ceiling (above).
///
/// One sample per `sample_step` x `sample_step` block, replicated over the
/// block: lighting is the expensive part and this divides its cost by the
/// block area.
pub fn render_floor_and_ceiling(fb: &mut Framebuffer, scene: &Scene<'_>, config: &RenderConfig) {
    let w = fb.width as i32;
    let h = fb.height as i32;
    let stride = config.sample_step.max(1);
    let block = stride as u32;
    let cam = scene.camera;
    let ray0 = cam.dir - cam.plane;
    let ray1 = cam.dir + cam.plane;
    let half = h / 2;
    let pos_z = 0.5 * h as f32;
    let tex_size = TEXTURE_SIZE as f32;

    for y in (0..h).step_by(stride) {
        let p = y - half;
        if p == 0 {
            fb.fill_block(0, y as u32, w as u32, block, config.horizon_color);
            continue;
        }
        let is_ceiling = y < half;
        let row_distance = pos_z / p.abs() as f32;
        let floor_step = (ray1 - ray0) * (row_distance / w as f32) * stride as f32;
        let mut world = cam.pos + ray0 * row_distance;

        for x in (0..w).step_by(stride) {
            let cell_x = world.x.floor();
            let cell_y = world.y.floor();
            let u = (tex_size * (world.x - cell_x)) as i32;
            let v = (tex_size * (world.y - cell_y)) as i32;
            let (cx, cy) = (cell_x as i32, cell_y as i32);

            let color = if is_ceiling {
                let tex = scene.textures.get_pixels(scene.map.ceiling_texture(cx, cy));
                let c = lit(scene.lights, world, sample(tex, u, v));
                scale_pixel(c, Vec3::splat(config.ceiling_shade))
            } else {
                let tex = scene.textures.get_pixels(scene.map.floor_texture(cx, cy));
                lit(scene.lights, world, sample(tex, u, v))
            };
            fb.fill_block(x as u32, y as u32, block, block, color);
            world += floor_step;
        }
    }
}

/// Casts one ray per screen column and draws the wall strip it hits.
pub fn render_walls(fb: &mut Framebuffer, scene: &Scene<'_>, config: &RenderConfig) {
    let w = fb.width;
    let cam = scene.camera;
    for x in 0..w {
        let camera_x = 2.0 * x as f32 / w as f32 - 1.0;
        let ray_dir = cam.dir + cam.plane * camera_x;
        let hit = cast_ray(scene.map, cam.pos, ray_dir);
        draw_wall_column(fb, x, &hit, scene, config);
    }
}

/// On-screen rows `[start, end)` of a wall strip, clipped to `[0, screen_h)`,
/// and its unclipped height.
pub fn column_span(screen_h: i32, distance: f32) -> (i32, i32, i32) {
    // float -> int casts saturate, so a tiny distance gives a full column
    let line_height = (screen_h as f32 / distance.abs()) as i32;
    let start = (screen_h / 2 - line_height / 2).max(0);
    let end = (screen_h / 2 + line_height / 2).min(screen_h);
    (start, end, line_height)
}

fn draw_wall_column(fb: &mut Framebuffer, x: u32, hit: &Intersect, scene: &Scene<'_>, config: &RenderConfig) {
    let h = fb.height as i32;
    let (start, end, line_height) = column_span(h, hit.distance);
    if line_height <= 0 {
        return;
    }

    let tex = scene.textures.get_pixels(hit.texture);
    let step = TEXTURE_SIZE as f32 / line_height as f32;
    let mut tex_pos = (start - h / 2 + line_height / 2) as f32 * step;

    // one lighting evaluation for the whole strip
    let factor = scene.lights.map(|lm| {
        let f = lm.light_factor(hit.hit);
        if hit.side == Side::EastWest { f * config.side_shade } else { f }
    });

    for y in start..end {
        let tex_y = tex_pos as i32;
        tex_pos += step;
        let texel = sample(tex, hit.tex_x, tex_y);
        let color = match factor {
            Some(f) => scale_pixel(texel, f),
            None => texel,
        };
        fb.set_pixel(x, y as u32, color);
    }
}
