//! Point lights, ambient term and the composite lighting primitive.
//!
//! The model is a cheap distance falloff, not light transport: every light
//! reaches every point inside its radius, walls do not occlude.
use glam::{Vec2, Vec3};
use thiserror::Error;
use tracing::{debug, info};

use crate::render::color::{Pixel, scale_pixel};

pub const MAX_LIGHTS: usize = 32;
/// Contributions below this (intensity x attenuation) are skipped.
pub const MIN_LIGHT_CONTRIBUTION: f32 = 0.05;

#[derive(Debug, Error, PartialEq)]
pub enum LightError {
    #[error("light capacity reached ({capacity} lights)")]
    Full { capacity: usize },
    #[error("light radius must be finite and positive, got {0}")]
    InvalidRadius(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ambient {
    pub color: Vec3,
    pub intensity: f32,
}

impl Ambient {
    /// Dim warm-neutral default.
    pub const DEFAULT: Ambient = Ambient { color: Vec3::new(0.3, 0.3, 0.3), intensity: 0.2 };

    #[inline]
    pub fn contribution(&self) -> Vec3 {
        self.color * self.intensity
    }
}

impl Default for Ambient {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A point light. Fields are read-only outside this module so that
/// `radius_squared` always matches `radius`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    position: Vec2,
    color: Vec3,
    intensity: f32,
    radius: f32,
    radius_squared: f32,
    active: bool,
}

impl Light {
    #[inline] pub fn position(&self) -> Vec2 { self.position }
    #[inline] pub fn color(&self) -> Vec3 { self.color }
    #[inline] pub fn intensity(&self) -> f32 { self.intensity }
    #[inline] pub fn radius(&self) -> f32 { self.radius }
    #[inline] pub fn radius_squared(&self) -> f32 { self.radius_squared }
    #[inline] pub fn is_active(&self) -> bool { self.active }

    /// This light's additive factor at a point, or `None` when it is out of
    /// range or too weak to matter.
    #[inline]
    fn contribution_at(&self, point: Vec2) -> Option<Vec3> {
        let d2 = point.distance_squared(self.position);
        if d2 > self.radius_squared {
            return None;
        }
        let strength = self.intensity * attenuation(d2, self.radius_squared);
        if strength < MIN_LIGHT_CONTRIBUTION {
            return None;
        }
        Some(self.color * strength)
    }
}

/// `(1 - d/R)^2` for `d < R`, zero beyond. Takes squared values so callers
/// can reject out-of-range lights without a square root.
#[inline]
pub fn attenuation(distance_squared: f32, radius_squared: f32) -> f32 {
    if distance_squared >= radius_squared {
        return 0.0;
    }
    let falloff = 1.0 - (distance_squared.sqrt() / radius_squared.sqrt());
    falloff * falloff
}

/// Bounded, ordered light collection with a cache of active slot indices.
///
/// Removal compacts the collection: lights after the removed slot move down
/// by one, so indices held by callers must be resolved again.
#[derive(Clone, Debug, PartialEq)]
pub struct LightManager {
    lights: Vec<Light>,
    ambient: Ambient,
    active: Vec<usize>,
}

impl Default for LightManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LightManager {
    pub fn new() -> Self {
        Self {
            lights: Vec::with_capacity(MAX_LIGHTS),
            ambient: Ambient::DEFAULT,
            active: Vec::with_capacity(MAX_LIGHTS),
        }
    }

    #[inline] pub fn len(&self) -> usize { self.lights.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.lights.is_empty() }
    #[inline] pub fn is_full(&self) -> bool { self.lights.len() >= MAX_LIGHTS }
    #[inline] pub fn ambient(&self) -> Ambient { self.ambient }
    #[inline] pub fn get(&self, index: usize) -> Option<&Light> { self.lights.get(index) }
    #[inline] pub fn iter(&self) -> std::slice::Iter<'_, Light> { self.lights.iter() }
    /// Active slot indices in ascending order, as of the last rebuild.
    #[inline] pub fn active_indices(&self) -> &[usize] { &self.active }

    /// Stores an active light in the next free slot and returns that slot.
    pub fn add_light(
        &mut self,
        position: Vec2,
        color: Vec3,
        intensity: f32,
        radius: f32,
    ) -> Result<usize, LightError> {
        if self.is_full() {
            return Err(LightError::Full { capacity: MAX_LIGHTS });
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(LightError::InvalidRadius(radius));
        }
        let index = self.lights.len();
        self.lights.push(Light {
            position,
            color,
            intensity,
            radius,
            radius_squared: radius * radius,
            active: true,
        });
        self.rebuild_cache();
        debug!(
            index,
            x = position.x, y = position.y,
            r = color.x, g = color.y, b = color.z,
            intensity, radius,
            "light added"
        );
        Ok(index)
    }

    /// Removes and returns the light at `index`; out-of-range is a no-op.
    pub fn remove_light(&mut self, index: usize) -> Option<Light> {
        if index >= self.lights.len() {
            return None;
        }
        let mut removed = self.lights.remove(index);
        removed.active = false;
        self.rebuild_cache();
        debug!(index, remaining = self.lights.len(), "light removed");
        Some(removed)
    }

    /// Enables or disables a light without moving any slot.
    pub fn set_active(&mut self, index: usize, active: bool) {
        if let Some(light) = self.lights.get_mut(index) {
            light.active = active;
            self.rebuild_cache();
        }
    }

    /// Drops every light; the ambient term is kept.
    pub fn clear(&mut self) {
        self.lights.clear();
        self.rebuild_cache();
        info!("all lights removed");
    }

    pub fn set_ambient(&mut self, color: Vec3, intensity: f32) {
        self.ambient = Ambient { color, intensity };
    }

    pub fn rebuild_cache(&mut self) {
        self.active.clear();
        self.active.extend(
            self.lights.iter().enumerate().filter(|(_, l)| l.active).map(|(i, _)| i),
        );
    }

    /// Closest active light strictly within `max_distance` of `point`.
    pub fn nearest_light(&self, point: Vec2, max_distance: f32) -> Option<usize> {
        let mut best = None;
        let mut best_d = max_distance;
        for &i in &self.active {
            let d = self.lights[i].position.distance(point);
            if d < best_d {
                best_d = d;
                best = Some(i);
            }
        }
        best
    }

    /// Channel multipliers at `point`: ambient plus every active light in
    /// range. Shared by the per-pixel composite and the per-column walls.
    pub fn light_factor(&self, point: Vec2) -> Vec3 {
        self.active
            .iter()
            .filter_map(|&i| self.lights[i].contribution_at(point))
            .fold(self.ambient.contribution(), |total, c| total + c)
    }

    /// Lights `base` at `point`. Alpha passes through untouched.
    #[inline]
    pub fn shade(&self, point: Vec2, base: Pixel) -> Pixel {
        scale_pixel(base, self.light_factor(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::color::rgba;

    fn white() -> Vec3 {
        Vec3::ONE
    }

    #[test]
    fn new_manager_defaults() {
        let lm = LightManager::new();
        assert!(lm.is_empty());
        assert!(lm.active_indices().is_empty());
        assert_eq!(lm.ambient(), Ambient { color: Vec3::splat(0.3), intensity: 0.2 });
    }

    #[test]
    fn add_returns_slot_and_syncs_radius() {
        let mut lm = LightManager::new();
        assert_eq!(lm.add_light(Vec2::new(1.0, 1.0), white(), 1.0, 3.0), Ok(0));
        assert_eq!(lm.add_light(Vec2::new(2.0, 1.0), white(), 1.0, 4.0), Ok(1));
        let l = lm.get(1).unwrap();
        assert_eq!(l.radius_squared(), 16.0);
        assert!(l.is_active());
        assert_eq!(lm.active_indices(), &[0, 1]);
    }

    #[test]
    fn full_manager_rejects_without_mutation() {
        let mut lm = LightManager::new();
        for i in 0..MAX_LIGHTS {
            lm.add_light(Vec2::new(i as f32, 0.0), white(), 1.0, 2.0).unwrap();
        }
        let before = lm.clone();
        assert_eq!(
            lm.add_light(Vec2::ZERO, white(), 1.0, 2.0),
            Err(LightError::Full { capacity: MAX_LIGHTS })
        );
        assert_eq!(lm.len(), 32);
        assert_eq!(lm, before);
    }

    #[test]
    fn bad_radius_rejected() {
        let mut lm = LightManager::new();
        assert!(matches!(lm.add_light(Vec2::ZERO, white(), 1.0, 0.0), Err(LightError::InvalidRadius(_))));
        assert!(matches!(lm.add_light(Vec2::ZERO, white(), 1.0, f32::NAN), Err(LightError::InvalidRadius(_))));
        assert!(lm.is_empty());
    }

    #[test]
    fn remove_compacts_and_ignores_stale_index() {
        let mut lm = LightManager::new();
        for x in 0..4 {
            lm.add_light(Vec2::new(x as f32, 0.0), white(), 1.0, 2.0).unwrap();
        }
        let removed = lm.remove_light(1).unwrap();
        assert!(!removed.is_active());
        assert_eq!(removed.position(), Vec2::new(1.0, 0.0));
        assert_eq!(lm.len(), 3);
        assert_eq!(lm.get(1).unwrap().position(), Vec2::new(2.0, 0.0));
        assert_eq!(lm.active_indices(), &[0, 1, 2]);

        assert!(lm.remove_light(3).is_none());
        assert!(lm.remove_light(usize::MAX).is_none());
        assert_eq!(lm.len(), 3);
    }

    #[test]
    fn set_active_updates_cache() {
        let mut lm = LightManager::new();
        for x in 0..3 {
            lm.add_light(Vec2::new(x as f32, 0.0), white(), 1.0, 2.0).unwrap();
        }
        lm.set_active(1, false);
        assert_eq!(lm.active_indices(), &[0, 2]);
        lm.set_active(7, false);
        assert_eq!(lm.active_indices(), &[0, 2]);
        lm.set_active(1, true);
        assert_eq!(lm.active_indices(), &[0, 1, 2]);
    }

    #[test]
    fn clear_keeps_ambient() {
        let mut lm = LightManager::new();
        lm.set_ambient(Vec3::new(1.0, 0.5, 0.25), 0.4);
        lm.add_light(Vec2::ZERO, white(), 1.0, 2.0).unwrap();
        lm.clear();
        assert!(lm.is_empty());
        assert!(lm.active_indices().is_empty());
        assert_eq!(lm.ambient().intensity, 0.4);
    }

    #[test]
    fn attenuation_endpoints() {
        assert_eq!(attenuation(0.0, 16.0), 1.0);
        assert_eq!(attenuation(16.0, 16.0), 0.0);
        assert_eq!(attenuation(25.0, 16.0), 0.0);
        assert!((attenuation(4.0, 16.0) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn ambient_only_composite() {
        let lm = LightManager::new();
        let out = lm.shade(Vec2::new(3.3, 7.1), rgba(200, 100, 50, 255));
        assert_eq!(out, rgba(12, 6, 3, 255));
    }

    #[test]
    fn single_light_at_its_center() {
        let mut lm = LightManager::new();
        lm.set_ambient(Vec3::ONE, 0.0);
        lm.add_light(Vec2::new(5.0, 5.0), white(), 2.0, 4.0).unwrap();
        let out = lm.shade(Vec2::new(5.0, 5.0), rgba(200, 100, 50, 77));
        assert_eq!(out, rgba(255, 200, 100, 77));
    }

    #[test]
    fn weak_and_distant_lights_are_skipped() {
        let mut lm = LightManager::new();
        lm.set_ambient(Vec3::ONE, 0.0);
        lm.add_light(Vec2::ZERO, white(), 1.0, 2.0).unwrap();
        // attenuation (1 - 1.8/2)^2 = 0.01, below the cutoff
        assert_eq!(lm.light_factor(Vec2::new(1.8, 0.0)), Vec3::ZERO);
        assert_eq!(lm.light_factor(Vec2::new(3.0, 0.0)), Vec3::ZERO);
        lm.set_active(0, false);
        assert_eq!(lm.light_factor(Vec2::ZERO), Vec3::ZERO);
    }

    #[test]
    fn nearest_light_picks_closest_active() {
        let mut lm = LightManager::new();
        lm.add_light(Vec2::new(1.0, 1.0), white(), 1.0, 2.0).unwrap();
        lm.add_light(Vec2::new(1.4, 1.0), white(), 1.0, 2.0).unwrap();
        assert_eq!(lm.nearest_light(Vec2::new(1.5, 1.0), 1.0), Some(1));
        lm.set_active(1, false);
        assert_eq!(lm.nearest_light(Vec2::new(1.5, 1.0), 1.0), Some(0));
        assert_eq!(lm.nearest_light(Vec2::new(5.0, 5.0), 1.0), None);
    }
}
