use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;

use super::color::{NEUTRAL_GRAY, Pixel, channels, mix, rgba};
use crate::world::grid_map::TextureId;

pub const TEXTURE_SIZE: usize = 64;
pub const MAX_TEXTURES: usize = 8;

const WHITE: Pixel = rgba(255, 255, 255, 255);

#[derive(Debug, Error, PartialEq)]
pub enum TextureError {
    #[error("texture needs {expected} pixels, got {actual}")]
    WrongSize { expected: usize, actual: usize },
    #[error("texture id {0} outside the 8 available slots")]
    SlotOutOfRange(TextureId),
}

/// Immutable `TEXTURE_SIZE` x `TEXTURE_SIZE` pixmap.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    px: Box<[Pixel]>,
}

impl Texture {
    pub fn from_pixels(px: Vec<Pixel>) -> Result<Self, TextureError> {
        let expected = TEXTURE_SIZE * TEXTURE_SIZE;
        if px.len() != expected {
            return Err(TextureError::WrongSize { expected, actual: px.len() });
        }
        Ok(Self { px: px.into_boxed_slice() })
    }

    pub fn solid(color: Pixel) -> Self {
        Self { px: vec![color; TEXTURE_SIZE * TEXTURE_SIZE].into_boxed_slice() }
    }

    fn from_fn(mut f: impl FnMut(usize, usize) -> Pixel) -> Self {
        let mut px = Vec::with_capacity(TEXTURE_SIZE * TEXTURE_SIZE);
        for y in 0..TEXTURE_SIZE {
            for x in 0..TEXTURE_SIZE {
                px.push(f(x, y));
            }
        }
        Self { px: px.into_boxed_slice() }
    }

    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.px
    }

    /// Texel with both coordinates wrapped into the texture, negatives included.
    #[inline]
    pub fn texel(&self, u: i32, v: i32) -> Pixel {
        let n = TEXTURE_SIZE as i32;
        let x = u.rem_euclid(n) as usize;
        let y = v.rem_euclid(n) as usize;
        self.px[y * TEXTURE_SIZE + x]
    }
}

/// Samples a possibly missing texture; absent textures read as neutral gray.
#[inline]
pub fn sample(texture: Option<&Texture>, u: i32, v: i32) -> Pixel {
    texture.map_or(NEUTRAL_GRAY, |t| t.texel(u, v))
}

/// Fixed set of texture slots addressed by map texture ids.
#[derive(Clone, Debug, Default)]
pub struct TextureStore {
    slots: [Option<Texture>; MAX_TEXTURES],
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with every slot filled by a deterministic procedural texture.
    pub fn procedural(seed: u64) -> Self {
        let mut store = Self::new();
        store.fill_missing(seed);
        store
    }

    /// Puts `texture` in slot `id`, returning what was there.
    pub fn insert(&mut self, id: TextureId, texture: Texture) -> Result<Option<Texture>, TextureError> {
        let slot = self.slots.get_mut(id).ok_or(TextureError::SlotOutOfRange(id))?;
        Ok(slot.replace(texture))
    }

    #[inline]
    pub fn get_pixels(&self, id: TextureId) -> Option<&Texture> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    /// Number of filled slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Generates procedural stand-ins for every empty slot.
    pub fn fill_missing(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        for (id, slot) in self.slots.iter_mut().enumerate() {
            // draw from the rng even for filled slots so a slot's look
            // does not depend on which other files were found
            let tex = fallback_texture(id, &mut rng);
            if slot.is_none() {
                debug!(id, "using procedural texture");
                *slot = Some(tex);
            }
        }
    }
}

fn fallback_texture(id: TextureId, rng: &mut StdRng) -> Texture {
    match id {
        0 => checker(rgba(72, 72, 78, 255), 8),
        1 => bricks(rgba(150, 58, 42, 255), rgba(96, 92, 88, 255), rng),
        2 => noise(rgba(110, 110, 112, 255), 28, rng),
        3 => planks(rgba(108, 76, 44, 255), rng),
        4 => noise(rgba(70, 98, 62, 255), 24, rng),
        5 => checker(rgba(40, 80, 150, 255), 16),
        6 => bricks(rgba(196, 168, 112, 255), rgba(120, 104, 80, 255), rng),
        _ => checker(rgba(30, 160, 30, 255), 8),
    }
}

/// Checker base, lightened every other `cell`.
fn checker(base: Pixel, cell: usize) -> Texture {
    Texture::from_fn(|x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 { mix(base, WHITE, 24) } else { base }
    })
}

fn jitter(c: Pixel, amount: i16) -> Pixel {
    let [r, g, b, a] = channels(c);
    let j = |v: u8| (v as i16 + amount).clamp(0, 255) as u8;
    rgba(j(r), j(g), j(b), a)
}

fn noise(base: Pixel, amp: i16, rng: &mut StdRng) -> Texture {
    Texture::from_fn(|_, _| jitter(base, rng.gen_range(-amp..=amp)))
}

/// Running bond: 16x8 bricks, 1px mortar, odd rows offset by half a brick.
fn bricks(brick: Pixel, mortar: Pixel, rng: &mut StdRng) -> Texture {
    Texture::from_fn(|x, y| {
        let row = y / 8;
        let shifted = if row % 2 == 1 { x + 8 } else { x };
        if y % 8 == 7 || shifted % 16 == 15 {
            mortar
        } else {
            jitter(brick, rng.gen_range(-12..=12))
        }
    })
}

fn planks(base: Pixel, rng: &mut StdRng) -> Texture {
    Texture::from_fn(|x, _| {
        if x % 16 == 0 {
            mix(base, rgba(0, 0, 0, 255), 96)
        } else {
            jitter(base, rng.gen_range(-6..=6))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pixels_checks_size() {
        assert_eq!(
            Texture::from_pixels(vec![0; 10]),
            Err(TextureError::WrongSize { expected: 4096, actual: 10 })
        );
        assert!(Texture::from_pixels(vec![0; 4096]).is_ok());
    }

    #[test]
    fn sampling_wraps_including_negatives() {
        let px: Vec<Pixel> = (0..4096u32).collect();
        let tex = Texture::from_pixels(px).unwrap();
        assert_eq!(tex.texel(0, 0), 0);
        assert_eq!(tex.texel(64, 0), 0);
        assert_eq!(tex.texel(-1, 0), 63);
        assert_eq!(tex.texel(3, -1), 63 * 64 + 3);
        assert_eq!(tex.texel(130, 65), 64 + 2);
    }

    #[test]
    fn missing_texture_is_gray() {
        let store = TextureStore::new();
        assert!(store.get_pixels(2).is_none());
        assert_eq!(sample(store.get_pixels(2), 5, 5), NEUTRAL_GRAY);
        assert_eq!(sample(store.get_pixels(400), 5, 5), NEUTRAL_GRAY);
    }

    #[test]
    fn insert_rejects_out_of_range_slot() {
        let mut store = TextureStore::new();
        assert_eq!(store.insert(8, Texture::solid(1)), Err(TextureError::SlotOutOfRange(8)));
        assert_eq!(store.insert(7, Texture::solid(1)), Ok(None));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn procedural_store_is_full_and_deterministic() {
        let a = TextureStore::procedural(7);
        let b = TextureStore::procedural(7);
        assert_eq!(a.len(), MAX_TEXTURES);
        for id in 0..MAX_TEXTURES {
            assert_eq!(a.get_pixels(id), b.get_pixels(id));
        }
    }

    #[test]
    fn fill_missing_keeps_loaded_slots() {
        let mut store = TextureStore::new();
        store.insert(1, Texture::solid(42)).unwrap();
        store.fill_missing(3);
        assert_eq!(store.get_pixels(1), Some(&Texture::solid(42)));
        assert_eq!(store.len(), MAX_TEXTURES);
    }
}
