//! Applies one frame of movement intent to the camera.
//!
//! Input polling lives in the binary; it only fills a [`MoveIntent`].
use super::camera::Camera;
use super::grid_map::GridMap;

/// Per-axis input in `[-1, 1]`. Positive `forward` walks along the view
/// direction, positive `strafe` along the camera plane, positive `turn`
/// rotates clockwise on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveIntent {
    pub forward: f32,
    pub strafe: f32,
    pub turn: f32,
}

impl MoveIntent {
    pub fn is_idle(&self) -> bool {
        self.forward == 0.0 && self.strafe == 0.0 && self.turn == 0.0
    }
}

pub fn process_events(camera: &mut Camera, map: &GridMap, intent: MoveIntent, dt: f32) {
    if intent.is_idle() {
        return;
    }
    let step = camera.move_speed * dt;
    if intent.turn != 0.0 {
        camera.rotate(intent.turn.clamp(-1.0, 1.0) * camera.rot_speed * dt);
    }
    if intent.forward != 0.0 {
        let delta = camera.dir * (intent.forward.clamp(-1.0, 1.0) * step);
        camera.try_move(map, delta);
    }
    if intent.strafe != 0.0 {
        let delta = camera.plane * (intent.strafe.clamp(-1.0, 1.0) * step);
        camera.try_move(map, delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn forward_moves_along_direction() {
        let map = GridMap::with_border(20, 15).unwrap();
        let mut cam = Camera::new(Vec2::new(10.5, 7.5), Vec2::new(1.0, 0.0));
        process_events(&mut cam, &map, MoveIntent { forward: 1.0, ..Default::default() }, 0.5);
        assert!((cam.pos.x - 12.0).abs() < 1e-5);
        assert!((cam.pos.y - 7.5).abs() < 1e-5);
    }

    #[test]
    fn walls_stop_movement() {
        let map = GridMap::with_border(20, 15).unwrap();
        let mut cam = Camera::new(Vec2::new(18.5, 7.5), Vec2::new(1.0, 0.0));
        process_events(&mut cam, &map, MoveIntent { forward: 1.0, ..Default::default() }, 1.0);
        assert_eq!(cam.pos, Vec2::new(18.5, 7.5));
    }

    #[test]
    fn idle_intent_changes_nothing() {
        let map = GridMap::with_border(20, 15).unwrap();
        let before = Camera::new(Vec2::new(4.5, 4.5), Vec2::new(0.0, 1.0));
        let mut cam = before;
        process_events(&mut cam, &map, MoveIntent::default(), 1.0);
        assert_eq!(cam, before);
    }
}
