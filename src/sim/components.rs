use glam::Vec2;
use smallvec::SmallVec;

use crate::world::TextureId;

/// World-space position in tile units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// Tile units per tic, cleared by whoever sets it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub Vec2);

/// Heading in radians, `0` = +x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle(pub f32);

/// Circle used against wall tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub radius: f32,
}

/// Billboard image drawn at the entity position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite(pub TextureId);

/// Marker for the entity the camera follows.
#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

/// Tile-centre waypoints, next one first.
pub type Path = SmallVec<[Vec2; 16]>;

#[derive(Debug, Clone, Default)]
pub struct Enemy {
    /// Tile units per second.
    pub speed: f32,
    pub path: Path,
    /// Seconds until the next path search.
    pub repath_in: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCmd {
    pub forward: f32, // –1 … +1
    pub strafe: f32,  // –1 … +1  (left / right)
    pub turn: f32,    // –1 … +1  (right / left)
    pub run: bool,    // Shift
}
