mod collision;
mod components;
mod pathfinding;
mod spawn;
mod systems;
mod tic;

pub use collision::move_and_collide;
pub use components::{Angle, Collider, Enemy, InputCmd, Path, Player, Position, Sprite, Velocity};
pub use pathfinding::{MAX_DEPTH, find_path};
pub use spawn::{OGRE_TEXTURE, SpawnError, spawn_objects};
pub use systems::{enemy_ai, line_of_sight, movement, player_input};
pub use tic::{DT, SIM_FPS, TicRunner};
