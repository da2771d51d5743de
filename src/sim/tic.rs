use std::time::{Duration, Instant};

use glam::Vec2;
use hecs::{Entity, World};

use super::{
    components::{Angle, InputCmd, Position, Sprite},
    spawn::{SpawnError, spawn_objects},
    systems,
};
use crate::{
    map::MapObject,
    renderer::SpriteInstance,
    world::{TextureBank, TileGrid},
};

pub const SIM_FPS: u32 = 35;
pub const DT: f32 = 1.0 / SIM_FPS as f32;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

/// Owns the ECS world and drives all game-logic systems.
pub struct TicRunner {
    world: World,
    player: Option<Entity>,
    input: InputCmd,
    last: Instant,
}

impl Default for TicRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TicRunner {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            player: None,
            input: InputCmd::default(),
            last: Instant::now(),
        }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[inline]
    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    /// Spawn everything on the map object list.
    pub fn spawn_objects(
        &mut self,
        objects: &[MapObject],
        bank: &TextureBank,
    ) -> Result<Entity, SpawnError> {
        let p = spawn_objects(&mut self.world, objects, bank)?;
        self.player = Some(p);
        Ok(p)
    }

    /// Command applied on every following tic until replaced.
    pub fn set_input(&mut self, cmd: InputCmd) {
        self.input = cmd;
    }

    /// Advance enough tics to synchronise simulation with real time.
    pub fn pump(&mut self, grid: &TileGrid) {
        while self.last.elapsed() >= TIC {
            self.tick(grid);
            self.last += TIC;
        }
    }

    /// Run one fixed-rate game tic.
    pub fn tick(&mut self, grid: &TileGrid) {
        if let Some(p) = self.player {
            systems::player_input(&mut self.world, p, self.input);
        }
        systems::movement(&mut self.world, grid);
        systems::enemy_ai(&mut self.world, grid, DT);
    }

    /// Position and heading of the player, for the camera.
    pub fn player_pose(&self) -> Option<(Vec2, f32)> {
        let p = self.player?;
        let mut q = self.world.query_one::<(&Position, &Angle)>(p).ok()?;
        q.get().map(|(pos, ang)| (pos.0, ang.0))
    }

    /// Every billboard this tic, in no particular order.
    pub fn sprite_snapshot(&self, out: &mut Vec<SpriteInstance>) {
        out.clear();
        out.extend(
            self.world
                .query::<(&Position, &Sprite)>()
                .iter()
                .map(|(_, (pos, spr))| SpriteInstance {
                    tex: spr.0,
                    pos: pos.0,
                }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapFile;

    #[test]
    fn ticks_move_player_and_snapshot_sprites() {
        let (grid, objects) = MapFile::demo().into_parts().unwrap();
        let bank = TextureBank::default_with_checker();
        let mut sim = TicRunner::new();
        sim.spawn_objects(&objects, &bank).unwrap();

        let (start, _) = sim.player_pose().unwrap();
        sim.set_input(InputCmd {
            strafe: 1.0,
            ..InputCmd::default()
        });
        for _ in 0..10 {
            sim.tick(&grid);
        }
        let (now, angle) = sim.player_pose().unwrap();
        assert_eq!(angle, 0.0);
        // strafe right at heading 0 is +y
        assert!(now.y > start.y && now.x == start.x);

        let mut sprites = Vec::new();
        sim.sprite_snapshot(&mut sprites);
        assert_eq!(sprites.len(), 1);
    }

    #[test]
    fn no_player_no_pose() {
        assert_eq!(TicRunner::new().player_pose(), None);
    }
}
