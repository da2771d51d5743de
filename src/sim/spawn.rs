use glam::Vec2;
use hecs::{Entity, World};
use thiserror::Error;

use super::components::{Angle, Collider, Enemy, Player, Position, Sprite, Velocity};
use crate::{
    map::MapObject,
    world::{NO_TEXTURE, TextureBank},
};

pub const PLAYER_RADIUS: f32 = 0.25;
pub const OGRE_RADIUS: f32 = 0.25;
pub const OGRE_SPEED: f32 = 1.171875; // tiles / second
/// Bank name of the ogre billboard.
pub const OGRE_TEXTURE: &str = "RED_OGRE";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    #[error("map has no `player` object")]
    MissingPlayer,
}

/// Populate `world` from the map object list; returns the player entity.
///
/// Objects stand in the centre of their tile.  Unknown kinds and extra
/// players are skipped with a warning.
pub fn spawn_objects(
    world: &mut World,
    objects: &[MapObject],
    bank: &TextureBank,
) -> Result<Entity, SpawnError> {
    let mut player = None;

    for obj in objects {
        let pos = Position(Vec2::new(obj.x as f32 + 0.5, obj.y as f32 + 0.5));
        match obj.kind.as_str() {
            "player" => {
                if player.is_some() {
                    log::warn!("extra player start at ({}, {}) ignored", obj.x, obj.y);
                    continue;
                }
                player = Some(world.spawn((
                    pos,
                    Velocity::default(),
                    Angle(0.0),
                    Collider {
                        radius: PLAYER_RADIUS,
                    },
                    Player,
                )));
            }
            "red_ogre" => {
                let tex = bank.id(OGRE_TEXTURE).unwrap_or_else(|| {
                    log::warn!("texture {OGRE_TEXTURE} not loaded, using fallback");
                    NO_TEXTURE
                });
                world.spawn((
                    pos,
                    Angle(0.0),
                    Collider {
                        radius: OGRE_RADIUS,
                    },
                    Sprite(tex),
                    Enemy {
                        speed: OGRE_SPEED,
                        ..Enemy::default()
                    },
                ));
            }
            other => log::warn!("unknown map object `{other}` at ({}, {})", obj.x, obj.y),
        }
    }

    log::debug!("spawned {} entities", world.len());
    player.ok_or(SpawnError::MissingPlayer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Rgb, texture::procedural};

    #[test]
    fn spawns_player_and_enemies() {
        let mut bank = TextureBank::default_with_checker();
        let ogre = bank
            .insert(OGRE_TEXTURE, procedural::ogre(OGRE_TEXTURE, Rgb::new(172, 50, 50)))
            .unwrap();
        let objects = [
            MapObject::new("player", 1, 2),
            MapObject::new("red_ogre", 3, 3),
            MapObject::new("player", 4, 4),
            MapObject::new("lamp", 2, 2),
        ];
        let mut world = World::new();
        let p = spawn_objects(&mut world, &objects, &bank).unwrap();

        assert_eq!(world.len(), 2);
        assert_eq!(world.get::<&Position>(p).unwrap().0, Vec2::new(1.5, 2.5));
        let sprites: Vec<_> = world.query::<&Sprite>().iter().map(|(_, s)| s.0).collect();
        assert_eq!(sprites, [ogre]);
    }

    #[test]
    fn missing_player_is_error() {
        let bank = TextureBank::default_with_checker();
        let mut world = World::new();
        let err = spawn_objects(&mut world, &[MapObject::new("red_ogre", 1, 1)], &bank);
        assert_eq!(err, Err(SpawnError::MissingPlayer));
        // unknown texture falls back to the checker
        let s: Vec<_> = world.query::<&Sprite>().iter().map(|(_, s)| s.0).collect();
        assert_eq!(s, [NO_TEXTURE]);
    }
}
