//! Wolfenstein-style software raycaster.
//!
//! * [`world`] – tile grid, camera, textures.
//! * [`renderer`] – the per-column ray caster and its frame compositor.
//! * [`map`] – binary and text map files.
//! * [`sim`] – ECS game logic feeding the renderer a camera and sprites.

pub mod map;
pub mod renderer;
pub mod sim;
pub mod world;
