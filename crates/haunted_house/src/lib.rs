//! # Haunted House
//!
//! A small night-time diorama built on [`haunt_engine`]: a brick house with a
//! displaced door, bushes, a field of tilted graves, fog, and three coloured
//! ghost lights wandering around the house.
//!
//! - [`config`]: every tunable value, loadable from RON or TOML
//! - [`textures`]: texture requests
//! - [`props`]: geometry and material for each prop
//! - [`graves`]: random grave placement
//! - [`composer`]: builds the scene graph
//! - [`params`]: debug panel wiring
//! - [`animator`]: ghost paths
//! - [`app`]: the [`Application`](haunt_engine::Application) tying it together

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod animator;
pub mod app;
pub mod composer;
pub mod config;
pub mod error;
pub mod graves;
pub mod params;
pub mod props;
pub mod textures;

pub use app::HauntedHouseApp;
pub use config::HauntedConfig;
pub use error::HauntedError;
