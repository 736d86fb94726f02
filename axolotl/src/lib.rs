//! Axolotl - resource pack build and publish pipeline
//!
//! This library turns hand-authored assets plus JSON descriptors into a
//! game client resource pack:
//!
//! - [`glyph`] allocates private-use codepoints for texture glyphs and
//!   encodes spacing runs
//! - [`item`] resolves custom items and generates their model overrides
//! - [`sound`] builds the sound event manifest
//! - [`pack`] stages the tree and compresses it into `pack.zip`
//! - [`publisher`] uploads the archive and records the new pack reference
//! - [`app`] wires it together behind [`app::PackService`]

pub mod app;
pub mod config;
pub mod descriptor;
pub mod glyph;
pub mod item;
pub mod logging;
pub mod pack;
pub mod publisher;
pub mod sound;
