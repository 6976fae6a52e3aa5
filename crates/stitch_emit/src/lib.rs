//! Text emission for generated module bodies.
//!
//! The synthesizer fills a [`ModuleBody`] section by section; [`render`]
//! writes the sections in a fixed order so that every declaration precedes
//! its uses and the instances follow all of the wiring they depend on.

#![warn(missing_docs)]

pub mod body;
pub mod writer;

pub use body::ModuleBody;
pub use writer::{render, EmitOptions};
