//! Render-side types populated by material scripts.
//!
//! This crate holds the enumerations, material states, vertex formats,
//! texture flags and texture layers a script describes, together with the
//! [`RenderSystem`] trait through which shader classes and textures are
//! created, and a [`HeadlessRenderSystem`] that records those calls.

pub mod color;
pub mod headless;
pub mod layer;
pub mod material;
pub mod render;
pub mod texture;
pub mod types;
pub mod vertex;

pub use color::Color;
pub use headless::{HeadlessRenderSystem, HeadlessShaderClass, HeadlessShaderStage, HeadlessTexture, TextureFill};
pub use layer::{LayerKind, TextureLayer};
pub use material::MaterialStates;
pub use render::{InputLayout, RenderSystem, TextureHandle};
pub use texture::{TextureFilter, TextureFlags};
pub use types::*;
pub use vertex::{VertexAttribute, VertexAttributeKind, VertexFormat};
