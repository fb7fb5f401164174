//! Fixed-function material states.

use crate::color::Color;
use crate::types::{BlendFactor, CompareMode, Face, Shading, Wireframe};

/// Render states of one material.
///
/// Materials are plain data: the reader fills them attribute by attribute
/// and the host applies them when drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialStates {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub emission: Color,
    pub shininess: f32,
    pub offset_factor: f32,
    pub offset_units: f32,
    pub alpha_reference: f32,

    pub color_material: bool,
    pub lighting: bool,
    pub blending: bool,
    pub depth_test: bool,
    pub fog: bool,
    pub polygon_offset: bool,

    pub shading: Shading,
    pub wireframe_front: Wireframe,
    pub wireframe_back: Wireframe,
    pub depth_method: CompareMode,
    pub alpha_method: CompareMode,
    pub blend_source: BlendFactor,
    pub blend_target: BlendFactor,
    pub render_face: Face,
}

impl Default for MaterialStates {
    fn default() -> Self {
        Self {
            ambient: Color::WHITE,
            diffuse: Color::WHITE,
            specular: Color::BLACK,
            emission: Color::BLACK,
            shininess: 0.0,
            offset_factor: 0.0,
            offset_units: 0.0,
            alpha_reference: 0.0,
            color_material: true,
            lighting: true,
            blending: true,
            depth_test: true,
            fog: true,
            polygon_offset: false,
            shading: Shading::Gouraud,
            wireframe_front: Wireframe::Solid,
            wireframe_back: Wireframe::Solid,
            depth_method: CompareMode::LessEqual,
            alpha_method: CompareMode::Greater,
            blend_source: BlendFactor::SrcAlpha,
            blend_target: BlendFactor::InvSrcAlpha,
            render_face: Face::Front,
        }
    }
}

impl MaterialStates {
    /// Sets the fill mode of both faces.
    pub fn set_wireframe(&mut self, mode: Wireframe) {
        self.wireframe_front = mode;
        self.wireframe_back = mode;
    }
}
