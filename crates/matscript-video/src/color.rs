//! 8-bit RGBA color.

/// An RGBA color with one byte per component.
///
/// The default is opaque white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Opaque gray with all three color components set to `value`.
    pub const fn gray(value: u8) -> Self {
        Self::rgba(value, value, value, 255)
    }

    /// Sets component `index` (0 red, 1 green, 2 blue, 3 alpha); other indices are ignored.
    pub fn set_component(&mut self, index: usize, value: u8) {
        match index {
            0 => self.red = value,
            1 => self.green = value,
            2 => self.blue = value,
            3 => self.alpha = value,
            _ => {}
        }
    }

    /// Components normalized to `0.0..=1.0`.
    pub fn to_f32_array(self) -> [f32; 4] {
        [
            self.red as f32 / 255.0,
            self.green as f32 / 255.0,
            self.blue as f32 / 255.0,
            self.alpha as f32 / 255.0,
        ]
    }
}
