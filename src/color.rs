/// Linear RGBA color used for scene backgrounds and lights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build an opaque color from a `0xRRGGBB` sRGB literal, as written in
    /// CSS or a design tool. Channels are decoded to linear.
    pub fn hex(rgb: u32) -> Self {
        let channel = |shift: u32| srgb_to_linear(((rgb >> shift) & 0xff) as f32 / 255.0);
        Self::rgb(channel(16), channel(8), channel(0))
    }

    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    /// RGB scaled by `intensity`, alpha dropped. Layout used by light uniforms.
    pub fn scaled_rgb(&self, intensity: f32) -> [f32; 3] {
        [self.r * intensity, self.g * intensity, self.b * intensity]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl From<Color> for wgpu::Color {
    fn from(c: Color) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_decodes_srgb_to_linear() {
        let background = Color::hex(0x333333);
        assert!((background.r - 0.0331).abs() < 1e-4);
        assert_eq!(background.r, background.g);
        assert_eq!(background.g, background.b);
        assert_eq!(background.a, 1.0);

        let ambient = Color::hex(0x404040);
        assert!((ambient.r - 0.0513).abs() < 1e-4);

        assert_eq!(Color::hex(0x000000), Color::BLACK);
        assert_eq!(Color::hex(0xffffff), Color::WHITE);
    }

    #[test]
    fn hex_keeps_channel_order() {
        let c = Color::hex(0xff0000);
        assert_eq!((c.r, c.g, c.b), (1.0, 0.0, 0.0));

        // Dark values sit on the linear segment of the curve.
        let dim = Color::hex(0x000002);
        assert!((dim.b - 2.0 / 255.0 / 12.92).abs() < 1e-7);
    }
}
