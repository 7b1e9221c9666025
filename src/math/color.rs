/// Convert a packed `0xRRGGBB` colour to linear-ish floats in [0, 1]
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    let [r, g, b] = hex_to_rgb8(hex);
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
}

/// Split a packed `0xRRGGBB` colour into bytes
pub const fn hex_to_rgb8(hex: u32) -> [u8; 3] {
    [
        ((hex >> 16) & 0xff) as u8,
        ((hex >> 8) & 0xff) as u8,
        (hex & 0xff) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb8_splits_channels() {
        assert_eq!(hex_to_rgb8(0xffd700), [255, 215, 0]);
        assert_eq!(hex_to_rgb8(0x221100), [0x22, 0x11, 0x00]);
    }

    #[test]
    fn test_hex_to_rgb_normalizes() {
        let rgb = hex_to_rgb(0xff0080);
        assert!((rgb[0] - 1.0).abs() < 1e-6);
        assert!(rgb[1].abs() < 1e-6);
        assert!((rgb[2] - 128.0 / 255.0).abs() < 1e-6);
    }
}
