mod color;
mod easing;

pub use color::{hex_to_rgb, hex_to_rgb8};
pub use easing::{clamp01, ease_out_cubic, lerp, smoothstep};
