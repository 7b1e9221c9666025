/// Frame - timing and progress of one rendered tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    pub time: f32,
    pub delta: f32,
    /// Smoothed overall progress after this frame's tick
    pub progress: f32,
    /// Raw scroll offset the frame was driven by
    pub scroll: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32, progress: f32, scroll: f32) -> Self {
        Self {
            number,
            time,
            delta,
            progress,
            scroll,
        }
    }
}
