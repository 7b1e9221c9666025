// progress.rs - Scroll signal smoothing and declarative phase windows
use crate::config::ProgressConfig;
use crate::math::clamp01;

pub use crate::math::ease_out_cubic;

pub const DEFAULT_DAMPING: f32 = 0.05;

/// Raw scroll target plus exponentially smoothed overall progress
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressMapper {
    raw: f32,
    range: f32,
    smoothed: f32,
    damping: f32,
}

impl ProgressMapper {
    pub fn new(range: f32) -> Self {
        Self {
            raw: 0.0,
            range,
            smoothed: 0.0,
            damping: DEFAULT_DAMPING,
        }
    }

    pub fn from_config(config: &ProgressConfig) -> Self {
        Self::new(config.scroll_range).with_damping(config.damping)
    }

    /// Fraction of the gap closed per tick, clamped to (0, 1]
    pub fn with_damping(mut self, k: f32) -> Self {
        self.damping = if k.is_finite() && k > 0.0 {
            k.min(1.0)
        } else {
            DEFAULT_DAMPING
        };
        self
    }

    /// Record the latest scroll offset in pixels; no clamping
    pub fn set_target(&mut self, raw: f32) {
        self.raw = raw;
    }

    pub fn set_range(&mut self, range: f32) {
        self.range = range;
    }

    /// Normalised target in [0, 1]
    pub fn target(&self) -> f32 {
        if self.range > 0.0 && self.raw.is_finite() {
            clamp01(self.raw / self.range)
        } else {
            0.0
        }
    }

    /// Advance one frame and return the smoothed progress
    pub fn tick(&mut self) -> f32 {
        let target = self.target();
        self.smoothed += (target - self.smoothed) * self.damping;
        self.smoothed
    }

    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }

    /// Smoothed progress expressed back in scroll pixels
    pub fn smoothed_px(&self) -> f32 {
        self.smoothed * self.range.max(0.0)
    }

    pub fn raw(&self) -> f32 {
        self.raw
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }
}

/// Local progress of `raw` through `[start, end]`, clamped to [0, 1]
pub fn window_progress(raw: f32, start: f32, end: f32) -> f32 {
    if !raw.is_finite() {
        return 0.0;
    }
    if end <= start {
        return if raw >= end { 1.0 } else { 0.0 };
    }
    ((raw - start) / (end - start)).clamp(0.0, 1.0)
}

/// Rises linearly to 1 at `peak_at`, then falls back to 0 at 1
pub fn triangular(value: f32, peak_at: f32) -> f32 {
    let v = clamp01(value);
    let peak = clamp01(peak_at);
    if v <= peak {
        if peak <= 0.0 {
            1.0
        } else {
            v / peak
        }
    } else if peak >= 1.0 {
        1.0
    } else {
        (1.0 - v) / (1.0 - peak)
    }
}

/// Trapezoid: ramps in over `rise`, holds at 1, ramps out over the last `fall`
pub fn fade_in_out(value: f32, rise: f32, fall: f32) -> f32 {
    let v = clamp01(value);
    if rise > 0.0 && v < rise {
        v / rise
    } else if fall > 0.0 && v > 1.0 - fall {
        (1.0 - v) / fall
    } else {
        1.0
    }
}

/// 1 while the element is far away, 0 once it has landed
pub fn fly_in(value: f32, speed: f32) -> f32 {
    1.0 - (clamp01(value) * speed.max(0.0)).min(1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseId {
    Stairs,
    Scripture,
    Cards,
    CardsExit,
    OneApp,
    Connect,
    Simplicity,
    Privacy,
    Avodah,
    Ascend,
    CloudVeil,
}

impl PhaseId {
    pub const COUNT: usize = 11;

    pub const ALL: [PhaseId; Self::COUNT] = [
        Self::Stairs,
        Self::Scripture,
        Self::Cards,
        Self::CardsExit,
        Self::OneApp,
        Self::Connect,
        Self::Simplicity,
        Self::Privacy,
        Self::Avodah,
        Self::Ascend,
        Self::CloudVeil,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Which signal feeds a phase window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalSource {
    /// Immediate scroll offset, for layers that must track the finger
    Raw,
    /// Smoothed progress converted back to pixels, for staged reveals
    Smoothed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseWindow {
    pub id: PhaseId,
    pub start: f32,
    pub end: f32,
    pub source: SignalSource,
}

impl PhaseWindow {
    pub const fn new(id: PhaseId, start: f32, end: f32, source: SignalSource) -> Self {
        Self {
            id,
            start,
            end,
            source,
        }
    }

    pub fn progress(&self, raw: f32, smoothed_px: f32) -> f32 {
        let signal = match self.source {
            SignalSource::Raw => raw,
            SignalSource::Smoothed => smoothed_px,
        };
        window_progress(signal, self.start, self.end)
    }
}

/// Local progress of every phase for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhaseProgress {
    values: [f32; PhaseId::COUNT],
}

impl PhaseProgress {
    pub fn get(&self, id: PhaseId) -> f32 {
        self.values[id.index()]
    }

    pub fn set(&mut self, id: PhaseId, value: f32) {
        self.values[id.index()] = clamp01(value);
    }
}

/// Scroll range where too many overlay layers are visible at once
#[derive(Debug, Clone, PartialEq)]
pub struct CrowdedRegion {
    pub start: f32,
    pub end: f32,
    pub layers: Vec<&'static str>,
}

/// Opacity above which a layer counts as visible for crowding
pub const CROWDING_OPACITY: f32 = 0.5;
/// Number of simultaneously visible layers that counts as crowded
pub const CROWDING_LAYERS: usize = 3;

/// Single source of truth for every phase window
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTable {
    windows: Vec<PhaseWindow>,
}

impl Default for PhaseTable {
    fn default() -> Self {
        Self::landing()
    }
}

impl PhaseTable {
    pub fn new(windows: Vec<PhaseWindow>) -> Self {
        Self { windows }
    }

    /// Windows of the authored landing sequence, in scroll pixels
    pub fn landing() -> Self {
        use PhaseId::*;
        use SignalSource::*;
        Self::new(vec![
            PhaseWindow::new(Stairs, 0.0, 10_000.0, Raw),
            PhaseWindow::new(Scripture, 8_000.0, 12_000.0, Smoothed),
            PhaseWindow::new(Cards, 12_000.0, 15_000.0, Smoothed),
            PhaseWindow::new(CardsExit, 14_500.0, 15_000.0, Smoothed),
            PhaseWindow::new(OneApp, 15_000.0, 20_000.0, Smoothed),
            PhaseWindow::new(Connect, 20_000.0, 25_000.0, Smoothed),
            PhaseWindow::new(Simplicity, 25_000.0, 30_000.0, Smoothed),
            PhaseWindow::new(Privacy, 27_000.0, 28_500.0, Smoothed),
            PhaseWindow::new(Avodah, 30_000.0, 35_000.0, Smoothed),
            PhaseWindow::new(Ascend, 35_000.0, 38_000.0, Smoothed),
            PhaseWindow::new(CloudVeil, 0.0, 6_000.0, Raw),
        ])
    }

    pub fn get(&self, id: PhaseId) -> Option<&PhaseWindow> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn windows(&self) -> &[PhaseWindow] {
        &self.windows
    }

    /// Evaluate every window; phases without a window stay at 0
    pub fn evaluate(&self, raw: f32, smoothed_px: f32) -> PhaseProgress {
        let mut out = PhaseProgress::default();
        for window in &self.windows {
            out.set(window.id, window.progress(raw, smoothed_px));
        }
        out
    }

    /// Sweep `[0, range]` and report spans where at least three layers exceed 50 %
    pub fn crowded_regions<F>(&self, range: f32, step: f32, layers: F) -> Vec<CrowdedRegion>
    where
        F: Fn(&PhaseProgress) -> Vec<(&'static str, f32)>,
    {
        let mut regions: Vec<CrowdedRegion> = Vec::new();
        if !(step > 0.0) || !(range >= 0.0) {
            return regions;
        }

        let mut open: Option<CrowdedRegion> = None;
        let samples = (range / step).floor() as usize;
        for n in 0..=samples {
            let offset = n as f32 * step;
            let phases = self.evaluate(offset, offset);
            let visible: Vec<&'static str> = layers(&phases)
                .into_iter()
                .filter(|(_, opacity)| *opacity > CROWDING_OPACITY)
                .map(|(name, _)| name)
                .collect();

            if visible.len() >= CROWDING_LAYERS {
                let region = open.get_or_insert_with(|| CrowdedRegion {
                    start: offset,
                    end: offset,
                    layers: Vec::new(),
                });
                region.end = offset;
                for name in visible {
                    if !region.layers.contains(&name) {
                        region.layers.push(name);
                    }
                }
            } else if let Some(region) = open.take() {
                regions.push(region);
            }
        }
        regions.extend(open);
        regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damping_is_clamped() {
        assert_eq!(ProgressMapper::new(1.0).with_damping(3.0).damping(), 1.0);
        assert_eq!(ProgressMapper::new(1.0).with_damping(-1.0).damping(), DEFAULT_DAMPING);
        assert_eq!(ProgressMapper::new(1.0).with_damping(f32::NAN).damping(), DEFAULT_DAMPING);
    }

    #[test]
    fn zero_range_maps_to_zero() {
        let mut m = ProgressMapper::new(0.0);
        m.set_target(500.0);
        assert_eq!(m.tick(), 0.0);
    }

    #[test]
    fn first_tick_moves_by_damping() {
        let mut m = ProgressMapper::new(1000.0).with_damping(0.1);
        m.set_target(1000.0);
        assert!((m.tick() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn triangular_degenerate_peaks() {
        assert_eq!(triangular(0.0, 0.0), 1.0);
        assert_eq!(triangular(0.5, 0.0), 0.5);
        assert_eq!(triangular(1.0, 1.0), 1.0);
        assert_eq!(triangular(0.5, 1.0), 0.5);
    }

    #[test]
    fn fade_in_out_trapezoid() {
        assert_eq!(fade_in_out(0.0, 0.1, 0.05), 0.0);
        assert!((fade_in_out(0.05, 0.1, 0.05) - 0.5).abs() < 1e-6);
        assert_eq!(fade_in_out(0.5, 0.1, 0.05), 1.0);
        assert_eq!(fade_in_out(1.0, 0.1, 0.05), 0.0);
    }

    #[test]
    fn fly_in_lands() {
        assert_eq!(fly_in(0.0, 1.5), 1.0);
        assert_eq!(fly_in(1.0, 1.5), 0.0);
        assert!((fly_in(0.4, 1.5) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn missing_window_reads_zero() {
        let table = PhaseTable::new(vec![]);
        assert_eq!(table.evaluate(5000.0, 5000.0).get(PhaseId::Stairs), 0.0);
    }

    #[test]
    fn source_selects_signal() {
        let raw = PhaseWindow::new(PhaseId::Stairs, 0.0, 100.0, SignalSource::Raw);
        let smooth = PhaseWindow::new(PhaseId::Cards, 0.0, 100.0, SignalSource::Smoothed);
        assert_eq!(raw.progress(50.0, 0.0), 0.5);
        assert_eq!(smooth.progress(50.0, 0.0), 0.0);
    }
}
