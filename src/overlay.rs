// overlay.rs - Opacity and transform of every 2D layer above the 3D frame
use glam::Vec2;

use crate::math::{clamp01, smoothstep};
use crate::progress::{fade_in_out, fly_in, triangular, PhaseId, PhaseProgress};

/// Clouds are never fully opaque, even before the veil lifts
pub const CLOUD_MAX_OPACITY: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub opacity: f32,
    /// Screen-space translation in logical pixels
    pub offset: Vec2,
    pub scale: f32,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            opacity: 0.0,
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Layer {
    fn faded(opacity: f32) -> Self {
        Self {
            opacity: clamp01(opacity),
            ..Self::default()
        }
    }

    pub fn visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Per-frame state of the overlay copy
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayState {
    pub hero: Layer,
    pub backdrop: Layer,
    pub scripture: Layer,
    pub cards: Layer,
    /// Teal, amber and photo cards flying in from the corners
    pub card_offsets: [Vec2; 3],
    pub one_app: Layer,
    pub phone_y: f32,
    pub phone_screen: usize,
    pub connect: Layer,
    pub connect_cards: f32,
    pub ui_spread: f32,
    pub simplicity: Layer,
    /// Percentage of the headline revealed
    pub text_reveal: f32,
    pub privacy: Layer,
    pub avodah: Layer,
    pub explode: f32,
    pub ascend: Layer,
    pub cta_active: bool,
    pub scroll_hint: bool,
    pub clouds: f32,
}

impl OverlayState {
    pub fn from_phases(p: &PhaseProgress) -> Self {
        let stairs = p.get(PhaseId::Stairs);
        let scripture = p.get(PhaseId::Scripture);
        let cards = p.get(PhaseId::Cards);
        let cards_exit = p.get(PhaseId::CardsExit);
        let one_app = p.get(PhaseId::OneApp);
        let connect = p.get(PhaseId::Connect);
        let simplicity = p.get(PhaseId::Simplicity);
        let privacy = p.get(PhaseId::Privacy);
        let avodah = p.get(PhaseId::Avodah);
        let ascend = p.get(PhaseId::Ascend);

        let hero = Layer {
            opacity: clamp01(1.0 - stairs * 1.5),
            offset: Vec2::new(0.0, stairs * -150.0),
            scale: 1.0,
        };

        // White sheet stays up from the scripture reveal until the one-app panel covers it
        let backdrop = Layer::faded(
            smoothstep(0.1, 0.15, scripture) * (1.0 - smoothstep(0.1, 0.15, one_app)),
        );

        let scripture_layer = Layer {
            opacity: (triangular(scripture, 0.5) * 1.5).min(1.0),
            offset: Vec2::ZERO,
            scale: 0.8 + scripture * 0.4,
        };

        let fly = fly_in(cards, 1.5);
        let cards_layer = Layer {
            opacity: clamp01(cards * 5.0) * (1.0 - cards_exit),
            offset: Vec2::ZERO,
            scale: 0.8 + cards * 0.2,
        };
        let card_offsets = [
            Vec2::new(-400.0, 200.0) * fly,
            Vec2::new(400.0, -200.0) * fly,
            Vec2::new(400.0, 400.0) * fly,
        ];

        let simplicity_layer = Layer::faded(fade_in_out(simplicity, 0.1, 0.05));
        let privacy_reveal = smoothstep(0.05, 0.15, privacy);

        Self {
            hero,
            backdrop,
            scripture: scripture_layer,
            cards: cards_layer,
            card_offsets,
            one_app: Layer::faded(fade_in_out(one_app, 0.1, 0.05)),
            phone_y: phone_offset(one_app),
            phone_screen: phone_screen(one_app),
            connect: Layer::faded(fade_in_out(connect, 0.1, 0.05)),
            connect_cards: (connect * 3.0).min(1.0),
            ui_spread: (connect * 2.0).min(1.0) * 350.0,
            simplicity: simplicity_layer,
            text_reveal: (simplicity * 200.0).min(100.0),
            privacy: Layer::faded(privacy_reveal * simplicity_layer.opacity),
            avodah: Layer::faded(fade_in_out(avodah, 0.1, 0.1)),
            explode: (1.0 - (avodah * std::f32::consts::PI).sin()) * 400.0,
            ascend: Layer::faded((ascend - 0.2) * 5.0),
            cta_active: ascend > 0.5,
            scroll_hint: ascend <= 0.5,
            clouds: CLOUD_MAX_OPACITY * (1.0 - p.get(PhaseId::CloudVeil)),
        }
    }

    /// Named layer opacities, for crowding analysis and logging
    pub fn layers(&self) -> Vec<(&'static str, f32)> {
        vec![
            ("hero", self.hero.opacity),
            ("backdrop", self.backdrop.opacity),
            ("scripture", self.scripture.opacity),
            ("cards", self.cards.opacity),
            ("one_app", self.one_app.opacity),
            ("connect", self.connect.opacity),
            ("simplicity", self.simplicity.opacity),
            ("privacy", self.privacy.opacity),
            ("avodah", self.avodah.opacity),
            ("ascend", self.ascend.opacity),
        ]
    }

    /// Adapter for [`crate::progress::PhaseTable::crowded_regions`]
    pub fn layers_for(phases: &PhaseProgress) -> Vec<(&'static str, f32)> {
        Self::from_phases(phases).layers()
    }
}

/// Phone slides up, holds, then lifts away
fn phone_offset(p: f32) -> f32 {
    if p <= 0.0 {
        100.0
    } else if p <= 0.2 {
        100.0 - (p / 0.2) * 100.0
    } else if p <= 0.9 {
        0.0
    } else {
        -((p - 0.9) / 0.1) * 50.0
    }
}

fn phone_screen(p: f32) -> usize {
    if p < 0.33 {
        0
    } else if p < 0.66 {
        1
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phases(values: &[(PhaseId, f32)]) -> PhaseProgress {
        let mut p = PhaseProgress::default();
        for &(id, v) in values {
            p.set(id, v);
        }
        p
    }

    #[test]
    fn hero_fades_and_rises() {
        let start = OverlayState::from_phases(&phases(&[]));
        assert_eq!(start.hero.opacity, 1.0);
        assert_eq!(start.clouds, CLOUD_MAX_OPACITY);

        let later = OverlayState::from_phases(&phases(&[(PhaseId::Stairs, 0.5), (PhaseId::CloudVeil, 1.0)]));
        assert_eq!(later.hero.opacity, 0.25);
        assert_eq!(later.hero.offset.y, -75.0);
        assert_eq!(later.clouds, 0.0);
    }

    #[test]
    fn cards_land_then_exit() {
        let mid = OverlayState::from_phases(&phases(&[(PhaseId::Cards, 0.8)]));
        assert_eq!(mid.cards.opacity, 1.0);
        assert!(mid.card_offsets.iter().all(|o| *o == Vec2::ZERO));

        let gone = OverlayState::from_phases(&phases(&[(PhaseId::Cards, 1.0), (PhaseId::CardsExit, 1.0)]));
        assert_eq!(gone.cards.opacity, 0.0);
    }

    #[test]
    fn phone_path() {
        assert_eq!(phone_offset(0.0), 100.0);
        assert!((phone_offset(0.1) - 50.0).abs() < 1e-4);
        assert_eq!(phone_offset(0.5), 0.0);
        assert!((phone_offset(1.0) + 50.0).abs() < 1e-4);
        assert_eq!(phone_screen(0.7), 2);
    }

    #[test]
    fn backdrop_and_privacy_ease_at_their_edges() {
        let mid = OverlayState::from_phases(&phases(&[(PhaseId::Scripture, 0.125)]));
        assert!((mid.backdrop.opacity - 0.5).abs() < 1e-5);

        // Eased edge starts slower than a straight ramp would
        let early = OverlayState::from_phases(&phases(&[(PhaseId::Scripture, 0.11)]));
        assert!(early.backdrop.opacity > 0.0 && early.backdrop.opacity < 0.2);

        let covered = OverlayState::from_phases(&phases(&[(PhaseId::Scripture, 0.5), (PhaseId::OneApp, 0.2)]));
        assert_eq!(covered.backdrop.opacity, 0.0);

        let panel = OverlayState::from_phases(&phases(&[(PhaseId::Simplicity, 0.5), (PhaseId::Privacy, 0.1)]));
        assert!((panel.privacy.opacity - 0.5).abs() < 1e-5);
        let shown = OverlayState::from_phases(&phases(&[(PhaseId::Simplicity, 0.5), (PhaseId::Privacy, 0.5)]));
        assert_eq!(shown.privacy.opacity, 1.0);
    }

    #[test]
    fn privacy_hides_with_its_panel() {
        let state = OverlayState::from_phases(&phases(&[(PhaseId::Privacy, 1.0), (PhaseId::Simplicity, 1.0)]));
        assert_eq!(state.privacy.opacity, 0.0);
    }

    #[test]
    fn ascend_cta_switches_at_half() {
        let before = OverlayState::from_phases(&phases(&[(PhaseId::Ascend, 0.4)]));
        let after = OverlayState::from_phases(&phases(&[(PhaseId::Ascend, 0.6)]));
        assert!(!before.cta_active && before.scroll_hint);
        assert!(after.cta_active && !after.scroll_hint);
        assert_eq!(after.ascend.opacity, 1.0);
    }
}
