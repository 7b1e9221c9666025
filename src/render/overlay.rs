use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke, Vec2};
use winit::window::Window;

use super::GpuContext;
use crate::overlay::{Layer, OverlayState};

const WHITE: Color32 = Color32::WHITE;
const INK: Color32 = Color32::from_rgb(28, 25, 23);
const MUTED: Color32 = Color32::from_rgb(168, 162, 158);
const NIGHT: Color32 = Color32::from_rgb(15, 23, 42);
const TEAL: Color32 = Color32::from_rgb(13, 148, 136);
const AMBER: Color32 = Color32::from_rgb(217, 119, 6);
const PURPLE: Color32 = Color32::from_rgb(147, 51, 234);

const PHONE_SCREENS: [&str; 3] = ["My Avodah", "Library", "King AI"];
const SIMPLICITY_HEADLINE: &str = "Divine Simplicity";

fn fade(color: Color32, opacity: f32) -> Color32 {
    color.gamma_multiply(opacity.clamp(0.0, 1.0))
}

/// Paints the overlay copy for one frame into `ctx`
pub fn paint(ctx: &egui::Context, state: &OverlayState) {
    let screen = ctx.screen_rect();
    let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::Foreground, egui::Id::new("overlay_copy")));
    let unit = screen.height() / 100.0;
    let center = screen.center();

    let text = |pos: Pos2, s: &str, size: f32, color: Color32, opacity: f32| {
        if opacity > 0.0 {
            painter.text(pos, Align2::CENTER_CENTER, s, FontId::proportional(size), fade(color, opacity));
        }
    };
    let panel = |rect: Rect, color: Color32, opacity: f32| {
        if opacity > 0.0 {
            painter.rect_filled(rect, 2.0 * unit, fade(color, opacity));
        }
    };

    // Hero title above the 3D scene
    let hero = state.hero;
    if hero.visible() {
        let origin = center + to_vec(hero);
        text(origin + Vec2::new(0.0, -16.0 * unit), "THE PATH OF ASCENT", 2.2 * unit, WHITE, hero.opacity * 0.8);
        text(origin + Vec2::new(0.0, -4.0 * unit), "KINGDOM", 14.0 * unit, WHITE, hero.opacity);
        text(origin + Vec2::new(0.0, 8.0 * unit), "OF HEAVEN", 12.0 * unit, WHITE, hero.opacity * 0.8);
    }
    if state.scroll_hint && hero.visible() {
        text(Pos2::new(center.x, screen.bottom() - 8.0 * unit), "Begin Ascent", 1.4 * unit, WHITE, hero.opacity * 0.7);
    }

    panel(screen, WHITE, state.backdrop.opacity);

    let scripture = state.scripture;
    if scripture.visible() {
        let s = scripture.scale;
        text(center + Vec2::new(0.0, -6.0 * unit * s), "\"Build me a", 9.0 * unit * s, INK, scripture.opacity);
        text(center + Vec2::new(0.0, 4.0 * unit * s), "Sanctuary\"", 9.0 * unit * s, INK, scripture.opacity);
        text(center + Vec2::new(0.0, 14.0 * unit * s), "Exodus 25:8", 3.0 * unit * s, MUTED, scripture.opacity);
    }

    let cards = state.cards;
    if cards.visible() {
        let size = Vec2::splat(22.0 * unit * cards.scale);
        let anchors = [Vec2::new(-30.0, -10.0), Vec2::new(20.0, -20.0), Vec2::new(10.0, 15.0)];
        let labels = [("12/12", "Habits Completed", TEAL), ("Ch. 41", "Tanya", AMBER), ("Jerusalem", "Kehilla", WHITE)];
        for ((anchor, offset), (title, caption, color)) in anchors.iter().zip(state.card_offsets).zip(labels) {
            let c = center + *anchor * unit + Vec2::new(offset.x, offset.y);
            panel(Rect::from_center_size(c, size), color, cards.opacity);
            let ink = if color == WHITE { INK } else { WHITE };
            text(c + Vec2::new(0.0, -2.0 * unit), title, 4.0 * unit, ink, cards.opacity);
            text(c + Vec2::new(0.0, 3.0 * unit), caption, 1.8 * unit, ink, cards.opacity * 0.8);
        }
    }

    let one_app = state.one_app;
    if one_app.visible() {
        panel(screen, AMBER, one_app.opacity);
        text(Pos2::new(center.x, screen.top() + 15.0 * unit), "One App.", 9.0 * unit, WHITE, one_app.opacity);
        text(
            Pos2::new(center.x, screen.top() + 23.0 * unit),
            "For all your spiritual needs.",
            3.0 * unit,
            WHITE,
            one_app.opacity * 0.9,
        );
        let phone_center = Pos2::new(center.x, center.y + 15.0 * unit + state.phone_y / 100.0 * screen.height());
        let phone = Rect::from_center_size(phone_center, Vec2::new(28.0 * unit, 56.0 * unit));
        panel(phone, WHITE, one_app.opacity);
        painter.rect_stroke(phone, 2.0 * unit, Stroke::new(0.6 * unit, fade(INK, one_app.opacity)), egui::StrokeKind::Inside);
        let screen_label = PHONE_SCREENS[state.phone_screen.min(PHONE_SCREENS.len() - 1)];
        text(phone.center() - Vec2::new(0.0, 20.0 * unit), screen_label, 3.0 * unit, AMBER, one_app.opacity);
    }

    let connect = state.connect;
    if connect.visible() {
        panel(screen, WHITE, connect.opacity);
        text(Pos2::new(center.x, screen.top() + 15.0 * unit), "Connect.", 9.0 * unit, INK, connect.opacity);
        text(
            Pos2::new(center.x, screen.top() + 23.0 * unit),
            "Deeply rooted in community.",
            3.0 * unit,
            MUTED,
            connect.opacity,
        );
        let card_opacity = connect.opacity * state.connect_cards;
        for (dir, title) in [(-1.0, "Grand Farbrengen"), (1.0, "React Developer")] {
            let c = center + Vec2::new(dir * state.ui_spread * unit / 10.0, 10.0 * unit);
            panel(Rect::from_center_size(c, Vec2::new(26.0 * unit, 12.0 * unit)), Color32::from_gray(245), card_opacity);
            text(c, title, 2.4 * unit, INK, card_opacity);
        }
    }

    let simplicity = state.simplicity;
    if simplicity.visible() {
        panel(screen, NIGHT, simplicity.opacity);
        text(center + Vec2::new(0.0, -10.0 * unit), SIMPLICITY_HEADLINE, 8.0 * unit, WHITE, simplicity.opacity * 0.1);
        let shown = revealed(SIMPLICITY_HEADLINE, state.text_reveal);
        text(center + Vec2::new(0.0, -10.0 * unit), shown, 8.0 * unit, WHITE, simplicity.opacity);
        text(
            center + Vec2::new(0.0, 0.0),
            "Strip away the noise. Focus on the connection.",
            2.6 * unit,
            MUTED,
            simplicity.opacity,
        );
    }

    let privacy = state.privacy;
    if privacy.visible() {
        let card = Rect::from_center_size(center + Vec2::new(0.0, 20.0 * unit), Vec2::new(50.0 * unit, 20.0 * unit));
        panel(card, Color32::from_rgb(30, 41, 59), privacy.opacity);
        text(card.center() - Vec2::new(0.0, 4.0 * unit), "Sacred Privacy", 3.6 * unit, WHITE, privacy.opacity);
        text(
            card.center() + Vec2::new(0.0, 3.0 * unit),
            "Your spiritual data is encrypted. We do not sell your soul.",
            1.8 * unit,
            MUTED,
            privacy.opacity,
        );
    }

    let avodah = state.avodah;
    if avodah.visible() {
        panel(screen, Color32::from_rgb(250, 250, 249), avodah.opacity);
        text(center + Vec2::new(0.0, -4.0 * unit), "Everything", 9.0 * unit, INK, avodah.opacity);
        text(center + Vec2::new(0.0, 5.0 * unit), "In one place.", 4.0 * unit, MUTED, avodah.opacity);
        let spread = state.explode * unit / 10.0;
        for (dir, label, color) in [(-1.0, "Tzedakah", AMBER), (1.0, "Tanya", PURPLE), (0.0, "Mincha", TEAL)] {
            let c = center + Vec2::new(dir * (25.0 * unit + spread), 20.0 * unit + spread * (1.0 - f32::abs(dir)));
            text(c, label, 2.4 * unit, color, avodah.opacity);
        }
    }

    let ascend = state.ascend;
    if ascend.visible() {
        text(center + Vec2::new(0.0, -6.0 * unit), "Ascend.", 14.0 * unit, WHITE, ascend.opacity);
        text(center + Vec2::new(0.0, 8.0 * unit), "Your sanctuary awaits.", 3.4 * unit, WHITE, ascend.opacity);
        if state.cta_active {
            let button = Rect::from_center_size(center + Vec2::new(0.0, 18.0 * unit), Vec2::new(24.0 * unit, 6.0 * unit));
            panel(button, WHITE, ascend.opacity);
            text(button.center(), "Enter", 2.4 * unit, INK, ascend.opacity);
        }
    }
}

fn to_vec(layer: Layer) -> Vec2 {
    Vec2::new(layer.offset.x, layer.offset.y)
}

/// Leading part of `headline` for a reveal percentage in [0, 100]
fn revealed(headline: &str, percent: f32) -> &str {
    let count = headline.chars().count();
    let keep = ((percent.clamp(0.0, 100.0) / 100.0) * count as f32).round() as usize;
    match headline.char_indices().nth(keep) {
        Some((byte, _)) => &headline[..byte],
        None => headline,
    }
}

/// egui state and GPU renderer for the overlay pass
pub struct OverlayRenderer {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl OverlayRenderer {
    pub fn new(gpu: &GpuContext, format: wgpu::TextureFormat, window: &Window) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(gpu.device(), format, egui_wgpu::RendererOptions::default());
        Self { ctx, state, renderer }
    }

    /// Draw the overlay on top of `view`, loading what the scene pass left
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        window: &Window,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size: [u32; 2],
        overlay: &OverlayState,
    ) {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| paint(ctx, overlay));
        self.state.handle_platform_output(window, full_output.platform_output);

        let tris = self.ctx.tessellate(full_output.shapes, self.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(gpu.device(), gpu.queue(), *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: size,
            pixels_per_point: window.scale_factor() as f32,
        };
        self.renderer
            .update_buffers(gpu.device(), gpu.queue(), encoder, &tris, &screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            let mut render_pass = render_pass.forget_lifetime();
            self.renderer.render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
