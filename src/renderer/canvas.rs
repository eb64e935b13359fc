//! Canvas 2D backend

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Color, Renderer, TextAlign};
use crate::error::StartupError;
use crate::sim::collision::Rect;

/// CSS color string for an RGBA quadruple
fn css(color: Color) -> String {
    let [r, g, b, a] = color;
    format!(
        "rgba({}, {}, {}, {})",
        (r.clamp(0.0, 1.0) * 255.0).round() as u8,
        (g.clamp(0.0, 1.0) * 255.0).round() as u8,
        (b.clamp(0.0, 1.0) * 255.0).round() as u8,
        a.clamp(0.0, 1.0)
    )
}

/// Draws into an `HtmlCanvasElement` in CSS pixels
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Logical size in CSS pixels
    size: Vec2,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, StartupError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| StartupError::ContextUnavailable(format!("{e:?}")))?
            .ok_or_else(|| StartupError::ContextUnavailable("no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| StartupError::ContextUnavailable("unexpected context type".into()))?;

        let size = Vec2::new(canvas.client_width() as f32, canvas.client_height() as f32);
        let mut renderer = Self { canvas, ctx, size };
        renderer.resize(size, 1.0);
        Ok(renderer)
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Set the element's CSS box (layout size)
    pub fn set_css_size(&self, css_size: Vec2) {
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", css_size.x));
        let _ = style.set_property("height", &format!("{}px", css_size.y));
    }

    /// Match the backing store to `css_size * dpr` and draw in CSS pixels
    pub fn resize(&mut self, css_size: Vec2, dpr: f64) {
        self.size = css_size;
        self.canvas
            .set_width((f64::from(css_size.x) * dpr).round().max(1.0) as u32);
        self.canvas
            .set_height((f64::from(css_size.y) * dpr).round().max(1.0) as u32);
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    }
}

impl Renderer for CanvasRenderer {
    fn clear(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&css(color));
        self.ctx
            .fill_rect(0.0, 0.0, f64::from(self.size.x), f64::from(self.size.y));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ctx.set_fill_style_str(&css(color));
        self.ctx.fill_rect(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.w),
            f64::from(rect.h),
        );
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        self.ctx.set_stroke_style_str(&css(color));
        self.ctx.stroke_rect(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.w),
            f64::from(rect.h),
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ctx.set_fill_style_str(&css(color));
        self.ctx.begin_path();
        if self
            .ctx
            .arc(
                f64::from(center.x),
                f64::from(center.y),
                f64::from(radius),
                0.0,
                TAU,
            )
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color, align: TextAlign) {
        self.ctx.set_fill_style_str(&css(color));
        self.ctx
            .set_font(&format!("700 {size}px system-ui, sans-serif"));
        self.ctx.set_text_align(match align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        });
        let _ = self
            .ctx
            .fill_text(text, f64::from(pos.x), f64::from(pos.y));
    }
}
