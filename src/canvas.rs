use crate::constants::{clamp_device_pixel_ratio, fit_css_box, ACTIVE_CLASS};
use glam::Vec2;
use sonic_core::{Backdrop, BackingSize, Blend, DrawSurface, Rgba, Stroke, SurfaceMetrics, Viewport};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Canvas 2D drawing target.
pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: Option<web::CanvasRenderingContext2d>,
    backdrop: Backdrop,
}

impl CanvasSurface {
    pub fn new(canvas: web::HtmlCanvasElement, backdrop: Backdrop) -> Self {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<web::CanvasRenderingContext2d>().ok());
        if ctx.is_none() {
            log::warn!("canvas has no 2d context; nothing will be drawn on it");
        }
        Self {
            canvas,
            ctx,
            backdrop,
        }
    }

    pub fn canvas(&self) -> &web::HtmlCanvasElement {
        &self.canvas
    }
}

impl DrawSurface for CanvasSurface {
    fn measure(&self) -> Option<SurfaceMetrics> {
        let window = web::window()?;
        if !self.canvas.is_connected() {
            return None;
        }
        let rect = self.canvas.get_bounding_client_rect();
        let window_width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let strip = self.backdrop == Backdrop::Trail;
        let (css_width, css_height) = fit_css_box(strip, rect.width(), rect.height(), window_width);
        Some(SurfaceMetrics {
            css_width,
            css_height,
            device_pixel_ratio: clamp_device_pixel_ratio(window.device_pixel_ratio()),
        })
    }

    fn apply_size(&mut self, size: BackingSize, metrics: &SurfaceMetrics) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
        // Overlay boxes belong to the host's stylesheet. A strip is pinned to
        // the measured box; its width is re-read from the window next time.
        if self.backdrop == Backdrop::Trail {
            let style = self.canvas.style();
            _ = style.set_property("width", &format!("{}px", metrics.css_width));
            _ = style.set_property("height", &format!("{}px", metrics.css_height));
        }
        // resizing resets the context; draw in CSS px from here on
        let scale = metrics.device_pixel_ratio;
        if let Some(ctx) = &self.ctx {
            _ = ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0);
        }
    }

    fn backdrop(&self) -> Backdrop {
        self.backdrop
    }

    fn is_drawable(&self) -> bool {
        self.ctx.is_some() && self.canvas.is_connected()
    }

    fn clear(&mut self, viewport: Viewport) {
        if let Some(ctx) = &self.ctx {
            ctx.clear_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);
        }
    }

    #[allow(deprecated)]
    fn fill(&mut self, viewport: Viewport, color: Rgba) {
        if let Some(ctx) = &self.ctx {
            _ = ctx.set_global_composite_operation("source-over");
            ctx.set_fill_style(&JsValue::from_str(&color.to_string()));
            ctx.fill_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);
        }
    }

    #[allow(deprecated)]
    fn stroke(&mut self, path: &[Vec2], stroke: &Stroke) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        let Some((first, rest)) = path.split_first() else {
            return;
        };

        ctx.save();
        let gradient = ctx.create_linear_gradient(0.0, 0.0, stroke.gradient_width as f64, 0.0);
        for (offset, color) in stroke.gradient.iter() {
            _ = gradient.add_color_stop(*offset, &color.to_string());
        }
        let blend = match stroke.blend {
            Blend::SourceOver => "source-over",
            Blend::Lighter => "lighter",
        };
        _ = ctx.set_global_composite_operation(blend);
        ctx.set_stroke_style(gradient.as_ref());
        ctx.set_line_width(stroke.width as f64);
        ctx.set_line_join("round");
        ctx.set_line_cap("round");
        ctx.set_global_alpha(stroke.alpha as f64);
        ctx.set_shadow_blur(stroke.glow_blur as f64);
        ctx.set_shadow_color(&stroke.glow_color.to_string());

        ctx.begin_path();
        ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            ctx.line_to(p.x as f64, p.y as f64);
        }
        ctx.stroke();
        ctx.restore();
    }

    fn set_active(&mut self, active: bool) {
        let classes = self.canvas.class_list();
        _ = if active {
            classes.add_1(ACTIVE_CLASS)
        } else {
            classes.remove_1(ACTIVE_CLASS)
        };
    }
}
