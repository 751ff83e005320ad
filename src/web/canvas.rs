use web_sys::CanvasRenderingContext2d;

use crate::round::Color;
use crate::surface::Surface;

/// 2D canvas backed [`Surface`].
pub(crate) struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub(crate) fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_square(&mut self, x: f64, y: f64, size: f64, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill_rect(x, y, size, size);
    }

    fn stroke_square(&mut self, x: f64, y: f64, size: f64) {
        self.ctx.set_stroke_style_str("#000");
        self.ctx.set_line_width(1.0);
        self.ctx.stroke_rect(x, y, size, size);
    }
}
