/// Canvas dimensions in canvas pixels and the geometry derived from them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    width: f64,
    height: f64,
}

impl Layout {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Side length shared by every square of a round.
    pub fn square_size(&self) -> f64 {
        (self.width / 4.0).min(self.height / 8.0)
    }

    /// Map a pointer position inside the element's CSS box onto canvas pixels.
    /// The canvas backing store may be larger or smaller than its displayed size.
    pub fn to_canvas(
        &self,
        offset_x: f64,
        offset_y: f64,
        css_width: f64,
        css_height: f64,
    ) -> (f64, f64) {
        let sx = if css_width > 0.0 { self.width / css_width } else { 1.0 };
        let sy = if css_height > 0.0 { self.height / css_height } else { 1.0 };
        (offset_x * sx, offset_y * sy)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(480.0, 640.0)
    }
}
