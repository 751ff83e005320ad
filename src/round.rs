//! Round generation: two distinct target colors at the bottom of the canvas and
//! one falling square whose color matches exactly one of them.

use rand::Rng;

use crate::GameError;
use crate::layout::Layout;

/// 24-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const fn rgb(hex: u32) -> Self {
        Self(hex & 0x00FF_FFFF)
    }

    /// `#RRGGBB` form accepted by canvas fill styles.
    pub fn css(&self) -> String {
        format!("#{:06X}", self.0)
    }
}

pub const DEFAULT_COLORS: [Color; 10] = [
    Color::rgb(0xFF0000), // red
    Color::rgb(0x00FF00), // lime
    Color::rgb(0x0000FF), // blue
    Color::rgb(0xFFFF00), // yellow
    Color::rgb(0xFF00FF), // magenta
    Color::rgb(0x00FFFF), // cyan
    Color::rgb(0xFFA500), // orange
    Color::rgb(0x800080), // purple
    Color::rgb(0x008000), // green
    Color::rgb(0xFFC0CB), // pink
];

/// Ordered set of at least two distinct colors.
///
/// The two-distinct-colors requirement is checked here once, so picking a
/// pair of different target colors can always terminate.
#[derive(Clone, Debug)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: &[Color]) -> Result<Self, GameError> {
        let mut distinct: Vec<Color> = Vec::with_capacity(colors.len());
        for c in colors {
            if !distinct.contains(c) {
                distinct.push(*c);
            }
        }
        if distinct.len() < 2 {
            return Err(GameError::DegeneratePalette {
                distinct: distinct.len(),
            });
        }
        Ok(Self { colors: distinct })
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        self.colors[rng.gen_range(0..self.colors.len())]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.to_vec(),
        }
    }
}

/// A square's top-left corner and fill color. Side length lives on the [`Round`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Square {
    pub x: f64,
    pub y: f64,
    pub color: Color,
}

impl Square {
    /// Inclusive axis-aligned containment test.
    pub fn contains(&self, size: f64, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + size && py >= self.y && py <= self.y + size
    }
}

/// One falling square plus the two bottom targets.
#[derive(Clone, Debug, PartialEq)]
pub struct Round {
    pub falling: Square,
    pub targets: [Square; 2],
    pub size: f64,
    /// Falling y at which the round counts as missed.
    pub floor_y: f64,
}

impl Round {
    /// Index of the first target containing the point.
    pub fn target_at(&self, px: f64, py: f64) -> Option<usize> {
        self.targets
            .iter()
            .position(|t| t.contains(self.size, px, py))
    }

    pub fn is_correct(&self, target: usize) -> bool {
        self.targets
            .get(target)
            .is_some_and(|t| t.color == self.falling.color)
    }

    pub fn has_landed(&self) -> bool {
        self.falling.y >= self.floor_y
    }
}

pub fn new_round<R: Rng + ?Sized>(layout: &Layout, palette: &Palette, rng: &mut R) -> Round {
    let color1 = palette.pick(rng);
    let mut color2 = palette.pick(rng);
    while color2 == color1 {
        color2 = palette.pick(rng);
    }

    let size = layout.square_size();
    let (w, h) = (layout.width(), layout.height());
    let floor_y = h - size * 1.5;

    let targets = [
        Square {
            x: w * 0.25 - size / 2.0,
            y: floor_y,
            color: color1,
        },
        Square {
            x: w * 0.75 - size / 2.0,
            y: floor_y,
            color: color2,
        },
    ];
    let falling = Square {
        x: w / 2.0 - size / 2.0,
        y: 0.0,
        color: if rng.gen_bool(0.5) { color1 } else { color2 },
    };

    Round {
        falling,
        targets,
        size,
        floor_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn layout() -> Layout {
        Layout::new(400.0, 800.0)
    }

    #[test]
    fn test_color_css() {
        assert_eq!(Color::rgb(0xFFA500).css(), "#FFA500");
        assert_eq!(Color::rgb(0x0000FF).css(), "#0000FF");
    }

    #[test]
    fn test_palette_rejects_degenerate() {
        assert!(matches!(
            Palette::new(&[]),
            Err(GameError::DegeneratePalette { distinct: 0 })
        ));
        let red = Color::rgb(0xFF0000);
        assert!(matches!(
            Palette::new(&[red, red, red]),
            Err(GameError::DegeneratePalette { distinct: 1 })
        ));
        let p = Palette::new(&[red, Color::rgb(0x00FF00), red]).unwrap();
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_round_color_invariant() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let palette = Palette::default();
        for _ in 0..500 {
            let r = new_round(&layout(), &palette, &mut rng);
            assert_ne!(r.targets[0].color, r.targets[1].color);
            let matches = r
                .targets
                .iter()
                .filter(|t| t.color == r.falling.color)
                .count();
            assert_eq!(matches, 1);
        }
    }

    #[test]
    fn test_two_color_palette_terminates() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let palette = Palette::new(&[Color::rgb(0x111111), Color::rgb(0x222222)]).unwrap();
        for _ in 0..100 {
            let r = new_round(&layout(), &palette, &mut rng);
            assert_ne!(r.targets[0].color, r.targets[1].color);
        }
    }

    #[test]
    fn test_round_geometry() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // 400x800 -> size = min(100, 100) = 100
        let r = new_round(&layout(), &Palette::default(), &mut rng);
        assert_eq!(r.size, 100.0);
        assert_eq!(r.floor_y, 650.0);
        assert_eq!(r.targets[0].x, 50.0);
        assert_eq!(r.targets[1].x, 250.0);
        assert_eq!(r.targets[0].y, 650.0);
        assert_eq!(r.falling.x, 150.0);
        assert_eq!(r.falling.y, 0.0);
    }

    #[test]
    fn test_target_at_edges_and_gaps() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let r = new_round(&layout(), &Palette::default(), &mut rng);
        assert_eq!(r.target_at(50.0, 650.0), Some(0));
        assert_eq!(r.target_at(150.0, 750.0), Some(0));
        assert_eq!(r.target_at(300.0, 700.0), Some(1));
        assert_eq!(r.target_at(200.0, 700.0), None);
        assert_eq!(r.target_at(100.0, 10.0), None);
    }

    #[test]
    fn test_same_seed_same_rounds() {
        let palette = Palette::default();
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..20 {
            assert_eq!(
                new_round(&layout(), &palette, &mut a),
                new_round(&layout(), &palette, &mut b)
            );
        }
    }
}
