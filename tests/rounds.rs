// Round generation invariants over the public API.

use color_squares::{Color, DEFAULT_COLORS, GameError, Layout, Palette, new_round};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn default_palette_matches_ten_distinct_colors() {
    let p = Palette::default();
    assert_eq!(p.len(), DEFAULT_COLORS.len());
    for (i, a) in p.colors().iter().enumerate() {
        for b in &p.colors()[i + 1..] {
            assert_ne!(a, b, "duplicate color {}", a.css());
        }
    }
}

#[test]
fn rounds_hold_color_invariant_across_layouts() {
    let palette = Palette::default();
    let mut rng = ChaCha8Rng::seed_from_u64(0xC0105);
    for (w, h) in [(320.0, 480.0), (1920.0, 1080.0), (100.0, 100.0)] {
        let layout = Layout::new(w, h);
        for _ in 0..200 {
            let r = new_round(&layout, &palette, &mut rng);
            let [left, right] = r.targets;
            assert_ne!(left.color, right.color);
            assert!(r.falling.color == left.color || r.falling.color == right.color);
            assert!(left.x + r.size < right.x, "targets overlap");
            assert_eq!(left.y, right.y);
            assert_eq!(r.falling.y, 0.0);
        }
    }
}

#[test]
fn both_target_sides_get_the_falling_color() {
    let palette = Palette::default();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let layout = Layout::new(400.0, 800.0);
    let mut left = 0;
    for _ in 0..400 {
        if new_round(&layout, &palette, &mut rng).is_correct(0) {
            left += 1;
        }
    }
    assert!((120..=280).contains(&left), "coin looks biased: {left}/400");
}

#[test]
fn single_color_palette_is_rejected() {
    let err = Palette::new(&[Color::rgb(0x123456)]).unwrap_err();
    assert_eq!(err, GameError::DegeneratePalette { distinct: 1 });
    assert!(err.to_string().contains("two distinct colors"));
}
