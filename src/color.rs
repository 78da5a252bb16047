use clap::ValueEnum;

use crate::score::ScoreGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const RED: Color = Color::new(255, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub fn gray(value: u8) -> Self {
        Self::new(value, value, value)
    }

    pub fn bgr(&self) -> [u8; 3] {
        [self.blue, self.green, self.red]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum QuartileMode {
    /// Saturate at `max_score / 4` with integer division, as older heatmaps did.
    #[default]
    Truncated,
    /// Spread the ramp over the whole `[0, max_score]` range.
    Exact,
}

impl QuartileMode {
    pub fn full_scale(&self, max_score: u64) -> u64 {
        match self {
            QuartileMode::Truncated => max_score / 4,
            QuartileMode::Exact => max_score,
        }
    }
}

pub trait Palette {
    fn color(&self, score: u64) -> Color;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PaletteKind {
    #[default]
    Hue,
    Grayscale,
}

impl PaletteKind {
    pub fn palette(&self, max_score: u64, mode: QuartileMode) -> Box<dyn Palette> {
        let full_scale = mode.full_scale(max_score);
        match self {
            PaletteKind::Hue => Box::new(HueRamp::new(full_scale)),
            PaletteKind::Grayscale => Box::new(Grayscale::new(full_scale)),
        }
    }
}

// Blue, cyan, green, yellow, red over four equal bands of `[0, full_scale]`.
#[derive(Debug, Clone, PartialEq)]
pub struct HueRamp {
    q1: f64,
    q2: f64,
    q3: f64,
    q4: f64,
}

impl HueRamp {
    pub fn new(full_scale: u64) -> Self {
        let s = full_scale as f64;
        Self {
            q1: s * 0.25,
            q2: s * 0.50,
            q3: s * 0.75,
            q4: s,
        }
    }
}

// Fraction of 255 left between `j` and the band's upper edge, truncated.
fn falling(j: f64, lo: f64, hi: f64) -> u8 {
    ((((hi - lo) - (j - lo)) / (hi - lo)) * 255.0) as u8
}

impl Palette for HueRamp {
    fn color(&self, score: u64) -> Color {
        if score == 0 {
            return Color::BLACK;
        }

        let j = score as f64;
        if j < self.q1 {
            Color::new(0, 255 - falling(j, 0.0, self.q1), 255)
        } else if j < self.q2 {
            Color::new(0, 255, falling(j, self.q1, self.q2))
        } else if j < self.q3 {
            Color::new(255 - falling(j, self.q2, self.q3), 255, 0)
        } else if j < self.q4 {
            Color::new(255, falling(j, self.q3, self.q4), 0)
        } else {
            Color::RED
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grayscale {
    full_scale: u64,
}

impl Grayscale {
    pub fn new(full_scale: u64) -> Self {
        Self { full_scale }
    }
}

impl Palette for Grayscale {
    fn color(&self, score: u64) -> Color {
        let value = match (score, self.full_scale) {
            (0, _) => 0,
            // Any heat at all saturates when the scale rounds down to zero.
            (_, 0) => 255,
            (j, full) => (255u128 * j as u128 / full as u128).min(255) as u8,
        };

        Color::gray(value)
    }
}

// Same as `width % 4` for 3-byte pixels.
pub fn row_padding(width: usize) -> usize {
    (4 - (3 * width) % 4) % 4
}

pub fn pixel_buffer(grid: &ScoreGrid, palette: &dyn Palette) -> Vec<u8> {
    let padding = row_padding(grid.width());
    let mut pixels = Vec::with_capacity((grid.width() * 3 + padding) * grid.height());
    for row in grid.rows().rev() {
        for &score in row {
            pixels.extend_from_slice(&palette.color(score).bgr());
        }
        pixels.resize(pixels.len() + padding, 0);
    }

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{Bounds, Point3};

    #[test]
    fn zero_score_is_black_everywhere() {
        for mode in [QuartileMode::Truncated, QuartileMode::Exact] {
            for kind in [PaletteKind::Hue, PaletteKind::Grayscale] {
                assert_eq!(kind.palette(100, mode).color(0), Color::BLACK);
                assert_eq!(kind.palette(0, mode).color(0), Color::BLACK);
            }
        }
    }

    #[test]
    fn max_score_is_red_on_the_hue_ramp() {
        for max in [1u64, 3, 25, 73, 1000] {
            for mode in [QuartileMode::Truncated, QuartileMode::Exact] {
                assert_eq!(PaletteKind::Hue.palette(max, mode).color(max), Color::RED);
            }
        }
    }

    #[test]
    fn hue_ramp_bands() {
        // Full scale 100: bands at 25, 50, 75, 100.
        let ramp = HueRamp::new(100);
        assert_eq!(ramp.color(1), Color::new(0, 11, 255));
        assert_eq!(ramp.color(24), Color::new(0, 245, 255));
        assert_eq!(ramp.color(25), Color::new(0, 255, 255));
        assert_eq!(ramp.color(30), Color::new(0, 255, 204));
        assert_eq!(ramp.color(50), Color::new(0, 255, 0));
        assert_eq!(ramp.color(60), Color::new(102, 255, 0));
        assert_eq!(ramp.color(75), Color::new(255, 255, 0));
        assert_eq!(ramp.color(80), Color::new(255, 204, 0));
        assert_eq!(ramp.color(99), Color::new(255, 10, 0));
        assert_eq!(ramp.color(100), Color::RED);
        assert_eq!(ramp.color(5000), Color::RED);
    }

    #[test]
    fn truncated_quartiles_saturate_early() {
        // 73 / 4 == 18, so everything from 18 up is already red.
        let palette = PaletteKind::Hue.palette(73, QuartileMode::Truncated);
        assert_eq!(palette.color(18), Color::RED);
        assert_eq!(palette.color(17), Color::new(255, 56, 0));

        let exact = PaletteKind::Hue.palette(73, QuartileMode::Exact);
        assert_ne!(exact.color(18), Color::RED);
    }

    #[test]
    fn tiny_max_scores_skip_empty_bands() {
        // Scale 1: q1..q3 are fractional, a score of 1 lands on q4.
        assert_eq!(HueRamp::new(1).color(1), Color::RED);
        // Scale 0: every non-zero score is past the last band.
        assert_eq!(HueRamp::new(0).color(1), Color::RED);
    }

    #[test]
    fn grayscale_clamps() {
        let gray = Grayscale::new(100);
        assert_eq!(gray.color(50), Color::gray(127));
        assert_eq!(gray.color(100), Color::gray(255));
        assert_eq!(gray.color(400), Color::gray(255));
        assert_eq!(Grayscale::new(0).color(2), Color::gray(255));
        assert_eq!(
            PaletteKind::Grayscale.palette(400, QuartileMode::Truncated).color(50),
            Color::gray(127)
        );
    }

    #[test]
    fn padding_matches_width_mod_four() {
        for width in 0..64 {
            assert_eq!(row_padding(width), width % 4);
            assert_eq!((3 * width + row_padding(width)) % 4, 0);
        }
    }

    #[test]
    fn pixel_rows_are_bottom_up_and_padded() {
        // A point at y = 0 and one at y = 30 give a 51 x 81 grid.
        let points = [Point3::new(0, 0, 0), Point3::new(0, 30, 0)];
        let bounds = Bounds::of_points(&points).unwrap().padded().unwrap();
        let grid = ScoreGrid::build(&points, &bounds).unwrap();
        assert_eq!((grid.width(), grid.height()), (51, 81));

        let palette = PaletteKind::Hue.palette(grid.max_score(), QuartileMode::Exact);
        let pixels = pixel_buffer(&grid, palette.as_ref());
        let stride = 51 * 3 + 3;
        assert_eq!(pixels.len(), stride * 81);

        // First emitted row is the last grid row, all zero scores.
        assert!(pixels[..stride].iter().all(|&b| b == 0));
        // Row for y = 30 (grid row 55) is emitted 26th; its peak is red.
        let peak = 25 * stride + 25 * 3;
        assert_eq!(&pixels[peak..peak + 3], &Color::RED.bgr());
        // Padding bytes trail each row.
        assert_eq!(&pixels[peak - 25 * 3 + 51 * 3..peak - 25 * 3 + stride], &[0, 0, 0]);
    }
}
