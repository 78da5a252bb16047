use std::path::Path;

use tracing::{info, warn};

use crate::{
    bmp,
    color::{pixel_buffer, PaletteKind, QuartileMode},
    point::{Bounds, Point3},
    score::ScoreGrid,
    Error,
};

#[derive(Debug)]
pub struct Heatmap {
    bounds: Bounds,
    point_count: usize,
    grid: ScoreGrid,
}

impl Heatmap {
    /// Scores `points` over their own bounds, or over the fixed `min`/`max`
    /// where given. Points outside fixed bounds don't count.
    pub fn new(
        points: Vec<Point3>,
        fixed_min: Option<Point3>,
        fixed_max: Option<Point3>,
    ) -> Result<Self, Error> {
        let data_bounds = Bounds::of_points(&points).ok_or(Error::NoPositionFound)?;
        let min = fixed_min.unwrap_or(*data_bounds.min());
        let max = fixed_max.unwrap_or(*data_bounds.max());
        let bounds = Bounds::new(min, max).ok_or(Error::InvalidBounds(min, max))?;

        let total = points.len();
        let points = if fixed_min.is_some() || fixed_max.is_some() {
            let kept: Vec<_> = points.into_iter().filter(|p| bounds.contains(p)).collect();
            if kept.len() < total {
                warn!(
                    dropped = total - kept.len(),
                    "positions outside the fixed bounds {} - {} are ignored",
                    min,
                    max
                );
            }
            if kept.is_empty() {
                return Err(Error::NoPositionInBounds(min, max));
            }
            kept
        } else {
            points
        };

        info!(points = points.len(), min = %min, max = %max, "computing scores");
        let padded = bounds.padded().ok_or(Error::BoundsOverflow(min, max))?;
        let grid = ScoreGrid::build(&points, &padded)?;
        info!(
            width = grid.width(),
            height = grid.height(),
            max_score = grid.max_score(),
            "scores computed"
        );

        Ok(Self {
            bounds,
            point_count: points.len(),
            grid,
        })
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn max_score(&self) -> u64 {
        self.grid.max_score()
    }

    pub fn grid(&self) -> &ScoreGrid {
        &self.grid
    }

    pub fn width(&self) -> u32 {
        self.grid.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.grid.height() as u32
    }

    pub fn render(&self, kind: PaletteKind, mode: QuartileMode) -> Vec<u8> {
        let palette = kind.palette(self.grid.max_score(), mode);
        pixel_buffer(&self.grid, palette.as_ref())
    }

    pub fn save<P: AsRef<Path>>(
        &self,
        path: P,
        kind: PaletteKind,
        mode: QuartileMode,
    ) -> Result<usize, Error> {
        let pixels = self.render(kind, mode);
        bmp::write_bmp(path, self.width(), self.height(), &pixels)
    }
}
