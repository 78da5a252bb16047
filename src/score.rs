use tracing::{debug, warn};

use crate::{
    bmp::BmpHeader,
    point::{Bounds, Point3, POINT_WIDTH},
    Error,
};

// Rows index y, columns index x, both relative to the padded minimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreGrid {
    origin: Point3,
    width: usize,
    height: usize,
    cells: Vec<u64>,
    max_score: u64,
}

impl ScoreGrid {
    pub fn new(bounds: &Bounds) -> Result<Self, Error> {
        let (width, height) = (bounds.width(), bounds.height());
        let too_large = || Error::GridTooLarge(width, height);
        let w = u32::try_from(width).map_err(|_| too_large())?;
        let h = u32::try_from(height).map_err(|_| too_large())?;
        // Nothing gets allocated for a grid the bitmap couldn't hold.
        BmpHeader::new(w, h)?;
        let cell_count = (w as usize).checked_mul(h as usize).ok_or_else(too_large)?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(cell_count)
            .map_err(|_| too_large())?;
        cells.resize(cell_count, 0);

        debug!(width = w, height = h, "allocated score grid");
        Ok(Self {
            origin: *bounds.min(),
            width: w as usize,
            height: h as usize,
            cells,
            max_score: 0,
        })
    }

    pub fn build(points: &[Point3], bounds: &Bounds) -> Result<Self, Error> {
        let mut grid = ScoreGrid::new(bounds)?;
        for p in points {
            if !grid.add_point(p) {
                warn!(point = %p, "point's influence falls outside the grid, skipped");
            }
        }

        debug!(max_score = grid.max_score, "score grid built");
        Ok(grid)
    }

    /// Adds `POINT_WIDTH` on the cell of `p`, one less per step of Chebyshev
    /// distance. False, with the grid untouched, when the pyramid won't fit.
    pub fn add_point(&mut self, p: &Point3) -> bool {
        let reach = POINT_WIDTH - 1;
        let (col, row) = match self.cell_of(p) {
            Some(cell) => cell,
            None => return false,
        };
        if col < reach as usize
            || row < reach as usize
            || col + reach as usize >= self.width
            || row + reach as usize >= self.height
        {
            return false;
        }

        for dy in -reach..=reach {
            let r = (row as i64 + dy) as usize;
            for dx in -reach..=reach {
                let c = (col as i64 + dx) as usize;
                let score = (POINT_WIDTH - dx.abs().max(dy.abs())) as u64;
                let cell = &mut self.cells[r * self.width + c];
                *cell += score;
                if *cell > self.max_score {
                    self.max_score = *cell;
                }
            }
        }

        true
    }

    fn cell_of(&self, p: &Point3) -> Option<(usize, usize)> {
        let col = usize::try_from(p.x.checked_sub(self.origin.x)?).ok()?;
        let row = usize::try_from(p.y.checked_sub(self.origin.y)?).ok()?;
        if col < self.width && row < self.height {
            Some((col, row))
        } else {
            None
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_score(&self) -> u64 {
        self.max_score
    }

    #[cfg(test)]
    pub(crate) fn get(&self, row: usize, col: usize) -> Option<u64> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    #[cfg(test)]
    pub(crate) fn row(&self, row: usize) -> Option<&[u64]> {
        self.cells.chunks(self.width).nth(row)
    }

    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[u64]> + '_ {
        self.cells.chunks(self.width)
    }
}
