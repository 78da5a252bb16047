use std::{error, fmt::Display, io, path::PathBuf};

use clap::Parser;

pub mod bmp;
pub mod color;
pub mod extract;
pub mod heatmap;
pub mod point;
pub mod score;

pub use color::{PaletteKind, QuartileMode};
pub use extract::read_points;
pub use heatmap::Heatmap;
pub use point::{Bounds, Point3, POINT_WIDTH};

#[derive(Debug)]
pub enum Error {
    InputIOError(PathBuf, io::Error),
    NoPositionInFile(PathBuf),
    NoPositionFound,
    NoPositionInBounds(Point3, Point3),
    InvalidBounds(Point3, Point3),
    BoundsOverflow(Point3, Point3),
    GridTooLarge(i128, i128),
    PixelDataSizeMismatch(usize, usize),
    OutputIOError(PathBuf, io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InputIOError(path, ioe) => {
                write!(f, "Failed to read input file({}): {}", path.display(), ioe)
            }
            Error::NoPositionInFile(path) => write!(
                f,
                "No setpos command found in given file({}), nothing to draw",
                path.display()
            ),
            Error::NoPositionFound => write!(f, "No position given, nothing to draw"),
            Error::NoPositionInBounds(min, max) => write!(
                f,
                "No position lies inside the bounds {} - {}, nothing to draw",
                min, max
            ),
            Error::InvalidBounds(min, max) => write!(
                f,
                "Invalid bounds, minimum {} exceeds maximum {} on some axis",
                min, max
            ),
            Error::BoundsOverflow(min, max) => write!(
                f,
                "Padding bounds {} - {} leaves the coordinate range",
                min, max
            ),
            Error::GridTooLarge(width, height) => write!(
                f,
                "Heatmap of {} x {} cells is too large for a bitmap",
                width, height
            ),
            Error::PixelDataSizeMismatch(expect, actual) => write!(
                f,
                "Expect {} bytes of pixel data, but given {}",
                expect, actual
            ),
            Error::OutputIOError(path, ioe) => {
                write!(f, "Failed to write output file({}): {}", path.display(), ioe)
            }
        }
    }
}

impl error::Error for Error {}

/// Render a heatmap bitmap from a log of setpos console commands.
#[derive(Debug, Parser)]
#[command(name = "pos2bmp")]
pub struct CLIArgs {
    /// Text file containing setpos commands
    pub input_path: PathBuf,
    /// Bitmap file to create or overwrite
    pub output_path: PathBuf,
    /// Color mapping for scores
    #[arg(short, long, value_enum, default_value_t)]
    pub palette: PaletteKind,
    /// Score the palette saturates at, relative to the max score
    #[arg(short, long, value_enum, default_value_t)]
    pub quartiles: QuartileMode,
    /// Fixed lower map bounds instead of the smallest coordinates in the file
    #[arg(
        long,
        num_args = 3,
        value_names = ["X", "Y", "Z"],
        allow_negative_numbers = true,
        action = clap::ArgAction::Set
    )]
    pub min: Option<Vec<i64>>,
    /// Fixed upper map bounds instead of the largest coordinates in the file
    #[arg(
        long,
        num_args = 3,
        value_names = ["X", "Y", "Z"],
        allow_negative_numbers = true,
        action = clap::ArgAction::Set
    )]
    pub max: Option<Vec<i64>>,
    /// More log output on stderr, repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CLIArgs {
    pub fn fixed_min(&self) -> Option<Point3> {
        Self::to_point(self.min.as_deref())
    }

    pub fn fixed_max(&self) -> Option<Point3> {
        Self::to_point(self.max.as_deref())
    }

    fn to_point(coords: Option<&[i64]>) -> Option<Point3> {
        coords
            .and_then(|c| <[i64; 3]>::try_from(c).ok())
            .map(Point3::from)
    }
}
