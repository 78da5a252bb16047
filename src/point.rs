use std::fmt::Display;

/// Radius of influence of a single point, in grid cells (Chebyshev distance).
pub const POINT_WIDTH: i64 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point3 {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Point3 {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    fn component_min(&self, other: &Point3) -> Self {
        Point3::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    fn component_max(&self, other: &Point3) -> Self {
        Point3::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    fn checked_offset(&self, delta: i64) -> Option<Self> {
        Some(Point3::new(
            self.x.checked_add(delta)?,
            self.y.checked_add(delta)?,
            self.z.checked_add(delta)?,
        ))
    }

    fn all_le(&self, other: &Point3) -> bool {
        self.x <= other.x && self.y <= other.y && self.z <= other.z
    }
}

impl From<[i64; 3]> for Point3 {
    fn from(value: [i64; 3]) -> Self {
        Point3::new(value[0], value[1], value[2])
    }
}

impl Display for Point3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    min: Point3,
    max: Point3,
}

impl Bounds {
    /// Returns `None` when `min` exceeds `max` on any axis.
    pub fn new(min: Point3, max: Point3) -> Option<Self> {
        if min.all_le(&max) {
            Some(Self { min, max })
        } else {
            None
        }
    }

    /// Component-wise min and max over all points, `None` for an empty set.
    pub fn of_points(points: &[Point3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest.iter().fold((*first, *first), |(min, max), p| {
            (min.component_min(p), max.component_max(p))
        });

        Some(Self { min, max })
    }

    /// Widens the bounds by `POINT_WIDTH` on every axis, `None` if that leaves
    /// the `i64` range.
    pub fn padded(&self) -> Option<Self> {
        Some(Self {
            min: self.min.checked_offset(-POINT_WIDTH)?,
            max: self.max.checked_offset(POINT_WIDTH)?,
        })
    }

    pub fn contains(&self, p: &Point3) -> bool {
        self.min.all_le(p) && p.all_le(&self.max)
    }

    pub fn min(&self) -> &Point3 {
        &self.min
    }

    pub fn max(&self) -> &Point3 {
        &self.max
    }

    // Widened so extreme coordinates can't overflow.
    pub fn width(&self) -> i128 {
        i128::from(self.max.x) - i128::from(self.min.x) + 1
    }

    pub fn height(&self) -> i128 {
        i128::from(self.max.y) - i128::from(self.min.y) + 1
    }
}
