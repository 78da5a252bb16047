use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::{point::Point3, Error};

static SETPOS_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"setpos").unwrap());
static COORD_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^0-9-]*").unwrap());
static INT_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+").unwrap());

/// Parses the leading integer of `token`, or 0 when there isn't one.
///
/// Console logs print coordinates like `123.75` or `64.03;setang`, so only
/// the integer prefix is taken. Empty, non-numeric and out-of-range tokens
/// all become 0 rather than failing the whole file.
pub fn best_effort_int(token: &str) -> i64 {
    INT_PREFIX
        .find(token)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(0)
}

/// Extracts a point from one line, `None` if the line has no `setpos` marker.
pub fn parse_setpos(line: &str) -> Option<Point3> {
    if !SETPOS_MARKER.is_match(line) {
        return None;
    }

    let coords = COORD_START.replace(line, "");
    let mut tokens = coords.split_whitespace().map(best_effort_int);
    let mut next = || tokens.next().unwrap_or(0);
    let (x, y, z) = (next(), next(), next());

    Some(Point3::new(x, y, z))
}

pub fn parse_points<R: BufRead>(mut reader: R) -> io::Result<Vec<Point3>> {
    let mut points = Vec::new();
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        // Console dumps aren't always valid UTF-8, keep whatever is readable.
        let line = String::from_utf8_lossy(&buf);
        if let Some(p) = parse_setpos(&line) {
            trace!(line_no, point = %p, "parsed setpos");
            points.push(p);
        }
    }

    debug!(lines = line_no, points = points.len(), "finished reading positions");
    Ok(points)
}

pub fn read_points<P: AsRef<Path>>(path: P) -> Result<Vec<Point3>, Error> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::InputIOError(path.to_path_buf(), e))?;
    let points =
        parse_points(BufReader::new(file)).map_err(|e| Error::InputIOError(path.to_path_buf(), e))?;
    if points.is_empty() {
        Err(Error::NoPositionInFile(path.to_path_buf()))
    } else {
        Ok(points)
    }
}
