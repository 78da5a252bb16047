use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::Error;

const FILE_HEADER_SIZE: u32 = 14;
const INFO_HEADER_SIZE: u32 = 40;
const PIXEL_OFFSET: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
const BITS_PER_PIXEL: u16 = 24;
// 72 DPI in pixels per metre.
const RESOLUTION: u32 = 2835;

pub fn pixel_array_size(width: u32, height: u32) -> u64 {
    let row_words = (u64::from(BITS_PER_PIXEL) * u64::from(width)).div_ceil(32);
    row_words * 4 * u64::from(height)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmpHeader {
    width: u32,
    height: u32,
    image_size: u32,
}

impl BmpHeader {
    pub fn new(width: u32, height: u32) -> Result<Self, Error> {
        let image_size = pixel_array_size(width, height);
        let file_size = image_size + u64::from(PIXEL_OFFSET);
        if i32::try_from(width).is_err()
            || i32::try_from(height).is_err()
            || u32::try_from(file_size).is_err()
        {
            return Err(Error::GridTooLarge(width.into(), height.into()));
        }

        Ok(Self {
            width,
            height,
            image_size: image_size as u32,
        })
    }

    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    pub fn file_size(&self) -> u32 {
        PIXEL_OFFSET + self.image_size
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        // File header
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&self.file_size().to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&PIXEL_OFFSET.to_le_bytes());

        // Info header
        out.extend_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&BITS_PER_PIXEL.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&self.image_size.to_le_bytes());
        out.extend_from_slice(&RESOLUTION.to_le_bytes());
        out.extend_from_slice(&RESOLUTION.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
    }
}

pub fn encode(width: u32, height: u32, pixels: &[u8]) -> Result<Vec<u8>, Error> {
    let header = BmpHeader::new(width, height)?;
    if pixels.len() as u64 != u64::from(header.image_size()) {
        return Err(Error::PixelDataSizeMismatch(
            header.image_size() as usize,
            pixels.len(),
        ));
    }

    let mut bytes = Vec::with_capacity(header.file_size() as usize);
    header.write_to(&mut bytes);
    bytes.extend_from_slice(pixels);
    debug_assert_eq!(bytes.len(), header.file_size() as usize);

    Ok(bytes)
}

fn temp_path_for(path: &Path) -> io::Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(ErrorKind::InvalidInput, "output path has no file name")
    })?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(name);
    tmp_name.push(".tmp");

    Ok(path.with_file_name(tmp_name))
}

// Writes beside the target then renames, so a failure never leaves a
// half-written bitmap at `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = temp_path_for(path)?;
    fs::write(&tmp, bytes)
        .and_then(|_| fs::rename(&tmp, path))
        .inspect_err(|_| {
            let _ = fs::remove_file(&tmp);
        })
}

pub fn write_bmp<P: AsRef<Path>>(
    path: P,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<usize, Error> {
    let path = path.as_ref();
    let bytes = encode(width, height, pixels)?;
    write_atomic(path, &bytes).map_err(|e| Error::OutputIOError(path.to_path_buf(), e))?;
    debug!(path = %path.display(), bytes = bytes.len(), "bitmap written");

    Ok(bytes.len())
}
