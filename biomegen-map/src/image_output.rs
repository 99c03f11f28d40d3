//! Stage 6: writing the finished RGB buffer as a png file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::MapError;
use crate::progress::{MapSection, Progress};

/// Streams the RGB buffer into a png file, one row at a time.
///
/// The image is 8-bit RGB without interlacing, with the encoder's default
/// filter and compression. Progress ticks per row written.
pub fn save_png(path: &Path, width: usize, height: usize, rgb: &[u8],
                progress: &Progress) -> Result<(), MapError> {

    progress.set_total(MapSection::SavingImage, height as u64);

    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width as u32, height as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;

    let mut stream = writer.stream_writer()?;
    for row in rgb.chunks(width * 3) {
        stream.write_all(row)?;
        progress.add(MapSection::SavingImage, 1);
    }
    stream.finish()?;

    Ok(())
}
