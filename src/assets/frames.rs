//! Decoding sprite files into terminal-cell frames.
//!
//! Each cell shows two vertically stacked pixels using half-block glyphs:
//! the upper pixel as foreground of `▀`, the lower one as its background.
//! Transparent pixels leave the canvas underneath visible.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::imageops::FilterType;
use image::{AnimationDecoder, ImageFormat, Rgba, RgbaImage};
use log::debug;

use crate::error::DecodeError;
use crate::types::{Cell, Color, Image, Size, Style};

const UPPER_HALF: char = '▀';
const LOWER_HALF: char = '▄';
const ALPHA_CUTOFF: u8 = 128;

/// Decode every frame of `path`, scaled down to fit `max` cells.
///
/// GIFs yield all of their (fully composited) frames; any other supported
/// raster format yields a single frame.
pub fn decode_frames(path: &Path, max: Size) -> Result<Vec<Image>, DecodeError> {
    let file = File::open(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let image_err = |source| DecodeError::Image {
        path: path.to_path_buf(),
        source,
    };

    let is_gif = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gif"));

    let buffers: Vec<RgbaImage> = if is_gif {
        let decoder = GifDecoder::new(reader).map_err(image_err)?;
        decoder
            .into_frames()
            .collect_frames()
            .map_err(image_err)?
            .into_iter()
            .map(|frame| frame.into_buffer())
            .collect()
    } else {
        let format = ImageFormat::from_path(path).map_err(image_err)?;
        vec![image::load(reader, format).map_err(image_err)?.to_rgba8()]
    };

    if buffers.is_empty() {
        return Err(DecodeError::Empty {
            path: path.to_path_buf(),
        });
    }

    let frames: Vec<Image> = buffers.iter().map(|buf| to_cells(buf, max)).collect();
    debug!(
        "decoded {} frame(s) from {} at {}x{} cells",
        frames.len(),
        path.display(),
        frames[0].width(),
        frames[0].height()
    );
    Ok(frames)
}

/// Target pixel size: fit inside `max` cells (two pixel rows per cell),
/// keep the aspect ratio, never upscale.
fn fit(width: u32, height: u32, max: Size) -> (u32, u32) {
    let max_w = max.width.max(1) as f64;
    let max_h = (max.height.max(1) as f64) * 2.0;
    let scale = (max_w / width as f64).min(max_h / height as f64).min(1.0);
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

fn to_cells(buf: &RgbaImage, max: Size) -> Image {
    let (w, h) = fit(buf.width(), buf.height(), max);
    let scaled = if (w, h) == buf.dimensions() {
        buf.clone()
    } else {
        image::imageops::resize(buf, w, h, FilterType::Nearest)
    };

    let rows = h.div_ceil(2);
    let mut cells = Vec::with_capacity((w * rows) as usize);
    for row in 0..rows {
        for x in 0..w {
            let top = opaque(scaled.get_pixel(x, row * 2));
            let bottom = (row * 2 + 1 < h)
                .then(|| opaque(scaled.get_pixel(x, row * 2 + 1)))
                .flatten();
            cells.push(half_block(top, bottom));
        }
    }

    // Dimensions come from the loop above, so the count always matches.
    Image::from_cells(w as u16, rows as u16, cells)
        .unwrap_or_else(|| Image::filled(w as u16, rows as u16, ' '))
}

fn opaque(px: &Rgba<u8>) -> Option<Color> {
    let [r, g, b, a] = px.0;
    (a >= ALPHA_CUTOFF).then_some(Color::Rgb { r, g, b })
}

fn half_block(top: Option<Color>, bottom: Option<Color>) -> Option<Cell> {
    let (ch, fg, bg) = match (top, bottom) {
        (None, None) => return None,
        (Some(t), b) => (UPPER_HALF, Some(t), b),
        (None, Some(b)) => (LOWER_HALF, Some(b), None),
    };
    Some(Cell {
        ch,
        style: Style {
            fg,
            bg,
            ..Default::default()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::Frame;

    const BIG: Size = Size { width: 80, height: 40 };

    fn write_gif(path: &Path, count: u8) {
        let file = File::create(path).unwrap();
        let mut encoder = GifEncoder::new(file);
        let frames = (0..count).map(|i| {
            Frame::new(RgbaImage::from_pixel(4, 4, Rgba([i * 60, 200, 10, 255])))
        });
        encoder.encode_frames(frames).unwrap();
    }

    #[test]
    fn gif_yields_every_frame_as_half_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walk.gif");
        write_gif(&path, 3);

        let frames = decode_frames(&path, BIG).unwrap();

        assert_eq!(frames.len(), 3);
        for frame in &frames {
            assert_eq!((frame.width(), frame.height()), (4, 2));
            assert_eq!(frame.cell(0, 0).map(|c| c.ch), Some(UPPER_HALF));
        }
    }

    #[test]
    fn still_image_yields_one_frame_with_transparency() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("still.png");
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        img.put_pixel(0, 1, Rgba([255, 0, 0, 255]));
        img.save(&path).unwrap();

        let frames = decode_frames(&path, BIG).unwrap();

        assert_eq!(frames.len(), 1);
        let frame = &frames[0];
        assert_eq!((frame.width(), frame.height()), (2, 1));
        let cell = frame.cell(0, 0).unwrap();
        assert_eq!(cell.ch, LOWER_HALF);
        assert_eq!(cell.style.fg, Some(Color::Rgb { r: 255, g: 0, b: 0 }));
        assert!(frame.cell(1, 0).is_none());
    }

    #[test]
    fn large_images_are_scaled_to_fit() {
        assert_eq!(fit(200, 100, Size { width: 50, height: 50 }), (50, 25));
        assert_eq!(fit(10, 100, Size { width: 50, height: 10 }), (2, 20));
        assert_eq!(fit(8, 8, Size { width: 50, height: 50 }), (8, 8));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = decode_frames(Path::new("/no/such/anim.gif"), BIG).unwrap_err();
        assert!(matches!(err, DecodeError::Io { .. }));
    }

    #[test]
    fn garbage_gif_is_an_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.gif");
        std::fs::write(&path, b"not a gif at all").unwrap();

        let err = decode_frames(&path, BIG).unwrap_err();
        assert!(matches!(err, DecodeError::Image { .. }));
    }
}
