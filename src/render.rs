use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use rayon::prelude::*;
use thiserror::Error;

use crate::config::Params;
use crate::grid::Grid;
use crate::neighborhood::{COVERED, POSITIVE};

const EMPTY_COLOR: [u8; 4] = [24, 28, 36, 255];
const COVERED_COLOR: [u8; 4] = [70, 130, 180, 255];
const POSITIVE_COLOR: [u8; 4] = [235, 190, 60, 255];

#[inline]
fn cell_color(code: u8) -> [u8; 4] {
    match code {
        POSITIVE => POSITIVE_COLOR,
        COVERED => COVERED_COLOR,
        _ => EMPTY_COLOR,
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{width}x{height} grid at {cell_px} px per cell exceeds the {max_pixels} pixel limit")]
    TooLarge {
        height: usize,
        width: usize,
        cell_px: usize,
        max_pixels: usize,
    },
    #[error("png encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Rendered RGBA image, `w * h * 4` bytes.
pub struct Image {
    pub rgba: Vec<u8>,
    pub w: usize,
    pub h: usize,
}

/// Draw a coverage mask, `params.cell_px` pixels per cell. Grid row 0 lands on
/// the bottom pixel rows. Fails before allocating if the image would exceed
/// `params.max_pixels`.
pub fn render_coverage(mask: &Grid<u8>, params: &Params) -> Result<Image, RenderError> {
    let cell_px = params.cell_px.max(1);
    let too_large = || RenderError::TooLarge {
        height: mask.height(),
        width: mask.width(),
        cell_px,
        max_pixels: params.max_pixels,
    };
    let w = mask.width().checked_mul(cell_px).ok_or_else(too_large)?;
    let h = mask.height().checked_mul(cell_px).ok_or_else(too_large)?;
    let bytes = w
        .checked_mul(h)
        .filter(|&pixels| pixels <= params.max_pixels)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(too_large)?;

    let grid_rows: Vec<&[u8]> = mask.rows().collect();
    let mut rgba = vec![0u8; bytes];

    rgba.par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let codes = grid_rows[mask.height() - 1 - y / cell_px];
            for x in 0..w {
                let out = &mut row[x * 4..x * 4 + 4];
                out.copy_from_slice(&cell_color(codes[x / cell_px]));
            }
        });

    Ok(Image { rgba, w, h })
}

pub fn encode_png(img: &Image) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(
        &img.rgba,
        img.w as u32,
        img.h as u32,
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(buf)
}

pub fn data_url(img: &Image) -> Result<String, RenderError> {
    let b64 = base64::engine::general_purpose::STANDARD.encode(encode_png(img)?);
    Ok(format!("data:image/png;base64,{}", b64))
}
