//! Rendering grids to 8-bit images

use crate::error::{Result, ViirsError};
use crate::grid::{percentile, Grid, MaskedGrid};
use image::{imageops, Rgb, RgbImage};
use std::path::Path;
use tracing::debug;

/// Percentiles used as the contrast stretch input range
pub const STRETCH_PERCENTILES: (f64, f64) = (2.0, 98.0);

pub const GAMMA: f64 = 0.5;

/// Index maps saturate outside this range
pub const INDEX_VMIN: f64 = 0.1;
pub const INDEX_VMAX: f64 = 0.9;

/// Pixels between panels in a side-by-side figure
pub const PANEL_GUTTER: u32 = 16;

/// Anchors of the sequential yellow-green colormap, low to high
const YLGN: [[u8; 3]; 9] = [
    [0xff, 0xff, 0xe5],
    [0xf7, 0xfc, 0xb9],
    [0xd9, 0xf0, 0xa3],
    [0xad, 0xdd, 0x8e],
    [0x78, 0xc6, 0x79],
    [0x41, 0xab, 0x5d],
    [0x23, 0x84, 0x43],
    [0x00, 0x68, 0x37],
    [0x00, 0x45, 0x29],
];

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

fn to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn dimensions(shape: (usize, usize)) -> Result<(u32, u32)> {
    let (rows, cols) = shape;
    if rows == 0 || cols == 0 {
        return Err(ViirsError::EmptyData);
    }
    let height = u32::try_from(rows).map_err(|_| ViirsError::EmptyData)?;
    let width = u32::try_from(cols).map_err(|_| ViirsError::EmptyData)?;
    Ok((width, height))
}

/// Linear stretch of `v` from `[lo, hi]` onto `[0, 1]`, clipped
pub fn stretch(v: f64, lo: f64, hi: f64) -> f64 {
    if hi <= lo {
        return 0.0;
    }
    ((v - lo) / (hi - lo)).clamp(0.0, 1.0)
}

pub fn gamma(v: f64, g: f64) -> f64 {
    v.max(0.0).powf(g)
}

/// Natural colour composite from red, green and blue reflectance
///
/// The stretch range comes from the 2nd and 98th percentiles over all
/// three bands together.
pub fn natural_color(red: &Grid<f64>, green: &Grid<f64>, blue: &Grid<f64>) -> Result<RgbImage> {
    green.ensure_shape(red.shape())?;
    blue.ensure_shape(red.shape())?;
    let (width, height) = dimensions(red.shape())?;

    let stacked = red
        .data()
        .iter()
        .chain(green.data())
        .chain(blue.data())
        .copied();
    let (p_lo, p_hi) = STRETCH_PERCENTILES;
    let lo = percentile(stacked.clone(), p_lo).ok_or(ViirsError::EmptyData)?;
    let hi = percentile(stacked, p_hi).ok_or(ViirsError::EmptyData)?;
    debug!("RGB stretch range [{:.4}, {:.4}]", lo, hi);

    let channel = |v: f64| to_u8(gamma(stretch(v, lo, hi), GAMMA));
    let cols = red.cols();

    Ok(RgbImage::from_fn(width, height, |x, y| {
        let i = y as usize * cols + x as usize;
        Rgb([
            channel(red.data()[i]),
            channel(green.data()[i]),
            channel(blue.data()[i]),
        ])
    }))
}

/// YlGn colour for a position in `[0, 1]`
pub fn ylgn(t: f64) -> Rgb<u8> {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (YLGN.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(YLGN.len() - 1);
    let upper = (lower + 1).min(YLGN.len() - 1);
    let w = scaled - lower as f64;

    let mut px = [0u8; 3];
    for (c, out) in px.iter_mut().enumerate() {
        let a = f64::from(YLGN[lower][c]);
        let b = f64::from(YLGN[upper][c]);
        *out = (a + (b - a) * w).round() as u8;
    }
    Rgb(px)
}

/// Colour-mapped index image; masked cells are black
pub fn index_image(index: &MaskedGrid) -> Result<RgbImage> {
    let (width, height) = dimensions(index.shape())?;
    Ok(RgbImage::from_fn(width, height, |x, y| {
        match index.get(y as usize, x as usize) {
            Some(v) => ylgn(stretch(v, INDEX_VMIN, INDEX_VMAX)),
            None => BLACK,
        }
    }))
}

/// Panels laid out left to right on a black canvas
pub fn side_by_side(panels: &[&RgbImage], gutter: u32) -> Result<RgbImage> {
    if panels.is_empty() {
        return Err(ViirsError::EmptyData);
    }
    let height = panels.iter().map(|p| p.height()).max().unwrap_or(0);
    let width = panels.iter().map(|p| p.width()).sum::<u32>()
        + gutter * (panels.len() as u32 + 1);

    let mut canvas = RgbImage::from_pixel(width, height + 2 * gutter, BLACK);
    let mut x = gutter;
    for panel in panels {
        imageops::replace(&mut canvas, *panel, i64::from(x), i64::from(gutter));
        x += panel.width() + gutter;
    }
    Ok(canvas)
}

/// Write an image, format chosen by extension
pub fn save(img: &RgbImage, path: &Path) -> Result<()> {
    img.save(path)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stretch_clips() {
        assert_eq!(stretch(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(stretch(2.0, 0.0, 1.0), 1.0);
        assert_eq!(stretch(0.25, 0.0, 0.5), 0.5);
        assert_eq!(stretch(0.3, 0.3, 0.3), 0.0);
    }

    #[test]
    fn test_gamma_brightens() {
        assert!((gamma(0.25, GAMMA) - 0.5).abs() < 1e-12);
        assert_eq!(gamma(1.0, GAMMA), 1.0);
    }

    #[test]
    fn test_ylgn_endpoints() {
        assert_eq!(ylgn(0.0), Rgb([0xff, 0xff, 0xe5]));
        assert_eq!(ylgn(1.0), Rgb([0x00, 0x45, 0x29]));
        assert_eq!(ylgn(f64::NAN), Rgb([0xff, 0xff, 0xe5]));
    }

    #[test]
    fn test_index_image_masked_black() {
        let mut grid = MaskedGrid::from_grid(Grid::new(1, 2, vec![0.9, 0.5]).unwrap());
        grid.mask_values(|v| v > 0.6);
        let img = index_image(&grid).unwrap();
        assert_eq!(*img.get_pixel(0, 0), Rgb([0x00, 0x45, 0x29]));
        assert_eq!(*img.get_pixel(1, 0), BLACK);
    }

    #[test]
    fn test_natural_color_stretches() {
        let red = Grid::new(1, 2, vec![0.0, 1.0]).unwrap();
        let img = natural_color(&red, &red, &red).unwrap();
        assert_eq!(*img.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(1, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_side_by_side_size() {
        let a = RgbImage::from_pixel(3, 2, Rgb([1, 2, 3]));
        let b = RgbImage::from_pixel(4, 5, Rgb([4, 5, 6]));
        let out = side_by_side(&[&a, &b], 2).unwrap();
        assert_eq!(out.dimensions(), (3 + 4 + 3 * 2, 5 + 4));
        assert_eq!(*out.get_pixel(2, 2), Rgb([1, 2, 3]));
        assert_eq!(*out.get_pixel(7, 2), Rgb([4, 5, 6]));
        assert_eq!(*out.get_pixel(0, 0), BLACK);
    }

    #[test]
    fn test_empty_grid_rejected() {
        let empty = Grid::<f64>::new(0, 0, vec![]).unwrap();
        assert!(matches!(
            natural_color(&empty, &empty, &empty),
            Err(ViirsError::EmptyData)
        ));
    }
}
