//! Loading the tile atlas image for the native driver.

use log::{info, warn};
use tileterm_core::{AtlasGeometry, TileAtlas};

use crate::{AtlasSource, Error};

/// Decode the atlas named by `source` into tile pixels.
///
/// The decoded image may be larger than `geometry` needs; only the top-left
/// `num_tiles × tile_size` square is sampled.
pub fn load_atlas(source: &AtlasSource, geometry: AtlasGeometry) -> Result<TileAtlas, Error> {
    let image = match source {
        AtlasSource::File(path) => {
            info!("loading atlas {}", path.display());
            image::open(path)?
        }
        AtlasSource::Bytes(bytes) => image::load_from_memory(bytes)?,
        AtlasSource::Procedural => {
            warn!("no atlas image configured, using generated tiles");
            return Ok(TileAtlas::procedural(geometry));
        }
    };
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(TileAtlas::from_rgba(
        geometry,
        width as usize,
        height as usize,
        rgba.as_raw(),
    )?)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
        // Tile 1 of a 2x2 sheet of 2px tiles starts at (2, 0).
        img.put_pixel(2, 0, Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_png_bytes() {
        let geometry = AtlasGeometry::new(2, 2);
        let atlas = load_atlas(&AtlasSource::Bytes(png(4, 4)), geometry).unwrap();
        assert_eq!(atlas.width(), 4);
        assert_eq!(atlas.pixel(2, 0), 0xFFFF0000);
        assert_eq!(atlas.pixel(0, 0), 0xFF000000);
    }

    #[test]
    fn rejects_undersized_sheet() {
        let geometry = AtlasGeometry::new(4, 2);
        let err = load_atlas(&AtlasSource::Bytes(png(4, 4)), geometry).unwrap_err();
        assert!(matches!(
            err,
            Error::Core(tileterm_core::Error::AtlasTooSmall { required: 8, .. })
        ));
    }

    #[test]
    fn rejects_garbage() {
        let err = load_atlas(&AtlasSource::Bytes(vec![1, 2, 3]), AtlasGeometry::new(2, 2));
        assert!(matches!(err, Err(Error::Image(_))));
    }

    #[test]
    fn procedural_needs_no_file() {
        let geometry = AtlasGeometry::new(4, 16);
        let atlas = load_atlas(&AtlasSource::Procedural, geometry).unwrap();
        assert_eq!(atlas, TileAtlas::procedural(geometry));
    }
}
