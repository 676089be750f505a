use image::{DynamicImage, GrayImage, Luma};
use strum::{Display, EnumString, IntoStaticStr};
use tracing::debug;

use crate::{raster::bitmap::BitMap, Error};

/// Which channel of a decoded image becomes the palette index
#[derive(Debug, Default, Eq, PartialEq, Copy, Clone, EnumString, IntoStaticStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Channel {
    /// Alpha coverage (opaque images become fully set)
    #[default]
    Alpha,
    /// Luminance
    Luma,
}

impl BitMap {
    /// Builds a [`BitMap`] from a grayscale image, placing its top-left pixel at `origin`
    ///
    /// # Errors
    ///
    /// This function errors if the image does not fit in 16-bit dimensions
    pub fn from_gray(img: &GrayImage, origin: (i32, i32)) -> Result<Self, Error> {
        let (Ok(width), Ok(height)) = (u16::try_from(img.width()), u16::try_from(img.height()))
        else {
            return Err(Error::ImageTooLarge {
                width: img.width(),
                height: img.height(),
            });
        };
        Self::builder()
            .width(width)
            .height(height)
            .origin(origin)
            .pixels(img.as_raw().clone())
            .build()
    }

    /// Builds a [`BitMap`] from any decoded image, using `channel` as the palette index
    ///
    /// # Errors
    ///
    /// See [`Self::from_gray`]
    pub fn from_image(
        img: &DynamicImage,
        channel: Channel,
        origin: (i32, i32),
    ) -> Result<Self, Error> {
        debug!("Converting {}x{} image using {channel}", img.width(), img.height());
        let gray = match channel {
            Channel::Luma => img.to_luma8(),
            Channel::Alpha => {
                let rgba = img.to_rgba8();
                GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
                    Luma([rgba.get_pixel(x, y)[3]])
                })
            }
        };
        Self::from_gray(&gray, origin)
    }

    /// Renders the grid as a grayscale image, one luma sample per palette index
    #[must_use]
    pub fn to_gray_image(&self) -> GrayImage {
        let mut img = GrayImage::new(u32::from(self.width()), u32::from(self.height()));
        let rows = (self.min_y()..self.max_y()).filter_map(|y| self.row(y));
        for (dst, src) in img.rows_mut().zip(rows) {
            for (pixel, &value) in dst.zip(src) {
                *pixel = Luma([value]);
            }
        }
        img
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_image_skips_stride_padding() {
        let map = BitMap::builder()
            .width(2)
            .height(2)
            .origin((-5, 3))
            .stride(3)
            .pixels(vec![1, 2, 0xEE, 3, 4, 0xEE])
            .build()
            .unwrap();
        let img = map.to_gray_image();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.as_raw(), &[1, 2, 3, 4]);

        let back = BitMap::from_gray(&img, (-5, 3)).unwrap();
        assert_eq!(back.pixel(-4, 4), 4);
        assert_eq!(back.stride(), 2);
    }
}
