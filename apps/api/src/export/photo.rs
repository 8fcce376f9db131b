//! Profile photo decoding for PDF export.
//!
//! The draft carries the photo as a `data:image/...;base64,` URL. It is
//! decoded, center-cropped to a square (the preview's `object-fit: cover`)
//! and embedded as an 8-bit DeviceRGB image XObject. Transparency becomes a
//! DeviceGray soft mask.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use image::{imageops::FilterType, DynamicImage, ImageReader};
use lopdf::{dictionary, Document, ObjectId, Stream};
use thiserror::Error;

/// Edge length in pixels of the embedded square.
pub const PHOTO_PIXELS: u32 = 240;

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("photo is not a base64 image data URL")]
    NotDataUrl,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unreadable image: {0}")]
    Image(#[from] image::ImageError),

    #[error("unreadable image: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct Photo {
    pub width: u32,
    pub height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl Photo {
    pub fn from_data_url(url: &str) -> Result<Self, PhotoError> {
        let payload = data_url_payload(url).ok_or(PhotoError::NotDataUrl)?;
        let bytes = B64.decode(payload)?;
        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .decode()?;
        Ok(Self::from_image(&image))
    }

    pub fn from_image(image: &DynamicImage) -> Self {
        let square = image.resize_to_fill(PHOTO_PIXELS, PHOTO_PIXELS, FilterType::Triangle);
        let alpha = square
            .color()
            .has_alpha()
            .then(|| square.to_rgba8().pixels().map(|p| p[3]).collect());
        Photo {
            width: square.width(),
            height: square.height(),
            rgb: square.to_rgb8().into_raw(),
            alpha,
        }
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// Adds the image (and its soft mask, if any) to `doc` and returns the
    /// id of the image XObject.
    pub fn add_to(self, doc: &mut Document) -> ObjectId {
        let (width, height) = (i64::from(self.width), i64::from(self.height));
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        if let Some(alpha) = self.alpha {
            let mask_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width,
                    "Height" => height,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                alpha,
            ));
            dict.set("SMask", mask_id);
        }
        doc.add_object(Stream::new(dict, self.rgb))
    }
}

/// Base64 payload of an image data URL, whitespace removed.
fn data_url_payload(url: &str) -> Option<String> {
    let rest = url.trim().strip_prefix("data:image/")?;
    let (meta, payload) = rest.split_once(',')?;
    meta.ends_with(";base64")
        .then(|| payload.chars().filter(|c| !c.is_ascii_whitespace()).collect())
}
