//! Image message assembled from a captured frame.

use chrono::{DateTime, Utc};

use crate::camera::SensorGeometry;

/// Pixel layout tag carried on every published image.
///
/// The sensor delivers raw 8-bit Bayer mosaic data; the tag names the
/// color filter order so downstream consumers can debayer correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelEncoding {
    /// Blue-green / green-red filter rows.
    BayerBggr8,
    /// Red-green / green-blue filter rows.
    BayerRggb8,
    /// Green-blue / red-green filter rows.
    BayerGbrg8,
    /// Green-red / blue-green filter rows.
    BayerGrbg8,
}

impl PixelEncoding {
    /// Wire tag understood by image-pipeline consumers.
    pub fn as_str(&self) -> &'static str {
        match self {
            PixelEncoding::BayerBggr8 => "bayer_bggr8",
            PixelEncoding::BayerRggb8 => "bayer_rggb8",
            PixelEncoding::BayerGbrg8 => "bayer_gbrg8",
            PixelEncoding::BayerGrbg8 => "bayer_grbg8",
        }
    }

    /// Bytes per pixel. All supported encodings are single-byte mosaics.
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        1
    }
}

impl std::fmt::Display for PixelEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured frame packaged for publication.
///
/// Dimensions come from the session geometry, the stamp from the injected
/// clock at assembly time. `step` is the row stride in bytes; at one byte
/// per pixel it equals the width.
#[derive(Clone)]
pub struct ImageMessage {
    /// Capture timestamp.
    stamp: DateTime<Utc>,
    /// Image height in pixels.
    height: u32,
    /// Image width in pixels.
    width: u32,
    /// Row stride in bytes.
    step: u32,
    /// Pixel layout of `data`.
    encoding: PixelEncoding,
    /// Raw mosaic bytes, row-major.
    data: Vec<u8>,
}

impl ImageMessage {
    /// Packages `data` under the session `geometry` with the given stamp
    /// and encoding.
    pub fn new(
        stamp: DateTime<Utc>,
        geometry: SensorGeometry,
        encoding: PixelEncoding,
        data: Vec<u8>,
    ) -> Self {
        Self {
            stamp,
            height: geometry.height,
            width: geometry.width,
            step: geometry.width * encoding.bytes_per_pixel() as u32,
            encoding,
            data,
        }
    }

    /// Returns the capture timestamp.
    #[inline]
    pub fn stamp(&self) -> DateTime<Utc> {
        self.stamp
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the row stride in bytes.
    #[inline]
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Returns the pixel layout tag.
    #[inline]
    pub fn encoding(&self) -> PixelEncoding {
        self.encoding
    }

    /// Returns the raw image bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Validates that the payload length matches the declared dimensions.
    pub fn is_consistent(&self) -> bool {
        self.data.len() == (self.height as usize) * (self.step as usize)
    }
}

impl std::fmt::Debug for ImageMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageMessage")
            .field("stamp", &self.stamp)
            .field("height", &self.height)
            .field("width", &self.width)
            .field("step", &self.step)
            .field("encoding", &self.encoding)
            .field("data_bytes", &self.data.len())
            .finish()
    }
}
