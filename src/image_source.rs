use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::RgbaImage;

use crate::error::{CrosshairError, Result};
use crate::geometry::Size;

/// Crosshair shipped with the binary, used whenever a chosen image cannot be shown.
pub const BUNDLED_CROSSHAIR: &[u8] = include_bytes!("../assets/crosshair.png");

/// Display name of the bundled image in notices and logs.
pub const BUNDLED_NAME: &str = "crosshair.png";

/// Decoded RGBA image ready to be uploaded as a texture.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pixels: RgbaImage,
}

impl Bitmap {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Solid single-colour bitmap, mostly useful for tests.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width() as i32, self.height() as i32)
    }

    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Where a crosshair image should come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRequest {
    Default,
    Path(PathBuf),
}

/// Image loading service used by the window mode controller.
pub trait ImageSource {
    fn load(&self, path: &Path) -> Result<Bitmap>;

    fn load_default(&self) -> Result<Bitmap>;

    /// Scale `bitmap` to fit inside a `target` x `target` box, keeping its
    /// aspect ratio.
    fn scale(&self, bitmap: &Bitmap, target: u32) -> Bitmap {
        let (w, h) = fit_within(bitmap.width(), bitmap.height(), target);
        if (w, h) == (bitmap.width(), bitmap.height()) {
            return bitmap.clone();
        }
        Bitmap::new(image::imageops::resize(&bitmap.pixels, w, h, FilterType::Lanczos3))
    }
}

/// Largest size with the same aspect ratio as `width` x `height` that fits in
/// a square of side `target`. Never collapses a side to zero.
pub fn fit_within(width: u32, height: u32, target: u32) -> (u32, u32) {
    if width == 0 || height == 0 || target == 0 {
        return (width, height);
    }
    let scale = f64::from(target) / f64::from(width.max(height));
    let w = (f64::from(width) * scale).round().max(1.0) as u32;
    let h = (f64::from(height) * scale).round().max(1.0) as u32;
    (w, h)
}

/// Loads images from disk, with the default coming from the bundled crosshair
/// unless an override path is configured.
#[derive(Debug, Clone, Default)]
pub struct FsImageSource {
    default_override: Option<PathBuf>,
}

impl FsImageSource {
    pub fn new(default_override: Option<PathBuf>) -> Self {
        Self { default_override }
    }
}

fn decode(path: &Path, bytes: std::result::Result<image::DynamicImage, image::ImageError>) -> Result<Bitmap> {
    let img = bytes.map_err(|e| CrosshairError::ResourceLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let bitmap = Bitmap::new(img.to_rgba8());
    if bitmap.is_empty() {
        return Err(CrosshairError::ResourceLoad {
            path: path.to_path_buf(),
            reason: "image has no pixels".into(),
        });
    }
    Ok(bitmap)
}

impl ImageSource for FsImageSource {
    fn load(&self, path: &Path) -> Result<Bitmap> {
        if !path.is_file() {
            return Err(CrosshairError::ResourceNotFound(path.to_path_buf()));
        }
        decode(path, image::open(path))
    }

    /// The override when one is configured and loads, otherwise the bundled
    /// crosshair.
    fn load_default(&self) -> Result<Bitmap> {
        if let Some(path) = &self.default_override {
            match self.load(path) {
                Ok(bitmap) => return Ok(bitmap),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "default image override unusable, using bundled crosshair");
                }
            }
        }
        decode(Path::new(BUNDLED_NAME), image::load_from_memory(BUNDLED_CROSSHAIR))
    }
}
