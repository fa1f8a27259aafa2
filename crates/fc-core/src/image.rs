use crate::Error;
use crate::color::Rgb8;
use crate::geom::Pixel2i;

/// Owned, immutable raster. There is no mutable access after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T> Image<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, Error> {
        let expected = width.checked_mul(height).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

impl<T: Clone> Image<T> {
    pub fn new_fill(width: usize, height: usize, value: T) -> Self {
        let len = width.checked_mul(height).expect("image size overflow");
        Self {
            width,
            height,
            data: vec![value; len],
        }
    }

    /// Builds a raster by evaluating `f(x, y)` for every pixel in row order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }
}

impl Image<Rgb8> {
    /// Wraps interleaved `RGBRGB...` bytes, e.g. from `image::RgbImage::into_raw`.
    pub fn from_rgb_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self, Error> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(3))
            .ok_or(Error::SizeMismatch {
                expected: usize::MAX,
                actual: bytes.len(),
            })?;
        if bytes.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }

        let data = bytes
            .chunks_exact(3)
            .map(|px| Rgb8::new(px[0], px[1], px[2]))
            .collect();
        Self::from_vec(width, height, data)
    }
}

/// Borrowed read-only view of an [`Image`].
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T> {
    width: usize,
    height: usize,
    data: &'a [T],
}

impl<'a, T> ImageView<'a, T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x)
    }

    pub fn contains(&self, px: Pixel2i) -> bool {
        px.x >= 0 && px.y >= 0 && (px.x as usize) < self.width && (px.y as usize) < self.height
    }
}

impl<T: Copy> ImageView<'_, T> {
    /// Pixel at a signed index. Coordinates outside `[0, width) x [0, height)`
    /// are reported, never clamped.
    pub fn at(&self, px: Pixel2i) -> Result<T, Error> {
        let out_of_bounds = || Error::OutOfBounds {
            x: i64::from(px.x),
            y: i64::from(px.y),
            width: self.width,
            height: self.height,
        };
        if !self.contains(px) {
            return Err(out_of_bounds());
        }
        self.get(px.x as usize, px.y as usize)
            .copied()
            .ok_or_else(out_of_bounds)
    }
}
