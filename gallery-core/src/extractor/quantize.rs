//! Median-cut color quantization.
//!
//! Pixels are sampled, reduced to 5 bits per channel and bucketed into a
//! 32×32×32 histogram. The bounding box of all samples is split repeatedly
//! at the population median of its widest channel. The dominant color is
//! the average of the most populated box.

use image::RgbaImage;

use crate::error::ExtractError;
use crate::record::DominantColor;

const SIGBITS: usize = 5;
const RSHIFT: usize = 8 - SIGBITS;
const SIDE: usize = 1 << SIGBITS;
const HISTOGRAM_SIZE: usize = SIDE * SIDE * SIDE;

/// Pixels more transparent than this are ignored.
const MIN_ALPHA: u8 = 125;
/// Pixels with every channel above this are treated as background.
const WHITE_THRESHOLD: u8 = 250;

/// Median-cut quantizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantizer {
    /// Sample every n-th pixel. `1` looks at every pixel.
    pub quality: usize,
    /// Maximum number of boxes in the palette.
    pub palette_size: usize,
}

impl Default for Quantizer {
    fn default() -> Self {
        Self {
            quality: 10,
            palette_size: 5,
        }
    }
}

impl Quantizer {
    pub fn new(quality: usize, palette_size: usize) -> Self {
        Self {
            quality: quality.max(1),
            palette_size: palette_size.max(1),
        }
    }

    /// The single most representative color of `image`.
    pub fn dominant_color(&self, image: &RgbaImage) -> Result<DominantColor, ExtractError> {
        self.palette(image)?
            .first()
            .map(|(color, _)| *color)
            .ok_or(ExtractError::EmptyImage)
    }

    /// Palette colors with their sample counts, most populated first.
    pub fn palette(&self, image: &RgbaImage) -> Result<Vec<(DominantColor, u64)>, ExtractError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(ExtractError::EmptyImage);
        }

        let histogram = Histogram::from_pixels(image, self.quality.max(1), true);
        if histogram.total == 0 {
            // Everything was transparent or white; use the plain average.
            let fallback = Histogram::from_pixels(image, self.quality.max(1), false);
            let all = fallback.shrink([0; 3], [SIDE - 1; 3]);
            return Ok(vec![(fallback.average(&all), all.count)]);
        }

        let mut boxes = vec![histogram.shrink([0; 3], [SIDE - 1; 3])];
        while boxes.len() < self.palette_size.max(1) {
            let Some(index) = boxes
                .iter()
                .enumerate()
                .filter(|(_, b)| b.is_splittable())
                .max_by_key(|(_, b)| b.count)
                .map(|(i, _)| i)
            else {
                break;
            };

            let (left, right) = histogram.split(&boxes[index]);
            boxes[index] = left;
            boxes.push(right);
        }

        // Stable sort keeps the earlier box first on equal counts.
        boxes.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(boxes
            .iter()
            .map(|b| (histogram.average(b), b.count))
            .collect())
    }
}

#[derive(Debug, Clone, Copy)]
struct ColorBox {
    lo: [usize; 3],
    hi: [usize; 3],
    count: u64,
}

impl ColorBox {
    fn is_splittable(&self) -> bool {
        self.count > 1 && (0..3).any(|c| self.hi[c] > self.lo[c])
    }
}

struct Histogram {
    counts: Vec<u64>,
    sums: Vec<[u64; 3]>,
    total: u64,
}

impl Histogram {
    fn from_pixels(image: &RgbaImage, step: usize, filter: bool) -> Self {
        let mut histogram = Self {
            counts: vec![0; HISTOGRAM_SIZE],
            sums: vec![[0; 3]; HISTOGRAM_SIZE],
            total: 0,
        };

        for pixel in image.pixels().step_by(step) {
            let [r, g, b, a] = pixel.0;
            if filter
                && (a < MIN_ALPHA
                    || (r > WHITE_THRESHOLD && g > WHITE_THRESHOLD && b > WHITE_THRESHOLD))
            {
                continue;
            }

            let i = index([
                (r as usize) >> RSHIFT,
                (g as usize) >> RSHIFT,
                (b as usize) >> RSHIFT,
            ]);
            histogram.counts[i] += 1;
            histogram.sums[i][0] += r as u64;
            histogram.sums[i][1] += g as u64;
            histogram.sums[i][2] += b as u64;
            histogram.total += 1;
        }

        histogram
    }

    /// Tight bounding box of the populated buckets inside `lo..=hi`.
    fn shrink(&self, lo: [usize; 3], hi: [usize; 3]) -> ColorBox {
        let mut min = hi;
        let mut max = lo;
        let mut count = 0;

        for_each_bucket(lo, hi, |q| {
            let n = self.counts[index(q)];
            if n > 0 {
                count += n;
                for c in 0..3 {
                    min[c] = min[c].min(q[c]);
                    max[c] = max[c].max(q[c]);
                }
            }
        });

        if count == 0 {
            return ColorBox { lo, hi, count: 0 };
        }
        ColorBox {
            lo: min,
            hi: max,
            count,
        }
    }

    /// Cuts `b` along its widest channel at the population median. Both
    /// halves are non-empty because `b` is tight.
    fn split(&self, b: &ColorBox) -> (ColorBox, ColorBox) {
        let axis = (0..3)
            .max_by_key(|&c| (b.hi[c] - b.lo[c], std::cmp::Reverse(c)))
            .unwrap_or(0);

        let mut cut = b.hi[axis] - 1;
        let mut cumulative = 0;
        for v in b.lo[axis]..b.hi[axis] {
            let mut slice_lo = b.lo;
            let mut slice_hi = b.hi;
            slice_lo[axis] = v;
            slice_hi[axis] = v;
            for_each_bucket(slice_lo, slice_hi, |q| cumulative += self.counts[index(q)]);
            if cumulative * 2 >= b.count {
                cut = v;
                break;
            }
        }

        let mut left_hi = b.hi;
        left_hi[axis] = cut;
        let mut right_lo = b.lo;
        right_lo[axis] = cut + 1;

        (self.shrink(b.lo, left_hi), self.shrink(right_lo, b.hi))
    }

    fn average(&self, b: &ColorBox) -> DominantColor {
        let mut sums = [0u64; 3];
        let mut count = 0u64;
        for_each_bucket(b.lo, b.hi, |q| {
            let i = index(q);
            count += self.counts[i];
            for c in 0..3 {
                sums[c] += self.sums[i][c];
            }
        });

        if count == 0 {
            return DominantColor::new(0, 0, 0);
        }
        let channel = |sum: u64| ((sum + count / 2) / count).min(255) as u8;
        DominantColor::new(channel(sums[0]), channel(sums[1]), channel(sums[2]))
    }
}

fn index(q: [usize; 3]) -> usize {
    (q[0] << (2 * SIGBITS)) | (q[1] << SIGBITS) | q[2]
}

fn for_each_bucket(lo: [usize; 3], hi: [usize; 3], mut f: impl FnMut([usize; 3])) {
    for r in lo[0]..=hi[0] {
        for g in lo[1]..=hi[1] {
            for b in lo[2]..=hi[2] {
                f([r, g, b]);
            }
        }
    }
}
