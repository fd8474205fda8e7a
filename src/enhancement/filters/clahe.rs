//! Contrast-limited adaptive histogram equalization.

use crate::enhancement::raster::{BorderMode, GrayImageData, round_saturate};

const HIST_SIZE: usize = 256;

/// CLAHE operator with a fixed clip limit and tile grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clahe {
    pub clip_limit: f64,
    pub tiles_x: usize,
    pub tiles_y: usize,
}

impl Clahe {
    pub fn new(clip_limit: f64, tiles_x: usize, tiles_y: usize) -> Self {
        Self {
            clip_limit,
            tiles_x: tiles_x.max(1),
            tiles_y: tiles_y.max(1),
        }
    }

    pub fn apply(&self, image: &GrayImageData) -> GrayImageData {
        let (w, h) = image.dimensions();
        if image.is_empty() {
            return image.clone();
        }

        // The LUT source is padded up to a whole number of tiles.
        let (lut_src, ext_w, ext_h) = if w % self.tiles_x == 0 && h % self.tiles_y == 0 {
            (image.clone(), w, h)
        } else {
            let ext_w = w + self.tiles_x - w % self.tiles_x;
            let ext_h = h + self.tiles_y - h % self.tiles_y;
            let padded = GrayImageData::from_fn(ext_w, ext_h, |x, y| {
                let sx = BorderMode::Reflect101.index(x as isize, w);
                let sy = BorderMode::Reflect101.index(y as isize, h);
                image.get(sx, sy)
            });
            (padded, ext_w, ext_h)
        };

        let tile_w = ext_w / self.tiles_x;
        let tile_h = ext_h / self.tiles_y;
        let tile_area = tile_w * tile_h;

        let clip = if self.clip_limit > 0.0 {
            ((self.clip_limit * tile_area as f64 / HIST_SIZE as f64) as usize).max(1)
        } else {
            0
        };
        let lut_scale = (HIST_SIZE - 1) as f64 / tile_area as f64;

        let mut luts = vec![[0u8; HIST_SIZE]; self.tiles_x * self.tiles_y];
        for ty in 0..self.tiles_y {
            for tx in 0..self.tiles_x {
                let mut hist = [0usize; HIST_SIZE];
                for y in ty * tile_h..(ty + 1) * tile_h {
                    let row = lut_src.row(y);
                    for &v in &row[tx * tile_w..(tx + 1) * tile_w] {
                        hist[v as usize] += 1;
                    }
                }
                if clip > 0 {
                    clip_histogram(&mut hist, clip);
                }
                let lut = &mut luts[ty * self.tiles_x + tx];
                let mut sum = 0usize;
                for (slot, &count) in lut.iter_mut().zip(hist.iter()) {
                    sum += count;
                    *slot = round_saturate(sum as f64 * lut_scale);
                }
            }
        }

        let inv_tw = 1.0 / tile_w as f64;
        let inv_th = 1.0 / tile_h as f64;
        let columns: Vec<(usize, usize, f64)> = (0..w)
            .map(|x| {
                let txf = x as f64 * inv_tw - 0.5;
                let tx1 = txf.floor();
                let xa = txf - tx1;
                let tx1 = tx1 as isize;
                let tx2 = (tx1 + 1).min(self.tiles_x as isize - 1) as usize;
                (tx1.max(0) as usize, tx2, xa)
            })
            .collect();

        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            let tyf = y as f64 * inv_th - 0.5;
            let ty1f = tyf.floor();
            let ya = tyf - ty1f;
            let ty1 = ty1f as isize;
            let ty2 = (ty1 + 1).min(self.tiles_y as isize - 1) as usize;
            let ty1 = ty1.max(0) as usize;

            let row = image.row(y);
            for (x, &(tx1, tx2, xa)) in columns.iter().enumerate() {
                let v = row[x] as usize;
                let top = luts[ty1 * self.tiles_x + tx1][v] as f64 * (1.0 - xa)
                    + luts[ty1 * self.tiles_x + tx2][v] as f64 * xa;
                let bottom = luts[ty2 * self.tiles_x + tx1][v] as f64 * (1.0 - xa)
                    + luts[ty2 * self.tiles_x + tx2][v] as f64 * xa;
                data.push(round_saturate(top * (1.0 - ya) + bottom * ya));
            }
        }

        GrayImageData { width: w, height: h, data }
    }
}

/// Clips every bin at `clip` and spreads the excess back over the histogram.
fn clip_histogram(hist: &mut [usize; HIST_SIZE], clip: usize) {
    let mut clipped = 0usize;
    for bin in hist.iter_mut() {
        if *bin > clip {
            clipped += *bin - clip;
            *bin = clip;
        }
    }

    let batch = clipped / HIST_SIZE;
    let mut residual = clipped - batch * HIST_SIZE;
    for bin in hist.iter_mut() {
        *bin += batch;
    }

    if residual != 0 {
        let step = (HIST_SIZE / residual).max(1);
        let mut i = 0;
        while i < HIST_SIZE && residual > 0 {
            hist[i] += 1;
            i += step;
            residual -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_preserves_total_count() {
        let mut hist = [0usize; HIST_SIZE];
        hist[10] = 500;
        hist[200] = 37;
        clip_histogram(&mut hist, 4);
        assert_eq!(hist.iter().sum::<usize>(), 537);
        assert!(hist[10] <= 4 + 537 / HIST_SIZE + 1);
    }

    #[test]
    fn clahe_preserves_dimensions_on_uneven_sizes() {
        let img = GrayImageData::from_fn(37, 23, |x, y| ((x * 7 + y * 3) % 256) as u8);
        let out = Clahe::new(2.0, 8, 8).apply(&img);
        assert_eq!(out.dimensions(), (37, 23));
    }

    #[test]
    fn clahe_stretches_low_contrast_ramp() {
        let img = GrayImageData::from_fn(64, 64, |x, y| 100 + ((x + y) % 8) as u8);
        let out = Clahe::new(2.0, 8, 8).apply(&img);
        let before = img.stats();
        let after = out.stats();
        assert!(after.std_dev > before.std_dev);
        assert!(after.max - after.min > before.max - before.min);
    }
}
