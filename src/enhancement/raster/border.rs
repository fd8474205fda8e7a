//! Border extrapolation and correlation kernels shared by the spatial filters.

/// How out-of-range coordinates are folded back into the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderMode {
    /// `gfedcb|abcdefgh|gfedcba`, the default for linear filters.
    Reflect101,
    /// `aaaaaa|abcdefgh|hhhhhhh`, clamped to the edge sample.
    Replicate,
    /// `fedcba|abcdefgh|hgfedcb`, half-sample symmetric.
    Reflect,
}

impl BorderMode {
    /// Maps a possibly out-of-range index onto `0..n`. `n` must be non-zero.
    #[inline]
    pub fn index(self, i: isize, n: usize) -> usize {
        let n = n as isize;
        if (0..n).contains(&i) {
            return i as usize;
        }
        if n == 1 {
            return 0;
        }
        match self {
            BorderMode::Replicate => i.clamp(0, n - 1) as usize,
            BorderMode::Reflect101 => {
                let period = 2 * (n - 1);
                let mut j = i.rem_euclid(period);
                if j >= n {
                    j = period - j;
                }
                j as usize
            }
            BorderMode::Reflect => {
                let period = 2 * n;
                let mut j = i.rem_euclid(period);
                if j >= n {
                    j = period - 1 - j;
                }
                j as usize
            }
        }
    }
}

/// Rounds half to even and saturates into `u8`.
#[inline]
pub fn round_saturate(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Separable correlation: `kx` along rows, then `ky` along columns.
///
/// Both kernels must have odd length; the anchor is the centre tap.
pub fn correlate_separable(
    src: &[f64],
    width: usize,
    height: usize,
    kx: &[f64],
    ky: &[f64],
    border: BorderMode,
) -> Vec<f64> {
    let rx = (kx.len() / 2) as isize;
    let ry = (ky.len() / 2) as isize;

    let mut horizontal = vec![0.0f64; width * height];
    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        let out = &mut horizontal[y * width..(y + 1) * width];
        for (x, slot) in out.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (k, &w) in kx.iter().enumerate() {
                let sx = border.index(x as isize + k as isize - rx, width);
                acc += w * row[sx];
            }
            *slot = acc;
        }
    }

    let mut result = vec![0.0f64; width * height];
    for y in 0..height {
        for (k, &w) in ky.iter().enumerate() {
            let sy = border.index(y as isize + k as isize - ry, height);
            let src_row = &horizontal[sy * width..(sy + 1) * width];
            let dst_row = &mut result[y * width..(y + 1) * width];
            for (d, &s) in dst_row.iter_mut().zip(src_row) {
                *d += w * s;
            }
        }
    }
    result
}

/// Dense 2-D correlation with a `kw x kh` kernel anchored at its centre.
pub fn correlate_2d(
    src: &[f64],
    width: usize,
    height: usize,
    kernel: &[f64],
    kw: usize,
    kh: usize,
    border: BorderMode,
) -> Vec<f64> {
    let rx = (kw / 2) as isize;
    let ry = (kh / 2) as isize;
    let mut result = vec![0.0f64; width * height];

    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0;
            for ky in 0..kh {
                let sy = border.index(y as isize + ky as isize - ry, height);
                for kx in 0..kw {
                    let w = kernel[ky * kw + kx];
                    if w == 0.0 {
                        continue;
                    }
                    let sx = border.index(x as isize + kx as isize - rx, width);
                    acc += w * src[sy * width + sx];
                }
            }
            result[y * width + x] = acc;
        }
    }
    result
}
