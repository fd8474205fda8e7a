//! Spatial-domain smoothing and sharpening primitives.

use imageproc::filter::median_filter;

use crate::enhancement::common::error::Result;
use crate::enhancement::raster::{
    BorderMode, GrayImageData, round_saturate,
    border::{correlate_2d, correlate_separable},
};

/// Unity-gain 3x3 sharpening kernel.
pub const LAPLACIAN_SHARPEN_KERNEL: [f64; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// Binomial kernels used when sigma is derived from the kernel size.
const SMALL_GAUSSIAN_TABLES: [&[f64]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
];

/// 1-D Gaussian kernel of odd length `ksize`.
///
/// A non-positive `sigma` is derived from the kernel size; sizes up to 7 then
/// use the fixed binomial tables.
pub fn gaussian_kernel(ksize: usize, sigma: f64) -> Vec<f64> {
    if sigma <= 0.0 && ksize % 2 == 1 && ksize <= 7 {
        return SMALL_GAUSSIAN_TABLES[ksize / 2].to_vec();
    }
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let scale = -0.5 / (sigma * sigma);
    let centre = (ksize as f64 - 1.0) * 0.5;
    let mut kernel: Vec<f64> = (0..ksize)
        .map(|i| {
            let x = i as f64 - centre;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Gaussian blur keeping full floating-point precision.
pub fn gaussian_blur_f64(image: &GrayImageData, ksize: usize, sigma: f64) -> Vec<f64> {
    let kernel = gaussian_kernel(ksize, sigma);
    correlate_separable(
        &image.to_f64(),
        image.width,
        image.height,
        &kernel,
        &kernel,
        BorderMode::Reflect101,
    )
}

pub fn gaussian_blur(image: &GrayImageData, ksize: usize, sigma: f64) -> GrayImageData {
    to_raster(image, gaussian_blur_f64(image, ksize, sigma))
}

/// Normalised `ksize x ksize` box filter.
pub fn box_blur(image: &GrayImageData, ksize: usize) -> GrayImageData {
    let kernel = vec![1.0 / ksize as f64; ksize];
    let out = correlate_separable(
        &image.to_f64(),
        image.width,
        image.height,
        &kernel,
        &kernel,
        BorderMode::Reflect101,
    );
    to_raster(image, out)
}

/// Median over a `ksize x ksize` window with replicated borders.
pub fn median_blur(image: &GrayImageData, ksize: usize) -> Result<GrayImageData> {
    let radius = (ksize / 2) as u32;
    let source = image.to_gray_image()?;
    Ok(GrayImageData::from(median_filter(&source, radius, radius)))
}

/// Edge-preserving bilateral filter over a circular neighbourhood of diameter `d`.
pub fn bilateral(image: &GrayImageData, d: usize, sigma_color: f64, sigma_space: f64) -> GrayImageData {
    let (w, h) = image.dimensions();
    let sigma_color = if sigma_color <= 0.0 { 1.0 } else { sigma_color };
    let sigma_space = if sigma_space <= 0.0 { 1.0 } else { sigma_space };
    let radius = if d > 0 {
        (d / 2) as isize
    } else {
        (sigma_space * 1.5).round() as isize
    }
    .max(1);

    let color_coeff = -0.5 / (sigma_color * sigma_color);
    let space_coeff = -0.5 / (sigma_space * sigma_space);

    let color_weight: Vec<f64> = (0..256)
        .map(|i| ((i * i) as f64 * color_coeff).exp())
        .collect();

    let mut offsets = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let dist = ((dx * dx + dy * dy) as f64).sqrt();
            if dist > radius as f64 {
                continue;
            }
            offsets.push((dx, dy, (dist * dist * space_coeff).exp()));
        }
    }

    let mut data = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            let centre = image.get(x, y) as i32;
            let mut sum = 0.0;
            let mut wsum = 0.0;
            for &(dx, dy, space_w) in &offsets {
                let sx = BorderMode::Reflect101.index(x as isize + dx, w);
                let sy = BorderMode::Reflect101.index(y as isize + dy, h);
                let v = image.get(sx, sy) as i32;
                let weight = space_w * color_weight[(v - centre).unsigned_abs() as usize];
                sum += v as f64 * weight;
                wsum += weight;
            }
            data.push(round_saturate(sum / wsum));
        }
    }

    GrayImageData { width: w, height: h, data }
}

/// Correlation with [`LAPLACIAN_SHARPEN_KERNEL`], saturated to 8 bits.
pub fn laplacian_sharpen(image: &GrayImageData) -> GrayImageData {
    let out = correlate_2d(
        &image.to_f64(),
        image.width,
        image.height,
        &LAPLACIAN_SHARPEN_KERNEL,
        3,
        3,
        BorderMode::Reflect101,
    );
    to_raster(image, out)
}

/// `alpha * a + beta * b + gamma`, rounded and saturated per pixel.
pub fn add_weighted(a: &GrayImageData, alpha: f64, b: &GrayImageData, beta: f64, gamma: f64) -> GrayImageData {
    let data = a
        .data
        .iter()
        .zip(&b.data)
        .map(|(&pa, &pb)| round_saturate(pa as f64 * alpha + pb as f64 * beta + gamma))
        .collect();
    GrayImageData {
        width: a.width,
        height: a.height,
        data,
    }
}

/// Blends the image with a heavy 9x9 Gaussian: `1.5 * img - 0.5 * blur`.
pub fn unsharp_mask(image: &GrayImageData) -> GrayImageData {
    let blurred = gaussian_blur(image, 9, 10.0);
    add_weighted(image, 1.5, &blurred, -0.5, 0.0)
}

/// Gradient magnitude of the 3x3 Sobel derivatives.
pub fn sobel_magnitude(image: &GrayImageData) -> Vec<f64> {
    let src = image.to_f64();
    let (w, h) = image.dimensions();
    let derivative = [-1.0, 0.0, 1.0];
    let smoothing = [1.0, 2.0, 1.0];
    let gx = correlate_separable(&src, w, h, &derivative, &smoothing, BorderMode::Reflect101);
    let gy = correlate_separable(&src, w, h, &smoothing, &derivative, BorderMode::Reflect101);
    gx.iter().zip(&gy).map(|(x, y)| x.hypot(*y)).collect()
}

fn to_raster(shape: &GrayImageData, values: Vec<f64>) -> GrayImageData {
    GrayImageData {
        width: shape.width,
        height: shape.height,
        data: values.into_iter().map(round_saturate).collect(),
    }
}
