use crate::enhancement::raster::GrayImageData;

/// Lookup table for `out = (in / 255)^(1 / gamma) * 255`, truncated.
pub fn gamma_lut(gamma: f64) -> [u8; 256] {
    let inv_gamma = 1.0 / gamma;
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = ((i as f64 / 255.0).powf(inv_gamma) * 255.0) as u8;
    }
    lut
}

pub fn gamma_correct(image: &GrayImageData, gamma: f64) -> GrayImageData {
    image.map_lut(&gamma_lut(gamma))
}
