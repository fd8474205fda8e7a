//! The closed, ordered set of filters evaluated for every image.

use crate::enhancement::common::error::FilterOutcome;
use crate::enhancement::filters::{frequency, hybrid, novel, spatial};
use crate::enhancement::raster::GrayImageData;

/// Signature shared by every catalog entry.
pub type FilterFn = fn(&GrayImageData) -> FilterOutcome;

/// Filter names as reported to callers.
pub mod names {
    pub const ORIGINAL: &str = "Original";
    pub const MEAN: &str = "Mean";
    pub const MEDIAN: &str = "Median";
    pub const GAUSSIAN: &str = "Gaussian";
    pub const BILATERAL: &str = "Bilateral";
    pub const LAPLACIAN: &str = "Laplacian";
    pub const UNSHARP_MASK: &str = "Unsharp_Mask";
    pub const CLAHE: &str = "CLAHE";
    pub const IDEAL_LPF: &str = "Ideal_LPF";
    pub const GAUSSIAN_LPF: &str = "Gaussian_LPF";
    pub const IDEAL_HPF: &str = "Ideal_HPF";
    pub const HOMOMORPHIC: &str = "Homomorphic";
    pub const MEDIAN_GAMMA: &str = "Median_Gamma";
    pub const MEDIAN_LAPLACIAN: &str = "Median_Laplacian";
    pub const CLAHE_WAVELET: &str = "CLAHE_Wavelet";
    pub const ACE_ME_NOVEL: &str = "ACE_ME_Novel";
}

/// Which family a filter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDomain {
    Identity,
    Spatial,
    Frequency,
    Hybrid,
    Novel,
}

/// Immutable `(name, transform)` record.
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub name: &'static str,
    pub domain: FilterDomain,
    pub apply: FilterFn,
}

impl FilterSpec {
    pub const fn new(name: &'static str, domain: FilterDomain, apply: FilterFn) -> Self {
        Self { name, domain, apply }
    }
}

fn identity(image: &GrayImageData) -> FilterOutcome {
    Ok(image.clone())
}

fn mean(image: &GrayImageData) -> FilterOutcome {
    Ok(spatial::box_blur(image, 5))
}

fn median(image: &GrayImageData) -> FilterOutcome {
    Ok(spatial::median_blur(image, hybrid::MEDIAN_KERNEL)?)
}

fn gaussian(image: &GrayImageData) -> FilterOutcome {
    Ok(spatial::gaussian_blur(image, 5, 0.0))
}

fn bilateral(image: &GrayImageData) -> FilterOutcome {
    Ok(spatial::bilateral(image, 9, 75.0, 75.0))
}

fn laplacian(image: &GrayImageData) -> FilterOutcome {
    Ok(spatial::laplacian_sharpen(image))
}

fn unsharp_mask(image: &GrayImageData) -> FilterOutcome {
    Ok(spatial::unsharp_mask(image))
}

fn clahe(image: &GrayImageData) -> FilterOutcome {
    let op = super::Clahe::new(hybrid::CLAHE_CLIP_LIMIT, hybrid::CLAHE_TILES, hybrid::CLAHE_TILES);
    Ok(op.apply(image))
}

/// Ordered list of [`FilterSpec`]s.
#[derive(Debug, Clone)]
pub struct FilterCatalog {
    specs: Vec<FilterSpec>,
}

impl FilterCatalog {
    pub fn new(specs: Vec<FilterSpec>) -> Self {
        Self { specs }
    }

    /// Identity baseline, the fourteen standard filters and ACE-ME.
    pub fn standard() -> Self {
        use FilterDomain::*;
        Self::new(vec![
            FilterSpec::new(names::ORIGINAL, Identity, identity),
            FilterSpec::new(names::MEAN, Spatial, mean),
            FilterSpec::new(names::MEDIAN, Spatial, median),
            FilterSpec::new(names::GAUSSIAN, Spatial, gaussian),
            FilterSpec::new(names::BILATERAL, Spatial, bilateral),
            FilterSpec::new(names::LAPLACIAN, Spatial, laplacian),
            FilterSpec::new(names::UNSHARP_MASK, Spatial, unsharp_mask),
            FilterSpec::new(names::CLAHE, Spatial, clahe),
            FilterSpec::new(names::IDEAL_LPF, Frequency, frequency::ideal_low_pass),
            FilterSpec::new(names::GAUSSIAN_LPF, Frequency, frequency::gaussian_low_pass),
            FilterSpec::new(names::IDEAL_HPF, Frequency, frequency::ideal_high_pass),
            FilterSpec::new(names::HOMOMORPHIC, Frequency, frequency::homomorphic),
            FilterSpec::new(names::MEDIAN_GAMMA, Hybrid, hybrid::median_gamma),
            FilterSpec::new(names::MEDIAN_LAPLACIAN, Hybrid, hybrid::median_laplacian),
            FilterSpec::new(names::CLAHE_WAVELET, Hybrid, hybrid::clahe_wavelet),
            FilterSpec::new(names::ACE_ME_NOVEL, Novel, novel::ace_me),
        ])
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterSpec> {
        self.specs.iter()
    }

    pub fn specs(&self) -> &[FilterSpec] {
        &self.specs
    }

    pub fn get(&self, name: &str) -> Option<&FilterSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.specs.iter().map(|spec| spec.name).collect()
    }

    /// Swaps the transform of an existing entry, keeping its position.
    ///
    /// Returns `false` when no entry has that name.
    pub fn replace(&mut self, name: &str, apply: FilterFn) -> bool {
        match self.specs.iter_mut().find(|spec| spec.name == name) {
            Some(spec) => {
                spec.apply = apply;
                true
            }
            None => false,
        }
    }
}

impl Default for FilterCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> IntoIterator for &'a FilterCatalog {
    type Item = &'a FilterSpec;
    type IntoIter = std::slice::Iter<'a, FilterSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}
