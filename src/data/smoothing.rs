//! 1D Gaussian smoothing with reflective boundaries.
//!
//! The kernel is truncated at four standard deviations and normalized to sum
//! to one. Samples beyond either end are taken from the mirrored sequence
//! (`d c b a | a b c d | d c b a`), reflecting again as often as needed when
//! the sequence is shorter than the kernel radius.
//!
//! Missing samples are not interpolated: any output whose window touches a
//! missing input is itself missing.

/// Kernel half-width, in standard deviations.
pub const TRUNCATE: f64 = 4.0;

/// Normalized Gaussian weights for offsets `-radius..=radius`.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = kernel_radius(sigma) as i64;
    let variance = sigma * sigma;
    let mut weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x * x) as f64 / variance).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    for w in weights.iter_mut() {
        *w /= total;
    }
    weights
}

/// Number of samples on each side of the centre the kernel reaches.
pub fn kernel_radius(sigma: f64) -> usize {
    (TRUNCATE * sigma + 0.5) as usize
}

/// Map an index that may fall outside `0..len` back into range by mirroring.
fn reflect_index(index: i64, len: usize) -> usize {
    let len = len as i64;
    let period = 2 * len;
    let m = index.rem_euclid(period);
    if m < len {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

/// Smooth `values` with a Gaussian of standard deviation `sigma` samples.
///
/// The output has the same length as the input. A non-positive or non-finite
/// `sigma` returns the input unchanged.
pub fn gaussian_filter1d(values: &[Option<f64>], sigma: f64) -> Vec<Option<f64>> {
    if values.is_empty() {
        return Vec::new();
    }
    if !(sigma.is_finite() && sigma > 0.0) {
        return values.to_vec();
    }

    let weights = gaussian_kernel(sigma);
    let radius = (weights.len() / 2) as i64;
    let len = values.len();

    (0..len as i64)
        .map(|centre| {
            let mut acc = 0.0;
            for (k, weight) in weights.iter().enumerate() {
                let source = reflect_index(centre + k as i64 - radius, len);
                acc += weight * values[source]?;
            }
            Some(acc)
        })
        .collect()
}
