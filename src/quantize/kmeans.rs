//! K-means color clustering with a fixed iteration budget
//!
//! Clustering always runs the configured number of rounds; there is no
//! convergence test. Initial centroids are distinct random pixels, and a
//! cluster that ends a round empty is re-seeded with a random pixel. Both
//! draws use the caller's random source, so a seeded generator makes the
//! result reproducible.

use crate::color::Palette;
use crate::io::error::{PipelineError, Result, invalid_parameter};
use crate::math::distance::{ChannelSum, nearest_index, to_f64};
use rand::Rng;
use rand::seq::index;
use rayon::prelude::*;

/// Palette and per-pixel cluster labels produced by [`quantize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantization {
    /// Final centroids truncated to integer colors, id = cluster index
    pub palette: Palette,
    /// Cluster index of every input pixel, in input order
    pub labels: Vec<usize>,
}

impl Quantization {
    /// Replace every input pixel with its cluster color
    ///
    /// # Errors
    ///
    /// Returns an error if a label does not reference a palette entry
    pub fn quantized_pixels(&self) -> Result<Vec<[u8; 3]>> {
        self.labels
            .iter()
            .map(|&label| self.palette.rgb(label))
            .collect()
    }

    /// Number of pixels assigned to each cluster
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.palette.len()];
        for &label in &self.labels {
            if let Some(size) = sizes.get_mut(label) {
                *size += 1;
            }
        }
        sizes
    }
}

/// Cluster `pixels` into `k` colors using `iterations` assignment/update rounds
///
/// Requesting more clusters than distinct colors is allowed and yields
/// duplicate palette entries.
///
/// # Errors
///
/// Returns an error if `pixels` is empty or `k` is zero
pub fn quantize<R>(
    pixels: &[[u8; 3]],
    k: usize,
    iterations: usize,
    rng: &mut R,
) -> Result<Quantization>
where
    R: Rng,
{
    if pixels.is_empty() {
        return Err(PipelineError::InvalidSourceData {
            reason: "cannot cluster an empty pixel set".to_string(),
        });
    }
    if k == 0 {
        return Err(invalid_parameter(
            "k",
            &k,
            &"at least one cluster is required",
        ));
    }

    let points: Vec<[f64; 3]> = pixels.iter().map(|&p| to_f64(p)).collect();
    let mut centroids = initialize_centroids(&points, k, rng);
    let mut labels = Vec::new();

    for iteration in 0..iterations {
        labels = assign_clusters(&points, &centroids);
        let reseeded = update_centroids(&points, &labels, &mut centroids, rng);
        log::debug!(
            "k-means round {}/{iterations}: {reseeded} empty clusters re-seeded",
            iteration + 1
        );
    }

    if iterations == 0 {
        labels = assign_clusters(&points, &centroids);
    }

    Ok(Quantization {
        palette: Palette::from_centroids(&centroids),
        labels,
    })
}

/// Pick `k` starting centroids among the input points
///
/// Points are drawn without replacement; once every point has been used the
/// remaining centroids are drawn with replacement.
pub fn initialize_centroids<R>(points: &[[f64; 3]], k: usize, rng: &mut R) -> Vec<[f64; 3]>
where
    R: Rng,
{
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }

    let distinct = k.min(n);
    let mut centroids: Vec<[f64; 3]> = index::sample(rng, n, distinct)
        .into_iter()
        .filter_map(|i| points.get(i).copied())
        .collect();

    while centroids.len() < k {
        if let Some(&point) = points.get(rng.random_range(0..n)) {
            centroids.push(point);
        }
    }

    centroids
}

/// Label every point with its nearest centroid
///
/// Runs in parallel; labels come back in point order and ties resolve to the
/// lowest cluster index, matching a sequential scan.
pub fn assign_clusters(points: &[[f64; 3]], centroids: &[[f64; 3]]) -> Vec<usize> {
    points
        .par_iter()
        .map(|&point| nearest_centroid(point, centroids))
        .collect()
}

/// Index of the centroid nearest to `point`, lowest index on ties
pub fn nearest_centroid(point: [f64; 3], centroids: &[[f64; 3]]) -> usize {
    nearest_index(point, centroids.iter().copied()).unwrap_or(0)
}

/// Move every centroid to the mean of its members
///
/// Returns how many empty clusters were re-seeded with a random input point.
pub fn update_centroids<R>(
    points: &[[f64; 3]],
    labels: &[usize],
    centroids: &mut [[f64; 3]],
    rng: &mut R,
) -> usize
where
    R: Rng,
{
    let mut sums = vec![ChannelSum::default(); centroids.len()];
    for (&point, &label) in points.iter().zip(labels) {
        if let Some(sum) = sums.get_mut(label) {
            sum.add(point);
        }
    }

    let mut reseeded = 0;
    for (centroid, sum) in centroids.iter_mut().zip(&sums) {
        if let Some(mean) = sum.mean() {
            *centroid = mean;
        } else if !points.is_empty() {
            // May empty again next round; accepted
            if let Some(&point) = points.get(rng.random_range(0..points.len())) {
                *centroid = point;
            }
            reseeded += 1;
        }
    }

    reseeded
}
