//! Tests for k-means clustering with a fixed iteration budget

#[cfg(test)]
mod tests {
    use numberpaint::PipelineError;
    use numberpaint::quantize::kmeans::{
        assign_clusters, initialize_centroids, nearest_centroid, quantize, update_centroids,
    };
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn two_tone_pixels() -> Vec<[u8; 3]> {
        let mut pixels = vec![[250, 10, 10]; 6];
        pixels.extend(vec![[10, 10, 250]; 10]);
        pixels
    }

    // Tests identical pixels collapse to one color even with k = 2
    // Verified by rounding or dropping duplicate centroids
    #[test]
    fn test_identical_pixels_yield_duplicate_entries() {
        let pixels = vec![[200, 100, 50]; 4];
        let mut rng = StdRng::seed_from_u64(7);

        let result = quantize(&pixels, 2, 10, &mut rng).expect("Failed to quantize");

        assert_eq!(result.palette.len(), 2);
        for entry in &result.palette {
            assert_eq!(entry.rgb, [200, 100, 50]);
        }
        assert_eq!(result.labels, vec![0; 4]);
        assert_eq!(
            result.quantized_pixels().expect("Labels must be valid"),
            pixels
        );
    }

    // Tests two well separated colors each get a cluster
    // Verified by skipping the centroid update
    #[test]
    fn test_separates_distinct_colors() {
        let pixels = two_tone_pixels();
        let mut rng = StdRng::seed_from_u64(42);

        let result = quantize(&pixels, 2, 10, &mut rng).expect("Failed to quantize");

        let mut colors: Vec<[u8; 3]> = result.palette.iter().map(|e| e.rgb).collect();
        colors.sort_unstable();
        assert_eq!(colors, vec![[10, 10, 250], [250, 10, 10]]);

        let mut sizes = result.cluster_sizes();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![6, 10]);
    }

    // Tests every label is within range and quantized pixels come from the palette
    // Verified by labelling with centroid count as an upper bound
    #[test]
    fn test_labels_reference_palette() {
        let pixels: Vec<[u8; 3]> = (0..64u8).map(|i| [i * 4, 255 - i * 2, i]).collect();
        let mut rng = StdRng::seed_from_u64(3);

        let result = quantize(&pixels, 5, 4, &mut rng).expect("Failed to quantize");

        assert_eq!(result.labels.len(), pixels.len());
        assert!(result.labels.iter().all(|&label| label < 5));
        let quantized = result.quantized_pixels().expect("Labels must be valid");
        for color in quantized {
            assert!(result.palette.iter().any(|e| e.rgb == color));
        }
    }

    // Tests the same seed reproduces the same palette and labels
    // Verified by drawing centroids from the thread rng
    #[test]
    fn test_seeded_runs_are_reproducible() {
        let pixels: Vec<[u8; 3]> = (0..100u8).map(|i| [i, i.wrapping_mul(7), 200 - i]).collect();

        let first = quantize(&pixels, 4, 6, &mut StdRng::seed_from_u64(99))
            .expect("Failed to quantize");
        let second = quantize(&pixels, 4, 6, &mut StdRng::seed_from_u64(99))
            .expect("Failed to quantize");

        assert_eq!(first, second);
    }

    // Tests zero iterations still labels pixels against the initial centroids
    // Verified by returning empty labels when no round runs
    #[test]
    fn test_zero_iterations_assigns_once() {
        let pixels = two_tone_pixels();
        let mut rng = StdRng::seed_from_u64(1);

        let result = quantize(&pixels, 2, 0, &mut rng).expect("Failed to quantize");

        assert_eq!(result.labels.len(), pixels.len());
        for entry in &result.palette {
            assert!(pixels.contains(&entry.rgb));
        }
    }

    // Tests more clusters than pixels is allowed
    // Verified by rejecting k greater than the pixel count
    #[test]
    fn test_more_clusters_than_pixels() {
        let pixels = vec![[1, 2, 3], [4, 5, 6]];
        let mut rng = StdRng::seed_from_u64(5);

        let result = quantize(&pixels, 5, 3, &mut rng).expect("Failed to quantize");

        assert_eq!(result.palette.len(), 5);
        assert_eq!(result.labels.len(), 2);
    }

    // Tests invalid inputs are rejected before clustering
    // Verified by removing the early checks
    #[test]
    fn test_rejects_empty_input_and_zero_k() {
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(
            quantize(&[], 3, 10, &mut rng),
            Err(PipelineError::InvalidSourceData { .. })
        ));
        assert!(matches!(
            quantize(&[[0, 0, 0]], 0, 10, &mut rng),
            Err(PipelineError::InvalidParameter { parameter: "k", .. })
        ));
    }

    // Tests initial centroids are distinct input points while enough exist
    // Verified by sampling with replacement
    #[test]
    fn test_initial_centroids_are_distinct_points() {
        let points: Vec<[f64; 3]> = (0..10).map(|i| [f64::from(i), 0.0, 0.0]).collect();
        let mut rng = StdRng::seed_from_u64(11);

        let mut centroids = initialize_centroids(&points, 10, &mut rng);
        centroids.sort_by(|a, b| a[0].total_cmp(&b[0]));

        assert_eq!(centroids, points);
        assert!(initialize_centroids(&[], 3, &mut rng).is_empty());
    }

    // Tests assignment picks the nearest centroid with low-index ties
    // Verified by keeping the last equal centroid
    #[test]
    fn test_assignment_tie_breaks_low() {
        let centroids = [[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [10.0, 0.0, 0.0]];
        let points = [[1.0, 0.0, 0.0], [9.0, 0.0, 0.0], [5.0, 0.0, 0.0]];

        assert_eq!(assign_clusters(&points, &centroids), vec![0, 1, 0]);
        assert_eq!(nearest_centroid([10.0, 0.0, 0.0], &centroids), 1);
    }

    // Tests empty clusters are re-seeded and populated ones move to their mean
    // Verified by leaving empty centroids in place
    #[test]
    fn test_update_reseeds_empty_clusters() {
        let points = [[0.0, 0.0, 0.0], [10.0, 20.0, 30.0]];
        let mut centroids = [[0.0, 0.0, 0.0], [500.0, 500.0, 500.0]];
        let mut rng = StdRng::seed_from_u64(4);

        let reseeded = update_centroids(&points, &[0, 0], &mut centroids, &mut rng);

        assert_eq!(reseeded, 1);
        assert_eq!(centroids[0], [5.0, 10.0, 15.0]);
        assert!(points.contains(&centroids[1]));
    }
}
