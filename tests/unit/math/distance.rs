//! Tests for RGB distances, nearest-candidate search and channel means

#[cfg(test)]
mod tests {
    use numberpaint::math::distance::{ChannelSum, nearest_index, squared_distance, to_f64};

    // Tests squared distance sums all three channel differences
    // Verified by dropping the blue channel term
    #[test]
    fn test_squared_distance() {
        let a = [0.0, 0.0, 0.0];
        let b = [2.0, 3.0, 6.0];

        assert!((squared_distance(a, b) - 49.0).abs() < f64::EPSILON);
        assert!((squared_distance(b, a) - 49.0).abs() < f64::EPSILON);
        assert!(squared_distance(b, b).abs() < f64::EPSILON);
    }

    // Tests widening keeps channel values
    // Verified by scaling channels to the unit range
    #[test]
    fn test_to_f64_preserves_channels() {
        assert_eq!(to_f64([0, 128, 255]), [0.0, 128.0, 255.0]);
    }

    // Tests the first strict minimum wins so ties go to the lowest index
    // Verified by using <= when updating the best candidate
    #[test]
    fn test_nearest_index_tie_breaks_low() {
        let candidates = [[10.0, 0.0, 0.0], [0.0, 10.0, 0.0], [0.0, 0.0, 10.0]];
        assert_eq!(nearest_index([0.0, 0.0, 0.0], candidates), Some(0));
        assert_eq!(nearest_index([0.0, 9.0, 0.0], candidates), Some(1));
    }

    // Tests no candidates yields no index
    // Verified by defaulting to index zero
    #[test]
    fn test_nearest_index_empty() {
        assert_eq!(nearest_index([1.0, 2.0, 3.0], Vec::new()), None);
    }

    // Tests the mean of accumulated colors per channel
    // Verified by dividing by the channel count instead of the pixel count
    #[test]
    fn test_channel_sum_mean() {
        let mut sum = ChannelSum::default();
        assert_eq!(sum.mean(), None);

        sum.add(to_f64([10, 20, 30]));
        sum.add([20.0, 40.0, 61.0]);

        assert_eq!(sum.count(), 2);
        assert_eq!(sum.mean(), Some([15.0, 30.0, 45.5]));
    }
}
