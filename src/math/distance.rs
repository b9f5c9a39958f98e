//! Euclidean color distances and channel means in RGB space

/// Squared Euclidean distance between two RGB triples
///
/// Ordering by squared distance matches ordering by Euclidean distance, so
/// nearest-color searches never take the square root.
pub fn squared_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr.mul_add(dr, dg.mul_add(dg, db * db))
}

/// Widen an 8-bit pixel to floating point channels
pub fn to_f64(pixel: [u8; 3]) -> [f64; 3] {
    [
        f64::from(pixel[0]),
        f64::from(pixel[1]),
        f64::from(pixel[2]),
    ]
}

/// Index of the candidate nearest to `color`
///
/// Scans in index order and keeps the first strict minimum, so exact ties
/// resolve to the lowest index. Returns `None` when there are no candidates.
pub fn nearest_index<I>(color: [f64; 3], candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = [f64; 3]>,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates.into_iter().enumerate() {
        let d = squared_distance(color, candidate);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((index, d)),
        }
    }
    best.map(|(index, _)| index)
}

/// Running per-channel sum for computing mean colors
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelSum {
    sum: [f64; 3],
    count: usize,
}

impl ChannelSum {
    /// Add one color to the sum
    pub fn add(&mut self, color: [f64; 3]) {
        self.sum[0] += color[0];
        self.sum[1] += color[1];
        self.sum[2] += color[2];
        self.count += 1;
    }

    /// Number of pixels accumulated
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean of the accumulated pixels, `None` when empty
    pub fn mean(&self) -> Option<[f64; 3]> {
        (self.count > 0).then(|| {
            let n = self.count as f64;
            [self.sum[0] / n, self.sum[1] / n, self.sum[2] / n]
        })
    }
}
