/// Provides on-line statistics for a one-dimensional sample
///
/// This struct accumulates observations without actually storing them, and on the fly provides
/// basic descriptive parameters of the accumulated sample
///
/// # Examples
/// ```
/// use biomegen_statistics::OnlineStatistics;
/// let mut stats = OnlineStatistics::new();
/// for x in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     stats.accumulate(x);
/// }
/// assert_eq!(stats.count(), 8);
/// assert!((stats.avg() - 5.0).abs() < 1e-10);
/// assert!((stats.std_dev_population() - 2.0).abs() < 1e-10);
/// ```
#[derive(Clone, Default)]
pub struct OnlineStatistics {
    count: usize,
    m1: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl OnlineStatistics {

    /// Create a new object to gather statistics on a sample
    pub fn new() -> OnlineStatistics {
        OnlineStatistics { count: 0, m1: 0.0, m2: 0.0, min: 0.0, max: 0.0 }
    }

    /// Accumulate a single observation
    pub fn accumulate(&mut self, x: f64) {

        if self.count == 0 {                            // --- the very first observation becomes min and max
            self.min = x;
            self.max = x;
        }
        self.count += 1;
        let delta = x - self.m1;
        self.m1 += delta / self.count as f64;           // --- m1 is now the new average
        self.m2 += delta * (x - self.m1);

        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    /// Returns the number of observed samples
    pub fn count(&self) -> usize { self.count }

    /// Returns the smallest observed value
    pub fn min(&self) -> f64 { self.min }

    /// Returns the largest observed value
    pub fn max(&self) -> f64 { self.max }

    /// Returns the average of the observations
    pub fn avg(&self) -> f64 { self.m1 }

    /// Returns the sample variance (the n-1 denominator)
    pub fn var(&self) -> f64 {
        if self.count < 2 { return 0.0; }
        self.m2 / (self.count as f64 - 1.0)
    }

    /// Returns the sample standard deviation
    pub fn std_dev(&self) -> f64 { self.var().sqrt() }

    /// Returns the population standard deviation (the n denominator)
    pub fn std_dev_population(&self) -> f64 {
        if self.count == 0 { return 0.0; }
        (self.m2 / self.count as f64).sqrt()
    }
}

/// Estimates a percentile of a sorted sample by linear interpolation.
///
/// The p-th percentile is read at rank p/100 × (n−1); ranks falling between
/// two observations interpolate linearly between them.
///
/// # Arguments
/// * `sorted` - observations sorted ascending; must not be empty
/// * `p` - the percentile to estimate, in the [0, 100] range
///
/// # Examples
/// ```
/// use biomegen_statistics::percentile;
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// assert!((percentile(&data, 50.0) - 5.5).abs() < 1e-10);
/// assert!((percentile(&data, 95.0) - 9.55).abs() < 1e-10);
/// ```
pub fn percentile(sorted: &[f64], p: f64) -> f64 {

    assert!(!sorted.is_empty(), "percentile of an empty sample");

    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    if low == high { return sorted[low]; }

    let fraction = rank - low as f64;
    sorted[low] + (sorted[high] - sorted[low]) * fraction
}
