#![warn(missing_docs)]

//! A Rust library for estimating quantiles in a stream, using a buffered
//! merging [t-digest][Dunning19].
//!
//! Samples are `(value, weight)` pairs. They are collected in a bounded buffer
//! and periodically merged into a sorted, size-limited sequence of centroids.
//! The size of each centroid is bounded by a [`ScaleFunction`], so centroids
//! stay small (and estimates accurate) near the tails of the distribution and
//! grow toward the median. Memory usage depends on the compression factor only,
//! never on the length of the stream.
//!
//! [Dunning19]: https://github.com/tdunning/t-digest/blob/main/docs/t-digest-paper/histo.pdf
//!
//! # Examples
//!
//! ```
//! use merging_tdigest::TDigest;
//!
//! let mut digest = TDigest::new(100.0)?;
//!
//! // Add some elements.
//! digest.insert(1.0)?;
//! digest.insert(2.0)?;
//! digest.add(3.0, 1.0)?;
//!
//! // Get the median of the distribution.
//! assert_eq!(digest.quantile(0.5)?, 2.0);
//! # Ok::<(), merging_tdigest::Error>(())
//! ```

mod error;
pub mod scale;

pub use error::Error;
pub use scale::ScaleFunction;

use scale::MergeLimit;

/// Compression used by [`TDigest::default`].
pub const DEFAULT_COMPRESSION: f64 = 100.0;

const DEFAULT_SIZE: usize = DEFAULT_COMPRESSION as usize;

/// Stores the weight of points around their mean value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Centroid {
    mean: f64,
    weight: f64,
}

impl Centroid {
    /// Returns the mean of the points summarized by this centroid.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the total weight of the points summarized by this centroid.
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    fn absorb(&mut self, other: &Centroid) {
        let weight = self.weight + other.weight;
        if other.mean != self.mean {
            let delta = other.mean - self.mean;
            if delta.is_finite() {
                self.mean += delta * (other.weight / weight);
            } else {
                // Means of opposite signs near f64::MAX.
                self.mean =
                    self.mean * (self.weight / weight) + other.mean * (other.weight / weight);
            }
        }
        self.weight = weight;
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Config {
    compression: f64,
    scale_function: ScaleFunction,
    buffer_capacity: usize,
    max_centroids: usize,
}

impl Config {
    fn new(compression: f64, scale_function: ScaleFunction) -> Result<Self, Error> {
        let invalid = || Error::InvalidCompression(compression);

        let size = compression.ceil();
        if !(size > 0. && size < usize::MAX as f64) {
            return Err(invalid());
        }
        let size = size as usize;

        let buffer_capacity = size.checked_mul(5).ok_or_else(invalid)?;
        let max_centroids = size
            .checked_mul(2)
            .and_then(|n| n.checked_add(scale_function.centroid_margin()))
            .ok_or_else(invalid)?;
        Ok(Self {
            compression,
            scale_function,
            buffer_capacity,
            max_centroids,
        })
    }
}

/// A `TDigestBuilder` can be used to create a `TDigest` with custom
/// configuration.
///
/// Capacities left unset are derived from the compression: the buffer holds
/// `5 * ceil(compression)` samples and the store `2 * ceil(compression)`
/// centroids, plus a margin of 10 for [`ScaleFunction::WeightLimit`].
///
/// With the `serde` feature enabled, the builder can be deserialized from a
/// configuration file. Missing fields keep their defaults.
///
/// # Examples
///
/// ```
/// use merging_tdigest::{ScaleFunction, TDigestBuilder};
///
/// let mut builder = TDigestBuilder::new();
/// builder.compression(200.0);
/// builder.scale_function(ScaleFunction::KScale);
/// builder.buffer_capacity(4096);
///
/// let digest = builder.build()?;
/// assert_eq!(digest.max_centroids(), 400);
/// # Ok::<(), merging_tdigest::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct TDigestBuilder {
    compression: f64,
    scale_function: ScaleFunction,
    buffer_capacity: Option<usize>,
    max_centroids: Option<usize>,
}

impl TDigestBuilder {
    /// Constructs a new `TDigestBuilder`.
    ///
    /// This is the same as `TDigest::builder()`.
    pub fn new() -> Self {
        Self {
            compression: DEFAULT_COMPRESSION,
            scale_function: ScaleFunction::default(),
            buffer_capacity: None,
            max_centroids: None,
        }
    }

    /// Returns a `TDigest` that uses this `TDigestBuilder` configuration.
    ///
    /// # Errors
    ///
    /// Fails if the compression is not a positive, finite number small enough
    /// to size the digest, or if a capacity is zero or cannot be allocated.
    pub fn build(&self) -> Result<TDigest, Error> {
        if !(self.compression.is_finite() && self.compression > 0.) {
            return Err(Error::InvalidCompression(self.compression));
        }

        let mut config = Config::new(self.compression, self.scale_function)?;
        if let Some(buffer_capacity) = self.buffer_capacity {
            config.buffer_capacity = buffer_capacity;
        }
        if let Some(max_centroids) = self.max_centroids {
            config.max_centroids = max_centroids;
        }

        if config.buffer_capacity == 0 {
            return Err(Error::InvalidCapacity {
                name: "buffer_capacity",
                value: config.buffer_capacity,
            });
        }
        if config.max_centroids == 0 {
            return Err(Error::InvalidCapacity {
                name: "max_centroids",
                value: config.max_centroids,
            });
        }

        TDigest::from_config(config)
    }

    /// Sets the compression factor.
    ///
    /// Larger values keep more centroids, which lowers the error and raises
    /// memory usage.
    pub fn compression(&mut self, compression: f64) -> &mut Self {
        self.compression = compression;
        self
    }

    /// Sets the policy bounding the size of each centroid.
    pub fn scale_function(&mut self, scale_function: ScaleFunction) -> &mut Self {
        self.scale_function = scale_function;
        self
    }

    /// Sets how many slots, merged centroids included, may be occupied before
    /// buffered samples are merged.
    pub fn buffer_capacity(&mut self, buffer_capacity: usize) -> &mut Self {
        self.buffer_capacity = Some(buffer_capacity);
        self
    }

    /// Sets the maximum number of centroids kept after a merge.
    pub fn max_centroids(&mut self, max_centroids: usize) -> &mut Self {
        self.max_centroids = Some(max_centroids);
        self
    }
}

impl Default for TDigestBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Averages `x1` and `x2` with weights `w1` and `w2`, never leaving `[x1, x2]`.
fn weighted_average(x1: f64, w1: f64, x2: f64, w2: f64) -> f64 {
    if x1 <= x2 {
        weighted_average_sorted(x1, w1, x2, w2)
    } else {
        weighted_average_sorted(x2, w2, x1, w1)
    }
}

fn weighted_average_sorted(x1: f64, w1: f64, x2: f64, w2: f64) -> f64 {
    debug_assert!(x1 <= x2);
    let total = w1 + w2;
    let x = x1 * (w1 / total) + x2 * (w2 / total);
    x1.max(x.min(x2))
}

#[inline]
fn check_level(level: f64) -> Result<(), Error> {
    if (0.0..=1.0).contains(&level) {
        Ok(())
    } else {
        Err(Error::InvalidQuantile(level))
    }
}

/// T-digest data structure for approximating the quantiles of a distribution.
///
/// Centroids and buffered samples share a single vector: the first `merged`
/// slots hold the sorted centroids, the remaining ones hold samples waiting to
/// be merged.
///
/// A `TDigest` has no interior mutability. Feeding it from several threads
/// requires an external lock, or a single owning task.
///
/// # Examples
///
/// ```
/// use merging_tdigest::TDigest;
///
/// let mut digest = TDigest::new(100.0)?;
/// for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
///     digest.insert(value)?;
/// }
///
/// assert_eq!(digest.quantile(0.0)?, 1.0);
/// assert_eq!(digest.quantile(0.5)?, 3.0);
/// assert_eq!(digest.quantile(1.0)?, 5.0);
/// # Ok::<(), merging_tdigest::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TDigest {
    config: Config,
    centroids: Vec<Centroid>,
    merged: usize,
    total_weight: f64,
    unmerged_weight: f64,
    min: f64,
    max: f64,
}

impl TDigest {
    /// Creates an empty `TDigest` with the given compression and default
    /// capacities.
    ///
    /// # Errors
    ///
    /// Fails if `compression` is not a positive, finite number.
    ///
    /// # Examples
    ///
    /// ```
    /// use merging_tdigest::TDigest;
    ///
    /// let digest = TDigest::new(100.0)?;
    /// assert_eq!(digest.buffer_capacity(), 500);
    /// assert_eq!(digest.max_centroids(), 210);
    ///
    /// assert!(TDigest::new(0.0).is_err());
    /// # Ok::<(), merging_tdigest::Error>(())
    /// ```
    pub fn new(compression: f64) -> Result<Self, Error> {
        Self::builder().compression(compression).build()
    }

    /// Creates an empty `TDigest` with explicit capacities, e.g. to restore a
    /// digest sized elsewhere.
    ///
    /// # Errors
    ///
    /// Fails if `compression` is not a positive, finite number, or if either
    /// capacity is zero or cannot be allocated.
    pub fn with_capacity(
        compression: f64,
        buffer_capacity: usize,
        max_centroids: usize,
    ) -> Result<Self, Error> {
        Self::builder()
            .compression(compression)
            .buffer_capacity(buffer_capacity)
            .max_centroids(max_centroids)
            .build()
    }

    /// Creates a `TDigestBuilder` to configure a `TDigest`.
    ///
    /// This is the same as `TDigestBuilder::new()`.
    #[inline]
    pub fn builder() -> TDigestBuilder {
        TDigestBuilder::new()
    }

    fn from_config(config: Config) -> Result<Self, Error> {
        // Merged centroids never outnumber max_centroids, and add() merges
        // before the vector reaches buffer_capacity.
        let capacity = config.buffer_capacity.max(config.max_centroids.saturating_add(1));
        let mut centroids = Vec::new();
        if centroids.try_reserve_exact(capacity).is_err() {
            return Err(if config.buffer_capacity >= config.max_centroids {
                Error::InvalidCapacity {
                    name: "buffer_capacity",
                    value: config.buffer_capacity,
                }
            } else {
                Error::InvalidCapacity {
                    name: "max_centroids",
                    value: config.max_centroids,
                }
            });
        }
        Ok(Self::with_storage(config, centroids))
    }

    fn with_storage(config: Config, centroids: Vec<Centroid>) -> Self {
        Self {
            config,
            centroids,
            merged: 0,
            total_weight: 0.,
            unmerged_weight: 0.,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Returns the compression factor.
    #[inline]
    pub fn compression(&self) -> f64 {
        self.config.compression
    }

    /// Returns the scale function used when merging.
    #[inline]
    pub fn scale_function(&self) -> ScaleFunction {
        self.config.scale_function
    }

    /// Returns the number of slots that trigger a merge when filled.
    #[inline]
    pub fn buffer_capacity(&self) -> usize {
        self.config.buffer_capacity
    }

    /// Returns the maximum number of centroids kept after a merge.
    #[inline]
    pub fn max_centroids(&self) -> usize {
        self.config.max_centroids
    }

    /// Returns the total weight of all samples, merged or not.
    ///
    /// # Examples
    ///
    /// ```
    /// use merging_tdigest::TDigest;
    ///
    /// let mut digest = TDigest::new(100.0)?;
    /// digest.add(1.0, 0.5)?;
    /// digest.add(2.0, 2.0)?;
    /// assert_eq!(digest.total_weight(), 2.5);
    /// # Ok::<(), merging_tdigest::Error>(())
    /// ```
    #[inline]
    pub fn total_weight(&self) -> f64 {
        self.total_weight + self.unmerged_weight
    }

    /// Returns the weight of the samples still waiting in the buffer.
    #[inline]
    pub fn unmerged_weight(&self) -> f64 {
        self.unmerged_weight
    }

    /// Returns `true` if no sample was added to the t-digest.
    ///
    /// # Examples
    ///
    /// ```
    /// use merging_tdigest::TDigest;
    ///
    /// let mut digest = TDigest::default();
    /// assert!(digest.is_empty());
    /// digest.insert(1.0)?;
    /// assert!(!digest.is_empty());
    /// # Ok::<(), merging_tdigest::Error>(())
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }

    /// Returns the smallest centroid mean ever merged, or `None` if nothing was
    /// merged yet.
    ///
    /// Buffered samples are not taken into account until the next merge.
    ///
    /// # Examples
    ///
    /// ```
    /// use merging_tdigest::TDigest;
    ///
    /// let mut digest = TDigest::new(100.0)?;
    /// digest.insert(4.0)?;
    /// digest.insert(2.0)?;
    /// assert_eq!(digest.min(), None);
    ///
    /// digest.flush();
    /// assert_eq!(digest.min(), Some(2.0));
    /// assert_eq!(digest.max(), Some(4.0));
    /// # Ok::<(), merging_tdigest::Error>(())
    /// ```
    #[inline]
    pub fn min(&self) -> Option<f64> {
        (self.merged > 0).then_some(self.min)
    }

    /// Returns the largest centroid mean ever merged, or `None` if nothing was
    /// merged yet.
    #[inline]
    pub fn max(&self) -> Option<f64> {
        (self.merged > 0).then_some(self.max)
    }

    /// Returns the merged centroids, sorted by mean.
    ///
    /// Call [`flush`](TDigest::flush) first to include buffered samples.
    #[inline]
    pub fn centroids(&self) -> &[Centroid] {
        &self.centroids[..self.merged]
    }

    /// Clears the t-digest, removing all values but keeping its configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use merging_tdigest::TDigest;
    ///
    /// let mut digest = TDigest::new(100.0)?;
    /// digest.insert(1.0)?;
    /// digest.clear();
    /// assert!(digest.is_empty());
    /// assert!(digest.quantile(0.5)?.is_nan());
    /// # Ok::<(), merging_tdigest::Error>(())
    /// ```
    pub fn clear(&mut self) {
        self.centroids.clear();
        self.merged = 0;
        self.total_weight = 0.;
        self.unmerged_weight = 0.;
        self.min = f64::INFINITY;
        self.max = f64::NEG_INFINITY;
    }

    /// Adds a value with a weight of one to the t-digest.
    ///
    /// # Errors
    ///
    /// Fails if `value` is not finite.
    #[inline]
    pub fn insert(&mut self, value: f64) -> Result<(), Error> {
        self.add(value, 1.)
    }

    /// Adds a weighted value to the t-digest.
    ///
    /// The sample is buffered. If the buffer and the merged centroids fill the
    /// configured buffer capacity, buffered samples are merged first.
    ///
    /// # Errors
    ///
    /// Fails if `value` is not finite, or if `weight` is not a positive,
    /// finite number, or if it would push the total weight past `f64::MAX`.
    /// The t-digest is left untouched in all cases.
    ///
    /// # Examples
    ///
    /// ```
    /// use merging_tdigest::{Error, TDigest};
    ///
    /// let mut digest = TDigest::new(100.0)?;
    /// digest.add(1.0, 3.0)?;
    /// assert!(matches!(digest.add(f64::NAN, 1.0), Err(Error::InvalidValue(_))));
    /// assert_eq!(digest.add(f64::INFINITY, 1.0), Err(Error::InvalidValue(f64::INFINITY)));
    /// assert_eq!(digest.add(1.0, 0.0), Err(Error::InvalidWeight(0.0)));
    /// assert_eq!(digest.total_weight(), 3.0);
    /// # Ok::<(), merging_tdigest::Error>(())
    /// ```
    pub fn add(&mut self, value: f64, weight: f64) -> Result<(), Error> {
        if !value.is_finite() {
            return Err(Error::InvalidValue(value));
        }
        if !(weight.is_finite() && weight > 0. && (self.total_weight() + weight).is_finite()) {
            return Err(Error::InvalidWeight(weight));
        }

        if self.centroids.len() + 1 >= self.config.buffer_capacity {
            self.flush();
        }
        self.centroids.push(Centroid { mean: value, weight });
        self.unmerged_weight += weight;
        Ok(())
    }

    /// Merges buffered samples into the centroids.
    ///
    /// Does nothing if the buffer is empty. Queries through
    /// [`quantile`](TDigest::quantile) flush implicitly.
    pub fn flush(&mut self) {
        let buffered = self.centroids.len() - self.merged;
        if buffered == 0 {
            return;
        }

        self.total_weight += self.unmerged_weight;
        self.unmerged_weight = 0.;
        self.centroids.sort_by(|l, r| l.mean.total_cmp(&r.mean));

        let mut limit = MergeLimit::new(
            self.config.scale_function,
            self.config.compression,
            self.total_weight,
        );
        // Weight of the centroids already emitted, the one at l_index excluded.
        let mut w_so_far = 0.;
        let mut l_index = 0;
        for r_index in 1..self.centroids.len() {
            let r = self.centroids[r_index];
            let l = &mut self.centroids[l_index];
            if limit.accepts(w_so_far, l.weight + r.weight) {
                l.absorb(&r);
            } else {
                w_so_far += l.weight;
                limit.advance(w_so_far);
                l_index += 1;
                self.centroids[l_index] = r;
            }
        }
        self.centroids.truncate(l_index + 1);

        if let (Some(first), Some(last)) = (self.centroids.first(), self.centroids.last()) {
            self.min = self.min.min(first.mean);
            self.max = self.max.max(last.mean);
        }

        self.compress_brute();
        self.merged = self.centroids.len();
        self.debug_check_weights();

        tracing::trace!(
            buffered,
            centroids = self.merged,
            total_weight = self.total_weight,
            "Merged buffered samples."
        );
    }

    // Ensures centroids.len() <= max_centroids whatever the scale function
    // decided above.
    fn compress_brute(&mut self) {
        let max_centroids = self.config.max_centroids;
        let before = self.centroids.len();
        if before <= max_centroids {
            return;
        }

        let batch_size = before.div_ceil(max_centroids);
        debug_assert!(batch_size >= 2);

        let mut l_index = 0;
        for r_index in 1..before {
            let r = self.centroids[r_index];
            if r_index % batch_size == 0 {
                l_index += 1;
                self.centroids[l_index] = r;
            } else {
                self.centroids[l_index].absorb(&r);
            }
        }
        self.centroids.truncate(l_index + 1);
        debug_assert!(self.centroids.len() <= max_centroids);

        tracing::debug!(
            before,
            after = self.centroids.len(),
            max_centroids,
            "Collapsed centroids to fit the store capacity."
        );
    }

    fn debug_check_weights(&self) {
        if cfg!(debug_assertions) {
            let sum: f64 = self.centroids().iter().map(|c| c.weight).sum();
            debug_assert!(
                (sum - self.total_weight).abs() <= self.total_weight * 1e-9,
                "centroid weights sum to {} but total weight is {}",
                sum,
                self.total_weight
            );
        }
    }

    /// Returns the estimated quantile of the t-digest.
    ///
    /// Buffered samples are merged first, so the estimate reflects every value
    /// added so far. Returns NaN if the t-digest is empty.
    ///
    /// This method expects `self` to be mutable, since buffered samples may be
    /// merged. If you require an immutable, shared reference to compute
    /// quantiles, consider using `quantiles` instead.
    ///
    /// # Errors
    ///
    /// Fails if `level` is not in `[0, 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use merging_tdigest::TDigest;
    ///
    /// let mut digest = TDigest::new(100.0)?;
    /// digest.add(1.0, 1.0)?;
    /// digest.add(3.0, 1.0)?;
    /// assert_eq!(digest.quantile(0.5)?, 2.0);
    /// assert!(digest.quantile(1.5).is_err());
    /// # Ok::<(), merging_tdigest::Error>(())
    /// ```
    pub fn quantile(&mut self, level: f64) -> Result<f64, Error> {
        check_level(level)?;
        self.flush();
        Ok(self.quantile_merged(level))
    }

    fn quantile_merged(&self, level: f64) -> f64 {
        if self.total_weight == 0. {
            return f64::NAN;
        }

        let centroids = self.centroids();
        let (first, last) = match centroids {
            [] => return f64::NAN,
            [only] => return only.mean,
            [first, .., last] => (first, last),
        };

        // Offset of the quantile if all samples were laid out in order.
        let index = level * self.total_weight;

        // Between min and the middle of the first centroid.
        if index < first.weight / 2. {
            return weighted_average(self.min, first.weight / 2. - index, first.mean, index);
        }

        let mut weight_so_far = first.weight / 2.;
        for pair in centroids.windows(2) {
            let (l, r) = (&pair[0], &pair[1]);
            let dw = (l.weight + r.weight) / 2.;
            if weight_so_far + dw > index {
                let z1 = index - weight_so_far;
                let z2 = weight_so_far + dw - index;
                return weighted_average(l.mean, z2, r.mean, z1);
            }
            weight_so_far += dw;
        }

        // Between the middle of the last centroid and max.
        let half = last.weight / 2.;
        let z1 = (index - (self.total_weight - half)).clamp(0., half);
        let z2 = half - z1;
        weighted_average(last.mean, z2, self.max, z1)
    }

    /// Creates an immutable quantile estimator from the t-digest.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::thread;
    ///
    /// use merging_tdigest::TDigest;
    ///
    /// let mut digest = TDigest::new(100.0)?;
    /// for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
    ///     digest.insert(value)?;
    /// }
    /// let quantiles = digest.quantiles();
    ///
    /// thread::scope(|s| {
    ///     s.spawn(|| {
    ///         assert_eq!(quantiles.get(0.0), Ok(1.0));
    ///     });
    ///     s.spawn(|| {
    ///         assert_eq!(quantiles.get(0.5), Ok(3.0));
    ///     });
    ///     s.spawn(|| {
    ///         assert_eq!(quantiles.get(1.0), Ok(5.0));
    ///     });
    /// });
    /// # Ok::<(), merging_tdigest::Error>(())
    /// ```
    pub fn quantiles(&mut self) -> Quantiles<'_> {
        self.flush();
        Quantiles { digest: self }
    }
}

impl Default for TDigest {
    /// Creates an empty `TDigest` with a compression of
    /// [`DEFAULT_COMPRESSION`] and the weight-limit scale function.
    #[inline]
    fn default() -> Self {
        let scale_function = ScaleFunction::default();
        let config = Config {
            compression: DEFAULT_COMPRESSION,
            scale_function,
            buffer_capacity: 5 * DEFAULT_SIZE,
            max_centroids: 2 * DEFAULT_SIZE + scale_function.centroid_margin(),
        };
        let centroids = Vec::with_capacity(config.buffer_capacity);
        Self::with_storage(config, centroids)
    }
}

/// Estimates quantiles of a t-digest.
///
/// This `struct` is created by the [`quantiles`] method on [`TDigest`]. See its
/// documentation for more.
///
/// [`quantiles`]: TDigest::quantiles
#[derive(Clone, Copy, Debug)]
pub struct Quantiles<'a> {
    digest: &'a TDigest,
}

impl Quantiles<'_> {
    /// Returns the estimated quantile of the t-digest.
    ///
    /// # Errors
    ///
    /// Fails if `level` is not in `[0, 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use merging_tdigest::TDigest;
    ///
    /// let mut digest = TDigest::new(100.0)?;
    /// for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
    ///     digest.insert(value)?;
    /// }
    /// let quantiles = digest.quantiles();
    /// assert_eq!(quantiles.get(0.0)?, 1.0);
    /// assert_eq!(quantiles.get(0.5)?, 3.0);
    /// assert_eq!(quantiles.get(1.0)?, 5.0);
    /// # Ok::<(), merging_tdigest::Error>(())
    /// ```
    pub fn get(&self, level: f64) -> Result<f64, Error> {
        check_level(level)?;
        Ok(self.digest.quantile_merged(level))
    }
}
