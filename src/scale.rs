//! Scale functions bounding how much weight a single centroid may hold.
//!
//! A scale function maps a position in quantile space to the largest weight a
//! centroid at that position may carry. Both policies keep centroids small near
//! `q = 0` and `q = 1` and let them grow toward the median, which is where the
//! t-digest gets its accuracy at the tails.

use std::f64::consts::{FRAC_PI_2, PI};

/// The policy deciding whether a centroid may absorb its right neighbour.
///
/// # Examples
///
/// ```
/// use merging_tdigest::{ScaleFunction, TDigest};
///
/// let mut digest = TDigest::builder()
///     .compression(50.0)
///     .scale_function(ScaleFunction::KScale)
///     .build()?;
/// digest.insert(1.0)?;
/// assert_eq!(digest.scale_function(), ScaleFunction::KScale);
/// # Ok::<(), merging_tdigest::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ScaleFunction {
    /// Bounds the centroid weight by `q (1 - q)` at both of its edges.
    ///
    /// This is cheap to evaluate and tends to produce slightly more centroids
    /// than strictly necessary.
    #[default]
    WeightLimit,

    /// Allows a centroid to span at most one unit of the [`k_scale`].
    KScale,
}

impl ScaleFunction {
    /// Extra store slots reserved on top of `2 * ceil(compression)`.
    pub(crate) fn centroid_margin(self) -> usize {
        match self {
            // Smaller centroids than necessary, hence a few more of them.
            ScaleFunction::WeightLimit => 10,
            ScaleFunction::KScale => 0,
        }
    }
}

/// Maps a quantile `q` in `[0, 1]` onto the centroid index scale `[0, compression]`.
///
/// The mapping is steep near `q = 0` and `q = 1`, so each unit of `k` covers
/// less quantile mass at the tails than near the median.
///
/// # Examples
///
/// ```
/// use merging_tdigest::scale::k_scale;
///
/// assert_eq!(k_scale(0.0, 100.0), 0.0);
/// assert!((k_scale(0.5, 100.0) - 50.0).abs() < 1e-6);
/// assert!((k_scale(1.0, 100.0) - 100.0).abs() < 1e-9);
/// ```
pub fn k_scale(q: f64, compression: f64) -> f64 {
    compression * (fast_asin(2. * q - 1.) + FRAC_PI_2) / PI
}

/// Inverse of [`k_scale`]: maps a centroid index back to a quantile.
///
/// Values of `k` past `compression` saturate at `q = 1`.
pub fn k_scale_inverse(k: f64, compression: f64) -> f64 {
    ((k.min(compression) * PI / compression - FRAC_PI_2).sin() + 1.) / 2.
}

const ASIN_MODELS: [[f64; 6]; 4] = [
    [
        0.2955302411,
        1.2221903614,
        0.1488583743,
        0.2422015816,
        -0.3688700895,
        0.0733398445,
    ],
    [
        -0.0430991920,
        0.9594035750,
        -0.0362312299,
        0.1204623351,
        0.0457029620,
        -0.0026025285,
    ],
    [
        -0.034873933724,
        1.054796752703,
        -0.194127063385,
        0.283963735636,
        0.023800124916,
        -0.000872727381,
    ],
    [
        -0.37588391875,
        2.61991859025,
        -2.48835406886,
        1.48605387425,
        0.00857627492,
        -0.00015802871,
    ],
];

// Region boundaries on [0, 1]. Neighbouring regions overlap and the models are
// blended linearly across each overlap.
const C0_HIGH: f64 = 0.1;
const C1_HIGH: f64 = 0.55;
const C2_LOW: f64 = 0.5;
const C2_HIGH: f64 = 0.8;
const C3_LOW: f64 = 0.75;
const C3_HIGH: f64 = 0.9;
const C4_LOW: f64 = 0.87;

/// Approximates `x.asin()` for `x` in `[-1, 1]`.
///
/// The range `[0, 1]` is split into five overlapping regions. The first four
/// use rational models over `{1, x, x², x³, 1/(1-x), 1/(1-x)²}`, the last one
/// is the real `asin`. Mixing weights interpolate linearly inside each
/// overlap, which keeps the result continuous and monotonic. Negative inputs
/// are mirrored.
///
/// The absolute error against `f64::asin` stays below `1e-3` on the whole
/// domain.
///
/// # Examples
///
/// ```
/// use merging_tdigest::scale::fast_asin;
///
/// for x in [-1.0, -0.3, 0.0, 0.42, 0.95, 1.0] {
///     assert!((fast_asin(x) - f64::asin(x)).abs() < 1e-3);
/// }
/// ```
pub fn fast_asin(x: f64) -> f64 {
    if x < 0. {
        return -fast_asin(-x);
    }
    if x > C3_HIGH {
        return x.asin();
    }

    let inv = 1. / (1. - x);
    let vars = [1., x, x * x, x * x * x, inv, inv * inv];

    let x0 = unit_clamp((C0_HIGH - x) / C0_HIGH);
    let x1 = unit_clamp((C1_HIGH - x) / (C1_HIGH - C2_LOW));
    let x2 = unit_clamp((C2_HIGH - x) / (C2_HIGH - C3_LOW));
    let x3 = unit_clamp((C3_HIGH - x) / (C3_HIGH - C4_LOW));

    let mixes = [x0, (1. - x0) * x1, (1. - x1) * x2, (1. - x2) * x3];

    let mut r = 0.;
    for (mix, model) in mixes.iter().zip(ASIN_MODELS.iter()) {
        // Most regions have a zero weight, skip evaluating them.
        if *mix > 0. {
            r += mix * eval_model(model, &vars);
        }
    }
    let mix4 = 1. - x3;
    if mix4 > 0. {
        r += mix4 * x.asin();
    }
    r
}

#[inline]
fn eval_model(model: &[f64; 6], vars: &[f64; 6]) -> f64 {
    model.iter().zip(vars.iter()).map(|(m, v)| m * v).sum()
}

#[inline]
fn unit_clamp(v: f64) -> f64 {
    if v <= 0. {
        0.
    } else if v >= 1. {
        1.
    } else {
        v
    }
}

/// Scale function state for a single merge pass.
///
/// `w_so_far` is always the weight of the centroids already emitted by the
/// pass, excluding the one currently accumulating.
#[derive(Debug)]
pub(crate) struct MergeLimit {
    scale_function: ScaleFunction,
    compression: f64,
    total_weight: f64,
    normalizer: f64,
    weight_limit: f64,
}

impl MergeLimit {
    pub(crate) fn new(scale_function: ScaleFunction, compression: f64, total_weight: f64) -> Self {
        let mut limit = Self {
            scale_function,
            compression,
            total_weight,
            normalizer: compression / (PI * total_weight),
            weight_limit: 0.,
        };
        limit.advance(0.);
        limit
    }

    /// Returns `true` if a centroid starting at `w_so_far` may grow to `proposed`.
    #[inline]
    pub(crate) fn accepts(&self, w_so_far: f64, proposed: f64) -> bool {
        match self.scale_function {
            ScaleFunction::WeightLimit => {
                let z = proposed * self.normalizer;
                let q0 = w_so_far / self.total_weight;
                let q2 = (w_so_far + proposed) / self.total_weight;
                z * z <= q0 * (1. - q0) && z * z <= q2 * (1. - q2)
            }
            ScaleFunction::KScale => w_so_far + proposed <= self.weight_limit,
        }
    }

    /// Moves the limit to a new centroid starting at `w_so_far`.
    #[inline]
    pub(crate) fn advance(&mut self, w_so_far: f64) {
        if self.scale_function == ScaleFunction::KScale {
            let q = (w_so_far / self.total_weight).clamp(0., 1.);
            let k = k_scale(q, self.compression);
            self.weight_limit = self.total_weight * k_scale_inverse(k + 1., self.compression);
        }
    }
}
