/// z-score for a 95% confidence level
const Z: f64 = 1.96;

/// Lower bound of the Wilson score interval for a positive/negative review
/// sample.
///
/// Answers "how confident are we, at 95% confidence, that the true positive
/// ratio is at least this high". Robust for small samples, which is what
/// makes it usable as a review-quality signal for games with a handful of
/// reviews. Returns 0.0 when there are no reviews at all: no evidence means
/// no confidence, not an error.
pub fn wilson_lower_bound(positive: i64, negative: i64) -> f64 {
    let n = (positive + negative) as f64;
    if n == 0.0 {
        return 0.0;
    }

    let phat = positive as f64 / n;

    (phat + Z * Z / (2.0 * n) - Z * ((phat * (1.0 - phat) + Z * Z / (4.0 * n)) / n).sqrt())
        / (1.0 + Z * Z / n)
}
