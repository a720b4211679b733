use crate::constants::EMA_ALPHA;

/// Exponential moving average of a binary outcome stream.
///
/// `new = alpha * (outcome ? 1.0 : 0.0) + (1 - alpha) * old`, rounded to
/// 3 decimal places so stored scores stay reproducible across runs.
///
/// Precondition: `old_score` is in [0, 1]. Callers own that invariant; it
/// is not re-checked here.
pub fn update_score(old_score: f64, is_correct: bool, alpha: f64) -> f64 {
    let outcome = if is_correct { 1.0 } else { 0.0 };
    round3(alpha * outcome + (1.0 - alpha) * old_score)
}

/// `update_score` with the platform-wide smoothing factor.
pub fn update_score_default(old_score: f64, is_correct: bool) -> f64 {
    update_score(old_score, is_correct, EMA_ALPHA)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
