use chrono::{Duration, NaiveDate};

use crate::constants::{LEITNER_BOX_MAX, LEITNER_BOX_MIN};

/// Move a concept between Leitner boxes after an attempt.
///
/// Correct answers climb one box (clamped at box 4); any miss drops
/// straight back to box 1 with no partial credit.
pub fn advance_box(current_box: u8, is_correct: bool) -> u8 {
    if is_correct {
        current_box.saturating_add(1).min(LEITNER_BOX_MAX)
    } else {
        LEITNER_BOX_MIN
    }
}

/// Review interval for a box, in days.
///
/// Box 1: 1 day, box 2: 3 days, box 3: 7 days, box 4: 14 days.
/// Out-of-range values fall back to the shortest interval.
pub fn review_interval_days(leitner_box: u8) -> i64 {
    match leitner_box {
        1 => 1,
        2 => 3,
        3 => 7,
        4 => 14,
        _ => 1,
    }
}

pub fn next_review_date(leitner_box: u8, today: NaiveDate) -> NaiveDate {
    today + Duration::days(review_interval_days(leitner_box))
}
