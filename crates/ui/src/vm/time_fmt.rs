use services::Countdown;
use vocab_core::time::format_mm_ss;

#[must_use]
pub fn format_elapsed(secs: u64) -> String {
    format_mm_ss(secs)
}

/// CSS class for the timer region.
#[must_use]
pub fn timer_class(countdown: &Countdown) -> &'static str {
    if countdown.is_urgent() {
        "timer text-danger"
    } else {
        "timer"
    }
}
