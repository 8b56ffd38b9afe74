//! Renderings of the retry-after hint.
//!
//! The body carries a human-readable duration (`"30s"`, `"5m0s"`) while the
//! `Retry-After` header carries whole seconds.

use std::time::Duration;

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Render a duration the way clients of the envelope expect it in the body.
///
/// Whole units are spelled out from hours down to seconds; fractional
/// seconds keep their significant digits. Sub-second values switch to
/// `ms`, `µs` or `ns`.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use err_envelope::domain::format_retry_after;
///
/// assert_eq!(format_retry_after(Duration::from_secs(30)), "30s");
/// assert_eq!(format_retry_after(Duration::from_secs(300)), "5m0s");
/// assert_eq!(format_retry_after(Duration::from_millis(1500)), "1.5s");
/// ```
#[must_use]
pub fn format_retry_after(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_owned();
    }

    if nanos < NANOS_PER_SECOND {
        let (unit, scale, width) = if nanos < 1_000 {
            ("ns", 1, 0)
        } else if nanos < 1_000_000 {
            ("µs", 1_000, 3)
        } else {
            ("ms", 1_000_000, 6)
        };
        let mut out = nanos.div_euclid(scale).to_string();
        push_fraction(&mut out, nanos.rem_euclid(scale), width);
        out.push_str(unit);
        return out;
    }

    let secs = nanos.div_euclid(NANOS_PER_SECOND);
    let hours = secs.div_euclid(3600);
    let minutes = secs.div_euclid(60).rem_euclid(60);
    let seconds = secs.rem_euclid(60);
    let mut out = match (hours, minutes) {
        (0, 0) => seconds.to_string(),
        (0, _) => format!("{minutes}m{seconds}"),
        _ => format!("{hours}h{minutes}m{seconds}"),
    };
    push_fraction(&mut out, nanos.rem_euclid(NANOS_PER_SECOND), 9);
    out.push('s');
    out
}

fn push_fraction(out: &mut String, remainder: u128, width: usize) {
    if remainder == 0 || width == 0 {
        return;
    }
    let digits = format!("{remainder:0width$}");
    out.push('.');
    out.push_str(digits.trim_end_matches('0'));
}

/// Whole seconds advertised in the `Retry-After` header.
///
/// Rounds up and never returns less than one: a sub-second hint still asks
/// the client to wait a full second.
#[must_use]
pub fn retry_after_header_seconds(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    let ceiled = if duration.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs
    };
    ceiled.max(1)
}
