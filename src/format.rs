//! Display formatting for raw record fields.
//!
//! Everything here is a pure function: no clock reads except in the explicit
//! `*_now` wrappers, no I/O. Dates are rendered in UTC with en-US month and
//! weekday names; currency amounts use en-US grouping with no fractional
//! digits.

use chrono::{DateTime, Utc};

/// Whether a salary bound counts as present. Zero is treated as "not given",
/// matching how postings with a `0` bound are entered by employers.
pub fn salary_present(bound: Option<f64>) -> bool {
    bound.is_some_and(|v| v != 0.0 && !v.is_nan())
}

/// Format a salary range for a job card.
///
/// - both bounds → `"$120,000 - $160,000"`
/// - only min → `"From $80,000"`
/// - only max → `"Up to $50,000"`
/// - neither → `"Competitive salary"`
pub fn format_salary(min: Option<f64>, max: Option<f64>, currency: &str) -> String {
    let min = min.filter(|_| salary_present(min));
    let max = max.filter(|_| salary_present(max));
    match (min, max) {
        (Some(lo), Some(hi)) => format!(
            "{} - {}",
            format_currency(lo, currency),
            format_currency(hi, currency)
        ),
        (Some(lo), None) => format!("From {}", format_currency(lo, currency)),
        (None, Some(hi)) => format!("Up to {}", format_currency(hi, currency)),
        (None, None) => "Competitive salary".to_string(),
    }
}

/// Format an amount as whole-unit currency, e.g. `"$1,250"` or `"€90,000"`.
///
/// Currencies without a known symbol are prefixed by their code and a
/// non-breaking space (`"CHF 5,000"`).
pub fn format_currency(amount: f64, currency: &str) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = group_thousands(rounded.abs() as u64);
    let code = currency.to_ascii_uppercase();
    match currency_symbol(&code) {
        Some(symbol) => format!("{sign}{symbol}{digits}"),
        None => format!("{sign}{code}\u{a0}{digits}"),
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    Some(match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "INR" => "₹",
        "CAD" => "CA$",
        "AUD" => "A$",
        "NZD" => "NZ$",
        "CNY" => "CN¥",
        "KRW" => "₩",
        "BRL" => "R$",
        "MXN" => "MX$",
        "ILS" => "₪",
        _ => return None,
    })
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Long-form date: `"March 5, 2025"`.
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Webinar schedule line: `"Monday, March 3, 2025 at 02:00 PM"`.
pub fn format_webinar_date(date: DateTime<Utc>) -> String {
    date.format("%A, %B %-d, %Y at %I:%M %p").to_string()
}

/// Relative age of a posting against a fixed `now`.
///
/// Thresholds use floored whole hours, then floored days and weeks:
/// `<1h` "Just posted", `<24h` "Nh ago", `<48h` "Yesterday", `<7d` "Nd ago",
/// `<14d` "1w ago", `<28d` "Nw ago", otherwise the long-form date.
/// Timestamps in the future count as just posted.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let millis = (now - then).num_milliseconds();
    let hours = millis.div_euclid(60 * 60 * 1000);

    if hours < 1 {
        return "Just posted".to_string();
    }
    if hours < 24 {
        return format!("{hours}h ago");
    }
    if hours < 48 {
        return "Yesterday".to_string();
    }

    let days = hours / 24;
    if days < 7 {
        return format!("{days}d ago");
    }
    if days < 14 {
        return "1w ago".to_string();
    }

    let weeks = days / 7;
    if weeks < 4 {
        return format!("{weeks}w ago");
    }

    format_date(then)
}

/// URL identifier for blog posts.
///
/// Lower-cases, drops everything except ASCII word characters and spaces,
/// turns each run of spaces into one hyphen and trims hyphens from both
/// ends. Distinct titles may collide; uniqueness is the backend's concern.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == ' ')
        .collect();

    let mut slug = String::with_capacity(kept.len());
    let mut in_space = false;
    for ch in kept.chars() {
        if ch == ' ' {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.push(ch);
            in_space = false;
        }
    }
    slug.trim_matches(|c| c == '-' || c == ' ').to_string()
}

/// Glyph shown when the account has no usable email.
pub const AVATAR_FALLBACK: &str = "?";

/// Avatar fallback: the first character of the account email, upper-cased.
pub fn initials(email: &str) -> String {
    email
        .trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| AVATAR_FALLBACK.to_string())
}

/// Compact counter for badges: `"+2 more"` when a list is truncated.
pub fn overflow_label(total: usize, shown: usize) -> Option<String> {
    (total > shown).then(|| format!("+{} more", total - shown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    // =========================================================================
    // Salary
    // =========================================================================

    #[test]
    fn salary_both_bounds() {
        assert_eq!(
            format_salary(Some(120_000.0), Some(160_000.0), "USD"),
            "$120,000 - $160,000"
        );
    }

    #[test]
    fn salary_only_max() {
        assert_eq!(format_salary(None, Some(50_000.0), "USD"), "Up to $50,000");
    }

    #[test]
    fn salary_only_min() {
        assert_eq!(format_salary(Some(80_000.0), None, "USD"), "From $80,000");
    }

    #[test]
    fn salary_neither() {
        assert_eq!(format_salary(None, None, "USD"), "Competitive salary");
    }

    #[test]
    fn salary_zero_bound_counts_as_absent() {
        assert_eq!(format_salary(Some(0.0), Some(70_000.0), "USD"), "Up to $70,000");
    }

    #[test]
    fn salary_other_currencies() {
        assert_eq!(format_salary(Some(90_000.0), None, "EUR"), "From €90,000");
        assert_eq!(format_currency(5_000.0, "CHF"), "CHF\u{a0}5,000");
        assert_eq!(format_currency(5_000.0, "gbp"), "£5,000");
    }

    #[test]
    fn currency_rounds_to_whole_units() {
        assert_eq!(format_currency(999.5, "USD"), "$1,000");
        assert_eq!(format_currency(1_234_567.4, "USD"), "$1,234,567");
        assert_eq!(format_currency(12.0, "USD"), "$12");
    }

    // =========================================================================
    // Dates
    // =========================================================================

    #[test]
    fn long_form_date() {
        let date = Utc.with_ymd_and_hms(2025, 3, 5, 9, 30, 0).unwrap();
        assert_eq!(format_date(date), "March 5, 2025");
    }

    #[test]
    fn webinar_date_line() {
        let date = Utc.with_ymd_and_hms(2025, 3, 3, 14, 0, 0).unwrap();
        assert_eq!(format_webinar_date(date), "Monday, March 3, 2025 at 02:00 PM");
    }

    #[test]
    fn time_ago_thresholds() {
        let now = now();
        assert_eq!(time_ago(now - Duration::minutes(30), now), "Just posted");
        assert_eq!(time_ago(now - Duration::hours(5), now), "5h ago");
        assert_eq!(time_ago(now - Duration::hours(30), now), "Yesterday");
        assert_eq!(time_ago(now - Duration::days(3), now), "3d ago");
        assert_eq!(time_ago(now - Duration::days(10), now), "1w ago");
        assert_eq!(time_ago(now - Duration::days(40), now), "May 6, 2025");
    }

    #[test]
    fn time_ago_boundaries_floor() {
        let now = now();
        assert_eq!(time_ago(now - Duration::minutes(59), now), "Just posted");
        assert_eq!(time_ago(now - Duration::minutes(60), now), "1h ago");
        assert_eq!(time_ago(now - Duration::minutes(24 * 60 - 1), now), "23h ago");
        assert_eq!(time_ago(now - Duration::hours(48), now), "2d ago");
        assert_eq!(time_ago(now - Duration::days(14), now), "2w ago");
        assert_eq!(time_ago(now - Duration::days(27), now), "3w ago");
        assert_eq!(time_ago(now - Duration::days(28), now), "May 18, 2025");
    }

    #[test]
    fn time_ago_future_is_just_posted() {
        let now = now();
        assert_eq!(time_ago(now + Duration::hours(3), now), "Just posted");
    }

    // =========================================================================
    // Slugs and initials
    // =========================================================================

    #[test]
    fn slugify_strips_punctuation() {
        assert_eq!(slugify("Senior Engineer, Remote!"), "senior-engineer-remote");
    }

    #[test]
    fn slugify_collapses_and_trims() {
        assert_eq!(slugify("  Ten   Interview Tips  "), "ten-interview-tips");
        assert_eq!(slugify("C++ & Rust: 2025"), "c-rust-2025");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn slugify_is_stable() {
        let title = "What's New in Tech Hiring?";
        assert_eq!(slugify(title), slugify(title));
        assert_eq!(slugify(title), "whats-new-in-tech-hiring");
    }

    #[test]
    fn slugify_drops_non_ascii() {
        assert_eq!(slugify("Café Résumé"), "caf-rsum");
    }

    #[test]
    fn initials_from_email() {
        assert_eq!(initials("jane@example.com"), "J");
        assert_eq!(initials("Zed@example.com"), "Z");
        assert_eq!(initials("9lives@example.com"), "9");
        assert_eq!(initials(""), "?");
        assert_eq!(initials("   "), "?");
    }

    #[test]
    fn overflow_label_only_when_truncated() {
        assert_eq!(overflow_label(5, 3).as_deref(), Some("+2 more"));
        assert_eq!(overflow_label(3, 3), None);
    }
}
