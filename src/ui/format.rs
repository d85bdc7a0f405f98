//! Display helpers shared by the pages.

use std::time::SystemTime;

/// `₹1,234.50` style amount.
pub fn format_amount(value: f64) -> String {
    let negative = value < 0.0;
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative && fixed != "0.00" { "-" } else { "" };
    format!("{sign}₹{grouped}.{fraction}")
}

pub fn format_weight(kg: f64) -> String {
    format!("{kg:.2} kg")
}

/// "just now", "5 min ago", "3 h ago" or "2 d ago".
pub fn humanize_age(time: SystemTime) -> String {
    let secs = time.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    match secs {
        0..=59 => "just now".to_string(),
        60..=3599 => format!("{} min ago", secs / 60),
        3600..=86_399 => format!("{} h ago", secs / 3600),
        _ => format!("{} d ago", secs / 86_400),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn amounts_are_grouped_in_thousands() {
        assert_eq!(format_amount(0.0), "₹0.00");
        assert_eq!(format_amount(1603.52), "₹1,603.52");
        assert_eq!(format_amount(1_234_567.5), "₹1,234,567.50");
        assert_eq!(format_amount(-120.0), "-₹120.00");
        assert_eq!(format_amount(-0.001), "₹0.00");
    }

    #[test]
    fn ages_are_rounded_down_to_the_largest_unit() {
        let now = SystemTime::now();
        assert_eq!(humanize_age(now), "just now");
        assert_eq!(humanize_age(now - Duration::from_secs(150)), "2 min ago");
        assert_eq!(humanize_age(now - Duration::from_secs(2 * 3600 + 5)), "2 h ago");
        assert_eq!(humanize_age(now - Duration::from_secs(3 * 86_400)), "3 d ago");
    }
}
