//! Utility functions

pub fn hours_to_ms(hours: i64) -> i64 {
    hours * 60 * 60 * 1000
}

/// Human-readable duration, e.g. "2d 4h 12m".
pub fn format_duration_ms(ms: i64) -> String {
    let ms = ms.abs();
    let days = ms / (24 * 60 * 60 * 1000);
    let hours = (ms % (24 * 60 * 60 * 1000)) / (60 * 60 * 1000);
    let minutes = (ms % (60 * 60 * 1000)) / (60 * 1000);

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 || parts.is_empty() {
        parts.push(format!("{}m", minutes));
    }
    parts.join(" ")
}

pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        if local.len() <= 2 {
            format!("{}***{}", &local[..1], domain)
        } else {
            format!("{}***{}", &local[..2], domain)
        }
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_days_hours_minutes() {
        assert_eq!(format_duration_ms(hours_to_ms(50) + 5 * 60 * 1000), "2d 2h 5m");
        assert_eq!(format_duration_ms(90 * 1000), "1m");
        assert_eq!(format_duration_ms(0), "0m");
    }

    #[test]
    fn negative_durations_format_as_absolute() {
        assert_eq!(format_duration_ms(-hours_to_ms(3)), "3h");
    }

    #[test]
    fn masks_email_local_part() {
        assert_eq!(mask_email("someone@example.com"), "so***@example.com");
        assert_eq!(mask_email("a@example.com"), "a***@example.com");
    }
}
