/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a consultation fee, dropping the fraction when it is zero
pub fn format_fees(fees: f64) -> String {
    if fees.fract() == 0.0 {
        format!("${:.0}", fees)
    } else {
        format!("${:.2}", fees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Dr. Zoë Müller", 6), "Dr....");
    }

    #[test]
    fn test_format_fees() {
        assert_eq!(format_fees(50.0), "$50");
        assert_eq!(format_fees(49.5), "$49.50");
    }
}
