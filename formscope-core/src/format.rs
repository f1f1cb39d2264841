//! Formatting helpers shared across report surfaces.

/// Format a mean completion time in seconds (e.g., "2m 34s").
///
/// Returns "N/A" when there is no data to average. Minutes and seconds are
/// both floored, matching how the figure is displayed on dashboards.
pub fn format_completion_time(avg_seconds: f64) -> String {
    if avg_seconds > 0.0 {
        let minutes = (avg_seconds / 60.0).floor() as u64;
        let seconds = (avg_seconds % 60.0).floor() as u64;
        format!("{}m {}s", minutes, seconds)
    } else {
        "N/A".to_string()
    }
}

/// Format a signed growth percentage for display (e.g., "+23.5%" or "-15%").
pub fn format_growth(delta: f64) -> String {
    if delta >= 0.0 {
        format!("+{}%", delta)
    } else {
        format!("{}%", delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_completion_time() {
        assert_eq!(format_completion_time(154.0), "2m 34s");
        assert_eq!(format_completion_time(59.9), "0m 59s");
        assert_eq!(format_completion_time(60.0), "1m 0s");
        assert_eq!(format_completion_time(0.0), "N/A");
    }

    #[test]
    fn test_format_growth() {
        assert_eq!(format_growth(23.5), "+23.5%");
        assert_eq!(format_growth(0.0), "+0%");
        assert_eq!(format_growth(-15.0), "-15%");
        assert_eq!(format_growth(100.0), "+100%");
    }
}
