//! Label text for measurements

/// Distance label for the two-point tool: meters below 1 km, kilometers above
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.2}m", meters)
    } else {
        format!("{:.2}km", meters / 1000.0)
    }
}

/// Distance label for the path and polygon tools: always kilometers
pub fn format_kilometers(meters: f64) -> String {
    format!("{:.2}km", meters / 1000.0)
}

/// Area label in square kilometers with the given unit suffix
pub fn format_area(square_kilometers: f64, suffix: &str) -> String {
    format!("{:.2}{}", square_kilometers, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance_switches_at_one_kilometer() {
        assert_eq!(format_distance(0.0), "0.00m");
        assert_eq!(format_distance(12.346), "12.35m");
        assert_eq!(format_distance(999.99), "999.99m");
        assert_eq!(format_distance(1000.0), "1.00km");
        assert_eq!(format_distance(15_250.0), "15.25km");
    }

    #[test]
    fn test_format_kilometers_always_km() {
        assert_eq!(format_kilometers(250.0), "0.25km");
        assert_eq!(format_kilometers(111_319.49), "111.32km");
    }

    #[test]
    fn test_format_area() {
        assert_eq!(format_area(30.9, " km²"), "30.90 km²");
        assert_eq!(format_area(0.0, "平方公里"), "0.00平方公里");
    }
}
