/// Lowercase and collapse runs of whitespace.
pub fn normalize_text(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// `part / total * 100`, clamped to 0 when the ratio is not finite.
pub fn percentage(part: usize, total: usize) -> f64 {
    let pct = part as f64 / total as f64 * 100.0;
    if pct.is_finite() { pct } else { 0.0 }
}

/// Whole percentages for `counts` out of `total`, by largest remainder: every
/// share is floored, then the missing points go to the largest fractional
/// remainders, earlier entries first on ties. When `counts` sums to a
/// non-zero `total` the result sums to exactly 100.
pub(crate) fn apportion(counts: &[usize], total: usize) -> Vec<u32> {
    if total == 0 {
        return vec![0; counts.len()];
    }
    let mut points = counts
        .iter()
        .map(|&count| ((count * 100 / total) as u32, count * 100 % total))
        .collect::<Vec<_>>();
    let assigned: u32 = points.iter().map(|(floor, _)| floor).sum();
    let leftover = 100u32.saturating_sub(assigned) as usize;

    let mut order = (0..points.len())
        .filter(|&idx| points[idx].1 > 0)
        .collect::<Vec<_>>();
    // Stable sort keeps entry order among equal remainders.
    order.sort_by(|&a, &b| points[b].1.cmp(&points[a].1));
    for idx in order.into_iter().take(leftover) {
        points[idx].0 += 1;
    }
    points.into_iter().map(|(pct, _)| pct).collect()
}

/// Two-decimal rounding, the precision the backend reports statistics with.
pub(crate) fn round2(value: f64) -> f64 {
    if value.is_finite() {
        (value * 100.0).round() / 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_spacing() {
        assert_eq!(normalize_text("  Le   Gall "), "le gall");
        assert_eq!(normalize_text("ÉLODIE"), "élodie");
    }

    #[test]
    fn percentage_of_empty_total_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(3, 0), 0.0);
    }

    #[test]
    fn apportion_keeps_two_thirds_split() {
        assert_eq!(apportion(&[2, 1], 3), vec![67, 33]);
        assert_eq!(apportion(&[1, 1, 1, 1, 1], 5), vec![20; 5]);
    }

    #[test]
    fn apportion_sums_to_exactly_hundred() {
        assert_eq!(apportion(&[1; 8], 8).iter().sum::<u32>(), 100);
        assert_eq!(apportion(&[1; 8], 8), vec![13, 13, 13, 13, 12, 12, 12, 12]);
        assert_eq!(apportion(&[1, 1, 1], 3), vec![34, 33, 33]);
        assert_eq!(apportion(&[1, 1, 1, 1, 4], 8), vec![13, 13, 12, 12, 50]);
    }

    #[test]
    fn apportion_of_empty_total_is_zero() {
        assert_eq!(apportion(&[0, 0], 0), vec![0, 0]);
        assert!(apportion(&[], 0).is_empty());
    }

    #[test]
    fn round2_matches_backend_precision() {
        assert_eq!(round2(15.254), 15.25);
        assert_eq!(round2(3.9051), 3.91);
    }
}
