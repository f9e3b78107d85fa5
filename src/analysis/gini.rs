use crate::error::AnalysisError;

/// Gini coefficient of a non-negative distribution.
///
/// Sorts an owned copy ascending, assigns ranks `1..=n`, and evaluates
/// `G = (2 * sum(v_i * i) / sum(v) - (n + 1)) / n`, landing in `[0, 1]`:
/// 0 for perfect equality, approaching 1 for total concentration.
pub fn gini(values: &[f32]) -> Result<f32, AnalysisError> {
    let n = values.len();
    let total: f32 = values.iter().sum();
    if n == 0 || total == 0.0 {
        return Err(AnalysisError::DegenerateInput(
            "gini of an empty or zero-sum distribution".into(),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let ranked: f32 = sorted
        .iter()
        .enumerate()
        .map(|(i, &v)| v * (i + 1) as f32)
        .sum();

    Ok((2.0 * ranked / total - (n as f32 + 1.0)) / n as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_distribution_has_no_inequality() {
        assert!(gini(&[1.0, 1.0, 1.0, 1.0]).unwrap().abs() < 1e-6);
        assert!(gini(&[0.25; 8]).unwrap().abs() < 1e-6);
    }

    #[test]
    fn one_hot_distribution_approaches_the_bound() {
        let g = gini(&[0.0, 0.0, 0.0, 1.0]).unwrap();
        assert!((g - 0.75).abs() < 1e-6);
    }

    #[test]
    fn order_does_not_matter() {
        let a = gini(&[3.0, 1.0, 2.0, 0.5]).unwrap();
        let b = gini(&[0.5, 2.0, 3.0, 1.0]).unwrap();
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn zero_sum_is_degenerate() {
        assert!(matches!(
            gini(&[0.0, 0.0]),
            Err(AnalysisError::DegenerateInput(_))
        ));
        assert!(matches!(gini(&[]), Err(AnalysisError::DegenerateInput(_))));
    }

    #[test]
    fn result_stays_in_unit_interval() {
        for vals in [
            vec![0.1, 0.4, 0.2, 0.3],
            vec![5.0, 5.0, 0.0],
            vec![1.0],
        ] {
            let g = gini(&vals).unwrap();
            assert!((0.0..=1.0).contains(&g), "gini {g} out of range");
        }
    }
}
