// debias.rs - Per-lead mean removal

use crate::data::SampleMatrix;

/// Arithmetic mean of each lead over all time points
pub fn lead_means(matrix: &SampleMatrix) -> Vec<f64> {
    let mut sums = vec![0.0; matrix.num_leads()];
    for row in matrix.rows() {
        for (sum, value) in sums.iter_mut().zip(row) {
            *sum += value;
        }
    }
    let n = matrix.len().max(1) as f64;
    sums.into_iter().map(|s| s / n).collect()
}

/// Subtract each lead's own mean from that lead. Leads are never mixed.
pub fn debias(matrix: &SampleMatrix) -> SampleMatrix {
    let means = lead_means(matrix);
    let mut out = SampleMatrix::with_capacity(matrix.num_leads(), matrix.len());
    for row in matrix.rows() {
        out.push_row(row.iter().zip(&means).map(|(v, m)| v - m));
    }
    out
}

/// Mean removal for a single series
pub fn debias_samples(samples: &[f64]) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    samples.iter().map(|v| v - mean).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_debias_is_per_lead() {
        let matrix =
            SampleMatrix::from_rows(2, vec![vec![1.0, 100.0], vec![3.0, 300.0]]).unwrap();
        let out = debias(&matrix);
        assert_eq!(out.lead(0).unwrap(), vec![-1.0, 1.0]);
        assert_eq!(out.lead(1).unwrap(), vec![-100.0, 100.0]);
        assert_eq!(lead_means(&matrix), vec![2.0, 200.0]);
    }

    #[test]
    fn test_debias_empty() {
        let out = debias(&SampleMatrix::new(3));
        assert!(out.is_empty());
        assert_eq!(out.num_leads(), 3);
        assert!(debias_samples(&[]).is_empty());
    }

    #[test]
    fn test_sub_segment_rebias_shifts_baseline() {
        let samples = [0.0, 0.0, 10.0, 10.0];
        let once = debias_samples(&samples);
        let tail = debias_samples(&once[2..]);
        assert_eq!(&once[2..], &[5.0, 5.0]);
        assert_eq!(tail, vec![0.0, 0.0]);
    }

    proptest! {
        #[test]
        fn prop_debiased_leads_have_zero_mean(
            rows in proptest::collection::vec(
                proptest::collection::vec(0.0f64..65535.0, 4),
                1..200,
            )
        ) {
            let matrix = SampleMatrix::from_rows(4, rows).unwrap();
            let means = lead_means(&debias(&matrix));
            for mean in means {
                prop_assert!(mean.abs() < 1e-6);
            }
        }
    }
}
