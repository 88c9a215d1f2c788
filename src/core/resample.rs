// resample.rs - Linear-interpolation resampling of sample matrices and markers

use crate::data::{MarkerSequence, SampleMatrix};
use crate::error::{AlignError, Result};
use tracing::{info, warn};

fn check_rate(name: &str, rate: f64) -> Result<()> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(AlignError::config(format!(
            "{} must be positive, got {}",
            name, rate
        )))
    }
}

/// Output length `round(old_len * new_rate / old_rate)`
pub fn resampled_length(old_len: usize, old_rate: f64, new_rate: f64) -> Result<usize> {
    check_rate("source rate", old_rate)?;
    check_rate("target rate", new_rate)?;
    if new_rate < old_rate {
        warn!(
            old_rate,
            new_rate, "downsampling without anti-alias filtering is unsupported"
        );
    }
    Ok((old_len as f64 * new_rate / old_rate).round() as usize)
}

/// Piecewise-linear interpolation of `samples` onto `new_len` evenly spaced points.
///
/// Point `j` sits at `j * old_len / new_len` on the original index grid and is
/// clamped to the last original index, so nothing is extrapolated.
pub fn interpolate(samples: &[f64], new_len: usize) -> Vec<f64> {
    let old_len = samples.len();
    if old_len == 0 || new_len == 0 {
        return Vec::new();
    }

    let last = (old_len - 1) as f64;
    let step = old_len as f64 / new_len as f64;
    (0..new_len)
        .map(|j| {
            let x = (j as f64 * step).min(last);
            let i = x.floor() as usize;
            if i + 1 >= old_len {
                return samples[old_len - 1];
            }
            let frac = x - i as f64;
            samples[i] + (samples[i + 1] - samples[i]) * frac
        })
        .collect()
}

/// Resample every lead of `matrix` from `old_rate` to `new_rate`
pub fn resample(matrix: &SampleMatrix, old_rate: f64, new_rate: f64) -> Result<SampleMatrix> {
    let new_len = resampled_length(matrix.len(), old_rate, new_rate)?;
    let leads: Vec<Vec<f64>> = (0..matrix.num_leads())
        .filter_map(|lead| matrix.lead(lead))
        .map(|series| interpolate(&series, new_len))
        .collect();

    info!(
        old_len = matrix.len(),
        new_len, old_rate, new_rate, "resampled recording"
    );
    if leads.is_empty() {
        return Ok(SampleMatrix::new(matrix.num_leads()));
    }
    SampleMatrix::from_leads(&leads).map_err(AlignError::config)
}

/// Rescale marker ticks by `new_rate / old_rate`; no rounding happens here
pub fn resample_markers(
    markers: &MarkerSequence,
    old_rate: f64,
    new_rate: f64,
) -> Result<MarkerSequence> {
    check_rate("source rate", old_rate)?;
    check_rate("target rate", new_rate)?;
    Ok(markers.scaled(new_rate / old_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_length_rounds() {
        assert_eq!(resampled_length(200, 200.0, 512.0).unwrap(), 512);
        assert_eq!(resampled_length(3, 200.0, 512.0).unwrap(), 8); // 7.68
        assert_eq!(resampled_length(1, 200.0, 512.0).unwrap(), 3); // 2.56
        assert!(resampled_length(10, 0.0, 512.0).is_err());
        assert!(resampled_length(10, 200.0, -1.0).is_err());
    }

    #[test]
    fn test_interpolate_no_extrapolation() {
        let out = interpolate(&[0.0, 10.0], 5);
        // grid 0, 0.4, 0.8, 1.2 -> 1, 1.6 -> 1
        let expected = [0.0, 4.0, 8.0, 10.0, 10.0];
        for (a, b) in out.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
        }
        assert!(out.iter().all(|&v| v <= 10.0));
    }

    #[test]
    fn test_interpolate_degenerate_inputs() {
        assert!(interpolate(&[], 4).is_empty());
        assert!(interpolate(&[1.0, 2.0], 0).is_empty());
        assert_eq!(interpolate(&[7.0], 3), vec![7.0, 7.0, 7.0]);
    }

    #[test]
    fn test_resample_matrix_per_lead() {
        let matrix =
            SampleMatrix::from_rows(2, vec![vec![0.0, 100.0], vec![2.0, 100.0], vec![4.0, 50.0]])
                .unwrap();
        let out = resample(&matrix, 100.0, 200.0).unwrap();
        assert_eq!(out.len(), 6);
        assert_eq!(out.num_leads(), 2);
        assert_eq!(out.lead(0).unwrap(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 4.0]);
        assert_eq!(out.lead(1).unwrap(), vec![100.0, 100.0, 100.0, 75.0, 50.0, 50.0]);
        // input untouched
        assert_eq!(matrix.len(), 3);
    }

    #[test]
    fn test_resample_empty_matrix() {
        let out = resample(&SampleMatrix::new(12), 200.0, 512.0).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.num_leads(), 12);
    }

    #[test]
    fn test_resample_markers_is_linear() {
        let markers = MarkerSequence::new(vec![0.0, 100.0, 250.0]).unwrap();
        let out = resample_markers(&markers, 200.0, 400.0).unwrap();
        assert_eq!(out.ticks(), &[0.0, 200.0, 500.0]);
    }

    proptest! {
        #[test]
        fn prop_double_rate_decimates_back(
            samples in proptest::collection::vec(-2000.0f64..2000.0, 1..300),
            rate in 50.0f64..1000.0,
        ) {
            let matrix = SampleMatrix::from_lead(&samples);
            let up = resample(&matrix, rate, 2.0 * rate).unwrap();
            prop_assert_eq!(up.len(), 2 * samples.len());

            let lead = up.lead(0).unwrap();
            for (i, original) in samples.iter().enumerate() {
                prop_assert!((lead[2 * i] - original).abs() < 1e-6);
            }
        }
    }
}
