// matrix.rs - Multi-lead sample matrix and marker sequence

use serde::{Deserialize, Serialize};

/// Row-major multi-lead recording: one row per time point, one column per lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleMatrix {
    num_leads: usize,
    data: Vec<f64>,
}

impl SampleMatrix {
    /// Create an empty matrix with a fixed lead count
    pub fn new(num_leads: usize) -> Self {
        Self {
            num_leads,
            data: Vec::new(),
        }
    }

    pub fn with_capacity(num_leads: usize, rows: usize) -> Self {
        Self {
            num_leads,
            data: Vec::with_capacity(num_leads * rows),
        }
    }

    /// Build from explicit rows; every row must carry `num_leads` values
    pub fn from_rows(num_leads: usize, rows: Vec<Vec<f64>>) -> Result<Self, String> {
        let mut matrix = Self::with_capacity(num_leads, rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != num_leads {
                return Err(format!(
                    "row {} has {} leads, expected {}",
                    i,
                    row.len(),
                    num_leads
                ));
            }
            matrix.data.extend(row);
        }
        Ok(matrix)
    }

    /// Build a single-lead matrix from a series
    pub fn from_lead(samples: &[f64]) -> Self {
        Self {
            num_leads: 1,
            data: samples.to_vec(),
        }
    }

    /// Append one time point; the iterator must yield exactly `num_leads` values
    pub(crate) fn push_row<I: IntoIterator<Item = f64>>(&mut self, row: I) {
        let before = self.data.len();
        self.data.extend(row);
        debug_assert_eq!(self.data.len() - before, self.num_leads);
    }

    pub fn num_leads(&self) -> usize {
        self.num_leads
    }

    /// Number of time points
    pub fn len(&self) -> usize {
        if self.num_leads == 0 {
            0
        } else {
            self.data.len() / self.num_leads
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.len() {
            return None;
        }
        let start = index * self.num_leads;
        Some(&self.data[start..start + self.num_leads])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on a zero chunk size
        self.data.chunks_exact(self.num_leads.max(1))
    }

    /// Copy one lead out as a contiguous series
    pub fn lead(&self, lead: usize) -> Option<Vec<f64>> {
        if lead >= self.num_leads {
            return None;
        }
        Some(self.rows().map(|row| row[lead]).collect())
    }

    /// Rows `[start, end)`, clamped to the matrix length
    pub fn slice_rows(&self, start: usize, end: usize) -> SampleMatrix {
        let len = self.len();
        let end = end.min(len);
        let start = start.min(end);
        Self {
            num_leads: self.num_leads,
            data: self.data[start * self.num_leads..end * self.num_leads].to_vec(),
        }
    }

    /// Assemble a matrix from per-lead series of equal length
    pub fn from_leads(leads: &[Vec<f64>]) -> Result<Self, String> {
        let num_leads = leads.len();
        let len = leads.first().map_or(0, Vec::len);
        if let Some((i, lead)) = leads.iter().enumerate().find(|(_, l)| l.len() != len) {
            return Err(format!(
                "lead {} has {} samples, expected {}",
                i,
                lead.len(),
                len
            ));
        }
        let mut matrix = Self::with_capacity(num_leads, len);
        for t in 0..len {
            matrix.push_row(leads.iter().map(|lead| lead[t]));
        }
        Ok(matrix)
    }
}

/// Operator event timestamps on the reference device's native clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSequence {
    ticks: Vec<f64>,
}

impl MarkerSequence {
    /// Markers are recorded in temporal order, so a decreasing tick is rejected
    pub fn new(ticks: Vec<f64>) -> Result<Self, String> {
        if let Some(i) = ticks.windows(2).position(|w| w[1] < w[0]) {
            return Err(format!(
                "marker {} ({}) precedes marker {} ({})",
                i + 1,
                ticks[i + 1],
                i,
                ticks[i]
            ));
        }
        Ok(Self { ticks })
    }

    pub fn empty() -> Self {
        Self { ticks: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.ticks.get(index).copied()
    }

    pub fn ticks(&self) -> &[f64] {
        &self.ticks
    }

    /// Multiply every tick by `ratio` without reinterpolating
    pub fn scaled(&self, ratio: f64) -> Self {
        Self {
            ticks: self.ticks.iter().map(|t| t * ratio).collect(),
        }
    }

    /// Convert a marker to a sample index, truncating `tick / divisor`
    pub fn sample_index(&self, index: usize, divisor: f64) -> Option<usize> {
        self.get(index).map(|tick| tick_to_index(tick, divisor))
    }
}

pub(crate) fn tick_to_index(tick: f64, divisor: f64) -> usize {
    let index = (tick / divisor).trunc();
    if index <= 0.0 {
        0
    } else {
        index as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SampleMatrix {
        SampleMatrix::from_rows(3, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn test_matrix_shape() {
        let m = sample();
        assert_eq!(m.len(), 2);
        assert_eq!(m.num_leads(), 3);
        assert_eq!(m.row(1), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(m.row(2), None);
        assert_eq!(m.lead(2), Some(vec![3.0, 6.0]));
        assert_eq!(m.lead(3), None);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = SampleMatrix::from_rows(2, vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(err.contains("row 1"));
    }

    #[test]
    fn test_slice_rows_clamps() {
        let m = sample();
        assert_eq!(m.slice_rows(1, 10).len(), 1);
        assert!(m.slice_rows(5, 10).is_empty());
    }

    #[test]
    fn test_from_leads_round_trip() {
        let m = sample();
        let leads: Vec<Vec<f64>> = (0..3).map(|l| m.lead(l).unwrap()).collect();
        assert_eq!(SampleMatrix::from_leads(&leads).unwrap(), m);
    }

    #[test]
    fn test_markers_must_not_decrease() {
        assert!(MarkerSequence::new(vec![10.0, 10.0, 20.0]).is_ok());
        let err = MarkerSequence::new(vec![10.0, 30.0, 20.0]).unwrap_err();
        assert!(err.contains("marker 2"));
    }

    #[test]
    fn test_marker_sample_index_truncates() {
        let markers = MarkerSequence::new(vec![47.0, 48.0, 2400.0]).unwrap();
        assert_eq!(markers.sample_index(0, 24.0), Some(1));
        assert_eq!(markers.sample_index(1, 24.0), Some(2));
        assert_eq!(markers.sample_index(2, 24.0), Some(100));
        assert_eq!(markers.sample_index(3, 24.0), None);
    }

    #[test]
    fn test_marker_scaling() {
        let markers = MarkerSequence::new(vec![200.0, 400.0]).unwrap();
        assert_eq!(markers.scaled(2.5).ticks(), &[500.0, 1000.0]);
    }
}
