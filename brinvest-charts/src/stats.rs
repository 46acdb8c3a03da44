//! Descriptive statistics behind the age distribution panel.

/// One histogram bin; `end` is exclusive except for the last bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bin {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

/// Equal-width bins spanning `[min, max]`.
///
/// When every value is identical a single bin of width 1 centered on it is returned.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return vec![Bin {
            start: min - 0.5,
            end: min + 0.5,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Scott's rule bandwidth: `std * n^(-1/5)`.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let std = sample_std(values)?;
    if std <= 0.0 {
        return None;
    }
    Some(std * (values.len() as f64).powf(-0.2))
}

/// Gaussian kernel density estimate evaluated at `points`.
///
/// Returns `None` when the bandwidth is undefined (fewer than two values or zero spread).
pub fn gaussian_kde(values: &[f64], points: &[f64]) -> Option<Vec<f64>> {
    let h = scott_bandwidth(values)?;
    let norm = 1.0 / (values.len() as f64 * h * (2.0 * std::f64::consts::PI).sqrt());
    Some(
        points
            .iter()
            .map(|&x| {
                norm * values
                    .iter()
                    .map(|&v| (-0.5 * ((x - v) / h).powi(2)).exp())
                    .sum::<f64>()
            })
            .collect(),
    )
}

/// `n` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + i as f64 * step).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[30.0, 40.0, 50.0]), Some(40.0));
        assert!((sample_std(&[30.0, 40.0, 50.0]).unwrap() - 10.0).abs() < 1e-12);
        assert_eq!(sample_std(&[1.0]), None);
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let values = [18.0, 25.0, 25.0, 40.0, 60.0, 80.0];
        let bins = histogram(&values, 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        // max lands in the last bin
        assert_eq!(bins[3].count, 1);
        assert!((bins[0].width() - 15.5).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_constant_values() {
        let bins = histogram(&[42.0, 42.0], 20);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
    }

    #[test]
    fn test_kde_integrates_to_one() {
        let values = [20.0, 30.0, 35.0, 40.0, 41.0, 55.0, 70.0];
        let grid = linspace(-50.0, 150.0, 2001);
        let density = gaussian_kde(&values, &grid).unwrap();
        let step = grid[1] - grid[0];
        let area: f64 = density.iter().sum::<f64>() * step;
        assert!((area - 1.0).abs() < 1e-3, "area = {area}");
    }

    #[test]
    fn test_kde_undefined_without_spread() {
        assert!(gaussian_kde(&[30.0, 30.0], &[30.0]).is_none());
        assert!(gaussian_kde(&[30.0], &[30.0]).is_none());
    }
}
