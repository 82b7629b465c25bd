use anyhow::{Result, ensure};

/// Ordinary least squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits a straight line through `(xs[i], ys[i])` by least squares.
///
/// A constant `xs` gives a flat line through the mean of `ys`. Non-finite
/// inputs are not filtered and propagate into the result.
pub fn fit_linear(xs: &[f64], ys: &[f64]) -> Result<LinearFit> {
    ensure!(
        xs.len() == ys.len(),
        "cannot fit {} x values against {} y values",
        xs.len(),
        ys.len()
    );
    ensure!(xs.len() >= 2, "need at least 2 points to fit a line, got {}", xs.len());

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    let intercept = mean_y - slope * mean_x;
    let r_squared = if syy == 0.0 {
        1.0
    } else {
        1.0 - (syy - slope * sxy) / syy
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

/// Fits a line to `(log10 x, log10 y)`.
///
/// There is no guard against values <= 0: their logarithm is -inf or NaN and
/// the returned slope and intercept are then non-finite. Callers feed it
/// counts and ranks, which are positive for any non-empty corpus.
pub fn fit_loglog(xs: &[f64], ys: &[f64]) -> Result<LinearFit> {
    let log_x: Vec<f64> = xs.iter().map(|x| x.log10()).collect();
    let log_y: Vec<f64> = ys.iter().map(|y| y.log10()).collect();
    fit_linear(&log_x, &log_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn recovers_exact_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys: Vec<f64> = xs.iter().map(|x| 2.5 * x - 1.0).collect();
        let fit = fit_linear(&xs, &ys).unwrap();
        assert!((fit.slope - 2.5).abs() < EPS);
        assert!((fit.intercept + 1.0).abs() < EPS);
        assert!((fit.r_squared - 1.0).abs() < EPS);
        assert!((fit.predict(10.0) - 24.0).abs() < EPS);
    }

    #[test]
    fn least_squares_on_noisy_points() {
        // hand-computed: slope 0.95, intercept 0.25
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [1.0, 2.5, 3.0, 4.0];
        let fit = fit_linear(&xs, &ys).unwrap();
        assert!((fit.slope - 0.95).abs() < EPS);
        assert!((fit.intercept - 0.25).abs() < EPS);
        assert!(fit.r_squared > 0.9 && fit.r_squared < 1.0);
    }

    #[test]
    fn power_law_fits_in_log_space() {
        let xs: Vec<f64> = (1..=50).map(|t| (t * 100) as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|t| 3.0 * t.powf(0.6)).collect();
        let fit = fit_loglog(&xs, &ys).unwrap();
        assert!((fit.slope - 0.6).abs() < 1e-9);
        assert!((10f64.powf(fit.intercept) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn constant_x_gives_flat_line() {
        let fit = fit_linear(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert!((fit.intercept - 2.0).abs() < EPS);
    }

    #[test]
    fn rejects_mismatched_or_short_input() {
        assert!(fit_linear(&[1.0, 2.0], &[1.0]).is_err());
        assert!(fit_linear(&[1.0], &[1.0]).is_err());
        assert!(fit_loglog(&[], &[]).is_err());
    }

    #[test]
    fn non_positive_values_give_non_finite_fit() {
        let fit = fit_loglog(&[0.0, 1.0, 10.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!(!fit.slope.is_finite());
        assert!(!fit.intercept.is_finite());

        let fit = fit_loglog(&[1.0, 10.0, 100.0], &[-1.0, 2.0, 3.0]).unwrap();
        assert!(!fit.slope.is_finite());
    }
}
