//! Parameter layout and the stationarity-enforcing reparameterisation.
//!
//! The optimiser works in an unconstrained space. Each AR block is mapped to a
//! stationary polynomial and each MA block to an invertible one through the
//! partial-autocorrelation transform of Monahan (1984) and Jones (1980).

use super::diff::poly_mul;
use super::order::ModelSpec;

/// Constrained model coefficients in estimation order.
#[derive(Debug, Clone, PartialEq)]
pub struct SarimaParams {
    pub intercept: f64,
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub seasonal_ar: Vec<f64>,
    pub seasonal_ma: Vec<f64>,
}

impl SarimaParams {
    /// Split a flat vector laid out as `[intercept?, ar, ma, sar, sma]`.
    pub fn from_flat(spec: &ModelSpec, flat: &[f64]) -> Self {
        let mut rest = flat;
        let mut take = |k: usize| {
            let (head, tail) = rest.split_at(k.min(rest.len()));
            rest = tail;
            head.to_vec()
        };
        let intercept = if spec.include_constant {
            take(1).first().copied().unwrap_or(0.0)
        } else {
            0.0
        };
        Self {
            intercept,
            ar: take(spec.order.p),
            ma: take(spec.order.q),
            seasonal_ar: take(spec.seasonal.p),
            seasonal_ma: take(spec.seasonal.q),
        }
    }

    pub fn to_flat(&self, spec: &ModelSpec) -> Vec<f64> {
        let mut flat = Vec::with_capacity(spec.n_arma() + 1);
        if spec.include_constant {
            flat.push(self.intercept);
        }
        flat.extend(&self.ar);
        flat.extend(&self.ma);
        flat.extend(&self.seasonal_ar);
        flat.extend(&self.seasonal_ma);
        flat
    }

    /// Expanded AR lag coefficients `a_i` with `w_t = c + Σ a_i w_{t-i} + ...`.
    pub fn expanded_ar(&self, period: usize) -> Vec<f64> {
        let regular = lag_polynomial(&self.ar, 1, -1.0);
        let seasonal = lag_polynomial(&self.seasonal_ar, period, -1.0);
        poly_mul(&regular, &seasonal)
            .iter()
            .skip(1)
            .map(|c| -c)
            .collect()
    }

    /// Expanded MA lag coefficients `m_j` with `... + e_t + Σ m_j e_{t-j}`.
    pub fn expanded_ma(&self, period: usize) -> Vec<f64> {
        let regular = lag_polynomial(&self.ma, 1, 1.0);
        let seasonal = lag_polynomial(&self.seasonal_ma, period, 1.0);
        poly_mul(&regular, &seasonal).into_iter().skip(1).collect()
    }
}

/// `1 + sign * Σ c_i L^(i * step)` in ascending lag order.
fn lag_polynomial(coefficients: &[f64], step: usize, sign: f64) -> Vec<f64> {
    let mut poly = vec![0.0; coefficients.len() * step + 1];
    poly[0] = 1.0;
    for (i, c) in coefficients.iter().enumerate() {
        poly[(i + 1) * step] = sign * c;
    }
    poly
}

/// Map unconstrained values to coefficients of a stationary AR polynomial
/// `1 - Σ φ_i L^i`.
pub fn constrain_stationary(unconstrained: &[f64]) -> Vec<f64> {
    let n = unconstrained.len();
    if n == 0 {
        return Vec::new();
    }
    let r: Vec<f64> = unconstrained
        .iter()
        .map(|u| u / (1.0 + u * u).sqrt())
        .collect();

    let mut y = vec![vec![0.0; n]; n];
    for k in 0..n {
        for i in 0..k {
            y[k][i] = y[k - 1][i] + r[k] * y[k - 1][k - i - 1];
        }
        y[k][k] = r[k];
    }
    y[n - 1].iter().map(|v| -v).collect()
}

/// Inverse of [`constrain_stationary`].
pub fn unconstrain_stationary(constrained: &[f64]) -> Vec<f64> {
    let n = constrained.len();
    if n == 0 {
        return Vec::new();
    }
    let mut y = vec![vec![0.0; n]; n];
    y[n - 1] = constrained.iter().map(|c| -c).collect();
    for k in (1..n).rev() {
        let rk = y[k][k];
        let denom = 1.0 - rk * rk;
        for i in 0..k {
            y[k - 1][i] = (y[k][i] - rk * y[k][k - i - 1]) / denom;
        }
    }
    (0..n)
        .map(|k| {
            let r = y[k][k].clamp(-0.999_999, 0.999_999);
            r / (1.0 - r * r).sqrt()
        })
        .collect()
}

/// Map an unconstrained flat vector to constrained coefficients.
pub fn constrain(spec: &ModelSpec, unconstrained: &[f64]) -> Vec<f64> {
    let raw = SarimaParams::from_flat(spec, unconstrained);
    SarimaParams {
        intercept: raw.intercept,
        ar: constrain_stationary(&raw.ar),
        ma: invertible(&raw.ma),
        seasonal_ar: constrain_stationary(&raw.seasonal_ar),
        seasonal_ma: invertible(&raw.seasonal_ma),
    }
    .to_flat(spec)
}

/// Inverse of [`constrain`].
pub fn unconstrain(spec: &ModelSpec, constrained: &[f64]) -> Vec<f64> {
    let raw = SarimaParams::from_flat(spec, constrained);
    let neg = |v: &[f64]| v.iter().map(|c| -c).collect::<Vec<_>>();
    SarimaParams {
        intercept: raw.intercept,
        ar: unconstrain_stationary(&raw.ar),
        ma: unconstrain_stationary(&neg(&raw.ma)),
        seasonal_ar: unconstrain_stationary(&raw.seasonal_ar),
        seasonal_ma: unconstrain_stationary(&neg(&raw.seasonal_ma)),
    }
    .to_flat(spec)
}

// `1 + Σ θ_j L^j` is invertible iff `1 - Σ (-θ_j) L^j` is stationary.
fn invertible(unconstrained: &[f64]) -> Vec<f64> {
    constrain_stationary(unconstrained)
        .into_iter()
        .map(|c| -c)
        .collect()
}

/// Whether every root of `1 - Σ φ_i L^i` lies outside the unit circle,
/// checked with the Schur-Cohn step-down recursion.
pub fn is_stationary(phi: &[f64]) -> bool {
    let mut a: Vec<f64> = phi.to_vec();
    while let Some(&last) = a.last() {
        if !last.is_finite() || last.abs() >= 1.0 {
            return false;
        }
        let k = a.len();
        let denom = 1.0 - last * last;
        a = (0..k - 1)
            .map(|i| (a[i] + last * a[k - 2 - i]) / denom)
            .collect();
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sarima::order::{SarimaOrder, SeasonalOrder};
    use approx::assert_relative_eq;

    #[test]
    fn single_coefficient_maps_into_unit_interval() {
        for u in [-50.0, -1.0, 0.0, 0.3, 7.0] {
            let phi = constrain_stationary(&[u]);
            assert!(phi[0].abs() < 1.0);
        }
        assert_eq!(constrain_stationary(&[0.0]), vec![0.0]);
    }

    #[test]
    fn constrained_polynomials_are_stationary() {
        let cases: [&[f64]; 4] = [
            &[3.0, -2.0],
            &[10.0, 10.0, 10.0],
            &[-0.5, 4.0, -8.0, 1.0],
            &[0.1, 0.2, 0.3, 0.4, 0.5],
        ];
        for u in cases {
            let phi = constrain_stationary(u);
            assert!(is_stationary(&phi), "{:?} -> {:?}", u, phi);
        }
    }

    #[test]
    fn unconstrain_inverts_constrain() {
        let u = [0.4, -1.2, 0.7];
        let back = unconstrain_stationary(&constrain_stationary(&u));
        for (a, b) in u.iter().zip(&back) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn stationarity_check() {
        assert!(is_stationary(&[0.5]));
        assert!(!is_stationary(&[1.0]));
        assert!(is_stationary(&[0.5, 0.3]));
        // 1 - 1.5L + 0.5L^2 has a unit root
        assert!(!is_stationary(&[1.5, -0.5]));
        assert!(is_stationary(&[]));
    }

    #[test]
    fn flat_layout_round_trips() {
        let spec = ModelSpec::new(SarimaOrder::new(2, 0, 1), SeasonalOrder::new(1, 0, 1, 4))
            .with_constant(true);
        let flat = vec![0.5, 0.1, 0.2, 0.3, 0.4, 0.6];
        let params = SarimaParams::from_flat(&spec, &flat);
        assert_eq!(params.intercept, 0.5);
        assert_eq!(params.ar, vec![0.1, 0.2]);
        assert_eq!(params.ma, vec![0.3]);
        assert_eq!(params.seasonal_ar, vec![0.4]);
        assert_eq!(params.seasonal_ma, vec![0.6]);
        assert_eq!(params.to_flat(&spec), flat);
    }

    #[test]
    fn expanded_polynomials_multiply_seasonal_blocks() {
        let params = SarimaParams {
            intercept: 0.0,
            ar: vec![0.5],
            ma: vec![0.4],
            seasonal_ar: vec![0.2],
            seasonal_ma: vec![0.3],
        };
        // (1 - 0.5L)(1 - 0.2L^4) = 1 - 0.5L - 0.2L^4 + 0.1L^5
        let ar = params.expanded_ar(4);
        assert_eq!(ar.len(), 5);
        assert_relative_eq!(ar[0], 0.5);
        assert_relative_eq!(ar[3], 0.2);
        assert_relative_eq!(ar[4], -0.1, epsilon = 1e-12);

        // (1 + 0.4L)(1 + 0.3L^4) = 1 + 0.4L + 0.3L^4 + 0.12L^5
        let ma = params.expanded_ma(4);
        assert_relative_eq!(ma[0], 0.4);
        assert_relative_eq!(ma[3], 0.3);
        assert_relative_eq!(ma[4], 0.12, epsilon = 1e-12);
    }

    #[test]
    fn constrained_ma_is_invertible() {
        let spec = ModelSpec::new(SarimaOrder::new(0, 0, 2), SeasonalOrder::none());
        let theta = constrain(&spec, &[5.0, -3.0]);
        let as_ar: Vec<f64> = theta.iter().map(|t| -t).collect();
        assert!(is_stationary(&as_ar));

        let back = unconstrain(&spec, &theta);
        assert_relative_eq!(back[0], 5.0, epsilon = 1e-6);
        assert_relative_eq!(back[1], -3.0, epsilon = 1e-6);
    }
}
