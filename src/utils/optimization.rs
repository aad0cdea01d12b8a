//! Derivative-free minimisation used for likelihood estimation.

/// Result of Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The optimal point found.
    pub optimal_point: Vec<f64>,
    /// The objective function value at the optimal point.
    pub optimal_value: f64,
    /// Number of iterations performed, across restarts.
    pub iterations: usize,
    /// Whether the algorithm converged within the iteration budget.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Iteration budget shared by the initial run and all restarts.
    pub max_iter: usize,
    /// Convergence tolerance on the spread of objective values.
    pub tolerance: f64,
    /// Initial simplex step size.
    pub initial_step: f64,
    /// Restarts from the best point after convergence.
    pub restarts: usize,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 5000,
            tolerance: 1e-8,
            initial_step: 0.1,
            restarts: 1,
        }
    }
}

/// Reflection, expansion, contraction and shrink coefficients.
///
/// Uses the dimension-adaptive values of Gao & Han (2012), which reduce to
/// the classic (1, 2, 0.5, 0.5) in two dimensions.
#[derive(Debug, Clone, Copy)]
struct Coefficients {
    alpha: f64,
    gamma: f64,
    rho: f64,
    sigma: f64,
}

impl Coefficients {
    fn adaptive(n: usize) -> Self {
        let n = n.max(2) as f64;
        Self {
            alpha: 1.0,
            gamma: 1.0 + 2.0 / n,
            rho: 0.75 - 1.0 / (2.0 * n),
            sigma: 1.0 - 1.0 / n,
        }
    }
}

/// Minimise `objective` starting from `initial`.
///
/// Non-finite objective values are treated as `+inf`, so an objective can
/// reject infeasible points by returning `f64::INFINITY` or `NaN`.
///
/// # Example
/// ```
/// use stock_forecast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// assert!((result.optimal_point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(objective: F, initial: &[f64], config: NelderMeadConfig) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let eval = |x: &[f64]| {
        let v = objective(x);
        if v.is_finite() {
            v
        } else {
            f64::INFINITY
        }
    };

    if initial.is_empty() {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: eval(initial),
            iterations: 0,
            converged: true,
        };
    }

    let mut best = simplex_search(&eval, initial, config.max_iter, &config);
    let mut used = best.iterations;

    // Restarts only polish a converged result; they never revoke convergence.
    if best.converged {
        for _ in 0..config.restarts {
            let budget = config.max_iter.saturating_sub(used);
            if budget == 0 {
                break;
            }
            let run = simplex_search(&eval, &best.optimal_point, budget, &config);
            used += run.iterations;
            let improved = run.optimal_value < best.optimal_value;
            if improved {
                best.optimal_point = run.optimal_point;
                best.optimal_value = run.optimal_value;
            }
            if !improved || !run.converged {
                break;
            }
        }
    }

    NelderMeadResult {
        iterations: used,
        ..best
    }
}

/// Central-difference Hessian of `f` at `x`.
///
/// Step sizes scale with `|x_i|` so that coefficients of very different
/// magnitude are differentiated with comparable relative accuracy.
pub fn numerical_hessian<F>(f: F, x: &[f64]) -> Vec<Vec<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let n = x.len();
    let steps: Vec<f64> = x.iter().map(|xi| 1e-4 * xi.abs().max(1.0)).collect();
    let at = |shifts: &[(usize, f64)]| {
        let mut point = x.to_vec();
        for &(i, delta) in shifts {
            point[i] += delta;
        }
        f(&point)
    };

    let f0 = f(x);
    let mut hessian = vec![vec![0.0; n]; n];
    for i in 0..n {
        let hi = steps[i];
        hessian[i][i] = (at(&[(i, hi)]) - 2.0 * f0 + at(&[(i, -hi)])) / (hi * hi);
        for j in 0..i {
            let hj = steps[j];
            let value = (at(&[(i, hi), (j, hj)]) - at(&[(i, hi), (j, -hj)])
                - at(&[(i, -hi), (j, hj)])
                + at(&[(i, -hi), (j, -hj)]))
                / (4.0 * hi * hj);
            hessian[i][j] = value;
            hessian[j][i] = value;
        }
    }
    hessian
}

fn simplex_search<F>(
    eval: &F,
    initial: &[f64],
    max_iter: usize,
    config: &NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    let coef = Coefficients::adaptive(n);

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(initial.to_vec());
    for i in 0..n {
        let mut vertex = initial.to_vec();
        vertex[i] += if initial[i].abs() > 1e-10 {
            config.initial_step * initial[i].abs().max(1.0)
        } else {
            config.initial_step
        };
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iter {
        iterations += 1;

        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        let best = order[0];
        let worst = order[n];
        let second_worst = order[n - 1];

        let spread = values[worst] - values[best];
        let scale = values[best].abs().max(1.0);
        if values[best].is_finite() && spread <= config.tolerance * scale {
            converged = true;
            break;
        }

        let centroid = centroid_without(&simplex, worst);
        let size = simplex
            .iter()
            .map(|v| distance(v, &centroid))
            .fold(0.0, f64::max);
        if size < config.tolerance {
            converged = values[best].is_finite();
            break;
        }

        let reflected = towards(&centroid, &simplex[worst], -coef.alpha);
        let reflected_value = eval(&reflected);

        if reflected_value < values[best] {
            let expanded = towards(&centroid, &reflected, coef.gamma);
            let expanded_value = eval(&expanded);
            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[second_worst] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        let (contracted, contracted_value, accept) = if reflected_value < values[worst] {
            let point = towards(&centroid, &reflected, coef.rho);
            let value = eval(&point);
            let ok = value <= reflected_value;
            (point, value, ok)
        } else {
            let point = towards(&centroid, &simplex[worst], coef.rho);
            let value = eval(&point);
            let ok = value < values[worst];
            (point, value, ok)
        };

        if accept {
            simplex[worst] = contracted;
            values[worst] = contracted_value;
            continue;
        }

        let anchor = simplex[best].clone();
        for i in 0..=n {
            if i != best {
                simplex[i] = towards(&anchor, &simplex[i], coef.sigma);
                values[i] = eval(&simplex[i]);
            }
        }
    }

    let best = (0..=n)
        .min_by(|&a, &b| values[a].total_cmp(&values[b]))
        .unwrap_or(0);

    NelderMeadResult {
        optimal_point: simplex[best].clone(),
        optimal_value: values[best],
        iterations,
        converged,
    }
}

/// Centroid of all vertices except `exclude`.
fn centroid_without(simplex: &[Vec<f64>], exclude: usize) -> Vec<f64> {
    let n = simplex[0].len();
    let count = (simplex.len() - 1) as f64;
    let mut centroid = vec![0.0; n];
    for (i, vertex) in simplex.iter().enumerate() {
        if i != exclude {
            for (c, v) in centroid.iter_mut().zip(vertex) {
                *c += v;
            }
        }
    }
    centroid.iter_mut().for_each(|c| *c /= count);
    centroid
}

/// `origin + t * (point - origin)`; negative `t` reflects through `origin`.
fn towards(origin: &[f64], point: &[f64], t: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(point)
        .map(|(o, p)| o + t * (p - o))
        .collect()
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn nelder_mead_quadratic_2d() {
        let result = nelder_mead(
            |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
            &[0.0, 0.0],
            NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert_relative_eq!(result.optimal_point[0], 2.0, epsilon = 1e-3);
        assert_relative_eq!(result.optimal_point[1], 3.0, epsilon = 1e-3);
        assert_relative_eq!(result.optimal_value, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn nelder_mead_rosenbrock() {
        let config = NelderMeadConfig {
            max_iter: 10_000,
            tolerance: 1e-12,
            ..Default::default()
        };

        let result = nelder_mead(
            |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2),
            &[-1.0, 1.0],
            config,
        );

        assert_relative_eq!(result.optimal_point[0], 1.0, epsilon = 1e-2);
        assert_relative_eq!(result.optimal_point[1], 1.0, epsilon = 2e-2);
    }

    #[test]
    fn nelder_mead_eight_dimensions() {
        let target: Vec<f64> = (0..8).map(|i| 0.1 * i as f64 - 0.3).collect();
        let result = nelder_mead(
            |x| x.iter().zip(&target).map(|(a, b)| (a - b).powi(2)).sum(),
            &[0.0; 8],
            NelderMeadConfig::default(),
        );

        assert!(result.converged);
        for (x, t) in result.optimal_point.iter().zip(&target) {
            assert!((x - t).abs() < 1e-2);
        }
    }

    #[test]
    fn infeasible_region_is_avoided() {
        // Minimum of the unconstrained quadratic lies at x = -1, which is rejected.
        let result = nelder_mead(
            |x| {
                if x[0] < 0.0 {
                    f64::NAN
                } else {
                    (x[0] + 1.0).powi(2)
                }
            },
            &[2.0],
            NelderMeadConfig::default(),
        );

        assert!(result.optimal_point[0] >= 0.0);
        assert!(result.optimal_value.is_finite());
    }

    #[test]
    fn budget_exhaustion_is_reported() {
        let config = NelderMeadConfig {
            max_iter: 3,
            tolerance: 1e-14,
            ..Default::default()
        };
        let result = nelder_mead(
            |x| (x[0] - 5.0).powi(2) + (x[1] + 5.0).powi(2),
            &[0.0, 0.0],
            config,
        );

        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
    }

    #[test]
    fn hessian_of_quadratic_form() {
        // f = x^2 + 3xy + 2y^2 has Hessian [[2, 3], [3, 4]] everywhere.
        let h = numerical_hessian(
            |v| v[0] * v[0] + 3.0 * v[0] * v[1] + 2.0 * v[1] * v[1],
            &[0.7, -1.3],
        );
        assert_relative_eq!(h[0][0], 2.0, epsilon = 1e-4);
        assert_relative_eq!(h[0][1], 3.0, epsilon = 1e-4);
        assert_relative_eq!(h[1][0], 3.0, epsilon = 1e-4);
        assert_relative_eq!(h[1][1], 4.0, epsilon = 1e-4);
    }

    #[test]
    fn empty_problem_is_trivially_converged() {
        let result = nelder_mead(|_| 4.0, &[], NelderMeadConfig::default());
        assert!(result.converged);
        assert_eq!(result.optimal_value, 4.0);
    }
}
