//! MEGNO chaos indicator
//!
//! The Mean Exponential Growth factor of Nearby Orbits is built from the
//! logarithmic growth rate of the variational deviation:
//!
//! ```text
//! Y(t)   = (2/t) ∫₀ᵗ (δ̇/δ) s ds
//! ⟨Y⟩(t) = (1/t) ∫₀ᵗ Y(s) ds
//! ```
//!
//! For quasi-periodic orbits both converge to 2; for chaotic orbits they grow
//! linearly with a slope set by the maximal Lyapunov exponent, which
//! [`Megno::lyapunov`] estimates with a running least-squares fit of Y
//! against t.

/// Running MEGNO accumulator, updated once per accepted step
///
/// All quantities are running sums; nothing is ever recomputed from the
/// trajectory.
///
/// # Examples
///
/// ```
/// use nbody::megno::Megno;
///
/// // A deviation growing linearly in time, δ ∝ t, has δ̇/δ = 1/t and Y = 2
/// let mut megno = Megno::new();
/// let dt = 1e-3;
/// for step in 1..=10_000 {
///     let t = step as f64 * dt;
///     megno.update(dt, Some(1.0 / t));
/// }
/// assert!((megno.current_value() - 2.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Megno {
    /// ∫ (δ̇/δ) s ds
    y_integral: f64,
    /// Elapsed time since seeding
    time_sum: f64,
    /// ∫ Y ds
    y_mean_integral: f64,
    /// Last valid Y
    last_value: f64,
    samples: u64,
    mean_t: f64,
    mean_y: f64,
    cov_yt: f64,
    var_t: f64,
    degenerate_steps: u64,
}

impl Megno {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds in one completed step of length `dt`
    ///
    /// `rate` is δ̇/δ at the end of the step, or `None` when the deviation has
    /// degenerated. Degenerate steps advance the clock but leave the estimate
    /// at its last valid value.
    pub fn update(&mut self, dt: f64, rate: Option<f64>) {
        self.time_sum += dt;
        let t = self.time_sum;

        let Some(rate) = rate else {
            if self.degenerate_steps == 0 {
                tracing::warn!(t, "variational deviation degenerated, keeping last MEGNO estimate");
            }
            self.degenerate_steps += 1;
            return;
        };

        self.y_integral += rate * t * dt;
        if t <= 0.0 {
            return;
        }
        let y = 2.0 * self.y_integral / t;
        self.last_value = y;
        self.y_mean_integral += y * dt;

        // Welford running covariance of (t, Y) and variance of t
        self.samples += 1;
        let n = self.samples as f64;
        let dt_mean = t - self.mean_t;
        self.mean_t += dt_mean / n;
        self.mean_y += (y - self.mean_y) / n;
        self.cov_yt += dt_mean * (y - self.mean_y);
        self.var_t += dt_mean * (t - self.mean_t);
    }

    /// Instantaneous MEGNO, Y(t) = (2/t) ∫ (δ̇/δ) s ds
    ///
    /// 0 before the first valid step; the last valid value after a
    /// degenerate one.
    pub fn current_value(&self) -> f64 {
        self.last_value
    }

    /// Time-averaged MEGNO, ⟨Y⟩(t)
    pub fn mean_value(&self) -> f64 {
        if self.time_sum > 0.0 {
            self.y_mean_integral / self.time_sum
        } else {
            0.0
        }
    }

    /// Maximal Lyapunov exponent estimate, the slope of Y against t
    ///
    /// 0 until at least two samples at distinct times exist.
    pub fn lyapunov(&self) -> f64 {
        if self.samples < 2 || self.var_t <= 0.0 {
            0.0
        } else {
            self.cov_yt / self.var_t
        }
    }

    /// Time accumulated since the variational particles were seeded
    pub fn elapsed(&self) -> f64 {
        self.time_sum
    }

    /// Running integral ∫ (δ̇/δ) s ds
    pub fn y_integral(&self) -> f64 {
        self.y_integral
    }

    /// Number of steps whose deviation was too small to use
    pub fn degenerate_steps(&self) -> u64 {
        self.degenerate_steps
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate_steps > 0
    }
}
