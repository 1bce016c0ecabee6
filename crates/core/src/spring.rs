//! Critically damped spring, used for overscroll bounce-back.

/// A one-dimensional critically damped spring.
///
/// Critical damping returns to the target as fast as possible without
/// oscillating, which is exactly the feel wanted for rubber-band snap-back.
/// The step is the closed-form solution, so advancing by one large `dt` is
/// identical to advancing by many small ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    /// Current position.
    pub position: f64,
    /// Current velocity, units per second.
    pub velocity: f64,
    /// Equilibrium the spring pulls toward.
    pub target: f64,
    omega: f64,
}

impl Spring {
    /// Creates a spring at rest at `position` with natural frequency `omega`
    /// in rad/s.
    pub fn new(position: f64, omega: f64) -> Self {
        Spring {
            position,
            velocity: 0.0,
            target: position,
            omega: omega.max(f64::MIN_POSITIVE),
        }
    }

    /// Sets the equilibrium position.
    pub fn pull_toward(&mut self, target: f64) -> &mut Self {
        self.target = target;
        self
    }

    /// Sets the current velocity, e.g. to hand over momentum from a fling.
    pub fn with_velocity(&mut self, velocity: f64) -> &mut Self {
        self.velocity = velocity;
        self
    }

    /// Advances the spring by `dt` seconds.
    ///
    /// Closed form for the critically damped case
    /// `x(t) = (A + B·t)·e^(−ω·t)` around the target.
    pub fn tick(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }

        let displacement = self.position - self.target;
        let decay = (-self.omega * dt).exp();
        let coefficient = (self.velocity + self.omega * displacement) * dt;

        self.position = self.target + (displacement + coefficient) * decay;
        self.velocity = (self.velocity - self.omega * coefficient) * decay;
    }

    /// Whether the spring has effectively stopped near its target.
    pub fn is_settled(&self, position_epsilon: f64, velocity_epsilon: f64) -> bool {
        (self.position - self.target).abs() < position_epsilon
            && self.velocity.abs() < velocity_epsilon
    }

    /// Jumps to the target and stops.
    pub fn snap_to_target(&mut self) {
        self.position = self.target;
        self.velocity = 0.0;
    }
}
