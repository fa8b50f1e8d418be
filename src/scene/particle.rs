use crate::canvas::Canvas;
use crate::color::Rgb;

/// One explosion fragment. Falls under gravity, slowed by friction, and
/// fades out at a per-particle rate fixed at creation.
pub struct Particle {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    color: Rgb,
    gravity: f64,
    friction: f64,
    size: f64,
    alpha: f64,
    decay: f64,
}

impl Particle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x: f64,
        y: f64,
        color: Rgb,
        speed: f64,
        direction: f64,
        gravity: f64,
        friction: f64,
        size: f64,
    ) -> Self {
        Self {
            x,
            y,
            vx: direction.cos() * speed,
            vy: direction.sin() * speed,
            color,
            gravity,
            friction,
            size,
            alpha: 1.0,
            decay: 0.005 + fastrand::f64() * 0.015,
        }
    }

    pub fn update(&mut self) {
        self.vx *= self.friction;
        self.vy *= self.friction;
        self.vy += self.gravity;
        self.x += self.vx;
        self.y += self.vy;
        self.alpha -= self.decay;
    }

    pub fn is_alive(&self) -> bool {
        self.alpha > 0.0
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        canvas.fill_circle(self.x, self.y, self.size, self.color, self.alpha as f32);
    }
}
