use std::collections::VecDeque;
use std::f64::consts::{FRAC_PI_2, TAU};

use crate::canvas::Canvas;
use crate::color::Rgb;

use super::particle::Particle;

// Gentle deceleration during ascent; much weaker than the pull on fragments.
const ASCENT_GRAVITY: f64 = 0.02;
const PARTICLE_GRAVITY: f64 = 0.05;
const PARTICLE_FRICTION: f64 = 0.98;

/// Ascending rocket with a bounded position history rendered as its trail.
/// Lives until it stalls (vertical velocity reaches zero) or passes its
/// target height, at which point the scene explodes and removes it.
#[derive(Clone)]
pub struct Firework {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) target_y: f64,
    color: Rgb,
    size: f64,
    vx: f64,
    vy: f64,
    trail: VecDeque<(f64, f64)>,
    trail_cap: usize,
}

impl Firework {
    pub fn new(x: f64, y: f64, target_y: f64, color: Rgb, speed: f64, size: f64) -> Self {
        // Near-vertical launch with a little sideways jitter.
        let angle = -FRAC_PI_2 + (fastrand::f64() * 0.6 - 0.3);
        Self {
            x,
            y,
            target_y,
            color,
            size,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            trail: VecDeque::new(),
            trail_cap: fastrand::usize(10..25),
        }
    }

    /// Advance one step. Returns false once the rocket should explode.
    pub fn update(&mut self) -> bool {
        self.trail.push_back((self.x, self.y));
        if self.trail.len() > self.trail_cap {
            self.trail.pop_front();
        }

        self.x += self.vx;
        self.y += self.vy;
        self.vy += ASCENT_GRAVITY;

        !(self.vy >= 0.0 || self.y <= self.target_y)
    }

    /// Burst into fragments at the rocket's current position.
    pub fn explode(&self, particles: &mut Vec<Particle>) {
        let count = fastrand::usize(50..150);
        for _ in 0..count {
            let direction = fastrand::f64() * TAU;
            let speed = 2.0 + fastrand::f64() * 5.0;
            let size = 1.0 + fastrand::f64() * 4.0;
            particles.push(Particle::new(
                self.x,
                self.y,
                self.color,
                speed,
                direction,
                PARTICLE_GRAVITY,
                PARTICLE_FRICTION,
                size,
            ));
        }
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        if self.trail.len() > 1 {
            for (&from, &to) in self.trail.iter().zip(self.trail.iter().skip(1)) {
                canvas.stroke_line(from, to, self.size, self.color, 1.0);
            }
        } else {
            canvas.fill_circle(self.x, self.y, self.size * 0.5, self.color, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rocket(speed: f64, target_y: f64) -> Firework {
        Firework::new(300.0, 600.0, target_y, (0, 255, 128), speed, 3.0)
    }

    #[test]
    fn trail_is_capped_fifo() {
        fastrand::seed(10);
        // Unreachable target and high start so the rocket stays alive.
        let mut fw = rocket(8.0, 0.0);
        fw.y = 100_000.0;
        let mut history = Vec::new();
        for _ in 0..fw.trail_cap + 5 {
            history.push((fw.x, fw.y));
            assert!(fw.update());
        }
        assert_eq!(fw.trail.len(), fw.trail_cap);
        let expected: Vec<(f64, f64)> = history[history.len() - fw.trail_cap..].to_vec();
        let actual: Vec<(f64, f64)> = fw.trail.iter().copied().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn trail_cap_stays_in_range() {
        fastrand::seed(11);
        for _ in 0..200 {
            let fw = rocket(6.0, 0.0);
            assert!(fw.trail_cap >= 10 && fw.trail_cap < 25);
        }
    }

    #[test]
    fn explodes_when_passing_target_height() {
        fastrand::seed(12);
        let mut fw = rocket(8.0, 550.0);
        let mut steps = 0;
        while fw.update() {
            steps += 1;
            assert!(steps < 1000);
        }
        assert!(fw.y <= fw.target_y);
    }

    #[test]
    fn explodes_at_apex_when_target_unreachable() {
        fastrand::seed(13);
        let mut fw = rocket(0.5, 0.0);
        fw.y = 100_000.0;
        let mut steps = 0;
        while fw.update() {
            steps += 1;
            assert!(steps < 1000);
        }
        assert!(fw.vy >= 0.0);
    }

    #[test]
    fn explosion_spawns_between_fifty_and_one_fifty() {
        fastrand::seed(14);
        for _ in 0..50 {
            let fw = rocket(6.0, 0.0);
            let mut particles = Vec::new();
            fw.explode(&mut particles);
            assert!(particles.len() >= 50 && particles.len() < 150);
        }
    }

    #[test]
    fn launch_angle_is_near_vertical() {
        fastrand::seed(15);
        for _ in 0..200 {
            let fw = rocket(6.0, 0.0);
            assert!(fw.vy < 0.0);
            assert!(fw.vx.abs() <= (0.3f64).sin() * 6.0 + 1e-9);
        }
    }
}
