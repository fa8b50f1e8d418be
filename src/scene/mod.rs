use crate::canvas::Canvas;
use crate::color::random_hue;

mod firework;
mod particle;

pub use firework::Firework;
pub use particle::Particle;

// Per-frame background wash; what turns last frame's image into a trail.
const FADE_ALPHA: f32 = 0.3;
const LAUNCH_DELAY_MIN: f64 = 0.3;
const LAUNCH_DELAY_MAX: f64 = 0.8;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Launch window open; rockets are scheduled at random intervals.
    Launching,
    /// Window closed; existing entities burn out, nothing new is scheduled.
    Settling,
    /// Everything gone; the greeting card takes over. Terminal.
    Done,
}

/// Owns the two entity collections, the clock, and the launch scheduler.
/// All coordinates are virtual pixels (see [`crate::canvas::CELL_PX`]).
pub struct Scene {
    width: f64,
    height: f64,
    fireworks: Vec<Firework>,
    particles: Vec<Particle>,
    elapsed: f64,
    next_launch: f64,
    launch_window: f64,
    phase: Phase,
}

impl Scene {
    pub fn new(width: f64, height: f64, launch_window: f64) -> Self {
        Self {
            width,
            height,
            fireworks: Vec::new(),
            particles: Vec::new(),
            elapsed: 0.0,
            // First rocket goes up on the first update.
            next_launch: 0.0,
            launch_window,
            phase: Phase::Launching,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The terminal keeps its size out of our hands; adopt whatever it says.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Advance the scene by one fixed timestep.
    pub fn update(&mut self, dt: f64) {
        if self.phase == Phase::Done {
            return;
        }
        self.elapsed += dt;

        if self.phase == Phase::Launching {
            if self.elapsed > self.launch_window {
                self.phase = Phase::Settling;
            } else if self.elapsed >= self.next_launch {
                self.spawn_scheduled();
                self.next_launch = self.elapsed
                    + LAUNCH_DELAY_MIN
                    + fastrand::f64() * (LAUNCH_DELAY_MAX - LAUNCH_DELAY_MIN);
            }
        }

        let mut exploded = Vec::new();
        self.fireworks.retain_mut(|fw| {
            if fw.update() {
                true
            } else {
                exploded.push(fw.clone());
                false
            }
        });
        for fw in &exploded {
            fw.explode(&mut self.particles);
        }

        self.particles.retain_mut(|p| {
            p.update();
            p.is_alive()
        });

        if self.phase == Phase::Settling && self.fireworks.is_empty() && self.particles.is_empty()
        {
            self.phase = Phase::Done;
        }
    }

    /// Paint the current frame: wash the previous one toward the background,
    /// then draw every live entity on top.
    pub fn draw(&self, canvas: &mut Canvas) {
        canvas.fade(FADE_ALPHA);
        for fw in &self.fireworks {
            fw.draw(canvas);
        }
        for p in &self.particles {
            p.draw(canvas);
        }
    }

    /// Manual launch at the pointer position. Only honored while the launch
    /// window is still open; the periodic schedule is left untouched.
    pub fn click(&mut self, x: f64, y: f64) {
        if self.elapsed <= self.launch_window {
            self.fireworks.push(Firework::new(
                x,
                self.height,
                y,
                random_hue(),
                4.0 + fastrand::f64() * 4.0,
                2.0 + fastrand::f64() * 3.0,
            ));
        }
    }

    fn spawn_scheduled(&mut self) {
        let x = self.width * 0.1 + fastrand::f64() * self.width * 0.8;
        let target_y = self.height * 0.1 + fastrand::f64() * self.height * 0.3;
        self.fireworks.push(Firework::new(
            x,
            self.height,
            target_y,
            random_hue(),
            4.0 + fastrand::f64() * 4.0,
            2.0 + fastrand::f64() * 3.0,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    fn scene(window: f64) -> Scene {
        Scene::new(600.0, 480.0, window)
    }

    #[test]
    fn first_update_launches_a_rocket() {
        fastrand::seed(20);
        let mut s = scene(10.0);
        s.update(DT);
        assert_eq!(s.fireworks.len(), 1);
    }

    #[test]
    fn scheduled_spawn_respects_ranges() {
        fastrand::seed(21);
        for _ in 0..100 {
            let mut s = scene(10.0);
            s.update(DT);
            let fw = &s.fireworks[0];
            assert!(fw.x >= 60.0 && fw.x < 540.0);
            assert!((fw.y - 480.0).abs() < 1e-9);
            assert!(fw.target_y >= 48.0 && fw.target_y < 192.0);
        }
    }

    #[test]
    fn no_scheduled_launches_after_window_closes() {
        fastrand::seed(22);
        let mut s = scene(0.0);
        for _ in 0..120 {
            s.update(DT);
        }
        assert!(s.fireworks.is_empty());
        assert!(s.particles.is_empty());
    }

    #[test]
    fn click_inside_window_launches_at_pointer() {
        fastrand::seed(23);
        let mut s = scene(10.0);
        s.click(100.0, 50.0);
        assert_eq!(s.fireworks.len(), 1);
        let fw = &s.fireworks[0];
        assert!((fw.x - 100.0).abs() < 1e-9);
        assert!((fw.y - 480.0).abs() < 1e-9);
        assert!((fw.target_y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn click_after_window_is_ignored() {
        fastrand::seed(24);
        let mut s = scene(0.0);
        s.update(DT);
        s.click(100.0, 50.0);
        assert!(s.fireworks.is_empty());
    }

    #[test]
    fn explosion_happens_in_the_same_step_as_removal() {
        fastrand::seed(25);
        let mut s = scene(10.0);
        // Target just under the launch height so the very next step trips it.
        s.fireworks.push(Firework::new(
            300.0,
            480.0,
            479.9,
            (255, 0, 0),
            6.0,
            3.0,
        ));
        s.update(DT);
        // The scheduled rocket from this step may coexist with the burst.
        assert!(!s.particles.is_empty());
        assert!(s.particles.len() >= 50 && s.particles.len() < 150);
    }

    #[test]
    fn done_only_after_window_and_both_collections_empty() {
        fastrand::seed(26);
        let mut s = scene(0.0);
        s.fireworks.push(Firework::new(300.0, 480.0, 479.9, (255, 0, 0), 6.0, 3.0));
        let mut transitions = 0;
        let mut prev = s.phase();
        for _ in 0..20_000 {
            s.update(DT);
            if s.phase() == Phase::Done && prev != Phase::Done {
                transitions += 1;
                assert!(s.fireworks.is_empty());
                assert!(s.particles.is_empty());
            }
            prev = s.phase();
        }
        assert_eq!(s.phase(), Phase::Done);
        assert_eq!(transitions, 1);
    }

    #[test]
    fn full_show_reaches_done() {
        fastrand::seed(28);
        let mut s = scene(0.5);
        let mut launched_any = false;
        for _ in 0..60_000 {
            s.update(DT);
            launched_any |= !s.fireworks.is_empty();
            if s.phase() == Phase::Done {
                break;
            }
        }
        assert!(launched_any);
        assert_eq!(s.phase(), Phase::Done);
    }

    #[test]
    fn update_is_a_no_op_once_done() {
        fastrand::seed(27);
        let mut s = scene(0.0);
        s.update(DT);
        assert_eq!(s.phase(), Phase::Done);
        let elapsed = s.elapsed;
        s.update(DT);
        assert_eq!(s.elapsed, elapsed);
        assert!(s.fireworks.is_empty());
    }
}
