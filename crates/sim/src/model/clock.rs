//! Play/pause state and time scaling between frames and simulated time.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Paused,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationSpeed {
    Normal,
    Slow,
}

/// Converts frame deltas into simulated deltas.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    state: ClockState,
    speed: SimulationSpeed,
    normal_scale: f64,
    slow_scale: f64,
    step_frame_delta_s: f64,
}

impl SimulationClock {
    pub fn new(normal_scale: f64, slow_scale: f64, step_frame_delta_s: f64, playing: bool) -> Self {
        Self {
            state: if playing {
                ClockState::Playing
            } else {
                ClockState::Paused
            },
            speed: SimulationSpeed::Normal,
            normal_scale,
            slow_scale,
            step_frame_delta_s,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == ClockState::Playing
    }

    pub fn speed(&self) -> SimulationSpeed {
        self.speed
    }

    pub fn speed_scale(&self) -> f64 {
        match self.speed {
            SimulationSpeed::Normal => self.normal_scale,
            SimulationSpeed::Slow => self.slow_scale,
        }
    }

    pub fn play(&mut self) {
        if self.state != ClockState::Playing {
            debug!("clock playing");
        }
        self.state = ClockState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state != ClockState::Paused {
            debug!("clock paused");
        }
        self.state = ClockState::Paused;
    }

    pub fn set_speed(&mut self, speed: SimulationSpeed) {
        debug!(?speed, "clock speed changed");
        self.speed = speed;
    }

    /// Simulated seconds for a frame of `frame_delta_s` wall seconds.
    /// Non-positive or non-finite deltas advance nothing.
    pub fn advance(&self, frame_delta_s: f64) -> f64 {
        if self.state == ClockState::Paused || !frame_delta_s.is_finite() || frame_delta_s <= 0.0 {
            return 0.0;
        }
        frame_delta_s * self.speed_scale()
    }

    /// One fixed frame, unscaled, regardless of play state or speed.
    pub fn single_step(&self) -> f64 {
        self.step_frame_delta_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> SimulationClock {
        SimulationClock::new(1.0, 0.33, 0.016, true)
    }

    #[test]
    fn paused_clock_does_not_advance() {
        let mut clock = clock();
        clock.pause();
        assert_eq!(clock.advance(0.5), 0.0);
        assert_eq!(clock.single_step(), 0.016);
    }

    #[test]
    fn slow_speed_scales_frame_delta() {
        let mut clock = clock();
        assert_eq!(clock.advance(0.1), 0.1);
        clock.set_speed(SimulationSpeed::Slow);
        assert!((clock.advance(0.1) - 0.033).abs() < 1e-12);
        assert_eq!(clock.single_step(), 0.016);
    }

    #[test]
    fn negative_delta_is_ignored() {
        assert_eq!(clock().advance(-0.1), 0.0);
        assert_eq!(clock().advance(f64::NAN), 0.0);
    }
}
