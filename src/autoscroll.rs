use serde::Serialize;

use crate::frame::TaskControl;
use crate::progress::ScrollMetrics;

pub const IDLE_LABEL: &str = "Вкл/Выкл";
pub const RUNNING_LABEL: &str = "Остановить";

/// Fraction of the remaining distance covered per frame.
pub const EASING_FACTOR: f64 = 0.1;
/// Once closer than this, the speed snaps to its target.
pub const EASING_EPSILON: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoScrollState {
    #[default]
    Idle,
    Running,
}

#[derive(Debug, Clone, Default)]
pub struct AutoScroll {
    state: AutoScrollState,
}

impl AutoScroll {
    pub fn state(&self) -> AutoScrollState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == AutoScrollState::Running
    }

    pub fn label(&self) -> &'static str {
        match self.state {
            AutoScrollState::Idle => IDLE_LABEL,
            AutoScrollState::Running => RUNNING_LABEL,
        }
    }

    pub fn toggle(&mut self) -> AutoScrollState {
        self.state = match self.state {
            AutoScrollState::Idle => AutoScrollState::Running,
            AutoScrollState::Running => AutoScrollState::Idle,
        };
        self.state
    }

    /// One frame of scrolling. Stops (and goes idle) once the container is
    /// scrolled to its end.
    pub fn step(&mut self, metrics: &mut ScrollMetrics, speed: f64) -> TaskControl {
        if !self.is_running() {
            return TaskControl::Stop;
        }
        metrics.scroll_by(speed);
        if metrics.at_end() {
            self.state = AutoScrollState::Idle;
            return TaskControl::Stop;
        }
        TaskControl::Continue
    }
}

/// Scroll speed that approaches its target exponentially.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedEasing {
    current: f64,
    target: f64,
}

impl SpeedEasing {
    pub fn new(initial: f64) -> Self {
        Self {
            current: initial,
            target: initial,
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    pub fn step(&mut self) -> TaskControl {
        let diff = self.target - self.current;
        if diff.abs() > EASING_EPSILON {
            self.current += diff * EASING_FACTOR;
            TaskControl::Continue
        } else {
            self.current = self.target;
            TaskControl::Stop
        }
    }
}
