//! Per-frame task scheduling.
//!
//! Work that the page would run from animation-frame callbacks is modelled as
//! named tasks. A tick drains the due set and each task reports whether it
//! wants the next frame as well.

use std::collections::BTreeSet;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameTask {
    SpeedEasing,
    AutoScroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskControl {
    Continue,
    Stop,
}

#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    due: BTreeSet<FrameTask>,
    frames: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `task` for the next frame. Returns `false` if it was already due.
    pub fn schedule(&mut self, task: FrameTask) -> bool {
        self.due.insert(task)
    }

    pub fn cancel(&mut self, task: FrameTask) -> bool {
        self.due.remove(&task)
    }

    pub fn is_idle(&self) -> bool {
        self.due.is_empty()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Starts a frame and hands out every task that was due, in a fixed order
    /// (easing before scrolling).
    pub fn begin_frame(&mut self) -> Vec<FrameTask> {
        self.frames += 1;
        std::mem::take(&mut self.due).into_iter().collect()
    }

    pub fn finish(&mut self, task: FrameTask, control: TaskControl) {
        if control == TaskControl::Continue {
            self.due.insert(task);
        }
    }
}
