//! Rate change requests.
//!
//! A timeline's rate is fixed for the whole of one host frame. Systems and
//! deferred actions that want to speed up, slow down, reverse or pause a
//! timeline post a request here; [`Game::tick`](crate::game::Game::tick)
//! applies the requests at the end of the frame, in order.

use bevy_ecs::prelude::Resource;

#[derive(Debug, Clone, PartialEq)]
pub enum TimeRequest {
    /// Set a timeline's rate to a decimal ratio.
    SetRate { timeline: String, ratio: f64 },
    /// Set every timeline to zero, remembering their rates.
    PauseAll,
    /// Restore the rates saved by the last pause.
    ResumeAll,
}

#[derive(Resource, Debug, Default)]
pub struct TimeControl {
    requests: Vec<TimeRequest>,
}

impl TimeControl {
    pub fn set_rate(&mut self, timeline: impl Into<String>, ratio: f64) {
        self.requests.push(TimeRequest::SetRate {
            timeline: timeline.into(),
            ratio,
        });
    }

    pub fn pause_all(&mut self) {
        self.requests.push(TimeRequest::PauseAll);
    }

    pub fn resume_all(&mut self) {
        self.requests.push(TimeRequest::ResumeAll);
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn take(&mut self) -> Vec<TimeRequest> {
        std::mem::take(&mut self.requests)
    }
}
