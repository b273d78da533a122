//! A computed schedule bundled with the artifacts handed to the operator.

use lineplan_core::{Schedule, ScheduleId};

use crate::channel::ArtifactBundle;

#[derive(Clone, Debug)]
pub struct Proposal {
    pub schedule: Schedule,
    pub artifact: ArtifactBundle,
}

impl Proposal {
    pub fn id(&self) -> ScheduleId {
        self.schedule.id
    }
}
