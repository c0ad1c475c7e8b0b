use parking_lot::RwLock;
use thiserror::Error;
use tracing::info;

use crate::feeder::Feeder;

/// The machine's feeder registry.
///
/// Feeder availability is live machine state; consumers must query it on
/// every use and never cache the result.
#[derive(Default)]
pub struct Machine {
    feeders: RwLock<Vec<Feeder>>,
}

#[derive(Debug, Error)]
pub enum MachineError {
    #[error("Duplicate feeder reference. reference: '{0}'")]
    DuplicateFeederReference(String),

    #[error("Unknown feeder reference. reference: '{0}'")]
    UnknownFeeder(String),
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current feeder set.
    pub fn feeders(&self) -> Vec<Feeder> {
        self.feeders.read().clone()
    }

    pub fn add_feeder(&self, feeder: Feeder) -> Result<(), MachineError> {
        let mut feeders = self.feeders.write();
        if feeders
            .iter()
            .any(|existing| existing.reference.eq(&feeder.reference))
        {
            return Err(MachineError::DuplicateFeederReference(feeder.reference));
        }
        info!("Feeder added. reference: '{}'", feeder.reference);
        feeders.push(feeder);
        Ok(())
    }

    pub fn remove_feeder(&self, reference: &str) -> Result<Feeder, MachineError> {
        let mut feeders = self.feeders.write();
        let index = feeders
            .iter()
            .position(|feeder| feeder.reference.eq(reference))
            .ok_or_else(|| MachineError::UnknownFeeder(reference.to_string()))?;
        info!("Feeder removed. reference: '{}'", reference);
        Ok(feeders.remove(index))
    }

    pub fn set_feeder_enabled(&self, reference: &str, enabled: bool) -> Result<(), MachineError> {
        let mut feeders = self.feeders.write();
        let feeder = feeders
            .iter_mut()
            .find(|feeder| feeder.reference.eq(reference))
            .ok_or_else(|| MachineError::UnknownFeeder(reference.to_string()))?;
        feeder.enabled = enabled;
        Ok(())
    }
}
