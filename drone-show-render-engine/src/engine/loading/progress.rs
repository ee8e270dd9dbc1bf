use bevy::prelude::*;

#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub manifest_loaded: bool,
    pub textures_loaded: bool,
    pub textures_configured: bool,
    pub drones_created: bool,
    /// Set once a fatal loading error has been reported.
    pub failed: bool,
}

impl LoadingProgress {
    pub fn is_complete(&self) -> bool {
        !self.failed
            && self.manifest_loaded
            && self.textures_loaded
            && self.textures_configured
            && self.drones_created
    }

    /// Log a loading error once and freeze the loading stages.
    pub fn fail(&mut self, reason: impl std::fmt::Display) {
        if !self.failed {
            error!("✗ Show cannot start: {}", reason);
            self.failed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_only_after_every_stage() {
        let mut progress = LoadingProgress {
            manifest_loaded: true,
            textures_loaded: true,
            textures_configured: true,
            ..default()
        };
        assert!(!progress.is_complete());
        progress.drones_created = true;
        assert!(progress.is_complete());
    }

    #[test]
    fn failure_blocks_completion() {
        let mut progress = LoadingProgress {
            manifest_loaded: true,
            textures_loaded: true,
            textures_configured: true,
            drones_created: true,
            ..default()
        };
        progress.fail("manifest rejected");
        assert!(!progress.is_complete());
    }
}
