//! Startup settings. Read once, never written back.

use std::collections::BTreeMap;

use log::{info, warn};
use serde::Deserialize;

use crate::{
    camera::InterpolationMode,
    controls::SPEED_RANGE,
    sim::{self, catalog},
    theme::Theme,
};

#[cfg_attr(target_family = "wasm", path = "storage_web.rs")]
#[cfg_attr(not(target_family = "wasm"), path = "storage_native.rs")]
mod storage;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub theme: Theme,
    pub show_fps: bool,
    pub interpolation: InterpolationMode,
    /// Overrides for the catalog's starting speeds.
    pub speeds: BTreeMap<String, f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            show_fps: true,
            interpolation: InterpolationMode::default(),
            speeds: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Catalog speeds with the valid overrides applied.
    pub(crate) fn initial_speeds(&self) -> BTreeMap<String, f64> {
        let mut speeds = sim::default_speeds();

        for (name, &value) in &self.speeds {
            if catalog::find(name).is_none() {
                warn!("ignoring speed for unknown body {name:?}");
                continue;
            }
            if !value.is_finite() {
                warn!("ignoring non-finite speed for {name}");
                continue;
            }
            speeds.insert(name.clone(), value.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end()));
        }

        speeds
    }
}

/// Loads the settings, falling back to defaults if there are none or they
/// can't be read.
pub(crate) fn load() -> Settings {
    match storage::load() {
        Ok(Some(settings)) => {
            info!("loaded settings from {}", storage::LOCATION);
            settings
        }
        Ok(None) => Settings::default(),
        Err(e) => {
            warn!("failed to load settings from {}: {e}", storage::LOCATION);
            Settings::default()
        }
    }
}
