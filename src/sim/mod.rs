use std::collections::BTreeMap;

pub(crate) mod animator;
pub(crate) mod body;
pub(crate) mod catalog;
pub(crate) mod system;

/// Builds the system described by the catalog, every body at angle zero.
pub(crate) fn create_system() -> system::SolarSystem {
    system::SolarSystem::new(&catalog::SUN, catalog::CATALOG)
}

/// The speed every body starts with, keyed by name.
pub(crate) fn default_speeds() -> BTreeMap<String, f64> {
    catalog::CATALOG
        .iter()
        .map(|entry| (entry.name.to_string(), entry.default_speed))
        .collect()
}
