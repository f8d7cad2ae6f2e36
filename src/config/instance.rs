//! Process-wide configuration instance.
//!
//! The first successful [`instance`] call loads and publishes the
//! configuration; later calls return the same reference. A failed first load
//! publishes nothing, so the next call tries again.

use crate::config::resolver::Configuration;
use crate::config::types::ConfigOptions;
use crate::error::Result;
use std::sync::{Mutex, OnceLock, PoisonError};

static INSTANCE: OnceLock<Configuration> = OnceLock::new();

/// Serializes the Unloaded -> Ready transition of the first load.
static INIT: Mutex<()> = Mutex::new(());

/// Get the shared configuration, loading it with `options` on first use.
///
/// Options passed after the first successful load are ignored; a mismatch is
/// logged.
pub fn instance(options: ConfigOptions) -> Result<&'static Configuration> {
	if let Some(existing) = INSTANCE.get() {
		warn_on_mismatch(existing, &options);
		return Ok(existing);
	}

	let _guard = INIT.lock().unwrap_or_else(PoisonError::into_inner);
	if let Some(existing) = INSTANCE.get() {
		warn_on_mismatch(existing, &options);
		return Ok(existing);
	}

	let config = Configuration::open(options)?;
	Ok(INSTANCE.get_or_init(|| config))
}

/// The shared configuration if it has been loaded.
pub fn current() -> Option<&'static Configuration> {
	INSTANCE.get()
}

fn warn_on_mismatch(existing: &Configuration, requested: &ConfigOptions) {
	if existing.options() != requested {
		tracing::warn!(
			"Configuration already initialized from {}; ignoring new options {:?}",
			existing.base_path().display(),
			requested
		);
	}
}
