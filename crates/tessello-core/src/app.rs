//! App state type and builder

use std::sync::Arc;
use tracing::{error, info};

use tessello_types::directory_adapter::DirectoryAdapter;
use tessello_types::prelude::{Error, TsResult};
use tessello_types::vault_adapter::VaultAdapter;

use crate::settings::SettingsService;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug)]
pub struct AppState {
	pub directory: Arc<dyn DirectoryAdapter>,
	pub vault: Arc<dyn VaultAdapter>,
	pub settings: Arc<SettingsService>,
	pub opts: AppBuilderOpts,
}

pub type App = Arc<AppState>;

#[derive(Debug)]
pub struct AppBuilderOpts {
	/// Capacity of the settings chain cache.
	pub settings_cache_size: usize,
}

impl Default for AppBuilderOpts {
	fn default() -> Self {
		Self { settings_cache_size: 1000 }
	}
}

pub struct Adapters {
	pub directory: Option<Arc<dyn DirectoryAdapter>>,
	pub vault: Option<Arc<dyn VaultAdapter>>,
}

pub struct AppBuilder {
	opts: AppBuilderOpts,
	adapters: Adapters,
}

impl AppBuilder {
	#[must_use]
	pub fn new() -> Self {
		AppBuilder {
			opts: AppBuilderOpts::default(),
			adapters: Adapters { directory: None, vault: None },
		}
	}

	// Opts
	pub fn settings_cache_size(&mut self, size: usize) -> &mut Self {
		self.opts.settings_cache_size = size;
		self
	}

	// Adapters
	pub fn directory_adapter(&mut self, directory: Arc<dyn DirectoryAdapter>) -> &mut Self {
		self.adapters.directory = Some(directory);
		self
	}
	pub fn vault_adapter(&mut self, vault: Arc<dyn VaultAdapter>) -> &mut Self {
		self.adapters.vault = Some(vault);
		self
	}

	pub fn build(self) -> TsResult<App> {
		let Some(directory) = self.adapters.directory else {
			error!("No directory adapter configured");
			return Err(Error::ConfigError("no directory adapter configured".into()));
		};
		let Some(vault) = self.adapters.vault else {
			error!("No vault adapter configured");
			return Err(Error::ConfigError("no vault adapter configured".into()));
		};

		let settings =
			Arc::new(SettingsService::new(directory.clone(), self.opts.settings_cache_size));
		info!(version = VERSION, "app state initialized");

		Ok(Arc::new(AppState { directory, vault, settings, opts: self.opts }))
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

// vim: ts=4
