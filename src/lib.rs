//! Backend login entry controller: picks the active login provider, resolves safe redirect
//! targets, and sequences the form protection token lifecycle without tying itself to any web
//! framework.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod cookie;
pub mod error;
pub mod flows;
pub mod interface;
pub mod news;
pub mod obs;
pub mod protection;
pub mod provider;
pub mod redirect;
pub mod request;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and in-memory collaborators for integration tests; enabled via
	//! `cfg(test)` or the `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
	// self
	use crate::{
		auth::{AuthenticationState, ProviderId, SessionId},
		config::{EntryConfig, ProviderEntry},
		flows::SessionEntryController,
		protection::MemoryFormProtection,
		provider::{ProviderCatalog, ProviderRegistry},
	};

	/// Scriptable [`AuthenticationState`] used by integration tests.
	#[derive(Debug, Default)]
	pub struct FakeAuthState {
		logged_in: AtomicBool,
		log_offs: AtomicUsize,
		redirect_override: Mutex<Option<String>>,
		interface: Mutex<Option<String>>,
	}
	impl FakeAuthState {
		/// Creates a state that reports an anonymous visitor.
		pub fn anonymous() -> Self {
			Self::default()
		}

		/// Creates a state that reports a logged-in backend user.
		pub fn logged_in() -> Self {
			let state = Self::default();

			state.logged_in.store(true, Ordering::SeqCst);

			state
		}

		/// Configures the per-user redirect override.
		pub fn with_redirect_override(self, target: impl Into<String>) -> Self {
			*self.redirect_override.lock() = Some(target.into());

			self
		}

		/// Number of times [`AuthenticationState::log_off`] was invoked.
		pub fn log_off_calls(&self) -> usize {
			self.log_offs.load(Ordering::SeqCst)
		}

		/// Interface recorded through [`AuthenticationState::remember_interface`].
		pub fn remembered_interface(&self) -> Option<String> {
			self.interface.lock().clone()
		}
	}
	impl AuthenticationState for FakeAuthState {
		fn is_logged_in(&self) -> bool {
			self.logged_in.load(Ordering::SeqCst)
		}

		fn log_off(&self) {
			self.log_offs.fetch_add(1, Ordering::SeqCst);
			self.logged_in.store(false, Ordering::SeqCst);
		}

		fn redirect_override(&self) -> Option<String> {
			self.redirect_override.lock().clone()
		}

		fn remember_interface(&self, interface: &str) {
			*self.interface.lock() = Some(interface.to_owned());
		}
	}

	/// Provider identifier fixture.
	pub fn provider_id(value: &str) -> ProviderId {
		ProviderId::new(value).expect("Provider identifier fixture should be valid.")
	}

	/// Session identifier fixture.
	pub fn session_id(value: &str) -> SessionId {
		SessionId::new(value).expect("Session identifier fixture should be valid.")
	}

	/// Builds a provider configuration entry backed by the built-in username/password hook.
	pub fn provider_entry(label: &str, sorting: i64) -> ProviderEntry {
		ProviderEntry {
			label: Some(label.into()),
			icon_identifier: Some(format!("icon-{label}")),
			sorting: Some(sorting),
			provider: Some(crate::provider::USERNAME_PASSWORD.into()),
		}
	}

	/// Configuration with a `password` provider (sorting 50) and a `backup` provider
	/// (sorting 10), served from `https://cms.example.com/`.
	pub fn test_config() -> EntryConfig {
		let mut config = EntryConfig::default();

		config.site_url =
			Some(Url::parse("https://cms.example.com/").expect("Site URL fixture should parse."));
		config.login_providers.insert("password".into(), provider_entry("Password", 50));
		config.login_providers.insert("backup".into(), provider_entry("Backup", 10));

		config
	}

	/// Controller wired with in-memory collaborators for the given configuration.
	pub fn build_test_controller(
		config: EntryConfig,
		auth: Arc<FakeAuthState>,
	) -> (SessionEntryController, Arc<MemoryFormProtection>) {
		let catalog = ProviderCatalog::with_defaults();
		let registry = ProviderRegistry::from_config(&config.login_providers, &catalog)
			.expect("Registry fixture should build successfully.");
		let protection = Arc::new(MemoryFormProtection::new(session_id("session-under-test")));
		let controller =
			SessionEntryController::new(config, registry, auth, protection.clone());

		(controller, protection)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		hash::Hash,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
#[cfg(test)] use color_eyre as _;
