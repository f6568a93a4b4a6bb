//! Active login provider selection.

// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	config::EntryConfig,
	cookie::RememberProviderCookie,
	provider::{LoginProviderDescriptor, ProviderRegistry},
	request::SessionRequestContext,
};

/// Result of [`select_provider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderSelection {
	/// Active provider; always registered.
	pub provider: ProviderId,
	/// Cookie remembering the choice; only set when it differs from the primary provider.
	pub remember: Option<RememberProviderCookie>,
}

/// Picks the active provider: request first, then the remembered cookie, then the primary.
///
/// Identifiers that do not name a registered provider are skipped. The selection is a pure
/// function of its inputs, so repeating it yields the same cookie.
pub fn select_provider(
	request: &SessionRequestContext,
	registry: &ProviderRegistry,
	config: &EntryConfig,
	now: OffsetDateTime,
) -> ProviderSelection {
	let registered = |id: Option<&str>| id.and_then(|id| registry.get(id));
	let primary = registry.primary();
	let chosen: &LoginProviderDescriptor = registered(request.login_provider.as_deref())
		.or_else(|| registered(request.last_provider_cookie.as_deref()))
		.unwrap_or(primary);
	let remember = (chosen.id != primary.id).then(|| {
		RememberProviderCookie::new(
			chosen.id.clone(),
			config.cookie_path.clone(),
			config.cookie_secure && request.https,
			now,
		)
	});

	#[cfg(feature = "tracing")]
	tracing::debug!(provider = %chosen.id, remembered = remember.is_some(), "Selected login provider.");

	ProviderSelection { provider: chosen.id.clone(), remember }
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::{config::ProviderEntry, provider::ProviderCatalog};

	fn config() -> EntryConfig {
		let entry = |label: &str, sorting| ProviderEntry {
			label: Some(label.into()),
			icon_identifier: Some("icon".into()),
			sorting: Some(sorting),
			provider: Some(crate::provider::USERNAME_PASSWORD.into()),
		};
		let mut config = EntryConfig::default();

		config.login_providers.insert("password".into(), entry("Password", 50));
		config.login_providers.insert("backup".into(), entry("Backup", 10));

		config
	}

	fn registry(config: &EntryConfig) -> ProviderRegistry {
		ProviderRegistry::from_config(&config.login_providers, &ProviderCatalog::with_defaults())
			.expect("Registry fixture should build.")
	}

	fn select(request: &SessionRequestContext) -> ProviderSelection {
		let config = config();

		select_provider(request, &registry(&config), &config, macros::datetime!(2025-11-10 12:00 UTC))
	}

	#[test]
	fn primary_is_used_without_hints_and_not_remembered() {
		let selection = select(&SessionRequestContext::default());

		assert_eq!(selection.provider.as_ref(), "password");
		assert_eq!(selection.remember, None);
	}

	#[test]
	fn request_beats_cookie() {
		let request = SessionRequestContext {
			login_provider: Some("password".into()),
			last_provider_cookie: Some("backup".into()),
			..Default::default()
		};
		let selection = select(&request);

		assert_eq!(selection.provider.as_ref(), "password");
		assert_eq!(selection.remember, None);
	}

	#[test]
	fn unregistered_request_falls_back_to_registered_cookie() {
		let request = SessionRequestContext {
			login_provider: Some("my_provider".into()),
			last_provider_cookie: Some("backup".into()),
			..Default::default()
		};
		let selection = select(&request);

		assert_eq!(selection.provider.as_ref(), "backup");

		let cookie = selection.remember.expect("A non-primary choice should be remembered.");

		assert_eq!(cookie.value.as_ref(), "backup");
		assert_eq!(cookie.path, "/typo3/");
		assert!(!cookie.secure, "Plain HTTP requests must not set Secure.");
	}

	#[test]
	fn stale_cookie_falls_back_to_primary() {
		let request = SessionRequestContext {
			last_provider_cookie: Some("removed".into()),
			..Default::default()
		};

		assert_eq!(select(&request).provider.as_ref(), "password");
	}

	#[test]
	fn remembering_is_idempotent_and_secure_over_https() {
		let request = SessionRequestContext {
			login_provider: Some("backup".into()),
			https: true,
			..Default::default()
		};
		let first = select(&request);

		assert_eq!(first, select(&request));
		assert!(first.remember.expect("Backup should be remembered.").secure);
	}
}
