#![cfg(feature = "test")]

// crates.io
use color_eyre::Result;
// self
use session_entry::{
	_preludet::*,
	config::EntryConfig,
	error::ConfigError,
	flows::{LoginView, SessionEntryController},
	protection::MemoryFormProtection,
	provider::{LoginProvider, ProviderCatalog, ProviderRegistry, USERNAME_PASSWORD},
	request::SessionRequestContext,
};

struct PasskeyProvider;
impl LoginProvider for PasskeyProvider {
	fn template(&self) -> &str {
		"Login/PasskeyForm"
	}

	fn decorate(&self, _request: &SessionRequestContext, view: &mut LoginView) {
		view.extra.insert("challenge".into(), serde_json::json!("c-123"));
	}
}

const CONFIG: &str = r#"{
	"site_url": "https://cms.example.com/",
	"login_providers": {
		"password": {
			"label": "Username / Password",
			"iconIdentifier": "actions-key",
			"sorting": 50,
			"provider": "username_password"
		},
		"passkey": {
			"label": "Passkey",
			"iconIdentifier": "actions-fingerprint",
			"sorting": 80,
			"provider": "passkey"
		},
		"backup": {
			"label": "Backup codes",
			"iconIdentifier": "actions-list",
			"sorting": 10,
			"provider": "username_password"
		}
	}
}"#;

fn catalog() -> ProviderCatalog {
	ProviderCatalog::with_defaults().with("passkey", Arc::new(PasskeyProvider))
}

#[test]
fn json_configuration_builds_an_ordered_registry() -> Result<()> {
	let config = EntryConfig::from_json_str(CONFIG)?;
	let registry = ProviderRegistry::from_config(&config.login_providers, &catalog())?;
	let order: Vec<_> = registry.iter().map(|descriptor| descriptor.id.to_string()).collect();

	assert_eq!(order, ["passkey", "password", "backup"]);
	assert_eq!(registry.primary().id, provider_id("passkey"));
	assert_eq!(registry.primary().capability, "passkey");

	Ok(())
}

#[test]
fn primary_custom_provider_renders_its_own_template() -> Result<()> {
	let config = EntryConfig::from_json_str(CONFIG)?;
	let registry = ProviderRegistry::from_config(&config.login_providers, &catalog())?;
	let protection = Arc::new(MemoryFormProtection::new(session_id("s")));
	let controller = SessionEntryController::new(
		config,
		registry,
		Arc::new(FakeAuthState::anonymous()),
		protection,
	);
	let view = controller.render_form(&SessionRequestContext::default());

	assert_eq!(view.provider_template, "Login/PasskeyForm");
	assert_eq!(view.extra.get("challenge"), Some(&serde_json::json!("c-123")));
	assert_eq!(view.login_providers.len(), 3);

	Ok(())
}

#[test]
fn incomplete_entries_name_the_missing_field() {
	let mut config = test_config();

	if let Some(entry) = config.login_providers.get_mut("backup") {
		entry.icon_identifier = None;
	}

	let err = ProviderRegistry::from_config(&config.login_providers, &catalog())
		.expect_err("A provider without icon should be rejected.");

	assert!(matches!(
		err,
		ConfigError::MissingField { field: "icon_identifier", ref provider } if provider == "backup"
	));
	assert!(err.to_string().contains("backup"));
}

#[test]
fn unknown_capabilities_fail_at_startup() {
	let mut config = test_config();
	let mut entry = provider_entry("Hardware key", 90);

	entry.provider = Some("hardware_key".into());
	config.login_providers.insert("hw".into(), entry);

	let err = ProviderRegistry::from_config(
		&config.login_providers,
		&ProviderCatalog::new().with(USERNAME_PASSWORD, Arc::new(PasskeyProvider)),
	)
	.expect_err("Unresolvable capabilities should be rejected.");

	assert!(matches!(
		err,
		ConfigError::UnknownCapability { ref capability, .. } if capability == "hardware_key"
	));
}

#[test]
fn an_empty_provider_table_is_a_configuration_error() {
	let config = EntryConfig::default();
	let err = ProviderRegistry::from_config(&config.login_providers, &catalog())
		.expect_err("At least one provider is required.");

	assert!(matches!(err, ConfigError::EmptyRegistry));
}
