//! Thread-safe in-memory [`FormProtection`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{FormToken, SessionId},
	protection::{self, FormProtection, FormProtectionError},
};

/// Longer-lived token registry shared between sessions.
pub type TokenRegistry = Arc<RwLock<HashMap<SessionId, FormToken>>>;

/// Operations recorded by [`MemoryFormProtection`], in call order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProtectionOp {
	/// [`FormProtection::store_session_token_in_registry`].
	StoreInRegistry,
	/// [`FormProtection::set_session_token_from_registry`].
	SetFromRegistry,
	/// [`FormProtection::persist_session_token`].
	Persist,
	/// [`FormProtection::clean`].
	Clean,
}

#[derive(Debug, Default)]
struct SessionSlot {
	token: Option<FormToken>,
	persisted: Option<FormToken>,
}

/// Form protection for a single session, backed by a shareable in-process registry.
#[derive(Debug)]
pub struct MemoryFormProtection {
	session: SessionId,
	slot: RwLock<SessionSlot>,
	registry: TokenRegistry,
	ops: Mutex<Vec<ProtectionOp>>,
}
impl MemoryFormProtection {
	/// Creates protection for `session` with a private registry.
	pub fn new(session: SessionId) -> Self {
		Self::with_registry(session, TokenRegistry::default())
	}

	/// Creates protection for `session` sharing `registry` with other sessions.
	pub fn with_registry(session: SessionId, registry: TokenRegistry) -> Self {
		Self {
			session,
			slot: RwLock::new(SessionSlot::default()),
			registry,
			ops: Mutex::new(Vec::new()),
		}
	}

	/// Registry backing this instance.
	pub fn registry(&self) -> TokenRegistry {
		self.registry.clone()
	}

	/// Current session token, if one was created or restored.
	pub fn session_token(&self) -> Option<FormToken> {
		self.slot.read().token.clone()
	}

	/// Token last written into the session.
	pub fn persisted_token(&self) -> Option<FormToken> {
		self.slot.read().persisted.clone()
	}

	/// Operations invoked so far.
	pub fn operations(&self) -> Vec<ProtectionOp> {
		self.ops.lock().clone()
	}

	fn record(&self, op: ProtectionOp) {
		self.ops.lock().push(op);
	}

	fn ensure_session_token(&self) -> FormToken {
		let mut slot = self.slot.write();

		slot.token.get_or_insert_with(FormToken::generate).clone()
	}
}
impl FormProtection for MemoryFormProtection {
	fn store_session_token_in_registry(&self) -> Result<(), FormProtectionError> {
		self.record(ProtectionOp::StoreInRegistry);

		let token = self.ensure_session_token();

		self.registry.write().insert(self.session.clone(), token);

		Ok(())
	}

	fn set_session_token_from_registry(&self) -> Result<(), FormProtectionError> {
		self.record(ProtectionOp::SetFromRegistry);

		let token = self.registry.read().get(&self.session).cloned().ok_or_else(|| {
			FormProtectionError::MissingRegistryToken { session: self.session.to_string() }
		})?;

		self.slot.write().token = Some(token);

		Ok(())
	}

	fn persist_session_token(&self) -> Result<(), FormProtectionError> {
		self.record(ProtectionOp::Persist);

		let token = self.ensure_session_token();

		self.slot.write().persisted = Some(token);

		Ok(())
	}

	fn generate_token(
		&self,
		form: &str,
		action: &str,
		instance: &str,
	) -> Result<FormToken, FormProtectionError> {
		let session = self.ensure_session_token();

		Ok(protection::derive_form_token(&session, form, action, instance))
	}

	fn validate_token(&self, token: &str, form: &str, action: &str, instance: &str) -> bool {
		match self.slot.read().token.as_ref() {
			Some(session) => protection::tokens_match(
				protection::derive_form_token(session, form, action, instance).expose(),
				token,
			),
			None => false,
		}
	}

	fn clean(&self) {
		self.record(ProtectionOp::Clean);

		*self.slot.write() = SessionSlot::default();
		self.registry.write().remove(&self.session);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn session(value: &str) -> SessionId {
		SessionId::new(value).expect("Session fixture should be valid.")
	}

	#[test]
	fn tokens_are_created_lazily_and_validate() {
		let protection = MemoryFormProtection::new(session("s-1"));

		assert!(protection.session_token().is_none());
		assert!(!protection.validate_token("anything", "login", "submit", ""));

		let token = protection
			.generate_token("login", "submit", "")
			.expect("Generating a form token should succeed.");

		assert!(protection.session_token().is_some());
		assert!(protection.validate_token(token.expose(), "login", "submit", ""));
		assert!(!protection.validate_token(token.expose(), "login", "other", ""));
	}

	#[test]
	fn registry_restores_the_session_token_for_a_new_instance() {
		let first = MemoryFormProtection::new(session("s-1"));

		first.store_session_token_in_registry().expect("Storing the token should succeed.");

		let original = first.session_token().expect("Storing should create the session token.");
		let second = MemoryFormProtection::with_registry(session("s-1"), first.registry());

		second.set_session_token_from_registry().expect("Registry lookup should succeed.");
		second.persist_session_token().expect("Persisting should succeed.");

		assert_eq!(second.session_token(), Some(original.clone()));
		assert_eq!(second.persisted_token(), Some(original));
		assert_eq!(second.operations(), [ProtectionOp::SetFromRegistry, ProtectionOp::Persist]);
	}

	#[test]
	fn missing_registry_entry_is_an_error() {
		let protection = MemoryFormProtection::new(session("s-missing"));
		let err = protection
			.set_session_token_from_registry()
			.expect_err("An empty registry cannot restore a token.");

		assert_eq!(err, FormProtectionError::MissingRegistryToken { session: "s-missing".into() });
	}

	#[test]
	fn clean_forgets_session_and_registry_entries() {
		let protection = MemoryFormProtection::new(session("s-1"));

		protection.store_session_token_in_registry().expect("Storing the token should succeed.");
		protection.clean();

		assert!(protection.session_token().is_none());
		assert!(protection.registry().read().is_empty());
	}
}
