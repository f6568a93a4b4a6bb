// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	error::ConfigError,
	provider::{LoginProvider, LoginProviderDescriptor},
};

/// Builder for [`LoginProviderDescriptor`] values.
pub struct LoginProviderDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: ProviderId,
	/// Human-readable label.
	pub label: Option<String>,
	/// Icon reference.
	pub icon: Option<String>,
	/// Sort rank.
	pub sorting: Option<i64>,
	/// Catalog name plus resolved render hook.
	pub provider: Option<(String, Arc<dyn LoginProvider>)>,
}
impl LoginProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self { id, label: None, icon: None, sorting: None, provider: None }
	}

	/// Sets the label.
	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());

		self
	}

	/// Sets the icon reference.
	pub fn icon(mut self, icon: impl Into<String>) -> Self {
		self.icon = Some(icon.into());

		self
	}

	/// Sets the sort rank.
	pub fn sorting(mut self, sorting: i64) -> Self {
		self.sorting = Some(sorting);

		self
	}

	/// Attaches the resolved render hook together with its catalog name.
	pub fn provider(mut self, capability: impl Into<String>, hook: Arc<dyn LoginProvider>) -> Self {
		self.provider = Some((capability.into(), hook));

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<LoginProviderDescriptor, ConfigError> {
		let id = self.id;
		let (capability, provider) =
			self.provider.ok_or_else(|| ConfigError::missing_field("provider", id.as_ref()))?;
		let label = required_text("label", self.label, &id)?;
		let icon = required_text("icon_identifier", self.icon, &id)?;
		let sorting =
			self.sorting.ok_or_else(|| ConfigError::missing_field("sorting", id.as_ref()))?;

		Ok(LoginProviderDescriptor { id, label, icon, sorting, capability, provider })
	}
}
impl Debug for LoginProviderDescriptorBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginProviderDescriptorBuilder")
			.field("id", &self.id)
			.field("label", &self.label)
			.field("icon", &self.icon)
			.field("sorting", &self.sorting)
			.field("provider", &self.provider.as_ref().map(|(name, _)| name))
			.finish()
	}
}

fn required_text(
	field: &'static str,
	value: Option<String>,
	id: &ProviderId,
) -> Result<String, ConfigError> {
	value
		.filter(|text| !text.trim().is_empty())
		.ok_or_else(|| ConfigError::missing_field(field, id.as_ref()))
}
