//! Ordered, validated list of login providers.

// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	config::ProviderEntry,
	error::ConfigError,
	provider::{LoginProviderDescriptor, ProviderCatalog},
};

/// Login providers sorted by descending sort rank; never empty.
///
/// Providers sharing a rank keep the order they were passed to [`ProviderRegistry::new`];
/// [`ProviderRegistry::from_config`] passes them in identifier order. The first entry is the primary
/// provider used whenever neither the request nor the remembered cookie name a registered one.
#[derive(Clone, Debug)]
pub struct ProviderRegistry {
	providers: Vec<LoginProviderDescriptor>,
}
impl ProviderRegistry {
	/// Validates and orders the provided descriptors.
	pub fn new<I>(descriptors: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = LoginProviderDescriptor>,
	{
		let mut providers: Vec<LoginProviderDescriptor> = Vec::new();

		for descriptor in descriptors {
			if providers.iter().any(|known| known.id == descriptor.id) {
				return Err(ConfigError::DuplicateProvider { provider: descriptor.id.to_string() });
			}

			providers.push(descriptor);
		}

		if providers.is_empty() {
			return Err(ConfigError::EmptyRegistry);
		}

		// Stable sort keeps registration order for equal ranks.
		providers.sort_by(|a, b| b.sorting.cmp(&a.sorting));

		Ok(Self { providers })
	}

	/// Builds the registry from configuration entries, resolving each capability in `catalog`.
	///
	/// Entries are visited in identifier order, which therefore breaks ties between equal ranks.
	pub fn from_config(
		entries: &BTreeMap<String, ProviderEntry>,
		catalog: &ProviderCatalog,
	) -> Result<Self, ConfigError> {
		let mut descriptors = Vec::with_capacity(entries.len());

		for (key, entry) in entries {
			let id = ProviderId::new(key)?;
			let capability =
				entry.provider.as_deref().ok_or_else(|| ConfigError::missing_field("provider", key))?;
			let hook = catalog.resolve(capability).ok_or_else(|| ConfigError::UnknownCapability {
				provider: key.clone(),
				capability: capability.to_owned(),
			})?;
			let mut builder = LoginProviderDescriptor::builder(id).provider(capability, hook);

			if let Some(label) = entry.label.as_ref() {
				builder = builder.label(label);
			}
			if let Some(icon) = entry.icon_identifier.as_ref() {
				builder = builder.icon(icon);
			}
			if let Some(sorting) = entry.sorting {
				builder = builder.sorting(sorting);
			}

			descriptors.push(builder.build()?);
		}

		Self::new(descriptors)
	}

	/// Highest-ranked provider.
	pub fn primary(&self) -> &LoginProviderDescriptor {
		// Non-empty by construction.
		&self.providers[0]
	}

	/// Looks up a provider by identifier.
	pub fn get(&self, id: &str) -> Option<&LoginProviderDescriptor> {
		self.providers.iter().find(|descriptor| descriptor.id.as_ref() == id)
	}

	/// Returns `true` if `id` names a registered provider.
	pub fn contains(&self, id: &str) -> bool {
		self.get(id).is_some()
	}

	/// Iterates providers in descending sort rank.
	pub fn iter(&self) -> impl Iterator<Item = &LoginProviderDescriptor> {
		self.providers.iter()
	}

	/// Number of registered providers.
	pub fn len(&self) -> usize {
		self.providers.len()
	}

	/// Always `false`; kept for API symmetry with [`len`](Self::len).
	pub fn is_empty(&self) -> bool {
		self.providers.is_empty()
	}
}
