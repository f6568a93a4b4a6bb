//! Provider descriptor data structures shared by the registry and the entry flows.

/// Builder API for assembling provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, auth::ProviderId, provider::LoginProvider};

/// Immutable, validated login provider registration.
#[derive(Clone)]
pub struct LoginProviderDescriptor {
	/// Unique registry key.
	pub id: ProviderId,
	/// Human-readable label.
	pub label: String,
	/// Icon reference.
	pub icon: String,
	/// Sort rank; the highest rank becomes the primary provider.
	pub sorting: i64,
	/// Catalog name the capability was resolved from.
	pub capability: String,
	/// Render hook resolved at registration time.
	pub provider: Arc<dyn LoginProvider>,
}
impl LoginProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> LoginProviderDescriptorBuilder {
		LoginProviderDescriptorBuilder::new(id)
	}

	/// Summary used for the provider switcher on the login form.
	pub fn summary(&self) -> ProviderSummary {
		ProviderSummary {
			identifier: self.id.clone(),
			label: self.label.clone(),
			icon: self.icon.clone(),
			sorting: self.sorting,
		}
	}
}
impl Debug for LoginProviderDescriptor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginProviderDescriptor")
			.field("id", &self.id)
			.field("label", &self.label)
			.field("icon", &self.icon)
			.field("sorting", &self.sorting)
			.field("capability", &self.capability)
			.finish()
	}
}

/// Serializable projection of a descriptor exposed to views.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSummary {
	/// Provider identifier.
	pub identifier: ProviderId,
	/// Human-readable label.
	pub label: String,
	/// Icon reference.
	pub icon: String,
	/// Sort rank.
	pub sorting: i64,
}
