//! Login provider descriptors (data), the ordered registry, and provider hooks (behavior).
//!
//! `descriptor` exposes validated metadata ([`LoginProviderDescriptor`]) with the label, icon,
//! sort rank, and resolved capability of each provider. `registry` orders descriptors by
//! descending sort rank and guarantees a non-empty, duplicate-free list. `hook` defines
//! [`LoginProvider`], the render hook every capability implements, plus the catalog that
//! resolves capability names once at startup.

pub mod descriptor;
pub mod hook;
pub mod registry;

pub use descriptor::*;
pub use hook::*;
pub use registry::*;
