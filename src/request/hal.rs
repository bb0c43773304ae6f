//! HAL (`application/hal+json`) resource helpers.

// self
use crate::_prelude::*;

const SELF_REL: &str = "self";

/// Link to a related resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
	/// Location of the resource.
	pub href: String,
}

/// `_embedded` and `_links` sections of a HAL response.
///
/// Flatten this into typed responses with `#[serde(flatten)]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HalResource {
	/// Embedded resources keyed by relation.
	#[serde(rename = "_embedded", default, skip_serializing_if = "BTreeMap::is_empty")]
	pub embedded: BTreeMap<String, serde_json::Value>,
	/// Links keyed by relation.
	#[serde(rename = "_links", default, skip_serializing_if = "BTreeMap::is_empty")]
	pub links: BTreeMap<String, Link>,
}
impl HalResource {
	/// Checks whether a link with the given relation exists.
	pub fn has_link(&self, rel: &str) -> bool {
		self.links.contains_key(rel)
	}

	/// Returns the link with the given relation.
	pub fn link(&self, rel: &str) -> Option<&Link> {
		self.links.get(rel)
	}

	/// Returns the `self` link.
	pub fn self_link(&self) -> Option<&Link> {
		self.link(SELF_REL)
	}
}
