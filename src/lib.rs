//! Leaf utilities for WhatsApp Business messaging integrations.
//!
//! - [`metadata`]: lazily-parsed JSON metadata attached to contacts, notes
//!   and business records.
//! - [`template`]: numbered placeholder validation for message templates.
//! - [`graph`]: Graph API version ordering and capability gating.
//! - [`config`]: layered configuration.

pub use wabaman_config as config;
pub use wabaman_graph as graph;
pub use wabaman_metadata as metadata;
pub use wabaman_template as template;

pub use wabaman_config::Config;
pub use wabaman_graph::{ApiVersion, compare_versions};
pub use wabaman_metadata::CachedMetadata;
pub use wabaman_template::count_and_validate;

#[cfg(test)]
mod tests {
    use super::*;

    /// A contact note whose template is only sent when the configured API
    /// version is recent enough, carrying metadata untouched otherwise.
    #[test]
    fn test_components_work_together() {
        let config = Config::default();
        let mut metadata = CachedMetadata::from_bytes(r#"{"template": "Hi {{1}}, order {{2}} shipped"}"#);

        let body = metadata.get("template").and_then(|v| v.as_str()).unwrap().to_string();
        assert_eq!(count_and_validate(&body), (2, true));

        let gated = config.graph_api_version.supports(&ApiVersion::V17_0);
        metadata.set("interactive", gated);
        assert_eq!(
            metadata.to_bytes(),
            br#"{"template":"Hi {{1}}, order {{2}} shipped","interactive":false}"#
        );
    }
}
