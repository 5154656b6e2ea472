//! Asset lookup boundary.
//!
//! Storage, thumbnailing and fetching belong to the host application.
//! The scene core only asks an [`AssetResolver`] to turn an asset id into
//! a URL, synchronously, at bind and render time.

use scenecraft_model::AssetRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{CommonError, CommonResult};

/// A resolved asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAsset {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl ResolvedAsset {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: None,
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }
}

/// id → URL lookup provided by the host application
pub trait AssetResolver {
    fn resolve(&self, asset_id: &str) -> Option<ResolvedAsset>;
}

/// Resolver that knows no assets
#[derive(Debug, Default, Clone, Copy)]
pub struct NullResolver;

impl AssetResolver for NullResolver {
    fn resolve(&self, _asset_id: &str) -> Option<ResolvedAsset> {
        None
    }
}

/// Manifest entry: either a bare URL or a full record
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ManifestEntry {
    Url(String),
    Full(ResolvedAsset),
}

/// In-memory resolver, optionally loaded from a JSON manifest
///
/// ```json
/// { "a1": "https://cdn/img.png", "logo": { "url": "/logo.svg", "alt": "Logo" } }
/// ```
#[derive(Debug, Default, Clone)]
pub struct StaticAssetResolver {
    assets: HashMap<String, ResolvedAsset>,
}

impl StaticAssetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, asset_id: impl Into<String>, url: impl Into<String>) -> Self {
        self.insert(asset_id, ResolvedAsset::new(url));
        self
    }

    pub fn insert(&mut self, asset_id: impl Into<String>, asset: ResolvedAsset) {
        self.assets.insert(asset_id.into(), asset);
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn from_manifest_str(source: &str) -> CommonResult<Self> {
        let entries: HashMap<String, ManifestEntry> = serde_json::from_str(source)?;
        let mut assets = HashMap::with_capacity(entries.len());
        for (asset_id, entry) in entries {
            let asset = match entry {
                ManifestEntry::Url(url) => ResolvedAsset::new(url),
                ManifestEntry::Full(asset) => asset,
            };
            if asset.url.trim().is_empty() {
                return Err(CommonError::EmptyAssetUrl { asset_id });
            }
            assets.insert(asset_id, asset);
        }
        Ok(Self { assets })
    }

    pub fn load(path: &Path) -> CommonResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_manifest_str(&source)
    }
}

impl AssetResolver for StaticAssetResolver {
    fn resolve(&self, asset_id: &str) -> Option<ResolvedAsset> {
        self.assets.get(asset_id).cloned()
    }
}

/// URL to display for an asset reference: the registry id wins, the
/// literal url is the fallback.
pub fn resolve_asset_url(asset: &AssetRef, resolver: &dyn AssetResolver) -> Option<String> {
    asset
        .asset_id
        .as_deref()
        .and_then(|id| resolver.resolve(id))
        .map(|resolved| resolved.url)
        .or_else(|| asset.url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_accepts_both_forms() {
        let resolver = StaticAssetResolver::from_manifest_str(
            r#"{ "a1": "https://x/img.png", "logo": { "url": "/logo.svg", "alt": "Logo" } }"#,
        )
        .unwrap();

        assert_eq!(resolver.len(), 2);
        assert_eq!(resolver.resolve("a1"), Some(ResolvedAsset::new("https://x/img.png")));
        assert_eq!(resolver.resolve("logo").unwrap().alt.as_deref(), Some("Logo"));
        assert_eq!(resolver.resolve("nope"), None);
    }

    #[test]
    fn test_manifest_rejects_empty_urls() {
        let err = StaticAssetResolver::from_manifest_str(r#"{ "a1": " " }"#).unwrap_err();
        assert!(matches!(err, CommonError::EmptyAssetUrl { asset_id } if asset_id == "a1"));

        assert!(matches!(
            StaticAssetResolver::from_manifest_str("[1, 2]"),
            Err(CommonError::Json(_))
        ));
    }

    #[test]
    fn test_resolve_asset_url_precedence() {
        let resolver = StaticAssetResolver::new().with("a1", "https://x/img.png");

        let both = AssetRef {
            asset_id: Some("a1".to_string()),
            url: Some("https://fallback".to_string()),
            alt: None,
        };
        assert_eq!(resolve_asset_url(&both, &resolver).as_deref(), Some("https://x/img.png"));

        let unknown = AssetRef {
            asset_id: Some("zz".to_string()),
            url: Some("https://fallback".to_string()),
            alt: None,
        };
        assert_eq!(resolve_asset_url(&unknown, &resolver).as_deref(), Some("https://fallback"));

        assert_eq!(resolve_asset_url(&AssetRef::from_id("zz"), &NullResolver), None);
    }
}
