//! Credential configuration model

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::VaultError;
use crate::sanitize::{is_sensitive_field, mask_value};

/// Fields that make a configuration worth storing
///
/// A configuration is accepted when at least one of these carries a
/// non-empty value.
pub const CREDENTIAL_FIELDS: &[&str] = &[
    "openai_api_key",
    "anthropic_api_key",
    "ms_client_id",
    "ms_client_secret",
    "atera_api_key",
    "zoho_client_id",
    "zoho_client_secret",
];

/// Field name to value mapping holding API credentials and related settings
///
/// Insertion order is kept so the encrypted JSON mirrors what the caller
/// supplied. Values are wiped from memory on drop, and `Debug` masks
/// sensitive fields.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration(IndexMap<String, String>);

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Insert a field, returning the previous value if any
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(field.into(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.shift_remove(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when the field exists with a non-empty value
    pub fn has_value(&self, field: &str) -> bool {
        self.get(field).is_some_and(|v| !v.is_empty())
    }

    /// True when at least one recognized credential field is set
    pub fn has_credentials(&self) -> bool {
        CREDENTIAL_FIELDS.iter().any(|field| self.has_value(field))
    }

    /// Names of fields that are safe to log
    pub fn non_sensitive_fields(&self) -> Vec<&str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|field| !is_sensitive_field(field))
            .collect()
    }
}

impl Drop for Configuration {
    fn drop(&mut self) {
        for value in self.0.values_mut() {
            value.zeroize();
        }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(field, value)| {
                let shown = if is_sensitive_field(field) {
                    mask_value(value)
                } else {
                    value.clone()
                };
                (field, shown)
            }))
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<IndexMap<String, String>> for Configuration {
    fn from(map: IndexMap<String, String>) -> Self {
        Self(map)
    }
}

/// Known API providers and the configuration field holding their secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAi,
    Anthropic,
    Microsoft,
    Atera,
    Zoho,
    ZohoAssist,
}

impl Provider {
    pub const ALL: [Provider; 6] = [
        Provider::OpenAi,
        Provider::Anthropic,
        Provider::Microsoft,
        Provider::Atera,
        Provider::Zoho,
        Provider::ZohoAssist,
    ];

    /// Name callers use to ask for this provider
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Microsoft => "microsoft",
            Self::Atera => "atera",
            Self::Zoho => "zoho",
            Self::ZohoAssist => "zoho_assist",
        }
    }

    /// Configuration field holding this provider's key or secret
    pub fn key_field(self) -> &'static str {
        match self {
            Self::OpenAi => "openai_api_key",
            Self::Anthropic => "anthropic_api_key",
            Self::Microsoft => "ms_client_secret",
            Self::Atera => "atera_api_key",
            Self::Zoho => "zoho_client_secret",
            Self::ZohoAssist => "zoho_assist_client_secret",
        }
    }

    /// Exact, case-sensitive lookup by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| VaultError::InvalidConfig(format!("Unknown provider: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_credentials() {
        let empty = Configuration::new();
        assert!(!empty.has_credentials());

        let unrelated: Configuration = [("foo", "bar")].into_iter().collect();
        assert!(!unrelated.has_credentials());

        let blank: Configuration = [("openai_api_key", "")].into_iter().collect();
        assert!(!blank.has_credentials());

        let client_id: Configuration = [("zoho_client_id", "1000.ABC")].into_iter().collect();
        assert!(client_id.has_credentials());

        // Provider table field, but not one that qualifies a configuration
        let assist_only: Configuration =
            [("zoho_assist_client_secret", "secret-value")].into_iter().collect();
        assert!(!assist_only.has_credentials());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut config = Configuration::new();
        config.insert("zoho_client_id", "id");
        config.insert("atera_api_key", "key");
        config.insert("anthropic_api_key", "sk-ant");

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"zoho_client_id":"id","atera_api_key":"key","anthropic_api_key":"sk-ant"}"#
        );

        let parsed: Configuration = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_non_sensitive_fields() {
        let config: Configuration = [
            ("openai_api_key", "sk-1"),
            ("ms_client_id", "id"),
            ("ms_client_secret", "s"),
            ("tenant", "contoso"),
        ]
        .into_iter()
        .collect();

        assert_eq!(config.non_sensitive_fields(), vec!["ms_client_id", "tenant"]);
    }

    #[test]
    fn test_debug_masks_secrets() {
        let config: Configuration = [("openai_api_key", "sk-ABCDEFGH1234"), ("ms_client_id", "client")]
            .into_iter()
            .collect();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-ABCDEFGH1234"));
        assert!(debug.contains("sk-A****1234"));
        assert!(debug.contains("client"));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut config: Configuration = [("a_token", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(config.remove("a_token"), Some("1".to_string()));
        assert_eq!(config.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_provider_table() {
        assert_eq!(Provider::from_name("openai").unwrap().key_field(), "openai_api_key");
        assert_eq!(Provider::from_name("microsoft").unwrap().key_field(), "ms_client_secret");
        assert_eq!(
            Provider::from_name("zoho_assist").unwrap().key_field(),
            "zoho_assist_client_secret"
        );
        assert_eq!(Provider::from_name("OpenAI"), None);
        assert_eq!(Provider::from_name("github"), None);

        assert_eq!("atera".parse::<Provider>().unwrap(), Provider::Atera);
        assert!("unknown".parse::<Provider>().is_err());

        for provider in Provider::ALL {
            assert_eq!(Provider::from_name(&provider.to_string()), Some(provider));
        }
    }
}
