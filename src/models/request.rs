//! Request body sent to the configuration test endpoint

use crate::types::ConfigKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// JSON body for `POST /admin/configs/test`
///
/// One body is built fresh per call, sent once, and discarded. The three
/// request shapes differ only in which optional fields are present:
/// single runs always carry a `config_ids` map (empty when no identifier
/// was given), bulk runs carry neither optional field, and draft runs
/// nest the unsaved payload under the category in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRequest {
    /// Categories under test; always exactly one entry today
    pub types: Vec<ConfigKind>,

    /// Per-category identifier restriction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_ids: Option<HashMap<String, Vec<String>>>,

    /// Per-category draft payloads, keyed by identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl TestRequest {
    /// Request for a single test of one category
    ///
    /// With an identifier the backend tests exactly that configuration;
    /// without one it picks whatever the category has available.
    pub fn single(kind: ConfigKind, config_id: Option<&str>) -> Self {
        let mut ids = HashMap::new();
        if let Some(id) = config_id {
            ids.insert(kind.as_str().to_string(), vec![id.to_string()]);
        }
        Self {
            types: vec![kind],
            config_ids: Some(ids),
            data: None,
        }
    }

    /// Request testing every saved configuration of a category
    pub fn bulk(kind: ConfigKind) -> Self {
        Self {
            types: vec![kind],
            config_ids: None,
            data: None,
        }
    }

    /// Request testing an unsaved payload mapping (id -> configuration)
    pub fn draft(kind: ConfigKind, type_data: Map<String, Value>) -> Self {
        let mut data = Map::new();
        data.insert(kind.as_str().to_string(), Value::Object(type_data));
        Self {
            types: vec![kind],
            config_ids: None,
            data: Some(data),
        }
    }

    /// The one category this request targets
    pub fn kind(&self) -> ConfigKind {
        self.types[0]
    }
}
