// src/models/content.rs
// the JSON-based content item model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "imageUrl", alias = "image", default)]
    pub image: Option<String>,
    // number or date-like string
    #[serde(rename = "sortValue", default)]
    pub sort_value: Option<Value>,
    #[serde(rename = "axisValues", default)]
    pub axis_values: HashMap<String, Value>,
    // image width / height, drives the tile footprint when enabled
    #[serde(default)]
    pub aspect: Option<f32>,
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse content file: {0}")]
    Json(#[from] serde_json::Error),
}

// content files are either a bare array or an { "items": [...] } envelope
#[derive(Deserialize)]
#[serde(untagged)]
enum ContentFile {
    Items(Vec<ContentItem>),
    Envelope { items: Vec<ContentItem> },
}

impl ContentItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            summary: String::new(),
            url: None,
            image: None,
            sort_value: None,
            axis_values: HashMap::new(),
            aspect: None,
        }
    }

    pub fn with_sort_value(mut self, value: impl Into<Value>) -> Self {
        self.sort_value = Some(value.into());
        self
    }

    pub fn with_axis_value(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.axis_values.insert(key.to_string(), value.into());
        self
    }

    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = Some(aspect);
        self
    }

    pub fn axis_value(&self, key: &str) -> Option<&Value> {
        self.axis_values.get(key)
    }
}

pub fn parse_items(content: &str) -> Result<Vec<ContentItem>, ContentError> {
    let file: ContentFile = serde_json::from_str(content)?;
    Ok(match file {
        ContentFile::Items(items) => items,
        ContentFile::Envelope { items } => items,
    })
}

pub fn load_items<P: AsRef<Path>>(path: P) -> Result<Vec<ContentItem>, ContentError> {
    let content = fs::read_to_string(path)?;
    parse_items(&content)
}
