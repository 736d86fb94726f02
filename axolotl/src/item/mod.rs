//! Custom items and their model overrides.
//!
//! A custom item is a vanilla base item carrying a `CustomModelData` tag.
//! The pack gives each base item an override list that swaps in the custom
//! model when the tag matches. Custom models are either referenced by name
//! or generated from a parent model and a texture.

mod generator;
mod resolver;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::descriptor::{self, DescriptorError};

pub use generator::{
    base_model_path, custom_model_path, GeneratedModels, ItemModel, ItemModelGenerator,
    ModelOverride, ModelTextures, OverridePredicate, GENERATED_ITEM_PARENT,
};
pub use resolver::{
    is_valid_path, ItemId, ItemResolver, NamespacedResolver, RegistryResolver, DEFAULT_NAMESPACE,
};

/// Result type for item operations.
pub type ItemResult<T> = Result<T, ItemError>;

/// Errors raised while loading items or writing their models.
#[derive(Debug, Error)]
pub enum ItemError {
    /// An item descriptor file could not be loaded.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    /// The descriptor's base item is not known to the resolver.
    #[error("item '{name}' uses unknown base item '{item}'")]
    UnknownBaseItem { name: String, item: String },

    /// The descriptor is missing fields its model mode requires.
    #[error("item '{name}' is invalid: {reason}")]
    InvalidDescriptor { name: String, reason: String },

    /// A model file or its directory could not be written.
    #[error("failed to write model {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A model could not be serialized.
    #[error("failed to serialize model {}: {source}", .path.display())]
    SerializeFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A custom item as written in a descriptor file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomItem {
    pub name: String,
    pub display_name: String,

    /// Base item identifier, resolved through an [`ItemResolver`].
    pub item: String,

    #[serde(default)]
    pub generate_model: bool,

    /// Model reference used when no model is generated.
    #[serde(default)]
    pub model: Option<String>,

    pub custom_model_data: i32,

    #[serde(default)]
    pub parent_model: Option<String>,

    #[serde(default)]
    pub textures: Vec<String>,
}

impl CustomItem {
    /// Check that the fields required by the model mode are present.
    pub fn validate(&self) -> ItemResult<()> {
        let reason = if self.generate_model {
            if !resolver::is_valid_path(&self.name) {
                Some("generate_model requires a name usable as a model path")
            } else if self.parent_model.as_deref().map_or(true, str::is_empty) {
                Some("generate_model requires parent_model")
            } else if self.textures.is_empty() {
                Some("generate_model requires at least one texture")
            } else {
                None
            }
        } else if self.model.as_deref().map_or(true, str::is_empty) {
            Some("model is required when generate_model is false")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ItemError::InvalidDescriptor {
                name: self.name.clone(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Model the override for this item points at.
    pub fn model_ref(&self) -> &str {
        if self.generate_model {
            &self.name
        } else {
            self.model.as_deref().unwrap_or_default()
        }
    }
}

/// A validated custom item with its resolved base item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub descriptor: CustomItem,
    pub base: ItemId,
}

impl ResolvedItem {
    /// Validate `descriptor` and resolve its base item.
    pub fn resolve(descriptor: CustomItem, resolver: &dyn ItemResolver) -> ItemResult<Self> {
        descriptor.validate()?;
        let base = resolver
            .resolve(&descriptor.item)
            .ok_or_else(|| ItemError::UnknownBaseItem {
                name: descriptor.name.clone(),
                item: descriptor.item.clone(),
            })?;
        Ok(Self { descriptor, base })
    }
}

/// Load, validate and resolve every item descriptor in `dir`.
pub fn load_items(dir: &Path, resolver: &dyn ItemResolver) -> ItemResult<Vec<ResolvedItem>> {
    let files = descriptor::load_dir::<CustomItem>(dir, "item")?;

    let mut items = Vec::new();
    for file in files {
        for descriptor in file.entries {
            items.push(ResolvedItem::resolve(descriptor, resolver)?);
        }
    }

    info!("Found {} custom items", items.len());
    Ok(items)
}
