//! Item model and override file generation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::resolver::{ItemId, DEFAULT_NAMESPACE};
use super::{ItemError, ItemResult, ResolvedItem};

/// Parent model for base items.
pub const GENERATED_ITEM_PARENT: &str = "minecraft:item/generated";

/// Contents of an item model file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemModel {
    pub parent: String,
    pub textures: ModelTextures,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<ModelOverride>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelTextures {
    pub layer0: String,
}

/// One entry of a model's `overrides` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelOverride {
    pub predicate: OverridePredicate,
    pub model: String,
}

/// Only `custom_model_data` predicates are emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverridePredicate {
    pub custom_model_data: i32,
}

/// Files written by a generator run, relative to the asset root.
#[derive(Debug, Clone, Default)]
pub struct GeneratedModels {
    pub base_models: Vec<PathBuf>,
    pub custom_models: Vec<PathBuf>,
}

/// Path of a base item's model file, relative to the asset root.
pub fn base_model_path(base: &ItemId) -> PathBuf {
    Path::new("assets")
        .join(&base.namespace)
        .join("models")
        .join("item")
        .join(format!("{}.json", base.path))
}

/// Path of a generated custom model, relative to the asset root.
pub fn custom_model_path(name: &str) -> PathBuf {
    Path::new("assets")
        .join(DEFAULT_NAMESPACE)
        .join("models")
        .join(format!("{}.json", name))
}

/// Writes override models for a set of resolved custom items.
#[derive(Debug)]
pub struct ItemModelGenerator<'a> {
    items: &'a [ResolvedItem],
}

impl<'a> ItemModelGenerator<'a> {
    pub fn new(items: &'a [ResolvedItem]) -> Self {
        Self { items }
    }

    /// Items grouped by base item.
    ///
    /// Base items appear in order of first use and each group keeps
    /// descriptor order, which is the order overrides are matched in.
    pub fn groups(&self) -> Vec<(&'a ItemId, Vec<&'a ResolvedItem>)> {
        let mut groups: Vec<(&ItemId, Vec<&ResolvedItem>)> = Vec::new();
        for item in self.items {
            match groups.iter_mut().find(|(base, _)| **base == item.base) {
                Some((_, members)) => members.push(item),
                None => groups.push((&item.base, vec![item])),
            }
        }
        groups
    }

    /// Model for a base item with one override per member.
    pub fn base_model(base: &ItemId, members: &[&ResolvedItem]) -> ItemModel {
        ItemModel {
            parent: GENERATED_ITEM_PARENT.to_string(),
            textures: ModelTextures {
                layer0: base.default_texture(),
            },
            overrides: members
                .iter()
                .map(|item| ModelOverride {
                    predicate: OverridePredicate {
                        custom_model_data: item.descriptor.custom_model_data,
                    },
                    model: item.descriptor.model_ref().to_string(),
                })
                .collect(),
        }
    }

    /// Generated model for a custom item, if it asks for one.
    pub fn custom_model(item: &ResolvedItem) -> Option<ItemModel> {
        let descriptor = &item.descriptor;
        if !descriptor.generate_model {
            return None;
        }
        Some(ItemModel {
            parent: descriptor.parent_model.clone().unwrap_or_default(),
            textures: ModelTextures {
                layer0: descriptor.textures.first().cloned().unwrap_or_default(),
            },
            overrides: Vec::new(),
        })
    }

    /// Write all base and custom models below `asset_root`.
    ///
    /// Existing files at the same paths are overwritten.
    pub fn generate(&self, asset_root: &Path) -> ItemResult<GeneratedModels> {
        let mut generated = GeneratedModels::default();

        for (base, members) in self.groups() {
            let relative = base_model_path(base);
            write_model(&asset_root.join(&relative), &Self::base_model(base, &members))?;
            debug!(item = %base, overrides = members.len(), "Wrote base item model");
            generated.base_models.push(relative);
        }

        for item in self.items {
            if let Some(model) = Self::custom_model(item) {
                let relative = custom_model_path(&item.descriptor.name);
                write_model(&asset_root.join(&relative), &model)?;
                debug!(item = %item.descriptor.name, "Wrote custom item model");
                generated.custom_models.push(relative);
            }
        }

        Ok(generated)
    }
}

fn write_model(path: &Path, model: &ItemModel) -> ItemResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ItemError::WriteFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let content = serde_json::to_string_pretty(model).map_err(|e| ItemError::SerializeFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, content).map_err(|e| ItemError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::CustomItem;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn item(name: &str, base: &str, data: i32, model: Option<&str>) -> ResolvedItem {
        ResolvedItem {
            descriptor: CustomItem {
                name: name.into(),
                display_name: name.into(),
                item: base.into(),
                generate_model: model.is_none(),
                model: model.map(str::to_string),
                custom_model_data: data,
                parent_model: Some("minecraft:item/handheld".into()),
                textures: vec![format!("axolotl:item/{}", name), "unused".into()],
            },
            base: ItemId::parse(base).unwrap(),
        }
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_shared_base_item_keeps_descriptor_order() {
        let temp = TempDir::new().unwrap();
        let items = vec![
            item("ruby", "paper", 1, Some("custom/ruby")),
            item("sapphire", "paper", 2, Some("custom/sapphire")),
        ];

        ItemModelGenerator::new(&items).generate(temp.path()).unwrap();

        let model = read_json(&temp.path().join("assets/minecraft/models/item/paper.json"));
        assert_eq!(
            model,
            json!({
                "parent": "minecraft:item/generated",
                "textures": {"layer0": "minecraft:item/paper"},
                "overrides": [
                    {"predicate": {"custom_model_data": 1}, "model": "custom/ruby"},
                    {"predicate": {"custom_model_data": 2}, "model": "custom/sapphire"}
                ]
            })
        );
        assert!(!temp.path().join("assets/minecraft/models/ruby.json").exists());
    }

    #[test]
    fn test_generated_model_uses_parent_and_first_texture() {
        let temp = TempDir::new().unwrap();
        let items = vec![item("blade", "iron_sword", 3, None)];

        let generated = ItemModelGenerator::new(&items).generate(temp.path()).unwrap();
        assert_eq!(generated.custom_models.len(), 1);

        let custom = read_json(&temp.path().join("assets/minecraft/models/blade.json"));
        assert_eq!(
            custom,
            json!({
                "parent": "minecraft:item/handheld",
                "textures": {"layer0": "axolotl:item/blade"}
            })
        );

        let base = read_json(&temp.path().join("assets/minecraft/models/item/iron_sword.json"));
        assert_eq!(base["overrides"][0]["model"], "blade");
    }

    #[test]
    fn test_groups_follow_first_use() {
        let items = vec![
            item("a", "stick", 1, Some("a")),
            item("b", "paper", 2, Some("b")),
            item("c", "stick", 3, Some("c")),
        ];
        let generator = ItemModelGenerator::new(&items);
        let groups = generator.groups();

        let summary: Vec<(String, Vec<&str>)> = groups
            .iter()
            .map(|(base, members)| {
                (
                    base.path.clone(),
                    members.iter().map(|m| m.descriptor.name.as_str()).collect(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("stick".to_string(), vec!["a", "c"]),
                ("paper".to_string(), vec!["b"]),
            ]
        );
    }

    #[test]
    fn test_existing_base_model_is_overwritten() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("assets/minecraft/models/item/paper.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"parent":"old"}"#).unwrap();

        let items = vec![item("ruby", "paper", 1, Some("ruby"))];
        ItemModelGenerator::new(&items).generate(temp.path()).unwrap();

        assert_eq!(read_json(&path)["parent"], "minecraft:item/generated");
    }
}
