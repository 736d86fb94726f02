//! Resolution of item identifiers written in descriptors.

use std::fmt;

/// Namespace used when an identifier does not name one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Canonical `namespace:path` item identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId {
    pub namespace: String,
    pub path: String,
}

impl ItemId {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// Parse `namespace:path` or a bare path in the default namespace.
    ///
    /// Returns `None` for empty parts, characters outside the identifier
    /// alphabet (`a-z 0-9 _ - .`, plus `/` in paths) or path segments that
    /// are empty, `.` or `..`.
    pub fn parse(identifier: &str) -> Option<Self> {
        let (namespace, path) = match identifier.split_once(':') {
            Some((namespace, path)) => (namespace, path),
            None => (DEFAULT_NAMESPACE, identifier),
        };

        let valid_namespace = !namespace.is_empty() && namespace.chars().all(is_namespace_char);
        if !valid_namespace || !is_valid_path(path) {
            return None;
        }

        Some(Self::new(namespace, path))
    }

    /// Default item texture for this item, e.g. `minecraft:item/paper`.
    pub fn default_texture(&self) -> String {
        format!("{}:item/{}", self.namespace, self.path)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

/// Whether `path` is a resource path that stays inside its namespace.
pub fn is_valid_path(path: &str) -> bool {
    !path.is_empty()
        && path.chars().all(|c| is_namespace_char(c) || c == '/')
        && path
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

fn is_namespace_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-' | '.')
}

/// Maps the `item` field of a custom item descriptor to a base item.
///
/// The host supplies the resolver so the generator does not depend on any
/// particular game's item registry.
pub trait ItemResolver: Send + Sync {
    /// Resolve `identifier`, returning `None` if no such item exists.
    fn resolve(&self, identifier: &str) -> Option<ItemId>;
}

/// Accepts any syntactically valid identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespacedResolver;

impl ItemResolver for NamespacedResolver {
    fn resolve(&self, identifier: &str) -> Option<ItemId> {
        ItemId::parse(identifier)
    }
}

/// Resolves against a fixed list of known items.
///
/// A bare path matches the first known item with that path in any
/// namespace; a namespaced identifier must match exactly.
#[derive(Debug, Clone, Default)]
pub struct RegistryResolver {
    items: Vec<ItemId>,
}

impl RegistryResolver {
    pub fn new(items: Vec<ItemId>) -> Self {
        Self { items }
    }

    /// Build from `namespace:path` strings, ignoring invalid ones.
    pub fn from_identifiers<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            identifiers
                .into_iter()
                .filter_map(|id| ItemId::parse(id.as_ref()))
                .collect(),
        )
    }
}

impl ItemResolver for RegistryResolver {
    fn resolve(&self, identifier: &str) -> Option<ItemId> {
        if identifier.contains(':') {
            let wanted = ItemId::parse(identifier)?;
            return self.items.iter().find(|item| **item == wanted).cloned();
        }
        self.items
            .iter()
            .find(|item| item.path == identifier)
            .cloned()
    }
}
