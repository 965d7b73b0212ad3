use serde::Deserialize;

///
/// BuilderConfig
///
/// Tunables for a `PredicateBuilder`. Deserializable so hosts can carry it
/// in their own configuration files; missing keys take the defaults.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderConfig {
    /// Multi-character wildcard used when building `LIKE` patterns.
    pub wildcard: char,

    /// Record skipped fields in the builder's diagnostics.
    pub collect_diagnostics: bool,

    /// Deepest group nesting followed before a group field is skipped.
    pub max_group_depth: usize,
}

impl BuilderConfig {
    pub const DEFAULT_WILDCARD: char = '%';
    pub const DEFAULT_MAX_GROUP_DEPTH: usize = 32;
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            wildcard: Self::DEFAULT_WILDCARD,
            collect_diagnostics: true,
            max_group_depth: Self::DEFAULT_MAX_GROUP_DEPTH,
        }
    }
}
