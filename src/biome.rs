use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// A biome identifier, e.g. `minecraft:plains`. Pure value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BiomeId(pub SmolStr);

impl BiomeId {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        BiomeId(name.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BiomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
