use crate::nbt::NbtValue;
use quartz_nbt::{NbtCompound, NbtTag};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;
use std::hash::{Hash, Hasher};

pub const AIR: &str = "minecraft:air";

/// A block type plus its property state. Two states with the same name and
/// properties compare equal no matter where they were built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockState {
    pub name: SmolStr,
    pub properties: Vec<(SmolStr, SmolStr)>,
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.properties.is_empty() {
            write!(f, "[")?;
            for (i, (key, value)) in self.properties.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}={}", key, value)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

impl Hash for BlockState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        for (k, v) in &self.properties {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl BlockState {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        BlockState {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn air() -> Self {
        BlockState::new(AIR)
    }

    pub fn is_air(&self) -> bool {
        self.name == AIR
    }

    pub fn get_name(&self) -> &str {
        self.name.as_str()
    }

    pub fn with_property(mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn set_property(&mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) {
        let key = key.into();
        let value = value.into();
        for (k, v) in &mut self.properties {
            if *k == key {
                *v = value;
                return;
            }
        }
        self.properties.push((key, value));
    }

    pub fn get_property(&self, key: &str) -> Option<&SmolStr> {
        for (k, v) in &self.properties {
            if k == key {
                return Some(v);
            }
        }
        None
    }

    /// True when `other` has the same block type, ignoring property state.
    pub fn same_type(&self, other: &BlockState) -> bool {
        self.name == other.name
    }

    pub fn to_nbt(&self) -> NbtTag {
        let mut compound = NbtCompound::new();
        compound.insert("Name", self.name.to_string());

        if !self.properties.is_empty() {
            let mut properties = NbtCompound::new();
            for (key, value) in &self.properties {
                properties.insert(key.to_string(), value.to_string());
            }
            compound.insert("Properties", properties);
        }

        NbtTag::Compound(compound)
    }

    pub fn from_nbt(compound: &NbtCompound) -> Result<Self, String> {
        let name: SmolStr = compound
            .get::<_, &String>("Name")
            .map_err(|e| format!("Failed to get Name: {}", e))?
            .into();

        let mut properties = Vec::new();
        if let Ok(props) = compound.get::<_, &NbtCompound>("Properties") {
            for (key, value) in props.inner() {
                if let NbtTag::String(value_str) = value {
                    properties.push((key.into(), value_str.into()));
                }
            }
        }

        Ok(BlockState { name, properties })
    }
}

/// A full placed block: state plus the auxiliary structured payload that a
/// minority of blocks carry (sign text, container inventories).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseBlock {
    pub state: BlockState,
    pub data: Option<NbtValue>,
}

impl BaseBlock {
    pub fn new(state: BlockState) -> Self {
        BaseBlock { state, data: None }
    }

    pub fn with_data(state: BlockState, data: NbtValue) -> Self {
        BaseBlock {
            state,
            data: Some(data),
        }
    }

    pub fn air() -> Self {
        BaseBlock::new(BlockState::air())
    }

    pub fn is_air(&self) -> bool {
        self.state.is_air()
    }
}

impl From<BlockState> for BaseBlock {
    fn from(state: BlockState) -> Self {
        BaseBlock::new(state)
    }
}

impl fmt::Display for BaseBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::{BaseBlock, BlockState};

    #[test]
    fn test_block_state_creation() {
        let block = BlockState::new("minecraft:oak_log").with_property("axis", "y");

        assert_eq!(block.name, "minecraft:oak_log");
        assert_eq!(block.get_property("axis").map(|s| s.as_str()), Some("y"));
    }

    #[test]
    fn test_value_semantics() {
        let a = BlockState::new("minecraft:stone");
        let b = BlockState::new("minecraft:stone");
        assert_eq!(a, b);

        let c = a.clone().with_property("variant", "granite");
        assert_ne!(a, c);
        assert!(a.same_type(&c));
    }

    #[test]
    fn test_air_sentinel() {
        assert!(BaseBlock::air().is_air());
        assert!(!BaseBlock::new(BlockState::new("minecraft:dirt")).is_air());
    }
}
