use crate::nbt::NbtValue;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::BTreeMap;

/// A free-standing entity captured alongside blocks during copy/cut. The
/// position is continuous, unlike block coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: SmolStr,
    pub position: (f64, f64, f64),
    pub nbt: BTreeMap<String, NbtValue>,
}

impl Entity {
    pub fn new(id: impl Into<SmolStr>, position: (f64, f64, f64)) -> Self {
        Entity {
            id: id.into(),
            position,
            nbt: BTreeMap::new(),
        }
    }

    /// The same entity relocated by a block offset.
    pub fn offset_by(&self, dx: i32, dy: i32, dz: i32) -> Entity {
        Entity {
            id: self.id.clone(),
            position: (
                self.position.0 + dx as f64,
                self.position.1 + dy as f64,
                self.position.2 + dz as f64,
            ),
            nbt: self.nbt.clone(),
        }
    }
}
