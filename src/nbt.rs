use quartz_nbt::{NbtCompound, NbtList, NbtTag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serde-friendly mirror of an NBT tag tree. Auxiliary block payloads and
/// entity data are stored in this form so that clipboards can round-trip
/// through bincode without touching the NBT wire format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NbtValue {
    String(String),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Byte(i8),
    Short(i16),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    ByteArray(Vec<i8>),
    List(Vec<NbtValue>),
    Compound(BTreeMap<String, NbtValue>),
}

impl NbtValue {
    pub fn compound() -> Self {
        NbtValue::Compound(BTreeMap::new())
    }

    pub fn from_tag(tag: &NbtTag) -> NbtValue {
        match tag {
            NbtTag::String(s) => NbtValue::String(s.clone()),
            NbtTag::Int(i) => NbtValue::Int(*i),
            NbtTag::Long(l) => NbtValue::Long(*l),
            NbtTag::Float(f) => NbtValue::Float(*f),
            NbtTag::Double(d) => NbtValue::Double(*d),
            NbtTag::Byte(b) => NbtValue::Byte(*b),
            NbtTag::Short(s) => NbtValue::Short(*s),
            NbtTag::IntArray(arr) => NbtValue::IntArray(arr.clone()),
            NbtTag::LongArray(arr) => NbtValue::LongArray(arr.clone()),
            NbtTag::ByteArray(arr) => NbtValue::ByteArray(arr.clone()),
            NbtTag::List(list) => NbtValue::List(list.iter().map(NbtValue::from_tag).collect()),
            NbtTag::Compound(compound) => NbtValue::from_compound(compound),
        }
    }

    pub fn from_compound(compound: &NbtCompound) -> NbtValue {
        let mut map = BTreeMap::new();
        for (key, value) in compound.inner() {
            map.insert(key.clone(), NbtValue::from_tag(value));
        }
        NbtValue::Compound(map)
    }

    pub fn to_tag(&self) -> NbtTag {
        match self {
            NbtValue::String(s) => NbtTag::String(s.clone()),
            NbtValue::Int(i) => NbtTag::Int(*i),
            NbtValue::Long(l) => NbtTag::Long(*l),
            NbtValue::Float(f) => NbtTag::Float(*f),
            NbtValue::Double(d) => NbtTag::Double(*d),
            NbtValue::Byte(b) => NbtTag::Byte(*b),
            NbtValue::Short(s) => NbtTag::Short(*s),
            NbtValue::IntArray(arr) => NbtTag::IntArray(arr.clone()),
            NbtValue::LongArray(arr) => NbtTag::LongArray(arr.clone()),
            NbtValue::ByteArray(arr) => NbtTag::ByteArray(arr.clone()),
            NbtValue::List(list) => {
                let tags: Vec<NbtTag> = list.iter().map(NbtValue::to_tag).collect();
                NbtTag::List(NbtList::from(tags))
            }
            NbtValue::Compound(map) => {
                let mut compound = NbtCompound::new();
                for (key, value) in map {
                    compound.insert(key, value.to_tag());
                }
                NbtTag::Compound(compound)
            }
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: NbtValue) {
        if let NbtValue::Compound(map) = self {
            map.insert(key.into(), value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&NbtValue> {
        match self {
            NbtValue::Compound(map) => map.get(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NbtValue;
    use quartz_nbt::{NbtCompound, NbtTag};

    #[test]
    fn test_tag_round_trip() {
        let mut compound = NbtCompound::new();
        compound.insert("Text", "hello");
        compound.insert("Count", 3i32);
        let value = NbtValue::from_compound(&compound);
        assert_eq!(value.get("Count"), Some(&NbtValue::Int(3)));

        match value.to_tag() {
            NbtTag::Compound(back) => {
                assert_eq!(back.get::<_, &String>("Text").unwrap(), "hello");
            }
            other => panic!("expected compound, got {:?}", other),
        }
    }
}
