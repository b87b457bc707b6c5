use crate::error::{RegeditError, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Which registry view an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Arch {
    /// Use whatever view the interpreter process gets. A 32bit interpreter on a
    /// 64bit machine reading `HKLM\Software` actually reads `Wow6432Node`.
    #[default]
    Agnostic,
    /// Use the machine's native view, detected by the script.
    Specific,
    X32,
    /// Has no effect on 32bit machines.
    X64,
}

impl Arch {
    /// The literal token the scripts expect as their first argument.
    pub fn token(&self) -> &'static str {
        match self {
            Arch::Agnostic => "A",
            Arch::Specific => "S",
            Arch::X32 => "32",
            Arch::X64 => "64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Arch {
    type Err = RegeditError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "A" | "AGNOSTIC" => Ok(Arch::Agnostic),
            "S" | "SPECIFIC" => Ok(Arch::Specific),
            "32" => Ok(Arch::X32),
            "64" => Ok(Arch::X64),
            _ => Err(RegeditError::UnknownArch(s.to_string())),
        }
    }
}

/// Registry value kinds understood by the put-value script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Sz,
    ExpandSz,
    Dword,
    Qword,
    Binary,
    MultiSz,
    None,
    Default,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Sz => "REG_SZ",
            ValueType::ExpandSz => "REG_EXPAND_SZ",
            ValueType::Dword => "REG_DWORD",
            ValueType::Qword => "REG_QWORD",
            ValueType::Binary => "REG_BINARY",
            ValueType::MultiSz => "REG_MULTI_SZ",
            ValueType::None => "REG_NONE",
            ValueType::Default => "REG_DEFAULT",
        }
    }

    /// Renders a payload into the single textual form passed on the command line.
    ///
    /// Binary and multi-string values must be arrays and are joined with `,`.
    /// Every other kind takes a scalar which is passed through as text.
    pub fn render(&self, value: &Value) -> Result<String> {
        match self {
            ValueType::Binary => render_array(*self, value, "numbers", |item| match item {
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
            ValueType::MultiSz => render_array(*self, value, "strings", |item| match item {
                Value::String(s) => Some(s.clone()),
                _ => None,
            }),
            _ => match value {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                Value::Bool(b) => Ok(b.to_string()),
                other => Err(RegeditError::InvalidScalar {
                    found: json_kind(other),
                    kind: *self,
                }),
            },
        }
    }
}

fn render_array(
    kind: ValueType,
    value: &Value,
    expected: &'static str,
    item: impl Fn(&Value) -> Option<String>,
) -> Result<String> {
    let invalid = |found| RegeditError::InvalidValue {
        found,
        kind,
        expected,
    };

    let items = value.as_array().ok_or_else(|| invalid(json_kind(value)))?;
    let rendered = items
        .iter()
        .map(|v| item(v).ok_or_else(|| invalid(json_kind(v))))
        .collect::<Result<Vec<_>>>()?;
    Ok(rendered.join(","))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = RegeditError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "REG_SZ" => Ok(ValueType::Sz),
            "REG_EXPAND_SZ" => Ok(ValueType::ExpandSz),
            "REG_DWORD" => Ok(ValueType::Dword),
            "REG_QWORD" => Ok(ValueType::Qword),
            "REG_BINARY" => Ok(ValueType::Binary),
            "REG_MULTI_SZ" => Ok(ValueType::MultiSz),
            "REG_NONE" => Ok(ValueType::None),
            "REG_DEFAULT" => Ok(ValueType::Default),
            _ => Err(RegeditError::UnknownValueType(s.to_string())),
        }
    }
}

impl Serialize for ValueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ValueType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A named datum stored under a key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueEntry {
    pub value: Value,
    #[serde(rename = "type")]
    pub kind: ValueType,
}

impl ValueEntry {
    pub fn new(value: impl Into<Value>, kind: ValueType) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    pub fn render(&self) -> Result<String> {
        self.kind.render(&self.value)
    }
}

/// Values to write, grouped by key path and then by value name.
///
/// Deserializes from `{ "HKCU\\Software\\X": { "Name": { "value": "v", "type": "REG_SZ" } } }`.
/// Keys and value names keep the order they were inserted or written in, which is the
/// order the put-value script receives them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueMap(Ordered<Ordered<ValueEntry>>);

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` under `key`. A name already present keeps its position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        name: impl Into<String>,
        entry: ValueEntry,
    ) -> Option<ValueEntry> {
        self.0.entry(key.into()).insert(name.into(), entry)
    }

    pub fn with(mut self, key: impl Into<String>, name: impl Into<String>, entry: ValueEntry) -> Self {
        self.insert(key, name, entry);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|(_, values)| values.is_empty())
    }

    /// Iterates `(key, value name, entry)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &ValueEntry)> {
        self.0.iter().flat_map(|(key, values)| {
            values
                .iter()
                .map(move |(name, entry)| (key.as_str(), name.as_str(), entry))
        })
    }
}

/// String keyed entries in insertion order. Serialized as a JSON object.
#[derive(Debug, Clone, PartialEq)]
struct Ordered<V>(Vec<(String, V)>);

impl<V> Default for Ordered<V> {
    fn default() -> Self {
        Ordered(Vec::new())
    }
}

impl<V: Default> Ordered<V> {
    fn entry(&mut self, key: String) -> &mut V {
        let index = match self.0.iter().position(|(k, _)| *k == key) {
            Some(index) => index,
            None => {
                self.0.push((key, V::default()));
                self.0.len() - 1
            }
        };
        &mut self.0[index].1
    }
}

impl<V> Ordered<V> {
    fn insert(&mut self, key: String, value: V) -> Option<V> {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = &(String, V)> {
        self.0.iter()
    }
}

impl<V: Serialize> Serialize for Ordered<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Ordered<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
            type Value = Ordered<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map keyed by strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
                let mut ordered = Ordered::default();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    ordered.insert(key, value);
                }
                Ok(ordered)
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

/// One or more registry key paths, kept in caller order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keys(Vec<String>);

impl Keys {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Keys {
    fn from(key: &str) -> Self {
        Keys(vec![key.to_string()])
    }
}

impl From<String> for Keys {
    fn from(key: String) -> Self {
        Keys(vec![key])
    }
}

impl From<Vec<String>> for Keys {
    fn from(keys: Vec<String>) -> Self {
        Keys(keys)
    }
}

impl From<Vec<&str>> for Keys {
    fn from(keys: Vec<&str>) -> Self {
        Keys(keys.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Keys {
    fn from(keys: &[&str]) -> Self {
        Keys(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl From<&[String]> for Keys {
    fn from(keys: &[String]) -> Self {
        Keys(keys.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Keys {
    fn from(keys: [&str; N]) -> Self {
        Keys(keys.iter().map(|k| k.to_string()).collect())
    }
}

/// What the list script reports for a single key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyListing {
    #[serde(default = "default_exists")]
    pub exists: bool,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub values: BTreeMap<String, ValueEntry>,
}

fn default_exists() -> bool {
    true
}

/// Listing results keyed by the path that was requested.
pub type Listing = BTreeMap<String, KeyListing>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn arch_tokens() {
        assert_eq!(Arch::Agnostic.token(), "A");
        assert_eq!(Arch::Specific.token(), "S");
        assert_eq!(Arch::X32.token(), "32");
        assert_eq!(Arch::X64.token(), "64");
        assert_eq!(Arch::default(), Arch::Agnostic);
    }

    #[test]
    fn arch_parses_tokens_case_insensitively() {
        assert_eq!("a".parse::<Arch>().unwrap(), Arch::Agnostic);
        assert_eq!("s".parse::<Arch>().unwrap(), Arch::Specific);
        assert_eq!("64".parse::<Arch>().unwrap(), Arch::X64);
        assert!(matches!(
            "128".parse::<Arch>(),
            Err(RegeditError::UnknownArch(_))
        ));
    }

    #[test]
    fn value_type_is_uppercased_before_matching() {
        assert_eq!("reg_sz".parse::<ValueType>().unwrap(), ValueType::Sz);
        assert_eq!(
            "Reg_Multi_Sz".parse::<ValueType>().unwrap(),
            ValueType::MultiSz
        );
        assert!(matches!(
            "REG_LINK".parse::<ValueType>(),
            Err(RegeditError::UnknownValueType(_))
        ));
    }

    #[test]
    fn binary_renders_comma_joined() {
        let rendered = ValueType::Binary.render(&json!([1, 2, 255])).unwrap();
        assert_eq!(rendered, "1,2,255");
    }

    #[test]
    fn multi_sz_renders_comma_joined() {
        let rendered = ValueType::MultiSz.render(&json!(["a", "b c"])).unwrap();
        assert_eq!(rendered, "a,b c");
    }

    #[test]
    fn empty_array_renders_empty() {
        assert_eq!(ValueType::Binary.render(&json!([])).unwrap(), "");
    }

    #[test]
    fn binary_rejects_non_array() {
        let err = ValueType::Binary.render(&json!("1,2")).unwrap_err();
        assert!(matches!(
            err,
            RegeditError::InvalidValue {
                found: "string",
                kind: ValueType::Binary,
                expected: "numbers"
            }
        ));
        assert_eq!(
            err.to_string(),
            "invalid value type string for registry type REG_BINARY, please use an array of numbers"
        );
    }

    #[test]
    fn multi_sz_rejects_non_array_with_its_own_kind() {
        let err = ValueType::MultiSz.render(&json!(42)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value type number for registry type REG_MULTI_SZ, please use an array of strings"
        );
    }

    #[test]
    fn binary_rejects_non_numeric_items() {
        let err = ValueType::Binary.render(&json!([1, "x"])).unwrap_err();
        assert!(matches!(err, RegeditError::InvalidValue { found: "string", .. }));
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(ValueType::Sz.render(&json!("v")).unwrap(), "v");
        assert_eq!(ValueType::Dword.render(&json!(10)).unwrap(), "10");
        assert_eq!(ValueType::ExpandSz.render(&json!("%PATH%")).unwrap(), "%PATH%");
    }

    #[test]
    fn scalar_kinds_reject_arrays() {
        let err = ValueType::Sz.render(&json!(["a"])).unwrap_err();
        assert!(matches!(
            err,
            RegeditError::InvalidScalar {
                found: "array",
                kind: ValueType::Sz
            }
        ));
    }

    #[test]
    fn value_map_deserializes_from_json() {
        let map: ValueMap = serde_json::from_value(json!({
            "HKCU\\Software\\X": {
                "Name": { "value": "v", "type": "reg_sz" },
                "Bits": { "value": [1, 2], "type": "REG_BINARY" }
            }
        }))
        .unwrap();

        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "HKCU\\Software\\X");
        assert_eq!(entries[0].1, "Name");
        assert_eq!(entries[0].2.kind, ValueType::Sz);
        assert_eq!(entries[1].1, "Bits");
    }

    #[test]
    fn value_map_insert_keeps_position_of_existing_name() {
        let mut map = ValueMap::new()
            .with("HKCU\\B", "Z", ValueEntry::new("1", ValueType::Sz))
            .with("HKCU\\A", "N", ValueEntry::new("2", ValueType::Sz));
        let previous = map.insert("HKCU\\B", "Z", ValueEntry::new("3", ValueType::Sz));

        assert_eq!(previous, Some(ValueEntry::new("1", ValueType::Sz)));
        let names: Vec<_> = map.iter().map(|(key, name, _)| (key, name)).collect();
        assert_eq!(names, vec![("HKCU\\B", "Z"), ("HKCU\\A", "N")]);
    }

    #[test]
    fn value_map_serializes_in_insertion_order() {
        let map = ValueMap::new()
            .with("HKCU\\B", "Z", ValueEntry::new("1", ValueType::Sz))
            .with("HKCU\\A", "N", ValueEntry::new(2, ValueType::Dword));
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"HKCU\\B":{"Z":{"value":"1","type":"REG_SZ"}},"HKCU\\A":{"N":{"value":2,"type":"REG_DWORD"}}}"#
        );
    }

    #[test]
    fn value_map_rejects_unknown_type() {
        let result: std::result::Result<ValueMap, _> = serde_json::from_value(json!({
            "HKCU\\X": { "Name": { "value": "v", "type": "REG_WHATEVER" } }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn keys_from_single_and_many() {
        assert_eq!(Keys::from("HKLM\\A").as_slice(), ["HKLM\\A".to_string()]);
        let many = Keys::from(["HKLM\\A", "HKLM\\B"]);
        assert_eq!(many.as_slice().len(), 2);
        assert_eq!(many.as_slice()[1], "HKLM\\B");
    }

    #[test]
    fn key_listing_defaults() {
        let listing: Listing = serde_json::from_value(json!({
            "HKLM\\A": { "keys": ["Sub"] }
        }))
        .unwrap();
        let entry = &listing["HKLM\\A"];
        assert!(entry.exists);
        assert_eq!(entry.keys, vec!["Sub".to_string()]);
        assert!(entry.values.is_empty());
    }
}
