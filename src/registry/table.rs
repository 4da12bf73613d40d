use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Normalize an identity key for comparison: lower-case, leading `.` stripped
pub fn normalize_identity(key: &str) -> String {
    key.to_lowercase().trim_start_matches('.').to_string()
}

/// One chat identity and the Wingspan names it plays under.
/// `names[0]` is the canonical display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    pub key: String,
    pub names: Vec<String>,
}

impl IdentityRecord {
    pub fn canonical_name(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    fn has_name_ignore_case(&self, lowered: &str) -> bool {
        self.names.iter().any(|n| n.to_lowercase() == lowered)
    }
}

/// Outcome of [`AliasTable::register`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// Name appended; carries the identity's full list afterwards
    Added { names: Vec<String> },
    /// Exact (case-sensitive) name already present for this identity
    AlreadyRegistered,
}

/// Ordered alias registry.
///
/// Records keep the order they were loaded or registered in, so lookups that
/// scan for a name resolve conflicts deterministically: the first record in
/// table order wins. Persisted as a JSON object
/// `{ "<identity>": { "wingspan name": ["A", "B"] } }` with keys in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    records: Vec<IdentityRecord>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &IdentityRecord> {
        self.records.iter()
    }

    fn position(&self, identity: &str) -> Option<usize> {
        let normalized = normalize_identity(identity);
        self.records
            .iter()
            .position(|r| normalize_identity(&r.key) == normalized)
    }

    /// Registered names for an identity, empty when unregistered
    pub fn names_for(&self, identity: &str) -> &[String] {
        match self.position(identity) {
            Some(idx) => &self.records[idx].names,
            None => &[],
        }
    }

    /// Map a raw (OCR) name to its canonical form.
    ///
    /// Case-insensitive exact match against every registered name; no trimming
    /// or fuzzy matching. Unknown names come back unchanged.
    pub fn canonicalize(&self, raw: &str) -> String {
        let lowered = raw.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.has_name_ignore_case(&lowered))
            .find_map(|r| r.canonical_name())
            .unwrap_or(raw)
            .to_string()
    }

    /// Reverse lookup: first identity (in table order) claiming `name`, ignoring case
    pub fn identity_for_name(&self, name: &str) -> Option<&str> {
        let lowered = name.to_lowercase();
        self.records
            .iter()
            .find(|r| r.has_name_ignore_case(&lowered))
            .map(|r| r.key.as_str())
    }

    /// Append `name` to `identity`, creating the record on first use.
    ///
    /// The key is normalized only to find an existing record; a new record
    /// stores `identity` as given. Duplicate detection is case-sensitive, so
    /// "Foo" and "foo" become two entries.
    pub fn register(&mut self, identity: &str, name: &str) -> Registration {
        let idx = match self.position(identity) {
            Some(idx) => idx,
            None => {
                self.records.push(IdentityRecord {
                    key: identity.to_string(),
                    names: Vec::new(),
                });
                self.records.len() - 1
            }
        };

        let record = &mut self.records[idx];
        if record.names.iter().any(|n| n == name) {
            return Registration::AlreadyRegistered;
        }

        record.names.push(name.to_string());
        Registration::Added {
            names: record.names.clone(),
        }
    }
}

#[derive(Deserialize)]
struct RecordBody {
    #[serde(rename = "wingspan name", default)]
    names: Vec<String>,
}

#[derive(Serialize)]
struct RecordBodyRef<'a> {
    #[serde(rename = "wingspan name")]
    names: &'a [String],
}

impl Serialize for AliasTable {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&record.key, &RecordBodyRef { names: &record.names })?;
        }
        map.end()
    }
}

struct TableVisitor;

impl<'de> Visitor<'de> for TableVisitor {
    type Value = AliasTable;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of identity keys to name records")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut records = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, body)) = map.next_entry::<String, RecordBody>()? {
            records.push(IdentityRecord { key, names: body.names });
        }
        Ok(AliasTable { records })
    }
}

impl<'de> Deserialize<'de> for AliasTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TableVisitor)
    }
}
