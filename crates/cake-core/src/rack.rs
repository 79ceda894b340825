//! CakeRack: a sorted name→Cake mapping that is itself content-addressable
//! and supports structural diff/merge.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;

use crate::cake::{Cake, CakeRole};
use crate::errors::CakeError;

#[derive(Default)]
struct Cache {
    json: Option<String>,
    cake: Option<Cake>,
    is_defined: Option<bool>,
    inverse: Option<HashMap<Cake, String>>,
}

/// Quote and escape `s` the way Python's `json.dumps` does with its default
/// `ensure_ascii=True`: control characters get the short `\b`/`\f`/`\n`/
/// `\r`/`\t` forms (or `\u00XX` otherwise), and every codepoint outside
/// `0x20..=0x7e` is escaped as `\uXXXX` (a surrogate pair above the BMP).
/// Names in a rack are arbitrary Unicode, so this keeps the canonical JSON
/// — and therefore the rack's own Cake — byte-for-byte stable across hosts.
fn escape_json_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c if (c as u32) > 0x7e => {
                let cp = c as u32;
                if cp > 0xffff {
                    let cp = cp - 0x10000;
                    let high = 0xd800 + (cp >> 10);
                    let low = 0xdc00 + (cp & 0x3ff);
                    out.push_str(&format!("\\u{high:04x}\\u{low:04x}"));
                } else {
                    out.push_str(&format!("\\u{cp:04x}"));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A sorted `name -> Cake?` mapping. Insertion order is irrelevant; the
/// canonical form (used for serialization and for the rack's own
/// self-address) always sorts names lexicographically. Every mutation
/// clears the cached JSON text, self-address, `is_defined` flag, and
/// inverse (`Cake -> name`) index.
pub struct CakeRack {
    entries: BTreeMap<String, Option<Cake>>,
    cache: RefCell<Cache>,
}

impl CakeRack {
    /// An empty rack.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            cache: RefCell::new(Cache::default()),
        }
    }

    fn invalidate(&self) {
        *self.cache.borrow_mut() = Cache::default();
    }

    /// Insert or replace the entry at `name`. `cake = None` represents an
    /// explicit undefined ("null") entry, distinct from the name being
    /// absent entirely.
    pub fn insert(&mut self, name: impl Into<String>, cake: Option<Cake>) {
        self.entries.insert(name.into(), cake);
        self.invalidate();
    }

    /// Remove `name` entirely. Returns its prior value, if the name was
    /// present.
    pub fn remove(&mut self, name: &str) -> Option<Option<Cake>> {
        let prior = self.entries.remove(name);
        if prior.is_some() {
            self.invalidate();
        }
        prior
    }

    /// Look up `name`. Distinguishes "absent" (`None`) from "present but
    /// null" (`Some(None)`).
    pub fn get(&self, name: &str) -> Option<&Option<Cake>> {
        self.entries.get(name)
    }

    /// Number of entries, defined or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the rack has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// True iff every entry has a defined (non-null) Cake.
    pub fn is_defined(&self) -> bool {
        if let Some(v) = self.cache.borrow().is_defined {
            return v;
        }
        let v = self.entries.values().all(Option::is_some);
        self.cache.borrow_mut().is_defined = Some(v);
        v
    }

    /// The inverse index, `Cake -> name`, over every defined (non-null)
    /// entry. Memoized alongside the other caches; invalidated on mutation.
    /// If more than one name shares the same Cake, later names (in sorted
    /// order) win, since the index is rebuilt by walking the sorted entries
    /// in order.
    pub fn inverse(&self) -> HashMap<Cake, String> {
        if let Some(cached) = self.cache.borrow().inverse.clone() {
            return cached;
        }
        let mut index = HashMap::new();
        for (name, cake) in &self.entries {
            if let Some(cake) = cake {
                index.insert(cake.clone(), name.clone());
            }
        }
        self.cache.borrow_mut().inverse = Some(index.clone());
        index
    }

    /// Look up the name mapped to `cake` via [`CakeRack::inverse`].
    pub fn get_name_by_cake(&self, cake: &Cake) -> Option<String> {
        self.inverse().get(cake).cloned()
    }

    /// Canonical JSON form: `[[names...], [cake_str_or_null...]]`, names
    /// sorted ascending, one space after each comma (matching the
    /// reference two-column encoding byte-for-byte).
    pub fn to_json(&self) -> String {
        if let Some(cached) = self.cache.borrow().json.clone() {
            return cached;
        }
        let names: Vec<&String> = self.entries.keys().collect();
        let mut out = String::from("[[");
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&escape_json_string(name));
        }
        out.push_str("], [");
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            match self.entries.get(*name).unwrap() {
                Some(cake) => out.push_str(&escape_json_string(&cake.to_string())),
                None => out.push_str("null"),
            }
        }
        out.push_str("]]");
        self.cache.borrow_mut().json = Some(out.clone());
        out
    }

    /// Byte length of [`CakeRack::to_json`].
    pub fn size(&self) -> usize {
        self.to_json().len()
    }

    /// This rack's own content-address: `Cake::from_bytes` over the
    /// canonical JSON, with role `NEURON` and inline embedding when the
    /// serialization is at most 32 bytes. Memoized; invalidated on
    /// mutation.
    pub fn cake(&self) -> Cake {
        if let Some(cached) = self.cache.borrow().cake.clone() {
            return cached;
        }
        let json = self.to_json();
        let cake = Cake::from_bytes_with_role(json.as_bytes(), CakeRole::Neuron);
        self.cache.borrow_mut().cake = Some(cake.clone());
        cake
    }

    /// Parse a rack from its canonical JSON string form.
    pub fn parse(json: &str) -> Result<Self, CakeError> {
        let (names, cake_strs): (Vec<String>, Vec<Option<String>>) = serde_json::from_str(json)
            .map_err(|e| CakeError::Remote(format!("malformed rack JSON: {e}")))?;
        Self::from_name_and_string_pairs(names, cake_strs)
    }

    /// Parse a rack from a byte stream yielding the canonical JSON array.
    pub fn parse_from_reader<R: Read>(mut reader: R) -> Result<Self, CakeError> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        Self::parse(&buf)
    }

    fn from_name_and_string_pairs(
        names: Vec<String>,
        cake_strs: Vec<Option<String>>,
    ) -> Result<Self, CakeError> {
        if names.len() != cake_strs.len() {
            return Err(CakeError::Remote(
                "rack JSON name/value column length mismatch".into(),
            ));
        }
        let mut rack = Self::new();
        for (name, cake_str) in names.into_iter().zip(cake_strs) {
            let cake = cake_str.map(|s| Cake::parse(&s)).transpose()?;
            rack.entries.insert(name, cake);
        }
        Ok(rack)
    }

    /// Build a rack from already-parsed names and Cakes, bypassing string
    /// encoding entirely.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Option<Cake>)>) -> Self {
        let mut rack = Self::new();
        for (name, cake) in pairs {
            rack.entries.insert(name, cake);
        }
        rack
    }

    /// Diff this rack (the "new" side) against `prev`, yielding the edits
    /// that would turn `prev` into `self`. See module docs on [`Patch`] for
    /// the suppression rule around structurally-nested ("neuron-like")
    /// entries.
    pub fn merge(&self, prev: &CakeRack) -> Vec<Patch> {
        let mut patches = Vec::new();
        let mut keys: Vec<&String> = self.entries.keys().chain(prev.entries.keys()).collect();
        keys.sort();
        keys.dedup();

        for k in keys {
            match (self.entries.get(k), prev.entries.get(k)) {
                (None, Some(_)) => patches.push(Patch::delete(k.clone())),
                (Some(new_val), None) => patches.push(Patch::update(k.clone(), new_val.clone())),
                (Some(new_val), Some(prev_val)) => {
                    if new_val == prev_val {
                        continue;
                    }
                    let new_neuron_like = is_neuron_like(new_val);
                    let prev_neuron_like = is_neuron_like(prev_val);
                    if new_neuron_like && prev_neuron_like {
                        tracing::debug!(name = %k, "merge suppressed, both sides neuron-like");
                        continue;
                    }
                    if new_neuron_like == prev_neuron_like {
                        patches.push(Patch::update(k.clone(), new_val.clone()));
                    } else {
                        patches.push(Patch::delete(k.clone()));
                        patches.push(Patch::update(k.clone(), new_val.clone()));
                    }
                }
                (None, None) => unreachable!("k came from the union of both key sets"),
            }
        }
        patches
    }
}

impl Default for CakeRack {
    fn default() -> Self {
        Self::new()
    }
}

fn is_neuron_like(entry: &Option<Cake>) -> bool {
    match entry {
        None => true,
        Some(cake) => cake.role() == CakeRole::Neuron,
    }
}

/// Whether a [`Patch`] represents a deletion or an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchAction {
    /// The name should be removed.
    Delete,
    /// The name should be set to `Patch::cake`.
    Update,
}

/// A single edit produced by [`CakeRack::merge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Whether this is a deletion or an update.
    pub action: PatchAction,
    /// The affected name.
    pub name: String,
    /// The new value, for `Update` patches. Always `None` for `Delete`.
    pub cake: Option<Cake>,
}

impl Patch {
    fn delete(name: String) -> Self {
        Self {
            action: PatchAction::Delete,
            name,
            cake: None,
        }
    }

    fn update(name: String, cake: Option<Cake>) -> Self {
        Self {
            action: PatchAction::Update,
            name,
            cake,
        }
    }
}
