//! `<set>.info` metadata.
//!
//! The info file is a YAML mapping written one key per line, with sequences
//! and nested mappings in flow style, the way LHAPDF ships them.

use serde_yaml_ng::{Mapping, Value};

use gp_core::{Error, Result};

/// Key holding the number of members.
pub const NUM_MEMBERS: &str = "NumMembers";
/// Key holding the declared flavor list.
pub const FLAVORS: &str = "Flavors";
/// Key holding the length of the flavor list.
pub const NUM_FLAVORS: &str = "NumFlavors";
/// Key of the positivity flag.
pub const FORCE_POSITIVE: &str = "ForcePositive";
/// Key of the set description.
pub const SET_DESC: &str = "SetDesc";

/// Ordered set metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info {
    entries: Mapping,
}

impl Info {
    /// Empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the whole document. An empty document yields empty metadata.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_yaml_ng::from_str(text)?;
        match value {
            Value::Null => Ok(Self::new()),
            Value::Mapping(entries) => Ok(Self { entries }),
            other => Err(Error::Validation(format!(
                "info document must be a mapping, found {}",
                kind(&other)
            ))),
        }
    }

    /// Underlying mapping.
    pub fn as_mapping(&self) -> &Mapping {
        &self.entries
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no key is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// True if `key` is set.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set `key`, keeping its position if it already exists.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.entries.insert(Value::String(key.to_string()), value.into());
    }

    /// Declared number of members; accepts integers and integer strings.
    pub fn num_members(&self) -> Result<usize> {
        let value = self
            .get(NUM_MEMBERS)
            .ok_or_else(|| Error::Validation(format!("info has no '{NUM_MEMBERS}' entry")))?;
        let parsed = match value {
            Value::Number(n) => n.as_u64().map(|n| n as usize),
            Value::String(s) => s.trim().parse::<usize>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| {
            Error::Validation(format!("'{NUM_MEMBERS}' is not a member count: {value:?}"))
        })
    }

    /// Declared flavor list, if present and well formed.
    pub fn flavors(&self) -> Option<Vec<i32>> {
        match self.get(FLAVORS)? {
            Value::Sequence(seq) => seq
                .iter()
                .map(|v| v.as_i64().and_then(|p| i32::try_from(p).ok()))
                .collect(),
            _ => None,
        }
    }

    /// Set `Flavors` and `NumFlavors`.
    pub fn set_flavors(&mut self, pids: &[i32]) {
        let seq: Vec<Value> = pids.iter().map(|&p| Value::from(p)).collect();
        self.insert(FLAVORS, Value::Sequence(seq));
        self.insert(NUM_FLAVORS, pids.len() as u64);
    }

    /// Merge caller overrides; overrides win on collision.
    ///
    /// `update` must be a mapping.
    pub fn merge(&mut self, update: &Value) -> Result<()> {
        let Value::Mapping(map) = update else {
            return Err(Error::InfoUpdate(format!("expected a mapping, got {}", kind(update))));
        };
        for (k, v) in map {
            self.entries.insert(k.clone(), v.clone());
        }
        Ok(())
    }

    /// Render in the LHAPDF layout: `Key: value` per line.
    pub fn to_lhapdf_string(&self) -> Result<String> {
        let mut out = String::new();
        for (k, v) in &self.entries {
            out.push_str(&flow(k)?);
            out.push_str(": ");
            out.push_str(&flow(v)?);
            out.push('\n');
        }
        Ok(out)
    }
}

fn flow(value: &Value) -> Result<String> {
    Ok(match value {
        Value::Sequence(seq) => {
            let items = seq.iter().map(flow).collect::<Result<Vec<_>>>()?;
            format!("[{}]", items.join(", "))
        }
        Value::Mapping(map) => {
            let items = map
                .iter()
                .map(|(k, v)| Ok(format!("{}: {}", flow(k)?, flow(v)?)))
                .collect::<Result<Vec<_>>>()?;
            format!("{{{}}}", items.join(", "))
        }
        // flow indicators would split the value inside `[..]` or `{..}`
        Value::String(s) if s.contains(['\n', '\r', '\t', ',', '[', ']', '{', '}']) => quote(s),
        other => scalar(other)?,
    })
}

fn scalar(value: &Value) -> Result<String> {
    let rendered = serde_yaml_ng::to_string(value)?;
    let rendered = rendered.trim_end();
    let rendered = rendered.strip_suffix("\n...").unwrap_or(rendered);
    Ok(rendered.trim_end().to_string())
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
