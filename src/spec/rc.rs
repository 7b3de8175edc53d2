//! Android init scripts.
//!
//! An RcScript is used in one of two modes:
//! - external: `file` names a script in the device directory that is copied as is;
//!   every other field is ignored.
//! - embedded: the script is described inline and generated at `name`.
//!
//! Setting both, or neither, is reported by validation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RcScript {
    /// Service scripts install to `$(TARGET_COPY_OUT_VENDOR)/etc/init`, the rest to `root`.
    #[serde(
        rename = "serviceRc",
        default,
        deserialize_with = "bool_or_string::deserialize",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub service_rc: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<RcAction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<RcService>,
}

/// How an RcScript is sourced, derived from `file` and `name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RcMode<'a> {
    External(&'a str),
    Embedded(&'a str),
    /// Both `file` and `name` set.
    Ambiguous,
    /// Neither set.
    Unnamed,
}

impl RcScript {
    pub fn external(file: &str) -> Self {
        Self {
            file: file.to_string(),
            ..Default::default()
        }
    }

    pub fn embedded(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn mode(&self) -> RcMode<'_> {
        match (self.file.is_empty(), self.name.is_empty()) {
            (false, true) => RcMode::External(&self.file),
            (true, false) => RcMode::Embedded(&self.name),
            (false, false) => RcMode::Ambiguous,
            (true, true) => RcMode::Unnamed,
        }
    }

    /// True when the script body is inline and must be generated.
    pub fn is_embedded(&self) -> bool {
        matches!(self.mode(), RcMode::Embedded(_))
    }

    /// True when an external script also carries inline content that will be ignored.
    pub fn has_ignored_content(&self) -> bool {
        !self.file.is_empty()
            && (!self.name.is_empty()
                || !self.imports.is_empty()
                || !self.actions.is_empty()
                || !self.services.is_empty())
    }

    /// The file copied to the device: `file` wins over `name`.
    pub fn source_name(&self) -> Option<&str> {
        if !self.file.is_empty() {
            Some(&self.file)
        } else if !self.name.is_empty() {
            Some(&self.name)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RcAction {
    pub triggers: String,
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RcService {
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub args: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// Older configs spell booleans as strings (`"serviceRc": "true"`).
mod bool_or_string {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match BoolOrString::deserialize(deserializer)? {
            BoolOrString::Bool(b) => Ok(b),
            BoolOrString::String(s) => match s.trim() {
                "true" => Ok(true),
                "false" | "" => Ok(false),
                other => Err(D::Error::custom(format!(
                    "serviceRc must be true or false, got {:?}",
                    other
                ))),
            },
        }
    }
}
