//! Parameters of the `create` call.
//!
//! [`CreateParams`] is a plain value holder: it never checks that exactly
//! one of `workspace_name` / `workspace_id` is set. That is the caller's
//! job, or the service's (see [`crate::validation`]).

use std::fmt;

use kr_domain::error::Result;
use kr_domain::trace::TraceEvent;
use serde::de::DeserializeOwned;
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::render::{Opt, Props};
use crate::types::{Extensions, Report};

const REPORT: &str = "report";
const WORKSPACE_NAME: &str = "workspace_name";
const WORKSPACE_ID: &str = "workspace_id";

/// Parameters for `create`. Pass in *either* `workspace_name` or
/// `workspace_id`; only one is needed.
///
/// On the wire the declared fields come first, always in the order
/// `report`, `workspace_name`, `workspace_id`, and unset fields are left
/// out. Any other key is kept in [`extensions`](Self::extensions) and
/// written back after the declared fields in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateParams {
    #[serde(default)]
    report: Option<Report>,
    #[serde(default)]
    workspace_name: Option<String>,
    #[serde(default)]
    workspace_id: Option<i64>,
    #[serde(flatten)]
    extensions: Extensions,
}

impl CreateParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        TraceEvent::ParamsDecoded {
            kind: "create".into(),
            declared_fields: params.declared_count(),
            extension_count: params.extensions.len(),
        }
        .emit();
        Ok(params)
    }

    /// Encode as compact JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    // ── declared fields ──────────────────────────────────────────────

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    pub fn set_report(&mut self, report: Option<Report>) {
        self.report = report;
    }

    pub fn with_report(mut self, report: Report) -> Self {
        self.report = Some(report);
        self
    }

    pub fn workspace_name(&self) -> Option<&str> {
        self.workspace_name.as_deref()
    }

    pub fn set_workspace_name(&mut self, workspace_name: Option<String>) {
        self.workspace_name = workspace_name;
    }

    pub fn with_workspace_name(mut self, workspace_name: impl Into<String>) -> Self {
        self.workspace_name = Some(workspace_name.into());
        self
    }

    pub fn workspace_id(&self) -> Option<i64> {
        self.workspace_id
    }

    pub fn set_workspace_id(&mut self, workspace_id: Option<i64>) {
        self.workspace_id = workspace_id;
    }

    pub fn with_workspace_id(mut self, workspace_id: i64) -> Self {
        self.workspace_id = Some(workspace_id);
        self
    }

    // ── extensions ───────────────────────────────────────────────────

    /// Keys outside the declared schema, in insertion order.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// The live extension map. Entries added here must not use a declared
    /// field name; serialization fails if one does.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    /// Insert or overwrite one entry and return the previous value. An
    /// overwritten key keeps its position.
    ///
    /// `report`, `workspace_name` and `workspace_id` go to their declared
    /// fields instead, exactly as they would when decoding JSON; a value of
    /// the wrong type is an error and leaves the record untouched, `null`
    /// clears the field.
    pub fn set_extension(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            REPORT => replace_declared(&mut self.report, value),
            WORKSPACE_NAME => replace_declared(&mut self.workspace_name, value),
            WORKSPACE_ID => replace_declared(&mut self.workspace_id, value),
            _ => Ok(self.extensions.insert(key, value)),
        }
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        self.set_extension(key, value)?;
        Ok(self)
    }

    /// Remove one extension entry. Later keys keep their relative order.
    pub fn remove_extension(&mut self, key: &str) -> Option<Value> {
        self.extensions.shift_remove(key)
    }

    fn declared_count(&self) -> usize {
        usize::from(self.report.is_some())
            + usize::from(self.workspace_name.is_some())
            + usize::from(self.workspace_id.is_some())
    }
}

fn is_declared(key: &str) -> bool {
    matches!(key, REPORT | WORKSPACE_NAME | WORKSPACE_ID)
}

/// Decode `value` into a declared field and hand back what was there.
fn replace_declared<T>(slot: &mut Option<T>, value: Value) -> Result<Option<Value>>
where
    T: Serialize + DeserializeOwned,
{
    let new: Option<T> = serde_json::from_value(value)?;
    let previous = std::mem::replace(slot, new);
    Ok(previous.map(serde_json::to_value).transpose()?)
}

impl Serialize for CreateParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(report) = &self.report {
            map.serialize_entry(REPORT, report)?;
        }
        if let Some(name) = &self.workspace_name {
            map.serialize_entry(WORKSPACE_NAME, name)?;
        }
        if let Some(id) = &self.workspace_id {
            map.serialize_entry(WORKSPACE_ID, id)?;
        }
        for (key, value) in &self.extensions {
            if is_declared(key) {
                tracing::warn!(key = %key, "declared field name found among extension entries");
                return Err(S::Error::custom(format!(
                    "extension key `{key}` collides with a declared field"
                )));
            }
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl fmt::Display for CreateParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CreateParams [report={}, workspaceName={}, workspaceId={}, additionalProperties={}]",
            Opt(&self.report),
            Opt(&self.workspace_name),
            Opt(&self.workspace_id),
            Props(&self.extensions),
        )
    }
}
