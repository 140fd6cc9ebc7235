//! Display adapters for the bracketed debug rendering shared by every DTO
//! (`Name [field=value, ...]`).

use std::fmt;

use serde_json::Value;

/// An optional value; unset renders as `null`.
pub(crate) struct Opt<'a, T>(pub &'a Option<T>);

impl<T: fmt::Display> fmt::Display for Opt<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => v.fmt(f),
            None => f.write_str("null"),
        }
    }
}

/// An optional list, rendered as `[a, b]`.
pub(crate) struct OptList<'a, T>(pub &'a Option<Vec<T>>);

impl<T: fmt::Display> fmt::Display for OptList<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(items) = self.0 else {
            return f.write_str("null");
        };
        f.write_str("[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            item.fmt(f)?;
        }
        f.write_str("]")
    }
}

/// An extension map, rendered as `{key=value, ...}`. String values are
/// written bare, everything else as compact JSON.
pub(crate) struct Props<'a>(pub &'a serde_json::Map<String, Value>);

impl fmt::Display for Props<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Value::String(s) => write!(f, "{key}={s}")?,
                other => write!(f, "{key}={other}")?,
            }
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn props_keep_insertion_order() {
        let mut map = serde_json::Map::new();
        map.insert("zeta".into(), json!("z"));
        map.insert("alpha".into(), json!([1, 2]));
        assert_eq!(Props(&map).to_string(), "{zeta=z, alpha=[1,2]}");
    }

    #[test]
    fn unset_values_render_null() {
        let none: Option<i64> = None;
        let list: Option<Vec<String>> = None;
        assert_eq!(Opt(&none).to_string(), "null");
        assert_eq!(OptList(&list).to_string(), "null");
        assert_eq!(OptList(&Some(vec!["a".to_string(), "b".to_string()])).to_string(), "[a, b]");
    }
}
