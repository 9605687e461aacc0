//! Option resolution: user overrides deep-merged over the defaults.

use serde_json::Value;

use crate::config::CountdownConfig;
use crate::error::Result;

/// Merge `overlay` into `base`.
///
/// Where the base holds an object at a key the merge recurses into it, so
/// an overlay value that is not itself an object leaves that key alone.
/// Any other overlay value replaces the base value outright, whatever its
/// type. Keys missing from the overlay keep the base value. A non-object
/// overlay contributes nothing.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    let (Value::Object(base_map), Value::Object(overlay_map)) = (base, overlay) else {
        return;
    };

    for (key, value) in overlay_map {
        if !base_map.get(key).is_some_and(Value::is_object) {
            base_map.insert(key.clone(), value.clone());
        } else if let Some(existing) = base_map.get_mut(key) {
            deep_merge(existing, value);
        }
    }
}

/// The documented defaults as an option object.
pub fn defaults_value() -> Result<Value> {
    Ok(serde_json::to_value(CountdownConfig::default())?)
}

impl CountdownConfig {
    /// Resolve a config from zero or more override objects, applied in
    /// order over the defaults.
    ///
    /// No range checks are made; a field whose merged value has the wrong
    /// type fails deserialization.
    pub fn resolve(overrides: &[Value]) -> Result<Self> {
        let mut merged = defaults_value()?;
        for overlay in overrides {
            deep_merge(&mut merged, overlay);
        }
        tracing::debug!(layers = overrides.len(), "resolved countdown options");
        Ok(serde_json::from_value(merged)?)
    }
}
