//! On-disk shape of a model definition file.
//!
//! ```json5
//! {
//!   options: {
//!     CSS: { prefix: 'cros' },
//!   },
//!   colors: {
//!     google_grey_900: '#202124',
//!     text_color_primary: { light: '$google_grey_900', dark: '$google_grey_200' },
//!     scrim: 'rgba($google_grey_900.rgb, $disabled_opacity)',
//!   },
//!   opacities: {
//!     disabled_opacity: 0.38,
//!   },
//! }
//! ```

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A parsed model definition file. Unknown top-level keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DefinitionFile {
    /// Output-target contexts keyed by target name (`CSS`, `proto`, ...)
    pub options: BTreeMap<String, Value>,

    pub colors: BTreeMap<String, ColorValue>,

    pub opacities: BTreeMap<String, Value>,
}

/// A color is either a single expression or one expression per mode.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Plain(String),
    Modes(BTreeMap<String, Value>),
}

impl ColorValue {
    /// All string expressions this value carries, in mode order.
    pub fn expressions(&self) -> Vec<&str> {
        match self {
            ColorValue::Plain(expr) => vec![expr.as_str()],
            ColorValue::Modes(modes) => modes.values().filter_map(Value::as_str).collect(),
        }
    }
}
