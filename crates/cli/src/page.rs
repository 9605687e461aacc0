//! The page file: which panels exist and which options they start with.
//!
//! ```toml
//! [page]
//! selector = ".countdown"
//!
//! [[page.panels]]
//! id = "launch"
//! classes = ["countdown"]
//!
//! [options]
//! year = 2030
//! month = 1
//! day = 1
//! zeroPad = true
//! ```

use serde::Deserialize;
use serde_json::Value;

use sc_engine::MemoryDocument;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub page: PageConfig,
    /// Option overrides, merged over the defaults before command-line flags.
    #[serde(default = "empty_options")]
    pub options: Value,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page: PageConfig::default(),
            options: empty_options(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    #[serde(default = "d_selector")]
    pub selector: String,
    #[serde(default)]
    pub panels: Vec<PanelConfig>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            selector: d_selector(),
            panels: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PanelConfig {
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
}

fn d_selector() -> String {
    "#countdown".into()
}

fn empty_options() -> Value {
    Value::Object(Default::default())
}

/// Build the in-memory page. With no panels configured a single
/// `div#countdown` is created.
pub fn build_document(page: &PageConfig) -> MemoryDocument {
    let doc = MemoryDocument::new();
    if page.panels.is_empty() {
        doc.add_element("div", Some("countdown"), &[]);
        return doc;
    }

    for panel in &page.panels {
        let classes: Vec<&str> = panel.classes.iter().map(String::as_str).collect();
        doc.add_element("div", panel.id.as_deref(), &classes);
    }
    doc
}
