//! UI5 application descriptor (manifest.json) parsing.
//!
//! Only the `sap.ui5/dependencies/minUI5Version` path is consumed; the rest
//! of the descriptor is ignored.

use serde::Deserialize;

/// Parsed application descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(rename = "sap.ui5", default)]
    sap_ui5: Option<Ui5Section>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Ui5Section {
    #[serde(default)]
    dependencies: Option<Dependencies>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Dependencies {
    #[serde(rename = "minUI5Version", default)]
    min_ui5_version: Option<String>,
}

impl Manifest {
    /// Parse a descriptor from its JSON text.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The declared minimum UI5 version, if present and non-empty.
    pub fn min_ui5_version(&self) -> Option<&str> {
        self.sap_ui5
            .as_ref()?
            .dependencies
            .as_ref()?
            .min_ui5_version
            .as_deref()
            .filter(|v| !v.is_empty())
    }
}
