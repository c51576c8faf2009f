// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use anyhow::Context;
use cutsel::cutsel_error::CutselError;
use cutsel::export::CutFeatureArtifact;
use cutsel::selection::SelectionArtifact;

pub fn read_text(path: &Path) -> Result<String, CutselError> {
    std::fs::read_to_string(path).map_err(|source| CutselError::Io {
        path: path.display().to_string(),
        source,
    })
}

pub fn write_text(path: &Path, text: &str) -> Result<(), CutselError> {
    std::fs::write(path, text).map_err(|source| CutselError::Io {
        path: path.display().to_string(),
        source,
    })
}

pub fn load_cut_features(path: &Path) -> anyhow::Result<CutFeatureArtifact> {
    let text = read_text(path)?;
    CutFeatureArtifact::from_json_str(&text)
        .with_context(|| format!("loading cut features from {}", path.display()))
}

pub fn load_selection(path: &Path) -> anyhow::Result<SelectionArtifact> {
    let text = read_text(path)?;
    SelectionArtifact::from_json_str(&text)
        .with_context(|| format!("loading cut selection from {}", path.display()))
}
