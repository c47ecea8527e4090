// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene document: fragments in one X3D 4.0 envelope

use crate::SceneFragment;
use cadscene_model::{CadError, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Version string written into the document metadata
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

const VERSION_SLOT: &str = "@VERSION@";
const FRAGMENTS_SLOT: &str = "@FRAGMENTS@";

const ENVELOPE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE X3D PUBLIC "ISO//Web3D//DTD X3D 4.0//EN" "https://www.web3d.org/specifications/x3d-4.0.dtd">
<X3D profile='Immersive' version='4.0' xmlns:xsd='http://www.w3.org/2001/XMLSchema-instance' xsd:noNamespaceSchemaLocation='http://www.web3d.org/specifications/x3d-4.0.xsd'>
<head>
    <meta name='generator' content='cadscene-@VERSION@ X3D exporter'/>
    <meta name='creator' content='cadscene-@VERSION@ generator'/>
    <meta name='description' content='cadscene-@VERSION@ x3dom based shape rendering'/>
</head>
<Scene>
@FRAGMENTS@
</Scene>
</X3D>
"#;

/// Ordered collection of fragments
///
/// Built by value: each [`add`](Self::add) consumes the document and returns
/// it with the fragment appended.
///
/// ```ignore
/// let doc = SceneDocument::new().add(first).add(second);
/// let path = doc.serialize(&dir)?;
/// ```
#[derive(Debug)]
pub struct SceneDocument {
    generator: String,
    fragments: Vec<SceneFragment>,
}

impl Default for SceneDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneDocument {
    pub fn new() -> Self {
        Self {
            generator: GENERATOR_VERSION.to_string(),
            fragments: Vec::new(),
        }
    }

    /// Override the version string in the metadata
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    /// Append a fragment
    pub fn add(mut self, fragment: SceneFragment) -> Self {
        self.fragments.push(fragment);
        self
    }

    pub fn fragments(&self) -> &[SceneFragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Full document text
    pub fn render(&self) -> String {
        let body: String = self.fragments.iter().map(|f| f.body()).collect();
        // Version first, so fragment text is never rescanned
        ENVELOPE
            .replace(VERSION_SLOT, &self.generator)
            .replace(FRAGMENTS_SLOT, &body)
    }

    /// Write to an explicit destination, replacing any existing file
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())?;
        log::info!("wrote {} fragments to {}", self.len(), path.display());
        Ok(())
    }

    /// Write to a new randomly named `.x3d` file inside `dir`
    ///
    /// The file is created with create-new semantics, so an existing file is
    /// never overwritten.
    pub fn serialize(&self, dir: &Path) -> Result<PathBuf> {
        if !dir.is_dir() {
            return Err(CadError::not_found(dir));
        }
        let path = dir.join(format!("{}.x3d", Uuid::new_v4().simple()));
        let mut file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        file.write_all(self.render().as_bytes())?;
        log::info!("serialized {} fragments to {}", self.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FragmentBuilder, FragmentStyle};
    use cadscene_memkernel::{MemKernel, MemShape};

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cadscene-x3d-{}", Uuid::new_v4().simple()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn fragment(shape: &MemShape) -> SceneFragment {
        let kernel = MemKernel::new();
        FragmentBuilder::new(&kernel, &kernel)
            .build(shape, &FragmentStyle::fast())
            .unwrap()
    }

    #[test]
    fn test_fragments_keep_insertion_order() {
        let first = fragment(&MemShape::make_box(1.0, 1.0, 1.0));
        let second = fragment(&MemShape::make_cylinder(1.0, 2.0));
        let (a, b) = (first.id().to_string(), second.id().to_string());

        let doc = SceneDocument::new().add(first).add(second);
        assert_eq!(doc.len(), 2);
        let text = doc.render();
        let pa = text.find(&a).unwrap();
        let pb = text.find(&b).unwrap();
        assert!(pa < pb);
    }

    #[test]
    fn test_envelope_substitution() {
        let doc = SceneDocument::new().with_generator("9.9.9");
        let text = doc.render();

        assert!(doc.is_empty());
        assert_eq!(text.matches("cadscene-9.9.9").count(), 3);
        assert!(!text.contains(VERSION_SLOT));
        assert!(!text.contains(FRAGMENTS_SLOT));
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("<X3D profile='Immersive' version='4.0'"));
        assert!(text.contains("<Scene>\n\n</Scene>"));
    }

    #[test]
    fn test_default_generator_is_crate_version() {
        let text = SceneDocument::default().render();
        assert_eq!(text.matches(&format!("cadscene-{}", GENERATOR_VERSION)).count(), 3);
    }

    #[test]
    fn test_serialize_creates_fresh_files() {
        let dir = scratch_dir();
        let doc = SceneDocument::new().add(fragment(&MemShape::make_box(2.0, 2.0, 2.0)));

        let first = doc.serialize(&dir).unwrap();
        let second = doc.serialize(&dir).unwrap();
        assert_ne!(first, second);
        assert_eq!(first.extension().unwrap(), "x3d");
        assert_eq!(first.file_stem().unwrap().len(), 32);
        assert_eq!(fs::read_to_string(&first).unwrap(), doc.render());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_serialize_into_missing_dir_is_not_found() {
        let dir = std::env::temp_dir().join(format!("cadscene-missing-{}", Uuid::new_v4().simple()));
        let err = SceneDocument::new().serialize(&dir).unwrap_err();
        assert!(matches!(err, CadError::NotFound(_)));
    }

    #[test]
    fn test_write_to_replaces_file() {
        let dir = scratch_dir();
        let path = dir.join("scene.x3d");
        fs::write(&path, "old").unwrap();

        SceneDocument::new().write_to(&path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("<X3D"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
