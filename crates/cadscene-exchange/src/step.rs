// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP import and export

use crate::exchange::ensure_exists;
use crate::roots::classify_roots;
use crate::{Exchange, ReadReport, WriteReport};
use cadscene_model::{
    FormatOptions, GeometryKernel, ReadOptions, Result, ShapeReader, ShapeWriter, StepSchema,
};
use std::path::Path;

impl<'k, K: GeometryKernel> Exchange<'k, K> {
    /// Read a STEP file
    ///
    /// With several roots, `as_compound` selects one compound over the
    /// ordered list.
    pub fn read_step<R>(
        &self,
        reader: &R,
        path: impl AsRef<Path>,
        as_compound: bool,
    ) -> Result<ReadReport<K::Shape>>
    where
        R: ShapeReader<Shape = K::Shape>,
    {
        let path = path.as_ref();
        ensure_exists(path)?;
        let transfer = reader.read_roots(path, &ReadOptions::default());
        classify_roots(self.kernel, transfer, as_compound, path)
    }

    /// Write a shape to a STEP file
    ///
    /// `protocol` must be one of `AP203`, `AP214IS` or `AP242DIS`.
    pub fn write_step<W>(
        &self,
        writer: &W,
        shape: &K::Shape,
        path: impl AsRef<Path>,
        protocol: &str,
    ) -> Result<WriteReport>
    where
        W: ShapeWriter<Shape = K::Shape>,
    {
        let path = path.as_ref();
        self.require_shape(shape)?;
        let schema: StepSchema = protocol.parse()?;
        self.write_checked(writer, shape, path, &FormatOptions::Step { schema }, "STEP")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExchangeWarning, Imported};
    use cadscene_memkernel::{MemKernel, MemShape, NativeExchange};
    use cadscene_model::{CadError, ShapeType, Transform};
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cadscene-step-{}", uuid::Uuid::new_v4().simple()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_write_then_read_single_shape() {
        let kernel = MemKernel::new();
        let exchange = Exchange::new(&kernel);
        let step = NativeExchange::step();
        let path = scratch_dir().join("part.stp");
        let shape = kernel.apply_transform(
            &MemShape::make_box(10.0, 20.0, 30.0),
            &Transform::from_translation(0.0, 0.0, 10.0),
        );

        let written = exchange.write_step(&step, &shape, &path, "AP214IS").unwrap();
        assert_eq!(written.path, path);
        assert!(written.warnings.is_empty());
        assert_eq!(step.schema_of(&path).as_deref(), Some("AP214IS"));

        let read = exchange.read_step(&step, &path, true).unwrap();
        assert!(kernel.same_shape(read.imported.as_single().unwrap(), &shape));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let kernel = MemKernel::new();
        let path = scratch_dir().join("absent.stp");
        let err = Exchange::new(&kernel)
            .read_step(&NativeExchange::step(), &path, true)
            .unwrap_err();
        assert!(matches!(err, CadError::NotFound(_)));
    }

    #[test]
    fn test_multi_root_file() {
        let kernel = MemKernel::new();
        let exchange = Exchange::new(&kernel);
        let step = NativeExchange::step();
        let path = scratch_dir().join("multi.stp");
        let roots = vec![
            MemShape::make_box(1.0, 1.0, 1.0),
            MemShape::null(),
            MemShape::make_cylinder(2.0, 3.0),
        ];
        step.write_roots(&roots, &path).unwrap();

        let as_list = exchange.read_step(&step, &path, false).unwrap();
        assert_eq!(as_list.warnings, vec![ExchangeWarning::NullRootDropped { index: 1 }]);
        match as_list.imported {
            Imported::Many(shapes) => assert_eq!(shapes.len(), 2),
            other => panic!("expected a list, got {:?}", other),
        }

        let as_compound = exchange.read_step(&step, &path, true).unwrap();
        let compound = as_compound.imported.as_single().unwrap();
        assert_eq!(kernel.shape_type(compound), ShapeType::Compound);
    }

    #[test]
    fn test_wrong_format_is_collaborator_failure() {
        let kernel = MemKernel::new();
        let path = scratch_dir().join("drawing.igs");
        NativeExchange::iges()
            .write_roots(&[MemShape::make_box(1.0, 1.0, 1.0)], &path)
            .unwrap();

        let err = Exchange::new(&kernel)
            .read_step(&NativeExchange::step(), &path, true)
            .unwrap_err();
        assert!(matches!(err, CadError::Collaborator(_)));
    }

    #[test]
    fn test_protocol_allow_list() {
        let kernel = MemKernel::new();
        let exchange = Exchange::new(&kernel);
        let step = NativeExchange::step();
        let dir = scratch_dir();
        let shape = MemShape::make_box(1.0, 1.0, 1.0);

        for protocol in StepSchema::ALLOWED {
            let path = dir.join(format!("{}.stp", protocol));
            exchange.write_step(&step, &shape, &path, protocol).unwrap();
        }

        let path = dir.join("bad.stp");
        let err = exchange.write_step(&step, &shape, &path, "AP214").unwrap_err();
        assert!(matches!(err, CadError::InvalidInput(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_null_shape_rejected_before_writer() {
        let kernel = MemKernel::new();
        let path = scratch_dir().join("null.stp");
        let err = Exchange::new(&kernel)
            .write_step(&NativeExchange::step(), &MemShape::null(), &path, "AP203")
            .unwrap_err();
        assert!(err.is_precondition());
        assert!(!path.exists());
    }

    #[test]
    fn test_overwrite_emits_one_warning() {
        let kernel = MemKernel::new();
        let exchange = Exchange::new(&kernel);
        let step = NativeExchange::step();
        let path = scratch_dir().join("again.stp");
        let shape = MemShape::make_box(1.0, 1.0, 1.0);

        exchange.write_step(&step, &shape, &path, "AP203").unwrap();
        let second = exchange.write_step(&step, &shape, &path, "AP242DIS").unwrap();
        assert_eq!(second.warnings, vec![ExchangeWarning::OverwritingFile(path.clone())]);
        assert_eq!(step.schema_of(&path).as_deref(), Some("AP242DIS"));
    }
}
