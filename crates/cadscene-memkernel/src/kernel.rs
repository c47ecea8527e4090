// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape handle operations

use crate::MemShape;
use cadscene_model::{GeometryKernel, ShapeType, Transform};

/// Default tolerance for location comparison
pub const DEFAULT_TOLERANCE: f64 = 1e-7;

/// In-memory geometry kernel
///
/// Two handles are the same shape when their definitions are shared (or
/// structurally equal) and their locations agree within `tolerance`.
#[derive(Clone, Copy, Debug)]
pub struct MemKernel {
    tolerance: f64,
}

impl MemKernel {
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Default for MemKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryKernel for MemKernel {
    type Shape = MemShape;

    fn apply_transform(&self, shape: &MemShape, transform: &Transform) -> MemShape {
        if shape.is_null() {
            return MemShape::null();
        }
        shape.moved(transform)
    }

    /// Null handles report `Compound`; check [`GeometryKernel::is_null`] first.
    fn shape_type(&self, shape: &MemShape) -> ShapeType {
        shape
            .tshape()
            .map(|t| t.kind)
            .unwrap_or(ShapeType::Compound)
    }

    fn is_null(&self, shape: &MemShape) -> bool {
        shape.is_null()
    }

    fn same_shape(&self, a: &MemShape, b: &MemShape) -> bool {
        a.same_definition(b) && a.location().approx_eq(b.location(), self.tolerance)
    }

    fn make_compound(&self, shapes: &[MemShape]) -> MemShape {
        MemShape::make_compound(shapes.to_vec())
    }

    fn children(&self, shape: &MemShape) -> Vec<MemShape> {
        match shape.tshape() {
            Some(tshape) => tshape
                .children
                .iter()
                .map(|child| child.moved(shape.location()))
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_null_stays_null() {
        let kernel = MemKernel::new();
        let moved = kernel.apply_transform(&MemShape::null(), &Transform::from_translation(1.0, 0.0, 0.0));
        assert!(kernel.is_null(&moved));
    }

    #[test]
    fn test_same_shape_uses_tolerance() {
        let kernel = MemKernel::new();
        let part = MemShape::make_box(1.0, 1.0, 1.0);
        let a = kernel.apply_transform(&part, &Transform::from_translation(1.0, 0.0, 0.0));
        let b = kernel.apply_transform(&part, &Transform::from_translation(1.0 + 1e-9, 0.0, 0.0));
        let c = kernel.apply_transform(&part, &Transform::from_translation(2.0, 0.0, 0.0));

        assert!(kernel.same_shape(&a, &b));
        assert!(!kernel.same_shape(&a, &c));
    }

    #[test]
    fn test_independently_built_parts_compare_equal() {
        let kernel = MemKernel::new();
        let a = MemShape::make_box(1.0, 2.0, 3.0);
        let b = MemShape::make_box(1.0, 2.0, 3.0);
        assert!(kernel.same_shape(&a, &b));
        assert!(!kernel.same_shape(&a, &MemShape::make_box(1.0, 2.0, 4.0)));
    }

    #[test]
    fn test_compound_children_carry_compound_location() {
        let kernel = MemKernel::new();
        let compound = kernel.make_compound(&[
            MemShape::make_box(1.0, 1.0, 1.0),
            MemShape::make_cylinder(1.0, 1.0),
        ]);
        let placed = kernel.apply_transform(&compound, &Transform::from_translation(0.0, 0.0, 3.0));

        assert_eq!(kernel.shape_type(&placed), ShapeType::Compound);
        let children = kernel.children(&placed);
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].location().translation(), [0.0, 0.0, 3.0]);
        assert_eq!(kernel.shape_type(&children[0]), ShapeType::Solid);
    }
}
