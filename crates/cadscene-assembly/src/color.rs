// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Instance/definition color resolution

use cadscene_model::{AssemblyDocument, Color, ColorSlot, LabelId};

/// Where a resolved color came from
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ColorSource {
    /// Recorded against the placed shape
    Instance,
    /// Attached to the label definition
    Definition,
    /// Nothing resolved
    Default,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ResolvedColor {
    pub color: Color,
    pub source: ColorSource,
}

fn first_slot(mut lookup: impl FnMut(ColorSlot) -> Option<Color>) -> Option<Color> {
    ColorSlot::ALL.into_iter().find_map(|slot| lookup(slot))
}

fn write_all_slots<D: AssemblyDocument>(document: &mut D, placed: &D::Shape, color: Color) {
    for slot in ColorSlot::ALL {
        document.set_instance_color(placed, slot, color);
    }
}

/// Resolve the display color of a placed shape
///
/// Precedence, first hit wins:
/// 1. an instance color of `placed` in any slot (generic, surface, curve);
/// 2. a definition color of `label` in any slot;
/// 3. `default`.
///
/// A color found in steps 1 or 2 is written back into all three instance
/// slots of `placed`, so a second call returns the same color from step 1.
pub fn resolve_color<D: AssemblyDocument>(
    document: &mut D,
    placed: &D::Shape,
    label: LabelId,
    default: Color,
) -> ResolvedColor {
    if let Some(color) = first_slot(|slot| document.instance_color(placed, slot)) {
        write_all_slots(document, placed, color);
        return ResolvedColor {
            color,
            source: ColorSource::Instance,
        };
    }

    if let Some(color) = first_slot(|slot| document.label_color(label, slot)) {
        write_all_slots(document, placed, color);
        return ResolvedColor {
            color,
            source: ColorSource::Definition,
        };
    }

    ResolvedColor {
        color: default,
        source: ColorSource::Default,
    }
}
