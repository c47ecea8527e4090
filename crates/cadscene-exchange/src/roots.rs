// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Root transfer policy shared by the B-rep readers

use crate::{ExchangeWarning, Imported, ReadReport};
use cadscene_model::{CadError, GeometryKernel, Result, RootTransfer};
use std::path::Path;

/// Turn a raw root transfer into an import result
///
/// - status other than `Done`: collaborator failure
/// - no roots: collaborator failure
/// - one root: returned as is, but never a null handle
/// - several roots: null handles dropped with a warning each, the rest
///   combined into one compound or returned in file order
pub(crate) fn classify_roots<K: GeometryKernel>(
    kernel: &K,
    transfer: RootTransfer<K::Shape>,
    as_compound: bool,
    path: &Path,
) -> Result<ReadReport<K::Shape>> {
    if !transfer.status.is_done() {
        return Err(CadError::collaborator(format!(
            "cannot read {}: reader status {}",
            path.display(),
            transfer.status
        )));
    }

    let mut roots = transfer.roots;
    match roots.len() {
        0 => Err(CadError::collaborator("no shape to transfer")),
        1 => {
            let root = roots.remove(0);
            if kernel.is_null(&root) {
                return Err(CadError::collaborator(format!(
                    "the only root of {} is a null shape",
                    path.display()
                )));
            }
            Ok(ReadReport {
                imported: Imported::Single(root),
                warnings: Vec::new(),
            })
        }
        count => {
            log::info!("{} holds {} root shapes", path.display(), count);
            let mut warnings = Vec::new();
            let mut kept = Vec::with_capacity(count);
            for (index, root) in roots.into_iter().enumerate() {
                if kernel.is_null(&root) {
                    let warning = ExchangeWarning::NullRootDropped { index };
                    log::warn!("{}", warning);
                    warnings.push(warning);
                } else {
                    kept.push(root);
                }
            }
            if kept.is_empty() {
                return Err(CadError::collaborator(format!(
                    "none of the {} roots of {} could be transferred",
                    count,
                    path.display()
                )));
            }

            let imported = if as_compound {
                log::info!("{} read as a compound of {} shapes", path.display(), kept.len());
                Imported::Single(kernel.make_compound(&kept))
            } else {
                Imported::Many(kept)
            };
            Ok(ReadReport { imported, warnings })
        }
    }
}
