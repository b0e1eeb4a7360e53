/*
This file is part of the HTM indexing engine.

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! The survey-grid ingestion pipeline: discover datasets, map their UTM
//! frame onto the mesh, bin layer rows into per-trixel chunks, backfill
//! ancestors, simplify, and write the manifest.

pub mod backfill;
pub mod blob;
pub mod chunk;
pub mod dataset;
pub mod manifest;
pub mod mapping;
pub mod simplify;
pub mod utm;

use std::collections::BTreeSet;
use std::path::Path;

use crate::constants::INGEST_MAX_DEPTH;
use crate::error::{HtmError, Result};
use blob::BlobStore;
use dataset::Dataset;
use utm::UtmProjector;

/// Scans `unprocessed_dir` for ingestable datasets and runs the full
/// pipeline on each in turn. A dataset whose ingest fails with
/// [`HtmError::InvalidArgument`] or [`HtmError::IoError`] is logged and
/// skipped so the run can continue with the remaining datasets; a dataset
/// whose ingest fails with [`HtmError::IntegrityError`] aborts the whole
/// run. A dataset that cannot even be parsed is skipped during discovery
/// (see [`dataset::get_ingestable_datasets`]).
pub fn process_data(
    store: &dyn BlobStore,
    projector: &dyn UtmProjector,
    unprocessed_dir: &Path,
    processed_dir: &Path,
) -> Result<()> {
    let datasets = dataset::get_ingestable_datasets(unprocessed_dir, processed_dir);
    log::info!("found {} ingestable dataset(s)", datasets.len());

    for dataset in &datasets {
        match ingest_dataset(store, projector, dataset) {
            Ok(()) => {}
            Err(err @ (HtmError::InvalidArgument(_) | HtmError::IoError { .. })) => {
                log::warn!("skipping {}: {}", dataset.name, err);
            }
            Err(err @ HtmError::IntegrityError(_)) => {
                log::error!("aborting ingest: {}", err);
                return Err(err);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

/// Runs the full pipeline for a single dataset: build the UTM-to-trixel
/// mapping, write every layer's rows into per-leaf chunks, backfill those
/// leaves up to the minimum ingest depth, simplify, and write the
/// manifest.
pub fn ingest_dataset(store: &dyn BlobStore, projector: &dyn UtmProjector, dataset: &Dataset) -> Result<()> {
    log::info!("ingesting {}", dataset);

    let (min_x, max_x, min_y, max_y) = dataset_extent(dataset)?;

    log::info!(
        "dataset {} data extent: ({}, {}) to ({}, {})",
        dataset.name,
        min_x,
        min_y,
        max_x,
        max_y
    );

    let grid_mapping = mapping::build_utm_to_htm_mapping(dataset, projector, min_x, min_y, max_x, max_y);

    let mut saved_trixels: BTreeSet<String> = BTreeSet::new();

    for layer_path in &dataset.layers {
        log::info!("ingesting layer {}", layer_path.display());
        let rows = chunk::parse_layer_lines(layer_path)
            .map_err(|e| crate::error::HtmError::InvalidArgument(e.to_string()))?;
        let groups = chunk::group_layer_by_trixel(dataset, projector, &rows, &grid_mapping);
        chunk::write_layer_chunks(store, dataset, &groups, &mut saved_trixels)?;
    }

    if saved_trixels.is_empty() {
        return Err(crate::error::HtmError::IntegrityError(format!(
            "dataset {} produced no trixel data",
            dataset.name
        )));
    }

    let trixels_by_depth = backfill::backfill_trixels(store, dataset, &saved_trixels)?;

    debug_assert!(
        trixels_by_depth.keys().copied().max() == Some(INGEST_MAX_DEPTH),
        "leaf chunks are always written at the maximum ingest depth"
    );

    let simplified_altitudes = simplify::generate_simplified_layers(store, dataset, &trixels_by_depth)?;

    manifest::write_manifest(dataset, &trixels_by_depth, &simplified_altitudes)?;

    log::info!("finished ingesting {}", dataset.name);
    Ok(())
}

/// Scans every layer file for its actual `(x, y)` bounds and returns the
/// union across the dataset, so the mapping is built over the data's real
/// footprint rather than the (possibly much larger) declared UTM
/// rectangle.
fn dataset_extent(dataset: &Dataset) -> Result<(i64, i64, i64, i64)> {
    let mut min_x = i64::MAX;
    let mut max_x = i64::MIN;
    let mut min_y = i64::MAX;
    let mut max_y = i64::MIN;

    for layer_path in &dataset.layers {
        let rows = chunk::parse_layer_lines(layer_path)
            .map_err(|e| crate::error::HtmError::InvalidArgument(e.to_string()))?;
        let (layer_min_x, layer_max_x, layer_min_y, layer_max_y) = chunk::layer_min_max_xy(&rows)
            .map_err(|e| crate::error::HtmError::InvalidArgument(e.to_string()))?;

        min_x = min_x.min(layer_min_x);
        max_x = max_x.max(layer_max_x);
        min_y = min_y.min(layer_min_y);
        max_y = max_y.max(layer_max_y);
    }

    Ok((min_x, max_x, min_y, max_y))
}
