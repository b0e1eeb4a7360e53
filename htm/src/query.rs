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

//! Read-side surface over a processed directory tree: list what was
//! ingested, fetch the simplified summary for a dataset/layer, enumerate
//! the trixels a query cap touches, and fetch detailed per-trixel data.

use ndarray::Array2;
use std::collections::BTreeMap;
use std::path::Path;

use crate::constants::{DETAILED_DEPTH, MAX_RADIUS};
use crate::error::{HtmError, Result};
use crate::geometry::{lat_lon_to_xyz, surface_radius_to_cap_distance, xyz_to_lat_lon};
use crate::halfspace::Halfspace;
use crate::ingest::blob::BlobStore;
use crate::ingest::chunk::trixel_data_path;

/// A trixel's name and vertex positions, as returned to callers that have
/// no reason to see the rest of the [`crate::trixel::Trixel`] API.
#[derive(Debug, Clone, PartialEq)]
pub struct TrixelView {
    pub name: String,
    pub vertices: [(f64, f64); 3],
}

#[derive(serde::Deserialize)]
struct ManifestMeta {
    #[serde(rename = "simplifiedLayers")]
    simplified_layers: BTreeMap<String, String>,
}

/// Lists every dataset under `processed_dir` and the layers (altitudes,
/// as decimal strings) it has simplified data for.
pub fn list_datasets(processed_dir: &Path) -> Result<BTreeMap<String, Vec<String>>> {
    let mut result = BTreeMap::new();

    let entries = std::fs::read_dir(processed_dir)
        .map_err(|e| HtmError::io(processed_dir.display().to_string(), e))?;

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            None => continue,
        };

        let meta_path = path.join(crate::constants::META_FILE_NAME);
        let meta_bytes = match std::fs::read(&meta_path) {
            Ok(b) => b,
            Err(_) => continue,
        };
        let meta: ManifestMeta = match serde_json::from_slice(&meta_bytes) {
            Ok(m) => m,
            Err(_) => continue,
        };

        let layers = meta.simplified_layers.keys().cloned().collect();
        result.insert(name, layers);
    }

    Ok(result)
}

/// Loads the simplified summary blob for `dataset`'s `layer` altitude by
/// looking its path up in the dataset's manifest, per spec §6.
pub fn get_simplified(
    store: &dyn BlobStore,
    processed_dir: &Path,
    dataset: &str,
    layer: &str,
) -> Result<Array2<f64>> {
    let dataset_path = processed_dir.join(dataset);
    let meta_path = dataset_path.join(crate::constants::META_FILE_NAME);

    let meta_bytes = std::fs::read(&meta_path)
        .map_err(|_| HtmError::NotFound(format!("unknown dataset {}", dataset)))?;
    let meta: ManifestMeta = serde_json::from_slice(&meta_bytes)
        .map_err(|e| HtmError::IntegrityError(format!("corrupt manifest for {}: {}", dataset, e)))?;

    let relative_path = meta.simplified_layers.get(layer).ok_or_else(|| {
        HtmError::NotFound(format!("no simplified layer {} for dataset {}", layer, dataset))
    })?;

    store.load(&dataset_path.join(relative_path))
}

/// Enumerates every detailed-depth trixel whose cell intersects the cap
/// of `radius_m` meters centered at `(lat, lon)`, rejecting radii above
/// [`MAX_RADIUS`] to keep a single query bounded.
pub fn trixels_in_cap(lat: f64, lon: f64, radius_m: f64) -> Result<Vec<TrixelView>> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(HtmError::InvalidArgument(format!(
            "lat {} is out of range [-90, 90]",
            lat
        )));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(HtmError::InvalidArgument(format!(
            "lon {} is out of range [-180, 180]",
            lon
        )));
    }
    if radius_m < 0.0 || radius_m > MAX_RADIUS {
        return Err(HtmError::InvalidArgument(format!(
            "radius {} m is out of range [0, {}]",
            radius_m, MAX_RADIUS
        )));
    }

    let center = lat_lon_to_xyz(lat, lon);
    let h = Halfspace::new(center, surface_radius_to_cap_distance(radius_m));

    let trixels = crate::enumerate::expanded_trixels_in_cap(&h, DETAILED_DEPTH)?;

    Ok(trixels
        .into_iter()
        .map(|t| TrixelView {
            name: t.name,
            vertices: [
                xyz_to_lat_lon(t.vertices[0]),
                xyz_to_lat_lon(t.vertices[1]),
                xyz_to_lat_lon(t.vertices[2]),
            ],
        })
        .collect())
}

/// Loads each named trixel's detailed blob for `dataset`, skipping any
/// name with no data on disk rather than failing the whole batch.
pub fn detailed_by_trixel_names(
    store: &dyn BlobStore,
    processed_dir: &Path,
    dataset: &str,
    names: &[String],
) -> Result<BTreeMap<String, Array2<f64>>> {
    let dataset_path = processed_dir.join(dataset);
    if !dataset_path.is_dir() {
        return Err(HtmError::NotFound(format!("unknown dataset {}", dataset)));
    }

    let mut result = BTreeMap::new();
    for name in names {
        let path = trixel_data_path(&dataset_path, name);
        if !store.exists(&path) {
            continue;
        }
        result.insert(name.clone(), store.load(&path)?);
    }
    Ok(result)
}
