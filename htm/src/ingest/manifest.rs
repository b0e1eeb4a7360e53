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

//! Writes the processed dataset's `meta.json`, recording the UTM frame it
//! was ingested under plus enough of the ingest result (trixels present
//! at each backfilled depth, altitudes simplified) for the query layer
//! to serve it without rescanning the tree.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::constants::{META_FILE_NAME, SIMPLIFIED_DIR_NAME};
use crate::error::{HtmError, Result};
use crate::ingest::chunk::relative_trixel_data_path;
use crate::ingest::dataset::Dataset;
use crate::ingest::utm::Hemisphere;

/// One trixel's entry under `trixelsByDepth`: its name and the path (
/// relative to the dataset's processed directory) of its data blob.
#[derive(Debug, Serialize)]
struct TrixelEntry {
    name: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct ManifestMeta {
    #[serde(rename = "utmZone")]
    utm_zone: u32,
    #[serde(rename = "utmHemisphere")]
    utm_hemisphere: String,
    #[serde(rename = "utmCorners")]
    utm_corners: [[i64; 2]; 2],
    #[serde(rename = "trixelsByDepth")]
    trixels_by_depth: BTreeMap<u32, Vec<TrixelEntry>>,
    #[serde(rename = "simplifiedLayers")]
    simplified_layers: BTreeMap<String, String>,
}

/// Writes `processed/<dataset>/meta.json`: the UTM frame, `trixelsByDepth`
/// (depth -> `{name, data}` with `data` relative to the dataset's processed
/// directory), and `simplifiedLayers` (altitude -> relative path), per
/// spec §4.9. `get_simplified` looks the altitude up in this map rather
/// than guessing the path itself.
pub fn write_manifest(
    dataset: &Dataset,
    trixels_by_depth: &BTreeMap<u32, Vec<String>>,
    simplified_layers: &[i64],
) -> Result<()> {
    let hemisphere_str = match dataset.utm_hemisphere {
        Hemisphere::North => "N",
        Hemisphere::South => "S",
    };

    let trixels_by_depth = trixels_by_depth
        .iter()
        .map(|(&depth, names)| {
            let entries = names
                .iter()
                .map(|name| TrixelEntry {
                    name: name.clone(),
                    data: relative_trixel_data_path(name).display().to_string(),
                })
                .collect();
            (depth, entries)
        })
        .collect();

    let simplified_layers = simplified_layers
        .iter()
        .map(|altitude| {
            let relative = Path::new(SIMPLIFIED_DIR_NAME).join(format!("{}.npy", altitude));
            (altitude.to_string(), relative.display().to_string())
        })
        .collect();

    let meta = ManifestMeta {
        utm_zone: dataset.utm_zone,
        utm_hemisphere: hemisphere_str.to_string(),
        utm_corners: [
            [dataset.utm_corner_min_x, dataset.utm_corner_min_y],
            [dataset.utm_corner_max_x, dataset.utm_corner_max_y],
        ],
        trixels_by_depth,
        simplified_layers,
    };

    let path = dataset.processed_path.join(META_FILE_NAME);
    write_manifest_to(&path, &meta)
}

fn write_manifest_to(path: &Path, meta: &ManifestMeta) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| HtmError::io(parent.display().to_string(), e))?;
    }
    let json = serde_json::to_vec_pretty(meta)
        .map_err(|e| HtmError::IntegrityError(format!("failed to encode manifest: {}", e)))?;
    std::fs::write(path, json).map_err(|e| HtmError::io(path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::dataset::Dataset;
    use std::path::PathBuf;

    fn dummy_dataset(processed_path: PathBuf) -> Dataset {
        Dataset {
            name: "test".to_string(),
            unprocessed_path: PathBuf::new(),
            processed_path,
            utm_zone: 32,
            utm_hemisphere: Hemisphere::North,
            utm_corner_min_x: -5,
            utm_corner_min_y: -5,
            utm_corner_max_x: 5,
            utm_corner_max_y: 5,
            layers: vec![],
        }
    }

    #[test]
    fn writes_readable_manifest() {
        let mut processed_path = std::env::temp_dir();
        processed_path.push(format!("htm-manifest-test-{}", uuid::Uuid::new_v4()));
        let dataset = dummy_dataset(processed_path.clone());

        let mut trixels_by_depth = BTreeMap::new();
        trixels_by_depth.insert(10u32, vec!["N0-0-0-0-0-0-0-0-0".to_string()]);
        trixels_by_depth.insert(20u32, vec!["N0-0-0-0-0-0-0-0-0-0-0-0-0-0-0-0-0-0-0-0".to_string()]);

        write_manifest(&dataset, &trixels_by_depth, &[3, 4, 5]).unwrap();

        let path = dataset.processed_path.join(META_FILE_NAME);
        let bytes = std::fs::read(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(parsed["utmZone"], 32);
        assert_eq!(parsed["utmHemisphere"], "N");
        assert_eq!(parsed["utmCorners"][0][0], -5);
        assert_eq!(parsed["simplifiedLayers"]["5"], "simplified/5.npy");
        assert_eq!(
            parsed["trixelsByDepth"]["10"][0]["name"],
            "N0-0-0-0-0-0-0-0-0"
        );
        assert_eq!(
            parsed["trixelsByDepth"]["10"][0]["data"],
            "N0/0/0/0/0/0/0/0/0/data.npy"
        );

        std::fs::remove_dir_all(&processed_path).ok();
    }
}
