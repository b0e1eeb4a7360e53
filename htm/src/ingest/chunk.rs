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

//! Reads a layer file, bins its rows by trixel, and appends each group to
//! the trixel's per-leaf chunk blob.

use ndarray::Array2;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::constants::DATA_FILE_NAME;
use crate::error::HtmError;
use crate::ingest::blob::{append_rows, BlobStore};
use crate::ingest::dataset::Dataset;
use crate::ingest::mapping::Mapping;
use crate::ingest::utm::UtmProjector;

/// One `(x, y, z, u, v, w)` row of a layer file; `x`, `y`, `z` are
/// integer UTM offsets, `u`, `v`, `w` are the sampled vector components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerRow {
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub u: f64,
    pub v: f64,
    pub w: f64,
}

pub fn parse_layer_lines(layer_path: &Path) -> anyhow::Result<Vec<LayerRow>> {
    let contents = std::fs::read_to_string(layer_path)?;

    let mut rows = Vec::new();
    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 6 {
            anyhow::bail!(
                "{}:{}: expected 6 whitespace-separated fields, got {}",
                layer_path.display(),
                line_no + 1,
                fields.len()
            );
        }
        rows.push(LayerRow {
            x: fields[0].parse()?,
            y: fields[1].parse()?,
            z: fields[2].parse()?,
            u: fields[3].parse()?,
            v: fields[4].parse()?,
            w: fields[5].parse()?,
        });
    }

    log::info!("parsed {} rows from {}", rows.len(), layer_path.display());
    Ok(rows)
}

/// Min/max UTM `x`/`y` across a layer's rows, asserting the layer is a
/// single planar slice (all rows share `z`).
pub fn layer_min_max_xy(rows: &[LayerRow]) -> anyhow::Result<(i64, i64, i64, i64)> {
    let first_z = rows
        .first()
        .ok_or_else(|| anyhow::anyhow!("layer has no rows"))?
        .z;
    if rows.iter().any(|r| r.z != first_z) {
        anyhow::bail!("layer is not a single planar slice: rows do not share z");
    }

    let min_x = rows.iter().map(|r| r.x).min().unwrap();
    let max_x = rows.iter().map(|r| r.x).max().unwrap();
    let min_y = rows.iter().map(|r| r.y).min().unwrap();
    let max_y = rows.iter().map(|r| r.y).max().unwrap();
    Ok((min_x, max_x, min_y, max_y))
}

/// Groups a layer's rows by the trixel name `mapping` assigns their
/// `(x, y)` cell, recomputing `(lat, lon)` from the projected UTM cell.
pub fn group_layer_by_trixel(
    dataset: &Dataset,
    projector: &dyn UtmProjector,
    rows: &[LayerRow],
    mapping: &Mapping,
) -> BTreeMap<String, Vec<[f64; 6]>> {
    let utm_center_x = (dataset.utm_corner_min_x + dataset.utm_corner_max_x) / 2;
    let utm_center_y = (dataset.utm_corner_min_y + dataset.utm_corner_max_y) / 2;

    let mut groups: BTreeMap<String, Vec<[f64; 6]>> = BTreeMap::new();

    for row in rows {
        let utm_x = utm_center_x + row.x;
        let utm_y = utm_center_y + row.y;

        let (lat, lon) =
            projector.to_lat_lon(utm_x, utm_y, dataset.utm_zone, dataset.utm_hemisphere);

        let trixel_name = mapping.get_trixel_name(row.x, row.y).to_string();

        groups
            .entry(trixel_name)
            .or_default()
            .push([lat, lon, row.z as f64, row.u, row.v, row.w]);
    }

    groups
}

/// The trixel's blob path relative to the dataset's processed directory,
/// e.g. `N0-1-2-3` -> `N0/1/2/3/data.npy`. Used both to build the absolute
/// path via [`trixel_data_path`] and to record a manifest-relative path.
pub fn relative_trixel_data_path(trixel_name: &str) -> PathBuf {
    let mut p = PathBuf::new();
    for segment in trixel_name.split('-') {
        p.push(segment);
    }
    p.push(DATA_FILE_NAME);
    p
}

pub fn trixel_data_path(processed_path: &Path, trixel_name: &str) -> PathBuf {
    processed_path.join(relative_trixel_data_path(trixel_name))
}

/// Writes one layer's grouped rows out to each trixel's leaf blob,
/// appending to any rows already saved for that trixel.
pub fn write_layer_chunks(
    store: &dyn BlobStore,
    dataset: &Dataset,
    groups: &BTreeMap<String, Vec<[f64; 6]>>,
    saved_trixels: &mut std::collections::BTreeSet<String>,
) -> crate::error::Result<()> {
    for (trixel_name, rows) in groups {
        let ncols = 6;
        let data = Array2::from_shape_vec(
            (rows.len(), ncols),
            rows.iter().flat_map(|r| r.iter().copied()).collect(),
        )
        .map_err(|e| HtmError::IntegrityError(format!("bad chunk shape: {}", e)))?;

        let path = trixel_data_path(&dataset.processed_path, trixel_name);
        append_rows(store, &path, &data)?;
        saved_trixels.insert(trixel_name.clone());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::blob::FileBlobStore;
    use crate::ingest::mapping::build_utm_to_htm_mapping;
    use crate::ingest::utm::test_support::FlatProjector;
    use crate::ingest::utm::Hemisphere;
    use std::fs;

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
    fn parses_whitespace_rows() {
        let mut p = std::env::temp_dir();
        p.push(format!("htm-layer-test-{}.xy", uuid::Uuid::new_v4()));
        fs::write(&p, "1 2 3 0.5 -1.5 2.25\n4 5 3 0.1 0.2 0.3\n").unwrap();

        let rows = parse_layer_lines(&p).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], LayerRow { x: 1, y: 2, z: 3, u: 0.5, v: -1.5, w: 2.25 });

        fs::remove_file(&p).ok();
    }

    #[test]
    fn layer_min_max_rejects_non_planar_layer() {
        let rows = vec![
            LayerRow { x: 0, y: 0, z: 1, u: 0.0, v: 0.0, w: 0.0 },
            LayerRow { x: 1, y: 0, z: 2, u: 0.0, v: 0.0, w: 0.0 },
        ];
        assert!(layer_min_max_xy(&rows).is_err());
    }

    #[test]
    fn write_layer_chunks_round_trips_through_blob_store() {
        let mut processed_path = std::env::temp_dir();
        processed_path.push(format!("htm-chunk-test-{}", uuid::Uuid::new_v4()));
        let dataset = dummy_dataset(processed_path.clone());
        let projector = FlatProjector::default();

        let mapping = build_utm_to_htm_mapping(&dataset, &projector, -2, -2, 2, 2);

        let rows = vec![
            LayerRow { x: 0, y: 0, z: 5, u: 1.0, v: 2.0, w: 3.0 },
            LayerRow { x: 1, y: 0, z: 5, u: 4.0, v: 5.0, w: 6.0 },
        ];

        let groups = group_layer_by_trixel(&dataset, &projector, &rows, &mapping);
        assert!(!groups.is_empty());

        let store = FileBlobStore;
        let mut saved = std::collections::BTreeSet::new();
        write_layer_chunks(&store, &dataset, &groups, &mut saved).unwrap();

        assert!(!saved.is_empty());
        for name in &saved {
            let path = trixel_data_path(&dataset.processed_path, name);
            assert!(path.exists());
        }

        fs::remove_dir_all(&processed_path).ok();
    }
}
