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

use float_cmp::{ApproxEq, F64Margin};
use itertools::Itertools;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::ingest::utm::Hemisphere;

/// A dataset discovered under the unprocessed directory, ready to ingest.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub unprocessed_path: PathBuf,
    pub processed_path: PathBuf,
    pub utm_zone: u32,
    pub utm_hemisphere: Hemisphere,
    pub utm_corner_min_x: i64,
    pub utm_corner_min_y: i64,
    pub utm_corner_max_x: i64,
    pub utm_corner_max_y: i64,
    pub layers: Vec<PathBuf>,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let x_delta = self.utm_corner_max_x - self.utm_corner_min_x;
        let y_delta = self.utm_corner_max_y - self.utm_corner_min_y;
        let area = x_delta * y_delta;
        write!(f, "{} ({} layers, {} m^2)", self.name, self.layers.len(), area)
    }
}

#[derive(Debug, Deserialize)]
struct DatasetMeta {
    #[serde(rename = "utmZone")]
    utm_zone: Option<u32>,
    #[serde(rename = "utmHemisphere")]
    utm_hemisphere: Option<String>,
    #[serde(rename = "utmCorners")]
    utm_corners: Option<Vec<Vec<f64>>>,
}

/// Scans `unprocessed_dir` for dataset directories that have not already
/// been processed into `processed_dir`, validating each `meta.json` and
/// skipping (with a logged diagnostic) anything malformed rather than
/// failing the whole scan.
pub fn get_ingestable_datasets(unprocessed_dir: &Path, processed_dir: &Path) -> Vec<Dataset> {
    let mut datasets = Vec::new();

    let entries = match std::fs::read_dir(unprocessed_dir) {
        Ok(e) => e,
        Err(err) => {
            log::warn!("could not read {}: {}", unprocessed_dir.display(), err);
            return datasets;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            None => continue,
        };

        match try_load_dataset(&name, &path, processed_dir) {
            Ok(Some(dataset)) => {
                log::info!("found {}", dataset);
                datasets.push(dataset);
            }
            Ok(None) => {}
            Err(reason) => log::warn!("skipping {}: {}", name, reason),
        }
    }

    datasets.sort_by(|a, b| a.name.cmp(&b.name));
    datasets
}

fn try_load_dataset(
    name: &str,
    unprocessed_path: &Path,
    processed_dir: &Path,
) -> std::result::Result<Option<Dataset>, String> {
    let processed_path = processed_dir.join(name);

    if processed_path.is_dir() {
        log::info!("skipping {} because a processed version already exists", name);
        return Ok(None);
    }

    let meta_path = unprocessed_path.join("meta.json");
    if !meta_path.is_file() {
        return Err("meta.json is missing".to_string());
    }

    let meta_bytes = std::fs::read(&meta_path).map_err(|e| e.to_string())?;
    let meta: DatasetMeta = serde_json::from_slice(&meta_bytes).map_err(|e| e.to_string())?;

    let utm_zone = meta.utm_zone.ok_or("utmZone is missing from meta.json")?;
    let hemisphere_str = meta
        .utm_hemisphere
        .ok_or("utmHemisphere is missing from meta.json")?;
    let utm_hemisphere = Hemisphere::from_str(&hemisphere_str)
        .ok_or("utmHemisphere must be \"N\" or \"S\"")?;
    let corners = meta.utm_corners.ok_or("utmCorners is missing from meta.json")?;

    if corners.len() != 2 || corners.iter().any(|c| c.len() != 2) {
        return Err("utmCorners is not a 2x2 array of numbers".to_string());
    }

    let xs = [corners[0][0], corners[1][0]];
    let ys = [corners[0][1], corners[1][1]];
    let margin = F64Margin { epsilon: 1e-6, ulps: 2 };

    if xs[0].approx_eq(xs[1], margin) || ys[0].approx_eq(ys[1], margin) {
        return Err("utmCorners do not form a rectangle".to_string());
    }

    let min_x = xs.iter().cloned().fold(f64::INFINITY, f64::min) as i64;
    let max_x = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max) as i64;
    let min_y = ys.iter().cloned().fold(f64::INFINITY, f64::min) as i64;
    let max_y = ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max) as i64;

    let layers: Vec<PathBuf> = std::fs::read_dir(unprocessed_path)
        .map_err(|e| e.to_string())?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().map_or(false, |ext| ext == "xy"))
        .sorted()
        .collect();

    if layers.is_empty() {
        return Err("no .xy layers were found".to_string());
    }

    Ok(Some(Dataset {
        name: name.to_string(),
        unprocessed_path: unprocessed_path.to_path_buf(),
        processed_path,
        utm_zone,
        utm_hemisphere,
        utm_corner_min_x: min_x,
        utm_corner_min_y: min_y,
        utm_corner_max_x: max_x,
        utm_corner_max_y: max_y,
        layers,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("htm-dataset-test-{}-{}", uuid::Uuid::new_v4(), name));
        fs::create_dir_all(&p).unwrap();
        p
    }

    #[test]
    fn discovers_well_formed_dataset() {
        let unprocessed_root = temp_dir("unprocessed");
        let processed_root = temp_dir("processed");
        fs::remove_dir_all(&processed_root).unwrap();

        let ds_dir = unprocessed_root.join("site-a");
        fs::create_dir_all(&ds_dir).unwrap();
        fs::write(
            ds_dir.join("meta.json"),
            r#"{"utmZone": 32, "utmHemisphere": "N", "utmCorners": [[0, 0], [10, 20]]}"#,
        )
        .unwrap();
        fs::write(ds_dir.join("layer0.xy"), "0 0 0 1.0 2.0 3.0\n").unwrap();

        let datasets = get_ingestable_datasets(&unprocessed_root, &processed_root);
        assert_eq!(datasets.len(), 1);
        assert_eq!(datasets[0].name, "site-a");
        assert_eq!(datasets[0].utm_corner_max_x, 10);
        assert_eq!(datasets[0].utm_corner_max_y, 20);
        assert_eq!(datasets[0].layers.len(), 1);
    }

    #[test]
    fn skips_dataset_with_existing_processed_dir() {
        let unprocessed_root = temp_dir("unprocessed2");
        let processed_root = temp_dir("processed2");

        let ds_dir = unprocessed_root.join("site-b");
        fs::create_dir_all(&ds_dir).unwrap();
        fs::write(
            ds_dir.join("meta.json"),
            r#"{"utmZone": 32, "utmHemisphere": "N", "utmCorners": [[0, 0], [10, 20]]}"#,
        )
        .unwrap();
        fs::write(ds_dir.join("layer0.xy"), "0 0 0 1.0 2.0 3.0\n").unwrap();
        fs::create_dir_all(processed_root.join("site-b")).unwrap();

        let datasets = get_ingestable_datasets(&unprocessed_root, &processed_root);
        assert!(datasets.is_empty());
    }

    #[test]
    fn skips_dataset_with_degenerate_rectangle() {
        let unprocessed_root = temp_dir("unprocessed3");
        let processed_root = temp_dir("processed3");
        fs::remove_dir_all(&processed_root).unwrap();

        let ds_dir = unprocessed_root.join("site-c");
        fs::create_dir_all(&ds_dir).unwrap();
        fs::write(
            ds_dir.join("meta.json"),
            r#"{"utmZone": 32, "utmHemisphere": "N", "utmCorners": [[0, 0], [10, 0]]}"#,
        )
        .unwrap();
        fs::write(ds_dir.join("layer0.xy"), "0 0 0 1.0 2.0 3.0\n").unwrap();

        let datasets = get_ingestable_datasets(&unprocessed_root, &processed_root);
        assert!(datasets.is_empty());
    }
}
