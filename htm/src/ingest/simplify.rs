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

//! Downsamples each depth-`SIMPLIFIED_DEPTH` trixel's rows into one
//! averaged summary row per altitude, producing a per-altitude blob
//! covering the whole dataset.

use ndarray::Array2;
use std::collections::BTreeMap;

use crate::constants::SIMPLIFIED_DEPTH;
use crate::error::{HtmError, Result};
use crate::geometry::xyz_to_lat_lon;
use crate::ingest::blob::BlobStore;
use crate::ingest::chunk::trixel_data_path;
use crate::ingest::dataset::Dataset;
use crate::trixel::find_trixel_from_name;

/// Generates the simplified per-altitude layers for `dataset` from the
/// trixels backfill saved at `SIMPLIFIED_DEPTH`, writing one blob per
/// altitude under `processed/<dataset>/simplified/`. Returns the sorted
/// list of altitudes written.
pub fn generate_simplified_layers(
    store: &dyn BlobStore,
    dataset: &Dataset,
    trixels_by_depth: &BTreeMap<u32, Vec<String>>,
) -> Result<Vec<i64>> {
    log::info!("generating simplified layers for dataset {}", dataset.name);

    let trixel_names = trixels_by_depth.get(&SIMPLIFIED_DEPTH).ok_or_else(|| {
        HtmError::IntegrityError(format!(
            "no trixels recorded at simplified depth {}",
            SIMPLIFIED_DEPTH
        ))
    })?;

    // altitude -> rows of [mid_lat, mid_lon, altitude, mean_u, mean_v, mean_w]
    let mut simplified_layers: BTreeMap<i64, Vec<[f64; 6]>> = BTreeMap::new();

    for trixel_name in trixel_names {
        let trixel = find_trixel_from_name(trixel_name)?;
        let (mid_lat, mid_lon) = xyz_to_lat_lon(trixel.midpoint());

        let path = trixel_data_path(&dataset.processed_path, trixel_name);
        let data = store.load(&path)?;

        // altitude -> accumulated (sum_u, sum_v, sum_w, count)
        let mut buckets: BTreeMap<i64, (f64, f64, f64, u64)> = BTreeMap::new();

        for row in data.rows() {
            let z = row[2];
            let altitude = z.round() as i64;
            let bucket = buckets.entry(altitude).or_insert((0.0, 0.0, 0.0, 0));
            bucket.0 += row[3];
            bucket.1 += row[4];
            bucket.2 += row[5];
            bucket.3 += 1;
        }

        for (altitude, (sum_u, sum_v, sum_w, count)) in buckets {
            let n = count as f64;
            simplified_layers.entry(altitude).or_default().push([
                mid_lat,
                mid_lon,
                altitude as f64,
                sum_u / n,
                sum_v / n,
                sum_w / n,
            ]);
        }
    }

    let simplified_dir = dataset.processed_path.join(crate::constants::SIMPLIFIED_DIR_NAME);
    std::fs::create_dir_all(&simplified_dir)
        .map_err(|e| HtmError::io(simplified_dir.display().to_string(), e))?;

    let mut altitudes: Vec<i64> = simplified_layers.keys().copied().collect();
    altitudes.sort_unstable();

    for altitude in &altitudes {
        let rows = &simplified_layers[altitude];
        let data = Array2::from_shape_vec(
            (rows.len(), 6),
            rows.iter().flat_map(|r| r.iter().copied()).collect(),
        )
        .map_err(|e| HtmError::IntegrityError(format!("bad simplified layer shape: {}", e)))?;

        let path = simplified_dir.join(format!("{}.npy", altitude));
        store.save(&path, &data)?;
    }

    Ok(altitudes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::blob::FileBlobStore;
    use crate::ingest::dataset::Dataset;
    use crate::ingest::utm::Hemisphere;
    use ndarray::array;
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
    fn averages_rows_per_altitude_bucket() {
        let mut processed_path = std::env::temp_dir();
        processed_path.push(format!("htm-simplify-test-{}", uuid::Uuid::new_v4()));
        let dataset = dummy_dataset(processed_path.clone());
        let store = FileBlobStore;

        let trixel_name = "N0".to_string() + &"-0".repeat(19); // depth 20
        let path = trixel_data_path(&dataset.processed_path, &trixel_name);

        // two rows at altitude 5, one at altitude 6 (after rounding)
        store
            .save(
                &path,
                &array![
                    [10.0, 20.0, 5.2, 1.0, 2.0, 3.0],
                    [10.0, 20.0, 4.8, 3.0, 4.0, 5.0],
                    [10.0, 20.0, 6.4, 10.0, 10.0, 10.0],
                ],
            )
            .unwrap();

        let mut trixels_by_depth = BTreeMap::new();
        trixels_by_depth.insert(20u32, vec![trixel_name]);

        let altitudes = generate_simplified_layers(&store, &dataset, &trixels_by_depth).unwrap();
        assert_eq!(altitudes, vec![5, 6]);

        let layer5 = store
            .load(&dataset.processed_path.join("simplified").join("5.npy"))
            .unwrap();
        assert_eq!(layer5.nrows(), 1);
        assert_eq!(layer5.row(0).to_vec()[3..], [2.0, 3.0, 4.0]); // mean of the two altitude-5 rows

        let layer6 = store
            .load(&dataset.processed_path.join("simplified").join("6.npy"))
            .unwrap();
        assert_eq!(layer6.nrows(), 1);
        assert_eq!(layer6.row(0).to_vec()[3..], [10.0, 10.0, 10.0]);

        std::fs::remove_dir_all(&processed_path).ok();
    }
}
