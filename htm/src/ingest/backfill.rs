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

//! Merges leaf trixel blobs upward to every ancestor down to
//! `INGEST_MIN_DEPTH`, so multi-resolution queries can be served directly
//! from an ancestor's blob instead of fanning out to all its leaves.

use std::collections::{BTreeMap, BTreeSet};

use crate::constants::INGEST_MIN_DEPTH;
use crate::error::{HtmError, Result};
use crate::ingest::blob::{append_rows, BlobStore};
use crate::ingest::chunk::trixel_data_path;
use crate::ingest::dataset::Dataset;
use crate::trixel::parent_name;

/// Backfills `saved_trixels` (all assumed at the same depth, asserted
/// below) up to `INGEST_MIN_DEPTH`, returning the trixel names present at
/// each depth from `INGEST_MIN_DEPTH` to the saved leaf depth.
pub fn backfill_trixels(
    store: &dyn BlobStore,
    dataset: &Dataset,
    saved_trixels: &BTreeSet<String>,
) -> Result<BTreeMap<u32, Vec<String>>> {
    let saved_list: Vec<String> = saved_trixels.iter().cloned().collect();

    let saved_depth = saved_list
        .first()
        .map(|n| n.matches('-').count() as u32 + 1)
        .ok_or_else(|| HtmError::IntegrityError("no trixels were saved during ingest".to_string()))?;

    if saved_list
        .iter()
        .any(|n| n.matches('-').count() as u32 + 1 != saved_depth)
    {
        return Err(HtmError::IntegrityError(
            "not all saved trixels have the same depth".to_string(),
        ));
    }

    log::info!(
        "backfilling trixels from depth {} to depth {}",
        saved_depth,
        INGEST_MIN_DEPTH
    );

    let mut trixels_by_depth: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    trixels_by_depth.insert(saved_depth, saved_list.clone());

    let mut prev_level = saved_list;

    for depth in (INGEST_MIN_DEPTH..saved_depth).rev() {
        log::debug!("backfilling trixels at depth {}", depth);

        let mut next_level = BTreeSet::new();

        for trixel_name in &prev_level {
            let parent = parent_name(trixel_name).ok_or_else(|| {
                HtmError::IntegrityError(format!("trixel {} has no parent to backfill into", trixel_name))
            })?;

            let child_path = trixel_data_path(&dataset.processed_path, trixel_name);
            let parent_path = trixel_data_path(&dataset.processed_path, &parent);

            let child_data = store.load(&child_path)?;
            append_rows(store, &parent_path, &child_data)?;

            next_level.insert(parent);
        }

        let next_level: Vec<String> = next_level.into_iter().collect();
        log::debug!("backfilled {} trixels at depth {}", next_level.len(), depth);

        trixels_by_depth.insert(depth, next_level.clone());
        prev_level = next_level;
    }

    Ok(trixels_by_depth)
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
    fn backfill_concatenates_two_siblings_into_shared_parent() {
        let mut processed_path = std::env::temp_dir();
        processed_path.push(format!("htm-backfill-test-{}", uuid::Uuid::new_v4()));
        let dataset = dummy_dataset(processed_path.clone());
        let store = FileBlobStore;

        // Two leaf trixels at depth 20 that share a parent at depth 19.
        let base = "N0-0-0-0-0-0-0-0-0-0-0-0-0-0-0-0-0-0-0";
        let leaf_a = format!("{}-0", base);
        let leaf_b = format!("{}-1", base);

        store
            .save(
                &trixel_data_path(&dataset.processed_path, &leaf_a),
                &array![[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]],
            )
            .unwrap();
        store
            .save(
                &trixel_data_path(&dataset.processed_path, &leaf_b),
                &array![[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]],
            )
            .unwrap();

        let mut saved = BTreeSet::new();
        saved.insert(leaf_a.clone());
        saved.insert(leaf_b.clone());

        let by_depth = backfill_trixels(&store, &dataset, &saved).unwrap();

        assert_eq!(by_depth[&20].len(), 2);
        assert!(by_depth[&19].contains(&base.to_string()));

        let parent_data = store
            .load(&trixel_data_path(&dataset.processed_path, base))
            .unwrap();
        assert_eq!(parent_data.nrows(), 2);

        let mut rows: Vec<Vec<f64>> = parent_data.rows().into_iter().map(|r| r.to_vec()).collect();
        rows.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(rows[0], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(rows[1], vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);

        std::fs::remove_dir_all(&processed_path).ok();
    }

    #[test]
    fn backfill_rejects_mixed_depth_input() {
        let mut processed_path = std::env::temp_dir();
        processed_path.push(format!("htm-backfill-test-{}", uuid::Uuid::new_v4()));
        let dataset = dummy_dataset(processed_path.clone());
        let store = FileBlobStore;

        let mut saved = BTreeSet::new();
        saved.insert("N0-0".to_string());
        saved.insert("N0-0-0".to_string());

        assert!(backfill_trixels(&store, &dataset, &saved).is_err());
    }
}
