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

//! Builds the dense UTM-offset-to-trixel-name matrix a dataset's layers
//! are binned against. Raster locality means consecutive cells are very
//! often in the same trixel, so a single-slot most-recently-used cache
//! avoids most of the descent calls.

use std::time::Instant;

use crate::constants::INGEST_MAX_DEPTH;
use crate::geometry::lat_lon_to_xyz;
use crate::ingest::dataset::Dataset;
use crate::ingest::utm::UtmProjector;
use crate::trixel::{find_trixel_from_xyz, Trixel};

pub struct Mapping {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
    /// Indexed `[y - min_y][x - min_x]`.
    pub mapping: Vec<Vec<String>>,
}

impl Mapping {
    pub fn get_trixel_name(&self, x: i64, y: i64) -> &str {
        &self.mapping[(y - self.min_y) as usize][(x - self.min_x) as usize]
    }

    pub fn total_entries(&self) -> usize {
        self.mapping.iter().map(|row| row.len()).sum()
    }
}

pub fn build_utm_to_htm_mapping(
    dataset: &Dataset,
    projector: &dyn UtmProjector,
    min_x: i64,
    min_y: i64,
    max_x: i64,
    max_y: i64,
) -> Mapping {
    log::info!("building UTM to HTM mapping for dataset {}", dataset.name);

    let utm_center_x = (dataset.utm_corner_min_x + dataset.utm_corner_max_x) / 2;
    let utm_center_y = (dataset.utm_corner_min_y + dataset.utm_corner_max_y) / 2;

    let num_rows = (max_y - min_y + 1) as usize;
    let num_cols = (max_x - min_x + 1) as usize;
    let mut mapping: Vec<Vec<String>> = Vec::with_capacity(num_rows);

    let mut prev_trixel: Option<Trixel> = None;
    let mut cache_hits: u64 = 0;
    let mut total: u64 = 0;
    let mut last_report = Instant::now();

    for y in min_y..=max_y {
        let mut row = Vec::with_capacity(num_cols);

        for x in min_x..=max_x {
            let utm_x = utm_center_x + x;
            let utm_y = utm_center_y + y;

            let (lat, lon) =
                projector.to_lat_lon(utm_x, utm_y, dataset.utm_zone, dataset.utm_hemisphere);
            let xyz = lat_lon_to_xyz(lat, lon);

            total += 1;

            let name = if let Some(t) = &prev_trixel {
                if t.contains(xyz) {
                    cache_hits += 1;
                    t.name.clone()
                } else {
                    let t = find_trixel_from_xyz(xyz, INGEST_MAX_DEPTH)
                        .expect("lat/lon derived from a real projection is always on the sphere");
                    let name = t.name.clone();
                    prev_trixel = Some(t);
                    name
                }
            } else {
                let t = find_trixel_from_xyz(xyz, INGEST_MAX_DEPTH)
                    .expect("lat/lon derived from a real projection is always on the sphere");
                let name = t.name.clone();
                prev_trixel = Some(t);
                name
            };

            row.push(name);
        }

        mapping.push(row);

        if last_report.elapsed().as_secs() >= 3 {
            last_report = Instant::now();
            log::debug!(
                "mapping row {}/{}, cache hit rate {:.2}%",
                y - min_y + 1,
                num_rows,
                cache_hits as f64 / total as f64 * 100.0
            );
        }
    }

    log::info!(
        "built mapping with {} entries for dataset {} ({:.2}% cache hit rate)",
        num_rows * num_cols,
        dataset.name,
        cache_hits as f64 / total.max(1) as f64 * 100.0
    );

    Mapping { min_x, min_y, max_x, max_y, mapping }
}
