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

//! The numeric array blob is an external facility by spec: the core only
//! needs it to round-trip a 2-D `f64` matrix unchanged, one row per
//! sample `(lat, lon, altitude, u, v, w)`. `BlobStore` is the seam;
//! `FileBlobStore` is the concrete implementation this crate ships,
//! serializing via `bincode` the way persistence elsewhere in this
//! codebase already does.

use ndarray::Array2;
use std::fs;
use std::path::Path;

use crate::error::{HtmError, Result};

pub trait BlobStore {
    fn load(&self, path: &Path) -> Result<Array2<f64>>;
    fn save(&self, path: &Path, data: &Array2<f64>) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FileBlobStore;

impl BlobStore for FileBlobStore {
    fn load(&self, path: &Path) -> Result<Array2<f64>> {
        let bytes = fs::read(path).map_err(|e| HtmError::io(path.display().to_string(), e))?;
        bincode::deserialize(&bytes).map_err(|e| {
            HtmError::IntegrityError(format!("corrupt blob at {}: {}", path.display(), e))
        })
    }

    fn save(&self, path: &Path, data: &Array2<f64>) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| HtmError::io(parent.display().to_string(), e))?;
        }
        let bytes = bincode::serialize(data)
            .map_err(|e| HtmError::IntegrityError(format!("failed to encode blob: {}", e)))?;
        fs::write(path, bytes).map_err(|e| HtmError::io(path.display().to_string(), e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Concatenates `extra` rows onto an existing blob at `path`, loading it
/// first if present, and writes the result back. This is the single
/// read-then-overwrite primitive used by both the chunk writer (§4.6) and
/// backfill (§4.7): row order is append order, never sorted.
pub fn append_rows(store: &dyn BlobStore, path: &Path, extra: &Array2<f64>) -> Result<()> {
    let merged = if store.exists(path) {
        let existing = store.load(path)?;
        concat_rows(&existing, extra)?
    } else {
        extra.clone()
    };
    store.save(path, &merged)
}

fn concat_rows(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>> {
    ndarray::stack(ndarray::Axis(0), &[a.view(), b.view()])
        .map_err(|e| HtmError::IntegrityError(format!("row concatenation failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("htm-blob-test-{}-{}", uuid::Uuid::new_v4(), name));
        p
    }

    #[test]
    fn save_then_load_roundtrips() {
        let store = FileBlobStore;
        let path = temp_path("data.npy");
        let data = array![[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [7.0, 8.0, 9.0, 10.0, 11.0, 12.0]];
        store.save(&path, &data).unwrap();
        let loaded = store.load(&path).unwrap();
        assert_eq!(loaded, data);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn append_rows_concatenates_onto_existing_blob() {
        let store = FileBlobStore;
        let path = temp_path("data.npy");

        let first = array![[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]];
        append_rows(&store, &path, &first).unwrap();

        let second = array![[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]];
        append_rows(&store, &path, &second).unwrap();

        let merged = store.load(&path).unwrap();
        assert_eq!(merged.nrows(), 2);
        assert_eq!(merged.row(0).to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(merged.row(1).to_vec(), vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);

        fs::remove_file(&path).ok();
    }
}
