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

pub const INGEST_MIN_DEPTH: u32 = 10;
pub const INGEST_MAX_DEPTH: u32 = 20;
pub const SIMPLIFIED_DEPTH: u32 = 20;
pub const DETAILED_DEPTH: u32 = 20;
pub const MAX_RADIUS: f64 = 1000.0;

pub const DATA_FILE_NAME: &str = "data.npy";
pub const META_FILE_NAME: &str = "meta.json";
pub const SIMPLIFIED_DIR_NAME: &str = "simplified";
