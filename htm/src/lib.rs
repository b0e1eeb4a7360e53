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

//! Hierarchical Triangular Mesh indexing over the unit sphere, plus the
//! ingestion pipeline that bins UTM survey grids onto it and the query
//! surface that serves them back out.

pub mod constants;
pub mod enumerate;
pub mod error;
pub mod geometry;
pub mod halfspace;
pub mod ingest;
pub mod octahedron;
pub mod query;
pub mod trixel;

pub use error::{HtmError, Result};
