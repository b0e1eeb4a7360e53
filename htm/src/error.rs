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
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HtmError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("point ({x}, {y}, {z}) not contained in any child trixel at depth {depth}")]
    PointNotContained { x: f64, y: f64, z: f64, depth: u32 },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("integrity error: {0}")]
    IntegrityError(String),

    #[error("io error on {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl HtmError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        HtmError::IoError { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, HtmError>;
