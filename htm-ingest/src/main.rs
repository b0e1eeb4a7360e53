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

use anyhow::Result;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use structopt::StructOpt;

use htm::ingest::blob::FileBlobStore;
use htm::ingest::process_data;

mod projector;

use projector::UtmCrateProjector;

/// Reads survey-grid layers from `input_dir` and writes HTM-indexed
/// chunks, backfilled ancestors, simplified layers, and a manifest to
/// `output_dir`, one subdirectory per dataset.
#[derive(StructOpt)]
struct Cli {
    #[structopt(parse(from_os_str), help = "Directory of unprocessed datasets")]
    input_dir: PathBuf,

    #[structopt(parse(from_os_str), help = "Directory to write processed datasets to")]
    output_dir: PathBuf,

    #[structopt(long, default_value = "Info")]
    log_level: LevelFilter,
}

fn run() -> Result<()> {
    let args = Cli::from_args();

    SimpleLogger::new().with_level(args.log_level).init()?;

    if !args.input_dir.is_dir() {
        anyhow::bail!("input directory {} does not exist", args.input_dir.display());
    }
    std::fs::create_dir_all(&args.output_dir)?;

    let store = FileBlobStore;
    let projector = UtmCrateProjector;

    process_data(&store, &projector, &args.input_dir, &args.output_dir)?;

    log::info!("done processing all datasets");
    Ok(())
}

fn main() {
    run().unwrap();
}
