use megalink_link::{CatalogEntry, MessageKind, CATALOG};

use crate::cmd::CatalogArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_catalog, OutputFormat};

pub fn run(args: CatalogArgs, format: OutputFormat) -> CliResult<i32> {
    let entries: Vec<CatalogEntry> = CATALOG
        .iter()
        .filter(|entry| !args.reads || entry.kind == MessageKind::ReadRequest)
        .copied()
        .collect();
    print_catalog(&entries, format);
    Ok(SUCCESS)
}
