use bluefruit_packet::registry;

use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_kinds, OutputFormat};

pub fn run(format: OutputFormat) -> CliResult<i32> {
    print_kinds(registry::global(), format);
    Ok(SUCCESS)
}
