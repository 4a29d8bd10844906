use crate::cmd::EncodeArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let packet = args.packet.into_packet()?;
    print_encoded(&packet, format);
    Ok(SUCCESS)
}
