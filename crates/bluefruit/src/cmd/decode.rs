use bluefruit_packet::registry;

use crate::cmd::DecodeArgs;
use crate::exit::{packet_error, CliError, CliResult, SUCCESS};
use crate::output::{print_packet, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let frame = parse_hex(&args.hex)?;
    let packet = registry::decode_from_buffer_as(&frame, args.family)
        .map_err(|err| packet_error("decode failed", err))?;

    print_packet(&packet, format);
    Ok(SUCCESS)
}

fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let digits: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(&digits);

    hex::decode(digits).map_err(|err| CliError::usage(format!("invalid hex frame: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_separators_are_ignored() {
        assert_eq!(parse_hex("21 43 11:22:33 35").unwrap(), b"!C\x11\x22\x33\x35");
        assert_eq!(parse_hex("0x2142").unwrap(), b"!B");
    }

    #[test]
    fn odd_length_hex_is_usage_error() {
        let err = parse_hex("214").unwrap_err();
        assert_eq!(err.code, crate::exit::USAGE);
    }
}
