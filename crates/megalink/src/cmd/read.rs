use megalink_link::{Message, Sensor};
use tracing::debug;

use crate::cmd::{open_link, parse_duration, ReadArgs};
use crate::exit::{link_error, CliResult, SUCCESS};
use crate::output::{print_reading, OutputFormat};

pub fn run(args: ReadArgs, format: OutputFormat, baud: u32) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let sensor: Sensor = args
        .sensor
        .parse()
        .map_err(|err| link_error("unknown sensor", err))?;
    let message = match args.param {
        Some(extra) => Message::read_with(sensor, args.port, extra),
        None => Message::read(sensor, args.port),
    };

    let link = open_link(&args.target, baud)?;
    let result = link
        .send(&message)
        .and_then(|exchange| {
            let value = exchange.wait_timeout(timeout)?;
            Ok((exchange, value))
        });
    link.shutdown();

    let (exchange, value) = result.map_err(|err| link_error("read failed", err))?;
    debug!(%message, round_trip = ?exchange.round_trip(), "reading complete");
    print_reading(&message, &exchange, &value, format);
    Ok(SUCCESS)
}
