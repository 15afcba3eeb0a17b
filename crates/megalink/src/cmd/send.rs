use megalink_link::{catalog, Params};
use tracing::debug;

use crate::cmd::{open_link, parse_duration, SendArgs};
use crate::exit::{link_error, CliResult, SUCCESS};
use crate::output::{print_sent, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat, baud: u32) -> CliResult<i32> {
    let wait_timeout = parse_duration(&args.wait_timeout)?;
    let params = Params {
        port: args.port,
        slot: args.slot,
        values: args.values,
        text: args.text,
    };
    // Validate before touching the device.
    let message =
        catalog::build(&args.name, &params).map_err(|err| link_error("invalid message", err))?;

    let link = open_link(&args.target, baud)?;
    let result = link.send(&message).and_then(|exchange| {
        let reply = if exchange.expects_reply() {
            Some(exchange.wait_timeout(wait_timeout)?)
        } else {
            None
        };
        Ok((exchange, reply))
    });
    link.shutdown();

    let (exchange, reply) = result.map_err(|err| link_error("send failed", err))?;
    debug!(%message, "message sent");
    print_sent(&message, &exchange, reply.as_ref(), format);
    Ok(SUCCESS)
}
