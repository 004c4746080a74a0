use std::fs::File;
use std::io::BufReader;

use nutframe_container::Container;
use nutframe_frame::{FrameConfig, FrameError};
use nutframe_io::{NutDataReader, NutRead};

use crate::cmd::DecodeArgs;
use crate::exit::{container_error, frame_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{FrameOutput, FramePrinter, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let mut frame_config = FrameConfig::default();
    if let Some(max) = args.max_payload {
        if max == 0 {
            return Err(CliError::new(USAGE, "--max-payload must be greater than zero"));
        }
        frame_config.max_payload_size = max;
    }

    let mut container = Container::from_path(&args.container)
        .map_err(|err| container_error("load container", err))?
        .with_frame_config(frame_config);
    let time_bases = container.time_bases().to_vec();

    let file = File::open(&args.records).map_err(|err| {
        io_error(&format!("open {}", args.records.display()), err)
    })?;
    let mut reader = NutDataReader::new(BufReader::new(file));
    let mut printer = FramePrinter::new(format);

    let mut decoded = 0u64;
    let result = loop {
        if args.count.is_some_and(|count| decoded >= count) {
            break Ok(());
        }

        let offset = reader.offset();
        let code = match reader.try_read_u8() {
            Ok(Some(code)) => code,
            Ok(None) => break Ok(()),
            Err(err) => break Err((offset, FrameError::from(err))),
        };

        match container.decode_frame(code, &mut reader) {
            Ok(frame) => {
                let out = FrameOutput::new(decoded, offset, code, &frame, &time_bases);
                printer.print(&out, &frame);
                decoded += 1;
            }
            Err(err) => break Err((offset, err)),
        }
    };

    // rows decoded before a failure are still shown
    printer.finish();

    match result {
        Ok(()) => {
            tracing::info!(frames = decoded, bytes = reader.offset(), "decode finished");
            Ok(SUCCESS)
        }
        Err((offset, err)) => Err(frame_error(
            &format!("frame {decoded} at offset {offset}"),
            err,
        )),
    }
}
