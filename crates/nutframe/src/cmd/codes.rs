use nutframe_container::Container;

use crate::cmd::CodesArgs;
use crate::exit::{container_error, CliResult, SUCCESS};
use crate::output::{print_codes, CodeOutput, OutputFormat};

pub fn run(args: CodesArgs, format: OutputFormat) -> CliResult<i32> {
    let container = Container::from_path(&args.container)
        .map_err(|err| container_error("load container", err))?;

    let rows: Vec<CodeOutput> = container
        .codes()
        .valid_codes()
        .map(|(code, entry)| CodeOutput::new(code, entry))
        .collect();

    print_codes(&rows, format);
    Ok(SUCCESS)
}
