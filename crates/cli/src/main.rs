use clap::Parser;
use vietstock_cli::{
	cli::Cli,
	commands, error, logging,
	output::{self, OutputFormat, ResultBuilder},
};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;
	let command = cli.command.name();

	if let Err(err) = commands::dispatch(cli).await {
		handle_error(command, &err, format);
		std::process::exit(1);
	}
}

fn handle_error(command: &str, err: &anyhow::Error, format: OutputFormat) {
	let cmd_error = error::to_command_error(err);

	// Humans read stderr; machine formats also get an ok=false envelope.
	output::print_error_stderr(&cmd_error);

	if format != OutputFormat::Text {
		let result: output::CommandResult<()> = ResultBuilder::new(command).error(cmd_error.code, &cmd_error.message).build();
		output::print_result(&result, format);
	}
}
