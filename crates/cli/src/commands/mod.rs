//! Command dispatch: one session, one endpoint, one envelope.

mod data;
mod session;

use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use vietstock::{Strategy, VietstockClient};

use crate::cli::{Cli, Commands};
use crate::output::{self, CommandInputs, ResultBuilder};
use crate::settings;

pub async fn dispatch(cli: Cli) -> Result<()> {
	let started = Instant::now();
	let Cli {
		format, global, command, ..
	} = cli;

	let config = settings::load_config(&global)?;
	let credentials = settings::credentials(&global);
	let strategy = Strategy::for_credentials(credentials.as_ref()).name();

	let builder = match command {
		Commands::Logout => session::logout(&config)?.config(settings::effective(&config, None)),
		Commands::Login { refresh } => {
			let acquirer = session::acquirer(&config, global.chrome.as_deref());
			session::login(&acquirer, credentials.as_ref(), refresh)
				.await?
				.config(settings::effective(&config, Some(strategy)))
		}
		Commands::History(args) => {
			let client = VietstockClient::anonymous(config.clone()).context("building chart client")?;
			data::history(&client, args).await?.config(settings::effective(&config, None))
		}
		command => {
			let acquirer = session::acquirer(&config, global.chrome.as_deref());
			let session = acquirer.acquire(credentials.as_ref()).await.context("acquiring portal session")?;
			let client = VietstockClient::new(config.clone(), session).context("building portal client")?;
			data::run(&client, command).await?.config(settings::effective(&config, Some(strategy)))
		}
	};

	let result = builder.started_at(started).build();
	output::print_result(&result, format);
	Ok(())
}

/// Starts an envelope for `command` carrying `records`.
fn records<T: Serialize>(command: &str, inputs: Option<CommandInputs>, records: T) -> Result<ResultBuilder<Value>> {
	let data = serde_json::to_value(records).with_context(|| format!("serializing {command} records"))?;
	let mut builder = ResultBuilder::new(command).data(data);
	if let Some(inputs) = inputs {
		builder = builder.inputs(inputs);
	}
	Ok(builder)
}
