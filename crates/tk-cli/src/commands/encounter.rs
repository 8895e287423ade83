use std::io::{self, BufRead, Write};

use colored::Colorize;
use tk_lookup::{ChatClient, ContentSource};
use tk_mechanics::Session;
use tk_store::Store;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::shell::{EncounterShell, is_quit};

/// Build the suggestion and lookup source, if an API key is configured.
fn content_source(config: &AppConfig) -> Option<Box<dyn ContentSource>> {
    match ChatClient::new(config.lookup.clone()) {
        Ok(client) if client.is_configured() => Some(Box::new(client)),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "lookup client unavailable");
            None
        }
    }
}

pub async fn run(store: Store, config: &AppConfig, seed: Option<u64>) -> Result<(), String> {
    let session = Session::new(config.session(seed));
    let source = content_source(config);
    let lookups = if source.is_some() { "on" } else { "off" };
    let mut shell = EncounterShell::new(session, store, source);

    println!("  {} Encounter", "Starting".bold());
    match seed.or(config.seed) {
        Some(seed) => println!("  Lookups: {lookups} | Seed: {seed}"),
        None => println!("  Lookups: {lookups}"),
    }
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match shell.process(input).await {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}\n");
                }
                if is_quit(input) {
                    break;
                }
            }
            Err(e) => println!("{}\n", e.yellow()),
        }
    }

    let session = shell.session();
    debug!(
        round = session.encounter().round(),
        rolls = session.history().len(),
        "encounter ended"
    );
    Ok(())
}
