use af_core::cancel::CancelToken;
use af_core::config::ConvertConfig;
use anyhow::{Context, Result};
use clap::Parser;

pub mod cli;
pub mod pipeline;
pub mod player;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Valider la source
    cli.validate_source()?;

    // 4. Charger la config, puis appliquer les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config)?;

    // 5. Ctrl-C : annule seek, attente et conversion en cours ; un second force la sortie
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        if handler_token.is_cancelled() {
            std::process::exit(130);
        }
        log::warn!("Ctrl-C reçu, arrêt en cours (Ctrl-C à nouveau pour forcer)...");
        handler_token.cancel();
    })
    .context("Impossible d'installer le handler Ctrl-C")?;

    // 6. Conversion + émission
    pipeline::run(&cli, &config, &cancel)
}

/// Charge `--config` s'il existe, sinon les défauts.
fn resolve_config(cli: &cli::Cli) -> Result<ConvertConfig> {
    if cli.config.exists() {
        af_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(ConvertConfig::default())
    }
}
