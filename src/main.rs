use anyhow::{Context, Result};
use clap::Parser;
use palettegen::cli::Cli;
use palettegen::config::{load_config, ProjectConfig};
use palettegen::pipeline::{self, GenerationRequest};

fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    cli.validate()?;

    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    let project = ProjectConfig::from_env();
    let config = load_config();
    log::debug!("Project {} version {}", project.name, project.version);

    let source = cli.source(&config, &project, &cwd);
    let request = GenerationRequest {
        output: cli.output_path(),
        mode: cli.output_mode(),
        tag: cli.tag.clone(),
        project,
        author: config.palette.author.clone(),
        timestamp: chrono::Utc::now(),
    };

    let report = pipeline::run(source.as_ref(), &request)?;
    for path in &report.written {
        log::info!("Palette written to {}", path.display());
    }
    Ok(())
}
