use clap::Parser;
use payroll_annotator::config::{Command, LogFormat};
use payroll_annotator::core::{ConfigProvider, Pipeline, RunSummary};
use payroll_annotator::utils::error::{PayrollError, Result};
use payroll_annotator::utils::{logger, validation::Validate};
use payroll_annotator::{
    AggregationPipeline, CliConfig, JobEngine, LocalStorage, SubstitutionPipeline, TomlConfig,
};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting payroll-annotator");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading job file: {}", path);
            TomlConfig::from_file(path).unwrap_or_else(|e| exit_with(&e))
        }
        None => TomlConfig::default(),
    };
    cli.apply_to(&mut config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        exit_with(&e);
    }

    if cli.dry_run {
        display_config_summary(&config, &cli.command);
        return Ok(());
    }

    let outcome = match execute(&cli.command, config).await {
        Ok(summary) => summary,
        Err(e) => exit_with(&e),
    };

    for warning in &outcome.warnings {
        eprintln!("⚠️  {}", warning);
    }
    if !outcome.display.is_empty() {
        println!("{}", outcome.display.trim_end());
    }
    println!("✅ {}", outcome.headline);
    for path in &outcome.written {
        println!("📁 Output saved to: {}", path);
    }

    Ok(())
}

async fn execute(command: &Command, config: TomlConfig) -> Result<RunSummary> {
    let storage = LocalStorage::new(config.output_path());

    match command {
        Command::Substitute { .. } => {
            let catalog = config.catalog_path()?.clone();
            let text = config.text_path()?.clone();
            run(SubstitutionPipeline::new(storage, config, catalog, text)).await
        }
        Command::Aggregate { .. } => {
            let groups = config.groups_path()?.clone();
            let payroll = config.payroll_path()?.clone();
            run(AggregationPipeline::new(storage, config, groups, payroll)).await
        }
    }
}

async fn run<P: Pipeline>(pipeline: P) -> Result<RunSummary> {
    JobEngine::new(pipeline).run().await
}

fn exit_with(e: &PayrollError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.severity().exit_code())
}

fn display_config_summary(config: &TomlConfig, command: &Command) {
    println!("📋 Configuration Summary:");
    if !config.job.name.is_empty() {
        println!("  Job: {}", config.job.name);
    }
    println!("  Delimiter: {:?}", char::from(config.delimiter()));
    println!("  Output: {}", config.output_path());
    let formats: Vec<&str> = config.output_formats().iter().map(|f| f.as_str()).collect();
    println!("  Formats: {}", formats.join(", "));

    let show = |label: &str, value: &Option<String>| {
        println!("  {}: {}", label, value.as_deref().unwrap_or("(missing)"));
    };
    match command {
        Command::Substitute { .. } => {
            show("Catalog", &config.substitution.catalog);
            show("Text", &config.substitution.text);
        }
        Command::Aggregate { .. } => {
            show("Groups", &config.aggregation.groups);
            show("Payroll", &config.aggregation.payroll);
            println!("  Group layout: {:?}", config.group_layout());
            println!("  Fallback group: {}", config.fallback_group());
        }
    }
    println!("  🔍 DRY RUN MODE - nothing was read or written");
}
