use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use viewopts::{
    init_logging, AppConfig, Args, ConfigManager, FileCatalog, LogFormat, OptionsMenuController,
    OptionsMenuProps, OptionsStore, QueryStringStore, APP_NAME,
};

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.generate_config {
        let config = ConfigManager::new(APP_NAME)?;
        let path = config.write_default_config(args.force)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(Some(()));
    }

    Ok(None)
}

fn run<S: OptionsStore>(
    controller: &mut OptionsMenuController<S>,
    args: &Args,
    catalog: &FileCatalog,
) {
    controller.fetch_with(catalog);

    // Apply the requested edits in a fixed order, each through the menu callbacks
    if !args.add.is_empty() {
        let event = controller.config().add_column.on_change(args.add.clone());
        controller.event(event);
    }
    if let Some(id) = &args.remove {
        let event = controller.config().add_column.on_remove(id.as_str());
        controller.event(event);
    }
    if let Some(format) = args.format {
        let event = controller.config().format.on_change(format.into());
        controller.event(event);
    }
    if args.unlimited_lines {
        let event = controller.config().max_lines.on_change(None);
        controller.event(event);
    } else if let Some(n) = args.max_lines {
        let event = controller.config().max_lines.on_change(Some(n));
        controller.event(event);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    color_eyre::install()?;

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    let config = AppConfig::load(APP_NAME)?;
    let log_format = args
        .log_format
        .map(LogFormat::from)
        .unwrap_or(config.logging.format);
    init_logging(log_format, &config.logging.level);

    let catalog_path = args
        .catalog
        .as_ref()
        .ok_or_else(|| eyre!("--catalog is required"))?;
    let catalog = FileCatalog::new(catalog_path);
    let props = OptionsMenuProps::from_args_and_config(&args, &config);
    let store = QueryStringStore::with_param(&args.query, config.url.param.clone());
    let mut controller = OptionsMenuController::new(props, store);

    run(&mut controller, &args, &catalog);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&controller.snapshot())?);
    } else {
        let base = args
            .base_url
            .as_deref()
            .or(config.url.base_url.as_deref())
            .unwrap_or("");
        println!("{}", controller.store().link(base));
    }

    Ok(())
}
