use crate::{
    BuildArgs,
    build::Builder,
    config::{Config, base_path_from_config, resolve_config_path},
};

pub async fn run(args: &BuildArgs) -> Result<(), anyhow::Error> {
    let config_path = resolve_config_path(args.config_file.as_deref())?;
    let config = Config::load_from_file(&config_path)?;

    // Get the base path for resolving relative paths
    let base_path = base_path_from_config(&config_path);

    let builder = Builder::new(config, base_path).with_config_file(&config_path);
    let result = builder.build()?;

    println!(
        "Built site to {} ({} pages, {} static files, {} held back)",
        result.output_dir.display(),
        result.pages,
        result.static_files,
        result.skipped
    );

    Ok(())
}
