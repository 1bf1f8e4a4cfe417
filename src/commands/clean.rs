use crate::{
    CleanArgs,
    config::{Config, base_path_from_config, resolve_config_path},
};

pub async fn run(args: &CleanArgs) -> Result<(), anyhow::Error> {
    let config_path = resolve_config_path(args.config_file.as_deref())?;
    let config = Config::load_from_file(&config_path)?;

    // Get the base path for resolving relative paths
    let base_path = base_path_from_config(&config_path);

    // Delete the generated site folder
    let site_path = config.output_dir(&base_path);
    let site_path = site_path.canonicalize().unwrap_or(site_path);
    if !site_path.exists() {
        println!("Nothing to clean at {}", site_path.display());
        return Ok(());
    }

    if site_path == base_path.canonicalize().unwrap_or(base_path) {
        return Err(anyhow::anyhow!(
            "Refusing to delete {}: it is the project directory",
            site_path.display()
        ));
    }

    if args.dry_run {
        println!("Would delete {}", site_path.display());
    } else {
        tokio::fs::remove_dir_all(&site_path).await?;
        println!("Deleted {}", site_path.display());
    }

    Ok(())
}
