use std::net::SocketAddr;

use crate::{
    ServeArgs,
    build::Builder,
    config::{Config, base_path_from_config, resolve_config_path},
    server::SiteServer,
};

pub async fn run(args: &ServeArgs) -> Result<(), anyhow::Error> {
    let config_path = resolve_config_path(args.config_file.as_deref())?;
    let config = Config::load_from_file(&config_path)?;

    // Get the base path for resolving relative paths
    let base_path = base_path_from_config(&config_path);

    // Build the site first
    println!("Building site...");
    let result = Builder::new(config, base_path)
        .with_config_file(&config_path)
        .build()?;
    println!(
        "Built {} pages, {} static files",
        result.pages, result.static_files
    );

    // Parse the address
    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;

    let mut server = SiteServer::new(&result.output_dir).with_index_filename(&args.index);
    let (url, _port) = server.start(addr).await?;

    println!("\nServing site at {}", url);
    println!("Press Ctrl+C to stop\n");

    // Open browser if requested
    if args.open
        && let Err(e) = open::that(&url)
    {
        log::warn!("Failed to open browser: {}", e);
    }

    server.run().await?;

    Ok(())
}
