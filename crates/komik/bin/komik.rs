#[macro_use]
extern crate log;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use komik::{
    application::{ClientController, ControllerBuilder, ViewOptions},
    infrastructure::{
        cloud::SupabaseCloud, config::Config, proxy::ProxyCatalogue, resolver::HttpIdResolver,
        storage::FileStorage,
    },
    presentation::surface::HtmlSurface,
};

#[derive(Parser)]
#[command(version, about)]
struct Opts {
    /// Path to config file
    #[clap(long)]
    config: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the id mapping backend and page renderer
    Serve,
    /// Render one location to stdout
    Open { location: String },
    /// List reading history
    History,
    /// List bookmarks
    Bookmarks,
    /// Add or remove a bookmark
    Bookmark {
        slug: String,
        title: String,
        image: String,
    },
    /// Print the cloud login url
    LoginUrl,
}

fn build_controller(config: &Config) -> Result<ClientController<HtmlSurface>, anyhow::Error> {
    let catalogue = ProxyCatalogue::new(&config.api_proxy, &config.api_base)?;
    let resolver = HttpIdResolver::new(&config.backend_url());
    let storage = FileStorage::open(&config.storage_path)?;

    let mut builder = ControllerBuilder::new()
        .with_catalogue(Arc::new(catalogue))
        .with_resolver(Arc::new(resolver))
        .with_storage(Arc::new(storage))
        .with_options(ViewOptions {
            hero_count: config.hero_count,
            latest_count: config.latest_count,
            // every render here is a one-shot page
            carousel: false,
            origin: format!("http://127.0.0.1:{}", config.port),
            ..Default::default()
        });

    if let Some(cloud) = &config.cloud {
        builder = builder.with_cloud(Arc::new(SupabaseCloud::new(cloud)));
    }

    builder.build(HtmlSurface::new())
}

#[cfg(feature = "server")]
async fn serve(config: &Config) -> Result<(), anyhow::Error> {
    use komik::{
        domain::services::mapping::MappingService,
        infrastructure::{database, repositories::mapping::MappingRepositoryImpl},
        presentation::ServerBuilder,
    };

    let pool = database::establish_connection(&config.database_path).await?;
    let mapping_svc = MappingService::new(MappingRepositoryImpl::new(pool.clone()));

    let controller = build_controller(config)?;
    controller.load_genres().await;
    controller.check_auth_status().await;

    let server_fut = ServerBuilder::new()
        .with_mapping_svc(mapping_svc)
        .with_controller(controller)
        .build()?
        .serve(([0, 0, 0, 0], config.port));

    tokio::select! {
        res = server_fut => {
            if let Err(e) = res {
                error!("server error: {e}");
            }
            info!("server shutdown");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("ctrl+c signal");
        }
    }

    info!("closing database...");
    pool.close().await;

    Ok(())
}

#[cfg(not(feature = "server"))]
async fn serve(_config: &Config) -> Result<(), anyhow::Error> {
    Err(anyhow::anyhow!("built without the server feature"))
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let mut logger = env_logger::Builder::from_default_env();
    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        info!("rust_log: {}", rust_log);
    } else if let Ok(komik_log) = std::env::var("KOMIK_LOG") {
        info!("komik_log: {}", komik_log);
        logger.parse_filters(&format!("komik={komik_log}"));
    }

    logger.init();

    let opts = Opts::parse();
    let config = Config::open(opts.config)?;

    debug!("config: {:?}", config);

    match opts.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config).await?,
        Command::Open { location } => {
            let controller = build_controller(&config)?;
            let outcome = controller.start(&location).await;
            info!("{location}: {outcome:?}");
            println!("{}", controller.with_surface(|surface| surface.content().to_string()));
        }
        Command::History => {
            let controller = build_controller(&config)?;
            controller.check_auth_status().await;
            let (entries, source) = controller.library().list_history().await;
            info!("history from {source:?}");
            for entry in entries {
                println!(
                    "{}\t{}\t{}",
                    entry.slug,
                    entry.title,
                    entry.last_chapter_title.unwrap_or_default()
                );
            }
        }
        Command::Bookmarks => {
            let controller = build_controller(&config)?;
            for bookmark in controller.library().list_bookmarks() {
                println!("{}\t{}", bookmark.slug, bookmark.title);
            }
        }
        Command::Bookmark { slug, title, image } => {
            let controller = build_controller(&config)?;
            let bookmarked = controller.toggle_bookmark(&slug, &title, &image)?;
            println!("{slug}: {}", if bookmarked { "bookmarked" } else { "removed" });
        }
        Command::LoginUrl => {
            let controller = build_controller(&config)?;
            match controller.login_url() {
                Some(url) => println!("{url}"),
                None => println!("cloud sync is not configured"),
            }
        }
    }

    Ok(())
}
