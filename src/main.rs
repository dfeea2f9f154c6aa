use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Result;
use clap::Parser;
use ffcal_scraper::{fetch::PageFetcher, server};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Opts {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to listen on.
    #[arg(long, default_value_t = 5000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ffcal_scraper=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) shared fetcher + server ──────────────────────────────────
    let opts = Opts::parse();
    let fetcher = PageFetcher::new()?;

    info!(host = %opts.host, port = opts.port, "binding http server");
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(fetcher.clone()))
            .configure(server::configure)
            .wrap(Cors::permissive())
            .wrap(Logger::default())
    })
    .bind((opts.host.as_str(), opts.port))?
    .run()
    .await?;

    Ok(())
}
