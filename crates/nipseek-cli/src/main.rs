use clap::Parser;

use nipseek_scraper::{Pipeline, SearchFilters};

#[derive(Debug, Parser)]
#[command(name = "nipseek-cli")]
#[command(about = "Look up company records by NIP and print them as JSON")]
struct Cli {
    /// NIP to search for; separators are tolerated (e.g. 123-456-32-18).
    nip: String,

    /// Restrict results to a voivodeship.
    #[arg(long)]
    voivodeship: Option<String>,

    /// Restrict results to a city.
    #[arg(long)]
    city: Option<String>,

    /// Restrict results to a registry type (CEIDG/KRS/REGON).
    #[arg(long)]
    registry: Option<String>,

    /// Results page to fetch.
    #[arg(long)]
    page: Option<u32>,

    /// Run the browser with a visible window.
    #[arg(long)]
    headed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = nipseek_core::load_app_config()?;
    if cli.headed {
        config.headless = false;
    }

    let filters = SearchFilters {
        voivodeship: cli.voivodeship,
        city: cli.city,
        registry: cli.registry,
        page: cli.page,
    };

    let pipeline = Pipeline::from_config(&config);
    let response = pipeline.lookup(&cli.nip, &filters).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
