use anyhow::Context;
use bilingual_product_import::csv_processor::{ENGLISH_COLUMNS, TRANSLATION_COLUMNS};
use bilingual_product_import::{
    load_product_rows, AppConfig, Credentials, LangCode, OdooClient,
    ProductRows, ProductSynchronizer, XmlEmitter,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Import bilingual (English/Arabic) products into Odoo.
#[derive(Parser, Debug)]
#[command(name = "bilingual-product-import", version)]
struct Cli {
    /// Path to the English CSV file
    #[arg(long)]
    csv: String,

    /// Path to the Arabic CSV file
    #[arg(long)]
    arabic_csv: Option<String>,

    /// Odoo URL [default: http://localhost:8069]
    #[arg(long)]
    url: Option<String>,

    /// Database name
    #[arg(long)]
    db: Option<String>,

    /// Username
    #[arg(long)]
    user: Option<String>,

    /// Password
    #[arg(long)]
    password: Option<String>,

    /// Arabic language code [default: ar_001]
    #[arg(long)]
    lang: Option<String>,

    /// Generate an XML data file instead of importing
    #[arg(long)]
    generate_xml: bool,

    /// XML output path [default: product_data.xml]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Text encoding of the CSV files [default: utf-8]
    #[arg(long)]
    encoding: Option<String>,

    /// Configuration file, ignored when absent
    #[arg(long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(Some(&cli.config))?;

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::registry()
        .with(config.logging.env_filter(rust_log.as_deref())?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let encoding = cli
        .encoding
        .clone()
        .unwrap_or_else(|| config.import.encoding.clone());

    if cli.generate_xml {
        let rows = load_product_rows(&cli.csv, &encoding, ENGLISH_COLUMNS)
            .with_context(|| format!("failed to read {}", cli.csv))?;
        let output = cli.output.unwrap_or(config.import.xml_output);

        XmlEmitter::new(config.odoo.model.as_str())
            .write_file(&rows, &output)
            .await
            .with_context(|| format!("failed to write {}", output.display()))?;

        println!("Generated XML file: {}", output.display());
        return Ok(());
    }

    let credentials = Credentials::from_parts(cli.db, cli.user, cli.password)?;

    let lang = LangCode::parse(&cli.lang.unwrap_or(config.import.lang))?;
    let url = cli.url.unwrap_or(config.odoo.url);

    let english = load_product_rows(&cli.csv, &encoding, ENGLISH_COLUMNS)
        .with_context(|| format!("failed to read {}", cli.csv))?;
    let arabic = match &cli.arabic_csv {
        Some(path) => load_product_rows(path, &encoding, TRANSLATION_COLUMNS)
            .with_context(|| format!("failed to read {}", path))?,
        None => ProductRows::new(),
    };

    tracing::info!(url = %url, db = %credentials.db, rows = english.len(), "Starting import");

    let client = OdooClient::authenticate(
        &url,
        &credentials,
        Duration::from_secs(config.odoo.timeout_seconds),
    )
    .await?;

    ProductSynchronizer::new(&client)
        .with_model(config.odoo.model)
        .run(&english, &arabic, &lang)
        .await?;

    Ok(())
}
