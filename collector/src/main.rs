//! Collector binary entry point

use std::path::PathBuf;

use clap::Parser;

use collector::{
    Collector, CollectorConfig, CollectorResult, FetchConfig, PagingConfig, RetryConfig,
    config::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT},
    output::{self, SaveStatus},
    services::RealPageFetcher,
};
use shared::logging;

/// Collect research awards for a set of organizations
#[derive(Parser)]
#[command(name = "collector")]
#[command(about = "Collects and deduplicates public research awards for a set of organizations")]
struct Args {
    /// Organization name to search for (repeatable)
    #[arg(long = "org", default_values_t = ["Corewell Health".to_string(), "Spectrum Health".to_string(), "Beaumont Health".to_string()])]
    organizations: Vec<String>,

    /// Lookback window in years
    #[arg(long, default_value = "25")]
    years_back: u32,

    /// State code for the geographic sweep
    #[arg(long, default_value = "MI")]
    state: String,

    /// Skip the geographic sweep
    #[arg(long)]
    no_state_sweep: bool,

    /// Keyword stem for the geographic sweep (repeatable, defaults to each organization's first word)
    #[arg(long = "stem")]
    stems: Vec<String>,

    /// Output CSV path (defaults to data/nsf_awards_<years>y.csv)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Award-search endpoint
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Comma-separated printFields override
    #[arg(long, value_delimiter = ',')]
    print_fields: Vec<String>,

    /// Retries per page on transient failures
    #[arg(long, default_value = "5")]
    max_retries: u32,

    /// Base backoff delay in milliseconds (doubles per retry)
    #[arg(long, default_value = "500")]
    backoff_ms: u64,

    /// Pause between pages of one strategy in milliseconds
    #[arg(long, default_value = "250")]
    page_pause_ms: u64,

    /// Maximum pages fetched per strategy
    #[arg(long, default_value = "200")]
    max_pages: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Rows to print in the console preview
    #[arg(long, default_value = "25")]
    preview: usize,
}

impl Args {
    fn into_config(self) -> CollectorConfig {
        let defaults = CollectorConfig::default();
        let output = self
            .output
            .unwrap_or_else(|| PathBuf::from(format!("data/nsf_awards_{}y.csv", self.years_back)));
        let print_fields = if self.print_fields.is_empty() {
            defaults.fetch.print_fields
        } else {
            self.print_fields
        };

        CollectorConfig {
            organizations: self.organizations,
            years_back: self.years_back,
            state_code: (!self.no_state_sweep).then_some(self.state),
            stems: self.stems,
            output,
            fetch: FetchConfig {
                base_url: self.base_url,
                user_agent: DEFAULT_USER_AGENT.to_string(),
                timeout_secs: self.timeout_secs,
                print_fields,
            },
            retry: RetryConfig {
                max_retries: self.max_retries,
                base_delay_ms: self.backoff_ms,
                max_delay_ms: defaults.retry.max_delay_ms,
            },
            paging: PagingConfig {
                max_pages: self.max_pages,
                page_pause_ms: self.page_pause_ms,
            },
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> CollectorResult<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    logging::init_tracing(Some(&args.log_level));
    let preview_rows = args.preview;

    let config = args.into_config();
    config.validate()?;
    tracing::debug!(
        config = %serde_json::to_string(&config).unwrap_or_default(),
        "Resolved configuration"
    );

    let organizations = config.organizations.join(", ");
    let years_back = config.years_back;
    let output_path = config.output.clone();

    let fetcher = RealPageFetcher::new(&config.fetch)?;
    let collector = Collector::new(config, fetcher);
    let today = chrono::Local::now().date_naive();

    let report = match collector.run(today).await {
        Ok(report) => report,
        Err(e) => {
            logging::log_error("Award collection", &e);
            return Err(e);
        }
    };

    println!("Strategies:");
    print!("{}", output::format_outcomes(&report));
    println!("Total awards found: {}", report.table.len());

    if report.table.is_empty() {
        println!("No awards matched {organizations} in the last {years_back} year(s).");
    } else {
        print!("{}", output::format_preview(&report.table, preview_rows));
    }

    match output::save_table(&report.table, &output_path).await? {
        SaveStatus::Saved { path, rows } => println!("Saved {} rows to {}", rows, path.display()),
        SaveStatus::NothingToSave => println!("Nothing to save."),
    }

    Ok(())
}
