//! コレクション評価CLI

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tower::ServiceExt;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use collection_valuer::report::write_groups_csv;
use collection_valuer::{
    format_amount, AggregatedGroup, CollectionReport, DebugSnapshot, ScrapeObserver,
    ScraperConfig, ValuationPolicy, ValuationRequest, ValuationService,
};

/// Collection value calculator - scrape a paginated collection listing and value it
#[derive(Parser)]
#[command(name = "collection-valuer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Collection URL (a trailing ?p=<n> is ignored)
    url: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show table diagnostics for the first page
    #[arg(long)]
    debug: bool,

    /// Delay between page requests in milliseconds
    #[arg(long, default_value_t = collection_valuer::config::DEFAULT_PAGE_DELAY_MS)]
    delay_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Summary and tables
    Text,
    /// Full report as JSON
    Json,
    /// All aggregated groups as CSV
    Csv,
}

/// プログレスバーと警告表示
struct TerminalObserver {
    bar: ProgressBar,
    show_debug: bool,
}

impl ScrapeObserver for TerminalObserver {
    fn on_progress(&self, current: u32, total: u32) {
        self.bar.set_length(u64::from(total));
        self.bar.set_position(u64::from(current));
        self.bar
            .set_message(format!("Scraping page {} of {}", current, total));
    }

    fn on_warning(&self, message: &str) {
        self.bar
            .println(format!("{} {}", style("⚠").yellow(), style(message).yellow()));
    }

    fn on_debug(&self, snapshot: &DebugSnapshot) {
        if !self.show_debug {
            return;
        }
        self.bar.println(format!("{}", style("Debug: raw HTML and table info").cyan()));
        self.bar
            .println(format!("  Found {} tables on the page.", snapshot.table_count));
        if let Some(preview) = &snapshot.table_preview {
            self.bar.println(format!("{}", style(preview).dim()));
        }
        self.bar.println("  First 3 rows:");
        for row in &snapshot.first_rows {
            self.bar.println(format!("    {:?}", row));
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };
    // ページ失敗の警告はTerminalObserverが表示する
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ScraperConfig::new().with_page_delay(Duration::from_millis(cli.delay_ms));
    if let Some(secs) = cli.timeout_secs {
        config = config.with_request_timeout(Duration::from_secs(secs));
    }

    let bar = ProgressBar::new(1);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("=>-"),
    );
    bar.set_message("Scraping collection pages...");
    bar.enable_steady_tick(Duration::from_millis(100));

    let observer = Arc::new(TerminalObserver {
        bar: bar.clone(),
        show_debug: cli.debug,
    });
    let service = ValuationService::http(config, observer)?;
    let policy = *service.policy();

    let result = service.oneshot(ValuationRequest::new(cli.url.as_str())).await;
    bar.finish_and_clear();
    let report = result?;

    debug!("Report generated at {}", report.generated_at);

    let output = match cli.format {
        OutputFormat::Text => render_text(&report, &policy),
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            write_groups_csv(&report.all_groups, &mut buf)?;
            String::from_utf8(buf)?
        }
    };

    if let Some(path) = &cli.output {
        fs::write(path, &output)?;
        println!("{} Output written to {}", style("✓").green(), path.display());
    } else {
        print!("{}", output);
    }

    Ok(())
}

fn render_text(report: &CollectionReport, policy: &ValuationPolicy) -> String {
    let summary = &report.summary;
    let threshold = format_amount(policy.price_threshold);
    let percent = |rate: Decimal| (rate * Decimal::from(100)).normalize();

    let mut out = String::new();
    out.push_str(&format!("{}\n", style("Collection Summary").bold()));
    out.push_str(&format!(
        "Total collection worth: {}\n",
        money_pair(summary.grand_total_value, summary.grand_total_value_converted)
    ));
    out.push_str(&format!(
        "Items {} and up worth: {}\n",
        threshold,
        money_pair(summary.filtered_total_value, summary.filtered_total_value_converted)
    ));
    out.push_str(&format!(
        "Store offer ({}% of {} and up): {}\n",
        percent(policy.offer_rate),
        threshold,
        money_pair(summary.offer_amount, summary.offer_amount_converted)
    ));
    out.push_str(&format!(
        "Store credit ({}% of {} and up): {}\n",
        percent(policy.credit_rate),
        threshold,
        money_pair(summary.credit_amount, summary.credit_amount_converted)
    ));
    if report.is_partial() {
        out.push_str(&format!(
            "{}\n",
            style(format!("Partial result: failed pages {:?}", report.failed_pages)).yellow()
        ));
    }
    out.push_str("---\n");

    out.push_str(&format!("\n{}\n", style("All Items").bold()));
    render_groups(
        &mut out,
        &report.all_groups,
        "No items found. Please check your collection URL.",
    );

    out.push_str(&format!(
        "\n{}\n",
        style(format!("Items {} and Up (Store Offer Table)", threshold)).bold()
    ));
    render_groups(
        &mut out,
        &report.filtered_groups,
        &format!("No items {} or greater found.", threshold),
    );

    out
}

fn money_pair(amount: Decimal, converted: Decimal) -> String {
    format!("{}  |  R{}", format_amount(amount), format_amount(converted))
}

fn render_groups(out: &mut String, groups: &[AggregatedGroup], empty_message: &str) {
    if groups.is_empty() {
        out.push_str(&format!("{} {}\n", style("⚠").yellow(), style(empty_message).yellow()));
        return;
    }

    let name_width = groups
        .iter()
        .map(|g| g.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    out.push_str(&format!(
        "{:<name_width$}  {:>10}  {:>8}  {:>12}\n",
        "Name", "Price", "Quantity", "Total"
    ));
    for group in groups {
        out.push_str(&format!(
            "{:<name_width$}  {:>10}  {:>8}  {:>12}\n",
            group.name,
            format_amount(group.unit_price),
            group.total_quantity,
            format_amount(group.total_value)
        ));
    }
}
