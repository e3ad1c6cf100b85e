use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use helpdoc_snippets_core::{merge_catalog, validate_catalog};
use helpdoc_snippets_harvest::crawl::{CrawlConfig, harvest};
use helpdoc_snippets_harvest::output::{
    ReportFormat, format_report, read_catalog, read_overrides, read_records, write_catalog,
    write_records,
};
use helpdoc_snippets_harvest::report::build_report_bundle;

const PACKAGE_VERSION: &str = "1.0.0";

#[derive(Debug, Parser)]
#[command(name = "snippet-harvest")]
#[command(about = "Documentation reference crawler and snippet catalog builder")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Crawl the documentation site and harvest snippet records.
    Harvest(HarvestArgs),
    /// Merge harvested records and manual overrides into a catalog.
    Merge(MergeArgs),
    /// Validate one or more snippet catalog files.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct HarvestArgs {
    /// Documentation release tag (e.g. R2020a).
    #[arg(long, default_value = "R2020a")]
    doc_version: String,
    /// Comma-separated product ids to accept (e.g. matlab,simulink).
    #[arg(long)]
    products: Option<String>,
    /// Accept every product in the catalog listing.
    #[arg(long)]
    all_products: bool,
    /// Site origin, overridable for testing against a local server.
    #[arg(long, default_value = "https://www.mathworks.com")]
    origin: String,
    /// Maximum concurrent page fetches.
    #[arg(long, default_value_t = 16)]
    concurrency: usize,
    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,
    /// Output directory for the records and report files.
    #[arg(long)]
    output: PathBuf,
    /// Format for the run report printed to stdout.
    #[arg(long, value_enum, default_value = "table")]
    report_format: ReportFormat,
}

#[derive(Debug, Args)]
struct MergeArgs {
    /// Harvested records files, applied in order (last key wins).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Manual override records applied on top of the crawl output.
    #[arg(long)]
    patch: Option<PathBuf>,
    /// Output catalog path.
    #[arg(long)]
    output: PathBuf,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Catalog files to check.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Harvest(args) => run_harvest(args).await,
        Command::Merge(args) => run_merge(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run_harvest(args: HarvestArgs) -> Result<(), String> {
    let products = parse_csv_list(args.products);
    if products.is_empty() && !args.all_products {
        return Err("Specify at least one product via --products, or pass --all-products".to_string());
    }

    std::fs::create_dir_all(&args.output).map_err(|err| {
        format!(
            "Failed to create output directory '{}': {err}",
            args.output.display()
        )
    })?;

    let config = CrawlConfig {
        origin: args.origin,
        doc_version: args.doc_version,
        products,
        all_products: args.all_products,
        concurrency: args.concurrency,
        timeout_secs: args.timeout,
    };

    let outcome = harvest(&config).await.map_err(|err| err.to_string())?;

    let records_path = args.output.join("funcs.json");
    write_records(&records_path, &outcome.records)?;

    let bundle = build_report_bundle(PACKAGE_VERSION, outcome.reports);
    let report_path = args.output.join("harvest-report.json");
    let report_json = format_report(&bundle, ReportFormat::Json)?;
    std::fs::write(&report_path, report_json)
        .map_err(|err| format!("Failed to write '{}': {err}", report_path.display()))?;

    println!(
        "Harvested {} record(s) from {} page(s) into '{}'.",
        outcome.records.len(),
        bundle.pages.len(),
        records_path.display()
    );
    if bundle.rejected_pages > 0 {
        eprintln!("{} page(s) rejected; see the run report.", bundle.rejected_pages);
    }
    print!("{}", format_report(&bundle, args.report_format)?);

    Ok(())
}

fn run_merge(args: MergeArgs) -> Result<(), String> {
    let mut entries = Vec::new();
    for input in &args.inputs {
        entries.extend(read_records(input)?);
    }

    let overrides = match &args.patch {
        Some(path) => read_overrides(path)?,
        None => Default::default(),
    };
    let patched = overrides.len();

    let catalog = merge_catalog(entries, overrides);
    if let Some(first) = validate_catalog(&catalog).first() {
        return Err(format!("Catalog validation failed: {first}"));
    }

    write_catalog(&args.output, &catalog)?;
    println!(
        "Merged {} record(s) ({} patched) into '{}'.",
        catalog.len(),
        patched,
        args.output.display()
    );
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    for input in &args.inputs {
        let catalog = read_catalog(input)?;
        let errors = validate_catalog(&catalog);
        if let Some(first) = errors.first() {
            return Err(format!(
                "Catalog validation failed for '{}': {first}",
                input.display()
            ));
        }
        println!(
            "Validated {} record(s) in '{}'.",
            catalog.len(),
            input.display()
        );
    }
    Ok(())
}

fn parse_csv_list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::parse_csv_list;

    #[test]
    fn test_parse_csv_list_trims_and_drops_empty() {
        let parsed = parse_csv_list(Some(" matlab, simulink, ,stats ".to_string()));
        assert_eq!(parsed, vec!["matlab", "simulink", "stats"]);
    }

    #[test]
    fn test_parse_csv_list_none_is_empty() {
        assert!(parse_csv_list(None).is_empty());
    }
}
