use clap::{Args, Parser, Subcommand, ValueEnum};
use specmatrix::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scmcli")]
#[command(about = "Specialty Coverage Matrix CLI - Build, filter, and export city-by-specialty coverage from hospital registry extracts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show summary statistics for a coverage snapshot
    Stats(StatsArgs),
    /// Show the filtered city and specialty lists
    Matrix(MatrixArgs),
    /// Show the establishment recommendation for a coverage gap
    Gaps(GapsArgs),
    /// Export the coverage matrix to JSON or CSV
    Export(ExportArgs),
    /// Fetch the registry collections from the export API (if enabled)
    #[cfg(feature = "fetch")]
    Fetch(FetchArgs),
}

#[derive(Args)]
struct StatsArgs {
    /// Path to the directory containing the registry extracts
    #[arg(short, long)]
    data_dir: PathBuf,
}

#[derive(Args)]
struct MatrixArgs {
    /// Path to the directory containing the registry extracts
    #[arg(short, long)]
    data_dir: PathBuf,
    /// Keep only cities in this state
    #[arg(long)]
    state: Option<String>,
    /// Keep only specialties in this category
    #[arg(long)]
    category: Option<String>,
    /// Case-insensitive search over city, state, and specialty names
    #[arg(long)]
    search: Option<String>,
    /// Keep only cities at or above this coverage score (0-100)
    #[arg(long)]
    min_coverage: Option<u8>,
    /// City sort key
    #[arg(long, value_enum, default_value_t = CitySortOpt::Coverage)]
    sort: CitySortOpt,
    /// Sort ascending instead of descending
    #[arg(long)]
    ascending: bool,
    /// Limit number of city rows shown
    #[arg(long, default_value_t = 20)]
    limit: usize,
}

#[derive(Args)]
struct GapsArgs {
    /// Path to the directory containing the registry extracts
    #[arg(short, long)]
    data_dir: PathBuf,
    /// City name (e.g. Pune)
    #[arg(long)]
    city: String,
    /// State name (e.g. Maharashtra)
    #[arg(long)]
    state: String,
    /// Specialty name (e.g. Oncology)
    #[arg(long)]
    specialty: String,
}

#[derive(Args)]
struct ExportArgs {
    /// Path to the directory containing the registry extracts
    #[arg(short, long)]
    data_dir: PathBuf,
    /// Output file path
    #[arg(short, long)]
    output: PathBuf,
    /// Export format
    #[arg(long, value_enum, default_value_t = ExportFormatOpt::Json)]
    format: ExportFormatOpt,
}

#[cfg(feature = "fetch")]
#[derive(Args)]
struct FetchArgs {
    /// Base URL of the registry export API
    #[arg(long)]
    base_url: String,
    /// Show summary statistics for the fetched data
    #[arg(long)]
    stats: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ExportFormatOpt {
    Json,
    Csv,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CitySortOpt {
    Name,
    State,
    Coverage,
    Specialties,
    Hospitals,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Stats(args) => cmd_stats(args),
        Commands::Matrix(args) => cmd_matrix(args),
        Commands::Gaps(args) => cmd_gaps(args),
        Commands::Export(args) => cmd_export(args),
        #[cfg(feature = "fetch")]
        Commands::Fetch(args) => cmd_fetch(args),
    }
}

fn load_dataset(data_dir: &PathBuf) -> RegistryDataset {
    match RegistryDataset::load_standard(data_dir) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("Error loading dataset: {}", e.user_message());
            std::process::exit(1);
        }
    }
}

fn cmd_stats(args: StatsArgs) {
    let dataset = load_dataset(&args.data_dir);
    let snapshot = dataset.coverage_snapshot();
    snapshot.summary.print_summary();
}

fn cmd_matrix(args: MatrixArgs) {
    let dataset = load_dataset(&args.data_dir);

    let filter = MatrixFilter {
        states: args.state.into_iter().collect(),
        categories: args.category.into_iter().collect(),
        search_term: args.search,
        min_coverage: args.min_coverage,
    };
    let sort = CitySort {
        key: match args.sort {
            CitySortOpt::Name => CitySortKey::Name,
            CitySortOpt::State => CitySortKey::State,
            CitySortOpt::Coverage => CitySortKey::CoverageScore,
            CitySortOpt::Specialties => CitySortKey::SpecialtiesCovered,
            CitySortOpt::Hospitals => CitySortKey::HospitalCount,
        },
        direction: if args.ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        },
    };

    let view = dataset.filtered_view(&filter, &sort);
    for city in view.cities.iter().take(args.limit) {
        println!(
            "{} | {} hospital(s) | {} specialt(ies) | {}% coverage",
            city.key, city.hospital_count, city.specialties_covered, city.coverage_score
        );
    }
    println!(
        "Total: {} city(ies), {} specialt(ies)",
        view.cities.len(),
        view.specialties.len()
    );
}

fn cmd_gaps(args: GapsArgs) {
    let dataset = load_dataset(&args.data_dir);
    let city = CityKey::new(&args.city, &args.state);

    match dataset.gap_recommendation(&city, &args.specialty) {
        Ok(rec) => {
            println!("Gap: {} in {}", rec.specialty, rec.city);
            println!("Recommendation: {}", rec.recommendation);
            println!("Potential demand: {:.2}", rec.potential_demand);
            println!("Estimated investment: {}", rec.estimated_investment);
            println!("Timeframe: {}", rec.timeframe);
            if rec.nearest_alternatives.is_empty() {
                println!("No city currently offers {}", rec.specialty);
            } else {
                let alternatives: Vec<&str> =
                    rec.nearest_alternatives.iter().map(|c| c.as_str()).collect();
                println!("Offered in: {}", alternatives.join("; "));
            }
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}

fn cmd_export(args: ExportArgs) {
    let dataset = load_dataset(&args.data_dir);
    let snapshot = dataset.coverage_snapshot();

    let result = match args.format {
        ExportFormatOpt::Json => JsonExporter.export_to_path(&snapshot, &args.output),
        ExportFormatOpt::Csv => CsvExporter.export_to_path(&snapshot, &args.output),
    };
    match result {
        Ok(()) => println!("Exported to {}", args.output.display()),
        Err(e) => {
            eprintln!("Export error: {}", e.user_message());
            std::process::exit(1);
        }
    }
}

#[cfg(feature = "fetch")]
fn cmd_fetch(args: FetchArgs) {
    use tokio::runtime::Runtime;

    let mut fetcher = RegistryFetcher::with_base_url(&args.base_url);
    let rt = Runtime::new().expect("Failed to create tokio runtime");
    match rt.block_on(fetcher.fetch_all()) {
        Ok(dataset) => {
            println!("Fetched {} record(s)", dataset.record_count());
            if args.stats {
                dataset.coverage_snapshot().summary.print_summary();
            }
        }
        Err(e) => {
            eprintln!("Fetch error: {}", e.user_message());
            std::process::exit(1);
        }
    }
}
