use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use colored::Colorize;
use tracing::info;

use dtvis::{BarOrder, Config, ImportanceChart, PathTable, SortCriterion, TreeExport};

#[derive(Parser, Debug)]
#[command(name = "dtvis")]
#[command(author, version, about = "Decision-path tables and feature-importance charts from a decision-tree export")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Pretty-printed JSON for a renderer
    Json,
    /// Tab-separated text
    Text,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decision-path table: columns and ranked rows
    Paths {
        /// Tree export JSON file
        export: PathBuf,

        /// Sort by "default" (leaf number), a class index or a class label
        #[arg(short, long)]
        sort: Option<String>,

        /// Leave out the rank column
        #[arg(long)]
        no_rank: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Feature-importance bars and their category order
    Importances {
        /// Tree export JSON file
        export: PathBuf,

        /// Bar order: "rank" or "alphabetical"
        #[arg(short, long)]
        order: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Sort options offered for the decision-path table
    Options {
        /// Tree export JSON file
        export: PathBuf,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli.command) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Paths {
            export,
            sort,
            no_rank,
            format,
        } => {
            let config = Config::load();
            let export = load_export(&export)?;

            let mut layout = config.table.layout.clone();
            if no_rank {
                layout.rank_column = false;
            }
            let mut table = PathTable::new(&export, layout)?;

            let sort = sort.unwrap_or(config.table.default_sort);
            let criterion = SortCriterion::resolve(&sort, table.class_labels())?;
            table.sort_by(criterion)?;
            info!(rows = table.rows().len(), %criterion, "decision paths sorted");

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&table.view())?),
                Format::Text => print_table(&table),
            }
        }

        Command::Importances {
            export,
            order,
            format,
        } => {
            let config = Config::load();
            let export = load_export(&export)?;

            let chart = ImportanceChart::new(export.importances());
            let order = match order {
                Some(order) => order.parse::<BarOrder>()?,
                None => config.bars.default_order,
            };
            info!(
                bars = chart.bars().len(),
                dropped = export.importances().len() - chart.bars().len(),
                %order,
                "importance bars ordered"
            );

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&chart.view(order))?),
                Format::Text => print_bars(&chart, order),
            }
        }

        Command::Options { export } => {
            let export = load_export(&export)?;
            let options = dtvis::sort_options(export.class_labels());
            println!("{}", serde_json::to_string_pretty(&options)?);
        }

        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "dtvis", &mut io::stdout());
        }
    }

    Ok(())
}

fn load_export(path: &Path) -> Result<TreeExport> {
    TreeExport::from_path(path).with_context(|| format!("failed to load export {}", path.display()))
}

fn print_table(table: &PathTable) {
    println!("{}", table.columns().join("\t").bold());
    for row in table.ranked() {
        println!("{}", row.cell_texts(table.layout()).join("\t"));
    }
}

fn print_bars(chart: &ImportanceChart, order: BarOrder) {
    for bar in chart.ordered_bars(order) {
        println!("{}\t{}", bar.attribute.cyan(), bar.importance);
    }
}
