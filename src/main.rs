use clap::{ArgAction, Parser, Subcommand};
use dialoguer::Select;
use show_dashboard::{
    DashboardError, Show, ShowStore, StoreEvent, TVMAZE_BASE_URL, TvMazeCatalog, check_store,
};
use std::process;
use tracing_subscriber::EnvFilter;

/// Browse, search and filter TV shows from the TVMaze catalog
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Base URL of the TVMaze-compatible catalog API
    #[arg(long, env = "SHOW_DASHBOARD_API_URL", default_value = TVMAZE_BASE_URL, global = true)]
    api_url: String,

    /// Increase log output (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every genre of the catalog with its number of shows
    Genres,

    /// Show the best rated shows per genre
    List {
        /// Only list shows of this genre (case-sensitive)
        #[arg(short, long)]
        genre: Option<String>,

        /// Number of shows to print per genre
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// Search the catalog by name
    Search {
        query: String,

        /// Pick one of the results interactively and show its details
        #[arg(short, long)]
        pick: bool,
    },

    /// Show the details of a single show
    Show { id: u64 },
}

/// Sets up the tracing subscriber, `RUST_LOG` takes precedence over `-v`
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("show_dashboard={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles store events and prints progress to stderr
fn handle_store_event(event: &StoreEvent) {
    if let StoreEvent::LoadingStarted(operation) = event {
        eprintln!("Working: {operation}...");
    }
}

fn format_rating(show: &Show) -> String {
    show.rating
        .average
        .map(|rating| format!("{rating:.1}"))
        .unwrap_or_else(|| "-".to_string())
}

/// One line summary used in lists
fn format_show_line(show: &Show) -> String {
    let year = show
        .premiere_year()
        .map(|year| format!(" ({year})"))
        .unwrap_or_default();
    format!("[{:>4}] {}{} #{}", format_rating(show), show.name, year, show.id)
}

fn print_show_details(show: &Show) {
    println!("=== {} ===\n", show.name);
    println!("  Rating:    {}", format_rating(show));
    println!("  Genres:    {}", show.genres.join(", "));
    println!("  Status:    {}", show.status);
    if let Some(language) = &show.language {
        println!("  Language:  {}", language);
    }
    if let Some(broadcaster) = show.broadcaster() {
        println!("  Network:   {}", broadcaster);
    }
    if let Some(premiered) = &show.premiered {
        match &show.ended {
            Some(ended) => println!("  Aired:     {} - {}", premiered, ended),
            None => println!("  Aired:     {} - ", premiered),
        }
    }
    if !show.schedule.days.is_empty() {
        println!(
            "  Schedule:  {} {}",
            show.schedule.days.join(", "),
            show.schedule.time
        );
    }
    if let Some(site) = &show.official_site {
        println!("  Website:   {}", site);
    }
    if let Some(imdb) = &show.externals.imdb {
        println!("  IMDb:      https://www.imdb.com/title/{}", imdb);
    }
    if let Some(image) = &show.image {
        println!("  Poster:    {}", image.original);
    }

    let summary = show.plain_summary();
    if !summary.is_empty() {
        println!("\n{}", summary);
    }
}

fn run(cli: Cli) -> Result<(), DashboardError> {
    let catalog = TvMazeCatalog::with_base_url(&cli.api_url)?;
    tracing::info!(api_url = catalog.base_url(), "using catalog");
    let mut store = ShowStore::with_listener(catalog, handle_store_event);

    match cli.command {
        Command::Genres => {
            store.load_all_shows();
            check_store(&store)?;

            for group in store.genre_groups() {
                println!("{:<24} {:>5}", group.genre, group.shows.len());
            }
        }
        Command::List { genre, limit } => {
            store.load_all_shows();
            check_store(&store)?;

            match genre {
                Some(genre) => {
                    let shows = store.shows_in_genre(&genre);
                    if shows.is_empty() {
                        println!("No shows found for genre '{}'.", genre);
                        println!("Available genres: {}", store.unique_genres().join(", "));
                        return Ok(());
                    }

                    println!("=== {} ({}) ===", genre, shows.len());
                    for show in shows.iter().take(limit) {
                        println!("  {}", format_show_line(show));
                    }
                }
                None => {
                    for group in store.genre_groups() {
                        println!("\n=== {} ({}) ===", group.genre, group.shows.len());
                        for show in group.shows.iter().take(limit) {
                            println!("  {}", format_show_line(show));
                        }
                    }
                }
            }
        }
        Command::Search { query, pick } => {
            store.search(&query);
            check_store(&store)?;

            if !store.has_search_results() {
                println!("No shows found for '{}'.", store.search_query());
                return Ok(());
            }

            if !pick {
                for show in store.search_results() {
                    println!("  {}", format_show_line(show));
                }
                return Ok(());
            }

            let labels: Vec<String> = store.search_results().iter().map(format_show_line).collect();
            let selection = Select::new()
                .with_prompt("Select a show")
                .items(&labels)
                .default(0)
                .interact_opt()?;

            if let Some(index) = selection {
                let id = store.search_results()[index].id;
                store.clear_search();
                store.load_show_by_id(id);
                check_store(&store)?;

                if let Some(show) = store.selected_show() {
                    println!();
                    print_show_details(show);
                }
            }
        }
        Command::Show { id } => {
            store.load_show_by_id(id);
            if store.error().is_some_and(|error| error.is_not_found()) {
                eprintln!("Hint: use `search <name>` to look up the ID of a show.");
            }
            check_store(&store)?;

            if let Some(show) = store.selected_show() {
                print_show_details(show);
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("\nError: {}", e);
        process::exit(1);
    }
}
