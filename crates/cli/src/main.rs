use anyhow::{anyhow, Context, Result};
use backend::{AdminStats, Backend, BackendConfig, Dashboard, SignupRequest};
use catalog::seed::ADMIN_ID;
use catalog::{Genre, MemoryStore, Movie, MovieDraft, User};
use clap::{Parser, Subcommand};
use colored::Colorize;
use recommender::Recommendation;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

/// CineSense - genre-based movie recommendations
#[derive(Parser)]
#[command(name = "cinesense")]
#[command(about = "Browse the CineSense catalog and get movie recommendations", long_about = None)]
struct Cli {
    /// Snapshot file to use (overrides CINESENSE_STORE_PATH)
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    /// Simulated backend latency in milliseconds (overrides CINESENSE_LATENCY_MS)
    #[arg(long, global = true)]
    latency_ms: Option<u64>,

    /// Print results as JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the whole catalog in catalog order
    Movies,

    /// Show a single movie
    Show {
        /// Movie ID to display
        #[arg(long)]
        id: String,
    },

    /// Rank the catalog for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: String,

        /// Only print the first N titles
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the home page rows for a user
    Dashboard {
        #[arg(long)]
        user_id: String,
    },

    /// Create an account
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        password: String,

        /// Between 1 and 5 preferred genres, comma separated (e.g. "Drama,Sci-Fi")
        #[arg(long, value_delimiter = ',', required = true)]
        genres: Vec<Genre>,
    },

    /// Look up an account by email
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        password: String,
    },

    /// List or change a user's watchlist
    Watchlist {
        #[command(subcommand)]
        action: WatchlistAction,
    },

    /// Write or read movie reviews
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },

    /// Add a title to the catalog (admin only)
    AddMovie {
        /// Acting user; must be an admin
        #[arg(long, default_value = ADMIN_ID)]
        as_user: String,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Comma separated genre list
        #[arg(long, value_delimiter = ',', required = true)]
        genres: Vec<Genre>,

        #[arg(long, default_value = "")]
        director: String,

        /// Comma separated cast list
        #[arg(long, value_delimiter = ',')]
        cast: Vec<String>,

        #[arg(long)]
        year: u16,

        /// Running time in minutes
        #[arg(long)]
        duration: u32,

        #[arg(long, default_value = "")]
        poster_url: String,
    },

    /// Show catalog and account counters
    Stats,
}

#[derive(Subcommand)]
enum WatchlistAction {
    /// Show the movies on a user's watchlist
    List {
        #[arg(long)]
        user_id: String,
    },

    /// Add the movie if absent, remove it if present
    Toggle {
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        movie_id: String,
    },
}

#[derive(Subcommand)]
enum ReviewAction {
    /// Review a movie
    Add {
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        movie_id: String,

        /// Stars, 1 to 5
        #[arg(long)]
        rating: f32,

        #[arg(long, default_value = "")]
        comment: String,
    },

    /// Show the reviews of a movie
    List {
        #[arg(long)]
        movie_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = BackendConfig::from_env().context("Failed to load backend configuration")?;
    if let Some(store) = cli.store {
        config.store_path = store;
    }
    if let Some(latency_ms) = cli.latency_ms {
        config.latency_ms = latency_ms;
    }
    debug!("Using configuration {:?}", config);

    let start = Instant::now();
    let backend = Backend::open(&config)
        .with_context(|| format!("Failed to open store at {}", config.store_path.display()))?;
    debug!("Store opened in {:?}", start.elapsed());

    let output = Output { json: cli.json };

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Movies => handle_movies(&backend, &output).await?,
        Commands::Show { id } => handle_show(&backend, &output, &id).await?,
        Commands::Recommend { user_id, limit } => {
            handle_recommend(&backend, &output, &user_id, limit).await?
        }
        Commands::Dashboard { user_id } => handle_dashboard(&backend, &output, &user_id).await?,
        Commands::Signup {
            name,
            email,
            password,
            genres,
        } => {
            let request = SignupRequest {
                name,
                email,
                password,
                genres,
            };
            handle_signup(&backend, &output, request).await?
        }
        Commands::Login { email, password } => {
            handle_login(&backend, &output, &email, &password).await?
        }
        Commands::Watchlist { action } => handle_watchlist(&backend, &output, action).await?,
        Commands::Review { action } => handle_review(&backend, &output, action).await?,
        Commands::AddMovie {
            as_user,
            title,
            description,
            genres,
            director,
            cast,
            year,
            duration,
            poster_url,
        } => {
            let draft = MovieDraft {
                title,
                description,
                genres,
                director,
                cast,
                year,
                duration_minutes: duration,
                poster_url,
            };
            handle_add_movie(&backend, &output, &as_user, draft).await?
        }
        Commands::Stats => handle_stats(&backend, &output).await?,
    }

    Ok(())
}

/// Chooses between JSON and colored text for every handler
struct Output {
    json: bool,
}

impl Output {
    /// Print `value` as JSON if requested; returns true when it did
    fn emit_json<T: Serialize>(&self, value: &T) -> Result<bool> {
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(value).context("Failed to encode output")?
            );
        }
        Ok(self.json)
    }
}

/// Handle the 'movies' command
async fn handle_movies(backend: &Backend<MemoryStore>, output: &Output) -> Result<()> {
    let movies = backend.movies().await;
    if output.emit_json(&movies)? {
        return Ok(());
    }

    println!("{}", format!("Catalog ({} titles):", movies.len()).bold().blue());
    print_movie_list(&movies);
    Ok(())
}

/// Handle the 'show' command
async fn handle_show(backend: &Backend<MemoryStore>, output: &Output, id: &str) -> Result<()> {
    let movie = backend
        .movie(id)
        .await
        .ok_or_else(|| anyhow!("Movie {} not found", id))?;
    if output.emit_json(&movie)? {
        return Ok(());
    }

    println!("{}", format!("{} ({})", movie.title, movie.year).bold().blue());
    println!("{}Genres: {}", "• ".green(), genre_list(&movie.genres));
    println!("{}Director: {}", "• ".green(), movie.director);
    println!("{}Cast: {}", "• ".green(), movie.cast.join(", "));
    println!("{}Duration: {} min", "• ".green(), movie.duration_minutes);
    println!("{}Rating: {:.1}", "• ".cyan(), movie.rating);
    println!("{}Views: {}", "• ".cyan(), movie.view_count);
    if !movie.description.is_empty() {
        println!();
        println!("{}", movie.description);
    }
    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    backend: &Backend<MemoryStore>,
    output: &Output,
    user_id: &str,
    limit: Option<usize>,
) -> Result<()> {
    let start = Instant::now();
    let recommendation = backend.recommended(user_id).await;
    let elapsed = start.elapsed();

    if output.emit_json(&recommendation)? {
        return Ok(());
    }

    print_recommendation(&recommendation, user_id, limit);
    println!("{} Ranked in {:?}", "✓".green(), elapsed);
    Ok(())
}

/// Handle the 'dashboard' command
async fn handle_dashboard(
    backend: &Backend<MemoryStore>,
    output: &Output,
    user_id: &str,
) -> Result<()> {
    let dashboard = backend.dashboard(user_id).await;
    if output.emit_json(&dashboard)? {
        return Ok(());
    }

    print_dashboard(&dashboard, user_id);
    Ok(())
}

/// Handle the 'signup' command
async fn handle_signup(
    backend: &Backend<MemoryStore>,
    output: &Output,
    request: SignupRequest,
) -> Result<()> {
    let user = backend.signup(request).await.context("Signup failed")?;
    if output.emit_json(&user)? {
        return Ok(());
    }

    println!("{} Created account {}", "✓".green(), user.id.bold());
    print_user(&user);
    Ok(())
}

/// Handle the 'login' command
async fn handle_login(
    backend: &Backend<MemoryStore>,
    output: &Output,
    email: &str,
    password: &str,
) -> Result<()> {
    let user = backend.login(email, password).await.context("Login failed")?;
    if output.emit_json(&user)? {
        return Ok(());
    }

    println!("{} Welcome back, {}", "✓".green(), user.name.bold());
    print_user(&user);
    Ok(())
}

/// Handle the 'watchlist' subcommands
async fn handle_watchlist(
    backend: &Backend<MemoryStore>,
    output: &Output,
    action: WatchlistAction,
) -> Result<()> {
    match action {
        WatchlistAction::List { user_id } => {
            let movies = backend
                .watchlist(&user_id)
                .await
                .context("Failed to load watchlist")?;
            if output.emit_json(&movies)? {
                return Ok(());
            }

            println!("{}", format!("Watchlist for {}:", user_id).bold().blue());
            if movies.is_empty() {
                println!("  (empty)");
            }
            print_movie_list(&movies);
        }
        WatchlistAction::Toggle { user_id, movie_id } => {
            let watchlist = backend
                .toggle_watchlist(&user_id, &movie_id)
                .await
                .context("Failed to update watchlist")?;
            if output.emit_json(&watchlist)? {
                return Ok(());
            }

            let verb = if watchlist.contains(&movie_id) { "Added" } else { "Removed" };
            println!(
                "{} {} {} ({} on watchlist)",
                "✓".green(),
                verb,
                movie_id.bold(),
                watchlist.len()
            );
        }
    }
    Ok(())
}

/// Handle the 'review' subcommands
async fn handle_review(
    backend: &Backend<MemoryStore>,
    output: &Output,
    action: ReviewAction,
) -> Result<()> {
    match action {
        ReviewAction::Add {
            user_id,
            movie_id,
            rating,
            comment,
        } => {
            let review = backend
                .add_review(&user_id, &movie_id, rating, &comment)
                .await
                .context("Failed to add review")?;
            if output.emit_json(&review)? {
                return Ok(());
            }

            println!(
                "{} {} rated {} {:.1} stars",
                "✓".green(),
                review.user_name.bold(),
                review.movie_id,
                review.rating
            );
        }
        ReviewAction::List { movie_id } => {
            let reviews = backend
                .reviews(&movie_id)
                .await
                .context("Failed to load reviews")?;
            if output.emit_json(&reviews)? {
                return Ok(());
            }

            println!("{}", format!("Reviews of {}:", movie_id).bold().blue());
            if reviews.is_empty() {
                println!("  (none yet)");
            }
            for review in &reviews {
                println!(
                    "{}{} {:.1} ({})",
                    "• ".cyan(),
                    review.user_name.bold(),
                    review.rating,
                    review.created_at.format("%Y-%m-%d")
                );
                if !review.comment.is_empty() {
                    println!("    {}", review.comment);
                }
            }
        }
    }
    Ok(())
}

/// Handle the 'add-movie' command
async fn handle_add_movie(
    backend: &Backend<MemoryStore>,
    output: &Output,
    actor_id: &str,
    draft: MovieDraft,
) -> Result<()> {
    let movie = backend
        .add_movie(actor_id, draft)
        .await
        .context("Failed to add movie")?;
    if output.emit_json(&movie)? {
        return Ok(());
    }

    println!(
        "{} Added {} ({}) as {}",
        "✓".green(),
        movie.title.bold(),
        movie.year,
        movie.id
    );
    Ok(())
}

/// Handle the 'stats' command
async fn handle_stats(backend: &Backend<MemoryStore>, output: &Output) -> Result<()> {
    let stats = backend.admin_stats().await;
    if output.emit_json(&stats)? {
        return Ok(());
    }

    print_stats(&stats);
    Ok(())
}

fn genre_list(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(Genre::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_movie_list(movies: &[Movie]) {
    for movie in movies {
        println!(
            "{:>10}  {} ({}) [{}] {:.1}",
            movie.id.dimmed(),
            movie.title,
            movie.year,
            genre_list(&movie.genres),
            movie.rating
        );
    }
}

fn print_user(user: &User) {
    let mut genres: Vec<Genre> = user.preferred_genres.iter().copied().collect();
    genres.sort();

    println!("{}Name: {}", "• ".green(), user.name);
    println!("{}Email: {}", "• ".green(), user.email);
    println!("{}Role: {:?}", "• ".green(), user.role);
    println!("{}Preferred genres: {}", "• ".cyan(), genre_list(&genres));
    println!("{}Watchlist: {} titles", "• ".cyan(), user.watchlist.len());
}

fn print_recommendation(recommendation: &Recommendation, user_id: &str, limit: Option<usize>) {
    match recommendation {
        Recommendation::Personalized(_) => {
            println!("{}", format!("Recommended for {}:", user_id).bold().blue());
        }
        Recommendation::Fallback(_) => {
            println!(
                "{}",
                format!("No user {}; showing the first catalog titles:", user_id)
                    .bold()
                    .yellow()
            );
        }
    }

    let movies = recommendation.movies();
    let shown = limit.unwrap_or(movies.len()).min(movies.len());
    for (rank, movie) in movies[..shown].iter().enumerate() {
        println!(
            "{}. {} ({}) [{}] - Rating: {:.1}",
            (rank + 1).to_string().green(),
            movie.title,
            movie.year,
            genre_list(&movie.genres),
            movie.rating
        );
    }
}

fn print_dashboard(dashboard: &Dashboard, user_id: &str) {
    print_recommendation(&dashboard.recommended, user_id, Some(5));

    println!();
    println!("{}", "Trending now:".bold().blue());
    print_movie_list(&dashboard.trending);

    for shelf in &dashboard.shelves {
        println!();
        println!("{}", shelf.genre.as_str().bold().blue());
        print_movie_list(&shelf.movies);
    }
}

fn print_stats(stats: &AdminStats) {
    println!("{}", "CineSense stats:".bold().blue());
    println!("{}Movies: {}", "• ".green(), stats.total_movies);
    println!("{}Users: {}", "• ".green(), stats.total_users);
    println!("{}Reviews: {}", "• ".green(), stats.total_reviews);
    println!("{}Average rating: {:.2}", "• ".cyan(), stats.avg_rating);
}
