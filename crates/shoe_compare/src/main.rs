use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use shoe_compare::{AppError, AppResult, report, session::Session};
use strava_client::StravaClient;
use strava_client::config::Config;
use strava_client::http_client::ReqwestStravaClient;
use strava_client::token_store::EnvFile;

#[derive(Parser)]
#[command(
    name = "shoe-compare",
    version,
    about = "Compare running shoes by pace and estimated GAP over the last 12 months"
)]
struct Cli {
    /// File holding STRAVA_CLIENT_ID / STRAVA_CLIENT_SECRET and saved tokens
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Authorization code or redirect URL, skips the interactive prompt
    #[arg(long)]
    code: Option<String>,

    /// Print the reports as JSON instead of a table
    #[arg(long)]
    json: bool,
}

const CREDENTIALS_HELP: &str = "\
To get your credentials:
1. Go to https://www.strava.com/settings/api
2. Create an application (or use an existing one)
3. Set 'Authorization Callback Domain' to 'localhost'
4. Note your Client ID and Client Secret

Create a .env file with:
STRAVA_CLIENT_ID=your_client_id
STRAVA_CLIENT_SECRET=your_client_secret";

fn prompt_for_code(url: &str) -> AppResult<String> {
    println!("Please visit this URL in your browser to authorize the application:");
    println!("\n{url}\n");
    println!("After authorizing, you will be redirected to a URL like:");
    println!("http://localhost/?state=&code=AUTHORIZATION_CODE&scope=read,activity:read_all");
    println!("\nCopy the entire URL or just the AUTHORIZATION_CODE part.");
    print!("\nPaste the redirect URL or authorization code: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configure logging from env var `STRAVA_SHOES_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("STRAVA_SHOES_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let combined_filter = format!("{log_env},reqwest=warn,hyper=warn");
    let env_filter = tracing_subscriber::EnvFilter::try_new(combined_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,reqwest=warn,hyper=warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::debug!("shoe-compare: log filter: {}", log_env);

    let cli = Cli::parse();

    println!("Strava Shoe Comparison Tool");
    println!("{}", "=".repeat(60));

    let config = match Config::from_env_file(&cli.env_file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("No Strava API credentials found ({e}).\n\n{CREDENTIALS_HELP}");
            return Err(AppError::MissingCredentials(e.to_string()).into());
        }
    };

    let session = Session::new(&config, EnvFile::new(&cli.env_file));
    let now = chrono::Utc::now();
    let access_token = match cli.code {
        Some(code) => session.access_token(now.timestamp(), |_| Ok(code)).await?,
        None => session.access_token(now.timestamp(), prompt_for_code).await?,
    };

    let client = ReqwestStravaClient::new(&config.api_base_url, access_token);
    let athlete = client.get_athlete().await?;
    println!("Authenticated as: {}", athlete.display_name());

    let since = shoe_compare::window_start(now);
    println!(
        "Fetching activities from {} to {}...",
        since.date_naive(),
        now.date_naive()
    );
    let activities = client.get_all_activities_since(since).await?;
    println!("Retrieved {} total activities.", activities.len());

    let running = shoe_compare::classify::filter_running_activities(&activities);
    print!("{}", report::progress(running.len()));
    if running.is_empty() {
        return Ok(());
    }

    let reports = shoe_compare::compare_shoes(&client, &running).await;

    if cli.json {
        println!("{}", report::render_json(&reports)?);
    } else {
        print!("{}", report::render(&reports));
    }
    Ok(())
}
