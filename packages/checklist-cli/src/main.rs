//! Checklist CLI - submit cleaning checks and read inspection results
//!
//! This binary talks to the inspection API and can:
//! - Sign in and keep the session on disk
//! - List zones and previously submitted checks
//! - Submit a photographed zone for inspection
//! - Follow a check until the analysis is ready

mod watch;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use checklist_core::api::config::{generate_example_config, get_config_file_path_string};
use checklist_core::auth::get_storage_info;
use checklist_core::{
    AnalysisResult, ApiClient, ApiEndpointConfig, ApiError, Check, Photo, StatsPeriod, api, auth,
    models::sort_checks_newest_first,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "checklist")]
#[command(author = "Checklist Team")]
#[command(version)]
#[command(about = "Submit cleaning checks and read inspection results")]
#[command(long_about = "
Checklist CLI submits photographed cleaning checks to the inspection
service and shows the analysis once the server has scored them.

Quick start:
  1. Sign in:        checklist login --email you@example.com --password ...
  2. Pick a zone:    checklist zones
  3. Submit a check: checklist submit --zone 3 --photo lobby.jpg --watch
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Override the API base URL for this invocation
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PeriodArg {
    Day,
    Week,
    Month,
    All,
}

impl From<PeriodArg> for StatsPeriod {
    fn from(period: PeriodArg) -> Self {
        match period {
            PeriodArg::Day => StatsPeriod::Day,
            PeriodArg::Week => StatsPeriod::Week,
            PeriodArg::Month => StatsPeriod::Month,
            PeriodArg::All => StatsPeriod::All,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show who is signed in
    Status,

    /// List inspection zones
    Zones,

    /// List submitted checks, newest first
    Checks,

    /// Submit a photo of a zone for inspection
    Submit {
        /// Zone id (see `checklist zones`)
        #[arg(short, long)]
        zone: i64,

        /// JPEG photo of the cleaned zone
        #[arg(short, long)]
        photo: PathBuf,

        /// Room number, if the zone spans several rooms
        #[arg(short, long)]
        room: Option<String>,

        /// Wait for the analysis after submitting
        #[arg(short, long)]
        watch: bool,
    },

    /// Show the analysis of a check
    Analysis {
        check_id: i64,
    },

    /// Show dashboard statistics
    Stats {
        #[arg(long, value_enum, default_value = "week")]
        period: PeriodArg,

        /// Show personal statistics for this user id instead of your own
        #[arg(long)]
        user: Option<i64>,

        /// Request system-wide statistics (admins only)
        #[arg(long)]
        admin: bool,
    },

    /// Poll a check until the server has approved or rejected it
    Watch {
        check_id: i64,

        /// Poll interval in seconds
        #[arg(short, long, default_value = "5")]
        interval: u64,
    },

    /// Show configuration paths and settings
    Config,
}

#[derive(Serialize)]
struct ConfigReport {
    config_file: String,
    api_url: String,
    api_source: String,
    timeout_secs: u64,
    session_storage: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("checklist={},checklist_core={}", log_level, log_level).into()
            }),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let client = build_client(&cli)?;

    match &cli.command {
        Commands::Login { email, password } => cmd_login(&cli, &client, email, password).await,
        Commands::Logout => cmd_logout(&cli, &client).await,
        Commands::Status => cmd_status(&cli, &client),
        Commands::Zones => cmd_zones(&cli, &client).await,
        Commands::Checks => cmd_checks(&cli, &client).await,
        Commands::Submit {
            zone,
            photo,
            room,
            watch,
        } => cmd_submit(&cli, &client, *zone, photo, room.as_deref(), *watch).await,
        Commands::Analysis { check_id } => cmd_analysis(&cli, &client, *check_id).await,
        Commands::Stats {
            period,
            user,
            admin,
        } => cmd_stats(&cli, &client, (*period).into(), *user, *admin).await,
        Commands::Watch { check_id, interval } => {
            cmd_watch(&cli, &client, *check_id, *interval).await
        }
        Commands::Config => cmd_config(&cli, &client),
    }
}

fn build_client(cli: &Cli) -> Result<ApiClient> {
    let config = match &cli.api_url {
        Some(url) => {
            let resolved = api::load_api_config();
            ApiEndpointConfig::new(url.as_str()).with_timeout(resolved.timeout)
        }
        None => api::load_api_config(),
    };
    tracing::debug!("API endpoint: {} (from {})", config.base_url, config.source);

    let store = auth::default_token_store().context("Failed to open session storage")?;
    ApiClient::new(config, store).context("Failed to create API client")
}

/// Turn a 401 into a hint instead of a bare error.
fn explain(err: ApiError) -> anyhow::Error {
    match err {
        ApiError::Unauthorized => {
            anyhow!("Not signed in or session expired. Run 'checklist login' first.")
        }
        other => other.into(),
    }
}

async fn cmd_login(cli: &Cli, client: &ApiClient, email: &str, password: &str) -> Result<()> {
    let result = match client.login(email, password).await {
        Ok(result) => result,
        Err(ApiError::Unauthorized) => bail!("Invalid email or password"),
        Err(e) => return Err(e.into()),
    };

    match cli.format {
        OutputFormat::Text => {
            println!("Signed in as {} <{}>", result.user.full_name(), result.user.email);
            if result.user.is_admin {
                println!("Role: administrator");
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "status": "signed_in",
                    "user": result.user,
                })
            );
        }
    }

    Ok(())
}

async fn cmd_logout(cli: &Cli, client: &ApiClient) -> Result<()> {
    let was_signed_in = client.is_logged_in();
    let remote = client.logout().await?;

    match cli.format {
        OutputFormat::Text => {
            if !was_signed_in {
                println!("Not signed in.");
            } else if remote {
                println!("Signed out.");
            } else {
                println!("Signed out locally (server did not confirm).");
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "status": if was_signed_in { "signed_out" } else { "not_signed_in" },
                    "remote_confirmed": remote,
                })
            );
        }
    }

    Ok(())
}

fn cmd_status(cli: &Cli, client: &ApiClient) -> Result<()> {
    let signed_in = client.is_logged_in();
    let user = client.current_user();

    match cli.format {
        OutputFormat::Text => {
            if signed_in {
                println!("Status: Signed in");
                match &user {
                    Some(user) => {
                        println!("User:   {} <{}>", user.full_name(), user.email);
                        println!("Admin:  {}", if user.is_admin { "yes" } else { "no" });
                    }
                    None => println!("User:   -"),
                }
                println!();
                println!("API:     {}", client.config().base_url);
                println!("Storage: {}", get_storage_info());
            } else {
                println!("Status: Not signed in");
                println!();
                println!("Run 'checklist login' to authenticate.");
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "signed_in": signed_in,
                    "user": user,
                    "api_url": client.config().base_url,
                    "storage_info": get_storage_info(),
                })
            );
        }
    }

    Ok(())
}

async fn cmd_zones(cli: &Cli, client: &ApiClient) -> Result<()> {
    let zones = client.list_zones().await.map_err(explain)?;

    match cli.format {
        OutputFormat::Text => {
            if zones.is_empty() {
                println!("No zones configured.");
                return Ok(());
            }
            for zone in &zones {
                println!("  {:>4}  {}", zone.id, zone.name);
                if !zone.description.is_empty() {
                    println!("        {}", zone.description);
                }
                for point in zone.checklist_points.iter().flatten() {
                    println!("        - {}", point);
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&zones)?),
    }

    Ok(())
}

async fn cmd_checks(cli: &Cli, client: &ApiClient) -> Result<()> {
    let mut checks = client.list_checks().await.map_err(explain)?;
    sort_checks_newest_first(&mut checks);

    match cli.format {
        OutputFormat::Text => {
            if checks.is_empty() {
                println!("No checks submitted yet.");
                return Ok(());
            }
            for check in &checks {
                print_check_line(check);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&checks)?),
    }

    Ok(())
}

fn print_check_line(check: &Check) {
    let zone = check
        .zone
        .as_ref()
        .map(|z| z.name.clone())
        .unwrap_or_else(|| format!("zone {}", check.zone_id));
    let room = check.room_number.as_deref().unwrap_or("-");
    let score = check
        .score
        .map(|s| format!("{:.0}", s))
        .unwrap_or_else(|| "-".to_string());

    println!(
        "  #{:<6} {:12} {:>5}  {:20} room {:6} {}",
        check.id,
        check.status.label(),
        score,
        zone,
        room,
        check.submitted_at
    );
}

fn read_photo(path: &Path) -> Result<Photo> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read photo {:?}", path))?;
    if data.is_empty() {
        bail!("Photo {:?} is empty", path);
    }
    Ok(Photo::jpeg(data))
}

async fn cmd_submit(
    cli: &Cli,
    client: &ApiClient,
    zone_id: i64,
    photo: &Path,
    room: Option<&str>,
    watch: bool,
) -> Result<()> {
    let photo = read_photo(photo)?;

    match cli.format {
        OutputFormat::Text => println!("Uploading {} bytes...", photo.len()),
        OutputFormat::Json => {}
    }

    let check = client.create_check(zone_id, room, Some(photo)).await.map_err(explain)?;

    match cli.format {
        OutputFormat::Text => {
            println!("Check #{} submitted ({})", check.id, check.status);
            if !watch {
                println!();
                println!("Follow it with: checklist watch {}", check.id);
            }
        }
        OutputFormat::Json => {
            if !watch {
                println!("{}", serde_json::json!({ "check": check }));
            }
        }
    }

    if watch {
        return cmd_watch(cli, client, check.id, watch::DEFAULT_INTERVAL_SECS).await;
    }

    Ok(())
}

async fn cmd_analysis(cli: &Cli, client: &ApiClient, check_id: i64) -> Result<()> {
    let analysis = client.get_analysis(check_id).await.map_err(explain)?;
    print_analysis(cli, &analysis)
}

fn print_analysis(cli: &Cli, analysis: &AnalysisResult) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            println!("Analysis for check #{}", analysis.check_id);
            println!();
            println!(
                "Verdict:    {}",
                if analysis.approved() { "approved" } else { "not approved" }
            );
            println!("Confidence: {}", analysis.confidence_percentage());
            println!("Model:      {}", analysis.model_version);

            if let Some(feedback) = analysis.feedback.as_deref().filter(|f| !f.is_empty()) {
                println!();
                println!("{}", feedback);
            }

            let issues = analysis.issues.as_deref().unwrap_or_default();
            if !issues.is_empty() {
                println!();
                println!("Issues:");
                for issue in issues {
                    println!("  - {}", issue);
                }
            }

            let objects = analysis.detected_objects.as_deref().unwrap_or_default();
            if !objects.is_empty() {
                println!();
                println!("Detected objects:");
                for object in objects {
                    println!(
                        "  {:20} x{:<3} {:.0}%",
                        object.name,
                        object.count,
                        object.confidence * 100.0
                    );
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(analysis)?),
    }

    Ok(())
}

async fn cmd_stats(
    cli: &Cli,
    client: &ApiClient,
    period: StatsPeriod,
    user: Option<i64>,
    admin: bool,
) -> Result<()> {
    // Personal stats default to the signed-in user
    let user_id = user.or_else(|| client.current_user().map(|u| u.id));

    let stats = client.fetch_dashboard_stats(period, user_id, admin).await.map_err(explain)?;

    match cli.format {
        OutputFormat::Text => {
            let data = &stats.stats;
            let scope = if admin { "All users" } else { "Personal" };
            println!("{} statistics ({})", scope, period);
            println!("==========================");
            println!();
            println!("Checks:        {}", data.overview.total_checks);
            println!("  approved:    {}", data.overview.approved);
            println!("  rejected:    {}", data.overview.rejected);
            println!("  pending:     {}", data.overview.pending);
            println!("Approval rate: {:.1}%", data.overview.approval_rate);
            println!("Average score: {:.1}", data.quality.average_score);

            if let Some(users) = &data.users {
                println!();
                println!(
                    "Users: {} total, {} active, {:.1} checks each",
                    users.total_users, users.active_users, users.checks_per_user
                );
            }

            if !data.leaderboard.is_empty() {
                println!();
                println!("Leaderboard:");
                for (rank, entry) in data.leaderboard.iter().enumerate() {
                    println!(
                        "  {:>2}. {:24} {:>4} checks  {:>5.1}",
                        rank + 1,
                        entry.full_name,
                        entry.total_checks,
                        entry.quality_score
                    );
                }
            }

            if !data.recent_checks.is_empty() {
                println!();
                println!("Recent checks:");
                for recent in &data.recent_checks {
                    println!(
                        "  #{:<6} {:12} {:20} {}",
                        recent.id, recent.status, recent.zone_name, recent.submitted_at
                    );
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&stats)?),
    }

    Ok(())
}

async fn cmd_watch(cli: &Cli, client: &ApiClient, check_id: i64, interval: u64) -> Result<()> {
    let Some(check) = watch::watch_check(client, check_id, interval).await? else {
        // Interrupted before the check settled
        return Ok(());
    };

    match cli.format {
        OutputFormat::Text => println!("Check #{} {}", check.id, check.status),
        OutputFormat::Json => {}
    }

    match client.get_analysis(check_id).await {
        Ok(analysis) => print_analysis(cli, &analysis),
        Err(e) => {
            tracing::warn!("Analysis not available yet: {}", e);
            if let OutputFormat::Json = cli.format {
                println!("{}", serde_json::json!({ "check": check }));
            }
            Ok(())
        }
    }
}

fn cmd_config(cli: &Cli, client: &ApiClient) -> Result<()> {
    let config = client.config();
    let report = ConfigReport {
        config_file: get_config_file_path_string(),
        api_url: config.base_url.clone(),
        api_source: config.source.to_string(),
        timeout_secs: config.timeout.as_secs(),
        session_storage: get_storage_info(),
    };

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration");
            println!("=============");
            println!();
            println!("Config file:     {}", report.config_file);
            println!("API endpoint:    {} (from {})", report.api_url, report.api_source);
            println!("Request timeout: {}s", report.timeout_secs);
            println!("Session store:   {}", report.session_storage);
            println!();
            println!("Environment variables:");
            println!("  CHECKLIST_API_URL          - Override API endpoint");
            println!("  CHECKLIST_API_TIMEOUT_SECS - Override request timeout");
            println!();
            println!("Example config.toml:");
            println!();
            println!("{}", generate_example_config());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
    }

    Ok(())
}
