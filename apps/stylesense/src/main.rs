mod commands;
mod config;
mod errors;
mod llm_client;
mod models;
mod render;
mod session;
mod state;
mod store;
mod stylist;

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::commands::PreferenceChanges;
use crate::config::Config;
use crate::errors::AppError;
use crate::session::NewAccount;
use crate::state::AppState;
use crate::stylist::recommendation::{
    RecommendationRequest, DEFAULT_LOCATION, DEFAULT_OCCASION, DEFAULT_WEATHER,
};

#[derive(Debug, Parser)]
#[command(name = "stylesense", version, about = "AI personal stylist in your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a profile and sign in.
    Register(RegisterArgs),
    /// Sign in to an existing profile.
    Login(LoginArgs),
    /// Sign out of the current profile.
    Logout,
    /// Show the signed-in profile.
    Whoami,
    /// Show or change styling preferences.
    Preferences(PreferencesArgs),
    /// Analyze an outfit photo into an upgrade blueprint.
    Analyze(AnalyzeArgs),
    /// Get an outfit recommendation for an occasion.
    Recommend(RecommendArgs),
    /// List saved analyses and recommendations, newest first.
    History,
    /// Chat with the stylist.
    Chat,
}

#[derive(Debug, Parser)]
struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    skin_tone: Option<String>,
}

#[derive(Debug, Parser)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
}

#[derive(Debug, Parser)]
struct PreferencesArgs {
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    age: Option<String>,
    /// Comma-separated favourite colours.
    #[arg(long, value_delimiter = ',')]
    colors: Option<Vec<String>>,
    #[arg(long)]
    budget: Option<String>,
    #[arg(long)]
    skin_tone: Option<String>,
}

#[derive(Debug, Parser)]
struct AnalyzeArgs {
    /// Image file, or a `data:image/...;base64,` URL.
    image: String,
}

#[derive(Debug, Parser)]
struct RecommendArgs {
    #[arg(long, default_value = DEFAULT_OCCASION)]
    occasion: String,
    #[arg(long, default_value = DEFAULT_WEATHER)]
    weather: String,
    #[arg(long, default_value = DEFAULT_LOCATION)]
    location: String,
    #[arg(long, default_value = "")]
    vibe: String,
    /// Optional reference photo.
    #[arg(long)]
    image: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => return report(AppError::Internal(e)),
    };

    // Logs go to stderr so cards on stdout stay clean.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting StyleSense v{}", env!("CARGO_PKG_VERSION"));

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(e),
    }
}

async fn run(command: Command, config: Config) -> Result<(), AppError> {
    let state = AppState::open(config)?;

    let output = match command {
        Command::Register(args) => commands::register(
            &state,
            NewAccount {
                name: args.name,
                email: args.email,
                password: args.password,
                gender: args.gender,
                skin_tone: args.skin_tone,
            },
        )?,
        Command::Login(args) => commands::login(&state, &args.email, &args.password)?,
        Command::Logout => commands::logout(&state)?,
        Command::Whoami => commands::whoami(&state)?,
        Command::Preferences(args) => commands::preferences(
            &state,
            PreferenceChanges {
                gender: args.gender,
                age: args.age,
                colors: args.colors,
                budget: args.budget,
                skin_tone: args.skin_tone,
            },
        )?,
        Command::History => commands::history(&state)?,
        Command::Analyze(args) => {
            let session = session::require(&state.store)?;
            let stylist = state.stylist()?;
            commands::analyze(&state, &stylist, &session, &args.image).await?
        }
        Command::Recommend(args) => {
            let session = session::require(&state.store)?;
            let stylist = state.stylist()?;
            let request = RecommendationRequest {
                occasion: args.occasion,
                weather: args.weather,
                location: args.location,
                style_vibe: args.vibe,
            };
            commands::recommend(&state, &stylist, &session, request, args.image.as_deref()).await?
        }
        Command::Chat => {
            let session = session::require(&state.store)?;
            let stylist = state.stylist()?;
            let input = BufReader::new(tokio::io::stdin());
            commands::chat(&stylist, &session, input, tokio::io::stdout()).await?;
            String::new()
        }
    };

    print!("{output}");
    std::io::stdout().flush().map_err(anyhow::Error::from)?;
    Ok(())
}

fn report(error: AppError) -> ExitCode {
    eprint!("{}", render::error_card(&error.report()));
    ExitCode::FAILURE
}
