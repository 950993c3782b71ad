use anyhow::Result;
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Select};

use routesuit_core::{
    AppConfig, CommuteRecommendations, ProviderId, analyze_commutes, notification_summary,
    provider::{default_provider_from_config, provider_for},
    recommendation_message,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "routesuit", version, about = "Commute weather recommendations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the forecast and show both commute cards.
    Show {
        /// Forecast provider, "smhi" or "metno"; defaults to the configured one.
        #[arg(long)]
        provider: Option<String>,
    },

    /// Print the daily notification, honoring the configured weekday filter.
    Notify,

    /// Interactively edit the configuration.
    Configure {
        /// Restore all settings to their defaults before editing.
        #[arg(long)]
        reset: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Show { provider } => show(provider).await,
            Command::Notify => notify().await,
            Command::Configure { reset } => configure(reset),
        }
    }
}

async fn fetch_recommendations(
    config: &AppConfig,
    provider: Option<String>,
) -> Result<CommuteRecommendations> {
    let provider = match provider {
        Some(name) => provider_for(ProviderId::try_from(name.as_str())?),
        None => default_provider_from_config(config)?,
    };

    let forecast = provider.fetch_forecast(config.latitude, config.longitude).await?;
    Ok(analyze_commutes(&forecast, config, Utc::now()))
}

async fn show(provider: Option<String>) -> Result<()> {
    let config = AppConfig::load()?;
    let recommendations = fetch_recommendations(&config, provider).await?;

    print_card(recommendations.morning.as_ref(), "Morning commute", &config);
    println!();
    print_card(recommendations.evening.as_ref(), "Evening commute", &config);

    Ok(())
}

fn print_card(
    recommendation: Option<&routesuit_core::Recommendation>,
    fallback_label: &str,
    config: &AppConfig,
) {
    match recommendation {
        Some(rec) => {
            println!("{} - {}", rec.commute_label, rec.day_label);
            println!("  {:.1}°C", rec.temperature_c);
            for line in recommendation_message(rec, config).lines() {
                println!("  {line}");
            }
        }
        None => {
            println!("{fallback_label}");
            println!("  No forecast data for this window.");
        }
    }
}

async fn notify() -> Result<()> {
    let config = AppConfig::load()?;

    let today = Utc::now().with_timezone(&config.timezone);
    if !config.is_notification_day(today.weekday()) {
        println!("No notification scheduled for {}.", today.format("%A"));
        return Ok(());
    }

    let recommendations = fetch_recommendations(&config, None).await?;
    match notification_summary(&recommendations) {
        Some(text) => {
            println!("{}", text.title);
            println!("{}", text.body);
        }
        None => println!("No forecast data for either commute window."),
    }

    Ok(())
}

fn configure(reset: bool) -> Result<()> {
    let mut config = if reset { AppConfig::default() } else { AppConfig::load()? };

    let provider_names: Vec<&str> = ProviderId::all().iter().map(ProviderId::as_str).collect();
    let chosen = Select::new("Forecast provider:", provider_names).prompt()?;
    config.default_provider = Some(chosen.to_string());

    config.latitude = CustomType::<f64>::new("Latitude:")
        .with_default(config.latitude)
        .prompt()?;
    config.longitude = CustomType::<f64>::new("Longitude:")
        .with_default(config.longitude)
        .prompt()?;

    config.morning_start_hour = CustomType::<u32>::new("Morning commute start hour (0-23):")
        .with_default(config.morning_start_hour)
        .prompt()?;
    config.morning_end_hour = CustomType::<u32>::new("Morning commute end hour (0-23):")
        .with_default(config.morning_end_hour)
        .prompt()?;
    config.evening_start_hour = CustomType::<u32>::new("Evening commute start hour (0-23):")
        .with_default(config.evening_start_hour)
        .prompt()?;
    config.evening_end_hour = CustomType::<u32>::new("Evening commute end hour (0-23):")
        .with_default(config.evening_end_hour)
        .prompt()?;

    config.precipitation_probability_threshold =
        CustomType::<f64>::new("Rain probability threshold (%):")
            .with_default(config.precipitation_probability_threshold)
            .prompt()?;
    config.precipitation_amount_threshold =
        CustomType::<f64>::new("Rain amount threshold (mm):")
            .with_default(config.precipitation_amount_threshold)
            .prompt()?;

    if Confirm::new("Edit notification schedule?").with_default(false).prompt()? {
        config.notification_hour = CustomType::<u32>::new("Notification hour (0-23):")
            .with_default(config.notification_hour)
            .prompt()?;
        config.notification_minute = CustomType::<u32>::new("Notification minute (0-59):")
            .with_default(config.notification_minute)
            .prompt()?;
    }

    config.validate()?;
    config.save()?;

    let path = AppConfig::config_file_path()?;
    println!("Saved configuration to {}.", path.display());
    println!("Temperature breakpoints and clothing messages can be edited there directly.");

    Ok(())
}
