use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::Confirm;
use weather_widget_core::{
    Breakpoints, Config, WeatherSource, WeatherWidget, WidgetState, WidgetView, render_json,
    render_text, scheduler::fetch_once, source_from_config,
};

/// Assumed terminal width when `--width` is not given.
const DEFAULT_WIDTH: u16 = 120;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-widget",
    version,
    about = "Jinrishici weather pill for terminals and status bars"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pill line (plus tooltip lines when hovering).
    Text,
    /// One JSON object per update, for waybar-style custom modules.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch once and print the widget.
    Show {
        /// Viewport width in columns.
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: u16,

        /// Render as if the pointer is over the pill.
        #[arg(long)]
        hover: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Keep refreshing and print the widget on every change until Ctrl-C.
    Watch {
        /// Viewport width in columns.
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: u16,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Edit the config file.
    Configure {
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        #[arg(long)]
        disable: bool,

        /// Seconds between refreshes.
        #[arg(long)]
        interval: Option<u64>,

        /// Override the `/info` endpoint.
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Print the config file location.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { width, hover, format } => show(width, hover, format).await,
            Command::Watch { width, format } => watch(width, format).await,
            Command::Configure { enable, disable, interval, endpoint } => {
                configure(enable, disable, interval, endpoint)
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn print_view(
    view: &WidgetView,
    display: &Breakpoints,
    width: u16,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{}", render_text(view, display, width)),
        OutputFormat::Json => {
            println!("{}", render_json(view).context("Failed to serialize widget output")?)
        }
    }
    Ok(())
}

async fn show(width: u16, hover: bool, format: OutputFormat) -> anyhow::Result<()> {
    let config = Config::load()?;

    if !config.is_enabled() {
        tracing::info!("widget disabled, nothing to show");
        return print_view(&WidgetView::Hidden, &config.display, width, format);
    }

    let source: Arc<dyn WeatherSource> = Arc::from(source_from_config(&config.source)?);
    let (tx, rx) = tokio::sync::watch::channel(WidgetState::default());
    fetch_once(source, Arc::new(tx), None).await;

    let mut state = rx.borrow().clone();
    state.set_hovering(hover);

    print_view(&state.view(), &config.display, width, format)
}

async fn watch(width: u16, format: OutputFormat) -> anyhow::Result<()> {
    let config = Config::load()?;

    if !config.is_enabled() {
        print_view(&WidgetView::Hidden, &config.display, width, format)?;
        return Ok(());
    }

    let source: Arc<dyn WeatherSource> = Arc::from(source_from_config(&config.source)?);
    let mut widget = WeatherWidget::new(source, config.source.clone());
    let mut updates = widget.subscribe();

    widget.configure(config.widget);
    print_view(&widget.view(), &config.display, width, format)?;

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                print_view(&widget.view(), &config.display, width, format)?;
            }
        }
    }

    widget.shutdown();
    Ok(())
}

fn configure(
    enable: bool,
    disable: bool,
    interval: Option<u64>,
    endpoint: Option<String>,
) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let enabled = match (enable, disable) {
        (true, _) => true,
        (_, true) => false,
        _ => Confirm::new("Show the weather widget?")
            .with_default(config.is_enabled())
            .prompt()
            .context("Failed to read answer")?,
    };
    config.set_enabled(enabled);

    if let Some(secs) = interval {
        config.source.refresh_interval_secs = secs;
    }
    if let Some(endpoint) = endpoint {
        config.source.endpoint = endpoint;
    }

    if let Err(err) = config.validate() {
        bail!("Refusing to save invalid configuration: {err:#}");
    }

    config.save()?;
    println!(
        "Saved {} (widget {}).",
        Config::config_file_path()?.display(),
        if enabled { "enabled" } else { "disabled" }
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_defaults() {
        let cli = Cli::try_parse_from(["weather-widget", "show"]).expect("parses");

        match cli.command {
            Command::Show { width, hover, format } => {
                assert_eq!(width, DEFAULT_WIDTH);
                assert!(!hover);
                assert_eq!(format, OutputFormat::Text);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn watch_accepts_json_format() {
        let args = ["weather-widget", "watch", "--format", "json", "--width", "60"];
        let cli = Cli::try_parse_from(args).expect("parses");

        assert!(matches!(cli.command, Command::Watch { width: 60, format: OutputFormat::Json }));
    }

    #[test]
    fn enable_and_disable_conflict() {
        let err = Cli::try_parse_from(["weather-widget", "configure", "--enable", "--disable"]);
        assert!(err.is_err());
    }
}
