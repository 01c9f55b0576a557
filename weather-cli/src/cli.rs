use std::{
    io::{self, BufRead, BufReader},
    sync::Arc,
    thread,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use weather_core::{
    Config, Controller, FeedbackMessage, OpenWeatherGateway, RefreshEvent, WeatherGateway,
    config::API_KEY_ENV,
};

use crate::output::print_view;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather lookup widget")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// OpenWeather API key; overrides the config file.
    #[arg(long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Provider endpoint root.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Forecast refresh period in seconds.
    #[arg(long, global = true)]
    pub interval_secs: Option<u64>,

    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Save an API key to the config file.
    Configure,

    /// Look up a location once and print its forecast.
    Show {
        /// City or location name.
        location: String,
    },

    /// Interactive session: type a location and press Enter; the forecast refreshes
    /// on a timer until EOF or Ctrl-C.
    Watch {
        /// Location to look up before reading input.
        #[arg(long)]
        location: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match &self.command {
            Command::Configure => configure(Config::load()?),
            Command::Show { location } => {
                let mut controller = self.controller(&config_or_default(Config::load()));
                show(&mut controller, location).await
            }
            Command::Watch { location } => {
                let mut controller = self.controller(&config_or_default(Config::load()));
                watch(&mut controller, location.as_deref()).await
            }
        }
    }

    fn controller(&self, config: &Config) -> Controller {
        let api_key = config.effective_api_key(self.api_key.as_deref());
        let base_url = config.effective_base_url(self.base_url.as_deref());
        let interval = config.effective_refresh_interval(self.interval_secs);

        tracing::debug!(%base_url, ?interval, "starting session");

        let gateway: Arc<dyn WeatherGateway> =
            Arc::new(OpenWeatherGateway::with_base_url(api_key, &base_url));
        Controller::with_refresh_interval(gateway, interval)
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(controller: &mut Controller, location: &str) -> anyhow::Result<()> {
    controller.on_input_change(location);
    let feedback = controller.on_submit().await;

    if feedback.is_none() {
        controller.next_update().await;
    }
    controller.shutdown();

    print_view(&controller.display())?;

    match controller.feedback() {
        FeedbackMessage::None => Ok(()),
        other => anyhow::bail!("{other}"),
    }
}

async fn watch(controller: &mut Controller, initial: Option<&str>) -> anyhow::Result<()> {
    if let Some(location) = initial {
        controller.on_input_change(location);
        controller.on_submit().await;
        print_view(&controller.display())?;
    }

    let lines = spawn_line_reader(BufReader::new(std::io::stdin()))?;
    eprintln!("Enter city or location (Ctrl-D to quit)");

    run_session(controller, lines, ctrl_c()).await
}

/// Lookups and file-backed settings still work from flags and `APIKEY`
/// when the config file is unreadable.
fn config_or_default(loaded: anyhow::Result<Config>) -> Config {
    loaded.unwrap_or_else(|err| {
        tracing::warn!(error = %format!("{err:#}"), "ignoring config file");
        Config::default()
    })
}

async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Ctrl-C handler unavailable");
        std::future::pending::<()>().await;
    }
}

/// Read lines on a plain thread so a pending read never holds up runtime shutdown.
fn spawn_line_reader<R>(reader: R) -> io::Result<mpsc::UnboundedReceiver<io::Result<String>>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();

    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in reader.lines() {
                if tx.send(line).is_err() {
                    break;
                }
            }
        })?;

    Ok(rx)
}

/// Drive the session until input ends or `shutdown` resolves.
///
/// `shutdown` also interrupts a lookup that is still waiting on the network.
async fn run_session(
    controller: &mut Controller,
    mut lines: mpsc::UnboundedReceiver<io::Result<String>>,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else {
                    break;
                };
                controller.on_input_change(line.context("Failed to read from stdin")?);

                tokio::select! {
                    _ = controller.on_submit() => {}
                    _ = &mut shutdown => break,
                }
                print_view(&controller.display())?;
            }
            event = controller.next_update() => {
                if event != RefreshEvent::Stale {
                    print_view(&controller.display())?;
                }
            }
            _ = &mut shutdown => break,
        }
    }

    controller.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::{io::Cursor, time::Duration};
    use weather_core::{
        Coordinates, ForecastSnapshot, LocationQuery, ResolvedLocation, WeatherError,
    };

    /// Lookups never complete.
    #[derive(Debug)]
    struct StalledGateway;

    #[async_trait]
    impl WeatherGateway for StalledGateway {
        async fn resolve_location(
            &self,
            _query: &LocationQuery,
        ) -> Result<ResolvedLocation, WeatherError> {
            std::future::pending().await
        }

        async fn fetch_forecast(
            &self,
            _coordinates: Coordinates,
        ) -> Result<ForecastSnapshot, WeatherError> {
            std::future::pending().await
        }
    }

    fn stalled_controller() -> Controller {
        Controller::new(Arc::new(StalledGateway))
    }

    #[tokio::test]
    async fn line_reader_forwards_lines_then_closes() {
        let mut rx = spawn_line_reader(Cursor::new("London\n  Paris \n")).unwrap();

        assert_eq!(rx.recv().await.unwrap().unwrap(), "London");
        assert_eq!(rx.recv().await.unwrap().unwrap(), "  Paris ");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn session_ends_on_shutdown_while_input_stays_open() {
        let mut ctl = stalled_controller();
        let (_tx, rx) = mpsc::unbounded_channel();

        run_session(&mut ctl, rx, async {}).await.unwrap();
        assert!(!ctl.is_refreshing());
    }

    #[tokio::test]
    async fn session_ends_at_end_of_input() {
        let mut ctl = stalled_controller();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(tx);

        run_session(&mut ctl, rx, std::future::pending()).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_interrupts_a_stalled_lookup() {
        let mut ctl = stalled_controller();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Ok("London".to_string())).unwrap();

        run_session(&mut ctl, rx, tokio::time::sleep(Duration::from_secs(30)))
            .await
            .unwrap();

        assert_eq!(ctl.query(), "London");
        assert!(ctl.location().is_none());
    }

    #[test]
    fn unreadable_config_falls_back_to_defaults() {
        let cfg = config_or_default(Err(anyhow::anyhow!("Failed to parse config file")));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn readable_config_is_kept() {
        let mut loaded = Config::default();
        loaded.set_api_key("FILE_KEY".into());

        let cfg = config_or_default(Ok(loaded.clone()));
        assert_eq!(cfg, loaded);
    }
}
