mod app;
mod cli;
mod config;
mod datasources;
mod error;
mod logic;
mod models;
mod ui;

use crate::config::Config;
use app::App;
use clap::Parser;
use cli::{Cli, Commands, LocationArgs, ScheduleArgs};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use datasources::{LocationResolver, MetNoClient};
use error::Result;
use logic::{IrrigationScheduler, WeatherEstimator};
use models::{DerivedClimate, GrowthStage, IrrigationResult, WeatherReport};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use serde::Serialize;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::screens::CalculatorScreen;

type Estimator = WeatherEstimator<MetNoClient>;

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.command.is_none());

    let result = match cli.command {
        Some(Commands::Init) => Config::setup_interactive(cli.config).map(|_| ()),
        Some(Commands::Check) => run_check(cli.config).await,
        Some(Commands::Crops) => run_crops(cli.config),
        Some(Commands::Weather { location, json }) => run_weather(cli.config, location, json).await,
        Some(Commands::Schedule(args)) => run_schedule(cli.config, args).await,
        None => run_tui(cli.config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr. The TUI only gets a subscriber when asked for one
/// (`-v` or `RUST_LOG`) so the alternate screen is not overwritten.
fn init_logging(verbose: u8, tui: bool) {
    let requested = verbose > 0 || std::env::var_os("RUST_LOG").is_some();
    if tui && !requested {
        return;
    }

    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("warn,irrisched={}", level))),
        )
        .with_writer(io::stderr)
        .init();
}

/// Subcommands work without a config file; defaults plus flags are enough
fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    if Config::exists(config_path.as_ref()) {
        Config::load(config_path)
    } else {
        tracing::debug!("No config file found, using defaults");
        Ok(Config::default())
    }
}

fn estimator(config: &Config) -> Result<Estimator> {
    Ok(WeatherEstimator::new(MetNoClient::new(config.weather.clone())?))
}

async fn fetch_weather(
    resolver: &LocationResolver,
    estimator: &Estimator,
) -> Result<WeatherReport> {
    let coordinates = resolver.locate()?;
    estimator.estimate(coordinates).await
}

async fn run_check(config_path: Option<PathBuf>) -> Result<()> {
    let found = Config::exists(config_path.as_ref());
    let config = load_config(config_path)?;
    println!("Config:   {}", if found { "OK" } else { "not found, using defaults" });

    let crops = config.crop_table()?;
    println!("Crops:    {} ({})", crops.len(), crops.names().join(", "));

    match LocationResolver::new(config.location.clone()).locate() {
        Ok(coordinates) => println!("Location: {}", coordinates),
        Err(e) => println!("Location: {}", e),
    }

    let client = MetNoClient::new(config.weather.clone())?;
    let transport = if client.uses_proxy() { "proxy" } else { "direct" };
    match client.test_connection().await {
        Ok(true) => println!("Weather:  OK ({})", transport),
        Ok(false) => println!("Weather:  ERROR ({}, non-success status)", transport),
        Err(e) => println!("Weather:  OFFLINE ({}: {})", transport, e),
    }

    Ok(())
}

fn run_crops(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let crops = config.crop_table()?;

    print!("{:<12}", "crop");
    for stage in GrowthStage::all() {
        print!("{:>13}", stage.as_str());
    }
    println!();

    for crop in crops.crops() {
        print!("{:<12}", crop.name);
        for stage in GrowthStage::all() {
            print!("{:>13.2}", crop.kc(*stage));
        }
        println!();
    }

    Ok(())
}

async fn run_weather(
    config_path: Option<PathBuf>,
    location: LocationArgs,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let resolver = LocationResolver::new(config.location.clone())
        .with_override(location.lat, location.lon);
    let report = fetch_weather(&resolver, &estimator(&config)?).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_weather(&report);
    }

    Ok(())
}

#[derive(Serialize)]
struct ScheduleOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    weather: Option<&'a WeatherReport>,
    climate: DerivedClimate,
    schedule: &'a IrrigationResult,
}

async fn run_schedule(config_path: Option<PathBuf>, args: ScheduleArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let scheduler = IrrigationScheduler::new(config.crop_table()?);
    let form = args.to_form(config.field.to_form());

    let (report, climate) = match (args.et0, args.precipitation) {
        (Some(et0_mm_day), Some(precipitation_mm)) => (
            None,
            DerivedClimate {
                et0_mm_day,
                precipitation_mm,
            },
        ),
        _ => {
            let resolver = LocationResolver::new(config.location.clone())
                .with_override(args.location.lat, args.location.lon);
            let report = fetch_weather(&resolver, &estimator(&config)?).await?;
            let climate = report.climate;
            (Some(report), climate)
        }
    };

    let result = scheduler.calculate_form(&form, Some(&climate))?;

    if args.json {
        let output = ScheduleOutput {
            weather: report.as_ref(),
            climate,
            schedule: &result,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let Some(report) = &report {
        print_weather(report);
        println!();
    }
    print_block(
        &format!(
            "Irrigation Schedule: {} ({})",
            result.crop_type,
            result.growth_stage.label()
        ),
        result.summary_lines(),
    );

    Ok(())
}

fn print_weather(report: &WeatherReport) {
    let title = match report.sample.forecast_time {
        Some(t) => format!(
            "Weather at {} ({})",
            report.sample.coordinates,
            t.format("%Y-%m-%d %H:%M UTC")
        ),
        None => format!("Weather at {}", report.sample.coordinates),
    };
    print_block(&title, report.summary_lines());
}

fn print_block(title: &str, lines: Vec<(&'static str, String)>) {
    println!("{}", title);
    for (label, value) in lines {
        println!("  {:<36} {}", format!("{}:", label), value);
    }
}

async fn run_tui(config_path: Option<PathBuf>) -> Result<()> {
    let config = if Config::exists(config_path.as_ref()) {
        Config::load(config_path)?
    } else {
        println!("No configuration found.");
        let (config, _) = Config::setup_interactive(config_path)?;
        config
    };

    let estimator = estimator(&config)?;
    let resolver = LocationResolver::new(config.location.clone());
    let mut app = App::new(&config)?;
    app.set_status("Press w to fetch weather, then c to calculate");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, &resolver, &estimator).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    resolver: &LocationResolver,
    estimator: &Estimator,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        // Handle input with timeout for async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.quit();
                    }
                    _ if app.form_state.editing => handle_editing_input(app, key.code),
                    _ => handle_form_input(app, key.code),
                }
            }
        }

        // Handle fetch request
        if app.needs_fetch {
            app.needs_fetch = false;
            app.fetching = true;
            terminal.draw(|f| draw(f, app))?;

            match fetch_weather(resolver, estimator).await {
                Ok(report) => app.update_weather(report),
                Err(e) => app.weather_failed(&e),
            }
            app.fetching = false;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    let crop_options = app.crop_options();
    let screen = CalculatorScreen::new(&app.form, &crop_options)
        .with_focus(app.form_state.focused_field)
        .editing(app.form_state.editing, &app.form_state.edit_buffer)
        .with_weather(app.weather.as_ref(), app.fetching)
        .with_result(app.result.as_ref())
        .with_status(app.status_message.as_deref());
    frame.render_widget(screen, frame.area());
}

fn handle_editing_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.form_state.cancel_editing(),
        KeyCode::Enter => app.finish_editing(),
        KeyCode::Backspace => {
            app.form_state.edit_buffer.pop();
        }
        KeyCode::Char(c) => app.form_state.edit_buffer.push(c),
        _ => {}
    }
}

fn handle_form_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Up | KeyCode::BackTab => app.form_state.prev_field(),
        KeyCode::Down | KeyCode::Tab => app.form_state.next_field(),
        KeyCode::Left => app.cycle_select(false),
        KeyCode::Right => app.cycle_select(true),
        KeyCode::Enter if app.form_state.focused_field.is_select() => app.cycle_select(true),
        KeyCode::Enter => app.start_editing(),
        KeyCode::Char('w') => app.request_fetch(),
        KeyCode::Char('c') => app.calculate(),
        KeyCode::Char('x') => app.clear_form(),
        _ => {}
    }
}
