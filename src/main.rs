//! # Wind Rose Card Entry Point
//!
//! Renders the corner readouts of the wind rose card to an SVG document.
//! States come either from a JSON dump (`--states`) or from a Home Assistant
//! instance configured through `HASS_URL` and `HASS_TOKEN`.
//!
//! Usage:
//!   windrose-card [--config PATH] [--states PATH] [--ticks N] [--svg OUT | --stdout]

use anyhow::{anyhow, Context};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use windrose_card_lib::{
    config::CardConfig,
    corner_renderer::CornerInfoRenderer,
    entity_checker::check_entities,
    state::{resolve_corner_states, StateSnapshot},
    state_source::{load_snapshot_file, HassSource},
    surface::SvgSurface,
};

/// Command line options.
#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    states: Option<PathBuf>,
    svg: Option<PathBuf>,
    stdout: bool,
    ticks: u32,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Options> {
    let mut options = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| anyhow!("{} expects a value", name))
        };
        match arg.as_str() {
            "--config" => options.config = Some(value("--config")?.into()),
            "--states" => options.states = Some(value("--states")?.into()),
            "--svg" => options.svg = Some(value("--svg")?.into()),
            "--ticks" => {
                options.ticks = value("--ticks")?
                    .parse()
                    .context("--ticks expects a number")?
            }
            "--stdout" => options.stdout = true,
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
    }
    Ok(options)
}

/// Where each tick's snapshot comes from.
enum Source {
    File(PathBuf),
    Hass(HassSource),
}

impl Source {
    fn from_options(options: &Options, config: &CardConfig) -> anyhow::Result<Self> {
        if let Some(path) = &options.states {
            return Ok(Source::File(path.clone()));
        }
        let url = env::var("HASS_URL").context("no --states file given and HASS_URL is not set")?;
        let token = env::var("HASS_TOKEN").context("HASS_TOKEN is not set")?;
        let source = HassSource::new(url, token).with_cache(
            windrose_card_lib::state_source::CACHE,
            Duration::from_secs(config.source.cache_ttl_seconds),
        );
        Ok(Source::Hass(source))
    }

    async fn snapshot(&self) -> anyhow::Result<StateSnapshot> {
        match self {
            Source::File(path) => load_snapshot_file(path)
                .with_context(|| format!("reading states from {}", path.display())),
            Source::Hass(source) => Ok(source.fetch().await?),
        }
    }
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args(env::args().skip(1))?;
    let config = match &options.config {
        Some(path) => CardConfig::try_load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => CardConfig::load(),
    };
    let source = Source::from_options(&options, &config)?;

    let rt = tokio::runtime::Runtime::new()?;
    let svg = rt.block_on(run(&config, &source, options.ticks))?;

    if options.stdout {
        print!("{}", svg);
    } else {
        let out = options.svg.unwrap_or_else(|| PathBuf::from("windrose-card.svg"));
        std::fs::write(&out, svg).with_context(|| format!("writing {}", out.display()))?;
        log::info!("wrote {}", out.display());
    }
    Ok(())
}

async fn run(config: &CardConfig, source: &Source, ticks: u32) -> anyhow::Result<String> {
    let snapshot = source.snapshot().await?;

    // Nothing is drawn unless every required entity exists
    let config = check_entities(config, &snapshot)?;

    let surface = SvgSurface::new(config.dimensions.width, config.dimensions.height);
    let mut renderer = CornerInfoRenderer::from_card(&config, surface);
    renderer.draw_corner_labels();
    renderer.draw_corner_values(&resolve_corner_states(&config.corners, &snapshot));

    if ticks > 0 {
        let mut interval =
            tokio::time::interval(Duration::from_secs(config.source.refresh_seconds.max(1)));
        // The first tick of an interval completes immediately
        interval.tick().await;
        for tick in 1..=ticks {
            interval.tick().await;
            match source.snapshot().await {
                Ok(snapshot) => {
                    renderer.update_corner_values(&resolve_corner_states(&config.corners, &snapshot));
                    log::info!("tick {}/{} rendered", tick, ticks);
                }
                Err(e) => log::warn!("tick {}/{} skipped: {:#}", tick, ticks, e),
            }
        }
    }

    Ok(renderer.surface().to_svg_string())
}
