// SPDX-License-Identifier: GPL-3.0-or-later
// src/main.rs
//
// Command-line entry point: run one crop session non-interactively.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, bail};
use clap::Parser;

use circlecrop::app::model::SessionState;
use circlecrop::{
    CropConfig, CropMessage, CropSession, DecodingLoader, ImageLoader, ImageSource, PointerEvent,
};

/// A straight drag gesture in viewport coordinates.
#[derive(Debug, Clone, Copy)]
struct Drag {
    from: (f32, f32),
    to: (f32, f32),
}

fn parse_point(text: &str) -> Result<(f32, f32), String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{text}'"))?;
    let x = x.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok((x, y))
}

fn parse_drag(text: &str) -> Result<Drag, String> {
    let (from, to) = text
        .split_once(':')
        .ok_or_else(|| format!("expected X0,Y0:X1,Y1, got '{text}'"))?;
    Ok(Drag {
        from: parse_point(from)?,
        to: parse_point(to)?,
    })
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "circlecrop",
    version,
    about = "Crop a photo into a round portrait PNG"
)]
struct Args {
    /// Image path, file:// URI or data URI.
    source: String,

    /// Output PNG path.
    #[arg(short, long, default_value = "crop.png")]
    output: PathBuf,

    /// Zoom factor relative to the fitted size.
    #[arg(long)]
    zoom: Option<f32>,

    /// Horizontal pan in viewport units (positive moves the image right).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pan_x: f32,

    /// Vertical pan in viewport units (positive moves the image down).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pan_y: f32,

    /// Replay a drag gesture, X0,Y0:X1,Y1 in viewport coordinates. Repeatable.
    #[arg(long = "drag", value_parser = parse_drag, allow_hyphen_values = true)]
    drags: Vec<Drag>,

    /// Print the result as a data URI instead of writing a file.
    #[arg(long)]
    data_uri: bool,

    /// Config file (defaults to the user config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => CropConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CropConfig::load_or_default().context("loading default config")?,
    };

    let source = ImageSource::parse(&args.source);
    let result = Rc::new(RefCell::new(None));
    let slot = Rc::clone(&result);
    let mut session = CropSession::new(
        source.clone(),
        config,
        Box::new(move |cropped| *slot.borrow_mut() = Some(cropped)),
        Box::new(|| log::info!("no image produced")),
    )?;

    // Decoding is the only slow step; keep it off the async runtime threads.
    let loaded = tokio::task::spawn_blocking(move || DecodingLoader.load(&source))
        .await
        .context("image loader task failed")?;
    session.update(CropMessage::Loaded(loaded))?;

    if let SessionState::LoadError(reason) = session.state().clone() {
        session.cancel();
        bail!("could not load {}: {reason}", args.source);
    }

    if let Some(zoom) = args.zoom {
        session.set_zoom(zoom)?;
    }
    if args.pan_x != 0.0 || args.pan_y != 0.0 {
        session.pan_by(args.pan_x, args.pan_y)?;
    }
    for drag in &args.drags {
        session.update(CropMessage::Pointer(PointerEvent::down(drag.from.0, drag.from.1)))?;
        session.update(CropMessage::Pointer(PointerEvent::moved(drag.to.0, drag.to.1)))?;
        session.update(CropMessage::Pointer(PointerEvent::up(drag.to.0, drag.to.1)))?;
    }

    log::debug!(
        "confirming with {:?} (zoom {}%)",
        session.transform(),
        session.zoom_percent().unwrap_or_default()
    );
    session.update(CropMessage::Confirm)?;
    let cropped = result
        .borrow_mut()
        .take()
        .context("confirm produced no image")?;

    if args.data_uri {
        println!("{}", cropped.to_data_uri());
    } else {
        cropped
            .save(&args.output)
            .with_context(|| format!("writing {}", args.output.display()))?;
        log::info!("wrote {}", args.output.display());
    }

    Ok(())
}
