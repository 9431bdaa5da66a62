use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use sound_cue::error::AppResult;
use sound_cue::logging::{init_tracing, LogSettings};
use sound_cue::{
    AudioEngine, AudioOutput, CueOptions, PlaybackOptions, SilentEngine, SoundManifest,
    SoundRegistry,
};

const USAGE: &str = "usage: sound-cue [--manifest PATH] [--seconds N] <sound|music|ambience|playlist> [NAME]";

struct Args {
    manifest: PathBuf,
    seconds: u64,
    command: String,
    name: Option<String>,
}

fn parse_args() -> AppResult<Args> {
    let mut manifest = SoundManifest::default_path();
    let mut seconds = 5;
    let mut positional = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--manifest" => {
                manifest = PathBuf::from(args.next().context("--manifest needs a path")?);
            }
            "--seconds" => {
                seconds = args
                    .next()
                    .context("--seconds needs a value")?
                    .parse()
                    .context("--seconds must be a whole number")?;
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let Some(command) = positional.next() else {
        bail!(USAGE);
    };

    Ok(Args {
        manifest,
        seconds,
        command,
        name: positional.next(),
    })
}

fn main() -> AppResult<()> {
    init_tracing(&LogSettings::default().with_log_dir(LogSettings::default_log_dir()))?;

    let args = parse_args()?;
    let manifest = SoundManifest::load(&args.manifest)
        .with_context(|| format!("loading {}", args.manifest.display()))?;

    // Keep the output stream alive until we exit
    let output = match AudioOutput::try_default(None) {
        Ok(output) => Some(output),
        Err(e) => {
            tracing::warn!("No audio output, continuing silently: {}", e);
            None
        }
    };
    let engine: Arc<dyn AudioEngine> = match &output {
        Some(output) => output.engine() as Arc<dyn AudioEngine>,
        None => Arc::new(SilentEngine::new()) as Arc<dyn AudioEngine>,
    };

    let registry = SoundRegistry::from_manifest(engine, &manifest)?;
    let name = || args.name.as_deref().context(USAGE);

    match args.command.as_str() {
        "sound" => registry.play(name()?, &CueOptions::new().warn_missing())?,
        "music" => {
            registry.play_music(name()?, &PlaybackOptions::none())?;
        }
        "ambience" => {
            registry.play_ambience(name()?, &PlaybackOptions::none())?;
        }
        "playlist" => {
            let playlist = manifest.playlist.clone().context("manifest has no playlist")?;
            registry.play_list(playlist.names.as_slice(), &playlist.options, &playlist.per_index)?;
        }
        other => bail!("unknown command {}\n{}", other, USAGE),
    }

    thread::sleep(Duration::from_secs(args.seconds));
    registry.stop_music();
    registry.stop_ambience();
    Ok(())
}
