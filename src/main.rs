mod cli;
mod options;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, EncodeArgs};
use ffmpegbin_av::{check_ffmpeg, display_args, tools, EncodeOptions, FFmpeg};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What a dry run reports.
#[derive(Serialize)]
struct Plan<'a> {
    program: &'a Path,
    args: Vec<String>,
    options: &'a EncodeOptions,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "ffmpegbin=trace,ffmpegbin_av=trace".to_string()
        } else {
            "ffmpegbin=info,ffmpegbin_av=info".to_string()
        }
    });

    // Logs go to stderr so stdout stays clean for piped media
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Encode(args) => encode(args, cli.ffmpeg.as_deref()),
        Commands::CheckTools => check_tools(cli.ffmpeg.as_deref()),
        Commands::Version => {
            println!("ffmpegbin {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn encode(args: EncodeArgs, ffmpeg_path: Option<&Path>) -> Result<()> {
    let EncodeArgs {
        input,
        output,
        options: options_path,
        dry_run,
        json,
        encoding,
    } = args;

    let options = options::resolve_options(options_path.as_deref(), encoding)?;

    // Protocol inputs (http:, rtsp:, concat:) are left for ffmpeg to open
    if let Some(path) = input.as_deref().filter(|p| *p != "-" && !has_protocol(p)) {
        if !dry_run && !Path::new(path).exists() {
            anyhow::bail!("Input file does not exist: {:?}", path);
        }
    }

    let mut ffmpeg = if dry_run {
        FFmpeg::new()
    } else {
        FFmpeg::locate(ffmpeg_path).context("ffmpeg is required to encode")?
    };

    match input.as_deref() {
        Some("-") => {
            ffmpeg.input(std::io::stdin());
        }
        Some(path) => {
            ffmpeg.input_file(path);
        }
        None => {}
    }

    match output.as_deref() {
        Some("-") => {
            ffmpeg.output(std::io::stdout());
        }
        Some(path) => {
            ffmpeg.output_file(path);
        }
        None => {}
    }

    ffmpeg.options(options.clone());

    if dry_run {
        let args = ffmpeg.args()?;
        let program =
            tools::ffmpeg_path(ffmpeg_path).unwrap_or_else(|_| PathBuf::from(tools::FFMPEG));

        if json {
            let plan = Plan {
                program: &program,
                args: args
                    .iter()
                    .map(|a| a.to_string_lossy().into_owned())
                    .collect(),
                options: &options,
            };
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            println!("{} {}", program.display(), display_args(&args));
        }
        return Ok(());
    }

    tracing::info!(
        "Encoding {} -> {}",
        input.as_deref().unwrap_or("<none>"),
        output.as_deref().unwrap_or("<none>")
    );
    ffmpeg.run()?;
    tracing::info!("Encoding complete");

    Ok(())
}

/// Whether `input` names an ffmpeg protocol such as `http://host/a.mp4` or
/// `concat:a.ts|b.ts` rather than a local file.
fn has_protocol(input: &str) -> bool {
    input.split_once(':').is_some_and(|(scheme, _)| {
        scheme.len() > 1
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

fn check_tools(ffmpeg_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let tool = check_ffmpeg(ffmpeg_path);
    let status = if tool.available { "✓" } else { "✗" };

    print!("{} {}", status, tool.name);

    if let Some(ref version) = tool.version {
        print!(" ({})", version);
    }

    if let Some(ref path) = tool.path {
        print!(" - {}", path.display());
    }

    println!();
    println!();
    if tool.available {
        println!("All required tools are available!");
    } else {
        println!("ffmpeg is missing. Install it or pass --ffmpeg <PATH>.");
    }

    Ok(())
}
