use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// Voxdrop text-to-speech service
#[derive(Debug, Parser)]
#[command(name = "voxdrop", about = "Synthesize speech with Amazon Polly and hand out presigned S3 links")]
pub struct Args {
    /// Path to configuration file; without one, settings come from `S3_BUCKET` and `AUDIO_EXPIRE_SECONDS`
    #[arg(short, long, env = "VOXDROP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "VOXDROP_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter directive, e.g. `info` or `voxdrop=debug,tts=trace`
    #[arg(long, default_value = "info", env = "VOXDROP_LOG")]
    pub log_filter: String,
}
