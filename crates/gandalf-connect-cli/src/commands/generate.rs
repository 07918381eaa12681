use std::path::PathBuf;

use clap::Args;
use gandalf_connect_core::{
    Connect, ConnectConfig, ConnectInput, ConnectOptions, InputData, StylingOptions,
};

#[derive(Args)]
pub struct GenerateArgs {
    /// Public key of the requesting application
    #[arg(long)]
    public_key: String,
    /// URL the App Clip redirects to when the flow completes
    #[arg(long)]
    redirect_url: String,
    /// Services as JSON, e.g. '{"netflix": true}'
    #[arg(long, required_unless_present = "services_file", conflicts_with = "services_file")]
    services: Option<String>,
    /// File containing the services JSON
    #[arg(long)]
    services_file: Option<PathBuf>,
    #[arg(long)]
    primary_color: Option<String>,
    #[arg(long)]
    background_color: Option<String>,
    #[arg(long)]
    foreground_color: Option<String>,
    #[arg(long)]
    accent_color: Option<String>,
    /// Config file (defaults to ~/.config/gandalf-connect/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl GenerateArgs {
    fn services(&self) -> Result<InputData, Box<dyn std::error::Error>> {
        let json = match (&self.services, &self.services_file) {
            (Some(inline), _) => inline.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)?,
            (None, None) => return Err("--services or --services-file required".into()),
        };
        serde_json::from_str(&json).map_err(|e| format!("invalid services JSON: {e}").into())
    }

    fn style(&self) -> Option<StylingOptions> {
        let style = StylingOptions {
            primary_color: self.primary_color.clone(),
            background_color: self.background_color.clone(),
            foreground_color: self.foreground_color.clone(),
            accent_color: self.accent_color.clone(),
        };
        (style != StylingOptions::default()).then_some(style)
    }
}

pub fn run(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let services = args.services()?;
    let config = match &args.config {
        Some(path) => ConnectConfig::load_from(path)?,
        None => ConnectConfig::load_or_default(),
    };

    let mut input = ConnectInput::new(&args.public_key, &args.redirect_url, services);
    if let Some(style) = args.style() {
        input = input.with_options(ConnectOptions::new(style));
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let url = runtime.block_on(async {
        let mut connect = Connect::from_config(input, config);
        connect.generate_url().await
    })?;

    tracing::info!("generated App Clip URL");
    println!("{url}");
    Ok(())
}
