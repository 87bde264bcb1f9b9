use std::{
    io::{self, Read},
    sync::Arc,
};

use anyhow::{bail, Result};
use clap::Parser;
use client_core::{
    GenerationConfig, GenerationController, NullClipboard, RequestState, StaticIdentity,
};
use shared::domain::IdentitySnapshot;

/// Turn an informal work-experience description into a formatted CV.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = client_core::DEFAULT_SERVICE_URL)]
    server_url: String,
    /// Bearer token for the generation service.
    #[arg(long)]
    token: String,
    #[arg(long)]
    full_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    /// Raw experience text; read from stdin when omitted.
    experience: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let experience = match args.experience {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    if experience.trim().is_empty() {
        bail!("no experience text provided");
    }

    let identity = IdentitySnapshot {
        full_name: args.full_name,
        email: args.email,
    };
    let controller = GenerationController::new(
        GenerationConfig::for_service(args.server_url)?,
        Arc::new(StaticIdentity::new(args.token, identity)),
        Arc::new(NullClipboard),
    );

    controller.update_input(experience).await;
    controller.submit().await;

    match controller.request_state().await {
        RequestState::Succeeded(cv) => {
            println!("{}", cv.text);
            Ok(())
        }
        RequestState::Failed(failure) => bail!("generation failed: {}", failure.message),
        state => bail!("generation ended in unexpected state {state:?}"),
    }
}
