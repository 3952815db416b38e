// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

//! OpSuite auth CLI.
//!
//! Thin command-line front-door over the authentication core, persisting
//! the session to a local file between invocations. Useful for poking at
//! the lifecycle without the ERP front-end.

use opsuite_auth::clock::format_ms_rfc3339;
use opsuite_auth::services::NewProfile;
use opsuite_auth::{AuthConfig, Authenticator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = AuthConfig::from_env();
    tracing::debug!(
        backend = config.backend_url.as_deref().unwrap_or("<local-only>"),
        session_file = %config.session_file,
        "starting"
    );
    let auth = Authenticator::from_config(config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let arg = |i: usize| args.get(i).map(String::as_str);

    match (arg(0), arg(1), arg(2), arg(3)) {
        (Some("login"), Some(identifier), Some(secret), None) => {
            let user = auth.login(identifier, secret).await?;
            println!("logged in as {} <{}> ({})", user.name, user.email, user.role);
        }
        (Some("register"), Some(identifier), Some(secret), Some(name)) => {
            let profile = NewProfile {
                name: name.to_string(),
                role: None,
                department: None,
            };
            let user = auth.register(identifier, secret, profile).await?;
            println!("registered {} <{}>", user.name, user.email);
        }
        (Some("send-otp"), Some(identifier), Some(secret), None) => {
            let issued = auth.send_otp(identifier, secret)?;
            // Demo-grade delivery: the code goes to the caller, not out-of-band.
            println!(
                "one-time code for {identifier}: {} (valid until {})",
                issued.code,
                format_ms_rfc3339(issued.expires_at)
            );
        }
        (Some("verify-otp"), Some(identifier), Some(code), None) => {
            let user = auth.verify_otp_and_login(identifier, code).await?;
            println!("logged in as {} <{}>", user.name, user.email);
        }
        (Some("whoami"), None, None, None) => match auth.current_user().await {
            Some(user) => {
                println!("{} <{}> ({})", user.name, user.email, user.role);
                if let Some(department) = user.department {
                    println!("department: {department}");
                }
            }
            None => println!("not logged in"),
        },
        (Some("logout"), None, None, None) => {
            auth.logout().await;
            println!("logged out");
        }
        _ => {
            eprintln!("usage: opsuite-auth <command>");
            eprintln!("  login <identifier> <secret>");
            eprintln!("  register <identifier> <secret> <name>");
            eprintln!("  send-otp <identifier> <secret>");
            eprintln!("  verify-otp <identifier> <code>");
            eprintln!("  whoami");
            eprintln!("  logout");
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Initialize structured logging. `RUST_LOG` controls verbosity; default is
/// warnings only so CLI output stays clean.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
