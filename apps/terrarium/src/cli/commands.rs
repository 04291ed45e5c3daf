//! # CLI Command Implementations
//!
//! Each command bootstraps the shell from configuration and prints the
//! requested view of it, as text or as JSON with `--json-mode`.

use crate::api::{self, FeatureSummary};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::providers::{Candidate, live_candidates, offline_candidates};
use crate::shell::{Resolution, RouteTarget, Shell, Viewer};
use terrarium_core::SubjectId;

/// Print `value` as pretty JSON.
fn print_json<T: serde::Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

/// Shell without providers, for commands that never touch the dashboard.
fn static_shell(config: &AppConfig) -> Result<Shell, AppError> {
    Ok(Shell::bootstrap(config, Vec::<Candidate>::new())?)
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: &AppConfig, host: &str, port: u16) -> Result<(), AppError> {
    let shell = Shell::bootstrap(config, live_candidates(config))?;

    println!("Terrarium Shell Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:        {}", host);
    println!("  Port:        {}", port);
    println!("  Records API: {}", config.records.base_url);
    println!("  Preload:     {:?}", config.preload_policy);
    println!();
    println!("Endpoints:");
    println!("  GET  /features                    - Registered features");
    println!("  GET  /routes                      - Route table");
    println!("  GET  /navigation                  - Navigation menu");
    println!("  GET  /resolve                     - Resolve a path");
    println!("  GET  /dashboard/{{user_id}}/widgets - Dashboard widgets");
    println!("  POST /dashboard/{{user_id}}/preload - Warm providers");
    println!("  GET  /health                      - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, shell).await
}

// =============================================================================
// REGISTRY COMMANDS
// =============================================================================

/// List registered features.
pub fn cmd_features(config: &AppConfig, json_mode: bool) -> Result<(), AppError> {
    let shell = static_shell(config)?;
    let features: Vec<FeatureSummary> = shell
        .registry()
        .descriptors()
        .map(FeatureSummary::from)
        .collect();

    if json_mode {
        print_json(&serde_json::json!({ "features": features }));
        return Ok(());
    }

    println!("Terrarium Features");
    println!("==================");
    for feature in &features {
        let state = if feature.enabled { "on " } else { "off" };
        println!(
            "  [{}] {:<20} routes: {:<2} nav: {}",
            state,
            feature.name,
            feature.routes.len(),
            feature.navigation.len()
        );
    }

    Ok(())
}

/// Show the composed route table.
pub fn cmd_routes(config: &AppConfig, json_mode: bool) -> Result<(), AppError> {
    let shell = static_shell(config)?;
    let routes = shell.routes().routes();

    if json_mode {
        print_json(&serde_json::json!({ "routes": routes }));
        return Ok(());
    }

    println!("Route Table");
    println!("===========");
    for route in routes {
        let target = match &route.target {
            RouteTarget::View(view) => format!("view {}", view.as_str()),
            RouteTarget::Redirect(to) => format!("-> {}", to),
        };
        let guards: Vec<&str> = route.guards.iter().map(|g| g.as_str()).collect();
        println!(
            "  /{:<20} {:<24} {}",
            route.path,
            target,
            guards.join(", ")
        );
    }

    Ok(())
}

/// Show the navigation menu.
pub fn cmd_nav(config: &AppConfig, json_mode: bool, admin: bool) -> Result<(), AppError> {
    let shell = static_shell(config)?;
    let viewer = if admin {
        Viewer::administrator()
    } else {
        Viewer::member()
    };
    let entries = shell.navigation_for(&viewer);

    if json_mode {
        print_json(&serde_json::json!({ "entries": entries }));
        return Ok(());
    }

    println!("Navigation");
    println!("==========");
    if entries.is_empty() {
        println!("  (no entries)");
    }
    for entry in &entries {
        let marker = if entry.admin_only { " (admin)" } else { "" };
        println!("  {:<20} {}{}", entry.label, entry.path, marker);
    }

    Ok(())
}

/// Resolve a path for a viewer.
pub fn cmd_resolve(
    config: &AppConfig,
    json_mode: bool,
    path: &str,
    authenticated: bool,
    admin: bool,
) -> Result<(), AppError> {
    let shell = static_shell(config)?;
    let viewer = Viewer {
        authenticated: authenticated || admin,
        admin,
    };
    let resolution = shell.routes().resolve(path, &viewer);

    if json_mode {
        print_json(&serde_json::json!({ "path": path, "resolution": resolution }));
        return Ok(());
    }

    match resolution {
        Resolution::Activate {
            pattern,
            view,
            params,
        } => {
            println!("{} -> view {} (route /{})", path, view.as_str(), pattern);
            for (name, value) in &params {
                println!("  {} = {}", name, value);
            }
        }
        Resolution::Redirect { to } => println!("{} -> redirect {}", path, to),
    }

    Ok(())
}

// =============================================================================
// DASHBOARD COMMANDS
// =============================================================================

/// Collect dashboard widgets for a user.
pub async fn cmd_dashboard(
    config: &AppConfig,
    json_mode: bool,
    user: u64,
    offline: bool,
) -> Result<(), AppError> {
    let candidates = if offline {
        offline_candidates()
    } else {
        live_candidates(config)
    };
    let shell = Shell::bootstrap(config, candidates)?;
    let report = shell.dashboard().widgets_report(SubjectId(user)).await;

    if json_mode {
        print_json(&serde_json::json!({
            "user_id": user,
            "widgets": report.widgets,
            "failed": report.failed,
        }));
        return Ok(());
    }

    println!("Dashboard for user {}", user);
    println!("=====================");
    if report.widgets.is_empty() {
        println!("  (no widgets)");
    }
    for widget in &report.widgets {
        println!("  {:<28} {:>6}", widget.title, widget.value);
    }
    if !report.failed.is_empty() {
        println!();
        println!("Unavailable: {}", report.failed.join(", "));
    }

    Ok(())
}

/// Warm dashboard providers for a user.
pub async fn cmd_preload(config: &AppConfig, json_mode: bool, user: u64) -> Result<(), AppError> {
    let shell = Shell::bootstrap(config, live_candidates(config))?;
    shell.dashboard().preload(SubjectId(user)).await?;

    if json_mode {
        print_json(&serde_json::json!({ "success": true, "user_id": user }));
    } else {
        println!("Preloaded dashboard for user {}", user);
    }

    Ok(())
}
