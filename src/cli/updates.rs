//! Updates command - missing-update detection and publishing

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, cross};
use anstream::println;
use indicatif::ProgressBar;
use relbot::config::BotConfig;
use relbot::error::{Error, Result};
use relbot::release::{
    ReleaseStatus, UpdateTracker, builds_in_flight, missing_updates, scan_releases,
};
use relbot::types::{BuildState, Nvr, PublishOutcome};
use std::time::Duration;

/// Run the updates command: scan active releases, report, maybe publish
pub async fn run_updates(
    config: &BotConfig,
    component_name: &str,
    version: &str,
    publish: bool,
    notes: Option<&str>,
) -> Result<()> {
    let ctx = CommandContext::new(config)?;
    let component = config.component(component_name).ok_or_else(|| {
        Error::Config(format!("component '{component_name}' is not configured"))
    })?;
    let builds = CommandContext::build_tracker(config)?;
    let updates = CommandContext::update_tracker(config)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!(
        "Scanning active releases for {} {}...",
        component.name, version
    ));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let statuses = scan_releases(&builds, &updates, component, version, &ctx.retry).await?;

    spinner.finish_and_clear();
    println!(
        "{} {} {}",
        "Release status for".emphasis(),
        component.name.accent(),
        version.accent()
    );
    for status in &statuses {
        print_release_status(status);
    }

    let missing = missing_updates(&statuses);
    let in_flight = builds_in_flight(&statuses);

    println!();
    if !in_flight.is_empty() {
        let versions: Vec<&str> = in_flight.iter().map(|r| r.version.as_str()).collect();
        println!(
            "{}",
            format!(
                "Builds still in flight for release(s) {}; check again later.",
                versions.join(", ")
            )
            .muted()
        );
    }
    if missing.is_empty() {
        println!("{} {}", check(), "No releases with missing updates.");
        return Ok(());
    }

    let versions: Vec<&str> = missing.iter().map(|r| r.version.as_str()).collect();
    println!(
        "{} missing update(s) for release(s): {}",
        missing.len().accent(),
        versions.join(", ").accent()
    );

    if !publish {
        println!("{}", "Run with --publish to create them.".muted());
        return Ok(());
    }

    let default_notes = format!("Update {} to {version}", component.name);
    let notes = notes.unwrap_or(&default_notes);

    let mut failures = Vec::new();
    for release in &missing {
        let nvr = Nvr::new(&component.name, version, &component.build_release, release);
        match ctx
            .retry
            .run("update creation", || updates.create_update(&nvr, notes))
            .await
        {
            Ok(PublishOutcome::Created(update)) => {
                println!(
                    "  {} update {} created for release {}",
                    check(),
                    update.alias.accent(),
                    release.version.accent()
                );
                ctx.notifier
                    .notify(&format!(
                        "Update published for {} {} in release {}: {}",
                        component.name, version, release.version, update.url
                    ))
                    .await;
            }
            Ok(PublishOutcome::AlreadyExists) => {
                println!(
                    "  {}",
                    format!("update for release {} already exists", release.version).muted()
                );
            }
            // Per-release isolation: keep publishing the rest.
            Err(e) => {
                println!(
                    "  {} release {}: {}",
                    cross(),
                    release.version,
                    e.to_string().warn()
                );
                failures.push(release.version.clone());
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(Error::Internal(format!(
            "update creation failed for release(s): {}",
            failures.join(", ")
        )))
    }
}

/// Run the releases command: list active releases
pub async fn run_releases(config: &BotConfig) -> Result<()> {
    let ctx = CommandContext::new(config)?;
    let updates = CommandContext::update_tracker(config)?;

    let releases = ctx
        .retry
        .run("release listing", || updates.active_releases())
        .await?;

    if releases.is_empty() {
        println!("{}", "No active releases.".muted());
        return Ok(());
    }

    println!("{}", "Active releases:".emphasis());
    for release in &releases {
        println!(
            "  {} ({})",
            release.version.accent(),
            release.dist_tag.muted()
        );
    }
    Ok(())
}

fn print_release_status(status: &ReleaseStatus) {
    let release = &status.release;
    match (status.build, status.update_published) {
        (Some(BuildState::Complete), true) => {
            println!(
                "  {} release {}: build complete, update published",
                check(),
                release.version.accent()
            );
        }
        (Some(BuildState::Complete), false) => {
            println!(
                "  {} release {}: build complete, {}",
                cross(),
                release.version.accent(),
                "no update".warn()
            );
        }
        (Some(BuildState::InProgress), _) | (None, _) => {
            println!(
                "  {}",
                format!("release {}: build not finished yet", release.version).muted()
            );
        }
        (Some(BuildState::Failed), _) => {
            println!(
                "  {} release {}: {}",
                cross(),
                release.version.accent(),
                "build failed".warn()
            );
        }
    }
}
