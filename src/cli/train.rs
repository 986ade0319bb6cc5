//! Train command - run the merge train for configured components

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, cross};
use anstream::println;
use dialoguer::Confirm;
use relbot::config::{BotConfig, ComponentConfig};
use relbot::error::{Error, Result};
use relbot::forge::ForgeClient;
use relbot::train::{TrainReport, evaluate, run_merge_train};
use relbot::types::MergeDecision;

/// Options for the train command
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainOptions {
    /// Show decisions without merging anything
    pub dry_run: bool,
    /// Preview decisions and prompt before merging
    pub confirm: bool,
}

/// Run the merge train for one or all configured components
pub async fn run_train(
    config: &BotConfig,
    component: Option<&str>,
    options: TrainOptions,
) -> Result<()> {
    let ctx = CommandContext::new(config)?;

    let components: Vec<&ComponentConfig> = match component {
        Some(name) => vec![config.component(name).ok_or_else(|| {
            Error::Config(format!("component '{name}' is not configured"))
        })?],
        None => config.components.iter().collect(),
    };
    if components.is_empty() {
        return Err(Error::Config("no components configured".to_string()));
    }

    let mut failed_components = Vec::new();
    for component in components {
        println!();
        println!("{} {}", "Component:".emphasis(), component.name.accent());

        if options.dry_run || options.confirm {
            report_decisions(&ctx, component).await?;
        }
        if options.dry_run {
            continue;
        }
        if options.confirm
            && !Confirm::new()
                .with_prompt(format!("Run the merge train for {}?", component.name))
                .default(true)
                .interact()
                .map_err(|e| Error::Internal(format!("failed to read confirmation: {e}")))?
        {
            println!("{}", "Skipped".muted());
            continue;
        }

        let progress = CliProgress::compact();
        match run_merge_train(
            &ctx.forge,
            component,
            &ctx.retry,
            ctx.notifier.as_ref(),
            &progress,
        )
        .await
        {
            Ok(report) => print_train_summary(&report),
            // The forge's data contract changed; stop instead of deciding
            // on mis-parsed data for the remaining components.
            Err(e @ Error::Contract(_)) => return Err(e),
            Err(e) => {
                println!(
                    "{}",
                    format!("Merge train failed for {}: {e}", component.name).warn()
                );
                failed_components.push(component.name.clone());
            }
        }
    }

    if failed_components.is_empty() {
        Ok(())
    } else {
        Err(Error::Internal(format!(
            "merge train failed for: {}",
            failed_components.join(", ")
        )))
    }
}

/// Print what the train would do, without merging
async fn report_decisions(ctx: &CommandContext, component: &ComponentConfig) -> Result<()> {
    let policy = component.check_policy()?;

    let prs = ctx
        .retry
        .run("pull-request listing", || {
            ctx.forge.list_open_pull_requests(&component.name)
        })
        .await?;

    if prs.is_empty() {
        println!("  {}", "No open pull requests.".muted());
        return Ok(());
    }

    for pr in &prs {
        let results = ctx
            .retry
            .run("check fetch", || {
                ctx.forge.fetch_checks(&component.name, pr.id)
            })
            .await?;
        let evaluation = evaluate(&results, &policy);

        match evaluation.decision {
            MergeDecision::Approved => {
                println!(
                    "  {} PR #{}: {}",
                    "Would merge".success(),
                    pr.id,
                    pr.title
                );
            }
            decision => {
                println!(
                    "  {} PR #{} ({}): {}",
                    "Would skip".warn(),
                    pr.id,
                    decision,
                    evaluation.reasons.join(", ").muted()
                );
            }
        }
    }

    Ok(())
}

/// Print the outcome of one component's train run
fn print_train_summary(report: &TrainReport) {
    if report.is_noop() {
        println!("  {}", "Nothing to do.".muted());
        return;
    }

    if !report.merged.is_empty() {
        println!(
            "  {} merged {} pull request(s)",
            check(),
            report.merged_count().accent()
        );
    }
    for pr_id in &report.already_merged {
        println!("  {}", format!("PR #{pr_id} was already merged").muted());
    }
    for skip in &report.skipped {
        println!(
            "  {} PR #{} left open ({}): {}",
            cross(),
            skip.pr_id,
            skip.decision,
            skip.reasons.join(", ").muted()
        );
    }
    for pr_id in &report.deferred {
        println!(
            "  {}",
            format!("PR #{pr_id} deferred to the next run (checks unavailable)").warn()
        );
    }
    for (pr_id, message) in &report.refused {
        println!("  {} PR #{} not merged: {}", cross(), pr_id, message.warn());
    }
}
