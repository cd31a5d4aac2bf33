//! `tapcast` CLI entrypoint.
//!
//! Regenerates Sparkle appcasts and Homebrew casks from a repository's
//! GitHub releases, or prints the release notes for a tag. Results go to
//! stdout; progress and errors go to stderr.

use chrono::Utc;
use clap::Parser;
use log::info;
use std::io::Write;
use tapcast::ProjectConfig;
use tapcast_common::notes_for;
use tapcast_publisher::cli::{AppcastArgs, CaskArgs, Cli, Command, NotesArgs, ProjectArgs};
use tapcast_publisher::download::HttpFetcher;
use tapcast_publisher::error::{PublisherError, Result};
use tapcast_publisher::github::GitHubReleases;
use tapcast_publisher::output::{appcast_summary, cask_summary, write_lines};
use tapcast_publisher::pipeline::{
    AppcastOptions, CaskOptions, Collaborators, generate_appcasts, load_signer, update_casks,
};

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Command::Appcast(args) => run_appcast(args, cli.quiet, stdout, stderr),
        Command::Cask(args) => run_cask(args, stdout),
        Command::Notes(args) => run_notes(args, stdout),
    }
}

fn run_appcast(
    args: &AppcastArgs,
    quiet: bool,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    // Key problems must surface before any request is made.
    let signer = load_signer(args.sparkle_private_key.as_deref(), args.require_signatures)?;
    if !quiet {
        match &signer {
            Some(signer) => write_stderr_line(
                stderr,
                format!("Signing enclosures with public key {}", signer.public_key_base64()),
            ),
            None => write_stderr_line(
                stderr,
                "No Sparkle private key supplied; appcasts will be unsigned.",
            ),
        }
    }

    let config = load_config(&args.project)?;
    let releases = GitHubReleases::new(&config.http, args.project.github_token.clone());
    let fetcher = HttpFetcher::new(&config.http);
    let outcome = generate_appcasts(
        &config,
        Collaborators {
            releases: &releases,
            fetcher: &fetcher,
        },
        AppcastOptions {
            output_dir: &args.output_dir,
            changelog: &args.changelog,
            signer: signer.as_ref(),
            now: Utc::now(),
        },
    )?;

    write_lines(stdout, &appcast_summary(&outcome))?;
    Ok(())
}

fn run_cask(args: &CaskArgs, stdout: &mut dyn Write) -> Result<()> {
    let config = load_config(&args.project)?;
    let releases = GitHubReleases::new(&config.http, args.project.github_token.clone());
    let fetcher = HttpFetcher::new(&config.http);
    let outcome = update_casks(
        &config,
        Collaborators {
            releases: &releases,
            fetcher: &fetcher,
        },
        CaskOptions {
            tap_path: &args.tap_path,
            pin_checksums: args.pin_checksums,
        },
    )?;

    write_lines(stdout, &cask_summary(&outcome))?;
    Ok(())
}

fn run_notes(args: &NotesArgs, stdout: &mut dyn Write) -> Result<()> {
    let document = std::fs::read_to_string(&args.changelog).map_err(|source| {
        PublisherError::ChangelogRead {
            path: args.changelog.clone(),
            source,
        }
    })?;
    let notes = notes_for(&document, &args.tag)?;
    writeln!(stdout, "{notes}")?;
    Ok(())
}

fn load_config(project: &ProjectArgs) -> Result<ProjectConfig> {
    let config = ProjectConfig::load(&project.config)?.with_repo_override(project.repo.clone())?;
    info!("publishing {} from {}", config.app_name, config.repo);
    Ok(config)
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort reporting; ignore write failures.
    }
}
