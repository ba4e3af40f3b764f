// src/cli/handlers/create.rs

use crate::cli::args::CreateArgs;
use crate::core::scaffold::{self, ProjectPlan};
use crate::core::settings;
use anyhow::{anyhow, Result};
use clap::Parser;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref CODENAME_RE: Regex =
        Regex::new(r"^[A-Za-z0-9_-]+$").expect("codename pattern is valid");
}

/// The main handler for the `create` command: collect the project info,
/// then hand the plan to the scaffolder.
pub fn handle(args: Vec<String>) -> Result<()> {
    let create_args = CreateArgs::try_parse_from(&args)?;
    let user_settings = settings::load()?;

    let plan = collect_plan(&create_args)?;
    println!(
        "\n{}",
        format!(
            t!("create.info.starting"),
            codename = plan.codename,
            dir = plan.root.display()
        )
        .cyan()
    );

    let project_dir = scaffold::create(&plan, &user_settings)?;

    println!("\n{}", t!("common.success").green().bold());
    println!(
        "{}",
        format!(
            t!("create.info.done"),
            name = plan.name,
            dir = project_dir.display()
        )
    );
    Ok(())
}

fn collect_plan(args: &CreateArgs) -> Result<ProjectPlan> {
    let repo = resolve_repo(args)?;
    let root = resolve_target_dir(args)?;
    let name = resolve_name(args)?;
    let codename = resolve_codename(args, &repo)?;
    let appid = resolve_appid(args)?;
    Ok(ProjectPlan {
        repo,
        root,
        name,
        codename,
        appid,
    })
}

fn resolve_repo(args: &CreateArgs) -> Result<String> {
    if let Some(repo) = &args.repo {
        return validate_repo(repo);
    }
    loop {
        let input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Project git URL")
            .interact_text()?;
        match validate_repo(&input) {
            Ok(repo) => return Ok(repo),
            Err(e) => println!("{}", format!("Error: {e}").red()),
        }
    }
}

fn validate_repo(repo: &str) -> Result<String> {
    let repo = repo.trim();
    if repo.is_empty() {
        return Err(anyhow!(t!("create.error.repo_empty")));
    }
    if !repo.ends_with(".git") {
        return Err(anyhow!(t!("create.error.repo_invalid")));
    }
    Ok(repo.to_string())
}

fn resolve_target_dir(args: &CreateArgs) -> Result<PathBuf> {
    let raw = match &args.dir {
        Some(dir) => dir.clone(),
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Project directory")
            .default(".".to_string())
            .interact_text()?,
    };
    let expanded = shellexpand::full(&raw)
        .map(|expanded| expanded.into_owned())
        .unwrap_or(raw);
    let dir = PathBuf::from(expanded);
    validate_target_dir(&dir)?;
    Ok(dunce::canonicalize(&dir).unwrap_or(dir))
}

fn validate_target_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        return Ok(());
    }
    let mut entries = fs::read_dir(dir)?;
    if entries.next().is_some() {
        return Err(anyhow!(format!(
            t!("create.error.dir_not_empty"),
            dir = dir.display()
        )));
    }
    Ok(())
}

fn resolve_name(args: &CreateArgs) -> Result<String> {
    let name = match &args.name {
        Some(name) => name.clone(),
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Project display name")
            .interact_text()?,
    };
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(anyhow!(t!("create.error.name_empty")));
    }
    Ok(name)
}

fn resolve_codename(args: &CreateArgs, repo: &str) -> Result<String> {
    if let Some(codename) = &args.codename {
        return validate_codename(codename);
    }
    let default_codename = repo_basename(repo);
    loop {
        let input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Project codename")
            .default(default_codename.clone())
            .interact_text()?;
        match validate_codename(&input) {
            Ok(codename) => return Ok(codename),
            Err(e) => println!("{}", format!("Error: {e}").red()),
        }
    }
}

fn validate_codename(codename: &str) -> Result<String> {
    let codename = codename.trim();
    if codename.is_empty() {
        return Err(anyhow!(t!("create.error.codename_empty")));
    }
    if !CODENAME_RE.is_match(codename) {
        return Err(anyhow!(t!("create.error.codename_invalid")));
    }
    Ok(codename.to_string())
}

/// `https://host/group/dice-push.git` -> `dice-push`.
fn repo_basename(repo: &str) -> String {
    repo.trim_end_matches(".git")
        .rsplit(['/', ':'])
        .next()
        .unwrap_or_default()
        .to_string()
}

fn resolve_appid(args: &CreateArgs) -> Result<String> {
    let appid = match &args.appid {
        Some(appid) => appid.clone(),
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Backend appid (enter to skip)")
            .allow_empty(true)
            .interact_text()?,
    };
    Ok(appid.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codename_accepts_the_documented_alphabet() {
        assert!(validate_codename("dice-push_2").is_ok());
        assert!(validate_codename("dice push").is_err());
        assert!(validate_codename("骰子").is_err());
        assert!(validate_codename("  ").is_err());
    }

    #[test]
    fn repo_must_end_with_git() {
        assert!(validate_repo("https://example.com/a/b.git").is_ok());
        assert!(validate_repo("https://example.com/a/b").is_err());
        assert!(validate_repo("").is_err());
    }

    #[test]
    fn repo_basename_strips_host_and_extension() {
        assert_eq!(repo_basename("https://h/g/dice-push.git"), "dice-push");
        assert_eq!(repo_basename("git@h:g/kit.git"), "kit");
    }

    #[test]
    fn empty_target_dir_is_accepted_and_non_empty_is_not() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_target_dir(dir.path()).is_ok());
        std::fs::write(dir.path().join("x"), "y").unwrap();
        assert!(validate_target_dir(dir.path()).is_err());
    }
}
