// src/core/scaffold.rs

//! The scaffolding steps behind `create`: bootstrap a git repository from
//! the template, relocate the template files and repoint the generated
//! configuration at the new project.
//!
//! Sequential glue. Only the network steps retry; every other failure
//! aborts the wizard with whatever was done so far left on disk.

use crate::constants::{PROJECT_FILENAME, TEMPLATE_UI_BUNDLE};
use crate::core::settings::Settings;
use crate::system::executor;
use anyhow::{Context, Result};
use colored::Colorize;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything the wizard collected.
#[derive(Debug, Clone)]
pub struct ProjectPlan {
    /// The project's own git remote.
    pub repo: String,
    /// The (empty) directory the project tree is created in.
    pub root: PathBuf,
    pub name: String,
    pub codename: String,
    /// May be empty when the backend has not assigned one yet.
    pub appid: String,
}

lazy_static! {
    // `  template/...` references inside the template's own manifest point
    // one directory up once the template files move out.
    static ref TEMPLATE_PATH_RE: Regex =
        Regex::new(r"\s+template/").expect("template path pattern is valid");
}

/// Runs the whole scaffold. Returns the git working directory
/// (`<root>/project`).
pub fn create(plan: &ProjectPlan, settings: &Settings) -> Result<PathBuf> {
    let project_dir = plan.root.join("project");
    fs::create_dir_all(&project_dir)?;

    step(t!("create.step.git"));
    let template_repo = settings.template_repo_expanded();
    run_in(&project_dir, "git init")?;
    run_in(&project_dir, &format!("git remote add origin \"{}\"", plan.repo))?;
    run_in(
        &project_dir,
        &format!("git remote add upstream \"{template_repo}\""),
    )?;
    executor::execute_with_retries("git fetch upstream", &project_dir, 3)
        .context("could not fetch the template repository")?;
    run_in(&project_dir, "git checkout upstream/master")?;
    run_in(&project_dir, "git checkout -b framework")?;
    run_in(&project_dir, "git checkout -b master")?;

    step(t!("create.step.template"));
    relocate_template(&project_dir, &plan.root)?;
    fs::create_dir_all(project_dir.join(".temp"))?;

    step(t!("create.step.config"));
    let config_yaml = project_dir.join("config.yaml");
    rewrite_yaml_field(&config_yaml, "name", &plan.name)?;
    rewrite_yaml_field(&config_yaml, "project", &plan.codename)?;
    rewrite_yaml_field(&config_yaml, "appid", &plan.appid)?;
    regex_replace_in_file(&project_dir.join(PROJECT_FILENAME), &TEMPLATE_PATH_RE, " ../")?;

    step(t!("create.step.ui"));
    adjust_ui_bundle(plan, &project_dir)?;

    step(t!("create.step.deps"));
    if executor::execute_with_retries("yarn install", &project_dir, 3).is_err() {
        println!("{}", t!("create.warn.deps_skipped").yellow());
    } else {
        run_in(
            &project_dir,
            "yarn webpack --config tools/webpack.config.js",
        )?;
    }

    step(t!("create.step.commit"));
    run_in(&project_dir, "git add .")?;
    run_in(
        &project_dir,
        &format!("git commit -m \"Initialize project {}\"", plan.codename),
    )?;
    if executor::execute_command("git push origin master", &project_dir).is_err() {
        println!(
            "{}",
            format!(t!("create.warn.push_failed"), repo = plan.repo).yellow()
        );
    }

    Ok(project_dir)
}

fn step(message: &str) {
    println!("{} {}", "→".blue(), message);
}

fn run_in(cwd: &Path, command: &str) -> Result<()> {
    println!("{} {}", "›".dimmed(), command.green());
    executor::execute_command(command, cwd)?;
    Ok(())
}

/// Moves everything out of `<project>/template/` into the workspace root
/// and removes the emptied directory.
fn relocate_template(project_dir: &Path, root: &Path) -> Result<()> {
    let template_dir = project_dir.join("template");
    if !template_dir.is_dir() {
        log::warn!(
            "Template directory '{}' not found; skipping relocation.",
            template_dir.display()
        );
        return Ok(());
    }
    for entry in fs::read_dir(&template_dir)? {
        let entry = entry?;
        let dest = root.join(entry.file_name());
        fs::rename(entry.path(), &dest).with_context(|| {
            format!(
                "could not move '{}' to '{}'",
                entry.path().display(),
                dest.display()
            )
        })?;
    }
    fs::remove_dir_all(&template_dir)?;
    Ok(())
}

/// Rewrites the first `field: ...` line of a YAML file. Missing files are
/// logged and skipped so template layout drift does not brick the wizard.
fn rewrite_yaml_field(file: &Path, field: &str, value: &str) -> Result<()> {
    if !file.is_file() {
        log::warn!("'{}' not found; skipping rewrite.", file.display());
        return Ok(());
    }
    let pattern = Regex::new(&format!(r"(?m)^{field}:.*$"))
        .with_context(|| format!("field pattern for '{field}'"))?;
    let text = fs::read_to_string(file)?;
    let replacement = format!("{field}: {value}");
    let rewritten = pattern.replace(&text, regex::NoExpand(&replacement));
    fs::write(file, rewritten.as_bytes())?;
    Ok(())
}

fn regex_replace_in_file(file: &Path, pattern: &Regex, replacement: &str) -> Result<()> {
    if !file.is_file() {
        log::warn!("'{}' not found; skipping rewrite.", file.display());
        return Ok(());
    }
    let text = fs::read_to_string(file)?;
    let rewritten = pattern.replace_all(&text, regex::NoExpand(replacement));
    fs::write(file, rewritten.as_bytes())?;
    Ok(())
}

fn literal_replace_in_file(file: &Path, from: &str, to: &str) -> Result<()> {
    if !file.is_file() {
        log::debug!("'{}' not found; skipping rewrite.", file.display());
        return Ok(());
    }
    let text = fs::read_to_string(file)?;
    fs::write(file, text.replace(from, to).as_bytes())?;
    Ok(())
}

/// Renames the template's UI bundle after the project and repoints every
/// publish path that assumed the template layout.
fn adjust_ui_bundle(plan: &ProjectPlan, project_dir: &Path) -> Result<()> {
    let ui_dir = plan.root.join("UI");
    let bundle = ui_dir.join(format!("{TEMPLATE_UI_BUNDLE}.fairy"));
    if bundle.is_file() {
        let renamed = format!("{}.fairy", plan.codename);
        fs::rename(&bundle, ui_dir.join(&renamed))?;
        literal_replace_in_file(
            &project_dir.join("publish.yaml"),
            &format!("project: template/UI/{TEMPLATE_UI_BUNDLE}.fairy"),
            &format!("project: ../UI/{renamed}"),
        )?;
    } else {
        log::warn!("UI bundle '{}' not found; skipping rename.", bundle.display());
    }

    rewrite_publish_settings(&ui_dir.join("settings").join("Publish.json"))?;
    rewrite_i18n_settings(&ui_dir.join("settings").join("i18n.json"))?;

    // Asset packages carry template-relative export paths too.
    let assets_dir = ui_dir.join("assets");
    if assets_dir.is_dir() {
        for entry in fs::read_dir(&assets_dir)? {
            let package_xml = entry?.path().join("package.xml");
            literal_replace_in_file(&package_xml, "path=\"../../", "path=\"../project/")?;
            literal_replace_in_file(&package_xml, "codePath=\"../../", "codePath=\"../project/")?;
        }
    }
    Ok(())
}

fn repoint(value: &mut serde_json::Value) {
    if let Some(text) = value.as_str() {
        *value = serde_json::Value::String(text.replace("../../", "../project/"));
    }
}

fn rewrite_publish_settings(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Ok(());
    }
    let mut settings: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)
        .with_context(|| format!("could not parse '{}'", path.display()))?;
    if let Some(value) = settings.get_mut("path") {
        repoint(value);
    }
    if let Some(value) = settings
        .get_mut("codeGeneration")
        .and_then(|generation| generation.get_mut("codePath"))
    {
        repoint(value);
    }
    fs::write(path, serde_json::to_string_pretty(&settings)?)?;
    Ok(())
}

fn rewrite_i18n_settings(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Ok(());
    }
    let mut settings: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)
        .with_context(|| format!("could not parse '{}'", path.display()))?;
    if let Some(languages) = settings
        .get_mut("langFiles")
        .and_then(|files| files.as_array_mut())
    {
        for language in languages {
            if let Some(value) = language.get_mut("path") {
                repoint(value);
            }
        }
    }
    fs::write(path, serde_json::to_string_pretty(&settings)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_field_rewrite_touches_only_the_named_field() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.yaml");
        fs::write(&file, "name: old\nproject: kit\nappid: none\n").unwrap();

        rewrite_yaml_field(&file, "project", "dice-push").unwrap();

        let text = fs::read_to_string(&file).unwrap();
        assert!(text.contains("name: old"));
        assert!(text.contains("project: dice-push"));
        assert!(text.contains("appid: none"));
    }

    #[test]
    fn template_path_references_are_repointed() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(PROJECT_FILENAME);
        fs::write(&file, "develop:\n  command: node template/build.js\n").unwrap();

        regex_replace_in_file(&file, &TEMPLATE_PATH_RE, " ../").unwrap();

        let text = fs::read_to_string(&file).unwrap();
        assert!(text.contains("command: node ../build.js"));
    }

    #[test]
    fn relocation_moves_template_contents_to_the_root() {
        let root = tempfile::tempdir().unwrap();
        let project_dir = root.path().join("project");
        let template_dir = project_dir.join("template");
        fs::create_dir_all(template_dir.join("UI")).unwrap();
        fs::write(template_dir.join("readme.md"), "hi").unwrap();
        fs::write(template_dir.join("UI").join("kit.fairy"), "ui").unwrap();

        relocate_template(&project_dir, root.path()).unwrap();

        assert!(root.path().join("readme.md").is_file());
        assert!(root.path().join("UI").join("kit.fairy").is_file());
        assert!(!template_dir.exists());
    }

    #[test]
    fn publish_settings_become_project_relative() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Publish.json");
        fs::write(
            &file,
            r#"{"path":"../../assets","codeGeneration":{"codePath":"../../src/ui"}}"#,
        )
        .unwrap();

        rewrite_publish_settings(&file).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(value["path"], "../project/assets");
        assert_eq!(value["codeGeneration"]["codePath"], "../project/src/ui");
    }

    #[test]
    fn missing_optional_files_do_not_fail_the_wizard() {
        let dir = tempfile::tempdir().unwrap();
        assert!(rewrite_yaml_field(&dir.path().join("absent.yaml"), "name", "x").is_ok());
        assert!(rewrite_publish_settings(&dir.path().join("absent.json")).is_ok());
        assert!(literal_replace_in_file(&dir.path().join("absent.xml"), "a", "b").is_ok());
    }
}
