// src/cli/args.rs
use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)] // The dispatcher strips the action name first.
pub struct TreeArgs {
    /// Limit the output to one section (develop, publish or tools).
    pub section: Option<String>,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct RunArgs {
    /// The node to run, as `<section>/<label>/...` (e.g. `develop/Build`).
    pub node: String,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct EditArgs {
    /// The node to locate in the manifest, as `<section>/<label>/...`.
    pub node: String,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct WatchArgs {}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct CreateArgs {
    /// Git URL of the project's own repository. Asked interactively when
    /// omitted.
    pub repo: Option<String>,

    /// Directory to create the project in. Must be empty. Defaults to the
    /// current directory.
    #[arg(long)]
    pub dir: Option<String>,

    /// Project display name.
    #[arg(long)]
    pub name: Option<String>,

    /// Project codename (A-Za-z0-9_- only). Defaults to the repo basename.
    #[arg(long)]
    pub codename: Option<String>,

    /// Backend-assigned appid. May be left empty.
    #[arg(long)]
    pub appid: Option<String>,
}
