use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use kronos::{config::Config, default_table, render_page, telemetry::init_tracing, PageQuery};

#[derive(Parser)]
#[command(name = "kronos", version)]
#[command(about = "Detainee listing in the terminal or as HTML", long_about = None)]
#[command(after_help = "\
Environment:
  KRONOS_CONFIG     JSON config file
  KRONOS_PAGE_SIZE  Rows per page (default 10)
  RUST_LOG          Log filter for the render command")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Browse the listing in the terminal (default)
    Tui,
    /// Print the listing page as HTML
    Render(RenderArgs),
}

#[derive(Args, Debug, Default)]
struct RenderArgs {
    /// Page to print, starting at 1 like the on-screen counter
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    page: Option<u64>,

    /// Comma-separated column ids to hide
    #[arg(long, value_name = "IDS")]
    hide: Option<String>,

    /// Column id to sort by
    #[arg(long, value_name = "ID")]
    sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Rows per page, overriding the configured size
    #[arg(long)]
    size: Option<usize>,
}

impl RenderArgs {
    fn to_query(&self) -> PageQuery {
        PageQuery {
            page: self.page.map(|page| (page - 1).to_string()),
            size: self.size.map(|size| size.to_string()),
            hidden: self.hide.clone(),
            sort: self.sort.clone(),
            desc: self.desc.then(|| "1".to_string()),
            q: None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Command::Tui) => run_ui_mode(),
        Some(Command::Render(args)) => run_render(&args),
    }
}

fn run_render(args: &RenderArgs) -> Result<()> {
    init_tracing()?;

    let config = Config::from_env()?;
    let query = args.to_query();

    let mut table = default_table();
    table.set_page_size(config.page_size)?;
    query.apply(&mut table);

    print!("{}", render_page(&table, &query));
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    let config = Config::from_env()?;

    let mut table = default_table();
    table.set_page_size(config.page_size)?;

    let mut app = kronos::ui::App::new(table);
    kronos::ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or render HTML: kronos render");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn render_args(argv: &[&str]) -> RenderArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Some(Command::Render(args)) => args,
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_tui() {
        let cli = Cli::try_parse_from(["kronos"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["kronos", "tui"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Tui)));
    }

    #[test]
    fn test_render_args() {
        let args = render_args(&["kronos", "render", "--page", "2", "--hide", "cela,crimes"]);
        let query = args.to_query();

        assert_eq!(query.page.as_deref(), Some("1"));
        assert_eq!(query.hidden_columns(), vec!["cela", "crimes"]);
        assert_eq!(query.sorting(), None);
    }

    #[test]
    fn test_render_sort_and_size() {
        let args = render_args(&[
            "kronos", "render", "--sort", "nome", "--desc", "--size", "3",
        ]);
        let query = args.to_query();

        assert_eq!(query.size.as_deref(), Some("3"));
        assert_eq!(query.desc.as_deref(), Some("1"));

        let mut table = default_table();
        query.apply(&mut table);
        assert_eq!(table.state().page_size(), 3);
        assert_eq!(table.state().sorting().map(|s| s.descending), Some(true));
    }

    #[test]
    fn test_render_args_errors() {
        assert!(Cli::try_parse_from(["kronos", "render", "--page"]).is_err());
        assert!(Cli::try_parse_from(["kronos", "render", "--page", "0"]).is_err());
        assert!(Cli::try_parse_from(["kronos", "render", "--page", "two"]).is_err());
        assert!(Cli::try_parse_from(["kronos", "render", "--color", "red"]).is_err());
        assert!(Cli::try_parse_from(["kronos", "render", "--desc"]).is_err());
        assert!(Cli::try_parse_from(["kronos", "serve"]).is_err());
    }

    #[test]
    fn test_help_lists_render_options() {
        let mut cmd = Cli::command();
        let render = cmd.find_subcommand_mut("render").unwrap();
        let help = render.render_long_help().to_string();

        for flag in ["--page", "--hide", "--sort", "--desc", "--size"] {
            assert!(help.contains(flag), "missing {flag}");
        }
    }
}
