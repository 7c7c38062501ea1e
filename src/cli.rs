use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetpdf")]
#[command(about = "Render a spreadsheet as a paginated landscape PDF report")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Used when no subcommand is given
    #[command(flatten)]
    pub convert: ConvertArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert the spreadsheet to a dated PDF (default)
    Convert(ConvertArgs),

    /// Show how the sheet would be split into pages
    Plan {
        /// Spreadsheet to inspect
        #[arg(short, long, default_value = "input.xlsx")]
        input: PathBuf,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Spreadsheet to convert; its first sheet is rendered
    #[arg(short, long, default_value = "input.xlsx")]
    pub input: PathBuf,

    /// Directory receiving <YYYY-MM-DD>.pdf
    #[arg(short, long, default_value = "out-files")]
    pub output_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["sheetpdf"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert_eq!(cli.convert.input, PathBuf::from("input.xlsx"));
        assert_eq!(cli.convert.output_dir, PathBuf::from("out-files"));
    }

    #[test]
    fn test_convert_flags_without_subcommand() {
        let cli =
            Cli::try_parse_from(["sheetpdf", "--input", "book.xlsx", "-o", "reports"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.convert.input, PathBuf::from("book.xlsx"));
        assert_eq!(cli.convert.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn test_convert_flags_conflict_with_subcommand() {
        assert!(Cli::try_parse_from(["sheetpdf", "--input", "book.xlsx", "plan"]).is_err());
    }

    #[test]
    fn test_convert_defaults() {
        let cli = Cli::try_parse_from(["sheetpdf", "convert"]).unwrap();
        match cli.command {
            Some(Commands::Convert(args)) => {
                assert_eq!(args.input, PathBuf::from("input.xlsx"));
                assert_eq!(args.output_dir, PathBuf::from("out-files"));
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_plan_json() {
        let cli = Cli::try_parse_from(["sheetpdf", "plan", "-v", "-i", "book.xlsx", "--json"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Plan { input, json }) => {
                assert_eq!(input, PathBuf::from("book.xlsx"));
                assert!(json);
            }
            _ => panic!("expected plan"),
        }
    }
}
