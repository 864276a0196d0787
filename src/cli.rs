//! Command-line interface definitions.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ls-exif")]
#[command(about = "An 'ls' companion displaying EXIF metadata columns")]
#[command(version)]
pub struct Args {
    /// The directory to list
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Display as a table instead of imitating `ls -l`
    #[arg(long)]
    pub tabular: bool,

    /// Descend into subdirectories recursively
    #[arg(short = 'R', long)]
    pub recursive: bool,

    /// Include entries whose name starts with a dot
    #[arg(short, long)]
    pub all: bool,

    /// Print sizes as KB/MB/GB
    #[arg(long)]
    pub human: bool,

    /// Write a text log file summarizing the listing
    #[arg(long)]
    pub log: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["ls-exif"]).unwrap();

        assert_eq!(args.path, PathBuf::from("."));
        assert!(!args.tabular);
        assert!(!args.recursive);
        assert!(!args.all);
        assert!(!args.human);
        assert!(!args.log);
    }

    #[test]
    fn test_flags() {
        let args =
            Args::try_parse_from(["ls-exif", "-R", "-a", "--tabular", "--human", "--log", "photos"])
                .unwrap();

        assert_eq!(args.path, PathBuf::from("photos"));
        assert!(args.tabular);
        assert!(args.recursive);
        assert!(args.all);
        assert!(args.human);
        assert!(args.log);
    }

    #[test]
    fn test_version_flag() {
        let err = Args::try_parse_from(["ls-exif", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_help_flag() {
        let err = Args::try_parse_from(["ls-exif", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
