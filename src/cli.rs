use std::path::PathBuf;

/// Options parsed from command line arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub watch_sources: bool,
    pub reset_on_filter_change: bool,
    pub sources: Vec<PathBuf>,
}

impl CliOptions {
    /// Parse command line arguments
    /// Format: logscope [options] [--] <source.jsonl>...
    /// Options:
    ///   -w                        Reload sources when they change on disk
    ///   --reset-on-filter-change  Clear loaded logs whenever a filter changes
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::parse(&args)
    }

    /// Parse from a given argument list
    pub fn parse(args: &[String]) -> Self {
        let mut opts = Self::default();
        let mut positional_only = false;

        for arg in args.iter().skip(1) {
            match arg.as_str() {
                "--" if !positional_only => positional_only = true,
                "-w" | "--watch" if !positional_only => opts.watch_sources = true,
                "--reset-on-filter-change" if !positional_only => {
                    opts.reset_on_filter_change = true
                }
                other if !positional_only && other.starts_with('-') => {
                    tracing::warn!("Ignoring unknown option: {other}");
                }
                source => opts.sources.push(PathBuf::from(source)),
            }
        }

        if opts.sources.is_empty() {
            tracing::warn!(
                "No log sources specified. Usage: logscope [options] [--] <source.jsonl>..."
            );
        }

        tracing::info!(
            "Parsed CLI options: sources={:?}, watch={}, reset_on_filter_change={}",
            opts.sources,
            opts.watch_sources,
            opts.reset_on_filter_change
        );

        opts
    }
}
