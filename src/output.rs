/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Output handler for consistent formatting
///
/// Progress goes to stderr so the JSON summary on stdout stays clean.
pub struct Output {
    pub format: OutputFormat,
    pub verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Print a status message (action: target)
    pub fn status(&self, action: &str, target: &str) {
        if self.format == OutputFormat::Human {
            // Right-align action in 12 chars, like cargo does
            eprintln!("{:>12} {}", action, target);
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.format == OutputFormat::Human {
            eprintln!("{:>12} {}", "Done", message);
        }
    }

    /// Print a verbose message (only if verbose mode is on)
    pub fn verbose(&self, message: &str) {
        if self.verbose && self.format == OutputFormat::Human {
            eprintln!("{}", message);
        }
    }
}

/// Print an error message to stderr
pub fn print_error(err: &anyhow::Error) {
    eprintln!("error: {}", err);

    // Print cause chain
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {}", cause);
    }
}
