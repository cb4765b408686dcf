//! Command line surface

use std::time::Duration;

use clap::Parser;

use crate::core::filter::FilterSpec;
use crate::error::Result;
use crate::orchestrator::{Invocation, OrchestratorConfig};

#[derive(Parser, Debug)]
#[command(name = "kwinjump", version)]
#[command(about = "Activate or cycle through matching KWin windows, or launch a command")]
pub struct Args {
    /// Filter by window class (exact match)
    #[arg(short = 'f', long = "filter", value_name = "CLASS")]
    pub filter: Option<String>,

    /// Filter by window caption (regex, case-insensitive). Also `--fa`;
    /// the single-dash `-fa` spelling is not accepted
    #[arg(short = 'a', long = "filter-alternative", visible_alias = "fa", value_name = "REGEX")]
    pub filter_alternative: Option<String>,

    /// Filter by window class using regex. Also `--fr`; the single-dash
    /// `-fr` spelling is not accepted
    #[arg(short = 'r', long = "filter-regex", visible_alias = "fr", value_name = "REGEX")]
    pub filter_regex: Option<String>,

    /// Only consider windows on the current virtual desktop
    #[arg(short = 'd', long)]
    pub current_desktop: bool,

    /// Toggle minimize when the window is already active
    #[arg(short = 't', long)]
    pub toggle: bool,

    /// Command to run when no matching window is found
    #[arg(short = 'c', long, value_name = "COMMAND")]
    pub command: Option<String>,

    /// How long to wait for KWin to report back
    #[arg(long, value_name = "MS", default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Delay before stopping the script when nothing waits on it
    #[arg(long, value_name = "MS", default_value_t = 150)]
    pub teardown_delay_ms: u64,

    /// Shell that runs the fallback command with `-c`
    #[arg(long, value_name = "PATH", default_value = crate::orchestrator::DEFAULT_SHELL)]
    pub shell: String,

    /// Print the rendered KWin script and exit without contacting KWin
    #[arg(long)]
    pub print_script: bool,
}

impl Args {
    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec::new(
            self.filter.clone(),
            self.filter_alternative.clone(),
            self.filter_regex.clone(),
        )
        .with_current_desktop_only(self.current_desktop)
        .with_toggle_on_active(self.toggle)
    }

    pub fn invocation(&self) -> Invocation {
        Invocation::new(self.filter_spec(), self.command.as_deref())
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            response_timeout: Duration::from_millis(self.timeout_ms),
            teardown_delay: Duration::from_millis(self.teardown_delay_ms),
            shell: self.shell.clone(),
        }
    }

    /// Reject unusable arguments before any host interaction
    pub fn validate(&self) -> Result<()> {
        self.filter_spec().validate()?;
        self.orchestrator_config().validate()
    }
}
