use clap::Parser;
use miette::Result;
use stepform::cli::{Cli, Commands, GlobalOpts};
use tracing_subscriber::EnvFilter;

/// Env var holding a tracing filter directive, e.g. `stepform=debug`
const LOG_ENV: &str = "STEPFORM_LOG";

fn init_logging(global: &GlobalOpts) {
    let default_directive = if global.verbose {
        "stepform=debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // Logs go to stderr so summaries on stdout stay pipeable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logging(&global);

    match cli.command {
        Commands::Run(args) => stepform::cli::commands::run::run(args, &global),
        Commands::Script(args) => stepform::cli::commands::script::run(args, &global),
        Commands::Validate(args) => stepform::cli::commands::validate::run(args, &global),
        Commands::Steps(args) => stepform::cli::commands::steps::run(args, &global),
        Commands::Config(cmd) => stepform::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => stepform::cli::commands::completions::run(args),
    }
}
