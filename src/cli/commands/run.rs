//! `stepform run` command - Interactive registration wizard

use console::{style, Term};
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::load_draft;
use crate::cli::output::render_summary;
use crate::cli::GlobalOpts;
use crate::core::{Config, Draft, StepController};
use crate::schema::wizard::{FormWizard, WizardOutcome};

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Pre-fill the form from a YAML/JSON record file
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Show the password in the final summary
    #[arg(long)]
    pub show_password: bool,
}

pub fn run(args: RunArgs, global: &GlobalOpts) -> Result<()> {
    if !Term::stdout().is_term() {
        return Err(miette::miette!(
            help = "Use `stepform script <file>` to drive the form non-interactively",
            "`stepform run` needs an interactive terminal"
        ));
    }

    let config = Config::load();
    let format = global.format.resolve(config.default_format.as_deref());

    let draft = match &args.input {
        Some(path) => load_draft(path)?,
        None => Draft::new(),
    };
    let mut controller = StepController::with_draft(draft);

    match FormWizard::new().run(&mut controller)? {
        WizardOutcome::Cancelled => Ok(()),
        WizardOutcome::Submitted => {
            let state = controller.state();
            let record = controller
                .record()
                .ok_or_else(|| miette::miette!("Form reported submission without a record"))?;
            println!();
            print!(
                "{}",
                render_summary(record, state.submitted_at, format, &config, args.show_password)?
            );
            if !global.quiet && format.is_structured() {
                eprintln!("{} Done", style("✓").green());
            }
            Ok(())
        }
    }
}
