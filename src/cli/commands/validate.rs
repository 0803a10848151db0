//! `stepform validate` command - Validate a record file

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::load_draft;
use crate::cli::output::{render_field_errors, render_record};
use crate::cli::GlobalOpts;
use crate::core::{Config, Step};
use crate::schema::validator::{validate_all, validate_fields, FieldErrors};

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Record file (YAML or JSON), or `-` for stdin
    #[arg(default_value = "-")]
    pub file: PathBuf,

    /// Only validate the fields of this step (1, 2 or 3)
    #[arg(long, short = 's')]
    pub step: Option<Step>,

    /// Show the password in the normalized record
    #[arg(long)]
    pub show_password: bool,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = global.format.resolve(config.default_format.as_deref());
    let draft = load_draft(&args.file)?;

    let failed = match args.step {
        Some(step) => match validate_fields(&draft, step.fields()) {
            Ok(()) => {
                if format.is_structured() {
                    // An empty error map keeps structured output parseable
                    print!("{}", render_field_errors(&FieldErrors::new(), format)?);
                } else if !global.quiet {
                    println!(
                        "{} {} ({}) is valid",
                        style("✓").green(),
                        step,
                        step.name()
                    );
                }
                None
            }
            Err(errors) => Some(errors),
        },
        None => match validate_all(&draft) {
            Ok(record) => {
                let mask = config.mask_password() && !args.show_password;
                print!("{}", render_record(&record, format, mask)?);
                None
            }
            Err(errors) => Some(errors),
        },
    };

    let Some(errors) = failed else {
        return Ok(());
    };

    if format.is_structured() {
        print!("{}", render_field_errors(&errors, format)?);
    } else {
        println!(
            "{} {} - {} error(s)",
            style("✗").red(),
            args.file.display(),
            errors.len()
        );
        print!("{}", render_field_errors(&errors, format)?);
    }

    Err(miette::miette!("Validation failed"))
}
