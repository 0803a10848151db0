//! `stepform steps` command - Describe the form layout

use miette::Result;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::output::render_serialized;
use crate::cli::GlobalOpts;
use crate::core::{Config, Field, Step};
use crate::schema::validator::constraint;

#[derive(clap::Args, Debug)]
pub struct StepsArgs {
    /// Only describe this step (1, 2 or 3)
    #[arg(long, short = 's')]
    pub step: Option<Step>,
}

/// One row of the layout description
#[derive(Debug, Serialize)]
pub struct FieldRow {
    pub step: u8,
    pub step_name: &'static str,
    pub field: Field,
    pub label: &'static str,
    pub constraint: String,
}

/// Rows for the requested steps, in form order
pub fn field_rows(only: Option<Step>) -> Vec<FieldRow> {
    Step::all()
        .iter()
        .filter(|step| only.map_or(true, |s| s == **step))
        .flat_map(|step| {
            step.fields().iter().map(move |field| FieldRow {
                step: step.number(),
                step_name: step.name(),
                field: *field,
                label: field.label(),
                constraint: constraint(*field).describe(),
            })
        })
        .collect()
}

pub fn run(args: StepsArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = global.format.resolve(config.default_format.as_deref());
    let rows = field_rows(args.step);

    if format.is_structured() {
        print!("{}", render_serialized(&rows, format)?);
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["Step", "Name", "Field", "Label", "Constraint"]);
    for row in &rows {
        builder.push_record([
            row.step.to_string(),
            row.step_name.to_string(),
            row.field.to_string(),
            row.label.to_string(),
            row.constraint.clone(),
        ]);
    }
    println!("{}", builder.build().with(Style::markdown()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_rows_all() {
        let rows = field_rows(None);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].field, Field::Firstname);
        assert_eq!(rows[5].field, Field::Password);
        assert_eq!(rows[3].constraint, "exactly 11 characters, digits only");
    }

    #[test]
    fn test_field_rows_single_step() {
        let rows = field_rows(Some(Step::Contact));
        let fields: Vec<Field> = rows.iter().map(|r| r.field).collect();
        assert_eq!(fields, vec![Field::Email, Field::Phone]);
        assert!(rows.iter().all(|r| r.step == 2 && r.step_name == "Contact Information"));
    }
}
