use anyhow::Result;
use comfy_table::Table;
use timesheet_cli::pipeline::{ReconcileRequest, RunResult, load_labels, run};
use timesheet_model::{LabelConfig, LeaveCode, ReconcileOptions};
use tracing::info_span;

use crate::cli::{LeaveCodesArgs, LocaleArg, ReconcileArgs};
use crate::summary::apply_table_style;

fn builtin_labels(locale: LocaleArg) -> LabelConfig {
    match locale {
        LocaleArg::Georgian => LabelConfig::georgian(),
        LocaleArg::English => LabelConfig::english(),
    }
}

pub fn run_leave_codes(args: &LeaveCodesArgs) -> Result<()> {
    let labels = load_labels(args.labels.as_deref(), builtin_labels(args.locale))?;
    let mut table = Table::new();
    table.set_header(vec!["Category", "Label", "Short code"]);
    apply_table_style(&mut table);
    for code in LeaveCode::ALL {
        table.add_row(vec![
            format!("{code:?}"),
            code.label().to_string(),
            labels.short_code(code).to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_reconcile(args: &ReconcileArgs) -> Result<RunResult> {
    let span = info_span!("reconcile", base = %args.base.display());
    let _guard = span.enter();

    let labels = load_labels(args.labels.as_deref(), builtin_labels(args.locale))?;
    let options = ReconcileOptions::new()
        .with_labels(labels)
        .with_workday_hours(args.workday_hours)
        .with_anonymize(!args.no_anonymize);
    let request = ReconcileRequest {
        base: args.base.clone(),
        identity: args.identity.clone(),
        leave: args.leave.clone(),
        overrides: args.overrides.clone(),
        output: args.output.clone(),
        leave_grid_output: args.emit_leave_grid.clone(),
        options,
        dry_run: args.dry_run,
    };
    run(&request)
}
