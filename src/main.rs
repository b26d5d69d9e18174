use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use civd::logging;
use civd::tasks::PrequentialEvaluator;
use civd::ui::cli::args::{Cli, Command, SchemaSection};
use civd::ui::cli::status::StatusLine;
use civd::ui::types::build::{build_evaluator, build_learner, build_stream};
use civd::ui::types::choices::{PrequentialParams, TaskChoice};

const REPAINT: Duration = Duration::from_millis(150);

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Schema(args) => print_schema(args.section),
        Command::Run(args) => match args.into_task_choice()? {
            TaskChoice::EvaluatePrequential(p) => run_prequential(p),
        },
    }
}

fn print_schema(section: SchemaSection) -> Result<()> {
    let text =
        serde_json::to_string_pretty(&section.schema()).context("failed to render schema")?;
    println!("{text}");
    Ok(())
}

fn run_prequential(p: PrequentialParams) -> Result<()> {
    p.validate()?;

    let stream = build_stream(p.stream).context("failed to build stream")?;
    let evaluator = build_evaluator(p.evaluator).context("failed to build evaluator")?;
    let learner = build_learner(p.learner).context("failed to build learner")?;

    let status = StatusLine::new(p.max_instances, p.max_seconds);
    let banner = status.banner(
        "Prequential evaluation",
        p.sample_frequency,
        p.mem_check_frequency,
    );
    let (tx, rx) = mpsc::channel();
    let painter = thread::spawn(move || status.render(rx, &banner, REPAINT));

    let mut runner = PrequentialEvaluator::new(
        learner,
        stream,
        evaluator,
        p.max_instances,
        p.max_seconds,
        p.sample_frequency,
        p.mem_check_frequency,
    )
    .context("failed to set up prequential evaluation")?
    .with_progress(tx);

    let outcome = runner.run();
    runner.detach_progress();
    let _ = painter.join();
    outcome.context("evaluation failed")?;

    if let Some(out) = &p.curve {
        runner
            .curve()
            .export(&out.path, out.format)
            .with_context(|| format!("failed to write learning curve to {}", out.path.display()))?;
    }
    if p.show_model {
        match runner.learner().summary() {
            Some(summary) => println!("{summary}"),
            None => println!("(learner has no summary)"),
        }
    }
    Ok(())
}
