use std::io::Write;

use log::{debug, info, warn};

use eval::{Example, instantiate_examples};
use exp::exp::build;
use exp::{Exp, FreeVars, Var};
use printer::Print;
use verify::Oracle;

use crate::adapt::{CheckedBuilder, VarElimBuilder, can_elim_var, fixup_binders};
use crate::build::Build;
use crate::config::SynthConfig;
use crate::cost::{Cost, CostModel};
use crate::learner::{Learner, Rewrite};
use crate::result::SynthError;

/// One synthesis job: the query expression to improve, the assumptions
/// it may rely on, the binder pool, optional seed hints and examples.
pub struct Job {
    pub target: Exp,
    pub assumptions: Exp,
    pub binders: Vec<Var>,
    pub hints: Vec<Exp>,
    pub examples: Vec<Example>,
}

impl Job {
    pub fn new(target: Exp, assumptions: Exp) -> Job {
        Job { target, assumptions, binders: Vec::new(), hints: Vec::new(), examples: Vec::new() }
    }

    pub fn with_binders(mut self, binders: Vec<Var>) -> Job {
        self.binders = binders;
        self
    }

    pub fn with_hints(mut self, hints: Vec<Exp>) -> Job {
        self.hints = hints;
        self
    }

    pub fn with_examples(mut self, examples: Vec<Example>) -> Job {
        self.examples = examples;
        self
    }
}

/// The caller-facing driver wrapping the learner in the refinement
/// loop: candidate rewrites from the learner are checked by the oracle;
/// counter-examples grow the example set and restart the learner, while
/// verified, strictly cheaper targets are yielded to the caller.
pub struct Synthesizer<'a> {
    target: Exp,
    assumptions: Exp,
    vars: Vec<Var>,
    binders: Vec<Var>,
    examples: Vec<Example>,
    learner: Learner<'a>,
    oracle: &'a dyn Oracle,
    cost_model: &'a dyn CostModel,
    testcase_sink: Option<Box<dyn Write>>,
    done: bool,
}

/// Start a synthesis run. The returned `Synthesizer` yields a lazy
/// sequence of replacement targets, each verified equivalent to the
/// query it started from under the assumptions and strictly cheaper
/// than its predecessor.
pub fn improve<'a>(
    job: Job,
    cost_model: &'a dyn CostModel,
    builder: &'a dyn Build,
    oracle: &'a dyn Oracle,
    stop: &'a dyn Fn() -> bool,
    config: SynthConfig,
) -> Result<Synthesizer<'a>, SynthError> {
    let Job { target, assumptions, binders, hints, examples } = job;
    let target = fixup_binders(&target, &binders)?;

    let mut vars: Vec<Var> = target.free_vars().into_iter().collect();
    for v in assumptions.free_vars() {
        if !vars.contains(&v) {
            vars.push(v);
        }
    }
    vars.sort();

    let mut illegal_vars = Vec::new();
    for v in &vars {
        match can_elim_var(&target, &assumptions, v, oracle) {
            Ok(true) => illegal_vars.push(v.clone()),
            Ok(false) => {}
            Err(err) => debug!("cannot decide relevance of {}: {err}", v.id),
        }
    }

    let checked = CheckedBuilder::new(builder, binders.clone(), assumptions.clone(), oracle);
    let chain = VarElimBuilder::new(checked, illegal_vars);

    let mut legal_free_vars = vars.clone();
    legal_free_vars.extend(binders.iter().cloned());

    let instantiated = instantiate_examples(&examples, &vars, &binders);
    let learner = Learner::new(
        target.clone(),
        legal_free_vars,
        instantiated,
        cost_model,
        chain,
        stop,
        hints,
        config.hyperaggressive_eviction,
    );

    Ok(Synthesizer {
        target,
        assumptions,
        vars,
        binders,
        examples,
        learner,
        oracle,
        cost_model,
        testcase_sink: config.testcase_sink,
        done: false,
    })
}

impl Synthesizer<'_> {
    /// The current (most recently accepted) target.
    pub fn target(&self) -> &Exp {
        &self.target
    }

    /// The accumulated counter-example set.
    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Block until the next verified improvement, `Ok(None)` when the
    /// search has converged.
    pub fn next_improvement(&mut self) -> Result<Option<Exp>, SynthError> {
        if self.done {
            return Ok(None);
        }
        loop {
            let rewrite = match self.learner.next() {
                Ok(rewrite) => rewrite,
                Err(SynthError::NoMoreImprovements) => {
                    self.done = true;
                    return Ok(None);
                }
                Err(err) => {
                    self.done = true;
                    return Err(err);
                }
            };

            let new_target = self.target.replace_at(&rewrite.path, rewrite.new.clone())?;
            if !new_target.free_vars().iter().all(|v| self.vars.contains(v)) {
                warn!(
                    "candidate {} has out-of-scope free variables",
                    new_target.print_to_string(None)
                );
                continue;
            }

            info!(
                "found candidate replacement [{}] for [{}]",
                rewrite.new.print_to_string(None),
                rewrite.old.print_to_string(None)
            );

            let phi = build::and(
                self.assumptions.clone(),
                build::not(build::equal(self.target.clone(), new_target.clone())),
            );
            match self.oracle.satisfy(&phi, &self.vars) {
                Err(err) => {
                    // cannot decide equivalence: conservatively reject
                    debug!("oracle failed on candidate: {err}");
                    continue;
                }
                Ok(Some(counterexample)) => {
                    info!("new example: {}", counterexample.print_to_string(None));
                    self.examples.push(counterexample);
                    let instantiated =
                        instantiate_examples(&self.examples, &self.vars, &self.binders);
                    info!(
                        "restarting with {} examples ({} post-instantiation)",
                        self.examples.len(),
                        instantiated.len()
                    );
                    self.learner.reset(instantiated, true);
                }
                Ok(None) => {
                    let old_cost = self.cost_model.cost(&self.target);
                    let new_cost = self.cost_model.cost(&new_target);
                    if new_cost > old_cost {
                        self.report_inversion(&rewrite, &new_target, old_cost, new_cost);
                        continue;
                    }
                    if new_cost == old_cost {
                        continue;
                    }
                    info!(
                        "improvement: {} -----> {}",
                        rewrite.old.print_to_string(None),
                        rewrite.new.print_to_string(None)
                    );
                    info!("cost: {old_cost} -----> {new_cost}");
                    self.learner.watch(new_target.clone());
                    self.target = new_target.clone();
                    return Ok(Some(new_target));
                }
            }
        }
    }

    /// A verified-equivalent rewrite made the whole target more
    /// expensive: the cost model is not monotonic for this substitution.
    /// A quality signal about the cost model, not an error.
    fn report_inversion(&mut self, rewrite: &Rewrite, new_target: &Exp, old: Cost, new: Cost) {
        warn!(
            "cost inversion: replacing [{}] with [{}] raised the target cost from {old} to {new}",
            rewrite.old.print_to_string(None),
            rewrite.new.print_to_string(None),
        );
        if let Some(sink) = &mut self.testcase_sink {
            let report = write_inversion(
                sink.as_mut(),
                self.cost_model.name(),
                rewrite,
                &self.target,
                new_target,
                old,
                new,
            );
            if let Err(err) = report {
                warn!("failed to record cost inversion: {err}");
            }
        }
    }
}

fn write_inversion(
    sink: &mut dyn Write,
    cost_model: &str,
    rewrite: &Rewrite,
    target: &Exp,
    new_target: &Exp,
    old: Cost,
    new: Cost,
) -> std::io::Result<()> {
    writeln!(sink, "cost model: {cost_model}")?;
    writeln!(sink, "old fragment: {}", rewrite.old.print_to_string(None))?;
    writeln!(sink, "new fragment: {}", rewrite.new.print_to_string(None))?;
    writeln!(sink, "target: {}", target.print_to_string(None))?;
    writeln!(sink, "new target: {}", new_target.print_to_string(None))?;
    writeln!(sink, "cost: {old} -> {new}")?;
    writeln!(sink)
}

impl Iterator for Synthesizer<'_> {
    type Item = Result<Exp, SynthError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_improvement() {
            Ok(Some(e)) => Some(Ok(e)),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
