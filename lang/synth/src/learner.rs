use std::collections::VecDeque;

use log::{debug, trace};

use eval::{Env, Eval, Fingerprint, fingerprint};
use exp::{Exp, FreeVars, Path, Var, enumerate_fragments};
use printer::Print;

use crate::adapt::VarElimBuilder;
use crate::classes::Classes;
use crate::cost::{Cost, CostModel};
use crate::result::SynthError;

/// A candidate rewrite: replacing the watched sub-expression `old` (at
/// `path` in the current target) by the observationally equal `new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub old: Exp,
    pub new: Exp,
    pub path: Path,
}

/// A watched sub-expression of the target: its replacement path, cost,
/// fingerprint, and the per-example guard mask derived from its
/// path-conditions.
struct WatchedExp {
    exp: Exp,
    path: Path,
    cost: Cost,
    fp: Fingerprint,
    mask: Vec<bool>,
}

/// The core search loop: enumerates candidates size by size through the
/// builder adapter chain, classifies them against the seen table, evicts
/// dominated expressions, and yields a `Rewrite` whenever a candidate
/// matches a watched sub-expression of the target.
pub struct Learner<'a> {
    legal_free_vars: Vec<Var>,
    stop: &'a dyn Fn() -> bool,
    cost_model: &'a dyn CostModel,
    builder: VarElimBuilder<'a>,
    hyperaggressive: bool,
    classes: Classes,
    current_size: usize,
    queue: VecDeque<Result<Exp, SynthError>>,
    last_progress: usize,
    examples: Vec<Env>,
    target: Exp,
    roots: Vec<Exp>,
    hints: Vec<Exp>,
    watched: Vec<WatchedExp>,
    cost_ceiling: Cost,
}

impl<'a> Learner<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        target: Exp,
        legal_free_vars: Vec<Var>,
        examples: Vec<Env>,
        cost_model: &'a dyn CostModel,
        builder: VarElimBuilder<'a>,
        stop: &'a dyn Fn() -> bool,
        hints: Vec<Exp>,
        hyperaggressive: bool,
    ) -> Learner<'a> {
        let cost_ceiling = cost_model.cost(&target);
        let mut learner = Learner {
            legal_free_vars,
            stop,
            cost_model,
            builder,
            hyperaggressive,
            classes: Classes::new(),
            current_size: 0,
            queue: VecDeque::new(),
            last_progress: 0,
            examples,
            target: target.clone(),
            roots: Vec::new(),
            hints,
            watched: Vec::new(),
            cost_ceiling,
        };
        learner.watch(target);
        learner
    }

    /// Clear the cache, the seen table and the size progression, keeping
    /// the current target. Called when the example set grows.
    pub fn reset(&mut self, examples: Vec<Env>, update_watched: bool) {
        self.classes = Classes::new();
        self.current_size = 0;
        self.queue.clear();
        self.last_progress = 0;
        self.examples = examples;
        if update_watched {
            self.update_watched();
        }
    }

    /// Re-seat the learner on a new target: recompute the watched
    /// sub-expressions and roots, and purge everything the lowered cost
    /// ceiling rules out (monotonic cost models only).
    pub fn watch(&mut self, new_target: Exp) {
        let mut roots: Vec<Exp> = Vec::new();
        for e in new_target.sub_exps() {
            if roots.contains(e) {
                continue;
            }
            if !e.free_vars().iter().all(|v| self.legal_free_vars.contains(v)) {
                continue;
            }
            if fingerprint(e, &self.examples).is_err() {
                continue;
            }
            roots.push(e.clone());
        }
        self.roots = roots;
        self.target = new_target;
        self.update_watched();
        if self.cost_model.is_monotonic() {
            let evicted = self.classes.purge_above(self.cost_ceiling);
            if evicted > 0 {
                debug!("evicted {evicted} expressions above cost ceiling {}", self.cost_ceiling);
            }
        }
    }

    pub fn examples(&self) -> &[Env] {
        &self.examples
    }

    fn update_watched(&mut self) {
        self.cost_ceiling = self.cost_model.cost(&self.target);
        self.watched.clear();
        for frag in enumerate_fragments(&self.target) {
            if !frag.exp.free_vars().iter().all(|v| self.legal_free_vars.contains(v)) {
                continue;
            }
            let cost = self.cost_model.cost(&frag.exp);
            let fp = match fingerprint(&frag.exp, &self.examples) {
                Ok(fp) => fp,
                Err(err) => {
                    debug!("unable to watch {}: {err}", frag.exp.print_to_string(None));
                    continue;
                }
            };
            let mask = match guard_mask(&frag.assumptions, &self.examples) {
                Ok(mask) => mask,
                Err(err) => {
                    debug!("unable to watch {}: {err}", frag.exp.print_to_string(None));
                    continue;
                }
            };
            self.watched.push(WatchedExp { exp: frag.exp, path: frag.path, cost, fp, mask });
        }
    }

    /// Run the search until a candidate rewrite for some watched
    /// sub-expression is found.
    ///
    /// Errors: `Stopped` when the stop callback fires,
    /// `NoMoreImprovements` when the progress heuristic detects that no
    /// recent size added anything to the cache, and fatal builder errors.
    pub fn next(&mut self) -> Result<Rewrite, SynthError> {
        loop {
            while let Some(item) = self.queue.pop_front() {
                if (self.stop)() {
                    return Err(SynthError::Stopped);
                }
                let e = item?;
                let cost = self.cost_model.cost(&e);

                if self.cost_model.is_monotonic() && cost > self.cost_ceiling {
                    trace!("too expensive: {}", e.print_to_string(None));
                    continue;
                }

                let fp = match fingerprint(&e, &self.examples) {
                    Ok(fp) => fp,
                    Err(err) => {
                        trace!("cannot classify {}: {err}", e.print_to_string(None));
                        continue;
                    }
                };

                let size = self.current_size;
                let prev = self
                    .classes
                    .lookup(&fp)
                    .map(|class| (class.cost, class.members.iter().any(|(m, _)| *m == e)));
                match prev {
                    None => {
                        self.classes.insert_new(fp.clone(), e.clone(), size, cost);
                        self.last_progress = size;
                        trace!("new: {}", e.print_to_string(None));
                    }
                    Some((_, true)) => {
                        trace!("duplicate: {}", e.print_to_string(None));
                        continue;
                    }
                    Some((prev_cost, false)) if cost == prev_cost => {
                        self.classes.append_equivalent(&fp, e.clone(), size);
                        self.last_progress = size;
                        trace!("equivalent: {}", e.print_to_string(None));
                    }
                    Some((prev_cost, false)) if cost < prev_cost => {
                        let evicted = self.classes.replace_better(fp.clone(), e.clone(), size, cost);
                        if self.hyperaggressive {
                            let examples = &self.examples;
                            for (prev_exp, _) in &evicted {
                                let n = self
                                    .classes
                                    .evict_containing(prev_exp, |x| fingerprint(x, examples).ok());
                                if n > 0 {
                                    trace!(
                                        "evicted {n} expressions containing {}",
                                        prev_exp.print_to_string(None)
                                    );
                                }
                            }
                        }
                        self.last_progress = size;
                        trace!("better: {}", e.print_to_string(None));
                    }
                    Some(_) => {
                        trace!("worse: {}", e.print_to_string(None));
                        continue;
                    }
                }

                for w in &self.watched {
                    if w.exp == e || w.cost < cost {
                        continue;
                    }
                    if w.fp.agrees_with(&fp, &w.mask) {
                        return Ok(Rewrite { old: w.exp.clone(), new: e, path: w.path.clone() });
                    }
                }
            }

            if self.last_progress < (self.current_size + 1) / 2 {
                return Err(SynthError::NoMoreImprovements);
            }

            self.current_size += 1;
            self.fill_queue();
            debug!("minor iteration {}, |cache| = {}", self.current_size, self.classes.len());
        }
    }

    fn fill_queue(&mut self) {
        let mut items = self.builder.build(self.classes.cache(), self.current_size);
        if self.current_size == 1 {
            // hints and the target's own fragments are considered even
            // if the builder would not invent them
            items.extend(self.hints.iter().cloned().map(Ok));
            items.extend(self.roots.iter().cloned().map(Ok));
        }
        self.queue = items.into();
    }
}

fn guard_mask(assumptions: &[Exp], examples: &[Env]) -> Result<Vec<bool>, eval::EvalError> {
    let mut mask = Vec::with_capacity(examples.len());
    for ex in examples {
        let mut all_true = true;
        for a in assumptions {
            match a.eval(ex)?.as_bool() {
                Some(true) => {}
                _ => {
                    all_true = false;
                    break;
                }
            }
        }
        mask.push(all_true);
    }
    Ok(mask)
}
