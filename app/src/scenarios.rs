//! Built-in demo scenarios. The front-end that parses whole data-
//! structure specifications lives upstream, so the demo jobs are built
//! programmatically.

use eval::Env;
use exp::exp::build::*;
use exp::{Type, Value, Var};
use synth::{
    Build, CardinalityCost, CostModel, Job, SizeCost, SyntaxBuilder, SyntaxOps, guess_hints,
    harvest_roots,
};

pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
}

pub fn all() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "trivial-filter",
            description: "a filter whose predicate is always true folds away",
        },
        Scenario {
            name: "reflexive-filter",
            description: "a filter comparing each element with itself folds away",
        },
        Scenario {
            name: "count",
            description: "summing ones over a bag becomes the length primitive",
        },
        Scenario {
            name: "indexed-lookup",
            description: "a linear membership scan becomes a precomputed map lookup",
        },
        Scenario {
            name: "irrelevant-arg",
            description: "an argument pinned by the assumptions is eliminated",
        },
    ]
}

type Prepared = (Job, Box<dyn Build>, Box<dyn CostModel>);

pub fn prepare(name: &str) -> Option<Prepared> {
    let xs = Var::new("xs", Type::bag(Type::Int));
    let b = Var::new("b", Type::Int);

    match name {
        "trivial-filter" => {
            let target = filter(var(&xs), lam(b.clone(), bool_lit(true)));
            let job = Job::new(target, bool_lit(true)).with_binders(vec![b.clone()]);
            let builder = SyntaxBuilder::new(vec![xs], vec![b]);
            Some((job, Box::new(builder), Box::new(SizeCost)))
        }
        "reflexive-filter" => {
            let target = filter(var(&xs), lam(b.clone(), equal(var(&b), var(&b))));
            let job = Job::new(target, bool_lit(true)).with_binders(vec![b.clone()]);
            let builder = SyntaxBuilder::new(vec![xs], vec![b]);
            Some((job, Box::new(builder), Box::new(SizeCost)))
        }
        "count" => {
            let target = sum(map(var(&xs), lam(b.clone(), num(1))));
            let job = Job::new(target, bool_lit(true)).with_binders(vec![b.clone()]);
            let builder = SyntaxBuilder::new(vec![xs], vec![b]);
            Some((job, Box::new(builder), Box::new(SizeCost)))
        }
        "indexed-lookup" => {
            let k = Var::new("k", Type::Int);
            let g = Var::new("g", Type::bag(Type::Int));
            let scan = filter(var(&xs), lam(b.clone(), equal(var(&b), var(&k))));
            let target = gt(len(scan), num(0));

            let mut seed = Env::new();
            seed.bind("xs", Value::bag(vec![Value::Int(1), Value::Int(2)]));
            seed.bind("k", Value::Int(1));

            let roots = harvest_roots(&target, std::slice::from_ref(&xs));
            let hints = guess_hints(std::slice::from_ref(&xs), &roots, &[b.clone(), g.clone()]);

            let job = Job::new(target, bool_lit(true))
                .with_binders(vec![b.clone(), g.clone()])
                .with_hints(hints)
                .with_examples(vec![seed]);

            let mut builder = SyntaxBuilder::new(vec![xs, k], vec![b, g]);
            builder.literals = Vec::new();
            builder.ops = SyntaxOps {
                unops: Vec::new(),
                binops: Vec::new(),
                filters: false,
                flat_maps: false,
                make_maps: true,
            };
            Some((job, Box::new(builder), Box::new(CardinalityCost::default())))
        }
        "irrelevant-arg" => {
            let x = Var::new("x", Type::Int);
            let y = Var::new("y", Type::Int);
            let target = add(var(&x), var(&y));
            let job = Job::new(target, equal(var(&x), num(0)));
            let builder = SyntaxBuilder::new(vec![x, y], vec![]);
            Some((job, Box::new(builder), Box::new(SizeCost)))
        }
        _ => None,
    }
}
