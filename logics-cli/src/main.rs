mod cli;
mod error;
mod szs;

use clap::Parser;
use cli::{Cli, Command, Engine, Stats};
use error::Error;
use log::info;
use logics::nd::{self, Derivation, Solver};
use logics::sequent::{Sequent, SequentCalculus};
use logics::tableaux::{self, meta::MetaLabel, Entry, MetaSystem, Tableaux};
use logics::{Inference, Language, Node};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt::Display;

/// Contents of a problem file.
#[derive(Deserialize)]
struct Problem<G, P> {
    goal: Option<G>,
    proof: Option<P>,
    #[serde(default)]
    premises: Vec<Sequent>,
}

impl<G, P> Problem<G, P> {
    fn goal(&self) -> Result<&G, Error> {
        let e = "the problem does not contain a goal";
        self.goal.as_ref().ok_or_else(|| Error::new(szs::InputError, e.into()))
    }

    fn proof(&self) -> Result<&P, Error> {
        let e = "checking requires the problem to contain a proof";
        self.proof.as_ref().ok_or_else(|| Error::new(szs::InputError, e.into()))
    }
}

fn main() {
    use env_logger::Env;
    // log warnings and errors by default, do not print timestamps
    env_logger::Builder::from_env(Env::default().filter_or("LOG", "warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let result = run(&cli);
    if let Err(e) = result {
        print!("{}", szs::Status(e.get_kind()));
        if let Some(e) = e.get_error() {
            if let Err(e) = cli.output(e) {
                log::error!("could not write output: {}", e)
            }
        };
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let input = std::fs::read_to_string(&cli.file)?;
    match cli.engine {
        Engine::Nd => natural_deduction(cli, &input),
        Engine::Tableaux => {
            let sys = tableau_system(cli.system("classical"))?;
            let sys = if cli.invertible { sys.invertible() } else { sys };
            tableau::<_, Entry, Inference>(cli, &sys, &input)
        }
        Engine::Meta => {
            let sys = match cli.system("sk") {
                "sk" => MetaSystem::sk(),
                "wk" => MetaSystem::wk(),
                s => return Err(unknown_system(s)),
            };
            tableau::<_, MetaLabel, MetaLabel>(cli, &sys, &input)
        }
        Engine::Sequent => sequent(cli, &input),
    }
}

fn unknown_system(name: &str) -> Error {
    Error::new(szs::InputError, format!("unknown system {}", name).into())
}

fn tableau_system(name: &str) -> Result<tableaux::System, Error> {
    use tableaux::System;
    Ok(match name {
        "classical" => System::classical(),
        "classical-indexed" => System::classical_indexed(),
        "fde" => System::fde(),
        "k3" => System::k3(),
        "lp" => System::lp(),
        "constructive" => System::constructive(Language::classical()),
        _ => return Err(unknown_system(name)),
    })
}

fn theorem(cli: &Cli, proof: impl Display) -> Result<(), Error> {
    print!("{}", szs::Status(szs::Theorem));
    cli.output(proof)?;
    Ok(())
}

fn natural_deduction(cli: &Cli, input: &str) -> Result<(), Error> {
    let classical = match cli.system("classical") {
        "classical" => true,
        "classical-alt" => false,
        s => return Err(unknown_system(s)),
    };
    let problem: Problem<Inference, Derivation> = serde_json::from_str(input)?;
    match cli.command {
        Command::Check => {
            let system = if classical { nd::System::classical() } else { nd::System::classical_alt() };
            let derivation = problem.proof()?;
            let goal = problem.goal.as_ref();
            system.is_correct_derivation(derivation, goal, cli.exit_on_first_error)?;
            info!("derivation with {} steps is correct", derivation.len());
            print!("{}", szs::Status(szs::Theorem));
            Ok(())
        }
        Command::Solve => {
            if !classical {
                let e = "proof search is only available for the classical system";
                return Err(Error::new(szs::Inappropriate, e.into()));
            }
            let mut opt = nd::Opt::default();
            opt.depth = cli.lim.unwrap_or(opt.depth);
            let derivation = Solver::classical().solve(problem.goal()?, opt)?;
            cli.stats(Stats {
                size: derivation.len(),
                height: 0,
            })?;
            theorem(cli, derivation)
        }
    }
}

fn tree_stats<T>(tree: &Node<T>) -> Stats {
    Stats {
        size: tree.size(),
        height: tree.height() + 1,
    }
}

fn tableau<T, L, G>(cli: &Cli, sys: &T, input: &str) -> Result<(), Error>
where
    T: Tableaux<Label = L, Goal = G>,
    L: tableaux::Label + DeserializeOwned,
    G: DeserializeOwned,
{
    let problem: Problem<G, Node<L>> = serde_json::from_str(input)?;
    let tree = match cli.command {
        Command::Check => {
            let tree = problem.proof()?;
            let goal = problem.goal.as_ref();
            sys.is_correct_tree(tree, goal, cli.exit_on_first_error)?;
            tree.clone()
        }
        Command::Solve => {
            let mut opt = tableaux::Opt::default();
            opt.max_depth = cli.lim.unwrap_or(opt.max_depth);
            sys.solve_tree(problem.goal()?, opt)?
        }
    };
    cli.stats(tree_stats(&tree))?;
    if sys.tree_is_closed(&tree) {
        theorem(cli, tree)
    } else {
        print!("{}", szs::Status(szs::CounterSatisfiable));
        cli.output(tree)?;
        Ok(())
    }
}

fn sequent(cli: &Cli, input: &str) -> Result<(), Error> {
    let mut calc = match cli.system("lk-min") {
        "lk" => SequentCalculus::lk(),
        "lk-min" => SequentCalculus::lk_min(),
        "lk-min-ea" => SequentCalculus::lk_min_ea(),
        s => return Err(unknown_system(s)),
    };
    calc.opt.max_depth = cli.lim.unwrap_or(calc.opt.max_depth);
    let problem: Problem<Sequent, Node<Sequent>> = serde_json::from_str(input)?;
    let premises = &problem.premises;
    let tree = match cli.command {
        Command::Check => {
            let tree = problem.proof()?;
            calc.is_correct_tree(tree, premises, cli.exit_on_first_error)?;
            if let Some(goal) = &problem.goal {
                if *goal != tree.content {
                    let e = format!("the tree proves {} instead of {}", tree.content, goal);
                    return Err(Error::new(szs::SemanticError, e.into()));
                }
            }
            tree.clone()
        }
        Command::Solve => calc.reduce(problem.goal()?, premises)?,
    };
    cli.stats(tree_stats(&tree))?;
    theorem(cli, tree)
}
