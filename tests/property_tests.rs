// Property tests for the Bare Bones interpreter

use std::collections::BTreeMap;

use barebones::interpreter::engine::Interpreter;
use barebones::parser::parse::Parser;
use barebones::{interpret, Error, RunConfig};
use num_bigint::BigUint;
use quickcheck::{Arbitrary, Gen, TestResult};

const NAMES: [&str; 3] = ["a", "b", "c"];
const SEPARATORS: [&str; 4] = [" ", "\n", "\t", "  \r\n  "];

#[derive(Debug, Clone, Copy)]
enum Op {
    Clear(usize),
    Incr(usize),
    Decr(usize),
}

impl Op {
    fn render(&self) -> String {
        match self {
            Op::Clear(v) => format!("clear {};", NAMES[*v]),
            Op::Incr(v) => format!("incr {};", NAMES[*v]),
            Op::Decr(v) => format!("decr {};", NAMES[*v]),
        }
    }
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        let var = usize::arbitrary(g) % NAMES.len();
        // Weighted towards incr so values move away from zero
        match u8::arbitrary(g) % 5 {
            0 => Op::Clear(var),
            1 | 2 => Op::Incr(var),
            _ => Op::Decr(var),
        }
    }
}

/// A program made only of primitive statements
#[derive(Debug, Clone)]
struct StraightLine(Vec<Op>);

impl StraightLine {
    fn render(&self, separator: &str) -> String {
        self.0
            .iter()
            .map(Op::render)
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Reference semantics: saturating arithmetic on machine integers
    fn expected(&self) -> BTreeMap<String, BigUint> {
        let mut vars: BTreeMap<String, u64> = BTreeMap::new();
        for op in &self.0 {
            match op {
                Op::Clear(v) => {
                    vars.insert(NAMES[*v].to_string(), 0);
                }
                Op::Incr(v) => *vars.entry(NAMES[*v].to_string()).or_insert(0) += 1,
                Op::Decr(v) => {
                    let value = vars.entry(NAMES[*v].to_string()).or_insert(0);
                    *value = value.saturating_sub(1);
                }
            }
        }
        vars.into_iter()
            .map(|(name, value)| (name, BigUint::from(value)))
            .collect()
    }
}

impl Arbitrary for StraightLine {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % (g.size() + 1);
        StraightLine((0..len).map(|_| Op::arbitrary(g)).collect())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let ops = self.0.clone();
        Box::new((0..ops.len()).map(move |i| {
            let mut fewer = ops.clone();
            fewer.remove(i);
            StraightLine(fewer)
        }))
    }
}

fn check_straight_line(program: StraightLine) -> bool {
    match interpret(&program.render(" "), &RunConfig::default()) {
        Ok(bindings) => bindings == program.expected(),
        Err(_) => false,
    }
}

fn check_whitespace_insensitive(program: StraightLine, separator: u8) -> bool {
    let separator = SEPARATORS[separator as usize % SEPARATORS.len()];
    let compact = interpret(&program.render(""), &RunConfig::default());
    let spaced = interpret(&program.render(separator), &RunConfig::default());
    compact.is_ok() && compact == spaced
}

fn check_unentered_loop(body: StraightLine) -> bool {
    // `q` is never written, so the body never runs
    let source = format!("while q not 0 do {} end;", body.render(" "));
    match interpret(&source, &RunConfig::default()) {
        Ok(bindings) => bindings.is_empty(),
        Err(_) => false,
    }
}

fn check_step_budget(program: StraightLine, budget: u8) -> TestResult {
    let budget = budget as u64;
    let steps = program.0.len() as u64;
    let config = RunConfig::new().with_max_steps(budget);
    let result = interpret(&program.render(" "), &config);

    if steps <= budget {
        TestResult::from_bool(result.is_ok())
    } else {
        TestResult::from_bool(matches!(result, Err(Error::Runtime(_))))
    }
}

fn check_parse_deterministic(program: StraightLine, separator: u8) -> bool {
    let separator = SEPARATORS[separator as usize % SEPARATORS.len()];
    let source = program.render(separator);

    let parse = |source: &str| Parser::new(source).and_then(|mut parser| parser.parse_program());
    let (Ok(first), Ok(second)) = (parse(&source), parse(&source)) else {
        return false;
    };
    first == second && first.statement_count() == program.0.len()
}

fn check_history_length(program: StraightLine) -> bool {
    let Ok(parsed) = Parser::new(&program.render(" ")).and_then(|mut p| p.parse_program()) else {
        return false;
    };
    let mut interpreter = Interpreter::new(parsed, RunConfig::new().with_history(1 << 20));
    interpreter.run().is_ok() && interpreter.total_snapshots() == program.0.len() + 1
}

#[test]
fn quick_check() {
    quickcheck::QuickCheck::new()
        .tests(500)
        .gen(Gen::new(40))
        .quickcheck(check_straight_line as fn(StraightLine) -> bool);

    quickcheck::QuickCheck::new()
        .tests(300)
        .gen(Gen::new(20))
        .quickcheck(check_whitespace_insensitive as fn(StraightLine, u8) -> bool);

    quickcheck::QuickCheck::new()
        .tests(300)
        .gen(Gen::new(20))
        .quickcheck(check_unentered_loop as fn(StraightLine) -> bool);

    quickcheck::QuickCheck::new()
        .tests(500)
        .gen(Gen::new(40))
        .quickcheck(check_step_budget as fn(StraightLine, u8) -> TestResult);

    quickcheck::QuickCheck::new()
        .tests(300)
        .gen(Gen::new(30))
        .quickcheck(check_parse_deterministic as fn(StraightLine, u8) -> bool);

    quickcheck::QuickCheck::new()
        .tests(200)
        .gen(Gen::new(30))
        .quickcheck(check_history_length as fn(StraightLine) -> bool);
}
