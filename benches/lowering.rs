use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use traceviz::ir::{Atom, Equation, Literal, Params, Program, SubFn, Var};
use traceviz::{DrawOptions, draw_graph, to_dot};

/// A call wrapping `width` independent chains of `depth` unary ops each,
/// with every chain routed through a nested call.
fn chained_program(width: usize, depth: usize) -> Program {
    let mut id = 100u32;
    let mut fresh = |name: &str| {
        id += 1;
        Var::new(id, name)
    };

    let mut invars = Vec::new();
    let mut outvars = Vec::new();
    let mut eqns = Vec::new();
    for w in 0..width {
        let input = fresh("x");
        invars.push(input.clone());

        let mut chain_eqns = Vec::new();
        let mut cur = input.clone();
        for _ in 0..depth {
            let next = fresh("t");
            chain_eqns.push(Equation::plain(
                "sin",
                vec![Atom::Var(cur.clone())],
                vec![next.clone()],
            ));
            cur = next;
        }
        let chain_out = cur.clone();
        let body = SubFn {
            invars: vec![input.clone()],
            constvars: Vec::new(),
            outvars: vec![chain_out],
            eqns: chain_eqns,
        };

        let received = fresh("y");
        eqns.push(Equation {
            primitive: "call".to_string(),
            inputs: vec![Atom::Var(input)],
            outputs: vec![received.clone()],
            params: Params::Call {
                name: format!("chain{w}"),
                body,
            },
        });
        outvars.push(received);
    }

    let top_inputs: Vec<Atom> = (0..width as u32)
        .map(|i| Atom::Var(Var::new(i, "a")))
        .collect();
    let top_outputs: Vec<Var> = (0..width as u32)
        .map(|i| Var::new(50 + i, "r"))
        .collect();
    let body = SubFn {
        invars,
        constvars: Vec::new(),
        outvars,
        eqns,
    };
    Program::new(vec![Equation {
        primitive: "call".to_string(),
        inputs: top_inputs,
        outputs: top_outputs,
        params: Params::Call {
            name: "main".to_string(),
            body,
        },
    }])
}

/// A call nesting `levels` switch constructs, each branch folding over a
/// small body.
fn nested_control_program(levels: usize) -> Program {
    fn level(base: u32, remaining: usize) -> SubFn {
        let input = Var::new(base, "x");
        let output = Var::new(base + 1, "y");
        if remaining == 0 {
            return SubFn {
                invars: vec![input.clone()],
                constvars: Vec::new(),
                outvars: vec![output.clone()],
                eqns: vec![Equation::plain(
                    "exp",
                    vec![Atom::Var(input)],
                    vec![output],
                )],
            };
        }

        let fold_body = SubFn {
            invars: vec![Var::new(base + 10, "acc"), Var::new(base + 11, "e")],
            constvars: Vec::new(),
            outvars: vec![Var::new(base + 12, "acc2")],
            eqns: vec![Equation::plain(
                "add",
                vec![
                    Atom::Var(Var::new(base + 10, "acc")),
                    Atom::Var(Var::new(base + 11, "e")),
                ],
                vec![Var::new(base + 12, "acc2")],
            )],
        };
        let fold_branch = SubFn {
            invars: vec![Var::new(base + 20, "s")],
            constvars: Vec::new(),
            outvars: vec![Var::new(base + 21, "f")],
            eqns: vec![Equation {
                primitive: "scan".to_string(),
                inputs: vec![
                    Atom::Lit(Literal::new("0.0")),
                    Atom::Var(Var::new(base + 20, "s")),
                ],
                outputs: vec![Var::new(base + 21, "f")],
                params: Params::Fold {
                    body: fold_body,
                    num_consts: 0,
                    num_carry: 1,
                    length: 8,
                },
            }],
        };
        let deeper = level(base + 100, remaining - 1);
        let deeper_in = Atom::Var(Var::new(base + 30, "s"));
        let call_branch = SubFn {
            invars: vec![Var::new(base + 30, "s")],
            constvars: Vec::new(),
            outvars: vec![Var::new(base + 31, "g")],
            eqns: vec![Equation {
                primitive: "call".to_string(),
                inputs: vec![deeper_in],
                outputs: vec![Var::new(base + 31, "g")],
                params: Params::Call {
                    name: format!("level{remaining}"),
                    body: deeper,
                },
            }],
        };

        SubFn {
            invars: vec![input.clone(), Var::new(base + 2, "i")],
            constvars: Vec::new(),
            outvars: vec![output.clone()],
            eqns: vec![Equation {
                primitive: "switch".to_string(),
                inputs: vec![
                    Atom::Var(Var::new(base + 2, "i")),
                    Atom::Var(input),
                ],
                outputs: vec![output],
                params: Params::Switch {
                    branches: vec![fold_branch, call_branch],
                },
            }],
        }
    }

    let body = level(100, levels);
    Program::new(vec![Equation {
        primitive: "call".to_string(),
        inputs: vec![Atom::Var(Var::new(1, "a")), Atom::Var(Var::new(2, "b"))],
        outputs: vec![Var::new(3, "c")],
        params: Params::Call {
            name: "main".to_string(),
            body,
        },
    }])
}

fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_graph");
    let options = DrawOptions::default();
    for (width, depth) in [(4usize, 8usize), (16, 16), (32, 32)] {
        let name = format!("chains_{width}x{depth}");
        let program = chained_program(width, depth);
        group.bench_with_input(BenchmarkId::from_parameter(name), &program, |b, program| {
            b.iter(|| {
                let graph = draw_graph(black_box(program), options).expect("draw failed");
                black_box(graph.ids().len());
            });
        });
    }
    for levels in [2usize, 4, 6] {
        let name = format!("control_depth_{levels}");
        let program = nested_control_program(levels);
        group.bench_with_input(BenchmarkId::from_parameter(name), &program, |b, program| {
            b.iter(|| {
                let graph = draw_graph(black_box(program), options).expect("draw failed");
                black_box(graph.ids().len());
            });
        });
    }
    group.finish();
}

fn bench_to_dot(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_dot");
    let options = DrawOptions {
        collapse_primitives: false,
        show_types: true,
    };
    for (width, depth) in [(16usize, 16usize), (32, 32)] {
        let name = format!("chains_{width}x{depth}");
        let graph = draw_graph(&chained_program(width, depth), options).expect("draw failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &graph, |b, graph| {
            b.iter(|| {
                let dot = to_dot(black_box(graph));
                black_box(dot.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_draw, bench_to_dot
);
criterion_main!(benches);
