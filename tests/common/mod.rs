#![allow(dead_code)]
use basic::mach::{Event, Runtime, Tape};

pub fn new_runtime() -> (Runtime, Tape) {
    let tape = Tape::new();
    (Runtime::new(Box::new(tape.clone())), tape)
}

pub fn enter(runtime: &mut Runtime, lines: &[&str]) {
    for line in lines {
        runtime.enter(line);
    }
}

pub fn exec(runtime: &mut Runtime, tape: &Tape) -> String {
    exec_n(runtime, tape, 5000)
}

pub fn exec_n(runtime: &mut Runtime, tape: &Tape, cycles: usize) -> String {
    let mut s = String::new();
    let mut prev_running = false;
    loop {
        let event = runtime.execute(cycles);
        s.push_str(&tape.take_output());
        match event {
            Event::Running => {
                if prev_running {
                    s.push_str(&format!("\n{} Execution cycles exceeded.\n", cycles));
                    break;
                }
            }
            Event::Error(_) => {}
            Event::Stopped | Event::Waiting | Event::Exit => break,
        }
        match event {
            Event::Running => prev_running = true,
            _ => prev_running = false,
        }
    }
    s
}

/// Enter the lines and run them, returning everything printed.
pub fn run_program(lines: &[&str]) -> String {
    let (mut r, tape) = new_runtime();
    enter(&mut r, lines);
    r.enter("RUN");
    exec(&mut r, &tape)
}

/// Run a single direct line.
pub fn direct(line: &str) -> String {
    let (mut r, tape) = new_runtime();
    r.enter(line);
    exec(&mut r, &tape)
}
