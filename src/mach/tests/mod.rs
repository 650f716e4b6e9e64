use super::{Event, Runtime, Tape};

mod for_test;

fn runtime() -> (Runtime, Tape) {
    let tape = Tape::new();
    (Runtime::new(Box::new(tape.clone())), tape)
}

fn enter(runtime: &mut Runtime, lines: &[&str]) {
    for line in lines {
        runtime.enter(line);
    }
}

fn run(runtime: &mut Runtime, tape: &Tape) -> String {
    run_cycles(runtime, tape, 5000)
}

fn run_cycles(runtime: &mut Runtime, tape: &Tape, cycles: usize) -> String {
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
                prev_running = true;
                continue;
            }
            Event::Error(_) => {}
            Event::Stopped | Event::Waiting | Event::Exit => break,
        }
        prev_running = false;
    }
    s
}
