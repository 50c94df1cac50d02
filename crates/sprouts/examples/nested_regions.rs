//! Walk through a short game that closes a region around a spot.
//!
//! Prints each outcome and the face/trace layout after every move so the
//! effect of a face split and of the caller's partition is visible.

use sprouts::prelude::*;

fn print_layout(engine: &SproutsEngine) {
    let snap = engine.snapshot().expect("index is consistent");
    for face in &snap.faces {
        let traces: Vec<String> = face
            .traces
            .iter()
            .map(|t| {
                let walk: Vec<String> = t.walk.iter().map(|d| d.0.to_string()).collect();
                format!("t{}=[{}]", t.id.0, walk.join(" "))
            })
            .collect();
        println!("  face {}: {}", face.id.0, traces.join(", "));
    }
}

fn main() {
    let mut engine = SproutsEngine::new(3);
    let enclose_dot_2 = Choice::partition(Partition::to_new([TraceId(2)]));
    // the loop around dot 2 leaves the 0-1 cycle outside itself
    let loop_outside_cycle = Choice::partition(Partition::to_old([TraceId(3)]));
    let script: [(usize, usize, Option<&Choice>); 4] = [
        (0, 1, None),
        (0, 1, Some(&enclose_dot_2)),
        (2, 2, Some(&loop_outside_cycle)),
        (0, 2, None),
    ];
    for (a, b, choice) in script {
        let outcome = engine
            .connect(DotId(a), DotId(b), choice)
            .expect("engine index stays consistent");
        println!("connect({a}, {b}) -> {outcome:?}");
        print_layout(&engine);
    }
    println!(
        "faces={} lives={} can_connect={}",
        engine.face_count(),
        engine.remaining_lives(),
        engine.can_connect()
    );
}
