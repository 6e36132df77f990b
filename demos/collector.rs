// Multi-producer collection demo: four worker threads append tagged events
// into the active buffer, and a maintenance pass swaps the full buffer for a
// spare and drains it between rounds.
//
// Run with: cargo run --example collector

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use evcollect::Collect::Buffer::ConcurrentVec;
use evcollect::Core::alloc;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
struct Event {
    producer: u32,
    seq: u32,
    timestamp_ns: u64,
}

fn main() {
    let producers = 4u32;
    let per_round = 50_000u32;
    let rounds = 3;

    let active: Arc<ConcurrentVec<Event>> = Arc::new(ConcurrentVec::new(1024));
    let spare: ConcurrentVec<Event> = ConcurrentVec::new(1024);
    let epoch = Instant::now();

    for round in 0..rounds {
        println!("--- round {} ---", round);
        let start = Instant::now();

        let mut handles = vec![];
        for p in 0..producers {
            let active = active.clone();
            handles.push(thread::spawn(move || {
                for i in 0..per_round {
                    let slot = active.prepare_next(1);
                    unsafe {
                        slot.write(Event {
                            producer: p,
                            seq: i,
                            timestamp_ns: epoch.elapsed().as_nanos() as u64,
                        });
                    }
                    active.commit_next(1);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        let collected = active.len();
        println!(
            "  {} events collected in {:?} (capacity now {})",
            collected,
            start.elapsed(),
            active.capacity()
        );

        // Producers are joined, so no reservation is outstanding: swap the
        // full buffer out and drain it while the next round could already
        // be appending into the fresh one.
        active.swap(&spare);
        let mut counts = vec![0u32; producers as usize];
        spare.drain(|event| counts[event.producer as usize] += 1);
        println!("  drained per producer: {:?}", counts);
        assert_eq!(counts.iter().sum::<u32>(), collected as u32);
    }

    println!("--- allocator accounting ---");
    println!("  {:#?}", alloc::snapshot());
    println!("  active buffer state: {:?}", active);
}
