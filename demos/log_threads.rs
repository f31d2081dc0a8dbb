//! Multiple named threads logging through one serializer, with a
//! thread-name broadcast so the binary stream stays self-describing.
//!
//! Run with: `cargo run --example log_threads` (full-binary frames) or
//! `cargo run --example log_threads -- micro` (micro-binary frames).
//! Binary output goes to stdout; pipe it somewhere sensible.

use std::thread;
use std::time::Duration;

use minlog::{crc32, Payload};

const TASK_LOOP_ENTER_ID: u32 = crc32(b"TASK_LOOP enter");
const TASK_LOOP_EXIT_ID: u32 = crc32(b"TASK_LOOP exit");
const LOOP_COUNT_ID: u32 = crc32(b"LOOP_COUNT");

fn task() {
    for i in 0..5u64 {
        minlog::serialize(TASK_LOOP_ENTER_ID, Payload::None);
        minlog::serialize(LOOP_COUNT_ID, Payload::U64(i));
        minlog::serialize(TASK_LOOP_EXIT_ID, Payload::None);
        thread::sleep(Duration::from_millis(100));
    }
}

fn main() {
    if std::env::args().nth(1).as_deref() == Some("micro") {
        minlog::set_serialize_format(&minlog::MICRO_BINARY);
    } else {
        minlog::set_serialize_format(&minlog::DEFAULT_BINARY);
    }

    minlog::request_thread_names();

    let t1 = thread::Builder::new()
        .name("task1".into())
        .spawn(task)
        .expect("spawn task1");
    let t2 = thread::Builder::new()
        .name("task2".into())
        .spawn(task)
        .expect("spawn task2");

    t1.join().expect("join task1");
    t2.join().expect("join task2");
}
