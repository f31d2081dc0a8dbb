//! Walks through the three serializers and the verbose formatter, printing
//! everything to stdout. Binary output is rendered as hex columns so the
//! frames are inspectable.
//!
//! Run with: `cargo run --example hello`

use minlog::{crc32, Payload, Record};

const HELLO_TEXT_ID: u32 = crc32(b"hello world text");
const HELLO_BINARY_ID: u32 = crc32(b"hello world binary");
const HELLO_MICRO_ID: u32 = crc32(b"hello world micro");

fn print_hex_columns(bytes: &[u8], columns: usize) {
    for (i, byte) in bytes.iter().enumerate() {
        print!("{byte:02X} ");
        if (i + 1) % columns == 0 {
            println!();
        }
    }
    if bytes.len() % columns != 0 {
        println!();
    }
}

/// Routes binary frames through the hex printer and text straight out.
fn demo_write(bytes: &[u8]) {
    let format = minlog::get_serialize_format();
    if std::ptr::eq(format, &minlog::DEFAULT_TEXT) {
        minlog::platform::posix::write_stdout(bytes);
    } else {
        print_hex_columns(bytes, 4);
    }
}

static DEMO_HOOKS: minlog::Hooks = minlog::Hooks {
    clock_now: minlog::platform::posix::clock_now,
    thread_name: minlog::platform::posix::thread_name,
    write: demo_write,
};

fn main() {
    minlog::set_hooks(&DEMO_HOOKS);

    println!("Textual logging:");
    minlog::request_thread_names();
    minlog::serialize(HELLO_TEXT_ID, Payload::from_str("hello world"));
    minlog::serialize(HELLO_TEXT_ID, Payload::U64(42));

    println!("\nVerbose logging:");
    minlog::set_verbose(true);
    minlog::write_verbose(
        &Record {
            msg_id: HELLO_TEXT_ID,
            file: file!(),
            line: line!(),
            function: "",
            message: "hello world verbose",
            severity: minlog::context::INFO,
        },
        Payload::None,
    );
    minlog::set_verbose(false);

    println!("\nBinary logging:");
    minlog::set_serialize_format(&minlog::DEFAULT_BINARY);
    minlog::request_thread_names();
    minlog::serialize(HELLO_BINARY_ID, Payload::None);

    println!("\nMicro-binary logging:");
    minlog::set_serialize_format(&minlog::MICRO_BINARY);
    minlog::serialize(HELLO_MICRO_ID, Payload::None);
    minlog::serialize(HELLO_MICRO_ID, Payload::None);
}
