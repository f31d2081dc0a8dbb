//! Buffered logging over UDP: producers append frames to a static ring
//! buffer through the write hook, and a consumer thread drains it in
//! fixed-size packets to a UDP destination.
//!
//! Run with: `cargo run --example udp_consumer -- 127.0.0.1:6000`
//! and watch with e.g. `socat -u UDP-RECV:6000 -`.

use std::net::UdpSocket;
use std::thread;
use std::time::Duration;

use minlog::consumer::PacketPump;
use minlog::platform::Transport;
use minlog::{crc32, MinLogError, Payload, RingBuffer};

const BUFFER_SIZE: usize = 8192;
const PACKET_SIZE: usize = 512;
const POLL_INTERVAL: Duration = Duration::from_millis(20);

const WORKER_TICK_ID: u32 = crc32(b"worker tick");

static RING: RingBuffer<BUFFER_SIZE> = RingBuffer::new();

fn buffered_write(bytes: &[u8]) {
    RING.write(bytes);
}

static BUFFERED_HOOKS: minlog::Hooks = minlog::Hooks {
    clock_now: minlog::platform::posix::clock_now,
    thread_name: minlog::platform::posix::thread_name,
    write: buffered_write,
};

/// UDP sink that closes and reopens its socket after a send failure.
struct UdpTransport {
    destination: String,
    socket: Option<UdpSocket>,
}

impl UdpTransport {
    fn new(destination: String) -> Self {
        Self {
            destination,
            socket: None,
        }
    }
}

impl Transport for UdpTransport {
    fn send(&mut self, frame: &[u8]) -> minlog::Result<()> {
        let socket = match self.socket.take() {
            Some(socket) => socket,
            None => {
                let socket =
                    UdpSocket::bind("0.0.0.0:0").map_err(|_| MinLogError::socket_error())?;
                socket
                    .connect(&self.destination)
                    .map_err(|_| MinLogError::socket_error())?;
                socket
            }
        };
        let outcome = socket.send(frame);
        self.socket = Some(socket);
        match outcome {
            Ok(sent) if sent == frame.len() => Ok(()),
            _ => Err(MinLogError::send_failed()),
        }
    }

    fn reset(&mut self) {
        self.socket = None;
    }
}

/// Prints `log` records from the pump (transport up/down, fell behind) to
/// stderr.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        eprintln!("[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

static STDERR_LOGGER: StderrLogger = StderrLogger;

fn main() {
    let destination = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:6000".to_string());

    log::set_logger(&STDERR_LOGGER).expect("logger already set");
    log::set_max_level(log::LevelFilter::Info);

    minlog::set_hooks(&BUFFERED_HOOKS);
    minlog::set_serialize_format(&minlog::DEFAULT_BINARY);
    minlog::request_thread_names();

    let _consumer = thread::spawn(move || {
        let mut pump = PacketPump::new(&RING, UdpTransport::new(destination), PACKET_SIZE)
            .expect("packet size must divide the buffer");
        loop {
            while pump.poll() {}
            thread::sleep(POLL_INTERVAL);
        }
    });

    let mut workers = Vec::new();
    for w in 0..3 {
        workers.push(
            thread::Builder::new()
                .name(format!("worker{w}"))
                .spawn(|| {
                    for i in 0..1000u64 {
                        minlog::serialize(WORKER_TICK_ID, Payload::U64(i));
                        thread::sleep(Duration::from_millis(5));
                    }
                })
                .expect("spawn worker"),
        );
    }

    for worker in workers {
        worker.join().expect("join worker");
    }

    // Give the consumer one last lap over the buffer before exiting.
    thread::sleep(POLL_INTERVAL * 2);
}
