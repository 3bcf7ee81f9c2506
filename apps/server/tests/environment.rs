//! Runs the real binary with `API_*` variables and watches its console output.

use assert_cmd::cargo::CommandCargoExt;
use std::io::{BufRead, BufReader};
use std::net::TcpListener;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

const STARTUP_TIMEOUT: Duration = Duration::from_secs(30);

struct RunningServer {
    child: Child,
    lines: Receiver<String>,
    seen: Vec<String>,
}

impl RunningServer {
    fn spawn(port: &str) -> Self {
        let mut child = Command::cargo_bin("bcore-server")
            .expect("binary should be built")
            .env_remove("API_HOST")
            .env("API_PORT", port)
            .env("RUST_LOG", "info")
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("server should start");

        let stdout = child.stdout.take().expect("piped stdout");
        let (tx, lines) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        Self { child, lines, seen: Vec::new() }
    }

    /// Reads output until a line contains `needle`, the process closes stdout, or the
    /// startup timeout runs out.
    fn wait_for(&mut self, needle: &str) -> bool {
        let deadline = Instant::now() + STARTUP_TIMEOUT;
        while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
            match self.lines.recv_timeout(remaining) {
                Ok(line) => {
                    let found = line.contains(needle);
                    self.seen.push(line);
                    if found {
                        return true;
                    }
                },
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return false,
            }
        }
        false
    }

    fn output(&self) -> String {
        self.seen.join("\n")
    }

    /// Sends SIGTERM and waits for the process to exit.
    #[cfg(unix)]
    fn terminate(&mut self) -> ExitStatus {
        let status = Command::new("kill")
            .args(["-TERM", &self.child.id().to_string()])
            .status()
            .expect("kill should run");
        assert!(status.success(), "kill -TERM failed");
        self.child.wait().expect("server should exit")
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn free_port() -> u16 {
    let listener = TcpListener::bind("0.0.0.0:0").expect("reserve port");
    listener.local_addr().expect("local addr").port()
}

#[cfg(unix)]
#[test]
fn unset_host_binds_all_interfaces_and_stops_on_sigterm() {
    let port = free_port();
    let mut server = RunningServer::spawn(&port.to_string());

    let ready = format!("Application is running on: http://0.0.0.0:{port}");
    assert!(server.wait_for(&ready), "missing readiness line:\n{}", server.output());
    let docs = format!("API docs available at: http://0.0.0.0:{port}/docs");
    assert!(server.wait_for(&docs), "missing docs line:\n{}", server.output());

    let status = server.terminate();
    assert!(status.success(), "SIGTERM should end in a clean exit: {status}");
    assert!(server.wait_for("Server shutdown complete"), "{}", server.output());
}

#[test]
fn malformed_port_warns_and_uses_the_default() {
    let mut server = RunningServer::spawn("not-a-number");

    assert!(server.wait_for("Ignoring malformed port"), "missing warning:\n{}", server.output());
    // Either the readiness line or, if 3000 is taken on this machine, the bind failure.
    assert!(server.wait_for("0.0.0.0:3000"), "default port not used:\n{}", server.output());
}
