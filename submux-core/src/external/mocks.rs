// submux-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests and when the "test-mocks" feature is enabled.

use super::{ToolOutput, ToolRunner};
use std::collections::VecDeque;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// One invocation seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedCall {
    pub program: PathBuf,
    pub args: Vec<String>,
}

#[derive(Debug, Clone)]
enum MockResponse {
    Exit {
        output: ToolOutput,
        create_output: bool,
    },
    IoError(io::ErrorKind),
}

/// Mock implementation of ToolRunner replaying queued responses in order.
///
/// Cloning shares the queue and the call log, so a clone can be handed to an
/// orchestrator running on another thread while the test keeps the original.
#[derive(Debug, Clone, Default)]
pub struct MockToolRunner {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    received_calls: Arc<Mutex<Vec<ReceivedCall>>>,
}

impl MockToolRunner {
    pub fn new() -> Self {
        Default::default()
    }

    /// Queues a finished run with the given exit code and output.
    pub fn push_exit(&self, exit_code: i32, stdout: &str, stderr: &str) {
        self.push(MockResponse::Exit {
            output: ToolOutput {
                exit_code: Some(exit_code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
            create_output: false,
        });
    }

    /// Queues a successful run that also creates the file passed after `-o`.
    pub fn push_success_creating_output(&self) {
        self.push(MockResponse::Exit {
            output: ToolOutput {
                exit_code: Some(0),
                stdout: "Multiplexing took 0 seconds.".to_string(),
                stderr: String::new(),
            },
            create_output: true,
        });
    }

    /// Queues a run terminated by a signal (no exit code).
    pub fn push_killed(&self, stderr: &str) {
        self.push(MockResponse::Exit {
            output: ToolOutput {
                exit_code: None,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
            create_output: false,
        });
    }

    /// Queues a failure to start the program.
    pub fn push_io_error(&self, kind: io::ErrorKind) {
        self.push(MockResponse::IoError(kind));
    }

    pub fn received_calls(&self) -> Vec<ReceivedCall> {
        self.received_calls.lock().unwrap().clone()
    }

    fn push(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }
}

impl ToolRunner for MockToolRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ToolOutput> {
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        self.received_calls.lock().unwrap().push(ReceivedCall {
            program: program.to_path_buf(),
            args: args.clone(),
        });

        let response = self.responses.lock().unwrap().pop_front();
        match response {
            Some(MockResponse::Exit { output, create_output }) => {
                if create_output {
                    let position = args.iter().position(|a| a == "-o");
                    match position.and_then(|i| args.get(i + 1)) {
                        Some(path) => {
                            if let Err(e) = std::fs::write(path, b"mock output") {
                                log::error!("MockToolRunner failed to create output {}: {}", path, e);
                            }
                        }
                        None => log::warn!("MockToolRunner found no -o argument in {:?}", args),
                    }
                }
                Ok(output)
            }
            Some(MockResponse::IoError(kind)) => {
                Err(io::Error::new(kind, format!("mock {kind:?} for {}", program.display())))
            }
            None => panic!("MockToolRunner: No response queued for call {:?}", args),
        }
    }
}
