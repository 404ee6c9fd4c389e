//! Scripted [`CommandRunner`] for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::process::{CommandRunner, CommandSpec, ProcessOutcome};

/// Replays queued outcomes in order and records every command it was given.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    pub calls: RefCell<Vec<CommandSpec>>,
    outcomes: RefCell<VecDeque<ProcessOutcome>>,
}

impl ScriptedRunner {
    pub fn then_ok(self, stdout: &str) -> Self {
        self.outcomes.borrow_mut().push_back(ProcessOutcome::Captured {
            stdout: stdout.to_string(),
            stderr: String::new(),
        });
        self
    }

    pub fn then_fail(self, exit_code: i32, stderr: &str) -> Self {
        self.outcomes.borrow_mut().push_back(ProcessOutcome::Failed {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        });
        self
    }

    pub fn call(&self, index: usize) -> CommandSpec {
        self.calls.borrow()[index].clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec) -> std::io::Result<ProcessOutcome> {
        self.calls.borrow_mut().push(spec.clone());
        self.outcomes
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| std::io::Error::other(format!("unscripted command: {spec}")))
    }
}
