// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Turns a configured [`CollaboratorCommand`] template into a concrete
//! [`RunSpec`] by substituting placeholders with the job's real artifact
//! paths.

use reelforge_adapters::RunSpec;
use reelforge_core::CollaboratorCommand;
use std::path::{Path, PathBuf};

/// Substitute `{input}`/`{output}` in `command`'s argument template.
pub fn spec_for(command: &CollaboratorCommand, cwd: PathBuf, input: &Path, output: &Path) -> RunSpec {
    spec_with(command, cwd, &[("{input}", input), ("{output}", output)])
}

/// Substitute an arbitrary set of named placeholders, for commands that
/// need more than one input path (e.g. the burner, which takes both the
/// source video and the caption document).
pub fn spec_with(command: &CollaboratorCommand, cwd: PathBuf, substitutions: &[(&str, &Path)]) -> RunSpec {
    let args = command
        .args
        .iter()
        .map(|arg| {
            substitutions.iter().fold(arg.clone(), |acc, (placeholder, path)| {
                acc.replace(placeholder, &path.to_string_lossy())
            })
        })
        .collect::<Vec<_>>();
    RunSpec::new(command.program.clone(), cwd).args(args)
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
