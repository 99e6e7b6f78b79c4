// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Profiling support.
//!
//! With the `profiling` feature enabled, structural operations
//! (archetype creation, relocation fix-ups, trims) emit tracing spans.
//! Call [`init`] once at startup to collect them as JSON lines, or
//! install any `tracing` subscriber of your own.
//!
//! Profile in release mode for representative numbers.

use tracing_appender::non_blocking::WorkerGuard;

/// Install a JSON subscriber writing to stdout.
///
/// Keep the returned guard alive for the program's lifetime; dropping
/// it flushes and stops the writer thread.
///
/// # Panics
/// Panics if a global subscriber is already set.
pub fn init() -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt().json().with_writer(writer).init();
    guard
}
