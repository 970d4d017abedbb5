// Copyright 2025 Fernando Borretti
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

//! rollcall-core: Core library for the rollcall student caller.
//!
//! This library provides the I/O-free parts of rollcall:
//! - Four seeded pseudo-random sequence generators
//! - Variance scoring of sequences reduced modulo the class size
//! - The exhaustive method/seed search, and a cache for its results
//! - Name rosters and the call session state machine

pub mod cache;
pub mod error;
pub mod generator;
pub mod roster;
pub mod search;
pub mod session;
pub mod variance;

// Re-exports for convenience
pub use cache::SearchCache;
pub use error::{ErrorReport, Fallible, fail};
pub use generator::{Method, Seed};
pub use roster::Roster;
pub use search::{SearchError, SearchParams, SearchResult, Summary, search};
pub use session::{Call, CallSession, SessionState};
pub use variance::{Evaluation, evaluate};
