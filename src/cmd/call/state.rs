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

use std::sync::Arc;
use std::sync::Mutex;

use rollcall_core::Call;
use rollcall_core::CallSession;
use rollcall_core::SearchCache;
use rollcall_core::SearchParams;
use rollcall_core::SearchResult;
use tokio::sync::oneshot::Sender;

use crate::config::ClassConfig;

#[derive(Clone)]
pub struct ServerState {
    pub cache: Arc<SearchCache>,
    pub mutable: Arc<Mutex<MutableState>>,
    pub shutdown_tx: Arc<Mutex<Option<Sender<()>>>>,
}

pub struct MutableState {
    /// The class as last submitted, used to fill in the form.
    pub class: ClassConfig,
    pub session: CallSession,
    /// The plan the current session was started from.
    pub plan: Option<Plan>,
    /// Feedback from the most recent action.
    pub message: Option<Message>,
}

pub struct Plan {
    pub params: SearchParams,
    pub result: Arc<SearchResult>,
}

pub enum Message {
    Called(Call),
    Finished,
    NoPlan,
    ShuttingDown,
    Error(String),
}
