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

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use rollcall_core::SearchResult;
use rollcall_core::SessionState;
use serde::Deserialize;
use tokio::task::spawn_blocking;

use crate::cmd::call::get::render_page;
use crate::cmd::call::state::Message;
use crate::cmd::call::state::Plan;
use crate::cmd::call::state::ServerState;
use crate::config::ClassConfig;
use crate::error::ErrorReport;
use crate::error::Fallible;

#[derive(Deserialize)]
enum Action {
    Plan,
    Call,
    Reset,
    Shutdown,
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
    #[serde(default)]
    sessions: String,
    #[serde(default)]
    picks_per_session: String,
    #[serde(default)]
    class_size: String,
    #[serde(default)]
    names: String,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> (StatusCode, Html<String>) {
    let status = match action_handler(&state, form).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            log::warn!("{e}");
            let mut mutable = state.mutable.lock().unwrap();
            mutable.message = Some(Message::Error(e.to_string()));
            StatusCode::BAD_REQUEST
        }
    };
    let mutable = state.mutable.lock().unwrap();
    (status, Html(render_page(&mutable).into_string()))
}

async fn action_handler(state: &ServerState, form: FormData) -> Fallible<()> {
    match form.action {
        Action::Plan => {
            let class = ClassConfig {
                sessions: parse_count("sessions", &form.sessions)?,
                picks_per_session: parse_count("picks_per_session", &form.picks_per_session)?,
                class_size: parse_count("class_size", &form.class_size)?,
                names: form
                    .names
                    .lines()
                    .map(|line| line.trim().to_string())
                    .filter(|line| !line.is_empty())
                    .collect(),
            };
            let params = class.params();
            // The search is CPU-bound, keep it off the async workers.
            let cache = state.cache.clone();
            let result: Arc<SearchResult> = spawn_blocking(move || cache.get_or_search(params))
                .await
                .map_err(|e| ErrorReport::new(format!("search task failed: {e}")))??;
            let mut mutable = state.mutable.lock().unwrap();
            mutable.session.start(result.pool.clone(), class.roster())?;
            mutable.plan = Some(Plan { params, result });
            mutable.class = class;
            mutable.message = None;
        }
        Action::Call => {
            let mut mutable = state.mutable.lock().unwrap();
            let message = match mutable.session.draw() {
                Some(call) => Message::Called(call),
                None if mutable.session.state() == SessionState::Uninitialized => Message::NoPlan,
                None => Message::Finished,
            };
            mutable.message = Some(message);
        }
        Action::Reset => {
            let mut mutable = state.mutable.lock().unwrap();
            mutable.session.reset();
            mutable.plan = None;
            mutable.message = None;
        }
        Action::Shutdown => {
            let mut tx = state.shutdown_tx.lock().unwrap();
            if let Some(sender) = tx.take() {
                let _ = sender.send(());
            }
            let mut mutable = state.mutable.lock().unwrap();
            mutable.message = Some(Message::ShuttingDown);
        }
    }
    Ok(())
}

fn parse_count(name: &str, value: &str) -> Fallible<usize> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| ErrorReport::new(format!("{name} must be a whole number, got '{value}'")))
}
