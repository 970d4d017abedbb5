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

use axum::extract::State;
use axum::response::Html;
use maud::Markup;
use maud::html;
use rollcall_core::Roster;
use rollcall_core::SessionState;

use crate::cmd::call::state::Message;
use crate::cmd::call::state::MutableState;
use crate::cmd::call::state::ServerState;
use crate::cmd::call::template::page_template;
use crate::cmd::plan::summary_lines;

pub async fn get_handler(State(state): State<ServerState>) -> Html<String> {
    let mutable = state.mutable.lock().unwrap();
    Html(render_page(&mutable).into_string())
}

pub fn render_page(state: &MutableState) -> Markup {
    let class = &state.class;
    let roster: Roster = match state.session.roster() {
        Some(roster) => roster.clone(),
        None => class.roster(),
    };
    let names: String = class.names.join("\n");
    let body = html! {
        h1 { "rollcall" }
        form.plan method="post" {
            label {
                "Sessions per term"
                input type="number" name="sessions" min="1" value=(class.sessions);
            }
            label {
                "Average calls per session"
                input type="number" name="picks_per_session" min="1" value=(class.picks_per_session);
            }
            label {
                "Students in class"
                input type="number" name="class_size" min="1" value=(class.class_size);
            }
            label {
                "Names, one per line (blanks are filled in)"
                textarea name="names" rows="8" { (names) }
            }
            div.controls {
                button type="submit" name="action" value="Plan" { "Make plan" }
                button type="submit" name="action" value="Reset" { "Reset" }
                button type="submit" name="action" value="Shutdown" { "Shutdown" }
            }
        }
        details.roster {
            summary { "Class list" }
            ol {
                @for name in roster.names() {
                    li { (name) }
                }
            }
        }
        @if let Some(plan) = &state.plan {
            div.summary {
                @for line in summary_lines(&plan.result, &plan.result.summary(&plan.params)) {
                    p { (line) }
                }
            }
        }
        @match &state.message {
            Some(Message::Called(call)) => {
                h2.called { (call.slot + 1) " : " (call.name) }
            }
            Some(Message::Finished) => {
                p.notice { "All students have been called." }
            }
            Some(Message::NoPlan) => {
                p.notice { "No plan has been made yet." }
            }
            Some(Message::ShuttingDown) => {
                p.notice { "Shutting down." }
            }
            Some(Message::Error(error)) => {
                p.error { (error) }
            }
            None => {}
        }
        @if state.session.state() != SessionState::Uninitialized {
            form.call method="post" {
                button type="submit" name="action" value="Call" { "Call" }
            }
            p.remaining {
                "Remaining: " (state.session.remaining_count()) " / " (state.session.pool_len())
            }
            @let used = state.session.used_list();
            @if !used.is_empty() {
                div.used {
                    p { "Called so far (" (used.len()) "):" }
                    ol {
                        @for call in &used {
                            li { (call.slot + 1) " : " (call.name) }
                        }
                    }
                }
            }
        }
    };
    page_template(body)
}
