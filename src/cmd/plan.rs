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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use rollcall_core::Method;
use rollcall_core::SearchParams;
use rollcall_core::SearchResult;
use rollcall_core::Seed;
use rollcall_core::Summary;
use rollcall_core::search;
use serde::Serialize;

use crate::config::ClassConfig;
use crate::error::Fallible;

#[derive(ValueEnum, Clone, Copy, PartialEq)]
pub enum PlanFormat {
    /// A short human-readable report.
    Text,
    /// The full plan, including the pool, as JSON.
    Json,
}

impl Display for PlanFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanFormat::Text => write!(f, "text"),
            PlanFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize)]
struct PlanReport<'a> {
    params: SearchParams,
    method: Method,
    method_name: String,
    seed: Seed,
    variance: f64,
    summary: Summary,
    /// One-based labels, in call order.
    calls: Vec<String>,
    pool: &'a [usize],
}

pub fn print_plan(config: ClassConfig, format: PlanFormat) -> Fallible<()> {
    let params = config.params();
    let result = search(params)?;
    println!("{}", render_plan(&config, &result, format)?);
    Ok(())
}

pub fn render_plan(
    config: &ClassConfig,
    result: &SearchResult,
    format: PlanFormat,
) -> Fallible<String> {
    let params = config.params();
    let summary = result.summary(&params);
    match format {
        PlanFormat::Text => Ok(summary_lines(result, &summary).join("\n")),
        PlanFormat::Json => {
            let roster = config.roster();
            let report = PlanReport {
                params,
                method: result.method,
                method_name: result.method.to_string(),
                seed: result.seed,
                variance: result.variance,
                summary,
                calls: result
                    .pool
                    .iter()
                    .filter_map(|slot| roster.label(*slot))
                    .collect(),
                pool: &result.pool,
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
    }
}

/// The lines describing a plan, shared with the web interface.
pub fn summary_lines(result: &SearchResult, summary: &Summary) -> Vec<String> {
    vec![
        format!("Method: {} (seed={})", result.method, result.seed),
        format!("Standard deviation: {:.2}", summary.std_dev),
        format!(
            "Each student is called {:.2} to {:.2} times.",
            summary.min_calls, summary.max_calls
        ),
    ]
}
