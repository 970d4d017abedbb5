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

use std::process::exit;

use clap::Args;
use clap::Parser;
use tokio::spawn;

use crate::cmd::call::server::ServerConfig;
use crate::cmd::call::server::start_server;
use crate::cmd::plan::PlanFormat;
use crate::cmd::plan::print_plan;
use crate::config::ClassConfig;
use crate::error::Fallible;
use crate::utils::SERVER_START_TIMEOUT;
use crate::utils::wait_for_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Find the most even calling plan for a term and print it.
    Plan {
        #[command(flatten)]
        class: ClassArgs,
        /// Which output format to use.
        #[arg(long, default_value_t = PlanFormat::Text)]
        format: PlanFormat,
    },
    /// Call on students through a web interface.
    Call {
        #[command(flatten)]
        class: ClassArgs,
        /// The host address to bind to. Default is 127.0.0.1.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// The port to use for the web server. Default is 8000.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
    },
}

#[derive(Args)]
struct ClassArgs {
    /// Path to a TOML class file. By default, built-in defaults are used.
    #[arg(long)]
    config: Option<String>,
    /// Number of class sessions in the term.
    #[arg(long)]
    sessions: Option<usize>,
    /// Average number of students called per session.
    #[arg(long)]
    picks: Option<usize>,
    /// Number of students in the class.
    #[arg(long)]
    class_size: Option<usize>,
}

impl ClassArgs {
    fn resolve(self) -> Fallible<ClassConfig> {
        let config = ClassConfig::load(self.config.as_deref())?;
        Ok(config.with_overrides(self.sessions, self.picks, self.class_size))
    }
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Plan { class, format } => print_plan(class.resolve()?, format),
        Command::Call {
            class,
            host,
            port,
            open_browser,
        } => {
            let class = class.resolve()?;
            if open_browser.unwrap_or(true) {
                // Start a separate task to open the browser once the server is up.
                let browser_host = host.clone();
                spawn(async move {
                    match wait_for_server(&browser_host, port, SERVER_START_TIMEOUT).await {
                        Ok(_) => {
                            let _ = open::that(format!("http://{browser_host}:{port}/"));
                        }
                        Err(e) => {
                            eprintln!("Failed to connect to server: {e}");
                            exit(-1)
                        }
                    }
                });
            }
            let config = ServerConfig { class, host, port };
            start_server(config).await
        }
    }
}
