// Copyright 2025 FastLabs Developers
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

use slogforth::append;
use slogforth::filter::EnvFilter;

fn main() {
    let logger = slogforth::builder()
        .dispatch(|d| {
            d.filter(EnvFilter::from_default_env_or("info"))
                .append(append::Stderr::default())
        })
        .build();
    slogforth::bridge::log::setup_log_crate(logger);

    log::error!(attempt = 3; "Hello error!");
    log::warn!("Hello warn!");
    log::info!(target: "db", user = "admin"; "Hello info!");
    log::debug!("Hello debug!");
}
