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

fn main() {
    println!(
        r#"Run this example with:

1. `cargo test --example testing -- --show-output`
2. `cargo test --example testing -- --nocapture`
3. `cargo test --example testing`

Compare the output of the three commands."#
    );
}

#[cfg(test)]
mod tests {
    use slogforth::append::Testing;
    use slogforth::field;
    use slogforth::record::Level;

    #[test]
    fn testing() {
        let logger = slogforth::builder()
            .dispatch(|d| d.filter(Level::Debug).append(Testing::default()))
            .build();

        logger.fatal("Hello fatal!", [field("exit", false)]);
        logger.error("Hello error!", []);
        logger.warn("Hello warn!", []);
        logger.info("Hello info!", [field("answer", 42)]);
        logger.debug("Hello debug!", []);
    }
}
