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

use std::collections::BTreeMap;
use std::io;

use slogforth::Value;
use slogforth::append;
use slogforth::component;
use slogforth::error;
use slogforth::field;
use slogforth::lazy;
use slogforth::record::Level;
use slogforth::value::WrapError;
use slogforth::wrap;

fn open_config() -> Result<(), WrapError> {
    let eof = io::Error::from(io::ErrorKind::UnexpectedEof);
    let err = wrap!(eof, "wrap1");
    Err(wrap!(err, "wrap2"))
}

fn main() {
    let logger = slogforth::builder()
        .dispatch(|d| d.filter(Level::Debug).append(append::Stderr::default()))
        .build();

    let err = open_config().unwrap_err();
    logger.info(
        "my message here",
        [
            field("field_name", "something or the other"),
            field("some_map", BTreeMap::from([("nested_fields", "wowow")])),
            error(&err),
            field(
                "some slice",
                Value::seq::<Value, _>([1.into(), "foof".into(), "bar".into(), true.into()]),
            ),
            component("test"),
            lazy("name", || "wow"),
        ],
    );

    let db = logger.named("db").with([field("pool", "primary")]);
    db.debug("connection opened", [field("took_ms", 12)]);
    db.warn("slow query", [field("statement", "SELECT *\nFROM users")]);
}
