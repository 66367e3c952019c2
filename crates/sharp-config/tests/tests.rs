// Cargo builds one binary per `tests/*.rs` file; everything lives under `suite/`.

mod suite;
