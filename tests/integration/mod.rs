//! Integration tests driving the public API end to end

mod cli_contracts;
mod properties;
mod recycle_retention;
mod session_scenarios;
