//! Gridpilot - Natural-language spreadsheet assistant
//!
//! Classifies a free-text request against a spreadsheet snapshot into a
//! structured action and compiles it into an executable Office-script
//! string. The pipeline per request is linear and stateless:
//!
//! raw model text -> extract -> normalize -> generate
//!
//! Only the model call is async; the core pipeline is synchronous, pure,
//! and shares nothing between requests.

pub mod action;
pub mod core;
pub mod llm;
pub mod sheet;
