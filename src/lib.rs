//! Multi-step lead-capture survey for the Flexirent rent-installment service.
//!
//! The survey core (`survey`) is UI-agnostic: a `SurveyFlow` owns one
//! session and hands finished records to a `gateway::Gateway`. The terminal
//! view, answer-sheet replay, config, and CLI sit on top for the binary.
pub mod answers;
pub mod cli;
pub mod config;
pub mod gateway;
pub mod survey;
pub mod view;
