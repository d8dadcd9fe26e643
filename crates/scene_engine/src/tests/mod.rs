//! Cross-module tests: the update protocol, culling, and whole-frame runs

mod culling;
mod scenario;
