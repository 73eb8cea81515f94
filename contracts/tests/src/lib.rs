//! Cross-contract tests exercising the platform the way the deployed system
//! runs it: the full claims stack, registry, treasuries, and one project
//! bundle wired together in a single `Env`.

#![cfg(test)]
extern crate std;

mod common;
mod governance_flow;
mod offering_lifecycle;
mod platform_controls;
mod transfer_gating;
