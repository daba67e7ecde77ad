// handlers/mod.rs - Two-tier handler layout
//
// Public (no session) -> Protected (signed-in session required)
//
// Pages are neither: they sit behind the route gate, which lets anonymous
// visitors through to excluded paths only.
pub mod pages;
pub mod protected;
pub mod public;
