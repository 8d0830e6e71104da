// handlers/mod.rs - two security tiers
//
// Public (no auth, not throttled) → Protected (throttled, then bearer auth)
pub mod protected; // /grocery, /grocery/:id
pub mod public; // /, /health, /login
