// Two security tiers: public (no auth, /auth/*) and protected (bearer token
// required, /api/*). The router in lib.rs applies the JWT middleware to the
// protected tier only.
pub mod protected;
pub mod public;
