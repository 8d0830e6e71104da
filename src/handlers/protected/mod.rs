// handlers/protected/mod.rs - handlers behind the bearer check and throttle
//
// The router wraps every route here with, outermost first:
//   jwt_auth_middleware → rate_limit_middleware → handler
// so the handlers themselves never see an unauthenticated or throttled request.

pub mod grocery;
